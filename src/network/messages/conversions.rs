use crate::chord::config::RoutingMode;
use crate::chord::finger::FingerEntry;
use crate::chord::node::NodeSummary;
use crate::chord::types::{Lookup, LookupHop, NodeAddress, NodeId};
use crate::error::ChordError;
use crate::network::messages::ring;

fn malformed(what: &str) -> ChordError {
    ChordError::RoutingFailure(format!("malformed response: {}", what))
}

impl From<&NodeAddress> for ring::NodeAddress {
    fn from(address: &NodeAddress) -> Self {
        ring::NodeAddress {
            host: address.host.clone(),
            port: u32::from(address.port),
        }
    }
}

impl TryFrom<ring::NodeAddress> for NodeAddress {
    type Error = ChordError;

    fn try_from(address: ring::NodeAddress) -> Result<Self, Self::Error> {
        let port = u16::try_from(address.port)
            .map_err(|_| malformed(&format!("port {} out of range", address.port)))?;
        Ok(NodeAddress::new(address.host, port))
    }
}

fn address_field(address: Option<ring::NodeAddress>, what: &str) -> Result<NodeAddress, ChordError> {
    address
        .ok_or_else(|| malformed(&format!("missing {} address", what)))?
        .try_into()
}

impl From<LookupHop> for ring::LookupRequest {
    fn from(hop: LookupHop) -> Self {
        ring::LookupRequest {
            key: hop.key,
            hops: hop.hops,
        }
    }
}

impl From<ring::LookupRequest> for LookupHop {
    fn from(req: ring::LookupRequest) -> Self {
        LookupHop {
            key: req.key,
            hops: req.hops,
        }
    }
}

impl From<Lookup> for ring::LookupResponse {
    fn from(lookup: Lookup) -> Self {
        ring::LookupResponse {
            owner: Some((&lookup.owner).into()),
            owner_id: lookup.owner_id.0,
            hops: lookup.hops,
        }
    }
}

impl TryFrom<ring::LookupResponse> for Lookup {
    type Error = ChordError;

    fn try_from(res: ring::LookupResponse) -> Result<Self, Self::Error> {
        Ok(Lookup {
            owner_id: NodeId(res.owner_id),
            owner: address_field(res.owner, "owner")?,
            hops: res.hops,
        })
    }
}

impl TryFrom<ring::Finger> for FingerEntry {
    type Error = ChordError;

    fn try_from(finger: ring::Finger) -> Result<Self, Self::Error> {
        Ok(FingerEntry {
            start: NodeId(finger.start),
            address: address_field(finger.address, "finger")?,
        })
    }
}

impl From<NodeSummary> for ring::DescribeResponse {
    fn from(summary: NodeSummary) -> Self {
        ring::DescribeResponse {
            node_id: summary.id.0,
            address: Some((&summary.address).into()),
            ring_size: summary.ring_size,
            routing: summary.routing.to_string(),
            fingers: summary
                .fingers
                .iter()
                .enumerate()
                .map(|(index, entry)| ring::Finger {
                    index: index as u32,
                    start: entry.start.0,
                    address: Some((&entry.address).into()),
                })
                .collect(),
            stored_keys: summary.stored_keys as u64,
        }
    }
}

impl TryFrom<ring::DescribeResponse> for NodeSummary {
    type Error = ChordError;

    fn try_from(res: ring::DescribeResponse) -> Result<Self, Self::Error> {
        let routing = match res.routing.as_str() {
            "reference" => RoutingMode::Reference,
            "clockwise" => RoutingMode::Clockwise,
            other => return Err(malformed(&format!("unknown routing mode {:?}", other))),
        };

        let mut fingers = res.fingers;
        fingers.sort_by_key(|f| f.index);

        Ok(NodeSummary {
            id: NodeId(res.node_id),
            address: address_field(res.address, "node")?,
            ring_size: res.ring_size,
            routing,
            fingers: fingers
                .into_iter()
                .map(FingerEntry::try_from)
                .collect::<Result<_, _>>()?,
            stored_keys: res.stored_keys as usize,
        })
    }
}
