use crate::chord::config::{RingConfig, RoutingMode};
use crate::chord::finger::{Directory, FingerEntry, FingerTable};
use crate::chord::hash;
use crate::chord::routing::{next_hop, Route};
use crate::chord::store::Store;
use crate::chord::types::{Lookup, LookupHop, NodeAddress, NodeId, Value};
use crate::error::{ChordError, ConfigError};
use crate::network::remote::RemoteNode;
use log::{debug, info, warn};
use std::sync::Arc;

/// Snapshot of a node's identity, routing table and store size
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeSummary {
    pub id: NodeId,
    pub address: NodeAddress,
    pub ring_size: u64,
    pub routing: RoutingMode,
    pub fingers: Vec<FingerEntry>,
    pub stored_keys: usize,
}

/// A ring member: owns one identifier, its finger table and the values of
/// every key hashing to that identifier.
pub struct ChordNode {
    id: NodeId,
    address: NodeAddress,
    config: Arc<RingConfig>,
    fingers: FingerTable,
    store: Store,
    remote: Arc<dyn RemoteNode>,
}

impl ChordNode {
    pub fn new(
        id: NodeId,
        config: Arc<RingConfig>,
        remote: Arc<dyn RemoteNode>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        config.check_node(id)?;

        let address = config.address_of(id);
        let fingers = FingerTable::new(id, config.ring_size, &*config);
        info!("#{}: Registered node at {}", id, address);

        Ok(Self {
            id,
            address,
            config,
            fingers,
            store: Store::new(),
            remote,
        })
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn address(&self) -> &NodeAddress {
        &self.address
    }

    pub fn fingers(&self) -> &FingerTable {
        &self.fingers
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    /// Resolves the owner of `key`, starting from this node.
    pub async fn lookup(&self, key: &str) -> Result<Lookup, ChordError> {
        self.route_lookup(LookupHop::new(key)).await
    }

    /// Handles one step of a lookup: answer it here or forward it one hop
    /// closer to the owner. Forwarding failures are returned as they are,
    /// nothing is retried.
    ///
    /// The hop ceiling comes from this node's config, whatever `hops` the
    /// caller reports.
    pub async fn route_lookup(&self, hop: LookupHop) -> Result<Lookup, ChordError> {
        let ring_size = self.config.ring_size;
        let target = hash::target_id(&hop.key, ring_size)?;
        debug!("#{}: Key {:?} belongs to node {}", self.id, hop.key, target);

        let next = match next_hop(&self.fingers, target, ring_size, self.config.routing) {
            Route::Local => {
                return Ok(Lookup {
                    owner_id: self.id,
                    owner: self.address.clone(),
                    hops: hop.hops,
                })
            }
            Route::Owner(finger) => {
                return Ok(Lookup {
                    owner_id: finger.start,
                    owner: finger.address.clone(),
                    hops: hop.hops,
                })
            }
            Route::Forward(finger) => finger,
            Route::Successor(finger) => {
                debug!(
                    "#{}: No finger precedes node {}, passing lookup to successor {}",
                    self.id, target, finger.start
                );
                finger
            }
            Route::Unresolved => {
                return Err(ChordError::OwnerUnresolved(format!(
                    "node {} has no finger leading to node {}",
                    self.id, target
                )))
            }
        };

        let budget = self.config.hop_budget();
        let forwarded = match hop.forwarded() {
            Some(forwarded) if hop.hops < budget => forwarded,
            _ => {
                warn!(
                    "#{}: Lookup for {:?} exhausted its budget after {} hops",
                    self.id, hop.key, hop.hops
                );
                return Err(ChordError::HopLimitExceeded(format!(
                    "lookup for {:?} stopped at node {} after {} hops (limit {})",
                    hop.key, self.id, hop.hops, budget
                )));
            }
        };

        debug!(
            "#{}: Forwarding lookup for {:?} to node {} at {} (hop {})",
            self.id, hop.key, next.start, next.address, forwarded.hops
        );
        self.remote.lookup(&next.address, forwarded).await
    }

    /// Reads `key` from its owner. A key that was never set is `None`.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, ChordError> {
        let lookup = self.lookup(key).await?;

        if self.is_self(&lookup.owner) {
            return Ok(self.store.get(key).await);
        }

        debug!("#{}: Fetching {:?} from node {}", self.id, key, lookup.owner_id);
        self.remote.get(&lookup.owner, key).await
    }

    /// Writes `key` on its owner, replacing any previous value.
    pub async fn set(&self, key: &str, value: Value) -> Result<(), ChordError> {
        let lookup = self.lookup(key).await?;

        if self.is_self(&lookup.owner) {
            self.store.set(key, value).await;
            debug!("#{}: Stored {:?}", self.id, key);
            return Ok(());
        }

        debug!("#{}: Storing {:?} on node {}", self.id, key, lookup.owner_id);
        self.remote.set(&lookup.owner, key, value).await
    }

    pub async fn describe(&self) -> NodeSummary {
        NodeSummary {
            id: self.id,
            address: self.address.clone(),
            ring_size: self.config.ring_size,
            routing: self.config.routing,
            fingers: self.fingers.entries().to_vec(),
            stored_keys: self.store.len().await,
        }
    }

    fn is_self(&self, address: &NodeAddress) -> bool {
        *address == self.address
    }
}
