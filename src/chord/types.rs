use serde::{Deserialize, Serialize};
use std::fmt;

/// NodeId represents a position in the ring `[0, N)`, owned by exactly one node
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeId(pub u64);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        NodeId(id)
    }
}

/// Where a node's RPC endpoint can be reached. Fixed for the node's lifetime.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeAddress {
    pub host: String,
    pub port: u16,
}

impl NodeAddress {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    /// Endpoint URI used by the gRPC transport
    pub fn to_uri(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

impl fmt::Display for NodeAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

/// Opaque value stored in the ring
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Value(pub Vec<u8>);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value(s.as_bytes().to_vec())
    }
}

impl From<Vec<u8>> for Value {
    fn from(bytes: Vec<u8>) -> Self {
        Value(bytes)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// Outcome of a resolved lookup
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lookup {
    pub owner_id: NodeId,
    pub owner: NodeAddress,
    /// Number of times the lookup was forwarded to another node
    pub hops: u32,
}

/// A lookup in flight: the key plus the number of forwards so far. The
/// ceiling is not carried along; every node checks `hops` against its own
/// configured budget.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LookupHop {
    pub key: String,
    pub hops: u32,
}

impl LookupHop {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            hops: 0,
        }
    }

    /// The request sent to the next node, or None if `hops` cannot grow
    pub fn forwarded(&self) -> Option<Self> {
        Some(Self {
            key: self.key.clone(),
            hops: self.hops.checked_add(1)?,
        })
    }
}
