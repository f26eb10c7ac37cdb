use crate::chord::finger::Directory;
use crate::chord::hash;
use crate::chord::types::{NodeAddress, NodeId};
use crate::chord::{DEFAULT_BASE_PORT, DEFAULT_HOST, DEFAULT_RING_SIZE};
use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// How a node compares finger ids against the lookup target.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum RoutingMode {
    /// Plain integer comparison of `(self + 2^i) mod N` against the target.
    /// Forwarding paths match the reference network, including its
    /// wraparound gap: some paths cycle until the hop ceiling stops them.
    #[default]
    Reference,
    /// Compares clockwise distances from the current node, so wrapped
    /// fingers are ordered correctly. Converges in at most log2(N) hops.
    Clockwise,
}

impl fmt::Display for RoutingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoutingMode::Reference => write!(f, "reference"),
            RoutingMode::Clockwise => write!(f, "clockwise"),
        }
    }
}

/// Network-wide parameters, fixed for the lifetime of the ring.
///
/// Every node of a ring must be built from the same configuration: the
/// address scheme `address_of(id) = (host, base_port + id)` doubles as the
/// membership directory.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RingConfig {
    pub ring_size: u64,
    pub host: String,
    pub base_port: u16,
    pub routing: RoutingMode,
    /// Forwarding ceiling for a single lookup, defaults to the ring size
    pub max_hops: Option<u32>,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
}

impl Default for RingConfig {
    fn default() -> Self {
        Self {
            ring_size: DEFAULT_RING_SIZE,
            host: DEFAULT_HOST.to_string(),
            base_port: DEFAULT_BASE_PORT,
            routing: RoutingMode::default(),
            max_hops: None,
            connect_timeout_ms: 1000,
            request_timeout_ms: 5000,
        }
    }
}

impl RingConfig {
    pub fn new(ring_size: u64, host: impl Into<String>, base_port: u16) -> Self {
        Self {
            ring_size,
            host: host.into(),
            base_port,
            ..Self::default()
        }
    }

    pub fn with_routing(mut self, routing: RoutingMode) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_max_hops(mut self, max_hops: u32) -> Self {
        self.max_hops = Some(max_hops);
        self
    }

    /// Reads a JSON config file; missing fields take their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Checks the ring size is a power of two and every node port fits in u16
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !hash::is_valid_ring_size(self.ring_size) {
            return Err(ConfigError::RingSize(self.ring_size));
        }

        let last_port = u64::from(self.base_port) + self.ring_size - 1;
        if last_port > u64::from(u16::MAX) {
            return Err(ConfigError::PortRange {
                base: self.base_port,
                size: self.ring_size,
            });
        }

        Ok(())
    }

    pub fn check_node(&self, id: NodeId) -> Result<(), ConfigError> {
        if id.0 >= self.ring_size {
            return Err(ConfigError::NodeOutOfRange {
                id: id.0,
                size: self.ring_size,
            });
        }
        Ok(())
    }

    pub fn finger_count(&self) -> usize {
        hash::finger_count(self.ring_size)
    }

    pub fn hop_budget(&self) -> u32 {
        self.max_hops
            .unwrap_or_else(|| u32::try_from(self.ring_size).unwrap_or(u32::MAX))
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> {
        (0..self.ring_size).map(NodeId)
    }
}

impl Directory for RingConfig {
    fn address_of(&self, id: NodeId) -> NodeAddress {
        // validate() guarantees base_port + id fits in a port
        NodeAddress::new(self.host.clone(), self.base_port + id.0 as u16)
    }
}
