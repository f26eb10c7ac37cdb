use crate::chord::config::RingConfig;
use crate::chord::finger::Directory;
use crate::chord::node::NodeSummary;
use crate::chord::types::{Lookup, LookupHop, NodeAddress, NodeId, Value};
use crate::error::ChordError;
use crate::network::grpc::GrpcRemote;
use crate::network::remote::RemoteNode;

/// A client for a Chord ring.
///
/// Lookups go through the entry node; reads and writes then go straight to
/// the owner it reports, skipping the extra round trip through the entry.
#[derive(Clone, Debug)]
pub struct RingClient {
    remote: GrpcRemote,
    entry: NodeAddress,
}

impl RingClient {
    /// Creates a client that enters the ring at node `entry`.
    pub fn new(config: &RingConfig, entry: NodeId) -> Self {
        Self::with_entry(config, config.address_of(entry))
    }

    pub fn with_entry(config: &RingConfig, entry: NodeAddress) -> Self {
        Self {
            remote: GrpcRemote::new(config),
            entry,
        }
    }

    pub fn entry(&self) -> &NodeAddress {
        &self.entry
    }

    /// Resolves the node owning `key`.
    pub async fn lookup(&self, key: &str) -> Result<Lookup, ChordError> {
        self.remote
            .lookup(&self.entry, LookupHop::new(key))
            .await
    }

    /// Reads `key` and returns it together with the owner that answered.
    /// The value is `None` if the key was never set.
    pub async fn get(&self, key: &str) -> Result<(Lookup, Option<Value>), ChordError> {
        let owner = self.lookup(key).await?;
        let value = self.get_from(&owner.owner, key).await?;
        Ok((owner, value))
    }

    /// Stores `value` under `key` and returns the owner that now holds it.
    pub async fn set(&self, key: &str, value: Value) -> Result<Lookup, ChordError> {
        let owner = self.lookup(key).await?;
        self.set_at(&owner.owner, key, value).await?;
        Ok(owner)
    }

    /// Reads `key` from an already resolved owner.
    pub async fn get_from(&self, owner: &NodeAddress, key: &str) -> Result<Option<Value>, ChordError> {
        self.remote.get(owner, key).await
    }

    /// Writes `key` on an already resolved owner.
    pub async fn set_at(&self, owner: &NodeAddress, key: &str, value: Value) -> Result<(), ChordError> {
        self.remote.set(owner, key, value).await
    }

    /// Describes the entry node.
    pub async fn describe(&self) -> Result<NodeSummary, ChordError> {
        self.remote.describe(&self.entry).await
    }
}
