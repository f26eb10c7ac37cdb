use crate::chord::types::{Lookup, LookupHop, NodeAddress, Value};
use crate::error::ChordError;
use async_trait::async_trait;

/// Invokes operations on another ring member.
///
/// Any failure to reach the peer or to understand its answer is reported as
/// `ChordError::RoutingFailure`; errors raised by the peer itself come back
/// with their original kind.
#[async_trait]
pub trait RemoteNode: Send + Sync {
    async fn lookup(&self, peer: &NodeAddress, hop: LookupHop) -> Result<Lookup, ChordError>;

    async fn get(&self, peer: &NodeAddress, key: &str) -> Result<Option<Value>, ChordError>;

    async fn set(&self, peer: &NodeAddress, key: &str, value: Value) -> Result<(), ChordError>;
}
