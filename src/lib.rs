//! A Chord-style key/value ring with fixed membership.
//!
//! Every identifier of the ring `[0, N)` is served by exactly one node. Keys
//! are hashed onto the ring with SHA-1 and stored on the node whose id equals
//! their hash. Lookups hop along finger tables until they reach that node.

pub mod chord;
pub mod client;
pub mod error;
pub mod network;

pub use chord::config::{RingConfig, RoutingMode};
pub use chord::node::ChordNode;
pub use chord::types::{Lookup, NodeAddress, NodeId, Value};
pub use client::RingClient;
pub use network::node::RingPeer;
pub use network::ring::RingNetwork;
