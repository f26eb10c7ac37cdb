//! Consistent hashing and ring arithmetic over the identifier space `[0, N)`.
//!
//! Keys are hashed with SHA-1 and the 160-bit digest is read as a big-endian
//! integer. N is always a power of two that fits in a u64, so the remainder
//! only depends on the low 64 bits of the digest.

use crate::chord::types::NodeId;
use crate::error::ChordError;
use log::debug;
use sha1::{Digest, Sha1};

/// Hashes a key to the id of the node owning it.
///
/// Keys must be ASCII: the ring hashes their ASCII byte encoding, so any
/// other character cannot be placed and fails with `InvalidKeyKind`.
pub fn target_id(key: &str, ring_size: u64) -> Result<NodeId, ChordError> {
    if !key.is_ascii() {
        return Err(ChordError::InvalidKeyKind(format!(
            "key {:?} is not an ASCII string",
            key
        )));
    }

    let digest = Sha1::digest(key.as_bytes());
    let mut low = [0u8; 8];
    low.copy_from_slice(&digest[digest.len() - 8..]);
    let id = u64::from_be_bytes(low) & (ring_size - 1);

    debug!(
        "SHA1({}) = {} % {} = {}",
        key,
        hex::encode(digest),
        ring_size,
        id
    );

    Ok(NodeId(id))
}

/// Number of finger entries `m = log2(N)` for a power-of-two ring
pub fn finger_count(ring_size: u64) -> usize {
    ring_size.trailing_zeros() as usize
}

/// Id targeted by finger `index` of `node`: `(node + 2^index) mod N`
pub fn finger_start(node: NodeId, index: usize, ring_size: u64) -> NodeId {
    NodeId(node.0.wrapping_add(1u64 << index) & (ring_size - 1))
}

/// Clockwise distance travelled from `from` to reach `to`
pub fn clockwise_distance(from: NodeId, to: NodeId, ring_size: u64) -> u64 {
    to.0.wrapping_sub(from.0) & (ring_size - 1)
}

pub fn is_valid_ring_size(ring_size: u64) -> bool {
    ring_size.is_power_of_two()
}
