use chordring::{chord::hash, NodeId};

/// First key of the form `key-<i>` owned by node `target`.
pub fn key_for(target: u64, ring_size: u64) -> String {
    (0..)
        .map(|i| format!("key-{}", i))
        .find(|key| hash::target_id(key, ring_size).unwrap() == NodeId(target))
        .unwrap()
}
