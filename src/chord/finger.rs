use crate::chord::hash;
use crate::chord::types::{NodeAddress, NodeId};
use std::fmt;

/// Resolves which address owns an identifier while a finger table is built.
pub trait Directory {
    fn address_of(&self, id: NodeId) -> NodeAddress;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FingerEntry {
    /// `(node + 2^index) mod N`
    pub start: NodeId,
    pub address: NodeAddress,
}

/// Sparse routing table of `log2(N)` entries. Built once, never updated:
/// ring membership is fixed.
#[derive(Clone, Debug)]
pub struct FingerTable {
    node_id: NodeId,
    entries: Vec<FingerEntry>,
}

impl FingerTable {
    pub fn new(node_id: NodeId, ring_size: u64, directory: &impl Directory) -> Self {
        let entries = (0..hash::finger_count(ring_size))
            .map(|i| {
                let start = hash::finger_start(node_id, i, ring_size);
                FingerEntry {
                    start,
                    address: directory.address_of(start),
                }
            })
            .collect();

        Self { node_id, entries }
    }

    pub fn node_id(&self) -> NodeId {
        self.node_id
    }

    pub fn entries(&self) -> &[FingerEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&FingerEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for FingerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Node #{}:", self.node_id)?;
        writeln!(f, "Finger table:")?;
        writeln!(f, "\tshift | start | address")?;
        for (index, entry) in self.entries.iter().enumerate() {
            writeln!(f, "\t{:>5} | {:>5} | {}", index + 1, entry.start, entry.address)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::config::RingConfig;

    #[test]
    fn test_fingers_for_node_five() {
        let config = RingConfig::new(16, "localhost", 8000);
        let table = FingerTable::new(NodeId(5), config.ring_size, &config);

        let starts: Vec<u64> = table.entries().iter().map(|e| e.start.0).collect();
        assert_eq!(starts, vec![6, 7, 9, 13]);

        let ports: Vec<u16> = table.entries().iter().map(|e| e.address.port).collect();
        assert_eq!(ports, vec![8006, 8007, 8009, 8013]);
    }

    #[test]
    fn test_fingers_wrap_around_zero() {
        let config = RingConfig::new(16, "localhost", 8000);
        let table = FingerTable::new(NodeId(14), config.ring_size, &config);

        let starts: Vec<u64> = table.entries().iter().map(|e| e.start.0).collect();
        assert_eq!(starts, vec![15, 0, 2, 6]);
    }

    #[test]
    fn test_single_node_ring_has_no_fingers() {
        let config = RingConfig::new(1, "localhost", 8000);
        let table = FingerTable::new(NodeId(0), config.ring_size, &config);
        assert!(table.is_empty());
    }

    #[test]
    fn test_display_lists_every_finger() {
        let config = RingConfig::new(8, "localhost", 9000);
        let table = FingerTable::new(NodeId(3), config.ring_size, &config);
        let printed = table.to_string();

        assert!(printed.starts_with("Node #3:"));
        assert!(printed.contains("localhost:9004"));
        assert!(printed.contains("localhost:9005"));
        assert!(printed.contains("localhost:9007"));
    }
}
