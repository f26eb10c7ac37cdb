use crate::chord::config::RoutingMode;
use crate::chord::finger::{FingerEntry, FingerTable};
use crate::chord::hash;
use crate::chord::types::NodeId;
use std::cmp::Ordering;

/// Next step for a lookup handled at one node
#[derive(Debug, PartialEq, Eq)]
pub enum Route<'a> {
    /// This node owns the target
    Local,
    /// A finger points exactly at the target: that finger is the owner
    Owner(&'a FingerEntry),
    /// Forward the lookup to the nearest preceding finger found
    Forward(&'a FingerEntry),
    /// No finger sits before the target; the lookup moves on to the first
    /// finger (the immediate successor) instead
    Successor(&'a FingerEntry),
    /// No finger at all, so nothing to forward to
    Unresolved,
}

/// Picks the next hop toward `target` by scanning fingers in increasing order.
///
/// A finger matching the target answers immediately. The scan stops at the
/// first finger placed after the target, and the last finger seen before it
/// becomes the forwarding candidate.
pub fn next_hop(table: &FingerTable, target: NodeId, ring_size: u64, mode: RoutingMode) -> Route<'_> {
    let node = table.node_id();
    if target == node {
        return Route::Local;
    }

    let position = |id: NodeId| match mode {
        RoutingMode::Reference => id.0,
        RoutingMode::Clockwise => hash::clockwise_distance(node, id, ring_size),
    };
    let target_position = position(target);

    let mut nearest = None;
    for entry in table.entries() {
        match position(entry.start).cmp(&target_position) {
            Ordering::Equal => return Route::Owner(entry),
            Ordering::Greater => break,
            Ordering::Less => nearest = Some(entry),
        }
    }

    match (nearest, table.get(0)) {
        (Some(entry), _) => Route::Forward(entry),
        (None, Some(first)) => Route::Successor(first),
        (None, None) => Route::Unresolved,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chord::config::RingConfig;

    fn table(node: u64, ring_size: u64) -> FingerTable {
        let config = RingConfig::new(ring_size, "localhost", 8000);
        FingerTable::new(NodeId(node), ring_size, &config)
    }

    fn start(route: Route<'_>) -> (&'static str, u64) {
        match route {
            Route::Local => ("local", 0),
            Route::Owner(e) => ("owner", e.start.0),
            Route::Forward(e) => ("forward", e.start.0),
            Route::Successor(e) => ("successor", e.start.0),
            Route::Unresolved => ("unresolved", 0),
        }
    }

    #[test]
    fn test_own_id_is_local() {
        let t = table(5, 16);
        assert_eq!(next_hop(&t, NodeId(5), 16, RoutingMode::Reference), Route::Local);
    }

    #[test]
    fn test_exact_finger_match_short_circuits() {
        let t = table(5, 16);
        let route = next_hop(&t, NodeId(9), 16, RoutingMode::Reference);
        assert_eq!(route, Route::Owner(&t.entries()[2]));
        assert_eq!(start(route), ("owner", 9));
    }

    #[test]
    fn test_forwards_to_nearest_preceding_finger() {
        let t = table(5, 16);
        assert_eq!(start(next_hop(&t, NodeId(10), 16, RoutingMode::Reference)), ("forward", 9));
        assert_eq!(start(next_hop(&t, NodeId(15), 16, RoutingMode::Reference)), ("forward", 13));
        assert_eq!(start(next_hop(&t, NodeId(8), 16, RoutingMode::Reference)), ("forward", 7));
    }

    #[test]
    fn test_target_behind_node_falls_back_to_successor() {
        let t = table(5, 16);
        assert_eq!(start(next_hop(&t, NodeId(2), 16, RoutingMode::Reference)), ("successor", 6));
    }

    #[test]
    fn test_reference_mode_keeps_wraparound_gap() {
        // Fingers of 12 are 13, 14, 0, 4. The wrapped fingers compare as
        // smaller than 15, so the scan walks past them and picks 4.
        let t = table(12, 16);
        assert_eq!(start(next_hop(&t, NodeId(15), 16, RoutingMode::Reference)), ("forward", 4));
    }

    #[test]
    fn test_clockwise_mode_orders_wrapped_fingers() {
        let t = table(12, 16);
        assert_eq!(start(next_hop(&t, NodeId(15), 16, RoutingMode::Clockwise)), ("forward", 14));
        assert_eq!(start(next_hop(&t, NodeId(2), 16, RoutingMode::Clockwise)), ("forward", 0));
        assert_eq!(start(next_hop(&t, NodeId(4), 16, RoutingMode::Clockwise)), ("owner", 4));
    }

    #[test]
    fn test_modes_agree_without_wraparound() {
        let t = table(2, 16);
        for target in 3..16 {
            assert_eq!(
                next_hop(&t, NodeId(target), 16, RoutingMode::Reference),
                next_hop(&t, NodeId(target), 16, RoutingMode::Clockwise),
                "target {}",
                target
            );
        }
    }

    #[test]
    fn test_empty_table_is_unresolved() {
        let t = table(0, 1);
        assert_eq!(next_hop(&t, NodeId(3), 1, RoutingMode::Reference), Route::Unresolved);
        assert_eq!(next_hop(&t, NodeId(0), 1, RoutingMode::Reference), Route::Local);
    }
}
