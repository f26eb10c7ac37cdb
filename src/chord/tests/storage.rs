use super::mesh::{key_for, TestRing};
use crate::chord::config::{RingConfig, RoutingMode};
use crate::chord::hash;
use crate::chord::types::{NodeId, Value};
use crate::error::ChordError;
use std::sync::Arc;

fn clockwise_ring() -> TestRing {
    TestRing::new(RingConfig::default().with_routing(RoutingMode::Clockwise))
}

#[tokio::test]
async fn test_set_then_get_from_another_node() {
    let ring = TestRing::reference(16);
    let key = key_for(3, 16);

    ring.node(0).set(&key, Value::from("1")).await.unwrap();

    let lookup = ring.node(0).lookup(&key).await.unwrap();
    assert_eq!(lookup.owner_id, NodeId(3));
    assert_eq!(ring.node(0).get(&key).await.unwrap(), Some(Value::from("1")));
    assert_eq!(ring.node(3).get(&key).await.unwrap(), Some(Value::from("1")));
}

#[tokio::test]
async fn test_value_is_visible_from_every_node() {
    let ring = clockwise_ring();

    for (i, writer) in ring.nodes.iter().enumerate() {
        let key = format!("entry-{}", i);
        writer.set(&key, Value::from(key.as_str())).await.unwrap();

        for reader in &ring.nodes {
            assert_eq!(
                reader.get(&key).await.unwrap(),
                Some(Value::from(key.as_str())),
                "{} read from node {}",
                key,
                reader.id()
            );
        }
    }
}

#[tokio::test]
async fn test_missing_key_is_absent_not_an_error() {
    let ring = clockwise_ring();

    for node in &ring.nodes {
        assert_eq!(node.get("never-set").await.unwrap(), None);
    }
}

#[tokio::test]
async fn test_set_overwrites_previous_value() {
    let ring = clockwise_ring();
    let key = "alpha";

    ring.node(2).set(key, Value::from("1")).await.unwrap();
    ring.node(11).set(key, Value::from("2")).await.unwrap();

    assert_eq!(ring.node(7).get(key).await.unwrap(), Some(Value::from("2")));
}

#[tokio::test]
async fn test_set_only_touches_the_owner() {
    let ring = clockwise_ring();
    let key = "alpha";
    let owner = hash::target_id(key, 16).unwrap();

    ring.node(4).set(key, Value::from("1")).await.unwrap();

    for node in &ring.nodes {
        let summary = node.describe().await;
        let expected = usize::from(node.id() == owner);
        assert_eq!(summary.stored_keys, expected, "node {}", node.id());
        assert_eq!(summary.fingers.len(), 4);
    }
}

#[tokio::test]
async fn test_storage_fails_when_owner_is_unreachable() {
    let ring = TestRing::reference(16);
    let key = key_for(9, 16);
    ring.mesh.take_down(ring.node(9));

    let err = ring.node(5).get(&key).await.unwrap_err();
    assert!(matches!(err, ChordError::RoutingFailure(_)));

    let err = ring.node(5).set(&key, Value::from("x")).await.unwrap_err();
    assert!(matches!(err, ChordError::RoutingFailure(_)));
}

#[tokio::test]
async fn test_single_node_ring_stores_locally() {
    let ring = TestRing::reference(1);

    ring.node(0).set("alpha", Value::from("1")).await.unwrap();
    assert_eq!(ring.node(0).get("alpha").await.unwrap(), Some(Value::from("1")));
    assert_eq!(ring.node(0).get("beta").await.unwrap(), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_concurrent_writes_through_different_entries() {
    let ring = Arc::new(clockwise_ring());
    let mut handles = Vec::new();

    for i in 0..64u64 {
        let ring = ring.clone();
        handles.push(tokio::spawn(async move {
            let key = format!("concurrent-{}", i);
            ring.node(i % 16)
                .set(&key, Value::from(key.as_str()))
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    for i in 0..64u64 {
        let key = format!("concurrent-{}", i);
        let value = ring.node((i * 7) % 16).get(&key).await.unwrap();
        assert_eq!(value, Some(Value::from(key.as_str())));
    }
}
