mod util;

use chordring::{
    chord::config::RoutingMode,
    error::{ChordError, Result},
    network::messages::ring::{ring_node_client::RingNodeClient, LookupRequest},
    NodeAddress, NodeId,
};
use setup::{client, launch};
use util::key_for;

#[tokio::test(flavor = "multi_thread")]
#[serial_test::serial]
async fn test_lookup_over_grpc() -> Result<()> {
    let network = launch(16, 38000, RoutingMode::Reference).await?;
    let entry = client(&network, 5);

    let lookup = entry.lookup(&key_for(9, 16)).await?;
    assert_eq!(lookup.owner_id, NodeId(9));
    assert_eq!(lookup.owner, NodeAddress::new("127.0.0.1", 38009));
    assert_eq!(lookup.hops, 0);

    let lookup = entry.lookup(&key_for(10, 16)).await?;
    assert_eq!(lookup.owner_id, NodeId(10));
    assert_eq!(lookup.owner, NodeAddress::new("127.0.0.1", 38010));
    assert_eq!(lookup.hops, 1);

    network.shutdown().await
}

#[tokio::test(flavor = "multi_thread")]
#[serial_test::serial]
async fn test_every_entry_agrees_on_the_owner() -> Result<()> {
    let network = launch(16, 38100, RoutingMode::Clockwise).await?;

    for target in [0, 3, 7, 15] {
        let key = key_for(target, 16);
        for entry in 0..16 {
            let lookup = client(&network, entry).lookup(&key).await?;
            assert_eq!(lookup.owner_id, NodeId(target), "entry {}", entry);
            assert_eq!(lookup.owner.port, 38100 + target as u16);
            assert!(lookup.hops <= 4);
        }
    }

    network.shutdown().await
}

#[tokio::test(flavor = "multi_thread")]
#[serial_test::serial]
async fn test_unreachable_hop_surfaces_routing_failure() -> Result<()> {
    let mut network = launch(16, 38200, RoutingMode::Reference).await?;
    if let Some(peer) = network.peer_mut(NodeId(9)) {
        peer.shutdown().await?;
    }

    // Node 5 has to forward through node 9 to reach node 10
    let err = client(&network, 5).lookup(&key_for(10, 16)).await.unwrap_err();
    assert!(matches!(err, ChordError::RoutingFailure(_)), "{}", err);

    network.shutdown().await
}

#[tokio::test(flavor = "multi_thread")]
#[serial_test::serial]
async fn test_hop_limit_crosses_the_wire() -> Result<()> {
    let network = launch(16, 38300, RoutingMode::Reference).await?;

    // 12 and 4 keep forwarding to each other until the budget runs out
    let err = client(&network, 12).lookup(&key_for(15, 16)).await.unwrap_err();
    assert!(matches!(err, ChordError::HopLimitExceeded(_)), "{}", err);

    let err = client(&network, 12).lookup("naïve").await.unwrap_err();
    assert!(matches!(err, ChordError::InvalidKeyKind(_)), "{}", err);

    network.shutdown().await
}

#[tokio::test(flavor = "multi_thread")]
#[serial_test::serial]
async fn test_describe_reports_fingers() -> Result<()> {
    let network = launch(16, 38400, RoutingMode::Reference).await?;

    let summary = client(&network, 5).describe().await?;
    assert_eq!(summary.id, NodeId(5));
    assert_eq!(summary.ring_size, 16);
    assert_eq!(summary.routing, RoutingMode::Reference);

    let starts: Vec<u64> = summary.fingers.iter().map(|f| f.start.0).collect();
    assert_eq!(starts, vec![6, 7, 9, 13]);
    let ports: Vec<u16> = summary.fingers.iter().map(|f| f.address.port).collect();
    assert_eq!(ports, vec![38406, 38407, 38409, 38413]);

    network.shutdown().await
}

#[tokio::test(flavor = "multi_thread")]
#[serial_test::serial]
async fn test_raw_lookup_request_uses_node_hop_limit() -> Result<()> {
    let network = launch(16, 38900, RoutingMode::Reference).await?;
    let mut raw = RingNodeClient::connect("http://127.0.0.1:38905").await.unwrap();

    // Only the key is set: the node starts the count and applies its own limit
    let response = raw
        .lookup(LookupRequest {
            key: key_for(10, 16),
            ..Default::default()
        })
        .await
        .unwrap()
        .into_inner();
    assert_eq!(response.owner_id, 10);
    assert_eq!(response.hops, 1);
    assert_eq!(response.owner.unwrap().port, 38910);

    // A request that already used up the ring's budget is not forwarded again
    let status = raw
        .lookup(LookupRequest {
            key: key_for(10, 16),
            hops: 16,
        })
        .await
        .unwrap_err();
    assert_eq!(status.code(), tonic::Code::ResourceExhausted);

    drop(raw);
    network.shutdown().await
}
