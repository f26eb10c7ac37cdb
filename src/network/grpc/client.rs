use crate::chord::config::RingConfig;
use crate::chord::node::NodeSummary;
use crate::chord::types::{Lookup, LookupHop, NodeAddress, Value};
use crate::error::ChordError;
use crate::network::messages::ring::{
    ring_node_client::RingNodeClient, DescribeRequest, GetRequest, LookupRequest, SetRequest,
};
use crate::network::remote::RemoteNode;
use async_trait::async_trait;
use std::time::Duration;
use tonic::transport::{Channel, Endpoint};

/// A connection to one ring node
pub struct RingGrpcClient {
    client: RingNodeClient<Channel>,
}

impl RingGrpcClient {
    pub async fn connect(
        peer: &NodeAddress,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, ChordError> {
        let endpoint = Endpoint::from_shared(peer.to_uri())
            .map_err(|e| ChordError::RoutingFailure(format!("invalid peer address {}: {}", peer, e)))?
            .connect_timeout(connect_timeout)
            .timeout(request_timeout);

        let channel = endpoint
            .connect()
            .await
            .map_err(|e| ChordError::RoutingFailure(format!("peer {} unreachable: {}", peer, e)))?;

        Ok(Self {
            client: RingNodeClient::new(channel),
        })
    }

    pub async fn lookup(&mut self, hop: LookupHop) -> Result<Lookup, ChordError> {
        let response = self.client.lookup(LookupRequest::from(hop)).await?.into_inner();
        Lookup::try_from(response)
    }

    pub async fn get(&mut self, key: &str) -> Result<Option<Value>, ChordError> {
        let response = self
            .client
            .get(GetRequest {
                key: key.to_owned(),
            })
            .await?
            .into_inner();

        Ok(response.found.then(|| Value(response.value)))
    }

    pub async fn set(&mut self, key: &str, value: Value) -> Result<(), ChordError> {
        self.client
            .set(SetRequest {
                key: key.to_owned(),
                value: value.0,
            })
            .await?;
        Ok(())
    }

    pub async fn describe(&mut self) -> Result<NodeSummary, ChordError> {
        let response = self.client.describe(DescribeRequest {}).await?.into_inner();
        NodeSummary::try_from(response)
    }
}

/// `RemoteNode` over gRPC. Opens a fresh connection for every call.
#[derive(Clone, Debug)]
pub struct GrpcRemote {
    connect_timeout: Duration,
    request_timeout: Duration,
}

impl GrpcRemote {
    pub fn new(config: &RingConfig) -> Self {
        Self {
            connect_timeout: config.connect_timeout(),
            request_timeout: config.request_timeout(),
        }
    }

    pub async fn connect(&self, peer: &NodeAddress) -> Result<RingGrpcClient, ChordError> {
        RingGrpcClient::connect(peer, self.connect_timeout, self.request_timeout).await
    }

    pub async fn describe(&self, peer: &NodeAddress) -> Result<NodeSummary, ChordError> {
        self.connect(peer).await?.describe().await
    }
}

#[async_trait]
impl RemoteNode for GrpcRemote {
    async fn lookup(&self, peer: &NodeAddress, hop: LookupHop) -> Result<Lookup, ChordError> {
        self.connect(peer).await?.lookup(hop).await
    }

    async fn get(&self, peer: &NodeAddress, key: &str) -> Result<Option<Value>, ChordError> {
        self.connect(peer).await?.get(key).await
    }

    async fn set(&self, peer: &NodeAddress, key: &str, value: Value) -> Result<(), ChordError> {
        self.connect(peer).await?.set(key, value).await
    }
}
