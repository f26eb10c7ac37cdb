use crate::chord::node::ChordNode;
use crate::chord::types::{LookupHop, Value};
use crate::network::messages::ring::{
    ring_node_server::RingNode, DescribeRequest, DescribeResponse, GetRequest, GetResponse,
    LookupRequest, LookupResponse, SetRequest, SetResponse,
};
use log::debug;
use std::sync::Arc;
use tonic::{Request, Response, Status};

/// Exposes a `ChordNode` as the `RingNode` gRPC service
pub struct RingGrpcServer {
    node: Arc<ChordNode>,
}

impl RingGrpcServer {
    pub fn new(node: Arc<ChordNode>) -> Self {
        Self { node }
    }
}

#[tonic::async_trait]
impl RingNode for RingGrpcServer {
    async fn lookup(
        &self,
        request: Request<LookupRequest>,
    ) -> Result<Response<LookupResponse>, Status> {
        let hop = LookupHop::from(request.into_inner());
        debug!("#{}: Received lookup for {:?} (hop {})", self.node.id(), hop.key, hop.hops);

        let lookup = self.node.route_lookup(hop).await?;
        Ok(Response::new(lookup.into()))
    }

    async fn get(&self, request: Request<GetRequest>) -> Result<Response<GetResponse>, Status> {
        let req = request.into_inner();
        debug!("#{}: Received get for {:?}", self.node.id(), req.key);

        let response = match self.node.get(&req.key).await? {
            Some(value) => GetResponse {
                found: true,
                value: value.0,
            },
            None => GetResponse {
                found: false,
                value: Vec::new(),
            },
        };
        Ok(Response::new(response))
    }

    async fn set(&self, request: Request<SetRequest>) -> Result<Response<SetResponse>, Status> {
        let req = request.into_inner();
        debug!("#{}: Received set for {:?}", self.node.id(), req.key);

        self.node.set(&req.key, Value(req.value)).await?;
        Ok(Response::new(SetResponse {}))
    }

    async fn describe(
        &self,
        _request: Request<DescribeRequest>,
    ) -> Result<Response<DescribeResponse>, Status> {
        Ok(Response::new(self.node.describe().await.into()))
    }
}
