use crate::chord::node::ChordNode;
use crate::error::NetworkError;
use crate::network::grpc::server::RingGrpcServer;
use crate::network::messages::ring::ring_node_server::RingNodeServer;
use futures::FutureExt;
use log::{error, info};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_stream::wrappers::TcpListenerStream;
use tonic::transport::Server;

/// Serves one node's gRPC endpoint until told to stop.
///
/// Readiness is signalled once the listener is bound. The server stops when
/// the shutdown sender fires or is dropped.
pub struct GrpcThread {
    node: Arc<ChordNode>,
    shutdown_rx: oneshot::Receiver<()>,
    ready_tx: Option<oneshot::Sender<()>>,
}

impl GrpcThread {
    pub fn new(
        node: Arc<ChordNode>,
        shutdown_rx: oneshot::Receiver<()>,
        ready_tx: oneshot::Sender<()>,
    ) -> Self {
        Self {
            node,
            shutdown_rx,
            ready_tx: Some(ready_tx),
        }
    }

    pub async fn run(mut self) -> Result<(), NetworkError> {
        let address = self.node.address().clone();
        let listener = TcpListener::bind((address.host.as_str(), address.port))
            .await
            .map_err(|e| NetworkError::Bind(format!("{}: {}", address, e)))?;

        info!("#{}: Serving gRPC on {}", self.node.id(), address);

        let server = RingGrpcServer::new(self.node.clone());
        let router = Server::builder().add_service(RingNodeServer::new(server));

        if let Some(ready_tx) = self.ready_tx.take() {
            let _ = ready_tx.send(());
        }

        match router
            .serve_with_incoming_shutdown(
                TcpListenerStream::new(listener),
                self.shutdown_rx.map(|_| ()),
            )
            .await
        {
            Ok(_) => {
                info!("#{}: gRPC server shut down gracefully", self.node.id());
                Ok(())
            }
            Err(e) => {
                error!("#{}: gRPC server encountered a fatal error: {:?}", self.node.id(), e);
                Err(NetworkError::Grpc(format!("Server error: {}", e)))
            }
        }
    }
}
