use crate::chord::config::RingConfig;
use crate::chord::node::ChordNode;
use crate::chord::types::{NodeAddress, NodeId};
use crate::error::*;
use crate::network::grpc::{GrpcRemote, GrpcThread};
use crate::network::remote::RemoteNode;
use log::{error, info};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const SERVER_STARTUP_TIMEOUT: Duration = Duration::from_secs(5);

/// A `ChordNode` together with the gRPC server exposing it.
///
/// Dropping a started peer stops its server.
pub struct RingPeer {
    node: Arc<ChordNode>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    grpc_handle: Option<JoinHandle<std::result::Result<(), NetworkError>>>,
}

impl RingPeer {
    /// Creates the peer for node `id`, forwarding over gRPC.
    pub fn new(id: NodeId, config: Arc<RingConfig>) -> Result<Self> {
        let remote = Arc::new(GrpcRemote::new(&config));
        Self::with_remote(id, config, remote)
    }

    pub fn with_remote(
        id: NodeId,
        config: Arc<RingConfig>,
        remote: Arc<dyn RemoteNode>,
    ) -> Result<Self> {
        let node = ChordNode::new(id, config, remote)?;
        Ok(Self {
            node: Arc::new(node),
            shutdown_tx: None,
            grpc_handle: None,
        })
    }

    pub fn node(&self) -> &Arc<ChordNode> {
        &self.node
    }

    pub fn id(&self) -> NodeId {
        self.node.id()
    }

    pub fn address(&self) -> &NodeAddress {
        self.node.address()
    }

    pub fn is_running(&self) -> bool {
        self.grpc_handle.is_some()
    }

    /// Starts the gRPC server and waits until it accepts connections.
    pub async fn start(&mut self) -> std::result::Result<(), NetworkError> {
        if self.grpc_handle.is_some() {
            return Ok(());
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let (ready_tx, ready_rx) = oneshot::channel();
        let grpc_thread = GrpcThread::new(self.node.clone(), shutdown_rx, ready_tx);
        let handle = tokio::spawn(grpc_thread.run());

        match tokio::time::timeout(SERVER_STARTUP_TIMEOUT, ready_rx).await {
            Ok(Ok(())) => {
                self.shutdown_tx = Some(shutdown_tx);
                self.grpc_handle = Some(handle);
                Ok(())
            }
            Ok(Err(_)) => {
                // The thread dropped its ready signal: it failed before binding.
                let reason = match handle.await {
                    Ok(Err(e)) => e,
                    Ok(Ok(())) => NetworkError::Grpc("server exited during startup".into()),
                    Err(e) => NetworkError::Grpc(format!("server task failed: {}", e)),
                };
                error!("#{}: Failed to start gRPC server: {}", self.id(), reason);
                Err(reason)
            }
            Err(_) => {
                handle.abort();
                error!("#{}: gRPC server startup timed out", self.id());
                Err(NetworkError::Grpc("Server startup timed out".into()))
            }
        }
    }

    /// Stops the gRPC server and waits for it to finish.
    pub async fn shutdown(&mut self) -> std::result::Result<(), NetworkError> {
        if let Some(shutdown_tx) = self.shutdown_tx.take() {
            let _ = shutdown_tx.send(());
        }

        match self.grpc_handle.take() {
            Some(handle) => handle
                .await
                .map_err(|e| NetworkError::Grpc(format!("server task failed: {}", e)))?,
            None => Ok(()),
        }
    }

    /// Serves until Ctrl-C, then shuts down.
    pub async fn run(&mut self) -> Result<()> {
        self.start().await?;
        info!("#{}: Node is running on {}", self.id(), self.address());

        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for shutdown signal: {}", e);
        }

        info!("#{}: Received shutdown signal", self.id());
        self.shutdown().await?;
        Ok(())
    }
}
