use crate::chord::config::RingConfig;
use crate::chord::types::NodeId;
use crate::error::*;
use crate::network::grpc::GrpcRemote;
use crate::network::node::RingPeer;
use crate::network::remote::RemoteNode;
use log::{error, info, warn};
use std::sync::Arc;

/// Every node of a ring, served from the current process.
pub struct RingNetwork {
    config: Arc<RingConfig>,
    peers: Vec<RingPeer>,
}

impl RingNetwork {
    /// Creates and starts one peer per identifier in `[0, N)`.
    ///
    /// If any peer fails to start, the ones already running are stopped and
    /// the error is returned.
    pub async fn launch(config: RingConfig) -> Result<Self> {
        config.validate()?;
        let config = Arc::new(config);
        let remote: Arc<dyn RemoteNode> = Arc::new(GrpcRemote::new(&config));

        info!("Starting the Chord network with {} nodes...", config.ring_size);

        let mut network = RingNetwork {
            config: config.clone(),
            peers: Vec::with_capacity(config.ring_size as usize),
        };

        for id in config.node_ids() {
            let started = async {
                let mut peer = RingPeer::with_remote(id, config.clone(), remote.clone())?;
                peer.start().await?;
                Ok::<_, Error>(peer)
            }
            .await;

            match started {
                Ok(peer) => network.peers.push(peer),
                Err(e) => {
                    warn!("Node {} failed to start, stopping the ring: {}", id, e);
                    if let Err(shutdown_err) = network.shutdown().await {
                        error!("Failed to stop the partially started ring: {}", shutdown_err);
                    }
                    return Err(e);
                }
            }
        }

        info!("All {} nodes are up", network.peers.len());
        Ok(network)
    }

    pub fn config(&self) -> &RingConfig {
        &self.config
    }

    pub fn peers(&self) -> &[RingPeer] {
        &self.peers
    }

    pub fn peer(&self, id: NodeId) -> Option<&RingPeer> {
        self.peers.get(usize::try_from(id.0).ok()?)
    }

    pub fn peer_mut(&mut self, id: NodeId) -> Option<&mut RingPeer> {
        self.peers.get_mut(usize::try_from(id.0).ok()?)
    }

    /// Finger tables of every node, one block per node
    pub fn list(&self) -> String {
        self.peers
            .iter()
            .map(|peer| peer.node().fingers().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub async fn shutdown(mut self) -> Result<()> {
        info!("Waiting for {} nodes to stop...", self.peers.len());
        for peer in self.peers.iter_mut() {
            peer.shutdown().await?;
        }
        Ok(())
    }
}
