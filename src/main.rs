use chordring::{
    chord::{config::RoutingMode, types::NodeId},
    error::{ConfigError, Error},
    RingClient, RingConfig, RingNetwork, RingPeer, Value,
};
use clap::{Args, Parser, Subcommand};
use log::{error, info};
use rand::Rng;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "chordring")]
#[command(about = "Read and store data over a fixed-size Chord ring")]
struct Cli {
    #[command(flatten)]
    ring: RingArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct RingArgs {
    /// JSON file with the ring configuration; flags override its values
    #[arg(short = 'c', long = "config", global = true)]
    config: Option<PathBuf>,

    /// Number of nodes in the ring (a power of two, default 16)
    #[arg(short = 'N', long = "size", global = true)]
    size: Option<u64>,

    /// Port of node 0; node i listens on base port + i (default 8000)
    #[arg(short = 'p', long = "base-port", global = true)]
    base_port: Option<u16>,

    /// Host every node listens on (default 127.0.0.1)
    #[arg(short = 'H', long = "host", global = true)]
    host: Option<String>,

    /// How fingers are compared against the lookup target
    #[arg(long = "routing", value_enum, global = true)]
    routing: Option<RoutingMode>,

    /// Maximum number of forwards for one lookup (default: ring size)
    #[arg(long = "max-hops", global = true)]
    max_hops: Option<u32>,
}

impl RingArgs {
    fn load(&self) -> Result<RingConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => RingConfig::from_file(path)?,
            None => RingConfig::default(),
        };

        if let Some(size) = self.size {
            config.ring_size = size;
        }
        if let Some(base_port) = self.base_port {
            config.base_port = base_port;
        }
        if let Some(host) = &self.host {
            config.host = host.clone();
        }
        if let Some(routing) = self.routing {
            config.routing = routing;
        }
        if self.max_hops.is_some() {
            config.max_hops = self.max_hops;
        }

        config.validate()?;
        Ok(config)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Start every node of the ring in this process
    #[command(name = "network")]
    Network,
    /// Serve a single node of the ring
    #[command(name = "node")]
    Node {
        /// Identifier of the node to serve
        #[arg(short = 'i', long = "id")]
        id: u64,
    },
    /// Find which node owns a key
    #[command(name = "lookup")]
    Lookup {
        key: String,
        /// Node to enter the ring through (random if not specified)
        #[arg(short = 'e', long = "entry")]
        entry: Option<u64>,
    },
    /// Read a value
    #[command(name = "get")]
    Get {
        key: String,
        #[arg(short = 'e', long = "entry")]
        entry: Option<u64>,
    },
    /// Store a value
    #[command(name = "set")]
    Set {
        key: String,
        value: String,
        #[arg(short = 'e', long = "entry")]
        entry: Option<u64>,
    },
    /// Print a node's finger table
    #[command(name = "describe")]
    Describe {
        #[arg(short = 'e', long = "entry")]
        entry: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), String> {
    // Initialize logging with timestamp
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    let config = cli.ring.load().map_err(|e| {
        error!("Invalid configuration: {}", e);
        e.to_string()
    })?;

    run(cli.command, config).await.map_err(|e| {
        error!("{}", e);
        e.to_string()
    })
}

async fn run(command: Commands, config: RingConfig) -> Result<(), Error> {
    match command {
        Commands::Network => {
            let network = RingNetwork::launch(config).await?;
            info!("\n{}", network.list());

            info!("Ring is running, press Ctrl-C to stop");
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!("Failed to listen for shutdown signal: {}", e);
            }

            network.shutdown().await?;
            info!("Ring shut down gracefully");
            Ok(())
        }
        Commands::Node { id } => {
            let config = Arc::new(config);
            let mut peer = RingPeer::new(NodeId(id), config)?;
            info!("Starting node #{} at {}...", id, peer.address());
            info!("\n{}", peer.node().fingers());
            peer.run().await?;
            info!("Finishing node #{}...", id);
            Ok(())
        }
        Commands::Lookup { key, entry } => {
            let client = connect(&config, entry)?;
            eprintln!("Asking node at {}...", client.entry());
            let lookup = client.lookup(&key).await?;
            println!(
                "{} is owned by node #{} at {} ({} hops)",
                key, lookup.owner_id, lookup.owner, lookup.hops
            );
            Ok(())
        }
        Commands::Get { key, entry } => {
            let client = connect(&config, entry)?;
            let (lookup, value) = client.get(&key).await?;
            eprintln!("Answer from node at {}:", lookup.owner);
            match value {
                Some(value) => println!("> {} = {}", key, value),
                None => println!("> {} is not set", key),
            }
            Ok(())
        }
        Commands::Set { key, value, entry } => {
            let client = connect(&config, entry)?;
            let lookup = client.set(&key, Value::from(value.as_str())).await?;
            eprintln!("Data stored at {}", lookup.owner);
            Ok(())
        }
        Commands::Describe { entry } => {
            let client = connect(&config, entry)?;
            let summary = client.describe().await?;
            println!(
                "Node #{} at {} (ring size {}, {} routing, {} keys stored)",
                summary.id, summary.address, summary.ring_size, summary.routing, summary.stored_keys
            );
            println!("\tshift | start | address");
            for (index, finger) in summary.fingers.iter().enumerate() {
                println!("\t{:>5} | {:>5} | {}", index + 1, finger.start, finger.address);
            }
            Ok(())
        }
    }
}

fn connect(config: &RingConfig, entry: Option<u64>) -> Result<RingClient, Error> {
    let entry = match entry {
        Some(id) => NodeId(id),
        None => NodeId(rand::rng().random_range(0..config.ring_size)),
    };
    config.check_node(entry)?;
    Ok(RingClient::new(config, entry))
}
