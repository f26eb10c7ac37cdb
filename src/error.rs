use thiserror::Error;
use tonic::{Code, Status};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Network error: {0}")]
    Network(#[from] NetworkError),

    #[error("Chord protocol error: {0}")]
    Chord(#[from] ChordError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

#[derive(Error, Debug)]
pub enum NetworkError {
    #[error("Failed to bind {0}")]
    Bind(String),

    #[error("gRPC error: {0}")]
    Grpc(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChordError {
    #[error("Invalid key: {0}")]
    InvalidKeyKind(String),

    #[error("Routing failure: {0}")]
    RoutingFailure(String),

    #[error("Owner unresolved: {0}")]
    OwnerUnresolved(String),

    #[error("Hop limit exceeded: {0}")]
    HopLimitExceeded(String),
}

impl ChordError {
    /// The message carried by the error, without the kind prefix.
    pub fn detail(&self) -> &str {
        match self {
            ChordError::InvalidKeyKind(msg)
            | ChordError::RoutingFailure(msg)
            | ChordError::OwnerUnresolved(msg)
            | ChordError::HopLimitExceeded(msg) => msg,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Ring size must be a power of two, got {0}")]
    RingSize(u64),

    #[error("Ports {base}..{base}+{size} do not fit in the port range")]
    PortRange { base: u16, size: u64 },

    #[error("Node id {id} is outside the ring [0, {size})")]
    NodeOutOfRange { id: u64, size: u64 },

    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] serde_json::Error),
}

// The status code carries the error kind across hops so every node on the
// path hands the original failure back unchanged.
impl From<ChordError> for Status {
    fn from(err: ChordError) -> Self {
        match err {
            ChordError::InvalidKeyKind(msg) => Status::invalid_argument(msg),
            ChordError::RoutingFailure(msg) => Status::unavailable(msg),
            ChordError::OwnerUnresolved(msg) => Status::failed_precondition(msg),
            ChordError::HopLimitExceeded(msg) => Status::resource_exhausted(msg),
        }
    }
}

impl From<Status> for ChordError {
    fn from(status: Status) -> Self {
        let msg = status.message().to_string();
        match status.code() {
            Code::InvalidArgument => ChordError::InvalidKeyKind(msg),
            Code::Unavailable => ChordError::RoutingFailure(msg),
            Code::FailedPrecondition => ChordError::OwnerUnresolved(msg),
            Code::ResourceExhausted => ChordError::HopLimitExceeded(msg),
            code => ChordError::RoutingFailure(format!("{:?}: {}", code, msg)),
        }
    }
}

impl From<NetworkError> for ChordError {
    fn from(err: NetworkError) -> Self {
        ChordError::RoutingFailure(err.to_string())
    }
}
