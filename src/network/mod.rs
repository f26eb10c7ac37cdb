pub mod grpc;
pub mod messages;
pub mod node;
pub mod remote;
pub mod ring;
