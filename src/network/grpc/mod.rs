pub mod client;
pub mod server;
pub mod thread;

pub use client::{GrpcRemote, RingGrpcClient};
pub use server::RingGrpcServer;
pub use thread::GrpcThread;
