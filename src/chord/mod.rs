pub mod config;
pub mod finger;
pub mod hash;
pub mod node;
pub mod routing;
pub mod store;
pub mod types;

#[cfg(test)]
mod tests;

// Reference deployment: 16 nodes listening on 8000..8015
pub const DEFAULT_RING_SIZE: u64 = 16;
pub const DEFAULT_BASE_PORT: u16 = 8000;
pub const DEFAULT_HOST: &str = "127.0.0.1";
