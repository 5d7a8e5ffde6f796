//! Namespace clients, one per RPC method prefix

pub mod admin;
pub mod kv;
pub mod storage;

pub use admin::AdminClient;
pub use kv::KvClient;
pub use storage::ZgsClient;
