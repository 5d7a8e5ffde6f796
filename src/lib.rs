//! Async JSON-RPC client for 0G storage and key-value nodes
//!
//! A [`Client`] is bound to one node URL and groups the node's remote
//! procedures by namespace:
//! - [`Client::zgs`] for file info, segment upload/download and shard config
//! - [`Client::admin`] for shutdown and file sync control
//! - [`Client::kv`] for key-value stream queries
//!
//! Calls go through a [`Provider`]; [`HttpProvider`] speaks JSON-RPC 2.0 over
//! HTTP(S). Any other transport can be plugged in with [`Client::with_provider`].
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use zgs_node_client::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), zgs_node_client::Error> {
//!     let client = Client::new("http://localhost:5678")?;
//!
//!     let status = client.zgs().get_status().await?;
//!     println!("Next tx seq: {}", status.next_tx_seq);
//!
//!     if let Some(info) = client.zgs().get_file_info_by_tx_seq(0).await? {
//!         println!("File root: {}", info.tx.data_merkle_root);
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2018_idioms)]

pub mod bootstrap;
pub mod client;
pub mod config;
pub mod error;
pub mod node;
pub mod provider;
pub mod types;

pub use client::Client;
pub use config::Config;
pub use error::{Error, Result};
pub use node::{AdminClient, KvClient, ZgsClient};
pub use provider::{HttpProvider, Provider, ProviderHandle, ProviderOptions};
pub use types::*;
