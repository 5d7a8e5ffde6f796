//! JSON-RPC transport providers
//!
//! A [`Provider`] performs a single remote call given a method name and
//! positional parameters and hands back the raw JSON `result`. Namespace
//! clients share one provider through a [`ProviderHandle`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub mod http;

pub use http::HttpProvider;

/// Transport that executes JSON-RPC calls
#[async_trait]
pub trait Provider: Send + Sync {
    /// Execute `method` with positional `params`, returning the raw `result` value
    async fn call(&self, method: &str, params: Vec<serde_json::Value>) -> Result<serde_json::Value>;
}

/// Shared, read-only provider reference
pub type ProviderHandle = Arc<dyn Provider>;

/// Options interpreted by [`HttpProvider`]
#[derive(Debug, Clone)]
pub struct ProviderOptions {
    /// Per-request timeout (default: 30s). `None` waits indefinitely.
    pub request_timeout: Option<Duration>,
    /// Number of times a transport failure is retried (default: 0)
    pub retry_count: usize,
    /// Pause between retries (default: 1s)
    pub retry_interval: Duration,
    /// Maximum idle pooled connections kept per host (default: 32)
    pub max_idle_connections_per_host: usize,
}

impl Default for ProviderOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            retry_count: 0,
            retry_interval: Duration::from_secs(1),
            max_idle_connections_per_host: 32,
        }
    }
}

/// Build a positional parameter list, serializing each argument to JSON.
///
/// Must be used inside a function returning [`crate::Result`].
macro_rules! rpc_params {
    () => {
        Vec::<serde_json::Value>::new()
    };
    ($($arg:expr),+ $(,)?) => {
        vec![$(serde_json::to_value($arg)?),+]
    };
}
pub(crate) use rpc_params;

/// Call `method` and decode the result into `R`
pub(crate) async fn invoke<R: DeserializeOwned>(
    provider: &dyn Provider,
    method: &str,
    params: Vec<serde_json::Value>,
) -> Result<R> {
    let raw = provider.call(method, params).await?;
    Ok(serde_json::from_value(raw)?)
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Serialize)]
pub(crate) struct RpcRequest<'a> {
    pub jsonrpc: &'static str,
    pub id: u64,
    pub method: &'a str,
    pub params: &'a [serde_json::Value],
}

impl<'a> RpcRequest<'a> {
    pub fn new(id: u64, method: &'a str, params: &'a [serde_json::Value]) -> Self {
        Self {
            jsonrpc: "2.0",
            id,
            method,
            params,
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
pub(crate) struct RpcResponse {
    #[serde(default)]
    pub id: serde_json::Value,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<RpcErrorObject>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl RpcResponse {
    /// Check the response belongs to request `id` and extract its result
    ///
    /// Servers answer with a `null` id when they could not read the request
    /// (parse error, invalid request), so an error object carrying a `null`
    /// id still belongs to this call.
    pub fn into_result(self, id: u64) -> Result<serde_json::Value> {
        let expected = serde_json::Value::from(id);
        if let Some(err) = self.error {
            if self.id.is_null() || self.id == expected {
                return Err(Error::Rpc {
                    code: err.code,
                    message: err.message,
                    data: err.data,
                });
            }
        }
        if self.id != expected {
            return Err(Error::Transport(format!(
                "Response id {} does not match request id {}",
                self.id, id
            )));
        }
        Ok(self.result.unwrap_or(serde_json::Value::Null))
    }
}
