//! JSON-RPC over HTTP(S) provider

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::header::{ACCEPT, CONTENT_TYPE};
use http_body_util::{BodyExt, Full};
use hyper::{Method, Request, StatusCode, Uri};
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::client::legacy::Client as HttpClient;
use hyper_util::rt::TokioExecutor;
use tracing::{debug, warn};

use super::{Provider, ProviderOptions, RpcRequest, RpcResponse};
use crate::error::{Error, Result};

type HttpsConnector = hyper_rustls::HttpsConnector<HttpConnector>;

/// Build a rustls ClientConfig trusting the webpki root store.
fn build_tls_config() -> Result<rustls::ClientConfig> {
    let provider = Arc::new(rustls::crypto::ring::default_provider());

    let mut roots = rustls::RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    Ok(rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| Error::Connection(format!("TLS setup failed: {}", e)))?
        .with_root_certificates(roots)
        .with_no_client_auth())
}

/// Whole milliseconds in `d`, saturating at `u64::MAX`
fn timeout_millis(d: Duration) -> u64 {
    u64::try_from(d.as_millis()).unwrap_or(u64::MAX)
}

/// Parse and validate an endpoint, accepting only `http://` and `https://`.
fn parse_endpoint(url: &str) -> Result<Uri> {
    let parsed = url::Url::parse(url)
        .map_err(|e| Error::Connection(format!("Invalid URL '{}': {}", url, e)))?;

    match parsed.scheme() {
        "http" | "https" => {}
        other => {
            return Err(Error::Connection(format!(
                "Unsupported URL scheme '{}' in '{}'",
                other, url
            )))
        }
    }

    parsed
        .as_str()
        .parse()
        .map_err(|e| Error::Connection(format!("Invalid URL '{}': {}", url, e)))
}

/// JSON-RPC 2.0 provider speaking HTTP/1.1 or HTTP/2 over plain TCP or TLS
///
/// Connections are pooled by the underlying hyper client. Request ids are
/// unique per provider, so one provider may serve any number of concurrent calls.
pub struct HttpProvider {
    url: String,
    uri: Uri,
    options: ProviderOptions,
    http_client: HttpClient<HttpsConnector, Full<Bytes>>,
    next_id: AtomicU64,
}

impl HttpProvider {
    /// Create a provider for `url`
    ///
    /// # Errors
    /// Returns [`Error::Connection`] if the URL is malformed, uses a scheme other
    /// than http/https, or TLS cannot be configured.
    pub fn new(url: &str, options: ProviderOptions) -> Result<Self> {
        let uri = parse_endpoint(url)?;
        let tls_config = build_tls_config()?;

        let https_connector = hyper_rustls::HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .enable_http2()
            .build();

        let http_client = HttpClient::builder(TokioExecutor::new())
            .pool_max_idle_per_host(options.max_idle_connections_per_host)
            .build(https_connector);

        Ok(Self {
            url: url.to_string(),
            uri,
            options,
            http_client,
            next_id: AtomicU64::new(1),
        })
    }

    /// Endpoint this provider posts to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Timeout, retry and pooling settings in effect
    pub fn options(&self) -> &ProviderOptions {
        &self.options
    }

    /// One HTTP exchange for an already-encoded request
    async fn send(&self, body: Bytes, id: u64) -> Result<serde_json::Value> {
        let req = Request::builder()
            .method(Method::POST)
            .uri(self.uri.clone())
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(Full::new(body))
            .map_err(|e| Error::Transport(format!("Failed to build request: {}", e)))?;

        let exchange = async {
            let response = self
                .http_client
                .request(req)
                .await
                .map_err(|e| Error::Transport(format!("Request failed: {}", e)))?;
            let status = response.status();
            let body = response
                .into_body()
                .collect()
                .await
                .map_err(|e| Error::Transport(format!("Failed to read response body: {}", e)))?
                .to_bytes();
            Ok::<(StatusCode, Bytes), Error>((status, body))
        };

        let (status, body) = match self.options.request_timeout {
            Some(timeout) => {
                tokio::time::timeout(timeout, exchange)
                    .await
                    .map_err(|_| Error::Timeout(timeout_millis(timeout)))??
            }
            None => exchange.await?,
        };

        if !status.is_success() {
            return Err(Error::Http {
                status: status.as_u16(),
                message: String::from_utf8_lossy(&body).trim().to_string(),
            });
        }

        let response: RpcResponse = serde_json::from_slice(&body)?;
        response.into_result(id)
    }
}

#[async_trait]
impl Provider for HttpProvider {
    async fn call(&self, method: &str, params: Vec<serde_json::Value>) -> Result<serde_json::Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let body = Bytes::from(serde_json::to_vec(&RpcRequest::new(id, method, &params))?);

        let mut attempt = 0;
        loop {
            debug!("Sending request: {} (id {})", method, id);
            match self.send(body.clone(), id).await {
                Err(e) if e.is_retryable() && attempt < self.options.retry_count => {
                    attempt += 1;
                    warn!(
                        "{} to {} failed: {}, retrying ({}/{})",
                        method, self.url, e, attempt, self.options.retry_count
                    );
                    tokio::time::sleep(self.options.retry_interval).await;
                }
                result => return result,
            }
        }
    }
}

impl fmt::Debug for HttpProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpProvider")
            .field("url", &self.url)
            .field("options", &self.options)
            .finish()
    }
}
