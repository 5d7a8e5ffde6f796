//! Top-level storage node client

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::node::{AdminClient, KvClient, ZgsClient};
use crate::provider::{HttpProvider, ProviderHandle, ProviderOptions};

/// Client bound to a single storage or key-value node
///
/// Holds one provider handle shared by the `zgs`, `admin` and `kv` namespace
/// clients. Cloning is cheap and shares the same provider.
///
/// # Example
/// ```rust,no_run
/// use zgs_node_client::{Client, ProviderOptions};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() -> Result<(), zgs_node_client::Error> {
///     let client = Client::new("http://localhost:5678")?;
///
///     // Custom provider options
///     let client = Client::with_options("https://node.example.com", ProviderOptions {
///         request_timeout: Some(Duration::from_secs(10)),
///         retry_count: 3,
///         ..Default::default()
///     })?;
///
///     let config = client.zgs().get_shard_config().await?;
///     println!("Shard {}/{}", config.shard_id, config.num_shard);
///     Ok(())
/// }
/// ```
#[derive(Clone)]
pub struct Client {
    url: String,
    zgs: ZgsClient,
    admin: AdminClient,
    kv: KvClient,
}

impl Client {
    /// Create a client for `url` with default provider options
    ///
    /// # Errors
    /// Returns [`crate::Error::Connection`] if the provider cannot be built
    pub fn new(url: &str) -> Result<Self> {
        Self::with_options(url, ProviderOptions::default())
    }

    /// Create a client for `url` over an [`HttpProvider`] built from `options`
    pub fn with_options(url: &str, options: ProviderOptions) -> Result<Self> {
        let provider = HttpProvider::new(url, options)?;
        Ok(Self::with_provider(url, Arc::new(provider)))
    }

    /// Bind a client to an existing provider
    pub fn with_provider(url: &str, provider: ProviderHandle) -> Self {
        debug!("Creating client for {}", url);
        Self {
            url: url.to_string(),
            zgs: ZgsClient::new(provider.clone()),
            admin: AdminClient::new(provider.clone()),
            kv: KvClient::new(provider),
        }
    }

    /// Create one client per URL
    ///
    /// Fails as a whole on the first URL that cannot be connected; later URLs
    /// are not attempted. Connect individually for partial success.
    pub fn new_clients<S: AsRef<str>>(urls: &[S], options: ProviderOptions) -> Result<Vec<Self>> {
        Self::new_clients_with(urls, |url| {
            let provider: ProviderHandle = Arc::new(HttpProvider::new(url, options.clone())?);
            Ok(provider)
        })
    }

    /// Like [`Client::new_clients`], building each provider with `connect`
    pub fn new_clients_with<S, F>(urls: &[S], mut connect: F) -> Result<Vec<Self>>
    where
        S: AsRef<str>,
        F: FnMut(&str) -> Result<ProviderHandle>,
    {
        urls.iter()
            .map(|url| {
                let url = url.as_ref();
                connect(url).map(|provider| Self::with_provider(url, provider))
            })
            .collect()
    }

    /// The URL this client was created with
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Storage RPCs (`zgs_*`)
    pub fn zgs(&self) -> &ZgsClient {
        &self.zgs
    }

    /// Admin RPCs (`admin_*`)
    pub fn admin(&self) -> &AdminClient {
        &self.admin
    }

    /// Key-value RPCs (`kv_*`)
    pub fn kv(&self) -> &KvClient {
        &self.kv
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").field("url", &self.url).finish()
    }
}
