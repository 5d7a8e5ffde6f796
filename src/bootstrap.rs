//! Startup helpers that terminate the process when a node cannot be connected
//!
//! Only for binaries resolving their configuration at startup. Library code
//! should use [`Client::new`] and handle the error.

use tracing::error;

use crate::client::Client;
use crate::provider::ProviderOptions;

/// Create a client for `url`, exiting with status 1 on failure
pub fn must_new_client(url: &str, options: ProviderOptions) -> Client {
    match Client::with_options(url, options) {
        Ok(client) => client,
        Err(e) => {
            error!(url, error = %e, "Failed to connect to storage node");
            std::process::exit(1);
        }
    }
}

/// Create one client per URL, exiting with status 1 on the first failure
pub fn must_new_clients<S: AsRef<str>>(urls: &[S], options: &ProviderOptions) -> Vec<Client> {
    urls.iter()
        .map(|url| must_new_client(url.as_ref(), options.clone()))
        .collect()
}
