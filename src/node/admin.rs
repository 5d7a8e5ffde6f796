//! `admin_*` RPCs. These need the node's admin endpoint to be exposed.

use crate::error::Result;
use crate::provider::{invoke, rpc_params, ProviderHandle};

/// Client for the storage node's `admin_` namespace
#[derive(Clone)]
pub struct AdminClient {
    provider: ProviderHandle,
}

impl AdminClient {
    pub(crate) fn new(provider: ProviderHandle) -> Self {
        Self { provider }
    }

    /// Ask the node to terminate
    pub async fn shutdown(&self) -> Result<i64> {
        invoke(self.provider.as_ref(), "admin_shutdown", rpc_params![]).await
    }

    /// Trigger a sync of the file submitted in transaction `tx_seq`
    ///
    /// Progress is polled separately with [`AdminClient::get_sync_status`].
    pub async fn start_sync_file(&self, tx_seq: u64) -> Result<i64> {
        invoke(self.provider.as_ref(), "admin_startSyncFile", rpc_params![tx_seq]).await
    }

    /// Human-readable sync progress for transaction `tx_seq`
    pub async fn get_sync_status(&self, tx_seq: u64) -> Result<String> {
        invoke(self.provider.as_ref(), "admin_getSyncStatus", rpc_params![tx_seq]).await
    }
}
