//! `kv_*` RPCs served by key-value nodes
//!
//! Every query accepts an optional `version`. When it is `None` the parameter
//! is left off the call entirely and the node answers at its latest version.

use crate::error::Result;
use crate::provider::{invoke, rpc_params, ProviderHandle};
use crate::types::{base64_bytes, Address, Hash, KeyValue, Value};

/// Append the optional trailing version parameter
fn with_version(
    mut params: Vec<serde_json::Value>,
    version: Option<u64>,
) -> Vec<serde_json::Value> {
    if let Some(version) = version {
        params.push(version.into());
    }
    params
}

/// Client for the `kv_` namespace
#[derive(Clone)]
pub struct KvClient {
    provider: ProviderHandle,
}

impl KvClient {
    pub(crate) fn new(provider: ProviderHandle) -> Self {
        Self { provider }
    }

    /// Read `length` bytes of the value stored under `key`, starting at `start_index`
    ///
    /// # Returns
    /// The value slice, or None if the key does not exist in the stream
    pub async fn get_value(
        &self,
        stream_id: Hash,
        key: &[u8],
        start_index: u64,
        length: u64,
        version: Option<u64>,
    ) -> Result<Option<Value>> {
        let params = rpc_params![stream_id, base64_bytes::encode(key), start_index, length];
        invoke(self.provider.as_ref(), "kv_getValue", with_version(params, version)).await
    }

    /// First key after `key` in the stream (or `key` itself when `inclusive`)
    pub async fn get_next(
        &self,
        stream_id: Hash,
        key: &[u8],
        start_index: u64,
        length: u64,
        inclusive: bool,
        version: Option<u64>,
    ) -> Result<Option<KeyValue>> {
        let params = rpc_params![stream_id, base64_bytes::encode(key), start_index, length, inclusive];
        invoke(self.provider.as_ref(), "kv_getNext", with_version(params, version)).await
    }

    /// Last key before `key` in the stream (or `key` itself when `inclusive`)
    pub async fn get_prev(
        &self,
        stream_id: Hash,
        key: &[u8],
        start_index: u64,
        length: u64,
        inclusive: bool,
        version: Option<u64>,
    ) -> Result<Option<KeyValue>> {
        let params = rpc_params![stream_id, base64_bytes::encode(key), start_index, length, inclusive];
        invoke(self.provider.as_ref(), "kv_getPrev", with_version(params, version)).await
    }

    /// First key in the stream
    pub async fn get_first(
        &self,
        stream_id: Hash,
        start_index: u64,
        length: u64,
        version: Option<u64>,
    ) -> Result<Option<KeyValue>> {
        let params = rpc_params![stream_id, start_index, length];
        invoke(self.provider.as_ref(), "kv_getFirst", with_version(params, version)).await
    }

    /// Last key in the stream
    pub async fn get_last(
        &self,
        stream_id: Hash,
        start_index: u64,
        length: u64,
        version: Option<u64>,
    ) -> Result<Option<KeyValue>> {
        let params = rpc_params![stream_id, start_index, length];
        invoke(self.provider.as_ref(), "kv_getLast", with_version(params, version)).await
    }

    /// Outcome of the KV transaction with sequence `tx_seq`, None if not yet processed
    pub async fn get_transaction_result(&self, tx_seq: u64) -> Result<Option<String>> {
        invoke(self.provider.as_ref(), "kv_getTransactionResult", rpc_params![tx_seq]).await
    }

    /// Streams this node maintains
    pub async fn get_holding_stream_ids(&self) -> Result<Vec<Hash>> {
        invoke(self.provider.as_ref(), "kv_getHoldingStreamIds", rpc_params![]).await
    }

    /// Whether `account` may write `key` in the stream
    pub async fn has_write_permission(
        &self,
        account: Address,
        stream_id: Hash,
        key: &[u8],
        version: Option<u64>,
    ) -> Result<bool> {
        let params = rpc_params![account, stream_id, base64_bytes::encode(key)];
        invoke(self.provider.as_ref(), "kv_hasWritePermission", with_version(params, version)).await
    }

    /// Whether `account` administers the stream
    pub async fn is_admin(
        &self,
        account: Address,
        stream_id: Hash,
        version: Option<u64>,
    ) -> Result<bool> {
        let params = rpc_params![account, stream_id];
        invoke(self.provider.as_ref(), "kv_isAdmin", with_version(params, version)).await
    }

    /// Whether `key` has its own access control in the stream
    pub async fn is_special_key(
        &self,
        stream_id: Hash,
        key: &[u8],
        version: Option<u64>,
    ) -> Result<bool> {
        let params = rpc_params![stream_id, base64_bytes::encode(key)];
        invoke(self.provider.as_ref(), "kv_isSpecialKey", with_version(params, version)).await
    }

    /// Whether `account` was granted write access to `key` specifically
    pub async fn is_writer_of_key(
        &self,
        account: Address,
        stream_id: Hash,
        key: &[u8],
        version: Option<u64>,
    ) -> Result<bool> {
        let params = rpc_params![account, stream_id, base64_bytes::encode(key)];
        invoke(self.provider.as_ref(), "kv_isWriterOfKey", with_version(params, version)).await
    }

    /// Whether `account` may write any key in the stream
    pub async fn is_writer_of_stream(
        &self,
        account: Address,
        stream_id: Hash,
        version: Option<u64>,
    ) -> Result<bool> {
        let params = rpc_params![account, stream_id];
        invoke(self.provider.as_ref(), "kv_isWriterOfStream", with_version(params, version)).await
    }
}
