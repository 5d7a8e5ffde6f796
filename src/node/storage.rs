//! `zgs_*` storage RPCs

use serde::Deserialize;

use crate::error::Result;
use crate::provider::{invoke, rpc_params, ProviderHandle};
use crate::types::{base64_bytes, FileInfo, Hash, SegmentWithProof, ShardConfig, Status};

/// Raw segment bytes as returned by `zgs_downloadSegment`
#[derive(Deserialize)]
struct SegmentData(#[serde(with = "base64_bytes")] Vec<u8>);

/// Client for the storage node's `zgs_` namespace
#[derive(Clone)]
pub struct ZgsClient {
    provider: ProviderHandle,
}

impl ZgsClient {
    pub(crate) fn new(provider: ProviderHandle) -> Self {
        Self { provider }
    }

    /// Query the node's sync and network status
    ///
    /// # Example
    /// ```rust,no_run
    /// # use zgs_node_client::Client;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), zgs_node_client::Error> {
    /// let client = Client::new("http://localhost:5678")?;
    /// let status = client.zgs().get_status().await?;
    /// println!("Synced to block {}", status.log_sync_height);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn get_status(&self) -> Result<Status> {
        invoke(self.provider.as_ref(), "zgs_getStatus", rpc_params![]).await
    }

    /// Look up a file by its merkle root
    ///
    /// # Returns
    /// File metadata, or None if the node does not know the file
    pub async fn get_file_info(&self, root: Hash) -> Result<Option<FileInfo>> {
        invoke(self.provider.as_ref(), "zgs_getFileInfo", rpc_params![root]).await
    }

    /// Look up a file by the sequence number of its submission transaction
    pub async fn get_file_info_by_tx_seq(&self, tx_seq: u64) -> Result<Option<FileInfo>> {
        invoke(self.provider.as_ref(), "zgs_getFileInfoByTxSeq", rpc_params![tx_seq]).await
    }

    /// Upload one segment
    ///
    /// The proof must already be computed; it is forwarded as is.
    pub async fn upload_segment(&self, segment: &SegmentWithProof) -> Result<i64> {
        invoke(self.provider.as_ref(), "zgs_uploadSegment", rpc_params![segment]).await
    }

    /// Upload several segments in one call
    pub async fn upload_segments(&self, segments: &[SegmentWithProof]) -> Result<i64> {
        invoke(self.provider.as_ref(), "zgs_uploadSegments", rpc_params![segments]).await
    }

    /// Download the raw bytes of segments `[start_index, end_index)` of a file
    ///
    /// # Returns
    /// The data, or None when the node returned nothing. An empty buffer is
    /// never returned: zero-length data is reported as None.
    ///
    /// # Example
    /// ```rust,no_run
    /// # use zgs_node_client::{Client, Hash};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), zgs_node_client::Error> {
    /// # let client = Client::new("http://localhost:5678")?;
    /// let root: Hash = "0x0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef".parse()?;
    /// match client.zgs().download_segment(root, 0, 1).await? {
    ///     Some(data) => println!("Got {} bytes", data.len()),
    ///     None => println!("No data"),
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn download_segment(
        &self,
        root: Hash,
        start_index: u64,
        end_index: u64,
    ) -> Result<Option<Vec<u8>>> {
        let data: Option<SegmentData> = invoke(
            self.provider.as_ref(),
            "zgs_downloadSegment",
            rpc_params![root, start_index, end_index],
        )
        .await?;

        Ok(data.map(|d| d.0).filter(|d| !d.is_empty()))
    }

    /// Download one segment together with its inclusion proof
    pub async fn download_segment_with_proof(
        &self,
        root: Hash,
        index: u64,
    ) -> Result<Option<SegmentWithProof>> {
        invoke(
            self.provider.as_ref(),
            "zgs_downloadSegmentWithProof",
            rpc_params![root, index],
        )
        .await
    }

    /// Shard this node stores
    pub async fn get_shard_config(&self) -> Result<ShardConfig> {
        invoke(self.provider.as_ref(), "zgs_getShardConfig", rpc_params![]).await
    }
}
