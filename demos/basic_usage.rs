//! Basic usage example for the storage node client
//!
//! Run with: ZGS_NODE_URL=http://localhost:5678 cargo run --example basic_usage

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;
use zgs_node_client::Client;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let url = std::env::var("ZGS_NODE_URL").unwrap_or_else(|_| "http://localhost:5678".to_string());
    let client = Client::new(&url)?;

    info!("Querying status of {}...", client.url());
    let status = client.zgs().get_status().await?;
    info!(
        "Peers: {}, sync height: {}, next tx seq: {}",
        status.connected_peers, status.log_sync_height, status.next_tx_seq
    );

    let shard = client.zgs().get_shard_config().await?;
    info!("Shard {} of {}", shard.shard_id, shard.num_shard);

    // Walk back from the newest submitted file
    if let Some(seq) = status.next_tx_seq.checked_sub(1) {
        match client.zgs().get_file_info_by_tx_seq(seq).await? {
            Some(file) => {
                info!("Latest file: root {}, {} bytes", file.tx.data_merkle_root, file.tx.size);
                info!("Finalized: {}, uploaded segments: {}", file.finalized, file.uploaded_seg_num);

                match client.zgs().download_segment(file.tx.data_merkle_root, 0, 1).await? {
                    Some(data) => info!("First segment: {} bytes", data.len()),
                    None => info!("First segment not available"),
                }
            }
            None => info!("No file for tx seq {}", seq),
        }
    }

    info!("Example completed successfully!");
    Ok(())
}
