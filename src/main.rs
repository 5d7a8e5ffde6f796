use clap::{Args, Parser, Subcommand};
use serde_json::json;
use tracing::{error, info};

use zgs_node_client::bootstrap::must_new_clients;
use zgs_node_client::{Client, Config, Hash};

#[derive(Parser, Debug)]
#[command(author, version, about = "Query 0G storage nodes over JSON-RPC", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Node sync and network status
    Status,
    /// Shard this node stores
    ShardConfig,
    /// File metadata by root or by transaction sequence
    FileInfo(FileInfoArgs),
    /// Raw segment bytes, printed as hex
    Download {
        #[arg(long)]
        root: Hash,
        #[arg(long)]
        start: u64,
        #[arg(long)]
        end: u64,
    },
    /// One segment with its inclusion proof
    DownloadProof {
        #[arg(long)]
        root: Hash,
        #[arg(long)]
        index: u64,
    },
    /// Start syncing the file of a transaction
    SyncStart {
        #[arg(long)]
        tx_seq: u64,
    },
    /// Sync progress of a transaction's file
    SyncStatus {
        #[arg(long)]
        tx_seq: u64,
    },
    /// Ask the node to shut down
    Shutdown,
    /// KV streams held by the node
    KvStreams,
}

#[derive(Args, Debug)]
#[group(required = true, multiple = false)]
struct FileInfoArgs {
    #[arg(long)]
    root: Option<Hash>,
    #[arg(long)]
    tx_seq: Option<u64>,
}

async fn run(client: &Client, command: &Command) -> zgs_node_client::Result<serde_json::Value> {
    let zgs = client.zgs();
    let value = match command {
        Command::Status => serde_json::to_value(zgs.get_status().await?)?,
        Command::ShardConfig => serde_json::to_value(zgs.get_shard_config().await?)?,
        Command::FileInfo(FileInfoArgs { root: Some(root), .. }) => {
            serde_json::to_value(zgs.get_file_info(*root).await?)?
        }
        Command::FileInfo(FileInfoArgs { tx_seq, .. }) => {
            serde_json::to_value(zgs.get_file_info_by_tx_seq(tx_seq.unwrap_or_default()).await?)?
        }
        Command::Download { root, start, end } => {
            let data = zgs.download_segment(*root, *start, *end).await?;
            serde_json::to_value(data.map(hex::encode))?
        }
        Command::DownloadProof { root, index } => {
            serde_json::to_value(zgs.download_segment_with_proof(*root, *index).await?)?
        }
        Command::SyncStart { tx_seq } => client.admin().start_sync_file(*tx_seq).await?.into(),
        Command::SyncStatus { tx_seq } => client.admin().get_sync_status(*tx_seq).await?.into(),
        Command::Shutdown => client.admin().shutdown().await?.into(),
        Command::KvStreams => serde_json::to_value(client.kv().get_holding_stream_ids().await?)?,
    };
    Ok(value)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr, stdout carries the JSON results
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().map_err(|e| format!("Configuration error: {}", e))?;
    info!("Connecting to {} node(s)", config.node_urls.len());

    let clients = must_new_clients(&config.node_urls, &config.provider_options());

    let mut failed = 0;
    let mut results = Vec::with_capacity(clients.len());
    for client in &clients {
        match run(client, &cli.command).await {
            Ok(result) => results.push(json!({ "url": client.url(), "result": result })),
            Err(e) => {
                error!("{} failed: {}", client.url(), e);
                failed += 1;
                results.push(json!({ "url": client.url(), "error": e.to_string() }));
            }
        }
    }

    println!("{}", serde_json::to_string_pretty(&results)?);

    if failed > 0 {
        return Err(format!("{} of {} node(s) failed", failed, clients.len()).into());
    }
    Ok(())
}
