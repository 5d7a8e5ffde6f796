//! Request and response types exchanged with storage and key-value nodes

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

macro_rules! fixed_bytes {
    ($(#[$meta:meta])* $name:ident, $len:expr) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub [u8; $len]);

        impl $name {
            /// Length in bytes
            pub const LEN: usize = $len;

            /// Borrow the raw bytes
            pub fn as_bytes(&self) -> &[u8] {
                &self.0
            }
        }

        impl From<[u8; $len]> for $name {
            fn from(bytes: [u8; $len]) -> Self {
                Self(bytes)
            }
        }

        impl AsRef<[u8]> for $name {
            fn as_ref(&self) -> &[u8] {
                &self.0
            }
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let hex_str = s
                    .strip_prefix("0x")
                    .or_else(|| s.strip_prefix("0X"))
                    .unwrap_or(s);
                let bytes = hex::decode(hex_str)
                    .map_err(|e| Error::InvalidHex(format!("{}: {}", s, e)))?;
                if bytes.len() != $len {
                    return Err(Error::InvalidHex(format!(
                        "{} must be {} bytes, got {} bytes",
                        stringify!($name),
                        $len,
                        bytes.len()
                    )));
                }
                let mut arr = [0u8; $len];
                arr.copy_from_slice(&bytes);
                Ok(Self(arr))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "0x{}", hex::encode(self.0))
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(self, f)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.collect_str(self)
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

fixed_bytes!(
    /// 32-byte hash (file merkle roots, block hashes, stream ids)
    Hash,
    32
);

fixed_bytes!(
    /// 20-byte account or contract address
    Address,
    20
);

/// Serde adapter for byte payloads carried as standard base64 strings.
///
/// A `null` on the wire decodes as an empty buffer.
pub(crate) mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn encode(bytes: &[u8]) -> String {
        STANDARD.encode(bytes)
    }

    pub fn serialize<T, S>(bytes: &T, serializer: S) -> Result<S::Ok, S::Error>
    where
        T: AsRef<[u8]>,
        S: Serializer,
    {
        serializer.serialize_str(&encode(bytes.as_ref()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(s) => STANDARD.decode(s).map_err(serde::de::Error::custom),
            None => Ok(Vec::new()),
        }
    }
}

/// Node status returned by `zgs_getStatus`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Status {
    /// Number of connected peers
    pub connected_peers: u64,
    /// Latest block height the log sync has processed
    pub log_sync_height: u64,
    /// Hash of the latest synced block
    pub log_sync_block: Hash,
    /// Next transaction sequence the node expects
    pub next_tx_seq: u64,
    /// Network the node participates in
    #[serde(default)]
    pub network_identity: NetworkIdentity,
}

/// Network a node belongs to. Nodes only peer within the same identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkIdentity {
    /// EVM chain id of the log contract
    pub chain_id: u64,
    /// Address of the flow contract
    pub flow_address: Address,
    /// Version of the p2p protocol the node speaks
    pub p2p_protocol_version: NetworkProtocolVersion,
}

/// p2p protocol version
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkProtocolVersion {
    /// Major version
    pub major: u8,
    /// Minor version
    pub minor: u8,
    /// Build number
    pub build: u8,
}

/// A storage commitment submitted on chain
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Stream ids as reported by the node
    ///
    /// Nodes encode these 256-bit ids as `0x`-prefixed hex strings, which are
    /// kept verbatim. A bare JSON number is accepted too but only keeps full
    /// precision up to `u64::MAX`.
    #[serde(default)]
    pub stream_ids: Vec<serde_json::Value>,
    /// In-place data
    #[serde(with = "base64_bytes", default)]
    pub data: Vec<u8>,
    /// Merkle root of the submitted data
    pub data_merkle_root: Hash,
    /// Position of the first entry in the flow
    pub start_entry_index: u64,
    /// Data size in bytes
    pub size: u64,
    /// Transaction sequence number
    pub seq: u64,
}

/// File metadata returned by `zgs_getFileInfo` and `zgs_getFileInfoByTxSeq`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileInfo {
    /// Submission transaction of the file
    pub tx: Transaction,
    /// Whether every segment has been stored
    pub finalized: bool,
    /// Whether the data is held in the upload cache
    pub is_cached: bool,
    /// Number of segments uploaded so far
    pub uploaded_seg_num: u64,
    /// Whether the node has pruned the data
    #[serde(default)]
    pub pruned: bool,
}

/// Merkle inclusion proof for a segment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerkleProof {
    /// Hashes from the leaf to the root
    pub lemma: Vec<Hash>,
    /// Side of each step, `true` for left
    pub path: Vec<bool>,
}

/// Segment bytes together with the proof that they belong to `root`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentWithProof {
    /// File merkle root
    pub root: Hash,
    /// Raw segment bytes
    #[serde(with = "base64_bytes", default)]
    pub data: Vec<u8>,
    /// Segment index within the file
    pub index: u64,
    /// Inclusion proof for the segment
    pub proof: MerkleProof,
    /// Total file size in bytes
    pub file_size: u64,
}

/// Shard participation of a storage node
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardConfig {
    /// Index of the shard this node stores
    pub shard_id: u64,
    /// Total number of shards
    pub num_shard: u64,
}

/// Value of a key in a KV stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Value {
    /// Version at which the value was written
    pub version: u64,
    /// Requested slice of the value
    #[serde(with = "base64_bytes", default)]
    pub data: Vec<u8>,
    /// Full size of the value in bytes
    pub size: u64,
}

/// Key and value pair returned by KV iteration calls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// Version at which the value was written
    pub version: u64,
    /// Key bytes
    #[serde(with = "base64_bytes", default)]
    pub key: Vec<u8>,
    /// Requested slice of the value
    #[serde(with = "base64_bytes", default)]
    pub data: Vec<u8>,
    /// Full size of the value in bytes
    pub size: u64,
}
