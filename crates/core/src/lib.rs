use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};
use thiserror::Error;

pub mod balances;
pub mod config;
pub mod staking;
pub mod storage;

/// The height of a block (a.k.a. block number)
pub type BlockHeight = u64;

pub type Bytes = Vec<u8>;

/// A 32-byte hash as produced by the chain (block hashes, tx hashes, roots).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BlockHash([u8; 32]);

pub type TxHash = BlockHash;

impl BlockHash {
    pub const LEN: usize = 32;

    pub const fn new(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl From<[u8; 32]> for BlockHash {
    fn from(value: [u8; 32]) -> Self {
        Self(value)
    }
}

impl Display for BlockHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum HashParseError {
    #[error("missing 0x prefix")]
    MissingPrefix,

    #[error("invalid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

impl FromStr for BlockHash {
    type Err = HashParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").ok_or(HashParseError::MissingPrefix)?;
        let bytes = hex::decode(digits)?;

        let bytes: [u8; 32] =
            bytes
                .try_into()
                .map_err(|raw: Vec<u8>| HashParseError::InvalidLength {
                    expected: Self::LEN,
                    actual: raw.len(),
                })?;

        Ok(Self(bytes))
    }
}

impl Serialize for BlockHash {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for BlockHash {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = String::deserialize(deserializer)?;
        repr.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    pub parent_hash: BlockHash,
    pub number: BlockHeight,
    pub state_root: BlockHash,
    pub extrinsics_root: BlockHash,
    /// Hex-encoded digest log items, as reported by the node.
    pub digest_logs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    pub header: Header,
    pub extrinsics: Vec<Bytes>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RuntimeVersion {
    pub spec_name: String,
    pub impl_name: String,
    pub authoring_version: u32,
    pub spec_version: u32,
    pub impl_version: u32,
    pub transaction_version: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NodeVersion {
    pub chain: String,
    pub client_impl_name: String,
    pub client_version: String,
}

/// A fault reported while talking to the chain node.
///
/// These are raw faults; callers decide how each one is presented to the
/// outside world.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ChainError {
    #[error("no block known at height {0}")]
    UnknownBlock(BlockHeight),

    #[error("{message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<serde_json::Value>,
    },

    #[error("transport error: {message}")]
    Transport {
        status: Option<u16>,
        message: String,
    },

    #[error("unexpected response from node: {0}")]
    Decoding(String),
}

impl ChainError {
    pub fn decoding(value: impl Display) -> Self {
        Self::Decoding(value.to_string())
    }
}

/// The read/submit surface of a chain node that the gateway depends on.
///
/// Implementations must be cheap to clone and safe to use from many
/// concurrent requests.
#[trait_variant::make(Send)]
pub trait ChainClient: Clone + Send + Sync + 'static {
    /// Hash of the canonical block at `height`. Heights that the node has not
    /// produced yet fail with [`ChainError::UnknownBlock`].
    async fn block_hash(&self, height: BlockHeight) -> Result<BlockHash, ChainError>;

    async fn finalized_head(&self) -> Result<BlockHash, ChainError>;

    /// Header at `at`, or the best block header when `at` is `None`.
    async fn header(&self, at: Option<BlockHash>) -> Result<Header, ChainError>;

    async fn block(&self, at: BlockHash) -> Result<Block, ChainError>;

    async fn runtime_version(&self, at: BlockHash) -> Result<RuntimeVersion, ChainError>;

    async fn node_version(&self) -> Result<NodeVersion, ChainError>;

    async fn storage(
        &self,
        key: &storage::StorageKey,
        at: BlockHash,
    ) -> Result<Option<Bytes>, ChainError>;

    async fn submit_extrinsic(&self, extrinsic: &[u8]) -> Result<TxHash, ChainError>;
}

#[derive(Debug, Error)]
pub enum ServeError {
    #[error("failed to bind listener")]
    BindError(std::io::Error),

    #[error("failed to shutdown")]
    ShutdownError(std::io::Error),

    #[error(transparent)]
    Internal(#[from] Box<dyn std::error::Error + Send + Sync>),
}

#[trait_variant::make(Send)]
pub trait CancelToken: Send + Sync + 'static + Clone {
    async fn cancelled(&self);
}

#[trait_variant::make(Send)]
pub trait Driver<C: ChainClient, T: CancelToken>: Send + Sync + 'static {
    type Config: Clone;

    async fn run(config: Self::Config, chain: C, cancel: T) -> Result<(), ServeError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    const HASH: &str = "0x91b171bb158e2d3848fa23a9f1c25182fb8e20313b2c1eb49219da7a70ce90c3";

    #[test]
    fn hash_display_roundtrips_through_from_str() {
        let hash: BlockHash = HASH.parse().unwrap();
        assert_eq!(hash.to_string(), HASH);
    }

    #[test]
    fn hash_requires_prefix() {
        let err = HASH[2..].parse::<BlockHash>().unwrap_err();
        assert_eq!(err, HashParseError::MissingPrefix);
    }

    #[test]
    fn hash_requires_32_bytes() {
        let err = "0xabcd".parse::<BlockHash>().unwrap_err();
        assert_eq!(
            err,
            HashParseError::InvalidLength {
                expected: 32,
                actual: 2
            }
        );
    }

    #[test]
    fn hash_rejects_non_hex_digits() {
        let err = "0xzz".parse::<BlockHash>().unwrap_err();
        assert_eq!(
            err,
            HashParseError::InvalidHex(hex::FromHexError::InvalidHexCharacter { c: 'z', index: 0 })
        );
    }

    #[test]
    fn hash_serializes_as_prefixed_hex() {
        let hash: BlockHash = HASH.parse().unwrap();
        let json = serde_json::to_value(hash).unwrap();
        assert_eq!(json, serde_json::json!(HASH));
    }
}
