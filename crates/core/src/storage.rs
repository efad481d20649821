//! Raw storage addressing for plain (non-map) pallet storage items.
//!
//! A plain storage item lives at `twox128(pallet) ++ twox128(item)`, where
//! `twox128` is two xxhash64 digests (seeds 0 and 1) concatenated little
//! endian.

use std::fmt::Display;

use parity_scale_codec::Decode;
use xxhash_rust::xxh64::xxh64;

use crate::{BlockHash, ChainClient, ChainError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(Vec<u8>);

impl StorageKey {
    pub fn plain(pallet: &str, item: &str) -> Self {
        let mut key = Vec::with_capacity(32);
        key.extend_from_slice(&twox128(pallet.as_bytes()));
        key.extend_from_slice(&twox128(item.as_bytes()));
        Self(key)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Display for StorageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "0x{}", hex::encode(&self.0))
    }
}

pub fn twox128(data: &[u8]) -> [u8; 16] {
    let mut out = [0u8; 16];
    out[..8].copy_from_slice(&xxh64(data, 0).to_le_bytes());
    out[8..].copy_from_slice(&xxh64(data, 1).to_le_bytes());
    out
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error("failed to decode {key}: {source}")]
    Decode {
        key: String,
        #[source]
        source: parity_scale_codec::Error,
    },
}

/// Reads and SCALE-decodes a plain storage item, `None` when the item is unset.
pub async fn fetch<C, T>(
    chain: &C,
    pallet: &str,
    item: &str,
    at: BlockHash,
) -> Result<Option<T>, StorageError>
where
    C: ChainClient,
    T: Decode,
{
    let key = StorageKey::plain(pallet, item);

    let Some(raw) = chain.storage(&key, at).await? else {
        return Ok(None);
    };

    let value = T::decode(&mut raw.as_slice()).map_err(|source| StorageError::Decode {
        key: format!("{pallet}.{item}"),
        source,
    })?;

    Ok(Some(value))
}

/// Same as [`fetch`], falling back to the type default for unset items.
pub async fn fetch_or_default<C, T>(
    chain: &C,
    pallet: &str,
    item: &str,
    at: BlockHash,
) -> Result<T, StorageError>
where
    C: ChainClient,
    T: Decode + Default,
{
    Ok(fetch(chain, pallet, item, at).await?.unwrap_or_default())
}
