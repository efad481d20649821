//! Staking progress summary assembled from raw `Staking` and `Session`
//! pallet storage.

use parity_scale_codec::Decode;
use serde::Serialize;

use crate::{
    storage::{self, StorageError},
    BlockHash, ChainClient,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Decode)]
pub struct ActiveEraInfo {
    pub index: u32,
    /// Unix time in milliseconds at which the era started.
    pub start: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Decode, Serialize)]
pub enum Forcing {
    #[default]
    NotForcing,
    ForceNew,
    ForceNone,
    ForceAlways,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingProgress {
    pub active_era: Option<u32>,
    pub active_era_start: Option<u64>,
    pub current_era: Option<u32>,
    pub force_era: Forcing,
    pub validator_count: u32,
    pub current_session_index: u32,
}

pub async fn progress<C: ChainClient>(
    chain: &C,
    at: BlockHash,
) -> Result<StakingProgress, StorageError> {
    let (active_era, current_era, force_era, validator_count, current_session_index) = futures_util::try_join!(
        storage::fetch::<_, ActiveEraInfo>(chain, "Staking", "ActiveEra", at),
        storage::fetch::<_, u32>(chain, "Staking", "CurrentEra", at),
        storage::fetch_or_default::<_, Forcing>(chain, "Staking", "ForceEra", at),
        storage::fetch_or_default::<_, u32>(chain, "Staking", "ValidatorCount", at),
        storage::fetch_or_default::<_, u32>(chain, "Session", "CurrentIndex", at),
    )?;

    Ok(StakingProgress {
        active_era: active_era.map(|x| x.index),
        active_era_start: active_era.and_then(|x| x.start),
        current_era,
        force_era,
        validator_count,
        current_session_index,
    })
}
