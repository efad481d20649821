use crate::{
    storage::{self, StorageError},
    BlockHash, ChainClient,
};

/// Total issuance of the native token at `at`, in the chain's smallest unit.
pub async fn total_issuance<C: ChainClient>(chain: &C, at: BlockHash) -> Result<u128, StorageError> {
    storage::fetch_or_default::<_, u128>(chain, "Balances", "TotalIssuance", at).await
}
