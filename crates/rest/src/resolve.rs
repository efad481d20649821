//! Block identifier resolution.
//!
//! Callers name blocks either by a `0x`-prefixed 32-byte hash or by a decimal
//! height. Both forms end up as a [`BlockHash`] that every downstream query
//! uses as-is.

use blockgate_core::{BlockHash, BlockHeight, ChainClient};
use tracing::debug;

use crate::error::ApiError;

pub const HASH_HEX_LEN: usize = 66;

fn is_hex_shaped(id: &str) -> bool {
    id.strip_prefix("0x")
        .is_some_and(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_hexdigit()))
}

fn parse_height(id: &str) -> Option<BlockHeight> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    id.parse().ok()
}

/// Resolves `identifier` to a block hash; `None` means the finalized head.
///
/// Hashes are returned without asking the chain whether they exist. Heights
/// are looked up, and a failed lookup is reported as bad input when the
/// height is past the chain tip.
pub async fn resolve<C: ChainClient>(
    chain: &C,
    identifier: Option<&str>,
) -> Result<BlockHash, ApiError> {
    let Some(id) = identifier else {
        return chain
            .finalized_head()
            .await
            .map_err(|e| ApiError::internal(format!("Failed to get the finalized head: {e}")));
    };

    if is_hex_shaped(id) {
        if id.len() != HASH_HEX_LEN {
            return Err(ApiError::input(format!(
                "Cannot get block hash for {id}. Hex string block IDs must be 32-bytes (66-characters) in length."
            )));
        }

        return id.parse().map_err(|e| {
            ApiError::internal(format!("Failed to decode hex block ID {id}: {e}"))
        });
    }

    if id.starts_with("0x") {
        return Err(ApiError::input(format!(
            "Cannot get block hash for {id}. Hex string block IDs must be a valid hex string and must be 32-bytes (66-characters) in length."
        )));
    }

    let height = parse_height(id).ok_or_else(|| ApiError::input("Invalid block number"))?;

    match chain.block_hash(height).await {
        Ok(hash) => Ok(hash),
        Err(lookup) => {
            debug!(height, error = %lookup, "block hash lookup failed");

            let tip = chain.header(None).await.map_err(|e| {
                ApiError::internal(format!(
                    "Cannot get block hash for {id}: {lookup}; fetching the current header also failed: {e}"
                ))
            })?;

            if height > tip.number {
                return Err(ApiError::input(format!(
                    "Specified block number is larger than the current largest known block. The current largest known block is {}.",
                    tip.number
                )));
            }

            Err(ApiError::internal(format!(
                "Cannot get block hash for {id}: {lookup}"
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blockgate_testing::{toy_hash, FaultyToyChain, TestFault, ToyChain};
    use proptest::prelude::*;

    fn expect_input(result: Result<BlockHash, ApiError>) -> String {
        match result {
            Err(ApiError::Input { message }) => message,
            other => panic!("expected input error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn absent_identifier_is_finalized_head() {
        let chain = ToyChain::builder().best(50).finalized(40).build();

        let resolved = resolve(&chain, None).await.unwrap();

        assert_eq!(resolved, chain.finalized_head().await.unwrap());
        assert_eq!(resolved, toy_hash(40));
    }

    #[tokio::test]
    async fn finalized_head_failure_is_internal() {
        let chain = FaultyToyChain::new(ToyChain::default(), TestFault::FinalizedHeadError);

        let err = resolve(&chain, None).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal { .. }));
    }

    #[tokio::test]
    async fn full_hash_is_returned_without_chain_calls() {
        let chain = ToyChain::default();
        let id = format!("0x{}", "ab".repeat(32));

        let resolved = resolve(&chain, Some(&id)).await.unwrap();

        assert_eq!(resolved.to_string(), id);
        assert_eq!(chain.calls(), 0);
    }

    #[tokio::test]
    async fn short_hex_is_rejected() {
        let chain = ToyChain::default();

        let message = expect_input(resolve(&chain, Some("0xabc")).await);
        assert!(message.contains("32-bytes (66-characters)"));
    }

    #[tokio::test]
    async fn bare_prefix_is_rejected_as_hex() {
        let chain = ToyChain::default();

        let message = expect_input(resolve(&chain, Some("0x")).await);
        assert!(message.contains("valid hex string"));

        let message = expect_input(resolve(&chain, Some("0xzz")).await);
        assert!(message.contains("valid hex string"));
        assert_eq!(chain.calls(), 0);
    }

    #[tokio::test]
    async fn garbage_is_invalid_block_number() {
        let chain = ToyChain::default();

        for id in ["-1", "1.5", "abc", "", " 12", "+3", "99999999999999999999999"] {
            let message = expect_input(resolve(&chain, Some(id)).await);
            assert_eq!(message, "Invalid block number", "for input {id:?}");
        }
    }

    #[tokio::test]
    async fn finalized_height_is_inclusive() {
        let chain = ToyChain::builder().best(100).finalized(100).build();

        let resolved = resolve(&chain, Some("100")).await.unwrap();
        assert_eq!(resolved, toy_hash(100));
    }

    #[tokio::test]
    async fn height_past_tip_reports_largest_known_block() {
        let chain = ToyChain::builder().best(90).finalized(90).build();

        let message = expect_input(resolve(&chain, Some("12345678")).await);
        assert!(message.contains("current largest known block is 90."));
    }

    #[tokio::test]
    async fn lookup_failure_within_range_is_internal() {
        let chain = FaultyToyChain::new(ToyChain::default(), TestFault::BlockHashError);

        let err = resolve(&chain, Some("5")).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal { .. }));
    }

    #[tokio::test]
    async fn tip_lookup_failure_is_internal() {
        let chain = ToyChain::builder().best(10).finalized(10).build();
        let chain = FaultyToyChain::new(chain, TestFault::HeaderError);

        let err = resolve(&chain, Some("11")).await.unwrap_err();
        assert!(matches!(err, ApiError::Internal { .. }));
    }

    #[tokio::test]
    async fn uppercase_hash_is_normalized_to_lowercase() {
        let chain = ToyChain::default();
        let id = format!("0x{}", "AB".repeat(32));

        let resolved = resolve(&chain, Some(&id)).await.unwrap();

        assert_eq!(resolved, BlockHash::new([0xab; 32]));
        assert_eq!(resolved.to_string(), id.to_lowercase());
        assert_eq!(chain.calls(), 0);
    }

    #[tokio::test]
    async fn heights_between_finalized_and_best_resolve() {
        let chain = ToyChain::builder().best(120).finalized(100).build();

        let resolved = resolve(&chain, Some("110")).await.unwrap();
        assert_eq!(resolved, toy_hash(110));

        let message = expect_input(resolve(&chain, Some("121")).await);
        assert!(message.ends_with("The current largest known block is 120."));
    }

    fn block_on<F: std::future::Future>(future: F) -> F::Output {
        tokio::runtime::Builder::new_current_thread()
            .build()
            .expect("failed to build runtime")
            .block_on(future)
    }

    proptest! {
        #[test]
        fn any_full_hash_resolves_to_itself(bytes in any::<[u8; 32]>()) {
            let chain = ToyChain::default();
            let id = format!("0x{}", hex::encode(bytes));

            let resolved = block_on(resolve(&chain, Some(&id))).unwrap();

            prop_assert_eq!(resolved, BlockHash::new(bytes));
            prop_assert_eq!(chain.calls(), 0);
        }

        #[test]
        fn other_hex_lengths_are_input_errors(digits in "[0-9a-f]{1,80}") {
            prop_assume!(digits.len() != 64);
            let chain = ToyChain::default();
            let id = format!("0x{digits}");

            let result = block_on(resolve(&chain, Some(&id)));
            let is_input = matches!(result, Err(ApiError::Input { .. }));
            prop_assert!(is_input);
        }

        #[test]
        fn heights_up_to_finalized_resolve(height in 0u64..=100) {
            let chain = ToyChain::builder().best(100).finalized(100).build();

            let resolved = block_on(resolve(&chain, Some(&height.to_string()))).unwrap();
            prop_assert_eq!(resolved, toy_hash(height));
        }

        #[test]
        fn heights_past_tip_name_the_tip(height in 101u64..u64::MAX) {
            let chain = ToyChain::builder().best(100).finalized(100).build();

            let result = block_on(resolve(&chain, Some(&height.to_string())));
            match result {
                Err(ApiError::Input { message }) => prop_assert!(message.contains("100")),
                other => prop_assert!(false, "unexpected {:?}", other),
            }
        }
    }
}
