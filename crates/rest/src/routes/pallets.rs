use axum::{extract::State, routing::get};
use blockgate_core::{balances, staking, BlockHash, ChainClient};
use serde::Serialize;
use serde_with::{serde_as, DisplayFromStr};

use crate::{
    controller::{Controller, Routes},
    error::ApiError,
    params::{ApiQuery, AtParams},
    sanitize::SanitizedJson,
    AtBlock, Facade,
};

#[derive(Debug, Serialize)]
pub struct StakingProgressResponse {
    pub at: AtBlock,
    #[serde(flatten)]
    pub progress: staking::StakingProgress,
}

pub(crate) async fn staking_progress_at<C: ChainClient>(
    facade: &Facade<C>,
    hash: BlockHash,
) -> Result<StakingProgressResponse, ApiError> {
    let at = facade.at_block(hash).await?;

    let progress = staking::progress(&facade.inner, hash)
        .await
        .map_err(ApiError::storage)?;

    Ok(StakingProgressResponse { at, progress })
}

pub async fn staking_progress<C: ChainClient>(
    State(facade): State<Facade<C>>,
    ApiQuery(params): ApiQuery<AtParams>,
) -> Result<SanitizedJson<StakingProgressResponse>, ApiError> {
    let hash = facade.resolve_at(&params).await?;
    Ok(SanitizedJson(staking_progress_at(&facade, hash).await?))
}

#[serde_as]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalIssuanceResponse {
    at: AtBlock,

    /// Balances are always rendered as decimal strings, whatever their size.
    #[serde_as(as = "DisplayFromStr")]
    total_issuance: u128,
}

pub async fn total_issuance<C: ChainClient>(
    State(facade): State<Facade<C>>,
    ApiQuery(params): ApiQuery<AtParams>,
) -> Result<SanitizedJson<TotalIssuanceResponse>, ApiError> {
    let hash = facade.resolve_at(&params).await?;
    let at = facade.at_block(hash).await?;

    let total_issuance = balances::total_issuance(&facade.inner, hash)
        .await
        .map_err(ApiError::storage)?;

    Ok(SanitizedJson(TotalIssuanceResponse { at, total_issuance }))
}

pub struct PalletsController;

impl<C: ChainClient> Controller<C> for PalletsController {
    fn base_path(&self) -> &'static str {
        "/pallets"
    }

    fn routes(&self) -> Routes<Facade<C>> {
        vec![
            ("/staking/progress", get(staking_progress::<C>)),
            ("/balances/total-issuance", get(total_issuance::<C>)),
        ]
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use blockgate_testing::{toy_hash, ToyChain};
    use serde_json::json;

    use crate::test_support::{assert_status, TestApp, TestFault};

    fn staking_chain() -> ToyChain {
        ToyChain::builder()
            .with_storage_value("Staking", "ActiveEra", (7u32, Some(1_000u64)))
            .with_storage_value("Staking", "CurrentEra", 8u32)
            .with_storage_value("Staking", "ForceEra", 1u8)
            .with_storage_value("Staking", "ValidatorCount", 297u32)
            .with_storage_value("Session", "CurrentIndex", 41u32)
            .build()
    }

    #[tokio::test]
    async fn staking_progress_happy_path() {
        let app = TestApp::new_with_chain(staking_chain(), None);
        let (status, body) = app.get_json("/pallets/staking/progress?at=50").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "at": { "hash": toy_hash(50).to_string(), "height": 50 },
                "activeEra": 7,
                "activeEraStart": 1000,
                "currentEra": 8,
                "forceEra": "ForceNew",
                "validatorCount": 297,
                "currentSessionIndex": 41
            })
        );
    }

    #[tokio::test]
    async fn staking_progress_with_empty_storage() {
        let app = TestApp::new();
        let (status, body) = app.get_json("/pallets/staking/progress").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["activeEra"], json!(null));
        assert_eq!(body["forceEra"], json!("NotForcing"));
        assert_eq!(body["validatorCount"], json!(0));
    }

    #[tokio::test]
    async fn small_issuance_is_still_a_string() {
        let chain = ToyChain::builder()
            .with_storage_value("Balances", "TotalIssuance", 12_345u128)
            .build();

        let app = TestApp::new_with_chain(chain, None);
        let (status, body) = app.get_json("/pallets/balances/total-issuance").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalIssuance"], json!("12345"));
    }

    #[tokio::test]
    async fn large_issuance_becomes_string() {
        let issuance: u128 = 13_458_919_271_841_023_911_340_000;

        let chain = ToyChain::builder()
            .with_storage_value("Balances", "TotalIssuance", issuance)
            .build();

        let app = TestApp::new_with_chain(chain, None);
        let (status, body) = app.get_json("/pallets/balances/total-issuance").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["totalIssuance"], json!(issuance.to_string()));
    }

    #[tokio::test]
    async fn issuance_keeps_its_type_across_the_safe_boundary() {
        for issuance in [0u128, 9_007_199_254_740_991, 9_007_199_254_740_992] {
            let chain = ToyChain::builder()
                .with_storage_value("Balances", "TotalIssuance", issuance)
                .build();

            let app = TestApp::new_with_chain(chain, None);
            let (_, body) = app.get_json("/pallets/balances/total-issuance").await;

            assert_eq!(body["totalIssuance"], json!(issuance.to_string()));
        }
    }

    #[tokio::test]
    async fn undecodable_storage_is_internal() {
        let chain = ToyChain::builder()
            .with_raw_storage("Balances", "TotalIssuance", vec![0x01, 0x02])
            .build();

        let app = TestApp::new_with_chain(chain, None);
        let (status, body) = app.get_json("/pallets/balances/total-issuance").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("Balances.TotalIssuance"));
    }

    #[tokio::test]
    async fn storage_fault_is_upstream_error() {
        let app = TestApp::new_with_fault(Some(TestFault::StorageError));
        let (status, body) = app.get_json("/pallets/staking/progress").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["cause"], json!("RPC error -32603"));
    }

    #[tokio::test]
    async fn invalid_at_is_bad_request() {
        let app = TestApp::new();
        assert_status(
            &app,
            "/pallets/balances/total-issuance?at=ten",
            StatusCode::BAD_REQUEST,
        )
        .await;
    }
}
