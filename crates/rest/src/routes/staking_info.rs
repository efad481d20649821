use axum::{extract::State, routing::get};
use blockgate_core::ChainClient;

use crate::{
    controller::{Controller, Routes},
    error::ApiError,
    params::ApiPath,
    routes::pallets::{staking_progress_at, StakingProgressResponse},
    sanitize::SanitizedJson,
    Facade,
};

/// Staking progress at a block named in the path rather than the query.
pub async fn by_block<C: ChainClient>(
    State(facade): State<Facade<C>>,
    ApiPath(number): ApiPath<String>,
) -> Result<SanitizedJson<StakingProgressResponse>, ApiError> {
    let hash = facade.resolve(Some(&number)).await?;
    Ok(SanitizedJson(staking_progress_at(&facade, hash).await?))
}

pub struct StakingInfoController;

impl<C: ChainClient> Controller<C> for StakingInfoController {
    fn base_path(&self) -> &'static str {
        "/staking-info"
    }

    fn routes(&self) -> Routes<Facade<C>> {
        vec![("/{number}", get(by_block::<C>))]
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use blockgate_testing::ToyChain;
    use serde_json::json;

    use crate::test_support::{assert_status, TestApp};

    #[tokio::test]
    async fn beyond_tip_is_bad_request() {
        let chain = ToyChain::builder().best(900).finalized(880).build();
        let app = TestApp::new_with_chain(chain, None);

        let (status, body) = app.get_json("/staking-info/12345678").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body,
            json!({
                "error": "Specified block number is larger than the current largest known block. The current largest known block is 900."
            })
        );
    }

    #[tokio::test]
    async fn short_hex_is_bad_request() {
        let app = TestApp::new();
        let (status, body) = app.get_json("/staking-info/0xabc").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"]
            .as_str()
            .unwrap()
            .contains("32-bytes (66-characters)"));
    }

    #[tokio::test]
    async fn known_height_reports_progress() {
        let app = TestApp::new();
        let (status, body) = app.get_json("/staking-info/99").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["at"]["height"], json!(99));
        assert_eq!(body["currentSessionIndex"], json!(0));
    }

    #[tokio::test]
    async fn non_numeric_is_bad_request() {
        let app = TestApp::new();
        assert_status(&app, "/staking-info/latest", StatusCode::BAD_REQUEST).await;
    }
}
