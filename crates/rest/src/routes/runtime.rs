use axum::{extract::State, routing::get};
use blockgate_core::ChainClient;
use serde::Serialize;

use crate::{
    controller::{Controller, Routes},
    error::ApiError,
    params::{ApiQuery, AtParams},
    sanitize::SanitizedJson,
    AtBlock, Facade,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuntimeSpec {
    at: AtBlock,
    spec_name: String,
    impl_name: String,
    authoring_version: u32,
    spec_version: u32,
    impl_version: u32,
    transaction_version: u32,
}

pub async fn spec<C: ChainClient>(
    State(facade): State<Facade<C>>,
    ApiQuery(params): ApiQuery<AtParams>,
) -> Result<SanitizedJson<RuntimeSpec>, ApiError> {
    let hash = facade.resolve_at(&params).await?;
    let at = facade.at_block(hash).await?;

    let version = facade
        .runtime_version(hash)
        .await
        .map_err(ApiError::upstream)?;

    Ok(SanitizedJson(RuntimeSpec {
        at,
        spec_name: version.spec_name,
        impl_name: version.impl_name,
        authoring_version: version.authoring_version,
        spec_version: version.spec_version,
        impl_version: version.impl_version,
        transaction_version: version.transaction_version,
    }))
}

pub struct RuntimeController;

impl<C: ChainClient> Controller<C> for RuntimeController {
    fn base_path(&self) -> &'static str {
        "/runtime"
    }

    fn routes(&self) -> Routes<Facade<C>> {
        vec![("/spec", get(spec::<C>))]
    }
}
