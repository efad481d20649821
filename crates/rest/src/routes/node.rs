use axum::{extract::State, routing::get};
use blockgate_core::ChainClient;
use serde::Serialize;

use crate::{
    controller::{Controller, Routes},
    error::ApiError,
    sanitize::SanitizedJson,
    Facade,
};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeVersionResponse {
    client_impl_name: String,
    client_version: String,
    chain: String,
}

pub async fn version<C: ChainClient>(
    State(facade): State<Facade<C>>,
) -> Result<SanitizedJson<NodeVersionResponse>, ApiError> {
    let version = facade.node_version().await.map_err(ApiError::upstream)?;

    Ok(SanitizedJson(NodeVersionResponse {
        client_impl_name: version.client_impl_name,
        client_version: version.client_version,
        chain: version.chain,
    }))
}

pub struct NodeController;

impl<C: ChainClient> Controller<C> for NodeController {
    fn base_path(&self) -> &'static str {
        "/node"
    }

    fn routes(&self) -> Routes<Facade<C>> {
        vec![("/version", get(version::<C>))]
    }
}
