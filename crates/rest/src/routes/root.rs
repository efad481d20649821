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
pub struct RootResponse {
    name: &'static str,
    version: &'static str,
    routes: Vec<String>,
}

pub async fn naked<C: ChainClient>(
    State(facade): State<Facade<C>>,
) -> Result<SanitizedJson<RootResponse>, ApiError> {
    Ok(SanitizedJson(RootResponse {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        routes: facade.routes.paths().to_vec(),
    }))
}

pub struct RootController;

impl<C: ChainClient> Controller<C> for RootController {
    fn base_path(&self) -> &'static str {
        ""
    }

    fn routes(&self) -> Routes<Facade<C>> {
        vec![("", get(naked::<C>))]
    }
}
