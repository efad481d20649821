use axum::{extract::Request, Router, ServiceExt};
use serde::Serialize;
use std::{ops::Deref, sync::Arc};
use tower::Layer;
use tower_http::{cors::CorsLayer, normalize_path::NormalizePathLayer, trace};
use tracing::Level;

use blockgate_core::{
    config::RestConfig, BlockHash, BlockHeight, CancelToken, ChainClient, ServeError,
};

pub mod controller;
pub mod error;
pub mod guard;
pub mod normalize;
pub mod params;
pub mod resolve;
mod routes;
pub mod sanitize;

#[cfg(test)]
mod test_support;

pub use controller::{Controller, RouteTable};
pub use error::ApiError;
pub use sanitize::{sanitize, SanitizedJson};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct Facade<C: ChainClient> {
    pub inner: C,
    pub config: Arc<RestConfig>,
    pub routes: Arc<RouteTable>,
}

impl<C: ChainClient> Deref for Facade<C> {
    type Target = C;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Hash and height of the block a response was computed at.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AtBlock {
    pub hash: BlockHash,
    pub height: BlockHeight,
}

impl<C: ChainClient> Facade<C> {
    pub async fn resolve(&self, identifier: Option<&str>) -> Result<BlockHash, ApiError> {
        resolve::resolve(&self.inner, identifier).await
    }

    /// Resolves the `at` query parameter, defaulting to the finalized head.
    pub async fn resolve_at(&self, params: &params::AtParams) -> Result<BlockHash, ApiError> {
        self.resolve(params.at.as_deref()).await
    }

    pub async fn at_block(&self, hash: BlockHash) -> Result<AtBlock, ApiError> {
        let header = self
            .inner
            .header(Some(hash))
            .await
            .map_err(ApiError::upstream)?;

        Ok(AtBlock {
            hash,
            height: header.number,
        })
    }
}

pub fn build_router<C: ChainClient>(inner: C, config: RestConfig) -> Router {
    let controllers = routes::controllers::<C>();
    let table = RouteTable::of(&controllers);

    let facade = Facade {
        inner,
        config: Arc::new(config),
        routes: Arc::new(table),
    };

    controller::mount(&controllers).with_state(facade)
}

pub struct Driver;

impl<C: ChainClient, T: CancelToken> blockgate_core::Driver<C, T> for Driver {
    type Config = RestConfig;

    async fn run(cfg: Self::Config, chain: C, cancel: T) -> Result<(), ServeError> {
        let listen_address = cfg.listen_address;
        let permissive_cors = cfg.permissive_cors.unwrap_or_default();

        let app = build_router(chain, cfg)
            .layer(
                trace::TraceLayer::new_for_http()
                    .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(trace::DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(if permissive_cors {
                CorsLayer::permissive()
            } else {
                CorsLayer::new()
            });

        let app = NormalizePathLayer::trim_trailing_slash().layer(app);

        let listener = tokio::net::TcpListener::bind(listen_address)
            .await
            .map_err(ServeError::BindError)?;

        tracing::info!(address = %listen_address, "rest api listening");

        axum::serve(listener, ServiceExt::<Request>::into_make_service(app))
            .with_graceful_shutdown(async move { cancel.cancelled().await })
            .await
            .map_err(ServeError::ShutdownError)?;

        Ok(())
    }
}
