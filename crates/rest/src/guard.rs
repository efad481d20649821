//! Per-route panic backstop.
//!
//! Handler failures are ordinary `Result`s that flow into the error pipeline
//! on their own. A panic is the one failure that would otherwise escape, so
//! every mounted route is wrapped with a layer that catches it and answers
//! through the same pipeline as an internal error.

use std::any::Any;

use axum::{
    response::{IntoResponse, Response},
    routing::MethodRouter,
};
use tower_http::catch_panic::CatchPanicLayer;
use tracing::error;

use crate::error::ApiError;

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else {
        "unknown panic payload".to_string()
    }
}

fn on_panic(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic_message(payload.as_ref());
    error!(%detail, "request handler panicked");

    ApiError::internal("Internal server error").into_response()
}

/// Wraps `route` so that a panic anywhere in its handler becomes an
/// internal-error response instead of tearing down the connection task.
pub fn guard<S>(route: MethodRouter<S>) -> MethodRouter<S>
where
    S: Clone + Send + Sync + 'static,
{
    route.layer(CatchPanicLayer::custom(on_panic))
}
