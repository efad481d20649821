//! Turns a classified [`ApiError`] into the HTTP status/body contract.
//!
//! Errors travel through an ordered chain of stages. The first stage that
//! recognizes the variant writes the response; anything left unmatched lands
//! on the default stage, which answers with the internal-error shape. Once a
//! response has been sent no stage may write again.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::{debug, error, warn};

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseState {
    Pending,
    Sent,
}

pub enum Flow {
    Handled(Response),
    Next,
}

pub trait ErrorMiddleware: Send + Sync {
    fn handle(&self, error: &ApiError, state: ResponseState) -> Flow;
}

pub struct InputErrors;

impl ErrorMiddleware for InputErrors {
    fn handle(&self, error: &ApiError, state: ResponseState) -> Flow {
        let ApiError::Input { message } = error else {
            return Flow::Next;
        };

        if state == ResponseState::Sent {
            return Flow::Next;
        }

        debug!(%message, "rejected request input");

        Flow::Handled(
            (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response(),
        )
    }
}

pub struct UpstreamBasicErrors;

impl ErrorMiddleware for UpstreamBasicErrors {
    fn handle(&self, error: &ApiError, state: ResponseState) -> Flow {
        let ApiError::UpstreamBasic {
            error: message,
            data,
            cause,
            ..
        } = error
        else {
            return Flow::Next;
        };

        if state == ResponseState::Sent {
            return Flow::Next;
        }

        let status = error.status();
        warn!(%status, %message, ?cause, "chain client fault");

        let body = json!({
            "error": message,
            "data": data,
            "cause": cause,
        });

        Flow::Handled((status, Json(body)).into_response())
    }
}

pub struct UpstreamTxErrors;

impl ErrorMiddleware for UpstreamTxErrors {
    fn handle(&self, error: &ApiError, state: ResponseState) -> Flow {
        let ApiError::UpstreamTx {
            error: message,
            data,
            cause,
            transaction,
            stack,
        } = error
        else {
            return Flow::Next;
        };

        if state == ResponseState::Sent {
            return Flow::Next;
        }

        warn!(%message, ?cause, "transaction rejected by chain client");

        let body = json!({
            "code": 500,
            "error": message,
            "data": data,
            "transaction": transaction,
            "cause": cause,
            "stack": stack,
        });

        Flow::Handled((StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response())
    }
}

pub struct InternalErrors;

impl ErrorMiddleware for InternalErrors {
    fn handle(&self, error: &ApiError, state: ResponseState) -> Flow {
        let ApiError::Internal { message } = error else {
            return Flow::Next;
        };

        if state == ResponseState::Sent {
            return Flow::Next;
        }

        error!(%message, "internal error");

        Flow::Handled(internal_response(message))
    }
}

fn internal_response(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}

pub static STANDARD_CHAIN: &[&dyn ErrorMiddleware] = &[
    &InputErrors,
    &UpstreamBasicErrors,
    &UpstreamTxErrors,
    &InternalErrors,
];

/// Runs `error` through `chain`. Returns `None` only when the response was
/// already sent.
pub fn run(
    chain: &[&dyn ErrorMiddleware],
    error: &ApiError,
    state: ResponseState,
) -> Option<Response> {
    for stage in chain {
        if let Flow::Handled(response) = stage.handle(error, state) {
            return Some(response);
        }
    }

    match state {
        ResponseState::Sent => None,
        ResponseState::Pending => {
            error!(%error, "unhandled error variant");
            Some(internal_response(&error.to_string()))
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match run(STANDARD_CHAIN, &self, ResponseState::Pending) {
            Some(response) => response,
            None => internal_response(&self.to_string()),
        }
    }
}
