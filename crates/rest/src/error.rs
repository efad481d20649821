use axum::http::StatusCode;
use blockgate_core::{storage::StorageError, ChainError};
use serde_json::Value;
use thiserror::Error;

/// A failure that has already been classified.
///
/// Values are built once, close to where the fault happened, and are only
/// interpreted again by the normalization pipeline in [`crate::normalize`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ApiError {
    /// Malformed or out-of-range caller input.
    #[error("{message}")]
    Input { message: String },

    /// The chain client reported a fault unrelated to transaction submission.
    #[error("{error}")]
    UpstreamBasic {
        status: Option<StatusCode>,
        error: String,
        data: Option<Value>,
        cause: Option<String>,
    },

    /// The chain client faulted while accepting a transaction.
    #[error("{error}")]
    UpstreamTx {
        error: String,
        data: Option<Value>,
        cause: Option<String>,
        transaction: String,
        stack: String,
    },

    #[error("{message}")]
    Internal { message: String },
}

impl ApiError {
    pub fn input(message: impl Into<String>) -> Self {
        Self::Input {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn upstream(error: ChainError) -> Self {
        match error {
            ChainError::Rpc {
                code,
                message,
                data,
            } => Self::UpstreamBasic {
                status: None,
                error: message,
                data,
                cause: Some(format!("RPC error {code}")),
            },
            ChainError::Transport { status, message } => Self::UpstreamBasic {
                status: status.and_then(|x| StatusCode::from_u16(x).ok()),
                error: "Unable to reach the chain node".into(),
                data: None,
                cause: Some(message),
            },
            ChainError::Decoding(message) => Self::UpstreamBasic {
                status: None,
                error: "Unexpected response from the chain node".into(),
                data: None,
                cause: Some(message),
            },
            e @ ChainError::UnknownBlock(_) => Self::UpstreamBasic {
                status: None,
                error: e.to_string(),
                data: None,
                cause: None,
            },
        }
    }

    /// Classifies a failed submission of `transaction` (hex encoded).
    pub fn upstream_tx(error: ChainError, transaction: impl Into<String>) -> Self {
        let stack = format!("{error:?}");

        let (data, cause) = match &error {
            ChainError::Rpc { data, message, .. } => (data.clone(), Some(message.clone())),
            other => (None, Some(other.to_string())),
        };

        Self::UpstreamTx {
            error: "Failed to submit transaction.".into(),
            data,
            cause,
            transaction: transaction.into(),
            stack,
        }
    }

    /// Domain queries built on raw storage: chain faults are upstream, a
    /// value we cannot decode is ours.
    pub fn storage(error: StorageError) -> Self {
        match error {
            StorageError::Chain(e) => Self::upstream(e),
            e @ StorageError::Decode { .. } => Self::internal(e.to_string()),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Input { .. } => StatusCode::BAD_REQUEST,
            Self::UpstreamBasic { status, .. } => {
                status.unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
            }
            Self::UpstreamTx { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn transport_status_passes_through() {
        let err = ApiError::upstream(ChainError::Transport {
            status: Some(503),
            message: "syncing".into(),
        });

        assert_eq!(err.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[test]
    fn upstream_without_status_is_500() {
        let err = ApiError::upstream(ChainError::Rpc {
            code: -32000,
            message: "boom".into(),
            data: None,
        });

        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "boom");
    }

    #[test]
    fn tx_errors_keep_rpc_diagnostics() {
        let err = ApiError::upstream_tx(
            ChainError::Rpc {
                code: 1010,
                message: "Invalid Transaction".into(),
                data: Some(json!("Inability to pay some fees")),
            },
            "0x0102",
        );

        let ApiError::UpstreamTx {
            data,
            cause,
            transaction,
            stack,
            ..
        } = err
        else {
            panic!("expected tx error");
        };

        assert_eq!(data, Some(json!("Inability to pay some fees")));
        assert_eq!(cause.as_deref(), Some("Invalid Transaction"));
        assert_eq!(transaction, "0x0102");
        assert!(stack.contains("1010"));
    }

    #[test]
    fn undecodable_storage_is_internal() {
        let decode = parity_scale_codec::Error::from("not enough data");
        let err = ApiError::storage(StorageError::Decode {
            key: "Staking.ForceEra".into(),
            source: decode,
        });

        assert!(matches!(err, ApiError::Internal { .. }));
    }
}
