use axum::{extract::State, routing::post};
use blockgate_core::{ChainClient, TxHash};
use serde::{Deserialize, Serialize};

use crate::{
    controller::{Controller, Routes},
    error::ApiError,
    params::ApiJson,
    sanitize::SanitizedJson,
    Facade,
};

#[derive(Debug, Deserialize)]
pub struct SubmitRequest {
    pub tx: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitResponse {
    pub hash: TxHash,
}

fn decode_tx(tx: &str) -> Result<Vec<u8>, ApiError> {
    let raw = tx.strip_prefix("0x").unwrap_or(tx);

    match hex::decode(raw) {
        Ok(bytes) if !bytes.is_empty() => Ok(bytes),
        _ => Err(ApiError::input(
            "Transaction must be a non-empty hex-encoded SCALE extrinsic.",
        )),
    }
}

pub async fn submit<C: ChainClient>(
    State(facade): State<Facade<C>>,
    ApiJson(request): ApiJson<SubmitRequest>,
) -> Result<SanitizedJson<SubmitResponse>, ApiError> {
    let extrinsic = decode_tx(&request.tx)?;

    let hash = facade
        .submit_extrinsic(&extrinsic)
        .await
        .map_err(|e| ApiError::upstream_tx(e, request.tx.clone()))?;

    tracing::debug!(%hash, "transaction submitted");

    Ok(SanitizedJson(SubmitResponse { hash }))
}

pub struct TransactionController;

impl<C: ChainClient> Controller<C> for TransactionController {
    fn base_path(&self) -> &'static str {
        "/transaction"
    }

    fn routes(&self) -> Routes<Facade<C>> {
        vec![("", post(submit::<C>))]
    }
}
