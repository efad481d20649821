use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc,
};
use std::time::Duration;

use blockgate_core::ChainError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

#[derive(Serialize)]
struct Request<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Deserialize)]
struct RpcErrorObject {
    code: i64,
    message: String,
    #[serde(default)]
    data: Option<Value>,
}

#[derive(Deserialize)]
struct Response {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// Minimal JSON-RPC 2.0 transport over HTTP.
#[derive(Clone)]
pub struct RpcTransport {
    http: reqwest::Client,
    url: Arc<str>,
    next_id: Arc<AtomicU64>,
}

impl RpcTransport {
    pub fn new(url: &str, timeout: Option<Duration>) -> Result<Self, ChainError> {
        let mut builder = reqwest::Client::builder();

        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let http = builder.build().map_err(transport_error)?;

        Ok(Self {
            http,
            url: Arc::from(url),
            next_id: Arc::new(AtomicU64::new(1)),
        })
    }

    /// Issues a call and returns the raw `result` member, which may be `null`.
    pub async fn call_raw(&self, method: &str, params: Value) -> Result<Value, ChainError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        debug!(method, id, "rpc call");

        let request = Request {
            jsonrpc: "2.0",
            id,
            method,
            params,
        };

        let response = self
            .http
            .post(self.url.as_ref())
            .json(&request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();

        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(method, %status, "rpc http failure");

            return Err(ChainError::Transport {
                status: Some(status.as_u16()),
                message,
            });
        }

        let body: Response = response.json().await.map_err(ChainError::decoding)?;

        if let Some(error) = body.error {
            warn!(method, code = error.code, message = %error.message, "rpc error");

            return Err(ChainError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            });
        }

        Ok(body.result.unwrap_or(Value::Null))
    }

    pub async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Value,
    ) -> Result<T, ChainError> {
        let result = self.call_raw(method, params).await?;
        serde_json::from_value(result).map_err(ChainError::decoding)
    }
}

fn transport_error(err: reqwest::Error) -> ChainError {
    ChainError::Transport {
        status: err.status().map(|s| s.as_u16()),
        message: err.to_string(),
    }
}
