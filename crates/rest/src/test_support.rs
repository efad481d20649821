use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use blockgate_core::config::RestConfig;
use blockgate_testing::{FaultyToyChain, ToyChain};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::util::ServiceExt;

use crate::build_router;

pub use blockgate_testing::TestFault;

pub struct TestApp {
    router: Router,
    chain: ToyChain,
}

impl TestApp {
    pub fn new() -> Self {
        Self::new_with_fault(None)
    }

    pub fn new_with_fault(fault: Option<TestFault>) -> Self {
        Self::new_with_chain(ToyChain::default(), fault)
    }

    pub fn new_with_chain(chain: ToyChain, fault: Option<TestFault>) -> Self {
        let faulty = FaultyToyChain::new(chain.clone(), fault.unwrap_or_default());

        let cfg = RestConfig {
            listen_address: "[::]:0".parse().expect("invalid listen address"),
            permissive_cors: None,
            max_block_range: Some(10),
        };

        Self {
            router: build_router(faulty, cfg),
            chain,
        }
    }

    pub fn chain(&self) -> &ToyChain {
        &self.chain
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, Vec<u8>) {
        let res = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("request failed");

        let status = res.status();
        let bytes = res
            .into_body()
            .collect()
            .await
            .expect("failed to read response body")
            .to_bytes();

        (status, bytes.to_vec())
    }

    pub async fn get_bytes(&self, path: &str) -> (StatusCode, Vec<u8>) {
        let req = Request::builder()
            .method(Method::GET)
            .uri(path)
            .body(Body::empty())
            .expect("failed to build request");

        self.send(req).await
    }

    pub async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let (status, bytes) = self.get_bytes(path).await;
        let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "non-json body with status {status}: {}",
                String::from_utf8_lossy(&bytes)
            )
        });

        (status, body)
    }

    pub async fn post_json(&self, path: &str, body: &Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method(Method::POST)
            .uri(path)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .expect("failed to build request");

        let (status, bytes) = self.send(req).await;
        let body = serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            panic!(
                "non-json body with status {status}: {}",
                String::from_utf8_lossy(&bytes)
            )
        });

        (status, body)
    }
}

pub async fn assert_status(app: &TestApp, path: &str, expected: StatusCode) {
    let (status, bytes) = app.get_bytes(path).await;
    assert_eq!(
        status,
        expected,
        "unexpected status {status} with body: {}",
        String::from_utf8_lossy(&bytes)
    );
}
