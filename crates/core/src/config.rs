use std::net::SocketAddr;

use serde::{Deserialize, Serialize};
use serde_with::{serde_as, DisplayFromStr};

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ChainConfig {
    /// HTTP JSON-RPC endpoint of the node, e.g. `http://127.0.0.1:9933`.
    pub url: String,

    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            url: "http://127.0.0.1:9933".into(),
            request_timeout_secs: None,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RestConfig {
    pub listen_address: SocketAddr,
    pub permissive_cors: Option<bool>,

    /// Upper bound for the number of blocks served by a single range query.
    #[serde(default)]
    pub max_block_range: Option<u64>,
}

impl RestConfig {
    pub const DEFAULT_MAX_BLOCK_RANGE: u64 = 500;

    pub fn max_block_range(&self) -> u64 {
        self.max_block_range
            .unwrap_or(Self::DEFAULT_MAX_BLOCK_RANGE)
    }
}

impl Default for RestConfig {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from(([0, 0, 0, 0], 8080)),
            permissive_cors: None,
            max_block_range: None,
        }
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Debug)]
pub struct LoggingConfig {
    #[serde_as(as = "DisplayFromStr")]
    pub max_level: tracing::Level,

    #[serde(default)]
    pub include_http: bool,

    #[serde(default)]
    pub include_rpc: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            max_level: tracing::Level::INFO,
            include_http: Default::default(),
            include_rpc: Default::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Default, Debug)]
pub struct RootConfig {
    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub serve: RestConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}
