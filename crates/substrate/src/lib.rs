//! [`ChainClient`] backed by a Substrate node's HTTP JSON-RPC endpoint.

use std::time::Duration;

use blockgate_core::{
    config::ChainConfig, storage::StorageKey, Block, BlockHash, BlockHeight, Bytes, ChainClient,
    ChainError, Header, NodeVersion, RuntimeVersion, TxHash,
};
use serde_json::json;

mod rpc;
mod wire;

pub use rpc::RpcTransport;

#[derive(Clone)]
pub struct SubstrateClient {
    rpc: RpcTransport,
}

impl SubstrateClient {
    pub fn new(config: &ChainConfig) -> Result<Self, ChainError> {
        let timeout = config.request_timeout_secs.map(Duration::from_secs);
        let rpc = RpcTransport::new(&config.url, timeout)?;

        Ok(Self { rpc })
    }
}

impl ChainClient for SubstrateClient {
    async fn block_hash(&self, height: BlockHeight) -> Result<BlockHash, ChainError> {
        let hash: Option<BlockHash> = self.rpc.call("chain_getBlockHash", json!([height])).await?;

        hash.ok_or(ChainError::UnknownBlock(height))
    }

    async fn finalized_head(&self) -> Result<BlockHash, ChainError> {
        self.rpc.call("chain_getFinalizedHead", json!([])).await
    }

    async fn header(&self, at: Option<BlockHash>) -> Result<Header, ChainError> {
        let params = match at {
            Some(hash) => json!([hash]),
            None => json!([]),
        };

        let header: Option<wire::WireHeader> = self.rpc.call("chain_getHeader", params).await?;

        header
            .ok_or_else(|| ChainError::decoding("header not available"))?
            .try_into()
    }

    async fn block(&self, at: BlockHash) -> Result<Block, ChainError> {
        let signed: Option<wire::SignedBlock> =
            self.rpc.call("chain_getBlock", json!([at])).await?;

        let signed = signed.ok_or_else(|| ChainError::decoding(format!("block {at} not available")))?;

        let extrinsics = signed
            .block
            .extrinsics
            .iter()
            .map(|x| wire::decode_hex_bytes(x))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Block {
            header: signed.block.header.try_into()?,
            extrinsics,
        })
    }

    async fn runtime_version(&self, at: BlockHash) -> Result<RuntimeVersion, ChainError> {
        let version: wire::WireRuntimeVersion = self
            .rpc
            .call("state_getRuntimeVersion", json!([at]))
            .await?;

        Ok(version.into())
    }

    async fn node_version(&self) -> Result<NodeVersion, ChainError> {
        let (chain, client_impl_name, client_version) = futures_util::try_join!(
            self.rpc.call::<String>("system_chain", json!([])),
            self.rpc.call::<String>("system_name", json!([])),
            self.rpc.call::<String>("system_version", json!([])),
        )?;

        Ok(NodeVersion {
            chain,
            client_impl_name,
            client_version,
        })
    }

    async fn storage(&self, key: &StorageKey, at: BlockHash) -> Result<Option<Bytes>, ChainError> {
        let value: Option<String> = self
            .rpc
            .call("state_getStorage", json!([key.to_string(), at]))
            .await?;

        value.as_deref().map(wire::decode_hex_bytes).transpose()
    }

    async fn submit_extrinsic(&self, extrinsic: &[u8]) -> Result<TxHash, ChainError> {
        let encoded = format!("0x{}", hex::encode(extrinsic));

        self.rpc
            .call("author_submitExtrinsic", json!([encoded]))
            .await
    }
}
