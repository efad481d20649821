use blockgate_core::{
    storage::StorageKey, Block, BlockHash, BlockHeight, Bytes, ChainClient, ChainError, Header,
    NodeVersion, RuntimeVersion, TxHash,
};

use crate::toy_chain::ToyChain;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TestFault {
    #[default]
    None,
    FinalizedHeadError,
    BlockHashError,
    HeaderError,
    StorageError,
    SubmitRejected,
    /// Every call fails at the HTTP level with the given status.
    NodeUnavailable(u16),
    /// Every call panics.
    Panic,
}

/// Wraps a [`ToyChain`] and injects the configured fault.
#[derive(Clone)]
pub struct FaultyToyChain {
    inner: ToyChain,
    fault: TestFault,
}

impl FaultyToyChain {
    pub fn new(inner: ToyChain, fault: TestFault) -> Self {
        Self { inner, fault }
    }

    fn check(&self, site: TestFault) -> Result<(), ChainError> {
        match self.fault {
            TestFault::None => Ok(()),
            TestFault::Panic => panic!("fault injection: chain client panicked"),
            TestFault::NodeUnavailable(status) => Err(ChainError::Transport {
                status: Some(status),
                message: "fault injection: node unavailable".into(),
            }),
            fault if fault == site => Err(self.fault_err()),
            _ => Ok(()),
        }
    }

    fn fault_err(&self) -> ChainError {
        match self.fault {
            TestFault::SubmitRejected => ChainError::Rpc {
                code: 1010,
                message: "Invalid Transaction".into(),
                data: Some(serde_json::json!("Inability to pay some fees (e.g. account balance too low)")),
            },
            _ => ChainError::Rpc {
                code: -32603,
                message: "fault injection: internal node error".into(),
                data: None,
            },
        }
    }
}

impl ChainClient for FaultyToyChain {
    async fn block_hash(&self, height: BlockHeight) -> Result<BlockHash, ChainError> {
        self.check(TestFault::BlockHashError)?;
        self.inner.block_hash(height).await
    }

    async fn finalized_head(&self) -> Result<BlockHash, ChainError> {
        self.check(TestFault::FinalizedHeadError)?;
        self.inner.finalized_head().await
    }

    async fn header(&self, at: Option<BlockHash>) -> Result<Header, ChainError> {
        self.check(TestFault::HeaderError)?;
        self.inner.header(at).await
    }

    async fn block(&self, at: BlockHash) -> Result<Block, ChainError> {
        self.check(TestFault::HeaderError)?;
        self.inner.block(at).await
    }

    async fn runtime_version(&self, at: BlockHash) -> Result<RuntimeVersion, ChainError> {
        self.check(TestFault::None)?;
        self.inner.runtime_version(at).await
    }

    async fn node_version(&self) -> Result<NodeVersion, ChainError> {
        self.check(TestFault::None)?;
        self.inner.node_version().await
    }

    async fn storage(&self, key: &StorageKey, at: BlockHash) -> Result<Option<Bytes>, ChainError> {
        self.check(TestFault::StorageError)?;
        self.inner.storage(key, at).await
    }

    async fn submit_extrinsic(&self, extrinsic: &[u8]) -> Result<TxHash, ChainError> {
        self.check(TestFault::SubmitRejected)?;
        self.inner.submit_extrinsic(extrinsic).await
    }
}
