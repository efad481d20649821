use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use blockgate_core::{
    storage::StorageKey, Block, BlockHash, BlockHeight, Bytes, ChainClient, ChainError, Header,
    NodeVersion, RuntimeVersion, TxHash,
};
use parity_scale_codec::Encode;

/// Deterministic hash for the toy block at `height`.
pub fn toy_hash(height: BlockHeight) -> BlockHash {
    let mut bytes = [0xab; 32];
    bytes[..8].copy_from_slice(&height.to_be_bytes());
    BlockHash::new(bytes)
}

fn toy_root(height: BlockHeight, tag: u8) -> BlockHash {
    let mut bytes = [tag; 32];
    bytes[24..].copy_from_slice(&height.to_be_bytes());
    BlockHash::new(bytes)
}

fn unknown_hash(hash: &BlockHash) -> ChainError {
    ChainError::Rpc {
        code: 4003,
        message: format!("Client error: UnknownBlock: header not found for {hash}"),
        data: None,
    }
}

struct ToyChainState {
    headers: Vec<Header>,
    by_hash: HashMap<BlockHash, BlockHeight>,
    finalized: BlockHeight,
    storage: HashMap<StorageKey, Bytes>,
    runtime: RuntimeVersion,
    node: NodeVersion,
    submitted: Mutex<Vec<Bytes>>,
}

/// In-memory chain with a linear history of empty-ish blocks.
#[derive(Clone)]
pub struct ToyChain {
    state: Arc<ToyChainState>,
    calls: Arc<AtomicUsize>,
}

pub struct ToyChainBuilder {
    best: BlockHeight,
    finalized: BlockHeight,
    storage: HashMap<StorageKey, Bytes>,
}

impl Default for ToyChainBuilder {
    fn default() -> Self {
        Self {
            best: 120,
            finalized: 100,
            storage: HashMap::new(),
        }
    }
}

impl ToyChainBuilder {
    pub fn best(mut self, height: BlockHeight) -> Self {
        self.best = height;
        self
    }

    pub fn finalized(mut self, height: BlockHeight) -> Self {
        self.finalized = height;
        self
    }

    pub fn with_storage_value(mut self, pallet: &str, item: &str, value: impl Encode) -> Self {
        self.storage
            .insert(StorageKey::plain(pallet, item), value.encode());
        self
    }

    pub fn with_raw_storage(mut self, pallet: &str, item: &str, raw: Bytes) -> Self {
        self.storage.insert(StorageKey::plain(pallet, item), raw);
        self
    }

    pub fn build(self) -> ToyChain {
        let finalized = self.finalized.min(self.best);

        let headers: Vec<_> = (0..=self.best)
            .map(|number| Header {
                parent_hash: number
                    .checked_sub(1)
                    .map(toy_hash)
                    .unwrap_or(BlockHash::new([0; 32])),
                number,
                state_root: toy_root(number, 0x5a),
                extrinsics_root: toy_root(number, 0xe7),
                digest_logs: vec![format!("0x0642414245{:02x}", number % 256)],
            })
            .collect();

        let by_hash = (0..=self.best).map(|n| (toy_hash(n), n)).collect();

        let state = ToyChainState {
            headers,
            by_hash,
            finalized,
            storage: self.storage,
            runtime: RuntimeVersion {
                spec_name: "toy".into(),
                impl_name: "toy-node".into(),
                authoring_version: 1,
                spec_version: 9430,
                impl_version: 0,
                transaction_version: 24,
            },
            node: NodeVersion {
                chain: "Toy Testnet".into(),
                client_impl_name: "Toy Node".into(),
                client_version: "1.0.0-test".into(),
            },
            submitted: Mutex::new(vec![]),
        };

        ToyChain {
            state: Arc::new(state),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl Default for ToyChain {
    fn default() -> Self {
        ToyChainBuilder::default().build()
    }
}

impl ToyChain {
    pub fn builder() -> ToyChainBuilder {
        ToyChainBuilder::default()
    }

    /// Number of chain client calls served so far, across all clones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn best_height(&self) -> BlockHeight {
        self.state.headers.len() as BlockHeight - 1
    }

    pub fn finalized_height(&self) -> BlockHeight {
        self.state.finalized
    }

    pub fn submitted(&self) -> Vec<Bytes> {
        self.state
            .submitted
            .lock()
            .map(|x| x.clone())
            .unwrap_or_default()
    }

    fn track(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn lookup(&self, hash: &BlockHash) -> Result<&Header, ChainError> {
        self.state
            .by_hash
            .get(hash)
            .and_then(|n| self.state.headers.get(*n as usize))
            .ok_or_else(|| unknown_hash(hash))
    }
}

impl ChainClient for ToyChain {
    async fn block_hash(&self, height: BlockHeight) -> Result<BlockHash, ChainError> {
        self.track();

        if height > self.best_height() {
            return Err(ChainError::UnknownBlock(height));
        }

        Ok(toy_hash(height))
    }

    async fn finalized_head(&self) -> Result<BlockHash, ChainError> {
        self.track();
        Ok(toy_hash(self.state.finalized))
    }

    async fn header(&self, at: Option<BlockHash>) -> Result<Header, ChainError> {
        self.track();

        match at {
            Some(hash) => self.lookup(&hash).cloned(),
            None => self
                .state
                .headers
                .last()
                .cloned()
                .ok_or_else(|| ChainError::decoding("empty chain")),
        }
    }

    async fn block(&self, at: BlockHash) -> Result<Block, ChainError> {
        self.track();

        let header = self.lookup(&at)?.clone();
        let timestamp = vec![0x28, 0x04, 0x03, 0x00, (header.number % 256) as u8];

        Ok(Block {
            header,
            extrinsics: vec![timestamp],
        })
    }

    async fn runtime_version(&self, at: BlockHash) -> Result<RuntimeVersion, ChainError> {
        self.track();
        self.lookup(&at)?;
        Ok(self.state.runtime.clone())
    }

    async fn node_version(&self) -> Result<NodeVersion, ChainError> {
        self.track();
        Ok(self.state.node.clone())
    }

    async fn storage(&self, key: &StorageKey, at: BlockHash) -> Result<Option<Bytes>, ChainError> {
        self.track();
        self.lookup(&at)?;
        Ok(self.state.storage.get(key).cloned())
    }

    async fn submit_extrinsic(&self, extrinsic: &[u8]) -> Result<TxHash, ChainError> {
        self.track();

        if let Ok(mut submitted) = self.state.submitted.lock() {
            submitted.push(extrinsic.to_vec());
        }

        let mut hash = [0u8; 32];
        for (slot, byte) in hash.iter_mut().zip(extrinsic.iter()) {
            *slot = *byte;
        }

        Ok(BlockHash::new(hash))
    }
}
