//! A scriptable in-memory chain for lifecycle tests.
//!
//! [`MockChain`] implements the `ethers` [`Middleware`] trait directly,
//! so it picks up the [`ChainReader`](crate::ports::ChainReader) blanket
//! implementation the way a real provider does. Unmocked RPC surface
//! panics, keeping tests honest about what they exercise.

use crate::ports::{
    ChainWriter,
    Clock,
};
use async_trait::async_trait;
use ethers_core::types::{
    transaction::eip2718::TypedTransaction,
    Block,
    BlockId,
    BlockNumber,
    Bytes,
    Filter,
    FilterBlockOption,
    Log,
    NameOrAddress,
    Topic,
    TransactionReceipt,
    TxHash,
    ValueOrArray,
    H160,
    H256,
    U256,
    U64,
};
use ethers_providers::{
    JsonRpcClient,
    JsonRpcError,
    Middleware,
    ProviderError,
    RpcError,
};
use hopper_types::Address;
use parking_lot::Mutex;
use serde::{
    de::DeserializeOwned,
    Serialize,
};
use std::{
    collections::{
        HashMap,
        VecDeque,
    },
    fmt::Debug,
    sync::Arc,
    time::Duration,
};

#[derive(Debug, Clone)]
enum ScriptedCall {
    Return(Vec<u8>),
    Revert(Vec<u8>),
}

#[derive(Debug, Default)]
struct MockData {
    chain_id: u64,
    latest_block: u64,
    blocks_by_number: HashMap<u64, Block<TxHash>>,
    blocks_by_hash: HashMap<H256, Block<TxHash>>,
    receipts: HashMap<H256, TransactionReceipt>,
    logs: Vec<Log>,
    calls: HashMap<(H160, [u8; 4]), VecDeque<ScriptedCall>>,
    default_gas_estimate: Option<U256>,
    gas_price: Option<U256>,
    sender: H160,
    sent: Vec<TypedTransaction>,
    send_receipts: VecDeque<TransactionReceipt>,
}

/// A chain whose state is whatever the test scripts into it.
#[derive(Debug, Clone)]
pub struct MockChain {
    data: Arc<Mutex<MockData>>,
}

impl MockChain {
    /// An empty chain with the given id.
    pub fn new(chain_id: u64) -> Self {
        Self {
            data: Arc::new(Mutex::new(MockData {
                chain_id,
                ..Default::default()
            })),
        }
    }

    /// Script the reported gas price.
    pub fn set_gas_price(&self, price: U256) {
        self.data.lock().gas_price = Some(price);
    }

    /// Script the gas estimate returned for every transaction.
    pub fn set_default_gas_estimate(&self, estimate: U256) {
        self.data.lock().default_gas_estimate = Some(estimate);
    }

    /// Set the account writes are attributed to.
    pub fn set_sender(&self, sender: H160) {
        self.data.lock().sender = sender;
    }

    /// Insert a block, retrievable by number and hash. The latest block
    /// number follows the highest inserted block.
    pub fn insert_block(&self, block: Block<TxHash>) {
        let mut data = self.data.lock();
        let number = block.number.unwrap().as_u64();
        data.latest_block = data.latest_block.max(number);
        if let Some(hash) = block.hash {
            data.blocks_by_hash.insert(hash, block.clone());
        }
        data.blocks_by_number.insert(number, block);
    }

    /// Insert a transaction receipt.
    pub fn insert_receipt(&self, tx: H256, receipt: TransactionReceipt) {
        self.data.lock().receipts.insert(tx, receipt);
    }

    /// Add a log to the chain's log store.
    pub fn push_log(&self, log: Log) {
        self.data.lock().logs.push(log);
    }

    /// Script a successful `eth_call` to `to` with the given selector.
    /// Repeated scripts for the same target queue up; the final entry
    /// repeats forever.
    pub fn script_return(&self, to: H160, selector: [u8; 4], data: Vec<u8>) {
        self.data
            .lock()
            .calls
            .entry((to, selector))
            .or_default()
            .push_back(ScriptedCall::Return(data));
    }

    /// Script a reverting `eth_call`, surfaced through the JSON-RPC error
    /// path the way real nodes report it.
    pub fn script_revert(&self, to: H160, selector: [u8; 4], payload: Vec<u8>) {
        self.data
            .lock()
            .calls
            .entry((to, selector))
            .or_default()
            .push_back(ScriptedCall::Revert(payload));
    }

    /// Queue a receipt to hand out for the next submitted transaction.
    pub fn push_send_receipt(&self, receipt: TransactionReceipt) {
        self.data.lock().send_receipts.push_back(receipt);
    }

    /// Every transaction submitted through [`ChainWriter::send`].
    pub fn sent(&self) -> Vec<TypedTransaction> {
        self.data.lock().sent.clone()
    }

    fn scripted_call(&self, to: H160, selector: [u8; 4]) -> ScriptedCall {
        let mut data = self.data.lock();
        let queue = data.calls.get_mut(&(to, selector)).unwrap_or_else(|| {
            panic!(
                "unscripted call to {to:?} selector 0x{}",
                hex::encode(selector)
            )
        });
        if queue.len() > 1 {
            queue.pop_front().unwrap()
        } else {
            queue.front().cloned().unwrap()
        }
    }
}

/// A mined block with the given number and timestamp, a deterministic
/// hash, and a one-gwei base fee.
pub fn block(number: u64, timestamp: u64) -> Block<TxHash> {
    Block {
        number: Some(number.into()),
        hash: Some(block_hash(number)),
        timestamp: timestamp.into(),
        base_fee_per_gas: Some(U256::from(1_000_000_000u64)),
        ..Default::default()
    }
}

/// The deterministic hash [`block`] assigns.
pub fn block_hash(number: u64) -> H256 {
    H256::from_low_u64_be(number | 0xb10c_0000_0000)
}

/// Attach a `sendCount` extended field, as assertion-chain nodes report
/// on blocks referenced by confirmed assertions.
pub fn with_send_count(mut block: Block<TxHash>, send_count: u64) -> Block<TxHash> {
    block.other = serde_json::from_value(serde_json::json!({
        "sendCount": format!("{send_count:#x}"),
    }))
    .unwrap();
    block
}

/// A log emitted by `address` in the given block and transaction.
pub fn log(
    address: H160,
    topics: Vec<H256>,
    data: Vec<u8>,
    block_number: u64,
    tx: H256,
) -> Log {
    Log {
        address,
        topics,
        data: data.into(),
        block_number: Some(block_number.into()),
        block_hash: Some(block_hash(block_number)),
        transaction_hash: Some(tx),
        ..Default::default()
    }
}

/// A mined receipt with the given execution status and logs.
pub fn receipt(status: u64, block_number: u64, logs: Vec<Log>) -> TransactionReceipt {
    TransactionReceipt {
        status: Some(status.into()),
        block_number: Some(block_number.into()),
        block_hash: Some(block_hash(block_number)),
        logs,
        ..Default::default()
    }
}

fn filter_matches(filter: &Filter, log: &Log) -> bool {
    if let Some(address) = &filter.address {
        let matched = match address {
            ValueOrArray::Value(a) => log.address == *a,
            ValueOrArray::Array(list) => list.contains(&log.address),
        };
        if !matched {
            return false;
        }
    }
    if let FilterBlockOption::Range {
        from_block,
        to_block,
    } = filter.block_option
    {
        let Some(number) = log.block_number else {
            return false;
        };
        if let Some(BlockNumber::Number(from)) = from_block {
            if number < from {
                return false;
            }
        }
        if let Some(BlockNumber::Number(to)) = to_block {
            if number > to {
                return false;
            }
        }
    }
    for (i, topic) in filter.topics.iter().enumerate() {
        let Some(topic) = topic else { continue };
        let actual = log.topics.get(i);
        let matched = match topic {
            Topic::Value(None) => true,
            Topic::Value(Some(expected)) => actual == Some(expected),
            Topic::Array(allowed) => {
                allowed.iter().flatten().any(|e| actual == Some(e))
            }
        };
        if !matched {
            return false;
        }
    }
    true
}

/// A revert carried the way JSON-RPC nodes report one: an error response
/// whose `data` field holds the hex-encoded payload.
#[derive(Debug, thiserror::Error)]
#[error("execution reverted")]
struct ScriptedRevert {
    response: JsonRpcError,
}

impl ScriptedRevert {
    fn new(payload: &[u8]) -> Self {
        Self {
            response: JsonRpcError {
                code: 3,
                message: "execution reverted".into(),
                data: Some(serde_json::Value::String(format!(
                    "0x{}",
                    hex::encode(payload)
                ))),
            },
        }
    }
}

impl RpcError for ScriptedRevert {
    fn as_error_response(&self) -> Option<&JsonRpcError> {
        Some(&self.response)
    }

    fn as_serde_error(&self) -> Option<&serde_json::Error> {
        None
    }
}

#[async_trait]
impl JsonRpcClient for MockChain {
    type Error = ProviderError;

    async fn request<T, R>(&self, method: &str, _params: T) -> Result<R, Self::Error>
    where
        T: Debug + Serialize + Send + Sync,
        R: DeserializeOwned + Send,
    {
        panic!("request not mocked: {method}");
    }
}

#[async_trait]
impl Middleware for MockChain {
    type Error = ProviderError;
    type Provider = Self;
    type Inner = Self;

    fn inner(&self) -> &Self::Inner {
        unreachable!("there is no inner provider here")
    }

    async fn get_chainid(&self) -> Result<U256, Self::Error> {
        Ok(U256::from(self.data.lock().chain_id))
    }

    async fn get_block_number(&self) -> Result<U64, Self::Error> {
        Ok(self.data.lock().latest_block.into())
    }

    async fn get_block<T: Into<BlockId> + Send + Sync>(
        &self,
        block_hash_or_number: T,
    ) -> Result<Option<Block<TxHash>>, Self::Error> {
        let data = self.data.lock();
        Ok(match block_hash_or_number.into() {
            BlockId::Hash(hash) => data.blocks_by_hash.get(&hash).cloned(),
            BlockId::Number(BlockNumber::Number(number)) => {
                data.blocks_by_number.get(&number.as_u64()).cloned()
            }
            BlockId::Number(BlockNumber::Latest) => {
                data.blocks_by_number.get(&data.latest_block).cloned()
            }
            BlockId::Number(other) => panic!("unmocked block query: {other:?}"),
        })
    }

    async fn get_transaction_receipt<T: Send + Sync + Into<TxHash>>(
        &self,
        transaction_hash: T,
    ) -> Result<Option<TransactionReceipt>, Self::Error> {
        Ok(self
            .data
            .lock()
            .receipts
            .get(&transaction_hash.into())
            .cloned())
    }

    async fn get_logs(&self, filter: &Filter) -> Result<Vec<Log>, Self::Error> {
        Ok(self
            .data
            .lock()
            .logs
            .iter()
            .filter(|log| filter_matches(filter, log))
            .cloned()
            .collect())
    }

    async fn call(
        &self,
        tx: &TypedTransaction,
        _block: Option<BlockId>,
    ) -> Result<Bytes, Self::Error> {
        let to = match tx.to() {
            Some(NameOrAddress::Address(to)) => *to,
            other => panic!("call without an address target: {other:?}"),
        };
        let mut selector = [0u8; 4];
        if let Some(data) = tx.data().filter(|data| data.len() >= 4) {
            selector.copy_from_slice(&data[..4]);
        }
        match self.scripted_call(to, selector) {
            ScriptedCall::Return(data) => Ok(data.into()),
            ScriptedCall::Revert(payload) => Err(ProviderError::JsonRpcClientError(
                Box::new(ScriptedRevert::new(&payload)),
            )),
        }
    }

    async fn estimate_gas(
        &self,
        _tx: &TypedTransaction,
        _block: Option<BlockId>,
    ) -> Result<U256, Self::Error> {
        self.data
            .lock()
            .default_gas_estimate
            .ok_or_else(|| ProviderError::CustomError("no gas estimate scripted".into()))
    }

    async fn get_gas_price(&self) -> Result<U256, Self::Error> {
        self.data
            .lock()
            .gas_price
            .ok_or_else(|| ProviderError::CustomError("no gas price scripted".into()))
    }
}

#[async_trait]
impl ChainWriter for MockChain {
    fn sender(&self) -> Address {
        self.data.lock().sender.into()
    }

    async fn send(
        &self,
        tx: TypedTransaction,
    ) -> crate::error::Result<TransactionReceipt> {
        let mut data = self.data.lock();
        data.sent.push(tx);
        Ok(data
            .send_receipts
            .pop_front()
            .expect("no receipt scripted for send"))
    }
}

/// A clock whose `sleep` advances its own notion of now, so timeout
/// loops run instantly.
#[derive(Debug, Default)]
pub struct FakeClock {
    now: Mutex<Duration>,
}

impl FakeClock {
    /// A clock starting at an arbitrary fixed instant.
    pub fn new() -> Self {
        Self {
            now: Mutex::new(Duration::from_secs(1_700_000_000)),
        }
    }
}

#[async_trait]
impl Clock for FakeClock {
    fn now(&self) -> Duration {
        *self.now.lock()
    }

    async fn sleep(&self, duration: Duration) {
        *self.now.lock() += duration;
    }
}
