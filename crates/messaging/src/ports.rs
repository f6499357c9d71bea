//! Capability boundary between the message lifecycles and the chain RPC
//! endpoints they drive.
//!
//! [`ChainReader`] is everything a status query needs and is implemented
//! for any `ethers` middleware. [`ChainWriter`] additionally submits
//! transactions and is implemented for [`SignerMiddleware`], so whether an
//! operation can mutate chain state is visible in its signature rather
//! than detected at runtime. Polling loops take a [`Clock`] so tests can
//! drive time deterministically.

use crate::error::{
    Error,
    Result,
};
use async_trait::async_trait;
use ethers_core::types::{
    transaction::eip2718::TypedTransaction,
    Block,
    BlockId,
    BlockNumber,
    Bytes,
    Filter,
    Log,
    TransactionReceipt,
    H256,
    U256,
};
use ethers_middleware::SignerMiddleware;
use ethers_providers::{
    Middleware,
    MiddlewareError,
};
use ethers_signers::Signer;
use hopper_types::Address;
use std::time::{
    Duration,
    SystemTime,
    UNIX_EPOCH,
};

/// Result of simulating a call: either return data or the raw revert
/// payload, which several operations decode for protocol information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallOutcome {
    /// The call succeeded with this return data.
    Success(Bytes),
    /// The call reverted with this payload.
    Revert(Bytes),
}

impl CallOutcome {
    /// The return data of a call that must not revert.
    pub fn expect_success(self, context: &'static str) -> Result<Bytes> {
        match self {
            CallOutcome::Success(data) => Ok(data),
            CallOutcome::Revert(payload) => Err(Error::Rpc(format!(
                "{context} reverted: 0x{}",
                hex::encode(&payload)
            ))),
        }
    }

    /// The revert payload, if the call reverted.
    pub fn revert_data(&self) -> Option<&Bytes> {
        match self {
            CallOutcome::Success(_) => None,
            CallOutcome::Revert(payload) => Some(payload),
        }
    }
}

/// Read-only access to one chain.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// The chain's EIP-155 id.
    async fn chain_id(&self) -> Result<u64>;

    /// Number of the most recent block.
    async fn latest_block_number(&self) -> Result<u64>;

    /// Fetch a block by number, mainly for its timestamp.
    async fn block_by_number(&self, number: u64) -> Result<Option<Block<H256>>>;

    /// Fetch a block by hash.
    async fn block_by_hash(&self, hash: H256) -> Result<Option<Block<H256>>>;

    /// Fetch a transaction receipt, `None` while unmined.
    async fn receipt(&self, tx: H256) -> Result<Option<TransactionReceipt>>;

    /// Fetch logs matching a filter.
    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>>;

    /// Simulate a call, surfacing revert payloads instead of failing.
    async fn call(&self, tx: &TypedTransaction) -> Result<CallOutcome>;

    /// Estimate the gas a transaction would use.
    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256>;

    /// Current gas price.
    async fn gas_price(&self) -> Result<U256>;

    /// Base fee of the latest block.
    async fn base_fee(&self) -> Result<U256>;
}

/// Read access plus the ability to submit transactions from a known
/// sender.
#[async_trait]
pub trait ChainWriter: ChainReader {
    /// The account transactions are sent from.
    fn sender(&self) -> Address;

    /// Submit a transaction and wait for it to be mined.
    async fn send(&self, tx: TypedTransaction) -> Result<TransactionReceipt>;
}

fn rpc_err(err: impl std::fmt::Display) -> Error {
    Error::Rpc(err.to_string())
}

/// Pull the revert payload out of a provider error, if there is one.
fn revert_payload<E: MiddlewareError>(err: &E) -> Option<Bytes> {
    let response = err.as_error_response()?;
    let data = response.data.as_ref()?.as_str()?.to_owned();
    let raw = hex::decode(data.strip_prefix("0x")?).ok()?;
    Some(raw.into())
}

#[async_trait]
impl<M> ChainReader for M
where
    M: Middleware,
{
    async fn chain_id(&self) -> Result<u64> {
        Ok(Middleware::get_chainid(self).await.map_err(rpc_err)?.as_u64())
    }

    async fn latest_block_number(&self) -> Result<u64> {
        Ok(Middleware::get_block_number(self)
            .await
            .map_err(rpc_err)?
            .as_u64())
    }

    async fn block_by_number(&self, number: u64) -> Result<Option<Block<H256>>> {
        Middleware::get_block(self, BlockNumber::Number(number.into()))
            .await
            .map_err(rpc_err)
    }

    async fn block_by_hash(&self, hash: H256) -> Result<Option<Block<H256>>> {
        Middleware::get_block(self, BlockId::Hash(hash))
            .await
            .map_err(rpc_err)
    }

    async fn receipt(&self, tx: H256) -> Result<Option<TransactionReceipt>> {
        Middleware::get_transaction_receipt(self, tx)
            .await
            .map_err(rpc_err)
    }

    async fn logs(&self, filter: &Filter) -> Result<Vec<Log>> {
        Middleware::get_logs(self, filter).await.map_err(rpc_err)
    }

    async fn call(&self, tx: &TypedTransaction) -> Result<CallOutcome> {
        match Middleware::call(self, tx, None).await {
            Ok(data) => Ok(CallOutcome::Success(data)),
            Err(err) => match revert_payload(&err) {
                Some(payload) => Ok(CallOutcome::Revert(payload)),
                None => Err(rpc_err(err)),
            },
        }
    }

    async fn estimate_gas(&self, tx: &TypedTransaction) -> Result<U256> {
        Middleware::estimate_gas(self, tx, None)
            .await
            .map_err(rpc_err)
    }

    async fn gas_price(&self) -> Result<U256> {
        Middleware::get_gas_price(self).await.map_err(rpc_err)
    }

    async fn base_fee(&self) -> Result<U256> {
        let latest = Middleware::get_block(self, BlockNumber::Latest)
            .await
            .map_err(rpc_err)?
            .ok_or_else(|| Error::Rpc("no latest block".into()))?;
        latest
            .base_fee_per_gas
            .ok_or_else(|| Error::Rpc("chain does not report a base fee".into()))
    }
}

#[async_trait]
impl<M, S> ChainWriter for SignerMiddleware<M, S>
where
    M: Middleware + 'static,
    S: Signer + 'static,
{
    fn sender(&self) -> Address {
        self.address().into()
    }

    async fn send(&self, tx: TypedTransaction) -> Result<TransactionReceipt> {
        let pending = Middleware::send_transaction(self, tx, None)
            .await
            .map_err(rpc_err)?;
        pending
            .await
            .map_err(rpc_err)?
            .ok_or_else(|| Error::Rpc("transaction dropped from the mempool".into()))
    }
}

/// Time source injected into every polling loop.
#[async_trait]
pub trait Clock: Send + Sync {
    /// Wall-clock time as a duration since the unix epoch.
    fn now(&self) -> Duration;

    /// Suspend for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// The production clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioClock;

#[async_trait]
impl Clock for TokioClock {
    fn now(&self) -> Duration {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
    }

    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
