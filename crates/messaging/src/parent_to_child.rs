//! Parent->child message lifecycle.
//!
//! A ticket's child-chain id is content-derived, so everything here polls
//! the child chain by ids computed from the parent submission: the
//! creation transaction, the auto-redeem attempt, and any later manual
//! redeems found by scanning the ticket's lifetime window.

use crate::{
    abi::{
        self,
        decode_matching_logs,
        CancelCall,
        CreateRetryableTicketCall,
        GetTimeoutCall,
        InboxMessageDeliveredFilter,
        KeepaliveCall,
        LifetimeExtendedFilter,
        MessageDeliveredFilter,
        NoTicketWithId,
        RedeemCall,
        RedeemScheduledFilter,
    },
    error::{
        Error,
        Result,
    },
    estimator::{
        FeeEstimator,
        GasOverrides,
    },
    ports::{
        ChainReader,
        ChainWriter,
        Clock,
    },
};
use ethers_contract::{
    EthError,
    EthEvent,
};
use ethers_core::{
    abi::AbiEncode,
    types::{
        transaction::eip2718::TypedTransaction,
        Bytes,
        Filter,
        TransactionReceipt,
        H256,
        U256,
        U64,
    },
};
use hopper_registry::ChildChain;
use hopper_types::{
    ids,
    Address,
    EthDepositStatus,
    ParentToChildStatus,
    RetryableGasParams,
    RetryableMessageParams,
    RetryableTicketRequest,
};
use std::time::Duration;

/// Default bound on [`ParentToChildMessage::wait_for_status`].
pub const DEFAULT_STATUS_TIMEOUT: Duration = Duration::from_secs(15 * 60);

const CREATION_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Each scan window targets roughly one day of chain time.
const SCAN_TARGET_SECONDS: u64 = 24 * 60 * 60;
const INITIAL_SCAN_INCREMENT: u64 = 1000;

/// An unsigned ticket-creation transaction plus the estimate it was
/// built from, so the estimate can be re-validated before signing.
#[derive(Debug, Clone)]
pub struct CreationRequest {
    /// The request the transaction encodes.
    pub request: RetryableTicketRequest,
    /// The estimate the transaction prices in.
    pub gas: RetryableGasParams,
    /// Unsigned inbox transaction carrying the full deposit.
    pub tx: TypedTransaction,
}

impl CreationRequest {
    /// Estimate gas parameters for `request` and build the inbox
    /// transaction that creates the ticket.
    pub async fn build<C: ChainReader>(
        estimator: &FeeEstimator<C>,
        inbox: Address,
        request: RetryableTicketRequest,
        parent_base_fee: U256,
        overrides: &GasOverrides,
    ) -> Result<Self> {
        let gas = estimator
            .estimate(&request, parent_base_fee, overrides)
            .await?;
        let call = CreateRetryableTicketCall {
            to: request.to.into(),
            l2_call_value: request.child_call_value,
            max_submission_cost: gas.max_submission_cost,
            excess_fee_refund_address: request.excess_fee_refund_address.into(),
            call_value_refund_address: request.call_value_refund_address.into(),
            gas_limit: gas.gas_limit,
            max_fee_per_gas: gas.max_fee_per_gas,
            data: request.data.clone(),
        };
        let mut tx = abi::call_tx(inbox.into(), call.encode());
        tx.set_from(request.from.into());
        tx.set_value(gas.deposit);
        Ok(Self { request, gas, tx })
    }

    /// Whether the embedded estimate would still be accepted if fees were
    /// re-estimated now.
    pub async fn is_valid<C: ChainReader>(
        &self,
        estimator: &FeeEstimator<C>,
        parent_base_fee: U256,
    ) -> Result<bool> {
        let fresh = estimator
            .estimate(&self.request, parent_base_fee, &GasOverrides::default())
            .await?;
        Ok(FeeEstimator::<C>::is_valid(&self.gas, &fresh))
    }
}

/// One message delivered by a mined parent transaction, paired from the
/// bridge envelope and the inbox payload events.
#[derive(Debug, Clone)]
pub struct DeliveredMessage {
    /// Message number assigned at submission.
    pub message_number: U256,
    /// Message kind tag.
    pub kind: u8,
    /// Aliased sender recorded by the bridge.
    pub sender: Address,
    /// Parent base fee recorded by the bridge.
    pub parent_base_fee: U256,
    /// Packed message payload.
    pub payload: Bytes,
}

/// Extract every delivered message from a parent-chain receipt. The
/// bridge envelope and inbox payload events must pair one-to-one.
pub fn delivered_messages(receipt: &TransactionReceipt) -> Result<Vec<DeliveredMessage>> {
    let envelopes: Vec<MessageDeliveredFilter> = decode_matching_logs(&receipt.logs)?;
    let payloads: Vec<InboxMessageDeliveredFilter> = decode_matching_logs(&receipt.logs)?;
    if envelopes.len() != payloads.len() {
        return Err(Error::UnexpectedEventCount {
            event: "InboxMessageDelivered",
            expected: envelopes.len(),
            actual: payloads.len(),
        });
    }

    envelopes
        .into_iter()
        .map(|envelope| {
            let payload = payloads
                .iter()
                .find(|p| p.message_num == envelope.message_index)
                .ok_or(Error::UnexpectedEventCount {
                    event: "InboxMessageDelivered",
                    expected: 1,
                    actual: 0,
                })?;
            Ok(DeliveredMessage {
                message_number: envelope.message_index,
                kind: envelope.kind,
                sender: envelope.sender.into(),
                parent_base_fee: envelope.base_fee_l1,
                payload: payload.data.clone(),
            })
        })
        .collect()
}

/// A retryable ticket observed from its parent-chain submission.
#[derive(Debug)]
pub struct ParentToChildMessage<C> {
    child: C,
    creation_id: H256,
    message_number: U256,
    params: RetryableMessageParams,
    retryable_lifetime_seconds: u64,
}

impl<C: ChainReader> ParentToChildMessage<C> {
    /// A message whose identity is derived from the given submission
    /// facts. `sender` must already be aliased where the bridge would
    /// alias it.
    pub fn new(
        child: C,
        chain: &ChildChain,
        message_number: U256,
        sender: Address,
        parent_base_fee: U256,
        params: RetryableMessageParams,
    ) -> Self {
        let creation_id = ids::submit_retryable_id(
            chain.chain_id,
            message_number,
            sender,
            parent_base_fee,
            &params,
        );
        Self {
            child,
            creation_id,
            message_number,
            params,
            retryable_lifetime_seconds: chain.retryable_lifetime_seconds,
        }
    }

    /// A message from a delivered submit-retryable inbox message, or
    /// `None` if the message is of another kind.
    pub fn from_delivered(
        child: C,
        chain: &ChildChain,
        message: &DeliveredMessage,
    ) -> Result<Option<Self>> {
        if message.kind != abi::KIND_SUBMIT_RETRYABLE {
            return Ok(None);
        }
        let params = abi::parse_submit_retryable_data(&message.payload)?;
        Ok(Some(Self::new(
            child,
            chain,
            message.message_number,
            message.sender,
            message.parent_base_fee,
            params,
        )))
    }

    /// The derived id of the ticket-creation transaction.
    pub fn creation_id(&self) -> H256 {
        self.creation_id
    }

    /// The message number assigned at submission.
    pub fn message_number(&self) -> U256 {
        self.message_number
    }

    /// The message fields the ticket was created with.
    pub fn params(&self) -> &RetryableMessageParams {
        &self.params
    }

    /// Resolve the ticket's current lifecycle status.
    pub async fn status(&self) -> Result<ParentToChildStatus> {
        let Some(creation) = self.child.receipt(self.creation_id).await? else {
            return Ok(ParentToChildStatus::NotYetCreated);
        };
        if creation.status == Some(U64::zero()) {
            return Ok(ParentToChildStatus::CreationFailed);
        }

        if self.auto_redeem(&creation).await?.is_some() {
            return Ok(ParentToChildStatus::Redeemed);
        }

        if self.ticket_timeout().await?.is_some() {
            return Ok(ParentToChildStatus::FundsDepositedOnChild);
        }

        // The ticket is gone without a successful auto-redeem: either a
        // later manual redeem consumed it, or it was cancelled or ran out
        // its lifetime.
        let creation_block = creation
            .block_number
            .ok_or_else(|| Error::Rpc("mined receipt has no block number".into()))?
            .as_u64();
        Ok(match self.scan_for_manual_redeem(creation_block).await? {
            Some(_) => ParentToChildStatus::Redeemed,
            None => ParentToChildStatus::Expired,
        })
    }

    /// The receipt of the transaction that successfully redeemed this
    /// ticket, or `None` while no redemption has succeeded.
    pub async fn successful_redeem_receipt(
        &self,
    ) -> Result<Option<TransactionReceipt>> {
        let Some(creation) = self.child.receipt(self.creation_id).await? else {
            return Ok(None);
        };
        if creation.status == Some(U64::zero()) {
            return Ok(None);
        }
        let retry_tx = match self.auto_redeem(&creation).await? {
            Some(retry_tx) => Some(retry_tx),
            None if self.ticket_timeout().await?.is_some() => None,
            None => {
                let creation_block = creation
                    .block_number
                    .ok_or_else(|| {
                        Error::Rpc("mined receipt has no block number".into())
                    })?
                    .as_u64();
                self.scan_for_manual_redeem(creation_block).await?
            }
        };
        match retry_tx {
            Some(retry_tx) => self.child.receipt(retry_tx).await,
            None => Ok(None),
        }
    }

    /// Poll until the creation transaction is observed on the child
    /// chain with at least `confirmations` blocks on top of it (default
    /// one), then resolve full status. Times out after `timeout`
    /// (default fifteen minutes).
    pub async fn wait_for_status(
        &self,
        clock: &impl Clock,
        confirmations: Option<u64>,
        timeout: Option<Duration>,
    ) -> Result<ParentToChildStatus> {
        let confirmations = confirmations.unwrap_or(1).max(1);
        let timeout = timeout.unwrap_or(DEFAULT_STATUS_TIMEOUT);
        let started = clock.now();
        loop {
            if let Some(creation) = self.child.receipt(self.creation_id).await? {
                let mined = creation
                    .block_number
                    .ok_or_else(|| {
                        Error::Rpc("mined receipt has no block number".into())
                    })?
                    .as_u64();
                let latest = self.child.latest_block_number().await?;
                if latest.saturating_sub(mined) + 1 >= confirmations {
                    return self.status().await;
                }
            }
            let waited = clock.now().saturating_sub(started);
            if waited >= timeout {
                return Err(Error::Timeout { waited });
            }
            clock.sleep(CREATION_POLL_INTERVAL).await;
        }
    }

    /// Manually redeem the ticket. Requires the ticket to be exactly in
    /// the redeemable state.
    pub async fn redeem<W: ChainWriter>(&self, child: &W) -> Result<TransactionReceipt> {
        self.require_redeemable().await?;
        let call = RedeemCall { ticket_id: self.creation_id.0 };
        child
            .send(abi::call_tx(abi::RETRYABLE_MANAGER, call.encode()))
            .await
    }

    /// Cancel the ticket, refunding its call value.
    pub async fn cancel<W: ChainWriter>(&self, child: &W) -> Result<TransactionReceipt> {
        self.require_redeemable().await?;
        let call = CancelCall { ticket_id: self.creation_id.0 };
        child
            .send(abi::call_tx(abi::RETRYABLE_MANAGER, call.encode()))
            .await
    }

    /// Extend the ticket's lifetime by one lifetime period.
    pub async fn keep_alive<W: ChainWriter>(&self, child: &W) -> Result<TransactionReceipt> {
        self.require_redeemable().await?;
        let call = KeepaliveCall { ticket_id: self.creation_id.0 };
        child
            .send(abi::call_tx(abi::RETRYABLE_MANAGER, call.encode()))
            .await
    }

    async fn require_redeemable(&self) -> Result<()> {
        let actual = self.status().await?;
        if actual != ParentToChildStatus::FundsDepositedOnChild {
            return Err(Error::invalid_state(
                ParentToChildStatus::FundsDepositedOnChild,
                actual,
            ));
        }
        Ok(())
    }

    /// The retry transaction of a successful auto-redeem scheduled at
    /// creation, if there was one.
    async fn auto_redeem(&self, creation: &TransactionReceipt) -> Result<Option<H256>> {
        let scheduled: Vec<RedeemScheduledFilter> =
            decode_matching_logs(&creation.logs)?
                .into_iter()
                .filter(|s: &RedeemScheduledFilter| s.ticket_id == self.creation_id.0)
                .collect();
        if scheduled.len() > 1 {
            return Err(Error::UnexpectedEventCount {
                event: "RedeemScheduled",
                expected: 1,
                actual: scheduled.len(),
            });
        }
        let Some(scheduled) = scheduled.first() else {
            return Ok(None);
        };
        let retry_tx = H256(scheduled.retry_tx_hash);
        Ok(self.retry_succeeded(retry_tx).await?.then_some(retry_tx))
    }

    async fn retry_succeeded(&self, retry_tx: H256) -> Result<bool> {
        Ok(self
            .child
            .receipt(retry_tx)
            .await?
            .and_then(|r| r.status)
            .map(|status| status == U64::one())
            .unwrap_or(false))
    }

    /// The ticket's expiry timestamp, or `None` once the retryable
    /// manager no longer knows the id.
    async fn ticket_timeout(&self) -> Result<Option<U256>> {
        let call = GetTimeoutCall { ticket_id: self.creation_id.0 };
        let outcome = self
            .child
            .call(&abi::call_tx(abi::RETRYABLE_MANAGER, call.encode()))
            .await?;
        match outcome {
            crate::ports::CallOutcome::Success(data) => {
                Ok(Some(U256::from_big_endian(&data)))
            }
            crate::ports::CallOutcome::Revert(payload) => {
                if NoTicketWithId::decode_with_selector(&payload).is_some() {
                    Ok(None)
                } else {
                    Err(Error::MalformedRevert {
                        context: "querying the ticket timeout",
                    })
                }
            }
        }
    }

    /// Scan the ticket's lifetime window for a successful manual redeem,
    /// extending the deadline past any lifetime extensions found along
    /// the way. Window sizes adapt to target roughly one day of chain
    /// time each. `None` means the ticket expired or was cancelled.
    async fn scan_for_manual_redeem(&self, creation_block: u64) -> Result<Option<H256>> {
        let creation_timestamp = self.block_timestamp(creation_block).await?;
        let mut deadline = creation_timestamp + self.retryable_lifetime_seconds;
        let mut from = creation_block;
        let mut increment = INITIAL_SCAN_INCREMENT;

        loop {
            let latest = self.child.latest_block_number().await?;
            let to = (from + increment).min(latest);
            tracing::debug!(ticket = %self.creation_id, from, to, "scanning for manual redeem");

            let redeems = Filter::new()
                .address(abi::RETRYABLE_MANAGER)
                .from_block(from)
                .to_block(to)
                .topic0(RedeemScheduledFilter::signature())
                .topic1(self.creation_id);
            for scheduled in
                decode_matching_logs::<RedeemScheduledFilter>(&self.child.logs(&redeems).await?)?
            {
                let retry_tx = H256(scheduled.retry_tx_hash);
                if self.retry_succeeded(retry_tx).await? {
                    return Ok(Some(retry_tx));
                }
            }

            let extensions = Filter::new()
                .address(abi::RETRYABLE_MANAGER)
                .from_block(from)
                .to_block(to)
                .topic0(LifetimeExtendedFilter::signature())
                .topic1(self.creation_id);
            for extension in
                decode_matching_logs::<LifetimeExtendedFilter>(&self.child.logs(&extensions).await?)?
            {
                let new_timeout = extension.new_timeout.low_u64();
                deadline = deadline.max(new_timeout);
            }

            let to_timestamp = self.block_timestamp(to).await?;
            if to_timestamp > deadline || to == latest {
                // Past the (possibly extended) deadline, or caught up with
                // the chain while the ticket is already gone.
                return Ok(None);
            }

            let processed = to_timestamp.saturating_sub(creation_timestamp).max(1);
            let scanned = to - creation_block;
            increment = (scanned * SCAN_TARGET_SECONDS).div_ceil(processed).max(1);
            from = to + 1;
        }
    }

    async fn block_timestamp(&self, number: u64) -> Result<u64> {
        let block = self
            .child
            .block_by_number(number)
            .await?
            .ok_or_else(|| Error::Rpc(format!("block {number} not found")))?;
        Ok(block.timestamp.low_u64())
    }
}

/// A plain ETH deposit observed from its parent-chain submission.
/// Deposits land without a redemption step.
#[derive(Debug)]
pub struct EthDepositMessage<C> {
    child: C,
    deposit_id: H256,
}

impl<C: ChainReader> EthDepositMessage<C> {
    /// A deposit whose child transaction id is derived from the given
    /// submission facts.
    pub fn new(
        child: C,
        child_chain_id: u64,
        message_number: U256,
        from: Address,
        to: Address,
        value: U256,
    ) -> Self {
        let deposit_id =
            ids::eth_deposit_id(child_chain_id, message_number, from, to, value);
        Self { child, deposit_id }
    }

    /// The derived id of the child-chain deposit transaction.
    pub fn deposit_id(&self) -> H256 {
        self.deposit_id
    }

    /// Whether the deposit has landed on the child chain.
    pub async fn status(&self) -> Result<EthDepositStatus> {
        Ok(match self.child.receipt(self.deposit_id).await? {
            Some(_) => EthDepositStatus::Deposited,
            None => EthDepositStatus::Pending,
        })
    }

    /// Poll until the deposit lands, or time out.
    pub async fn wait_for_deposit(
        &self,
        clock: &impl Clock,
        timeout: Option<Duration>,
    ) -> Result<EthDepositStatus> {
        let timeout = timeout.unwrap_or(DEFAULT_STATUS_TIMEOUT);
        let started = clock.now();
        loop {
            if let EthDepositStatus::Deposited = self.status().await? {
                return Ok(EthDepositStatus::Deposited);
            }
            let waited = clock.now().saturating_sub(started);
            if waited >= timeout {
                return Err(Error::Timeout { waited });
            }
            clock.sleep(CREATION_POLL_INTERVAL).await;
        }
    }
}

/// A pre-upgrade ticket, tracked through its fixed derived transaction
/// ids. The classic era is closed, so a ticket that was never redeemed
/// is expired.
#[derive(Debug)]
pub struct ClassicParentToChildMessage<C> {
    child: C,
    creation_id: H256,
}

impl<C: ChainReader> ClassicParentToChildMessage<C> {
    /// A classic ticket identified by chain id and message number.
    pub fn new(child: C, child_chain_id: u64, message_number: U256) -> Self {
        let creation_id = ids::classic_creation_id(child_chain_id, message_number);
        Self { child, creation_id }
    }

    /// The derived id of the ticket-creation transaction.
    pub fn creation_id(&self) -> H256 {
        self.creation_id
    }

    /// Resolve the ticket's status from its derived receipts.
    pub async fn status(&self) -> Result<ParentToChildStatus> {
        let Some(creation) = self.child.receipt(self.creation_id).await? else {
            return Ok(ParentToChildStatus::NotYetCreated);
        };
        if creation.status == Some(U64::zero()) {
            return Ok(ParentToChildStatus::CreationFailed);
        }
        let child_tx = ids::classic_child_tx_id(self.creation_id);
        let redeemed = self
            .child
            .receipt(child_tx)
            .await?
            .and_then(|r| r.status)
            .map(|status| status == U64::one())
            .unwrap_or(false);
        Ok(if redeemed {
            ParentToChildStatus::Redeemed
        } else {
            ParentToChildStatus::Expired
        })
    }
}
