//! Fixed on-chain encodings: system contract addresses, the call, event
//! and error shapes of the bridge contracts, and the packed layout of
//! inbox message data.
//!
//! Everything here must match the target chain bit-for-bit; the structs
//! derive their selectors and topics from the ABI signature strings.

use crate::error::{
    Error,
    Result,
};
use ethers_contract::{
    EthAbiType,
    EthCall,
    EthError,
    EthEvent,
};
use ethers_core::{
    abi::{
        self,
        ParamType,
    },
    types::{
        transaction::eip2718::TypedTransaction,
        Bytes,
        TransactionRequest,
        H160,
        U256,
    },
};
use hopper_types::RetryableMessageParams;

/// The child-chain precompile managing retryable tickets.
pub const RETRYABLE_MANAGER: H160 = H160([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x6e,
]);

/// The child-chain precompile exposing simulation-only helpers.
pub const NODE_INTERFACE: H160 = H160([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xc8,
]);

/// The child-chain precompile that accepts child->parent sends.
pub const SYS_SENDER: H160 = H160([
    0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0x64,
]);

/// Message kind tag for submit-retryable inbox messages.
pub const KIND_SUBMIT_RETRYABLE: u8 = 9;
/// Message kind tag for plain ETH deposits.
pub const KIND_ETH_DEPOSIT: u8 = 12;

/// A read-only or unsigned call to `to` with the given calldata.
pub fn call_tx(to: H160, data: impl Into<Bytes>) -> TypedTransaction {
    TransactionRequest {
        to: Some(to.into()),
        data: Some(data.into()),
        ..Default::default()
    }
    .into()
}

// ---- retryable manager precompile ----

/// Attempt redemption of a ticket.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(name = "redeem", abi = "redeem(bytes32)")]
pub struct RedeemCall {
    /// The ticket to redeem.
    pub ticket_id: [u8; 32],
}

/// Cancel a ticket, refunding its call value.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(name = "cancel", abi = "cancel(bytes32)")]
pub struct CancelCall {
    /// The ticket to cancel.
    pub ticket_id: [u8; 32],
}

/// Extend a ticket's lifetime by one lifetime period.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(name = "keepalive", abi = "keepalive(bytes32)")]
pub struct KeepaliveCall {
    /// The ticket to renew.
    pub ticket_id: [u8; 32],
}

/// Query a ticket's expiry timestamp. Reverts with [`NoTicketWithId`]
/// once the ticket is redeemed, cancelled or expired.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(name = "getTimeout", abi = "getTimeout(bytes32)")]
pub struct GetTimeoutCall {
    /// The ticket to query.
    pub ticket_id: [u8; 32],
}

/// Raised by the retryable manager for ids it does not know.
#[derive(Clone, Debug, PartialEq, Eq, EthError)]
#[etherror(name = "NoTicketWithID", abi = "NoTicketWithID()")]
pub struct NoTicketWithId;

// ---- node interface precompile (simulation only) ----

/// Estimate the gas used by delivering and auto-redeeming a ticket.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(
    name = "estimateRetryableTicket",
    abi = "estimateRetryableTicket(address,uint256,address,uint256,address,address,bytes)"
)]
pub struct EstimateRetryableTicketCall {
    /// Aliased sender of the ticket.
    pub sender: H160,
    /// Funds assumed deposited with the ticket.
    pub deposit: U256,
    /// Call target on the child chain.
    pub to: H160,
    /// Value of the child-chain call.
    pub l2_call_value: U256,
    /// Gas surplus recipient.
    pub excess_fee_refund_address: H160,
    /// Call value refund recipient.
    pub call_value_refund_address: H160,
    /// Calldata of the child-chain call.
    pub data: Bytes,
}

/// Construct a merkle proof for a child->parent send.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(
    name = "constructOutboxProof",
    abi = "constructOutboxProof(uint64,uint64)"
)]
pub struct ConstructOutboxProofCall {
    /// Send count of the confirmed assertion to prove against.
    pub size: u64,
    /// Position of the message being proven.
    pub leaf: u64,
}

/// Return shape of [`ConstructOutboxProofCall`].
pub type OutboxProof = ([u8; 32], [u8; 32], Vec<[u8; 32]>);

/// Fetch the inclusion proof of a legacy outbox entry.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(
    name = "legacyLookupMessageBatchProof",
    abi = "legacyLookupMessageBatchProof(uint256,uint64)"
)]
pub struct LegacyLookupMessageBatchProofCall {
    /// The outbox batch holding the message.
    pub batch_num: U256,
    /// The message's index within the batch.
    pub index: u64,
}

/// Return shape of [`LegacyLookupMessageBatchProofCall`]: proof, path,
/// child-chain sender, parent-chain destination, child block, parent
/// block, timestamp, value, calldata.
pub type ClassicProofData = (
    Vec<[u8; 32]>,
    U256,
    H160,
    H160,
    U256,
    U256,
    U256,
    U256,
    Bytes,
);

// ---- inbox ----

/// Create a retryable ticket. The accompanying value must cover the
/// estimated deposit.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(
    name = "createRetryableTicket",
    abi = "createRetryableTicket(address,uint256,uint256,address,address,uint256,uint256,bytes)"
)]
pub struct CreateRetryableTicketCall {
    /// Call target on the child chain.
    pub to: H160,
    /// Value of the child-chain call.
    pub l2_call_value: U256,
    /// Fee for reserving ticket storage.
    pub max_submission_cost: U256,
    /// Gas surplus recipient.
    pub excess_fee_refund_address: H160,
    /// Call value refund recipient.
    pub call_value_refund_address: H160,
    /// Gas for the redemption attempt.
    pub gas_limit: U256,
    /// Maximum child-chain fee per gas.
    pub max_fee_per_gas: U256,
    /// Calldata of the child-chain call.
    pub data: Bytes,
}

/// Revert raised by the inbox when magic gas values request parameter
/// discovery instead of submission.
#[derive(Clone, Debug, PartialEq, Eq, EthError)]
#[etherror(
    name = "RetryableData",
    abi = "RetryableData(address,address,uint256,uint256,uint256,address,address,uint256,uint256,bytes)"
)]
pub struct RetryableDataError {
    /// Parent-chain submitter.
    pub from: H160,
    /// Call target on the child chain.
    pub to: H160,
    /// Value of the child-chain call.
    pub l2_call_value: U256,
    /// Funds that would accompany the submission.
    pub deposit: U256,
    /// Fee for reserving ticket storage.
    pub max_submission_cost: U256,
    /// Gas surplus recipient.
    pub excess_fee_refund_address: H160,
    /// Call value refund recipient.
    pub call_value_refund_address: H160,
    /// Gas for the redemption attempt.
    pub gas_limit: U256,
    /// Maximum child-chain fee per gas.
    pub max_fee_per_gas: U256,
    /// Calldata of the child-chain call.
    pub data: Bytes,
}

// ---- outboxes ----

/// Whether a child->parent send has been executed.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(name = "isSpent", abi = "isSpent(uint256)")]
pub struct IsSpentCall {
    /// Position of the send.
    pub index: U256,
}

/// Execute a confirmed child->parent send.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(
    name = "executeTransaction",
    abi = "executeTransaction(bytes32[],uint256,address,address,uint256,uint256,uint256,uint256,bytes)"
)]
pub struct ExecuteTransactionCall {
    /// Merkle inclusion proof.
    pub proof: Vec<[u8; 32]>,
    /// Position of the send.
    pub index: U256,
    /// Child-chain sender.
    pub l2_sender: H160,
    /// Parent-chain destination.
    pub to: H160,
    /// Child block of the send.
    pub l2_block: U256,
    /// Parent block observed at the send.
    pub l1_block: U256,
    /// Child-chain timestamp of the send.
    pub l2_timestamp: U256,
    /// Value carried by the send.
    pub value: U256,
    /// Calldata executed on the parent chain.
    pub data: Bytes,
}

/// Execute a legacy outbox entry.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(
    name = "executeTransaction",
    abi = "executeTransaction(uint256,bytes32[],uint256,address,address,uint256,uint256,uint256,uint256,bytes)"
)]
pub struct ClassicExecuteTransactionCall {
    /// The outbox batch holding the message.
    pub batch_num: U256,
    /// Merkle inclusion proof.
    pub proof: Vec<[u8; 32]>,
    /// Merkle path of the message.
    pub path: U256,
    /// Child-chain sender.
    pub l2_sender: H160,
    /// Parent-chain destination.
    pub dest_addr: H160,
    /// Child block of the send.
    pub l2_block: U256,
    /// Parent block observed at the send.
    pub l1_block: U256,
    /// Child-chain timestamp of the send.
    pub l2_timestamp: U256,
    /// Value carried by the send.
    pub amount: U256,
    /// Calldata executed on the parent chain.
    pub calldata_for_l1: Bytes,
}

// ---- rollup ----

/// Number of the latest confirmed assertion.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(name = "latestConfirmed", abi = "latestConfirmed()")]
pub struct LatestConfirmedCall;

/// Send-tree state recorded by an assertion.
#[derive(Clone, Debug, Default, PartialEq, Eq, EthAbiType)]
pub struct GlobalState {
    /// Block hash and send root.
    pub bytes32_vals: [[u8; 32]; 2],
    /// Inbox position counters.
    pub u64_vals: [u64; 2],
}

/// Machine state claimed by an assertion.
#[derive(Clone, Debug, Default, PartialEq, Eq, EthAbiType)]
pub struct ExecutionState {
    /// Chain state at this point.
    pub global_state: GlobalState,
    /// Machine status discriminant.
    pub machine_status: u8,
}

/// The state transition an assertion claims.
#[derive(Clone, Debug, Default, PartialEq, Eq, EthAbiType)]
pub struct RollupAssertion {
    /// State before the asserted blocks.
    pub before_state: ExecutionState,
    /// State after the asserted blocks.
    pub after_state: ExecutionState,
    /// Child blocks covered.
    pub num_blocks: u64,
}

/// Emitted by the rollup when a new assertion is created.
#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "NodeCreated",
    abi = "NodeCreated(uint64,bytes32,bytes32,bytes32,(((bytes32[2],uint64[2]),uint8),((bytes32[2],uint64[2]),uint8),uint64),bytes32,bytes32,uint256)"
)]
pub struct NodeCreatedFilter {
    /// Assertion number.
    #[ethevent(indexed)]
    pub node_num: u64,
    /// Hash of the parent assertion.
    #[ethevent(indexed)]
    pub parent_node_hash: [u8; 32],
    /// Hash of this assertion.
    #[ethevent(indexed)]
    pub node_hash: [u8; 32],
    /// Challengeable execution hash.
    pub execution_hash: [u8; 32],
    /// The claimed state transition.
    pub assertion: RollupAssertion,
    /// Inbox accumulator after the assertion.
    pub after_inbox_batch_acc: [u8; 32],
    /// Verifier module root.
    pub wasm_module_root: [u8; 32],
    /// Inbox length at creation.
    pub inbox_max_count: U256,
}

// ---- events ----

/// Emitted on the child chain when a ticket is created.
#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(name = "TicketCreated", abi = "TicketCreated(bytes32)")]
pub struct TicketCreatedFilter {
    /// The created ticket.
    #[ethevent(indexed)]
    pub ticket_id: [u8; 32],
}

/// Emitted on the child chain whenever redemption of a ticket is
/// scheduled, automatically or manually.
#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "RedeemScheduled",
    abi = "RedeemScheduled(bytes32,bytes32,uint64,uint64,address,uint256,uint256)"
)]
pub struct RedeemScheduledFilter {
    /// The ticket being redeemed.
    #[ethevent(indexed)]
    pub ticket_id: [u8; 32],
    /// The transaction that will attempt the redemption.
    #[ethevent(indexed)]
    pub retry_tx_hash: [u8; 32],
    /// Redemption attempt sequence number.
    #[ethevent(indexed)]
    pub sequence_num: u64,
    /// Gas donated to the attempt.
    pub donated_gas: u64,
    /// Donor of the gas.
    pub gas_donor: H160,
    /// Upper bound on the gas refund.
    pub max_refund: U256,
    /// Submission fee refunded on success.
    pub submission_fee_refund: U256,
}

/// Emitted when a ticket's lifetime is extended.
#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(name = "LifetimeExtended", abi = "LifetimeExtended(bytes32,uint256)")]
pub struct LifetimeExtendedFilter {
    /// The renewed ticket.
    #[ethevent(indexed)]
    pub ticket_id: [u8; 32],
    /// The new expiry timestamp.
    pub new_timeout: U256,
}

/// Emitted by the inbox with the raw message payload.
#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "InboxMessageDelivered",
    abi = "InboxMessageDelivered(uint256,bytes)"
)]
pub struct InboxMessageDeliveredFilter {
    /// Message number assigned at submission.
    #[ethevent(indexed)]
    pub message_num: U256,
    /// Packed message payload.
    pub data: Bytes,
}

/// Emitted by the bridge with the message envelope.
#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "MessageDelivered",
    abi = "MessageDelivered(uint256,bytes32,address,uint8,address,bytes32,uint256,uint64)"
)]
pub struct MessageDeliveredFilter {
    /// Message number assigned at submission.
    #[ethevent(indexed)]
    pub message_index: U256,
    /// Inbox accumulator before this message.
    #[ethevent(indexed)]
    pub before_inbox_acc: [u8; 32],
    /// The inbox that accepted the message.
    pub inbox: H160,
    /// Message kind tag.
    pub kind: u8,
    /// Aliased sender.
    pub sender: H160,
    /// Hash of the message payload.
    pub message_data_hash: [u8; 32],
    /// Parent base fee at submission.
    pub base_fee_l1: U256,
    /// Submission timestamp.
    pub timestamp: u64,
}

/// Emitted by the sys sender for every child->parent send.
#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "L2ToL1Tx",
    abi = "L2ToL1Tx(address,address,uint256,uint256,uint256,uint256,uint256,uint256,bytes)"
)]
pub struct ChildToParentTxFilter {
    /// Child-chain sender.
    pub caller: H160,
    /// Parent-chain destination.
    #[ethevent(indexed)]
    pub destination: H160,
    /// Unique hash of the send.
    #[ethevent(indexed)]
    pub hash: U256,
    /// Position in the send tree.
    #[ethevent(indexed)]
    pub position: U256,
    /// Child block of the send.
    pub arb_block_num: U256,
    /// Parent block observed at the send.
    pub eth_block_num: U256,
    /// Child-chain timestamp.
    pub timestamp: U256,
    /// Value carried by the send.
    pub callvalue: U256,
    /// Calldata executed on the parent chain.
    pub data: Bytes,
}

/// Emitted by a forwarding contract once it has bridged its balance on
/// toward the grandchild chain.
#[derive(Clone, Debug, PartialEq, Eq, EthEvent)]
#[ethevent(
    name = "BridgedToGrandchild",
    abi = "BridgedToGrandchild(address,uint256)"
)]
pub struct BridgedToGrandchildFilter {
    /// The token that was forwarded.
    #[ethevent(indexed)]
    pub token: H160,
    /// The amount forwarded.
    pub amount: U256,
}

// ---- gateway router ----

/// Resolve the gateway a token is routed through.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(name = "getGateway", abi = "getGateway(address)")]
pub struct GetGatewayCall {
    /// The parent-chain token.
    pub token: H160,
}

/// Deposit a token through the gateway router.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(
    name = "outboundTransfer",
    abi = "outboundTransfer(address,address,uint256,uint256,uint256,bytes)"
)]
pub struct OutboundTransferCall {
    /// The parent-chain token.
    pub token: H160,
    /// Recipient on the child chain.
    pub to: H160,
    /// Amount to deposit.
    pub amount: U256,
    /// Gas for the redemption attempt.
    pub max_gas: U256,
    /// Gas price bid for the redemption attempt.
    pub gas_price_bid: U256,
    /// Extra data: max submission cost and a payload.
    pub data: Bytes,
}

// ---- forwarder ----

/// Arbitrary call issued from a forwarding contract by its owner to
/// recover stuck funds.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(name = "rescue", abi = "rescue(address,uint256,bytes)")]
pub struct RescueCall {
    /// Call target.
    pub to: H160,
    /// Value to send.
    pub value: U256,
    /// Calldata of the call.
    pub data: Bytes,
}

/// Decode every log whose first topic matches `T`'s signature.
pub(crate) fn decode_matching_logs<T: EthEvent>(
    logs: &[ethers_core::types::Log],
) -> Result<Vec<T>> {
    logs.iter()
        .filter(|log| log.topics.first() == Some(&T::signature()))
        .map(|log| {
            T::decode_log(&abi::RawLog::from(log.clone())).map_err(|err| {
                Error::Rpc(format!("undecodable {} log: {err}", T::name()))
            })
        })
        .collect()
}

/// Decode a solidity `Error(string)` revert payload.
pub fn decode_revert_string(payload: &[u8]) -> Option<String> {
    const ERROR_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];
    let tail = payload.strip_prefix(&ERROR_SELECTOR[..])?;
    let tokens = abi::decode(&[ParamType::String], tail).ok()?;
    tokens.into_iter().next()?.into_string()
}

/// Parse the packed payload of a submit-retryable inbox message: nine
/// head words (addresses widened to `uint256`) followed by the raw
/// calldata, whose length the ninth word gives.
pub fn parse_submit_retryable_data(data: &[u8]) -> Result<RetryableMessageParams> {
    let malformed = Error::MalformedRevert {
        context: "parsing submit-retryable message data",
    };
    if data.len() < 9 * 32 {
        return Err(malformed);
    }

    let word = |i: usize| U256::from_big_endian(&data[i * 32..(i + 1) * 32]);
    let address = |i: usize| {
        let mut buf = [0u8; 32];
        word(i).to_big_endian(&mut buf);
        hopper_types::Address::from(H160::from_slice(&buf[12..]))
    };

    let data_length = word(8);
    if data_length > U256::from(data.len()) {
        return Err(malformed);
    }
    let call_data = data[data.len() - data_length.as_usize()..].to_vec();

    Ok(RetryableMessageParams {
        dest_address: address(0),
        child_call_value: word(1),
        parent_value: word(2),
        max_submission_fee: word(3),
        excess_fee_refund_address: address(4),
        call_value_refund_address: address(5),
        gas_limit: word(6),
        max_fee_per_gas: word(7),
        data: call_data.into(),
    })
}
