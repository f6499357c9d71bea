use crate::Address;
use ethers_core::types::{
    Bytes,
    H256,
    U256,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::fmt;

/// Lifecycle of a parent->child retryable ticket.
///
/// `Redeemed`, `Expired` and `CreationFailed` are terminal.
/// `FundsDepositedOnChild` is a stable intermediate state: the ticket
/// exists and can be redeemed, cancelled or kept alive until its lifetime
/// elapses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ParentToChildStatus {
    /// No creation transaction has been observed on the child chain yet.
    NotYetCreated,
    /// The creation transaction was mined but reverted, usually because
    /// too little submission cost was paid.
    CreationFailed,
    /// The ticket exists on the child chain and awaits redemption.
    FundsDepositedOnChild,
    /// The ticket was redeemed (automatically or manually) and the child
    /// transaction executed.
    Redeemed,
    /// The ticket expired or was cancelled and can no longer be redeemed.
    Expired,
}

impl ParentToChildStatus {
    /// Whether this status can no longer change.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Redeemed | Self::Expired | Self::CreationFailed
        )
    }
}

impl fmt::Display for ParentToChildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotYetCreated => "NOT_YET_CREATED",
            Self::CreationFailed => "CREATION_FAILED",
            Self::FundsDepositedOnChild => "FUNDS_DEPOSITED_ON_CHILD",
            Self::Redeemed => "REDEEMED",
            Self::Expired => "EXPIRED",
        };
        f.write_str(name)
    }
}

/// Lifecycle of a plain ETH deposit. Deposits have no redemption step;
/// they are either pending or done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EthDepositStatus {
    /// The deposit has not yet landed on the child chain.
    Pending,
    /// The deposit transaction exists on the child chain.
    Deposited,
}

/// Lifecycle of a child->parent exit message. Monotonic and
/// non-reversible: `Unconfirmed -> Confirmed -> Executed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChildToParentStatus {
    /// The message is not yet provable on the parent chain.
    Unconfirmed,
    /// The message is provable and ready to execute.
    Confirmed,
    /// The message has been executed on the parent chain.
    Executed,
}

impl fmt::Display for ChildToParentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unconfirmed => "UNCONFIRMED",
            Self::Confirmed => "CONFIRMED",
            Self::Executed => "EXECUTED",
        };
        f.write_str(name)
    }
}

/// Where a child->parent message lives, depending on which confirmation
/// mechanism the target network uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExitLocation {
    /// Legacy merkle-proof model: an entry in an outbox batch.
    Batch {
        /// The batch containing the message.
        batch_number: U256,
        /// The index of the message within the batch.
        index_in_batch: U256,
    },
    /// Current rollup-assertion model: a position in the global send tree.
    Assertion {
        /// The message's position in the send tree.
        position: U256,
    },
}

/// The message fields delivered to the child chain when a retryable
/// ticket is created, as emitted by the bridge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryableMessageParams {
    /// Call target on the child chain. Zero means "no call target".
    pub dest_address: Address,
    /// Value passed to the child-chain call.
    pub child_call_value: U256,
    /// Value supplied with the parent-chain transaction.
    pub parent_value: U256,
    /// Fee paid for reserving ticket storage on the child chain.
    pub max_submission_fee: U256,
    /// Receives any gas surplus. Aliased by the bridge if it is a
    /// parent-chain contract.
    pub excess_fee_refund_address: Address,
    /// Receives the call value if the ticket expires or is cancelled.
    pub call_value_refund_address: Address,
    /// Gas provided for the redemption attempt.
    pub gas_limit: U256,
    /// Maximum child-chain fee per gas for the redemption attempt.
    pub max_fee_per_gas: U256,
    /// Calldata of the child-chain call.
    pub data: Bytes,
}

/// A retryable ticket request before gas estimation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryableTicketRequest {
    /// The parent-chain account making the request.
    pub from: Address,
    /// Call target on the child chain.
    pub to: Address,
    /// Value passed to the child-chain call.
    pub child_call_value: U256,
    /// Receives any gas surplus on the child chain.
    pub excess_fee_refund_address: Address,
    /// Receives the call value if the ticket is not redeemed.
    pub call_value_refund_address: Address,
    /// Calldata of the child-chain call.
    pub data: Bytes,
}

/// Gas parameters for a retryable ticket, produced by estimation.
///
/// `deposit` is the total that must accompany the parent-chain
/// transaction: `gas_limit * max_fee_per_gas + max_submission_cost +
/// child_call_value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryableGasParams {
    /// Gas provided for the redemption attempt.
    pub gas_limit: U256,
    /// Fee paid for reserving ticket storage on the child chain.
    pub max_submission_cost: U256,
    /// Maximum child-chain fee per gas.
    pub max_fee_per_gas: U256,
    /// Funds that must accompany the parent-chain transaction.
    pub deposit: U256,
}

/// Parameters identifying a forwarding contract on the child chain and
/// instructing it how to bridge onward to the grandchild chain.
///
/// `owner`, `router` and `to` determine the forwarder's deterministic
/// address; the remaining fields are execution instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwarderParams {
    /// May issue arbitrary rescue calls from the forwarder. Defaults to
    /// the depositor; must be overridden when the depositor cannot issue
    /// contract calls itself.
    pub owner: Address,
    /// The child-chain token being forwarded.
    pub token: Address,
    /// The child->grandchild gateway router (or inbox) the forwarder
    /// deposits through.
    pub router: Address,
    /// Final recipient on the grandchild chain.
    pub to: Address,
    /// Gas limit for the child->grandchild redemption.
    pub gas_limit: U256,
    /// Gas price bid for the child->grandchild redemption.
    pub gas_price: U256,
    /// Amount paid to the relayer that triggers the forwarder.
    pub relayer_payment: U256,
}

/// Aggregate status of a two-hop teleportation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeleportStatus {
    /// The parent->child bridge retryable.
    pub bridge_to_child: ParentToChildStatus,
    /// The retryable (or relayed call) that triggers the forwarder.
    pub forwarder_call: ParentToChildStatus,
    /// The child->grandchild bridge retryable. `NotYetCreated` until the
    /// forwarder has actually bridged onward.
    pub bridge_to_grandchild: ParentToChildStatus,
    /// True iff the grandchild-bound retryable has been redeemed.
    pub completed: bool,
}

/// Aggregate status of a nested-retryable ETH teleportation. The
/// grandchild-bound ticket cannot exist before the child-bound ticket is
/// redeemed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthTeleportStatus {
    /// The child-bound outer ticket.
    pub bridge_to_child: ParentToChildStatus,
    /// The grandchild-bound inner ticket.
    pub bridge_to_grandchild: ParentToChildStatus,
    /// True iff the inner ticket has been redeemed.
    pub completed: bool,
}

/// A parent-chain transaction hash paired with the derived child-chain
/// polling key of the message it produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageKey {
    /// Hash of the parent-chain submission transaction.
    pub parent_tx: H256,
    /// Derived child-chain transaction id used for polling.
    pub child_tx: H256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses() {
        assert!(ParentToChildStatus::Redeemed.is_terminal());
        assert!(ParentToChildStatus::Expired.is_terminal());
        assert!(ParentToChildStatus::CreationFailed.is_terminal());
        assert!(!ParentToChildStatus::NotYetCreated.is_terminal());
        assert!(!ParentToChildStatus::FundsDepositedOnChild.is_terminal());
    }

    #[test]
    fn status_names_match_wire_convention() {
        assert_eq!(
            ParentToChildStatus::FundsDepositedOnChild.to_string(),
            "FUNDS_DEPOSITED_ON_CHILD"
        );
        assert_eq!(ChildToParentStatus::Confirmed.to_string(), "CONFIRMED");
    }
}
