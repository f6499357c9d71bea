use ethers_core::types::H256;
use hopper_types::Address;
use serde::{
    Deserialize,
    Serialize,
};

/// A chain that hosts one or more child rollups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParentChain {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Human-readable name.
    pub name: String,
    /// Average block time, used to size log-scan windows.
    pub block_time_seconds: u64,
    /// Child chains settling to this chain.
    pub child_chain_ids: Vec<u64>,
    /// False for the well-known public networks.
    pub is_custom: bool,
}

/// A child rollup and everything needed to exchange messages with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildChain {
    /// EIP-155 chain id.
    pub chain_id: u64,
    /// Human-readable name.
    pub name: String,
    /// The chain this rollup settles to.
    pub parent_chain_id: u64,
    /// Core message-passing contracts on the parent chain.
    pub eth_bridge: EthBridge,
    /// Token gateway contracts on both chains.
    pub token_bridge: TokenBridge,
    /// Teleportation contracts, present only on chains that host them.
    pub teleporter: Option<Teleporter>,
    /// Parent-chain blocks before a child assertion is confirmable.
    pub confirm_period_blocks: u64,
    /// Seconds a retryable ticket lives before expiring.
    pub retryable_lifetime_seconds: u64,
    /// False for the well-known public networks.
    pub is_custom: bool,
}

/// The parent-chain contracts that carry messages to and from a child
/// chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EthBridge {
    /// Escrows funds and records message merkle roots.
    pub bridge: Address,
    /// Accepts parent->child messages.
    pub inbox: Address,
    /// Accepts batched child-chain transactions.
    pub sequencer_inbox: Address,
    /// Tracks assertions about child-chain state.
    pub rollup: Address,
    /// Executes confirmed child->parent messages.
    pub outbox: Address,
    /// Retired outboxes paired with the first batch number each served,
    /// in activation order. Needed to execute pre-upgrade exits.
    pub classic_outboxes: Vec<(Address, u64)>,
}

/// Token gateway contracts on the parent and child chains.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBridge {
    /// Routes parent-chain deposits to the right gateway.
    pub parent_gateway_router: Address,
    /// Routes child-chain withdrawals to the right gateway.
    pub child_gateway_router: Address,
    /// Default gateway for standard tokens, parent side.
    pub parent_erc20_gateway: Address,
    /// Default gateway for standard tokens, child side.
    pub child_erc20_gateway: Address,
    /// Gateway for tokens with custom child-chain contracts, parent side.
    pub parent_custom_gateway: Address,
    /// Gateway for tokens with custom child-chain contracts, child side.
    pub child_custom_gateway: Address,
    /// Wrapped-ether gateway, parent side.
    pub parent_weth_gateway: Address,
    /// Wrapped-ether gateway, child side.
    pub child_weth_gateway: Address,
    /// Wrapped ether on the parent chain.
    pub parent_weth: Address,
    /// Wrapped ether on the child chain.
    pub child_weth: Address,
}

/// Contracts implementing two-hop teleportation through a child chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Teleporter {
    /// Entry point on the parent chain.
    pub parent_teleporter: Address,
    /// Deploys forwarding contracts on the child chain.
    pub forwarder_factory: Address,
    /// Init code hash of the forwarder proxy, for CREATE2 address
    /// prediction.
    pub forwarder_code_hash: H256,
}

impl TokenBridge {
    /// Whether `gateway` is one of the default gateways, for which manual
    /// gas parameters can be computed without knowing the token's custom
    /// behavior.
    pub fn is_default_gateway(&self, gateway: Address) -> bool {
        gateway == self.parent_erc20_gateway || gateway == self.parent_weth_gateway
    }
}
