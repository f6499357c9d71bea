//! Directory of the chains the engine can talk to.
//!
//! A [`ChainRegistry`] maps chain ids to the contract addresses and
//! protocol parameters of each known rollup. Lookups fail fast with
//! [`RegistryError::UnknownChain`] rather than falling through to a
//! default, and registration is guarded against accidental
//! double-registration. There is deliberately no global registry; callers
//! construct one and pass it where it is needed.

#![deny(unused_crate_dependencies)]
#![deny(missing_docs)]

mod chains;
mod registry;
mod seeds;

pub use chains::{
    ChildChain,
    EthBridge,
    ParentChain,
    Teleporter,
    TokenBridge,
};
pub use registry::{
    ChainRegistry,
    RegistryError,
};

/// Chain id of the Ethereum mainnet parent chain.
pub const ETHEREUM_MAINNET: u64 = 1;
/// Chain id of the Arbitrum One child chain.
pub const ARBITRUM_ONE: u64 = 42161;
/// Chain id of the Rinkeby testnet parent chain.
pub const RINKEBY: u64 = 4;
/// Chain id of the Arbitrum Rinkeby testnet child chain.
pub const ARBITRUM_RINKEBY: u64 = 421611;

/// Seconds a retryable ticket lives before it expires, absent renewal.
pub const RETRYABLE_LIFETIME_SECONDS: u64 = 7 * 24 * 60 * 60;
