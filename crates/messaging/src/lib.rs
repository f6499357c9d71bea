//! Message lifecycles for the hopper cross-chain protocol engine.
//!
//! Parent->child messages are retryable tickets: the parent chain
//! escrows funds and the child chain executes a derivable transaction
//! once, automatically or by manual redemption, within a bounded
//! lifetime. Child->parent messages accumulate in a send tree and become
//! executable on the parent chain once an assertion covering them is
//! confirmed. [`teleport`] composes two parent->child hops through an
//! intermediate chain.
//!
//! All chain access goes through the [`ports`] traits, implemented for
//! any `ethers` middleware, so every lifecycle works against any
//! provider stack and tests can run against a scripted chain.

#![deny(unused_crate_dependencies)]
#![deny(missing_docs)]

pub mod abi;
pub mod child_to_parent;
mod error;
pub mod estimator;
pub mod parent_to_child;
pub mod ports;
pub mod teleport;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use error::{
    Error,
    Result,
};
