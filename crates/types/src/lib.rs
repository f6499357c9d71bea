//! Data model for the hopper cross-chain message protocol engine.
//!
//! Everything in this crate is a pure value type: validated addresses and
//! their child-chain aliases, the content-addressed message identities that
//! the child chain derives on-protocol, and the status enums for the
//! parent->child and child->parent message lifecycles. No I/O happens here;
//! the `hopper-messaging` crate drives chain state using these types.

#![deny(unused_crate_dependencies)]
#![deny(missing_docs)]

mod address;
mod error;
pub mod ids;
mod message;

pub use address::{
    Address,
    ALIAS_OFFSET,
};
pub use error::AddressError;
pub use message::{
    ChildToParentStatus,
    EthDepositStatus,
    EthTeleportStatus,
    ExitLocation,
    ForwarderParams,
    MessageKey,
    ParentToChildStatus,
    RetryableGasParams,
    RetryableMessageParams,
    RetryableTicketRequest,
    TeleportStatus,
};
