use hopper_registry::RegistryError;
use std::time::Duration;
use thiserror::Error;

/// Convenience alias used throughout this crate.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors produced while driving message lifecycles.
///
/// Configuration errors (`Registry`, `AmbiguousGasEstimate`) and
/// protocol-state errors (`InvalidState`) are never retried; transient
/// conditions surface as `Timeout` rather than a silent return; the
/// data-integrity variants (`MalformedRevert`, `MalformedInstructions`,
/// `UnexpectedEventCount`) mean on-chain data did not have the shape the
/// protocol guarantees and the operation must abort rather than guess.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// Chain directory lookup or registration failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Gas cannot be inferred for a token routed through a custom
    /// gateway; the caller must supply manual gas parameters.
    #[error(
        "token is routed through custom gateway {gateway}, manual gas parameters are required"
    )]
    AmbiguousGasEstimate {
        /// The non-default gateway the token resolves to.
        gateway: hopper_types::Address,
    },
    /// No legacy outbox deployment was active at the batch in question.
    #[error("no classic outbox active at batch {batch}")]
    NoClassicOutbox {
        /// The batch number of the message.
        batch: ethers_core::types::U256,
    },
    /// An operation was attempted in the wrong lifecycle state.
    #[error("operation requires {required}, but the message is {actual}")]
    InvalidState {
        /// The state the operation is gated on.
        required: String,
        /// The state actually observed.
        actual: String,
    },
    /// A bounded wait elapsed before the awaited condition held.
    #[error("timed out after waiting {waited:?}")]
    Timeout {
        /// How long the operation waited.
        waited: Duration,
    },
    /// A revert payload did not decode as the expected error type.
    #[error("malformed revert payload while {context}")]
    MalformedRevert {
        /// What was being decoded.
        context: &'static str,
    },
    /// Relayer instructions at the tail of deposit calldata were absent
    /// or did not carry the expected version tag.
    #[error("calldata does not end with well-formed relayer instructions")]
    MalformedInstructions,
    /// Two on-chain event streams that must pair one-to-one did not.
    #[error("expected {expected} {event} events, found {actual}")]
    UnexpectedEventCount {
        /// The event that miscounted.
        event: &'static str,
        /// How many the protocol guarantees.
        expected: usize,
        /// How many were found.
        actual: usize,
    },
    /// The chain RPC endpoint failed or returned something unusable.
    #[error("rpc failure: {0}")]
    Rpc(String),
}

impl Error {
    /// An `InvalidState` from two displayable states.
    pub(crate) fn invalid_state(
        required: impl ToString,
        actual: impl ToString,
    ) -> Self {
        Error::InvalidState {
            required: required.to_string(),
            actual: actual.to_string(),
        }
    }
}
