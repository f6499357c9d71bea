use thiserror::Error;

/// Errors produced when validating an address string.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum AddressError {
    /// The input is not `0x` followed by 40 hex digits.
    #[error("`{0}` is not a valid address")]
    Malformed(String),
    /// The input is mixed-case but fails the EIP-55 checksum.
    #[error("`{0}` has an invalid checksum")]
    BadChecksum(String),
}
