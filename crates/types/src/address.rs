use crate::error::AddressError;
use ethers_core::{
    types::{
        H160,
        U256,
    },
    utils::to_checksum,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::{
    fmt,
    str::FromStr,
};

/// The constant added to a parent-chain address to obtain its child-chain
/// alias. Subtracting it undoes the aliasing.
pub const ALIAS_OFFSET: H160 = H160([
    0x11, 0x11, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    0x00, 0x00, 0x00, 0x00, 0x00, 0x11, 0x11,
]);

/// A validated 160-bit account address.
///
/// Construction from a string rejects malformed input and bad EIP-55
/// checksums, so every value of this type is a well-formed address.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Address(H160);

impl Address {
    /// The all-zero address. The child chain treats it as "no call target".
    pub const ZERO: Address = Address(H160::zero());

    /// Find the child-chain alias of a parent-chain address.
    pub fn apply_alias(self) -> Address {
        Address(alias(self.0, true))
    }

    /// Find the parent-chain address that aliases to this child-chain address.
    pub fn undo_alias(self) -> Address {
        Address(alias(self.0, false))
    }

    /// Whether this is the zero address.
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// The raw 20 bytes of the address.
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

/// Aliasing is addition of [`ALIAS_OFFSET`] modulo 2^160. The inverse adds
/// the modular complement of the offset instead of subtracting, so values
/// within the offset of zero wrap correctly.
fn alias(addr: H160, forward: bool) -> H160 {
    let modulus = U256::one() << 160;
    let value = U256::from_big_endian(addr.as_bytes());
    let offset = U256::from_big_endian(ALIAS_OFFSET.as_bytes());
    let shifted = if forward {
        value + offset
    } else {
        value + (modulus - offset)
    };
    let wrapped = shifted % modulus;
    let mut buf = [0u8; 32];
    wrapped.to_big_endian(&mut buf);
    H160::from_slice(&buf[12..])
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let hex_part = s
            .strip_prefix("0x")
            .ok_or_else(|| AddressError::Malformed(s.into()))?;
        if hex_part.len() != 40
            || !hex_part.chars().all(|c| c.is_ascii_hexdigit())
        {
            return Err(AddressError::Malformed(s.into()));
        }

        let raw: H160 = hex_part
            .parse()
            .map_err(|_| AddressError::Malformed(s.into()))?;

        // Mixed-case input must carry a valid EIP-55 checksum. All-lowercase
        // and all-uppercase forms are accepted as unchecksummed.
        let has_lower = hex_part.chars().any(|c| c.is_ascii_lowercase());
        let has_upper = hex_part.chars().any(|c| c.is_ascii_uppercase());
        if has_lower && has_upper && to_checksum(&raw, None) != s {
            return Err(AddressError::BadChecksum(s.into()));
        }

        Ok(Address(raw))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&to_checksum(&self.0, None))
    }
}

impl From<H160> for Address {
    fn from(value: H160) -> Self {
        Address(value)
    }
}

impl From<Address> for H160 {
    fn from(value: Address) -> Self {
        value.0
    }
}
