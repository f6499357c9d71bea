//! Content-addressed message identities.
//!
//! The child chain derives the transaction id of a submitted retryable
//! ticket (and of a plain ETH deposit) from the message contents, so a
//! client can compute the id before submission and use it as the polling
//! key afterwards. These derivations must match the chain bit-for-bit:
//! each integer field is stripped of leading zero bytes, the field list is
//! RLP encoded, a one-byte transaction type tag is prepended, and the
//! whole thing is hashed with keccak-256.

use crate::{
    message::RetryableMessageParams,
    Address,
};
use ethers_core::{
    types::{
        H160,
        H256,
        U256,
    },
    utils::{
        keccak256,
        rlp::RlpStream,
    },
};

/// Transaction type tag for submit-retryable transactions.
const SUBMIT_RETRYABLE_TYPE: u8 = 0x69;
/// Transaction type tag for ETH deposit transactions.
const ETH_DEPOSIT_TYPE: u8 = 0x64;

/// Derive the creation id of a retryable ticket.
///
/// `sender` must already be aliased if the submitting parent-chain account
/// is a contract; the bridge emits it aliased and this function does not
/// second-guess the caller.
pub fn submit_retryable_id(
    child_chain_id: u64,
    message_number: U256,
    sender: Address,
    parent_base_fee: U256,
    params: &RetryableMessageParams,
) -> H256 {
    let mut stream = RlpStream::new_list(13);
    stream.append(&U256::from(child_chain_id));
    stream.append(&left_pad_32(message_number));
    stream.append(&H160::from(sender));
    stream.append(&parent_base_fee);
    stream.append(&params.parent_value);
    stream.append(&params.max_fee_per_gas);
    stream.append(&params.gas_limit);
    // A zero destination means "no call target" and encodes as an empty
    // byte string rather than 20 zero bytes.
    if params.dest_address.is_zero() {
        stream.append_empty_data();
    } else {
        stream.append(&H160::from(params.dest_address));
    }
    stream.append(&params.child_call_value);
    stream.append(&H160::from(params.call_value_refund_address));
    stream.append(&params.max_submission_fee);
    stream.append(&H160::from(params.excess_fee_refund_address));
    stream.append(&params.data.to_vec());

    hash_typed(SUBMIT_RETRYABLE_TYPE, &stream.out())
}

/// Derive the child-chain transaction id of a plain ETH deposit.
pub fn eth_deposit_id(
    child_chain_id: u64,
    message_number: U256,
    from: Address,
    to: Address,
    value: U256,
) -> H256 {
    let mut stream = RlpStream::new_list(5);
    stream.append(&U256::from(child_chain_id));
    stream.append(&left_pad_32(message_number));
    stream.append(&H160::from(from));
    stream.append(&H160::from(to));
    stream.append(&value);

    hash_typed(ETH_DEPOSIT_TYPE, &stream.out())
}

/// Derive the creation id of a pre-nitro (classic) retryable ticket:
/// keccak over the 32-byte chain id and the message number with its top
/// bit set.
pub fn classic_creation_id(child_chain_id: u64, message_number: U256) -> H256 {
    let flipped = message_number | (U256::one() << 255);
    let mut buf = [0u8; 64];
    U256::from(child_chain_id).to_big_endian(&mut buf[..32]);
    flipped.to_big_endian(&mut buf[32..]);
    H256(keccak256(buf))
}

/// The id of the child-chain transaction executed when a classic ticket
/// is redeemed.
pub fn classic_child_tx_id(creation_id: H256) -> H256 {
    classic_derived(creation_id, 0)
}

/// The id of the auto-redeem attempt issued for a classic ticket.
pub fn classic_auto_redeem_id(creation_id: H256) -> H256 {
    classic_derived(creation_id, 1)
}

fn classic_derived(creation_id: H256, kind: u8) -> H256 {
    let mut buf = [0u8; 64];
    buf[..32].copy_from_slice(creation_id.as_bytes());
    buf[63] = kind;
    H256(keccak256(buf))
}

fn hash_typed(type_tag: u8, rlp: &[u8]) -> H256 {
    let mut payload = Vec::with_capacity(rlp.len() + 1);
    payload.push(type_tag);
    payload.extend_from_slice(rlp);
    H256(keccak256(payload))
}

fn left_pad_32(value: U256) -> Vec<u8> {
    let mut buf = [0u8; 32];
    value.to_big_endian(&mut buf);
    buf.to_vec()
}
