//! Gas and fee estimation for retryable tickets.
//!
//! Estimates are padded by configurable percentages. Submission fees and
//! the max fee per gas default to generous margins because parent base
//! fee and child gas price move between estimation and inclusion; the gas
//! limit defaults to no padding because child-chain execution cost is
//! comparatively stable.

use crate::{
    abi::{
        self,
        EstimateRetryableTicketCall,
        RetryableDataError,
    },
    error::{
        Error,
        Result,
    },
    ports::ChainReader,
};
use ethers_contract::EthError;
use ethers_core::{
    abi::AbiEncode,
    types::{
        transaction::eip2718::TypedTransaction,
        U256,
    },
};
use hopper_types::{
    RetryableGasParams,
    RetryableTicketRequest,
};

/// Default padding applied to the submission fee.
pub const DEFAULT_SUBMISSION_FEE_PERCENT_INCREASE: u64 = 300;
/// Default padding applied to the simulated gas limit.
pub const DEFAULT_GAS_LIMIT_PERCENT_INCREASE: u64 = 0;
/// Default padding applied to the child gas price.
pub const DEFAULT_MAX_FEE_PER_GAS_PERCENT_INCREASE: u64 = 500;

/// Magic gas limit that asks the inbox to revert with the ticket's
/// parameters instead of submitting it.
pub const PARAMETER_DISCOVERY_GAS_LIMIT: u64 = 1;
/// Magic max fee per gas for parameter discovery.
pub const PARAMETER_DISCOVERY_MAX_FEE_PER_GAS: u64 = 1;

const ONE_ETHER: u64 = 1_000_000_000_000_000_000;

/// An estimate component override: an explicit `base` bypasses the
/// formula or simulation entirely; `percent_increase` replaces the
/// default padding.
#[derive(Debug, Clone, Default)]
pub struct PercentIncrease {
    /// Use this value instead of deriving one.
    pub base: Option<U256>,
    /// Pad the derived value by this percentage.
    pub percent_increase: Option<U256>,
}

/// Gas limit override. `min` floors the padded estimate, for targets
/// whose empirical minimum exceeds what simulation suggests.
#[derive(Debug, Clone, Default)]
pub struct GasLimitOverride {
    /// Use this value instead of simulating.
    pub base: Option<U256>,
    /// Pad the simulated value by this percentage.
    pub percent_increase: Option<U256>,
    /// Floor for the padded value.
    pub min: Option<U256>,
}

/// Per-component estimate overrides.
#[derive(Debug, Clone, Default)]
pub struct GasOverrides {
    /// Gas limit component.
    pub gas_limit: GasLimitOverride,
    /// Submission fee component.
    pub max_submission_fee: PercentIncrease,
    /// Max fee per gas component.
    pub max_fee_per_gas: PercentIncrease,
    /// Replace the computed deposit entirely.
    pub deposit: Option<U256>,
}

fn percent_increase(value: U256, percent: U256) -> U256 {
    value + value * percent / U256::from(100u64)
}

/// The unpadded parent-chain cost of reserving ticket storage.
pub fn submission_fee(calldata_len: usize, parent_base_fee: U256) -> U256 {
    U256::from(calldata_len as u64 * 6 + 1400) * parent_base_fee
}

/// Estimates the gas parameters of retryable tickets against a child
/// chain.
#[derive(Debug)]
pub struct FeeEstimator<C> {
    child: C,
}

impl<C: ChainReader> FeeEstimator<C> {
    /// An estimator reading gas state from `child`.
    pub fn new(child: C) -> Self {
        Self { child }
    }

    /// Estimate all gas parameters for `request`.
    pub async fn estimate(
        &self,
        request: &RetryableTicketRequest,
        parent_base_fee: U256,
        overrides: &GasOverrides,
    ) -> Result<RetryableGasParams> {
        let max_submission_cost = match overrides.max_submission_fee.base {
            Some(base) => base,
            None => percent_increase(
                submission_fee(request.data.len(), parent_base_fee),
                overrides
                    .max_submission_fee
                    .percent_increase
                    .unwrap_or_else(|| DEFAULT_SUBMISSION_FEE_PERCENT_INCREASE.into()),
            ),
        };

        let gas_limit = match overrides.gas_limit.base {
            Some(base) => base,
            None => {
                let simulated = self.simulate_gas_limit(request).await?;
                percent_increase(
                    simulated,
                    overrides
                        .gas_limit
                        .percent_increase
                        .unwrap_or_else(|| DEFAULT_GAS_LIMIT_PERCENT_INCREASE.into()),
                )
            }
        };
        let gas_limit = gas_limit.max(overrides.gas_limit.min.unwrap_or_default());

        let max_fee_per_gas = match overrides.max_fee_per_gas.base {
            Some(base) => base,
            None => percent_increase(
                self.child.gas_price().await?,
                overrides
                    .max_fee_per_gas
                    .percent_increase
                    .unwrap_or_else(|| DEFAULT_MAX_FEE_PER_GAS_PERCENT_INCREASE.into()),
            ),
        };

        let deposit = overrides.deposit.unwrap_or(
            gas_limit * max_fee_per_gas + max_submission_cost + request.child_call_value,
        );

        Ok(RetryableGasParams {
            gas_limit,
            max_submission_cost,
            max_fee_per_gas,
            deposit,
        })
    }

    /// Whether `old` is still a safe estimate given a fresh one: only a
    /// required fee increase invalidates it.
    pub fn is_valid(old: &RetryableGasParams, new: &RetryableGasParams) -> bool {
        old.max_fee_per_gas >= new.max_fee_per_gas
            && old.max_submission_cost >= new.max_submission_cost
    }

    /// Simulate a parent-chain transaction built with the parameter
    /// discovery magic values, decode the ticket parameters from its
    /// revert, and estimate real gas parameters for them.
    pub async fn estimate_from_trigger<P: ChainReader>(
        &self,
        parent: &P,
        trigger: &TypedTransaction,
        overrides: &GasOverrides,
    ) -> Result<(RetryableTicketRequest, RetryableGasParams)> {
        let outcome = parent.call(trigger).await?;
        let payload = outcome.revert_data().ok_or(Error::MalformedRevert {
            context: "call succeeded instead of reverting with ticket parameters",
        })?;
        let data = RetryableDataError::decode_with_selector(payload).ok_or(
            Error::MalformedRevert {
                context: "decoding the ticket-parameter revert",
            },
        )?;

        let request = RetryableTicketRequest {
            from: data.from.into(),
            to: data.to.into(),
            child_call_value: data.l2_call_value,
            excess_fee_refund_address: data.excess_fee_refund_address.into(),
            call_value_refund_address: data.call_value_refund_address.into(),
            data: data.data,
        };
        let parent_base_fee = parent.base_fee().await?;
        let params = self.estimate(&request, parent_base_fee, overrides).await?;
        Ok((request, params))
    }

    async fn simulate_gas_limit(&self, request: &RetryableTicketRequest) -> Result<U256> {
        // The simulated deposit only needs to comfortably cover the call
        // value so the estimate does not fail on balance.
        let call = EstimateRetryableTicketCall {
            sender: request.from.into(),
            deposit: request.child_call_value + U256::from(ONE_ETHER),
            to: request.to.into(),
            l2_call_value: request.child_call_value,
            excess_fee_refund_address: request.excess_fee_refund_address.into(),
            call_value_refund_address: request.call_value_refund_address.into(),
            data: request.data.clone(),
        };
        let mut tx = abi::call_tx(abi::NODE_INTERFACE, call.encode());
        tx.set_from(request.from.into());
        self.child.estimate_gas(&tx).await
    }
}
