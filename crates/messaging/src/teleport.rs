//! Two-hop teleportation: parent -> child -> grandchild.
//!
//! The asset always crosses the child chain through a forwarding
//! contract at a deterministic CREATE2 address. In the direct flavor the
//! parent-chain teleporter funds a second retryable that calls the
//! forwarder; in the relayed flavor the forwarder call is left to an
//! off-chain relayer, whose instructions ride at the tail of the
//! ordinary deposit calldata behind a version tag.

use crate::{
    abi::{
        self,
        BridgedToGrandchildFilter,
        GetGatewayCall,
        OutboundTransferCall,
        RescueCall,
    },
    error::{
        Error,
        Result,
    },
    estimator::{
        self,
        FeeEstimator,
        GasOverrides,
        DEFAULT_MAX_FEE_PER_GAS_PERCENT_INCREASE,
        DEFAULT_SUBMISSION_FEE_PERCENT_INCREASE,
    },
    parent_to_child::{
        delivered_messages,
        CreationRequest,
        ParentToChildMessage,
    },
    ports::{
        ChainReader,
        ChainWriter,
    },
};
use ethers_contract::{
    EthAbiType,
    EthCall,
    EthEvent,
};
use ethers_core::{
    abi::{
        AbiDecode,
        AbiEncode,
        Token,
    },
    types::{
        transaction::eip2718::TypedTransaction,
        Bytes,
        Filter,
        TransactionReceipt,
        H160,
        U256,
    },
    utils::{
        get_create2_address_from_hash,
        keccak256,
    },
};
use hopper_registry::{
    ChildChain,
    RegistryError,
    Teleporter,
};
use hopper_types::{
    Address,
    EthTeleportStatus,
    ForwarderParams,
    ParentToChildStatus,
    RetryableGasParams,
    RetryableTicketRequest,
    TeleportStatus,
};

/// Default padding applied to the relayer payment.
pub const DEFAULT_RELAYER_PAYMENT_PERCENT_INCREASE: u64 = 30;

/// Format tag closing a relayer-instruction tail.
pub const RELAYER_INSTRUCTION_VERSION: u8 = 0x01;

/// owner, token, router, to, gas limit, gas price, payment, chain id,
/// plus the version tag byte.
pub const RELAYER_INSTRUCTION_LEN: usize = 8 * 32 + 1;

/// Gas provided to the forwarder-factory retryable.
const FORWARDER_FACTORY_GAS_LIMIT: u64 = 1_000_000;
/// Gas provided to each token-bridge redemption.
const TOKEN_BRIDGE_GAS_LIMIT: u64 = 300_000;
/// Gas a relayer spends submitting the forwarder call.
const FORWARDER_CALL_GAS: u64 = 150_000;
/// Calldata footprint assumed when sizing submission fees.
const TOKEN_BRIDGE_CALLDATA_LEN: usize = 1000;

/// Gas parameters for the three retryables of a teleportation. Auto
/// computation is only possible when both hops use the default
/// gateways; custom gateways require the caller to supply these.
#[derive(Clone, Debug, Default, PartialEq, Eq, EthAbiType)]
pub struct ManualRetryableGasParams {
    /// Gas for the forwarder-factory call on the child chain.
    pub forwarder_factory_gas_limit: U256,
    /// Gas for the parent->child bridge redemption.
    pub child_bridge_gas_limit: U256,
    /// Gas for the child->grandchild bridge redemption.
    pub grandchild_bridge_gas_limit: U256,
    /// Gas price bid on the child chain.
    pub child_gas_price: U256,
    /// Gas price bid on the grandchild chain.
    pub grandchild_gas_price: U256,
    /// Submission fee for the child-bound retryables.
    pub child_submission_cost: U256,
    /// Submission fee for the grandchild-bound retryable.
    pub grandchild_submission_cost: U256,
}

impl ManualRetryableGasParams {
    /// Parent-chain funds a direct teleportation must carry.
    pub fn total_deposit(&self) -> U256 {
        (self.child_bridge_gas_limit + self.forwarder_factory_gas_limit)
            * self.child_gas_price
            + self.grandchild_bridge_gas_limit * self.grandchild_gas_price
            + self.child_submission_cost * U256::from(2u64)
            + self.grandchild_submission_cost
    }
}

/// Entry point call on the parent-chain teleporter.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(
    name = "teleport",
    abi = "teleport(address,address,address,address,uint256,(uint256,uint256,uint256,uint256,uint256,uint256,uint256))"
)]
pub struct TeleportCall {
    /// The parent-chain token.
    pub token: H160,
    /// The parent->child gateway router.
    pub child_router: H160,
    /// The child->grandchild gateway router.
    pub grandchild_router: H160,
    /// Final recipient on the grandchild chain.
    pub to: H160,
    /// Amount to teleport.
    pub amount: U256,
    /// Gas for all three retryables.
    pub gas_params: ManualRetryableGasParams,
}

/// Resolve the child-chain counterpart of a parent-chain token.
#[derive(Clone, Debug, PartialEq, Eq, EthCall)]
#[ethcall(
    name = "calculateL2TokenAddress",
    abi = "calculateL2TokenAddress(address)"
)]
pub struct CalculateChildTokenCall {
    /// The parent-chain token.
    pub token: H160,
}

/// What the caller asks to teleport.
#[derive(Debug, Clone)]
pub struct TeleportRequest {
    /// The parent-chain token.
    pub token: Address,
    /// Final recipient on the grandchild chain.
    pub to: Address,
    /// Amount to teleport.
    pub amount: U256,
    /// Forwarder owner for the rescue path. Defaults to the depositor;
    /// must be overridden when the depositor cannot issue contract
    /// calls itself, or stuck funds become unrecoverable.
    pub owner: Address,
    /// Manual gas parameters. Required when either hop uses a custom
    /// gateway.
    pub gas: Option<ManualRetryableGasParams>,
}

/// A built direct teleportation, ready to sign.
#[derive(Debug, Clone)]
pub struct DirectTeleport {
    /// Unsigned parent-chain teleporter transaction.
    pub tx: TypedTransaction,
    /// The forwarding contract the asset will cross.
    pub forwarder: Address,
    /// The gas parameters priced into the transaction.
    pub gas: ManualRetryableGasParams,
}

/// A built relayed teleportation.
#[derive(Debug, Clone)]
pub struct RelayedTeleport {
    /// Unsigned parent-chain deposit transaction, relayer instructions
    /// appended.
    pub tx: TypedTransaction,
    /// The forwarding contract the asset will cross.
    pub forwarder: Address,
    /// The instructions the relayer will act on.
    pub params: ForwarderParams,
}

/// A built nested-retryable ETH teleportation, ready to sign.
#[derive(Debug, Clone)]
pub struct EthTeleport {
    /// Unsigned parent-chain inbox transaction for the outer ticket.
    pub tx: TypedTransaction,
    /// Gas priced into the child-bound outer ticket.
    pub outer_gas: RetryableGasParams,
    /// Gas priced into the grandchild-bound inner ticket.
    pub inner_gas: RetryableGasParams,
}

/// Builds teleportations between a parent chain and a grandchild chain
/// settling to one of its children.
#[derive(Debug)]
pub struct TeleportOrchestrator<C, G> {
    child: C,
    grandchild: G,
    child_chain: ChildChain,
    grandchild_chain: ChildChain,
}

impl<C: ChainReader + Clone, G: ChainReader + Clone> TeleportOrchestrator<C, G> {
    /// An orchestrator across the two hops. The grandchild chain must
    /// settle to the child chain.
    pub fn new(
        child: C,
        grandchild: G,
        child_chain: ChildChain,
        grandchild_chain: ChildChain,
    ) -> Result<Self> {
        if grandchild_chain.parent_chain_id != child_chain.chain_id {
            return Err(RegistryError::UnknownChain(grandchild_chain.parent_chain_id).into());
        }
        Ok(Self {
            child,
            grandchild,
            child_chain,
            grandchild_chain,
        })
    }

    fn teleporter(&self) -> Result<&Teleporter> {
        self.child_chain
            .teleporter
            .as_ref()
            .ok_or_else(|| RegistryError::MissingTeleporter(self.child_chain.chain_id).into())
    }

    /// The deterministic address of the forwarding contract for the
    /// given owner, onward router and recipient.
    pub fn predict_forwarder(
        &self,
        owner: Address,
        router: Address,
        to: Address,
    ) -> Result<Address> {
        let teleporter = self.teleporter()?;
        let salt = keccak256(ethers_core::abi::encode(&[
            Token::Address(owner.into()),
            Token::Address(router.into()),
            Token::Address(to.into()),
        ]));
        let predicted = get_create2_address_from_hash(
            H160::from(teleporter.forwarder_factory),
            salt,
            teleporter.forwarder_code_hash.0,
        );
        Ok(predicted.into())
    }

    /// Build the single parent-chain transaction of a direct
    /// teleportation.
    pub async fn build_direct<P: ChainReader>(
        &self,
        parent: &P,
        request: &TeleportRequest,
    ) -> Result<DirectTeleport> {
        let teleporter = self.teleporter()?;
        let gas = match &request.gas {
            Some(gas) => gas.clone(),
            None => self.auto_gas_params(parent, request.token).await?,
        };

        let grandchild_router =
            self.grandchild_chain.token_bridge.parent_gateway_router;
        let forwarder =
            self.predict_forwarder(request.owner, grandchild_router, request.to)?;

        let call = TeleportCall {
            token: request.token.into(),
            child_router: self.child_chain.token_bridge.parent_gateway_router.into(),
            grandchild_router: grandchild_router.into(),
            to: request.to.into(),
            amount: request.amount,
            gas_params: gas.clone(),
        };
        let mut tx = abi::call_tx(teleporter.parent_teleporter.into(), call.encode());
        tx.set_value(gas.total_deposit());
        Ok(DirectTeleport { tx, forwarder, gas })
    }

    /// Build the parent-chain deposit of a relayed teleportation, with
    /// relayer instructions appended to the calldata.
    pub async fn build_relayed<P: ChainReader>(
        &self,
        parent: &P,
        request: &TeleportRequest,
    ) -> Result<RelayedTeleport> {
        let gas = match &request.gas {
            Some(gas) => gas.clone(),
            None => self.auto_gas_params(parent, request.token).await?,
        };

        let child_token = self.child_token(parent, request.token).await?;
        let grandchild_router =
            self.grandchild_chain.token_bridge.parent_gateway_router;
        let forwarder =
            self.predict_forwarder(request.owner, grandchild_router, request.to)?;

        // The relayer fronts parent-calldata gas for the forward; pay it
        // in advance, padded against price movement.
        let relayer_payment = percent_increase(
            self.child.gas_price().await? * U256::from(FORWARDER_CALL_GAS),
            U256::from(DEFAULT_RELAYER_PAYMENT_PERCENT_INCREASE),
        );
        let params = ForwarderParams {
            owner: request.owner,
            token: child_token,
            router: grandchild_router,
            to: request.to,
            gas_limit: gas.grandchild_bridge_gas_limit,
            gas_price: gas.grandchild_gas_price,
            relayer_payment,
        };

        let extra = ethers_core::abi::encode(&[
            Token::Uint(gas.child_submission_cost),
            Token::Bytes(Vec::new()),
        ]);
        let deposit = OutboundTransferCall {
            token: request.token.into(),
            to: forwarder.into(),
            amount: request.amount,
            max_gas: gas.child_bridge_gas_limit,
            gas_price_bid: gas.child_gas_price,
            data: extra.into(),
        };
        let mut calldata = deposit.encode();
        calldata.extend_from_slice(&encode_relayer_instructions(
            &params,
            self.grandchild_chain.chain_id,
        ));

        let mut tx = abi::call_tx(
            self.child_chain.token_bridge.parent_gateway_router.into(),
            calldata,
        );
        tx.set_value(
            gas.child_bridge_gas_limit * gas.child_gas_price
                + gas.child_submission_cost
                + relayer_payment,
        );
        Ok(RelayedTeleport { tx, forwarder, params })
    }

    /// Build the single parent-chain transaction of an ETH
    /// teleportation. The grandchild-bound ticket-creation calldata is
    /// built first, then wrapped whole as the payload of a child-bound
    /// ticket targeting the grandchild chain's inbox, with the inner
    /// deposit carried as the outer ticket's call value.
    pub async fn build_eth<P: ChainReader>(
        &self,
        parent: &P,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<EthTeleport> {
        let inner_estimator = FeeEstimator::new(self.grandchild.clone());
        let child_base_fee = self.child.base_fee().await?;
        let inner = CreationRequest::build(
            &inner_estimator,
            self.grandchild_chain.eth_bridge.inbox,
            RetryableTicketRequest {
                from,
                to,
                child_call_value: amount,
                excess_fee_refund_address: to,
                call_value_refund_address: to,
                data: Bytes::new(),
            },
            child_base_fee,
            &GasOverrides::default(),
        )
        .await?;

        let inner_calldata = inner.tx.data().cloned().unwrap_or_default();
        let outer_estimator = FeeEstimator::new(self.child.clone());
        let parent_base_fee = parent.base_fee().await?;
        let outer = CreationRequest::build(
            &outer_estimator,
            self.child_chain.eth_bridge.inbox,
            RetryableTicketRequest {
                from,
                to: self.grandchild_chain.eth_bridge.inbox,
                child_call_value: inner.gas.deposit,
                excess_fee_refund_address: from,
                call_value_refund_address: from,
                data: inner_calldata,
            },
            parent_base_fee,
            &GasOverrides::default(),
        )
        .await?;

        Ok(EthTeleport {
            tx: outer.tx,
            outer_gas: outer.gas,
            inner_gas: inner.gas,
        })
    }

    /// Issue a rescue call from the forwarding contract. Only the
    /// nominated owner can do this.
    pub async fn rescue<W: ChainWriter>(
        &self,
        child: &W,
        params: &ForwarderParams,
        to: Address,
        value: U256,
        data: Vec<u8>,
    ) -> Result<TransactionReceipt> {
        if child.sender() != params.owner {
            return Err(Error::invalid_state(
                format!("forwarder owner {}", params.owner),
                format!("sender {}", child.sender()),
            ));
        }
        let forwarder =
            self.predict_forwarder(params.owner, params.router, params.to)?;
        let call = RescueCall {
            to: to.into(),
            value,
            data: data.into(),
        };
        child
            .send(abi::call_tx(forwarder.into(), call.encode()))
            .await
    }

    /// Track a direct teleportation from the messages its parent
    /// transaction delivered. `bridge_to_child` carries the asset,
    /// `forwarder_call` triggers the forwarder.
    pub fn teleportation(
        &self,
        bridge_to_child: ParentToChildMessage<C>,
        forwarder_call: Option<ParentToChildMessage<C>>,
        forwarder: Address,
    ) -> Teleportation<C, G> {
        Teleportation {
            child: self.child.clone(),
            grandchild: self.grandchild.clone(),
            grandchild_chain: self.grandchild_chain.clone(),
            bridge_to_child,
            forwarder_call,
            forwarder,
        }
    }

    /// Gas parameters for default-gateway tokens. Fails with an
    /// ambiguous-estimate error when either hop is routed through a
    /// custom gateway.
    async fn auto_gas_params<P: ChainReader>(
        &self,
        parent: &P,
        token: Address,
    ) -> Result<ManualRetryableGasParams> {
        let child_gateway = self.gateway_of(parent, &self.child_chain, token).await?;
        if !self.child_chain.token_bridge.is_default_gateway(child_gateway) {
            return Err(Error::AmbiguousGasEstimate { gateway: child_gateway });
        }
        let child_token = self.child_token(parent, token).await?;
        let grandchild_gateway = self
            .gateway_of(&self.child, &self.grandchild_chain, child_token)
            .await?;
        if !self
            .grandchild_chain
            .token_bridge
            .is_default_gateway(grandchild_gateway)
        {
            return Err(Error::AmbiguousGasEstimate {
                gateway: grandchild_gateway,
            });
        }

        let parent_base_fee = parent.base_fee().await?;
        let child_base_fee = self.child.base_fee().await?;
        let pad_fee = |value: U256| {
            percent_increase(
                value,
                U256::from(DEFAULT_SUBMISSION_FEE_PERCENT_INCREASE),
            )
        };
        let pad_price = |value: U256| {
            percent_increase(
                value,
                U256::from(DEFAULT_MAX_FEE_PER_GAS_PERCENT_INCREASE),
            )
        };

        Ok(ManualRetryableGasParams {
            forwarder_factory_gas_limit: U256::from(FORWARDER_FACTORY_GAS_LIMIT),
            child_bridge_gas_limit: U256::from(TOKEN_BRIDGE_GAS_LIMIT),
            grandchild_bridge_gas_limit: U256::from(TOKEN_BRIDGE_GAS_LIMIT),
            child_gas_price: pad_price(self.child.gas_price().await?),
            grandchild_gas_price: pad_price(self.grandchild.gas_price().await?),
            child_submission_cost: pad_fee(estimator::submission_fee(
                TOKEN_BRIDGE_CALLDATA_LEN,
                parent_base_fee,
            )),
            grandchild_submission_cost: pad_fee(estimator::submission_fee(
                TOKEN_BRIDGE_CALLDATA_LEN,
                child_base_fee,
            )),
        })
    }

    async fn gateway_of<P: ChainReader>(
        &self,
        on: &P,
        chain: &ChildChain,
        token: Address,
    ) -> Result<Address> {
        let call = GetGatewayCall { token: token.into() };
        let data = on
            .call(&abi::call_tx(
                chain.token_bridge.parent_gateway_router.into(),
                call.encode(),
            ))
            .await?
            .expect_success("gateway router getGateway")?;
        let gateway = H160::decode(&data).map_err(|_| Error::MalformedRevert {
            context: "decoding getGateway",
        })?;
        Ok(gateway.into())
    }

    async fn child_token<P: ChainReader>(
        &self,
        parent: &P,
        token: Address,
    ) -> Result<Address> {
        let call = CalculateChildTokenCall { token: token.into() };
        let data = parent
            .call(&abi::call_tx(
                self.child_chain.token_bridge.parent_gateway_router.into(),
                call.encode(),
            ))
            .await?
            .expect_success("gateway router calculateL2TokenAddress")?;
        let child_token = H160::decode(&data).map_err(|_| Error::MalformedRevert {
            context: "decoding calculateL2TokenAddress",
        })?;
        Ok(child_token.into())
    }
}

/// Append-only encoding of relayer instructions: eight 32-byte words
/// (owner, token, router, to, gas limit, gas price, relayer payment,
/// grandchild chain id) closed by the version tag byte.
pub fn encode_relayer_instructions(params: &ForwarderParams, chain_id: u64) -> Vec<u8> {
    let mut tail = ethers_core::abi::encode(&[
        Token::Address(params.owner.into()),
        Token::Address(params.token.into()),
        Token::Address(params.router.into()),
        Token::Address(params.to.into()),
        Token::Uint(params.gas_limit),
        Token::Uint(params.gas_price),
        Token::Uint(params.relayer_payment),
        Token::Uint(U256::from(chain_id)),
    ]);
    tail.push(RELAYER_INSTRUCTION_VERSION);
    tail
}

/// Recover relayer instructions from the tail of deposit calldata. The
/// version tag must match; positional inference alone is not trusted.
pub fn parse_relayer_instructions(calldata: &[u8]) -> Result<(ForwarderParams, u64)> {
    if calldata.len() < RELAYER_INSTRUCTION_LEN {
        return Err(Error::MalformedInstructions);
    }
    let (_, tail) = calldata.split_at(calldata.len() - RELAYER_INSTRUCTION_LEN);
    let (words, tag) = tail.split_at(tail.len() - 1);
    if tag != [RELAYER_INSTRUCTION_VERSION] {
        return Err(Error::MalformedInstructions);
    }

    let word = |i: usize| U256::from_big_endian(&words[i * 32..(i + 1) * 32]);
    let address = |i: usize| -> Result<Address> {
        let value = word(i);
        if value > U256::from_big_endian(&[0xffu8; 20]) {
            return Err(Error::MalformedInstructions);
        }
        let mut buf = [0u8; 32];
        value.to_big_endian(&mut buf);
        Ok(Address::from(H160::from_slice(&buf[12..])))
    };

    let params = ForwarderParams {
        owner: address(0)?,
        token: address(1)?,
        router: address(2)?,
        to: address(3)?,
        gas_limit: word(4),
        gas_price: word(5),
        relayer_payment: word(6),
    };
    let chain_id = word(7);
    if chain_id > U256::from(u64::MAX) {
        return Err(Error::MalformedInstructions);
    }
    Ok((params, chain_id.as_u64()))
}

/// A direct or relayed teleportation in flight.
#[derive(Debug)]
pub struct Teleportation<C, G> {
    child: C,
    grandchild: G,
    grandchild_chain: ChildChain,
    bridge_to_child: ParentToChildMessage<C>,
    /// `None` for the relayed flavor, where the forwarder is triggered
    /// by a plain relayer transaction instead of a retryable.
    forwarder_call: Option<ParentToChildMessage<C>>,
    forwarder: Address,
}

impl<C: ChainReader + Clone, G: ChainReader + Clone> Teleportation<C, G> {
    /// Walk all three steps of the teleportation.
    ///
    /// The grandchild-bound leg reports `NotYetCreated` until the
    /// forwarder has actually bridged onward, even when the first hop is
    /// already redeemed.
    pub async fn status(&self) -> Result<TeleportStatus> {
        let bridge_to_child = self.bridge_to_child.status().await?;

        let bridged = self.bridged_event_receipt().await?;
        let forwarder_call = match &self.forwarder_call {
            Some(message) => message.status().await?,
            // Relayed flavor: the forward either happened or it did not.
            None if bridged.is_some() => ParentToChildStatus::Redeemed,
            None => ParentToChildStatus::NotYetCreated,
        };

        let bridge_to_grandchild = match &bridged {
            None => ParentToChildStatus::NotYetCreated,
            Some(receipt) => self.grandchild_hop_status(receipt).await?,
        };

        Ok(TeleportStatus {
            bridge_to_child,
            forwarder_call,
            bridge_to_grandchild,
            completed: bridge_to_grandchild == ParentToChildStatus::Redeemed,
        })
    }

    /// Receipt of the forwarder's bridging transaction, if it happened.
    async fn bridged_event_receipt(&self) -> Result<Option<TransactionReceipt>> {
        let filter = Filter::new()
            .address(H160::from(self.forwarder))
            .topic0(BridgedToGrandchildFilter::signature());
        let logs = self.child.logs(&filter).await?;
        let Some(tx_hash) = logs.first().and_then(|log| log.transaction_hash) else {
            return Ok(None);
        };
        self.child.receipt(tx_hash).await
    }

    async fn grandchild_hop_status(
        &self,
        bridging_receipt: &TransactionReceipt,
    ) -> Result<ParentToChildStatus> {
        for message in delivered_messages(bridging_receipt)? {
            if let Some(hop) = ParentToChildMessage::from_delivered(
                self.grandchild.clone(),
                &self.grandchild_chain,
                &message,
            )? {
                return hop.status().await;
            }
        }
        Ok(ParentToChildStatus::NotYetCreated)
    }
}

/// Nested-retryable ETH teleportation: the grandchild-bound ticket
/// creation calldata is itself the payload of the child-bound ticket.
#[derive(Debug)]
pub struct EthTeleportation<C, G> {
    grandchild: G,
    grandchild_chain: ChildChain,
    bridge_to_child: ParentToChildMessage<C>,
}

impl<C: ChainReader, G: ChainReader + Clone> EthTeleportation<C, G> {
    /// Track an ETH teleportation by its child-bound ticket.
    pub fn new(
        grandchild: G,
        grandchild_chain: ChildChain,
        bridge_to_child: ParentToChildMessage<C>,
    ) -> Self {
        Self {
            grandchild,
            grandchild_chain,
            bridge_to_child,
        }
    }

    /// Walk both steps. The inner ticket cannot exist before the outer
    /// one is redeemed.
    pub async fn status(&self) -> Result<EthTeleportStatus> {
        let bridge_to_child = self.bridge_to_child.status().await?;
        if bridge_to_child != ParentToChildStatus::Redeemed {
            return Ok(EthTeleportStatus {
                bridge_to_child,
                bridge_to_grandchild: ParentToChildStatus::NotYetCreated,
                completed: false,
            });
        }

        let Some(redeem_receipt) =
            self.bridge_to_child.successful_redeem_receipt().await?
        else {
            return Ok(EthTeleportStatus {
                bridge_to_child,
                bridge_to_grandchild: ParentToChildStatus::NotYetCreated,
                completed: false,
            });
        };

        let mut bridge_to_grandchild = ParentToChildStatus::NotYetCreated;
        for message in delivered_messages(&redeem_receipt)? {
            if let Some(hop) = ParentToChildMessage::from_delivered(
                self.grandchild.clone(),
                &self.grandchild_chain,
                &message,
            )? {
                bridge_to_grandchild = hop.status().await?;
                break;
            }
        }

        Ok(EthTeleportStatus {
            bridge_to_child,
            bridge_to_grandchild,
            completed: bridge_to_grandchild == ParentToChildStatus::Redeemed,
        })
    }
}

fn percent_increase(value: U256, percent: U256) -> U256 {
    value + value * percent / U256::from(100u64)
}
