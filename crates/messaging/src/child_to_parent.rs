//! Child->parent exit messages.
//!
//! Two confirmation protocols coexist. Legacy networks prove a message
//! by `(batch number, index in batch)` against a merkle proof fetched
//! from the child chain, executed through whichever outbox deployment
//! was active at that batch. Current networks identify a message by its
//! position in the global send tree; it becomes executable once a
//! rollup assertion covering that send is confirmed.

use crate::{
    abi::{
        self,
        decode_matching_logs,
        ChildToParentTxFilter,
        ClassicExecuteTransactionCall,
        ClassicProofData,
        ConstructOutboxProofCall,
        ExecuteTransactionCall,
        IsSpentCall,
        LatestConfirmedCall,
        LegacyLookupMessageBatchProofCall,
        NodeCreatedFilter,
        OutboxProof,
    },
    error::{
        Error,
        Result,
    },
    ports::{
        CallOutcome,
        ChainReader,
        ChainWriter,
        Clock,
    },
};
use ethers_contract::EthEvent;
use ethers_core::{
    abi::{
        AbiDecode,
        AbiEncode,
    },
    types::{
        Bytes,
        Filter,
        TransactionReceipt,
        H256,
        U256,
    },
};
use hopper_registry::EthBridge;
use hopper_types::{
    Address,
    ChildToParentStatus,
};
use std::time::Duration;

/// Default delay between polls while waiting for an outbox entry.
pub const OUTBOX_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// The merkle inclusion proof of a legacy outbox entry, as served by the
/// child chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicProof {
    /// Sibling hashes up the merkle tree.
    pub proof: Vec<[u8; 32]>,
    /// Position encoded along the merkle path.
    pub path: U256,
    /// Child-chain sender.
    pub child_sender: Address,
    /// Parent-chain destination.
    pub parent_dest: Address,
    /// Child block of the send.
    pub child_block: U256,
    /// Parent block observed at the send.
    pub parent_block: U256,
    /// Child-chain timestamp of the send.
    pub timestamp: U256,
    /// Value carried by the send.
    pub amount: U256,
    /// Calldata executed on the parent chain.
    pub calldata: Bytes,
}

/// The outbox deployment that was active when `batch` was produced:
/// the latest whose activation batch does not exceed it.
pub fn outbox_for_batch(bridge: &EthBridge, batch: U256) -> Result<Address> {
    bridge
        .classic_outboxes
        .iter()
        .filter(|(_, activation)| U256::from(*activation) <= batch)
        .next_back()
        .map(|(outbox, _)| *outbox)
        .ok_or(Error::NoClassicOutbox { batch })
}

/// A legacy exit message identified by batch number and index.
#[derive(Debug)]
pub struct ClassicChildToParentMessage<C> {
    child: C,
    batch_number: U256,
    index_in_batch: U256,
}

impl<C: ChainReader> ClassicChildToParentMessage<C> {
    /// A message at the given outbox coordinates.
    pub fn new(child: C, batch_number: U256, index_in_batch: U256) -> Self {
        Self {
            child,
            batch_number,
            index_in_batch,
        }
    }

    /// Fetch the message's inclusion proof, or `None` while the batch is
    /// not yet provable.
    pub async fn try_get_proof(&self) -> Result<Option<ClassicProof>> {
        let call = LegacyLookupMessageBatchProofCall {
            batch_num: self.batch_number,
            index: self.index_in_batch.low_u64(),
        };
        let outcome = self
            .child
            .call(&abi::call_tx(abi::NODE_INTERFACE, call.encode()))
            .await?;
        let data = match outcome {
            CallOutcome::Success(data) => data,
            CallOutcome::Revert(_) => return Ok(None),
        };
        let (proof, path, child_sender, parent_dest, child_block, parent_block, timestamp, amount, calldata) =
            ClassicProofData::decode(&data).map_err(|_| Error::MalformedRevert {
                context: "decoding a legacy outbox proof",
            })?;
        Ok(Some(ClassicProof {
            proof,
            path,
            child_sender: child_sender.into(),
            parent_dest: parent_dest.into(),
            child_block,
            parent_block,
            timestamp,
            amount,
            calldata,
        }))
    }

    /// Resolve the message's status by simulating execution against the
    /// outbox that served its batch.
    pub async fn status<P: ChainReader>(
        &self,
        parent: &P,
        bridge: &EthBridge,
    ) -> Result<ChildToParentStatus> {
        let Some(proof) = self.try_get_proof().await? else {
            return Ok(ChildToParentStatus::Unconfirmed);
        };
        let outbox = outbox_for_batch(bridge, self.batch_number)?;
        let tx = abi::call_tx(outbox.into(), self.execute_call(&proof).encode());
        match parent.call(&tx).await? {
            CallOutcome::Success(_) => Ok(ChildToParentStatus::Confirmed),
            CallOutcome::Revert(payload) => {
                let reason =
                    abi::decode_revert_string(&payload).unwrap_or_default();
                if reason.contains("ALREADY_SPENT") {
                    Ok(ChildToParentStatus::Executed)
                } else if reason.contains("NO_OUTBOX_ENTRY") {
                    Ok(ChildToParentStatus::Unconfirmed)
                } else {
                    Err(Error::MalformedRevert {
                        context: "classifying an outbox execution revert",
                    })
                }
            }
        }
    }

    /// Execute the message on the parent chain. Requires `Confirmed`.
    pub async fn execute<P: ChainWriter>(
        &self,
        parent: &P,
        bridge: &EthBridge,
    ) -> Result<TransactionReceipt> {
        let status = self.status(parent, bridge).await?;
        if status != ChildToParentStatus::Confirmed {
            return Err(Error::invalid_state(ChildToParentStatus::Confirmed, status));
        }
        let proof = self.try_get_proof().await?.ok_or(Error::invalid_state(
            ChildToParentStatus::Confirmed,
            ChildToParentStatus::Unconfirmed,
        ))?;
        let outbox = outbox_for_batch(bridge, self.batch_number)?;
        parent
            .send(abi::call_tx(outbox.into(), self.execute_call(&proof).encode()))
            .await
    }

    /// Poll until the outbox entry exists. Deliberately unbounded: the
    /// underlying confirmation can take on the order of a week, so the
    /// caller applies its own timeout or cancellation.
    pub async fn wait_until_outbox_entry_created<P: ChainReader>(
        &self,
        parent: &P,
        bridge: &EthBridge,
        clock: &impl Clock,
        retry_delay: Duration,
    ) -> Result<ChildToParentStatus> {
        loop {
            let status = self.status(parent, bridge).await?;
            if status != ChildToParentStatus::Unconfirmed {
                return Ok(status);
            }
            tracing::debug!(
                batch = %self.batch_number,
                index = %self.index_in_batch,
                "outbox entry not yet created"
            );
            clock.sleep(retry_delay).await;
        }
    }

    fn execute_call(&self, proof: &ClassicProof) -> ClassicExecuteTransactionCall {
        ClassicExecuteTransactionCall {
            batch_num: self.batch_number,
            proof: proof.proof.clone(),
            path: proof.path,
            l2_sender: proof.child_sender.into(),
            dest_addr: proof.parent_dest.into(),
            l2_block: proof.child_block,
            l1_block: proof.parent_block,
            l2_timestamp: proof.timestamp,
            amount: proof.amount,
            calldata_for_l1: proof.calldata.clone(),
        }
    }
}

/// An assertion-model exit message, identified by its position in the
/// send tree and carrying the send's full event data.
#[derive(Debug)]
pub struct ChildToParentMessage<C> {
    child: C,
    event: ChildToParentTxFilter,
}

impl<C: ChainReader> ChildToParentMessage<C> {
    /// A message from its send event.
    pub fn new(child: C, event: ChildToParentTxFilter) -> Self {
        Self { child, event }
    }

    /// All exit messages produced by a child-chain transaction.
    pub fn from_receipt(child: C, receipt: &TransactionReceipt) -> Result<Vec<Self>>
    where
        C: Clone,
    {
        let events: Vec<ChildToParentTxFilter> = decode_matching_logs(
            &receipt
                .logs
                .iter()
                .filter(|log| log.address == abi::SYS_SENDER)
                .cloned()
                .collect::<Vec<_>>(),
        )?;
        Ok(events
            .into_iter()
            .map(|event| Self::new(child.clone(), event))
            .collect())
    }

    /// The message's position in the send tree.
    pub fn position(&self) -> U256 {
        self.event.position
    }

    /// Resolve the message's status: unconfirmed until a confirmed
    /// assertion covers its send, then executed once spent in the outbox.
    pub async fn status<P: ChainReader>(
        &self,
        parent: &P,
        bridge: &EthBridge,
    ) -> Result<ChildToParentStatus> {
        let Some(send_count) = self.confirmed_send_count(parent, bridge).await? else {
            return Ok(ChildToParentStatus::Unconfirmed);
        };
        if self.event.position >= U256::from(send_count) {
            return Ok(ChildToParentStatus::Unconfirmed);
        }
        if self.has_executed(parent, bridge).await? {
            Ok(ChildToParentStatus::Executed)
        } else {
            Ok(ChildToParentStatus::Confirmed)
        }
    }

    /// Whether the send is already spent in the outbox.
    pub async fn has_executed<P: ChainReader>(
        &self,
        parent: &P,
        bridge: &EthBridge,
    ) -> Result<bool> {
        let call = IsSpentCall { index: self.event.position };
        let data = parent
            .call(&abi::call_tx(bridge.outbox.into(), call.encode()))
            .await?
            .expect_success("outbox isSpent")?;
        bool::decode(&data).map_err(|_| Error::MalformedRevert {
            context: "decoding outbox isSpent",
        })
    }

    /// Fetch the merkle proof for the send against a confirmed send
    /// count.
    pub async fn outbox_proof(&self, send_count: u64) -> Result<Vec<[u8; 32]>> {
        let call = ConstructOutboxProofCall {
            size: send_count,
            leaf: self.event.position.low_u64(),
        };
        let data = self
            .child
            .call(&abi::call_tx(abi::NODE_INTERFACE, call.encode()))
            .await?
            .expect_success("constructOutboxProof")?;
        let (_send, _root, proof) =
            OutboxProof::decode(&data).map_err(|_| Error::MalformedRevert {
                context: "decoding an outbox proof",
            })?;
        Ok(proof)
    }

    /// Execute the message on the parent chain. Requires `Confirmed`.
    pub async fn execute<P: ChainWriter>(
        &self,
        parent: &P,
        bridge: &EthBridge,
    ) -> Result<TransactionReceipt> {
        let send_count = self.confirmed_send_count(parent, bridge).await?;
        let status = match send_count {
            Some(count) if self.event.position < U256::from(count) => {
                if self.has_executed(parent, bridge).await? {
                    ChildToParentStatus::Executed
                } else {
                    ChildToParentStatus::Confirmed
                }
            }
            _ => ChildToParentStatus::Unconfirmed,
        };
        if status != ChildToParentStatus::Confirmed {
            return Err(Error::invalid_state(ChildToParentStatus::Confirmed, status));
        }
        // send_count is Some by the status check above.
        let proof = self.outbox_proof(send_count.unwrap_or_default()).await?;
        let call = ExecuteTransactionCall {
            proof,
            index: self.event.position,
            l2_sender: self.event.caller,
            to: self.event.destination,
            l2_block: self.event.arb_block_num,
            l1_block: self.event.eth_block_num,
            l2_timestamp: self.event.timestamp,
            value: self.event.callvalue,
            data: self.event.data.clone(),
        };
        parent
            .send(abi::call_tx(bridge.outbox.into(), call.encode()))
            .await
    }

    /// Poll until the send is covered by a confirmed assertion.
    /// Deliberately unbounded, like the classic variant.
    pub async fn wait_until_outbox_entry_created<P: ChainReader>(
        &self,
        parent: &P,
        bridge: &EthBridge,
        clock: &impl Clock,
        retry_delay: Duration,
    ) -> Result<ChildToParentStatus> {
        loop {
            let status = self.status(parent, bridge).await?;
            if status != ChildToParentStatus::Unconfirmed {
                return Ok(status);
            }
            tracing::debug!(position = %self.event.position, "send not yet confirmed");
            clock.sleep(retry_delay).await;
        }
    }

    /// Send count covered by the latest confirmed assertion, or `None`
    /// before any assertion is confirmed.
    async fn confirmed_send_count<P: ChainReader>(
        &self,
        parent: &P,
        bridge: &EthBridge,
    ) -> Result<Option<u64>> {
        let data = parent
            .call(&abi::call_tx(bridge.rollup.into(), LatestConfirmedCall.encode()))
            .await?
            .expect_success("rollup latestConfirmed")?;
        let node_num = u64::decode(&data).map_err(|_| Error::MalformedRevert {
            context: "decoding rollup latestConfirmed",
        })?;

        let filter = Filter::new()
            .address(ethers_core::types::H160::from(bridge.rollup))
            .topic0(NodeCreatedFilter::signature())
            .topic1(H256::from_low_u64_be(node_num));
        let logs = parent.logs(&filter).await?;
        let Some(created) = decode_matching_logs::<NodeCreatedFilter>(&logs)?
            .into_iter()
            .next()
        else {
            return Ok(None);
        };

        let block_hash =
            H256(created.assertion.after_state.global_state.bytes32_vals[0]);
        let block = self
            .child
            .block_by_hash(block_hash)
            .await?
            .ok_or_else(|| Error::Rpc(format!("assertion block {block_hash} not found")))?;
        let send_count: U256 = block
            .other
            .get_deserialized("sendCount")
            .and_then(|parsed| parsed.ok())
            .ok_or_else(|| Error::Rpc("child block does not report a send count".into()))?;
        Ok(Some(send_count.low_u64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        abi::{
            ExecutionState,
            GlobalState,
            IsSpentCall,
            LatestConfirmedCall,
            NODE_INTERFACE,
            RollupAssertion,
        },
        test_helpers::{
            block,
            block_hash,
            log,
            receipt,
            with_send_count,
            FakeClock,
            MockChain,
        },
    };
    use ethers_contract::EthCall;
    use ethers_core::{
        abi::{
            Token,
            Tokenizable,
        },
        types::{
            H160,
            NameOrAddress,
        },
    };

    const OUTBOX: H160 = H160([0x0b; 20]);
    const ROLLUP: H160 = H160([0x0c; 20]);
    const CLASSIC_OUTBOX_V1: H160 = H160([0x0d; 20]);
    const CLASSIC_OUTBOX_V2: H160 = H160([0x0e; 20]);

    fn bridge() -> EthBridge {
        EthBridge {
            bridge: Address::ZERO,
            inbox: Address::ZERO,
            sequencer_inbox: Address::ZERO,
            rollup: ROLLUP.into(),
            outbox: OUTBOX.into(),
            classic_outboxes: vec![
                (CLASSIC_OUTBOX_V1.into(), 0),
                (CLASSIC_OUTBOX_V2.into(), 30),
            ],
        }
    }

    fn revert_string(reason: &str) -> Vec<u8> {
        let mut payload = vec![0x08, 0xc3, 0x79, 0xa0];
        payload.extend(ethers_core::abi::encode(&[Token::String(reason.into())]));
        payload
    }

    fn proof_data() -> ClassicProofData {
        (
            vec![[1u8; 32], [2u8; 32]],
            U256::from(3u64),
            H160::from_low_u64_be(0x64),
            H160::from_low_u64_be(0x65),
            U256::from(100u64),
            U256::from(200u64),
            U256::from(1_700_000_000u64),
            U256::from(5_000u64),
            Bytes::from(vec![0xaa, 0xbb]),
        )
    }

    fn send_event(position: u64) -> ChildToParentTxFilter {
        ChildToParentTxFilter {
            caller: H160::from_low_u64_be(0x64),
            destination: H160::from_low_u64_be(0x65),
            hash: U256::from(position),
            position: U256::from(position),
            arb_block_num: U256::from(100u64),
            eth_block_num: U256::from(200u64),
            timestamp: U256::from(1_700_000_000u64),
            callvalue: U256::from(5_000u64),
            data: Bytes::from(vec![0xaa, 0xbb]),
        }
    }

    fn node_created_log(node_num: u64, child_block_hash: H256) -> ethers_core::types::Log {
        let assertion = RollupAssertion {
            before_state: Default::default(),
            after_state: ExecutionState {
                global_state: GlobalState {
                    bytes32_vals: [child_block_hash.0, [0u8; 32]],
                    u64_vals: [0, 0],
                },
                machine_status: 1,
            },
            num_blocks: 10,
        };
        log(
            ROLLUP,
            vec![
                NodeCreatedFilter::signature(),
                H256::from_low_u64_be(node_num),
                H256::from_low_u64_be(0x1111),
                H256::from_low_u64_be(0x2222),
            ],
            ethers_core::abi::encode(&[
                Token::FixedBytes(vec![0u8; 32]),
                assertion.into_token(),
                Token::FixedBytes(vec![0u8; 32]),
                Token::FixedBytes(vec![0u8; 32]),
                Token::Uint(U256::from(99u64)),
            ]),
            200,
            H256::from_low_u64_be(0x3333),
        )
    }

    fn script_confirmed_node(parent: &MockChain, child: &MockChain, send_count: u64) {
        parent.script_return(ROLLUP, LatestConfirmedCall::selector(), 1u64.encode());
        parent.push_log(node_created_log(1, block_hash(50)));
        child.insert_block(with_send_count(block(50, 1_700_000_000), send_count));
    }

    mod classic {
        use super::*;
        use test_case::test_case;

        #[test_case(0, CLASSIC_OUTBOX_V1; "first batch uses the first outbox")]
        #[test_case(29, CLASSIC_OUTBOX_V1; "last batch before the upgrade")]
        #[test_case(30, CLASSIC_OUTBOX_V2; "activation batch uses the new outbox")]
        #[test_case(1_000, CLASSIC_OUTBOX_V2; "later batches use the new outbox")]
        fn outbox_selection(batch: u64, expected: H160) {
            let outbox = outbox_for_batch(&bridge(), U256::from(batch)).unwrap();
            assert_eq!(H160::from(outbox), expected);
        }

        #[test]
        fn no_outbox_without_deployments() {
            let mut bridge = bridge();
            bridge.classic_outboxes.clear();
            assert!(matches!(
                outbox_for_batch(&bridge, U256::zero()),
                Err(Error::NoClassicOutbox { .. })
            ));
        }

        #[tokio::test]
        async fn unprovable_message_is_unconfirmed() {
            let child = MockChain::new(42161);
            let parent = MockChain::new(1);
            child.script_revert(
                NODE_INTERFACE,
                LegacyLookupMessageBatchProofCall::selector(),
                revert_string("BATCH_NOT_FOUND"),
            );
            let msg = ClassicChildToParentMessage::new(
                child,
                U256::from(42u64),
                U256::zero(),
            );
            assert_eq!(
                msg.status(&parent, &bridge()).await.unwrap(),
                ChildToParentStatus::Unconfirmed
            );
        }

        #[tokio::test]
        async fn execution_simulation_classifies_status() {
            for (script, expected) in [
                (None, ChildToParentStatus::Confirmed),
                (
                    Some(revert_string("ALREADY_SPENT")),
                    ChildToParentStatus::Executed,
                ),
                (
                    Some(revert_string("NO_OUTBOX_ENTRY")),
                    ChildToParentStatus::Unconfirmed,
                ),
            ] {
                let child = MockChain::new(42161);
                let parent = MockChain::new(1);
                child.script_return(
                    NODE_INTERFACE,
                    LegacyLookupMessageBatchProofCall::selector(),
                    proof_data().encode(),
                );
                match script {
                    None => parent.script_return(
                        CLASSIC_OUTBOX_V2,
                        ClassicExecuteTransactionCall::selector(),
                        vec![],
                    ),
                    Some(payload) => parent.script_revert(
                        CLASSIC_OUTBOX_V2,
                        ClassicExecuteTransactionCall::selector(),
                        payload,
                    ),
                }
                let msg = ClassicChildToParentMessage::new(
                    child,
                    U256::from(42u64),
                    U256::zero(),
                );
                assert_eq!(msg.status(&parent, &bridge()).await.unwrap(), expected);
            }
        }

        #[tokio::test]
        async fn unrecognized_revert_is_an_error() {
            let child = MockChain::new(42161);
            let parent = MockChain::new(1);
            child.script_return(
                NODE_INTERFACE,
                LegacyLookupMessageBatchProofCall::selector(),
                proof_data().encode(),
            );
            parent.script_revert(
                CLASSIC_OUTBOX_V2,
                ClassicExecuteTransactionCall::selector(),
                vec![0xde, 0xad],
            );
            let msg = ClassicChildToParentMessage::new(
                child,
                U256::from(42u64),
                U256::zero(),
            );
            assert!(matches!(
                msg.status(&parent, &bridge()).await,
                Err(Error::MalformedRevert { .. })
            ));
        }

        #[tokio::test]
        async fn execute_requires_confirmed() {
            let child = MockChain::new(42161);
            let parent = MockChain::new(1);
            child.script_revert(
                NODE_INTERFACE,
                LegacyLookupMessageBatchProofCall::selector(),
                revert_string("BATCH_NOT_FOUND"),
            );
            let msg = ClassicChildToParentMessage::new(
                child,
                U256::from(42u64),
                U256::zero(),
            );
            assert!(matches!(
                msg.execute(&parent, &bridge()).await,
                Err(Error::InvalidState { .. })
            ));
            assert!(parent.sent().is_empty());
        }

        #[tokio::test]
        async fn execute_targets_the_batch_outbox() {
            let child = MockChain::new(42161);
            let parent = MockChain::new(1);
            child.script_return(
                NODE_INTERFACE,
                LegacyLookupMessageBatchProofCall::selector(),
                proof_data().encode(),
            );
            parent.script_return(
                CLASSIC_OUTBOX_V1,
                ClassicExecuteTransactionCall::selector(),
                vec![],
            );
            parent.push_send_receipt(receipt(1, 300, vec![]));

            let msg = ClassicChildToParentMessage::new(
                child,
                U256::from(10u64),
                U256::zero(),
            );
            msg.execute(&parent, &bridge()).await.unwrap();

            let sent = parent.sent();
            assert_eq!(sent.len(), 1);
            assert_eq!(
                sent[0].to(),
                Some(&NameOrAddress::Address(CLASSIC_OUTBOX_V1))
            );
        }
    }

    mod assertion {
        use super::*;

        #[tokio::test]
        async fn unconfirmed_before_any_assertion_covers_the_send() {
            let child = MockChain::new(42161);
            let parent = MockChain::new(1);
            // Latest confirmed node has no creation event on record yet.
            parent.script_return(ROLLUP, LatestConfirmedCall::selector(), 1u64.encode());
            let msg = ChildToParentMessage::new(child, send_event(5));
            assert_eq!(
                msg.status(&parent, &bridge()).await.unwrap(),
                ChildToParentStatus::Unconfirmed
            );
        }

        #[tokio::test]
        async fn position_beyond_the_confirmed_count_is_unconfirmed() {
            let child = MockChain::new(42161);
            let parent = MockChain::new(1);
            script_confirmed_node(&parent, &child, 5);
            let msg = ChildToParentMessage::new(child, send_event(5));
            assert_eq!(
                msg.status(&parent, &bridge()).await.unwrap(),
                ChildToParentStatus::Unconfirmed
            );
        }

        #[tokio::test]
        async fn covered_send_is_confirmed_until_spent() {
            let child = MockChain::new(42161);
            let parent = MockChain::new(1);
            script_confirmed_node(&parent, &child, 10);
            parent.script_return(OUTBOX, IsSpentCall::selector(), false.encode());
            let msg = ChildToParentMessage::new(child, send_event(5));
            assert_eq!(
                msg.status(&parent, &bridge()).await.unwrap(),
                ChildToParentStatus::Confirmed
            );
        }

        #[tokio::test]
        async fn spent_send_is_executed() {
            let child = MockChain::new(42161);
            let parent = MockChain::new(1);
            script_confirmed_node(&parent, &child, 10);
            parent.script_return(OUTBOX, IsSpentCall::selector(), true.encode());
            let msg = ChildToParentMessage::new(child, send_event(5));
            assert_eq!(
                msg.status(&parent, &bridge()).await.unwrap(),
                ChildToParentStatus::Executed
            );
        }

        #[tokio::test]
        async fn execute_proves_against_the_confirmed_count() {
            let child = MockChain::new(42161);
            let parent = MockChain::new(1);
            script_confirmed_node(&parent, &child, 10);
            parent.script_return(OUTBOX, IsSpentCall::selector(), false.encode());
            let proof: OutboxProof = ([3u8; 32], [4u8; 32], vec![[5u8; 32]]);
            child.script_return(
                NODE_INTERFACE,
                ConstructOutboxProofCall::selector(),
                proof.encode(),
            );
            parent.push_send_receipt(receipt(1, 300, vec![]));

            let msg = ChildToParentMessage::new(child, send_event(5));
            msg.execute(&parent, &bridge()).await.unwrap();

            let sent = parent.sent();
            assert_eq!(sent.len(), 1);
            assert_eq!(sent[0].to(), Some(&NameOrAddress::Address(OUTBOX)));
            let data = sent[0].data().unwrap();
            assert_eq!(&data[..4], ExecuteTransactionCall::selector().as_slice());
        }

        #[tokio::test]
        async fn wait_resolves_once_an_assertion_confirms() {
            let child = MockChain::new(42161);
            let parent = MockChain::new(1);
            // First poll sees node 0, which has no creation event; the
            // second sees node 1, which covers the send.
            parent.script_return(ROLLUP, LatestConfirmedCall::selector(), 0u64.encode());
            parent.script_return(ROLLUP, LatestConfirmedCall::selector(), 1u64.encode());
            parent.push_log(node_created_log(1, block_hash(50)));
            child.insert_block(with_send_count(block(50, 1_700_000_000), 10));
            parent.script_return(OUTBOX, IsSpentCall::selector(), false.encode());

            let msg = ChildToParentMessage::new(child, send_event(5));
            let clock = FakeClock::new();
            let status = msg
                .wait_until_outbox_entry_created(
                    &parent,
                    &bridge(),
                    &clock,
                    OUTBOX_POLL_INTERVAL,
                )
                .await
                .unwrap();
            assert_eq!(status, ChildToParentStatus::Confirmed);
        }

        #[test]
        fn from_receipt_keeps_only_system_sends() {
            let child = MockChain::new(42161);
            let event = send_event(5);
            let data = ethers_core::abi::encode(&[
                Token::Address(event.caller),
                Token::Uint(event.arb_block_num),
                Token::Uint(event.eth_block_num),
                Token::Uint(event.timestamp),
                Token::Uint(event.callvalue),
                Token::Bytes(event.data.to_vec()),
            ]);
            let mut destination_topic = [0u8; 32];
            destination_topic[12..].copy_from_slice(event.destination.as_bytes());
            let topics = vec![
                ChildToParentTxFilter::signature(),
                H256(destination_topic),
                H256::from_low_u64_be(5),
                H256::from_low_u64_be(5),
            ];
            let system = log(abi::SYS_SENDER, topics.clone(), data.clone(), 100, H256::zero());
            let imposter = log(
                H160::from_low_u64_be(0x6666),
                topics,
                data,
                100,
                H256::zero(),
            );

            let messages = ChildToParentMessage::from_receipt(
                child,
                &receipt(1, 100, vec![system, imposter]),
            )
            .unwrap();
            assert_eq!(messages.len(), 1);
            assert_eq!(messages[0].position(), U256::from(5u64));
        }
    }
}
