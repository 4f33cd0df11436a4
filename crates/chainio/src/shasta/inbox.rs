use alloy::{
    contract::Result as ContractResult,
    providers::Provider,
    rpc::types::{Log, TransactionRequest},
    sol,
};
use alloy_primitives::{Address, B256, Bytes, FixedBytes, U256, aliases::U48};
use tkb_codec::{
    CodecError,
    shasta::{
        ProposeInput, ProposedEventPayload, ProveInput, ProvedEventPayload, decode_proposed_event,
        decode_proved_event, encode_propose_input, encode_prove_input,
    },
};
use tkb_primitives::{Fork, summary::Summary};

use self::IInbox::{Config, IInboxErrors, Proposed, Proved};
use crate::{
    bind::{Binding, BindingError, DecodedLog, FilterOpts, Topics, contract_binding},
    iter::{IterableEvent, IteratorError, ensure_consecutive},
    map_contract_error,
};

contract_binding! {
    /// A wrapper over the Shasta `Inbox` rollup contract.
    ///
    /// Proposals and proofs are submitted as compact byte strings, and the `Proposed` and
    /// `Proved` events carry their payload in the same compact encoding.
    Inbox(IInbox::IInboxInstance),
    errors: IInboxErrors,
    fork: Some(Fork::Shasta),
}

/// The stored hash of a transition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransitionRecordInfo {
    /// The timestamp after which the record can no longer be contested.
    pub finalization_deadline: u64,
    /// The truncated hash of the record.
    pub record_hash: FixedBytes<26>,
}

impl<P: Provider + Clone> Inbox<P> {
    /// Retrieves the immutable inbox configuration.
    pub async fn get_config(&self) -> ContractResult<Config> {
        self.0.getConfig().call().await.map_err(map_contract_error::<IInboxErrors>)
    }

    /// Retrieves the hash of the proposal stored in the ring buffer slot of `proposal_id`.
    pub async fn get_proposal_hash(&self, proposal_id: u64) -> ContractResult<B256> {
        self.0
            .getProposalHash(U48::from(proposal_id))
            .call()
            .await
            .map_err(map_contract_error::<IInboxErrors>)
    }

    /// Retrieves the transition record stored for a proposal and its parent transition.
    pub async fn get_transition_record_hash(
        &self,
        proposal_id: u64,
        parent_transition_hash: B256,
    ) -> ContractResult<TransitionRecordInfo> {
        let res = self
            .0
            .getTransitionRecordHash(U48::from(proposal_id), parent_transition_hash)
            .call()
            .await
            .map_err(map_contract_error::<IInboxErrors>)?;

        Ok(TransitionRecordInfo {
            finalization_deadline: res.finalizationDeadline_.to::<u64>(),
            record_hash: res.recordHash_,
        })
    }

    /// Retrieves the bond balance of `account`.
    pub async fn bond_balance(&self, account: Address) -> ContractResult<U256> {
        self.0.bondBalance(account).call().await.map_err(map_contract_error::<IInboxErrors>)
    }

    /// Returns true if the oldest queued forced inclusion must be processed by the next
    /// proposal.
    pub async fn is_oldest_forced_inclusion_due(&self) -> ContractResult<bool> {
        self.0.isOldestForcedInclusionDue().call().await.map_err(map_contract_error::<IInboxErrors>)
    }

    /// Decode a `Proposed` log of this inbox together with its compact payload.
    pub fn decode_proposed_log(
        &self,
        log: &Log,
    ) -> Result<DecodedLog<ProposedEventPayload>, BindingError> {
        let DecodedLog { event, log } = self.filterer().parse::<Proposed>(log)?;
        Ok(DecodedLog { event: decode_proposed_event(&event.data)?, log })
    }

    /// Decode a `Proved` log of this inbox together with its compact payload.
    pub fn decode_proved_log(
        &self,
        log: &Log,
    ) -> Result<DecodedLog<ProvedEventPayload>, BindingError> {
        let DecodedLog { event, log } = self.filterer().parse::<Proved>(log)?;
        Ok(DecodedLog { event: decode_proved_event(&event.data)?, log })
    }

    /// Fetch and decode the `Proposed` events of a range, checking that their proposal ids are
    /// consecutive.
    pub async fn filter_proposed(
        &self,
        opts: &FilterOpts,
    ) -> Result<Vec<DecodedLog<ProposedEventPayload>>, IteratorError> {
        let logs = self
            .filterer()
            .filter::<Proposed>(opts, &Topics::any())
            .await?
            .collect::<Result<Vec<_>, _>>()?;

        ensure_consecutive(&logs)?;

        let mut decoded = Vec::with_capacity(logs.len());
        for DecodedLog { event, log } in logs {
            let event = decode_proposed_event(&event.data).map_err(BindingError::from)?;
            decoded.push(DecodedLog { event, log });
        }
        Ok(decoded)
    }

    /// Returns a [`TransactionRequest`] for `propose` with the compact encoding of `input`.
    pub fn propose_request(&self, input: &ProposeInput) -> Result<TransactionRequest, CodecError> {
        let data = encode_propose_input(input)?;
        Ok(self.0.propose(Bytes::new(), data).into_transaction_request())
    }

    /// Returns a [`TransactionRequest`] for `prove` with the compact encoding of `input`.
    pub fn prove_request(
        &self,
        input: &ProveInput,
        proof: Bytes,
    ) -> Result<TransactionRequest, CodecError> {
        let data = encode_prove_input(input)?;
        Ok(self.0.prove(data, proof).into_transaction_request())
    }
}

impl IterableEvent for Proposed {
    fn sequence_id(&self) -> Option<u64> {
        // An undecodable payload has no id and is reported when the payload is decoded.
        decode_proposed_event(&self.data).ok().map(|payload| payload.proposal.id.to::<u64>())
    }
}

impl IterableEvent for Proved {}

impl Summary for Proposed {
    fn summary(&self) -> String {
        match decode_proposed_event(&self.data) {
            Ok(payload) => payload.summary(),
            Err(err) => format!("undecodable payload ({} bytes): {err}", self.data.len()),
        }
    }
}

impl Summary for Proved {
    fn summary(&self) -> String {
        match decode_proved_event(&self.data) {
            Ok(payload) => payload.summary(),
            Err(err) => format!("undecodable payload ({} bytes): {err}", self.data.len()),
        }
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IInbox {
        error BlobNotFound();
        error BondInstructionsLengthExceeded();
        error CheckpointMismatch();
        error DeadlineExceeded();
        error EmptyProposals();
        error ExceedsUnfinalizedProposalCapacity();
        error InconsistentParams();
        error IncorrectProposalCount();
        error InvalidBondType();
        error InvalidCoreState();
        error InvalidLastProposalProof();
        error InvalidSpan();
        error InvalidState();
        error LengthExceedsUint24();
        error MetadataLengthMismatch();
        error NextProposalHashMismatch();
        error NoBlobs();
        error NoBondToWithdraw();
        error ProposalHashMismatch();
        error ProposalHashMismatchWithTransition();
        error ProposalTransitionLengthMismatch();
        error SpanOutOfBounds();
        error TransitionRecordHashMismatchWithStorage();
        error TransitionRecordNotProvided();
        error UnprocessedForcedInclusionIsDue();

        event BondInstructed(BondInstruction[] instructions);
        event BondWithdrawn(address indexed user, uint256 amount);
        event ForcedInclusionStored(ForcedInclusion forcedInclusion);
        event Proposed(bytes data);
        event Proved(bytes data);

        #[derive(Default)]
        struct ProposeInput {
            uint48 deadline;
            CoreState coreState;
            Proposal[] parentProposals;
            BlobReference blobReference;
            TransitionRecord[] transitionRecords;
            Checkpoint checkpoint;
            uint8 numForcedInclusions;
        }

        #[derive(Default)]
        struct CoreState {
            uint48 nextProposalId;
            uint48 lastFinalizedProposalId;
            bytes32 lastFinalizedTransitionHash;
            bytes32 bondInstructionsHash;
        }

        #[derive(Default)]
        struct Proposal {
            uint48 id;
            uint48 timestamp;
            uint48 endOfSubmissionWindowTimestamp;
            address proposer;
            bytes32 coreStateHash;
            bytes32 derivationHash;
        }

        #[derive(Default)]
        struct BlobReference {
            uint16 blobStartIndex;
            uint16 numBlobs;
            uint24 offset;
        }

        #[derive(Default)]
        struct TransitionRecord {
            uint8 span;
            BondInstruction[] bondInstructions;
            bytes32 transitionHash;
            bytes32 checkpointHash;
        }

        #[derive(Default)]
        struct BondInstruction {
            uint48 proposalId;
            uint8 bondType;
            address payer;
            address receiver;
        }

        #[derive(Default)]
        struct Checkpoint {
            uint48 blockNumber;
            bytes32 blockHash;
            bytes32 stateRoot;
        }

        #[derive(Default)]
        struct ProposedEventPayload {
            Proposal proposal;
            Derivation derivation;
            CoreState coreState;
        }

        #[derive(Default)]
        struct Derivation {
            uint48 originBlockNumber;
            bytes32 originBlockHash;
            bool isForcedInclusion;
            uint8 basefeeSharingPctg;
            BlobSlice blobSlice;
        }

        #[derive(Default)]
        struct BlobSlice {
            bytes32[] blobHashes;
            uint24 offset;
            uint48 timestamp;
        }

        #[derive(Default)]
        struct ProveInput {
            Proposal[] proposals;
            Transition[] transitions;
            TransitionMetadata[] metadata;
        }

        #[derive(Default)]
        struct Transition {
            bytes32 proposalHash;
            bytes32 parentTransitionHash;
            Checkpoint checkpoint;
        }

        #[derive(Default)]
        struct TransitionMetadata {
            address designatedProver;
            address actualProver;
        }

        #[derive(Default)]
        struct ProvedEventPayload {
            uint48 proposalId;
            Transition transition;
            TransitionRecord transitionRecord;
            TransitionMetadata metadata;
        }

        #[derive(Default)]
        struct Config {
            address bondToken;
            address checkpointManager;
            address proofVerifier;
            address proposerChecker;
            uint48 provingWindow;
            uint48 extendedProvingWindow;
            uint256 maxFinalizationCount;
            uint48 finalizationGracePeriod;
            uint256 ringBufferSize;
            uint8 basefeeSharingPctg;
            uint256 minForcedInclusionCount;
            uint64 forcedInclusionDelay;
            uint64 forcedInclusionFeeInGwei;
        }

        #[derive(Default)]
        struct ForcedInclusion {
            uint64 feeInGwei;
            BlobSlice blobSlice;
        }

        function bondBalance(address account) external view returns (uint256 bond);
        function decodeProposeInput(bytes memory _data) external pure returns (ProposeInput memory);
        function decodeProposedEventData(bytes memory _data) external pure
            returns (ProposedEventPayload memory);
        function decodeProveInput(bytes memory _data) external pure returns (ProveInput memory);
        function decodeProvedEventData(bytes memory _data) external pure
            returns (ProvedEventPayload memory);
        function encodeProposeInput(ProposeInput memory _input) external pure
            returns (bytes memory);
        function encodeProposedEventData(ProposedEventPayload memory _payload) external pure
            returns (bytes memory);
        function encodeProposedEventPayload(ProposedEventPayload memory _payload) external pure
            returns (bytes memory);
        function encodeProveInput(ProveInput memory _input) external pure returns (bytes memory);
        function encodeProvedEventData(ProvedEventPayload memory _payload) external pure
            returns (bytes memory);
        function encodeProvedEventPayload(ProvedEventPayload memory _payload) external pure
            returns (bytes memory);
        function getConfig() external view returns (Config memory config_);
        function getProposalHash(uint48 _proposalId) external view returns (bytes32 proposalHash_);
        function getTransitionRecordHash(uint48 _proposalId, bytes32 _parentTransitionHash) external view
            returns (uint48 finalizationDeadline_, bytes26 recordHash_);
        function hashCheckpoint(Checkpoint memory _checkpoint) external pure returns (bytes32);
        function hashCoreState(CoreState memory _coreState) external pure returns (bytes32);
        function hashDerivation(Derivation memory _derivation) external pure returns (bytes32);
        function hashProposal(Proposal memory _proposal) external pure returns (bytes32);
        function hashTransition(Transition memory _transition) external pure returns (bytes32);
        function hashTransitionsArray(Transition[] memory _transitions) external pure
            returns (bytes32);
        function initV3(address _owner, bytes32 _genesisBlockHash) external;
        function isOldestForcedInclusionDue() external view returns (bool);
        function propose(bytes memory, bytes memory _data) external;
        function prove(bytes memory _data, bytes memory _proof) external;
        function storeForcedInclusion(BlobReference memory _blobReference) external payable;
        function withdrawBond(address _address) external;
    }
}

#[cfg(test)]
mod tests {
    use alloy::rpc::types::Header;
    use alloy_sol_types::{SolCall, SolError};
    use serde_json::{Value, json};
    use tkb_codec::shasta::{self, decode_propose_input, encode_proposed_event};

    use super::*;
    use crate::test_utils::{MockNode, header, log_json};

    const INBOX: Address = Address::repeat_byte(0x30);

    fn payload(id: u64) -> ProposedEventPayload {
        ProposedEventPayload {
            proposal: shasta::Proposal {
                id: U48::from(id),
                proposer: Address::repeat_byte(0xaa),
                ..Default::default()
            },
            derivation: shasta::Derivation {
                blobSlice: shasta::BlobSlice {
                    blobHashes: vec![B256::repeat_byte(1)],
                    ..Default::default()
                },
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn proposed(id: u64) -> Proposed {
        Proposed { data: encode_proposed_event(&payload(id)).unwrap() }
    }

    fn logs_node(
        ids: &'static [u64],
    ) -> impl Fn(&str, &Value) -> Result<Value, Value> + Send + Sync + 'static {
        move |method, _| {
            assert_eq!(method, "eth_getLogs");
            let block: Header = header(9, 0);
            let logs: Vec<_> = ids
                .iter()
                .enumerate()
                .map(|(i, id)| log_json(INBOX, &proposed(*id), &block, i as u64))
                .collect();
            Ok(json!(logs))
        }
    }

    #[test]
    fn proposed_sequence_id_and_summary() {
        let event = proposed(41);
        assert_eq!(event.sequence_id(), Some(41));
        assert!(event.summary().starts_with("proposal id: 41"), "{}", event.summary());

        let garbage = Proposed { data: Bytes::from_static(&[1, 2, 3]) };
        assert_eq!(garbage.sequence_id(), None);
        assert!(garbage.summary().starts_with("undecodable payload (3 bytes)"));
    }

    #[tokio::test]
    async fn decode_proposed_log_checks_emitter() {
        let node = MockNode::start(|_, _| Ok(json!(null))).await;
        let inbox = Inbox::from_provider(INBOX, node.provider());

        let log: Log = serde_json::from_value(log_json(INBOX, &proposed(3), &header(1, 0), 0))
            .unwrap();
        let decoded = inbox.decode_proposed_log(&log).unwrap();
        assert_eq!(decoded.event, payload(3));
        assert_eq!(decoded.block_number(), Some(1));

        let other = Address::repeat_byte(0x31);
        let log: Log = serde_json::from_value(log_json(other, &proposed(3), &header(1, 0), 0))
            .unwrap();
        let err = inbox.decode_proposed_log(&log).unwrap_err();
        assert!(matches!(err, BindingError::AddressMismatch { actual, .. } if actual == other));

        // A `Proposed` log is not a `Proved` one.
        let log: Log = serde_json::from_value(log_json(INBOX, &proposed(3), &header(1, 0), 0))
            .unwrap();
        let err = inbox.decode_proved_log(&log).unwrap_err();
        assert!(matches!(err, BindingError::EventSignatureMismatch { .. }));
    }

    #[tokio::test]
    async fn malformed_payload_is_a_codec_error() {
        let node = MockNode::start(|_, _| Ok(json!(null))).await;
        let inbox = Inbox::from_provider(INBOX, node.provider());

        let event = Proved { data: Bytes::from_static(&[0; 10]) };
        let log: Log =
            serde_json::from_value(log_json(INBOX, &event, &header(1, 0), 0)).unwrap();
        let err = inbox.decode_proved_log(&log).unwrap_err();
        assert!(matches!(err, BindingError::Codec(CodecError::Truncated { .. })), "{err}");
    }

    #[tokio::test]
    async fn filter_proposed_checks_continuity() {
        let node = MockNode::start(logs_node(&[7, 8, 9])).await;
        let inbox = Inbox::from_provider(INBOX, node.provider());
        let logs = inbox.filter_proposed(&FilterOpts::range(0, 10)).await.unwrap();
        let ids: Vec<u64> = logs.iter().map(|l| l.event.proposal.id.to::<u64>()).collect();
        assert_eq!(ids, vec![7, 8, 9]);

        let node = MockNode::start(logs_node(&[7, 9])).await;
        let inbox = Inbox::from_provider(INBOX, node.provider());
        let err = inbox.filter_proposed(&FilterOpts::range(0, 10)).await.unwrap_err();
        assert!(matches!(err, IteratorError::NonConsecutive { expected: 8, actual: 9 }));
    }

    #[tokio::test]
    async fn proposal_hash_and_transition_record() {
        let node = MockNode::start(|_, params| {
            let input: Bytes = serde_json::from_value(params[0]["input"].clone()).unwrap();
            let output = match <[u8; 4]>::try_from(&input[..4]).unwrap() {
                IInbox::getProposalHashCall::SELECTOR => {
                    let call = IInbox::getProposalHashCall::abi_decode(&input).unwrap();
                    assert_eq!(call._proposalId, U48::from(12));
                    IInbox::getProposalHashCall::abi_encode_returns(&B256::repeat_byte(12))
                }
                IInbox::getTransitionRecordHashCall::SELECTOR => {
                    IInbox::getTransitionRecordHashCall::abi_encode_returns(
                        &IInbox::getTransitionRecordHashReturn {
                            finalizationDeadline_: U48::from(1_700u64),
                            recordHash_: FixedBytes::repeat_byte(7),
                        },
                    )
                }
                _ => unreachable!(),
            };
            Ok(json!(Bytes::from(output)))
        })
        .await;

        let inbox = Inbox::from_provider(INBOX, node.provider());
        assert_eq!(inbox.get_proposal_hash(12).await.unwrap(), B256::repeat_byte(12));

        let record = inbox.get_transition_record_hash(12, B256::ZERO).await.unwrap();
        assert_eq!(record, TransitionRecordInfo {
            finalization_deadline: 1_700,
            record_hash: FixedBytes::repeat_byte(7),
        });
    }

    #[tokio::test]
    async fn reverts_are_decoded() {
        let node = MockNode::start(|_, _| {
            let data = Bytes::from(IInbox::NoBondToWithdraw {}.abi_encode());
            Err(json!({"code": 3, "message": "execution reverted", "data": data}))
        })
        .await;

        let inbox = Inbox::from_provider(INBOX, node.provider());
        let err = inbox.bond_balance(Address::ZERO).await.unwrap_err();
        assert!(err.to_string().contains("NoBondToWithdraw"), "{err}");
    }

    #[tokio::test]
    async fn propose_request_carries_compact_input() {
        let node = MockNode::start(|_, _| Ok(json!(null))).await;
        let inbox = Inbox::from_provider(INBOX, node.provider());

        let input = ProposeInput { numForcedInclusions: 2, ..Default::default() };
        let request = inbox.propose_request(&input).unwrap();
        let call = IInbox::proposeCall::abi_decode(request.input.input().unwrap()).unwrap();
        assert!(call._0.is_empty());
        assert_eq!(decode_propose_input(&call._data).unwrap(), input);
        assert_eq!(request.to, Some(INBOX.into()));

        let input = ProveInput {
            proposals: vec![Default::default()],
            transitions: vec![],
            metadata: vec![],
        };
        assert!(inbox.prove_request(&input, Bytes::new()).is_err());
    }
}
