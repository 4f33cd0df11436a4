use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use alloy_primitives::{B256, Bytes};
use alloy_sol_types::{SolType, SolValue};
use tkb_codec::shasta;
use tkb_primitives::Fork;

use self::IInboxHelper::IInboxHelperErrors;
use crate::{bind::contract_binding, map_contract_error};

contract_binding! {
    /// A wrapper over the Shasta `InboxHelper` contract, which exposes the on-chain reference
    /// encoders, decoders and hashers of the compact codec.
    ///
    /// Every helper takes and returns the [`tkb_codec::shasta`] types, so the local codec can
    /// be checked against a deployment.
    InboxHelper(IInboxHelper::IInboxHelperInstance),
    errors: IInboxHelperErrors,
    fork: Some(Fork::Shasta),
}

/// Convert between two Solidity types with the same ABI layout.
fn convert<A, B>(value: &A) -> alloy_sol_types::Result<B>
where
    A: SolValue,
    B: SolValue + From<<B::SolType as SolType>::RustType>,
{
    B::abi_decode(&value.abi_encode())
}

impl<P: Provider + Clone> InboxHelper<P> {
    /// Encodes a `Proposed` payload with the on-chain compact encoder.
    pub async fn encode_proposed_event(
        &self,
        payload: &shasta::ProposedEventPayload,
    ) -> ContractResult<Bytes> {
        self.0
            .encodeProposedEventOptimized(convert(payload)?)
            .call()
            .await
            .map_err(map_contract_error::<IInboxHelperErrors>)
    }

    /// Decodes a compact `Proposed` payload with the on-chain decoder.
    pub async fn decode_proposed_event(
        &self,
        data: Bytes,
    ) -> ContractResult<shasta::ProposedEventPayload> {
        let payload = self
            .0
            .decodeProposedEventOptimized(data)
            .call()
            .await
            .map_err(map_contract_error::<IInboxHelperErrors>)?;
        Ok(convert(&payload)?)
    }

    /// Encodes a `Proved` payload with the on-chain compact encoder.
    pub async fn encode_proved_event(
        &self,
        payload: &shasta::ProvedEventPayload,
    ) -> ContractResult<Bytes> {
        self.0
            .encodeProvedEventOptimized(convert(payload)?)
            .call()
            .await
            .map_err(map_contract_error::<IInboxHelperErrors>)
    }

    /// Encodes a propose input with the on-chain compact encoder.
    pub async fn encode_propose_input(
        &self,
        input: &shasta::ProposeInput,
    ) -> ContractResult<Bytes> {
        self.0
            .encodeProposeInputOptimized(convert(input)?)
            .call()
            .await
            .map_err(map_contract_error::<IInboxHelperErrors>)
    }

    /// Encodes a prove input with the on-chain compact encoder.
    pub async fn encode_prove_input(&self, input: &shasta::ProveInput) -> ContractResult<Bytes> {
        self.0
            .encodeProveInputOptimized(convert(input)?)
            .call()
            .await
            .map_err(map_contract_error::<IInboxHelperErrors>)
    }

    /// Hashes a proposal with the on-chain optimized hasher.
    pub async fn hash_proposal(&self, proposal: &shasta::Proposal) -> ContractResult<B256> {
        self.0
            .hashProposalOptimized(convert(proposal)?)
            .call()
            .await
            .map_err(map_contract_error::<IInboxHelperErrors>)
    }

    /// Hashes a transitions array with the on-chain optimized hasher.
    pub async fn hash_transitions_array(
        &self,
        transitions: &[shasta::Transition],
    ) -> ContractResult<B256> {
        self.0
            .hashTransitionsArrayOptimized(convert(&transitions.to_vec())?)
            .call()
            .await
            .map_err(map_contract_error::<IInboxHelperErrors>)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IInboxHelper {
        error BondInstructionsLengthExceeded();
        error LengthExceedsUint24();
        error ProposalTransitionLengthMismatch();

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
            uint48 nextProposalBlockId;
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

        function decodeProposeInput(bytes memory _data) external pure
            returns (ProposeInput memory input_);
        function decodeProposeInputOptimized(bytes memory _data) external pure
            returns (ProposeInput memory input_);
        function decodeProposedEvent(bytes memory _data) external pure
            returns (ProposedEventPayload memory payload_);
        function decodeProposedEventOptimized(bytes memory _data) external pure
            returns (ProposedEventPayload memory payload_);
        function decodeProveInput(bytes memory _data) external pure
            returns (ProveInput memory input_);
        function decodeProveInputOptimized(bytes memory _data) external pure
            returns (ProveInput memory input_);
        function decodeProvedEvent(bytes memory _data) external pure
            returns (ProvedEventPayload memory payload_);
        function decodeProvedEventOptimized(bytes memory _data) external pure
            returns (ProvedEventPayload memory payload_);
        function encodeProposeInput(ProposeInput memory _input) external pure
            returns (bytes memory encoded_);
        function encodeProposeInputOptimized(ProposeInput memory _input) external pure
            returns (bytes memory encoded_);
        function encodeProposedEvent(ProposedEventPayload memory _payload) external pure
            returns (bytes memory encoded_);
        function encodeProposedEventOptimized(ProposedEventPayload memory _payload) external pure
            returns (bytes memory encoded_);
        function encodeProveInput(ProveInput memory _input) external pure
            returns (bytes memory encoded_);
        function encodeProveInputOptimized(ProveInput memory _input) external pure
            returns (bytes memory encoded_);
        function encodeProvedEvent(ProvedEventPayload memory _payload) external pure
            returns (bytes memory encoded_);
        function encodeProvedEventOptimized(ProvedEventPayload memory _payload) external pure
            returns (bytes memory encoded_);
        function hashCheckpoint(Checkpoint memory _checkpoint) external pure returns (bytes32);
        function hashCheckpointOptimized(Checkpoint memory _checkpoint) external pure
            returns (bytes32);
        function hashCoreState(CoreState memory _coreState) external pure returns (bytes32);
        function hashCoreStateOptimized(CoreState memory _coreState) external pure
            returns (bytes32);
        function hashDerivation(Derivation memory _derivation) external pure returns (bytes32);
        function hashDerivationOptimized(Derivation memory _derivation) external pure
            returns (bytes32);
        function hashProposal(Proposal memory _proposal) external pure returns (bytes32);
        function hashProposalOptimized(Proposal memory _proposal) external pure returns (bytes32);
        function hashTransition(Transition memory _transition) external pure returns (bytes32);
        function hashTransitionOptimized(Transition memory _transition) external pure
            returns (bytes32);
        function hashTransitionRecord(TransitionRecord memory _transitionRecord) external pure
            returns (bytes26);
        function hashTransitionRecordOptimized(TransitionRecord memory _transitionRecord) external pure
            returns (bytes26);
        function hashTransitionsArray(Transition[] memory _transitions) external pure
            returns (bytes32);
        function hashTransitionsArrayOptimized(Transition[] memory _transitions) external pure
            returns (bytes32);
    }
}
