#![allow(missing_docs)]

use alloy_sol_types::sol;

sol! {
    #[derive(Debug, Default, PartialEq, Eq)]
    struct CoreState {
        uint48 nextProposalId;
        uint48 nextProposalBlockId;
        uint48 lastFinalizedProposalId;
        bytes32 lastFinalizedTransitionHash;
        bytes32 bondInstructionsHash;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Proposal {
        uint48 id;
        uint48 timestamp;
        uint48 endOfSubmissionWindowTimestamp;
        address proposer;
        bytes32 coreStateHash;
        bytes32 derivationHash;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlobSlice {
        bytes32[] blobHashes;
        uint24 offset;
        uint48 timestamp;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Derivation {
        uint48 originBlockNumber;
        bytes32 originBlockHash;
        bool isForcedInclusion;
        uint8 basefeeSharingPctg;
        BlobSlice blobSlice;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlobReference {
        uint16 blobStartIndex;
        uint16 numBlobs;
        uint24 offset;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct BondInstruction {
        uint48 proposalId;
        uint8 bondType;
        address payer;
        address receiver;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Checkpoint {
        uint48 blockNumber;
        bytes32 blockHash;
        bytes32 stateRoot;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Transition {
        bytes32 proposalHash;
        bytes32 parentTransitionHash;
        Checkpoint checkpoint;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct TransitionRecord {
        uint8 span;
        BondInstruction[] bondInstructions;
        bytes32 transitionHash;
        bytes32 checkpointHash;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct TransitionMetadata {
        address designatedProver;
        address actualProver;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct ProposedEventPayload {
        Proposal proposal;
        Derivation derivation;
        CoreState coreState;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct ProvedEventPayload {
        uint48 proposalId;
        Transition transition;
        TransitionRecord transitionRecord;
        TransitionMetadata metadata;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct ProposeInput {
        uint48 deadline;
        CoreState coreState;
        Proposal[] parentProposals;
        BlobReference blobReference;
        TransitionRecord[] transitionRecords;
        Checkpoint checkpoint;
        uint8 numForcedInclusions;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct ProveInput {
        Proposal[] proposals;
        Transition[] transitions;
        TransitionMetadata[] metadata;
    }
}

impl Checkpoint {
    /// Returns true if every field is zero, which the compact input encodes as an absent
    /// checkpoint.
    pub fn is_empty(&self) -> bool {
        self.blockNumber.is_zero() && self.blockHash.is_zero() && self.stateRoot.is_zero()
    }
}
