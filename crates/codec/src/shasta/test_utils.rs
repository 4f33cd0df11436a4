use alloy_primitives::{
    Address, B256,
    aliases::{U24, U48},
};
use rand::Rng;

use super::*;

pub(crate) fn random_hash() -> B256 {
    B256::from(rand::rng().random::<[u8; 32]>())
}

pub(crate) fn random_address() -> Address {
    Address::from(rand::rng().random::<[u8; 20]>())
}

pub(crate) fn random_u48() -> U48 {
    U48::from(rand::rng().random_range(1..1u64 << 48))
}

pub(crate) fn random_checkpoint() -> Checkpoint {
    Checkpoint { blockNumber: random_u48(), blockHash: random_hash(), stateRoot: random_hash() }
}

pub(crate) fn random_transition() -> Transition {
    Transition {
        proposalHash: random_hash(),
        parentTransitionHash: random_hash(),
        checkpoint: random_checkpoint(),
    }
}

pub(crate) fn random_bond() -> BondInstruction {
    BondInstruction {
        proposalId: random_u48(),
        bondType: rand::rng().random_range(0..=2),
        payer: random_address(),
        receiver: random_address(),
    }
}

pub(crate) fn random_proposal() -> Proposal {
    Proposal {
        id: random_u48(),
        timestamp: random_u48(),
        endOfSubmissionWindowTimestamp: random_u48(),
        proposer: random_address(),
        coreStateHash: random_hash(),
        derivationHash: random_hash(),
    }
}

pub(crate) fn random_core_state() -> CoreState {
    CoreState {
        nextProposalId: random_u48(),
        nextProposalBlockId: random_u48(),
        lastFinalizedProposalId: random_u48(),
        lastFinalizedTransitionHash: random_hash(),
        bondInstructionsHash: random_hash(),
    }
}

pub(crate) fn random_proposed(blobs: usize) -> ProposedEventPayload {
    let mut rng = rand::rng();
    ProposedEventPayload {
        proposal: random_proposal(),
        derivation: Derivation {
            originBlockNumber: random_u48(),
            originBlockHash: random_hash(),
            isForcedInclusion: rng.random(),
            basefeeSharingPctg: rng.random_range(0..=100),
            blobSlice: BlobSlice {
                blobHashes: (0..blobs).map(|_| random_hash()).collect(),
                offset: U24::from(rng.random_range(0..1u32 << 24)),
                timestamp: random_u48(),
            },
        },
        coreState: random_core_state(),
    }
}

pub(crate) fn random_proved(bonds: usize) -> ProvedEventPayload {
    ProvedEventPayload {
        proposalId: random_u48(),
        transition: random_transition(),
        transitionRecord: TransitionRecord {
            span: rand::rng().random(),
            bondInstructions: (0..bonds).map(|_| random_bond()).collect(),
            transitionHash: random_hash(),
            checkpointHash: random_hash(),
        },
        metadata: TransitionMetadata {
            designatedProver: random_address(),
            actualProver: random_address(),
        },
    }
}

/// A propose input with `parents` parent proposals and one transition record per entry of
/// `bonds_per_record`.
pub(crate) fn random_propose_input(parents: usize, bonds_per_record: &[usize]) -> ProposeInput {
    let mut rng = rand::rng();
    ProposeInput {
        deadline: random_u48(),
        coreState: random_core_state(),
        parentProposals: (0..parents).map(|_| random_proposal()).collect(),
        blobReference: BlobReference {
            blobStartIndex: rng.random(),
            numBlobs: rng.random(),
            offset: U24::from(rng.random_range(0..1u32 << 24)),
        },
        transitionRecords: bonds_per_record
            .iter()
            .map(|&bonds| TransitionRecord {
                span: rng.random(),
                bondInstructions: (0..bonds).map(|_| random_bond()).collect(),
                transitionHash: random_hash(),
                checkpointHash: random_hash(),
            })
            .collect(),
        checkpoint: random_checkpoint(),
        numForcedInclusions: rng.random(),
    }
}

pub(crate) fn random_prove_input(len: usize) -> ProveInput {
    ProveInput {
        proposals: (0..len).map(|_| random_proposal()).collect(),
        transitions: (0..len).map(|_| random_transition()).collect(),
        metadata: (0..len)
            .map(|_| TransitionMetadata {
                designatedProver: random_address(),
                actualProver: random_address(),
            })
            .collect(),
    }
}
