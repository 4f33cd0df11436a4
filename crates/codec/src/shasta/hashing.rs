//! Hashing of the Shasta inbox types.
//!
//! Each type has a standard form, `keccak256(abi.encode(value))`, and an optimized form that
//! mirrors the inbox's hashing library: fields are widened to 32-byte words and hashed
//! together without ABI offsets, and small numeric fields share a packed word.

use alloy_primitives::{
    Address, B256, FixedBytes, KECCAK256_EMPTY, Keccak256, U256, aliases::U48, keccak256,
};
use alloy_sol_types::SolValue;

use super::{
    BlobSlice, BondInstruction, Checkpoint, CoreState, Derivation, Proposal, Transition,
    TransitionRecord,
};

/// A transition record hash, the first 26 bytes of its keccak digest.
pub type TransitionRecordHash = FixedBytes<26>;

/// `keccak256(abi.encode(checkpoint))`.
pub fn hash_checkpoint(checkpoint: &Checkpoint) -> B256 {
    keccak256(checkpoint.abi_encode())
}

/// `keccak256(abi.encode(core_state))`.
pub fn hash_core_state(core_state: &CoreState) -> B256 {
    keccak256(core_state.abi_encode())
}

/// `keccak256(abi.encode(proposal))`.
pub fn hash_proposal(proposal: &Proposal) -> B256 {
    keccak256(proposal.abi_encode())
}

/// `keccak256(abi.encode(derivation))`.
pub fn hash_derivation(derivation: &Derivation) -> B256 {
    keccak256(derivation.abi_encode())
}

/// `keccak256(abi.encode(transition))`.
pub fn hash_transition(transition: &Transition) -> B256 {
    keccak256(transition.abi_encode())
}

/// `keccak256(abi.encode(transitions))`.
pub fn hash_transitions_array(transitions: &[Transition]) -> B256 {
    keccak256(transitions.to_vec().abi_encode())
}

/// `bytes26(keccak256(abi.encode(record)))`.
pub fn hash_transition_record(record: &TransitionRecord) -> TransitionRecordHash {
    truncate(keccak256(record.abi_encode()))
}

/// Optimized checkpoint hash: `H(number, hash, root)`.
pub fn hash_checkpoint_optimized(checkpoint: &Checkpoint) -> B256 {
    hash_words(&[u48_word(checkpoint.blockNumber), checkpoint.blockHash, checkpoint.stateRoot])
}

/// Optimized core state hash over its five fields.
pub fn hash_core_state_optimized(core_state: &CoreState) -> B256 {
    hash_words(&[
        u48_word(core_state.nextProposalId),
        u48_word(core_state.nextProposalBlockId),
        u48_word(core_state.lastFinalizedProposalId),
        core_state.lastFinalizedTransitionHash,
        core_state.bondInstructionsHash,
    ])
}

/// Optimized proposal hash.
///
/// The id, timestamp and end of the submission window share one word, written as big-endian
/// u64s at byte offsets 2, 10 and 18.
pub fn hash_proposal_optimized(proposal: &Proposal) -> B256 {
    let mut packed = B256::ZERO;
    packed[2..10].copy_from_slice(&proposal.id.to::<u64>().to_be_bytes());
    packed[10..18].copy_from_slice(&proposal.timestamp.to::<u64>().to_be_bytes());
    packed[18..26]
        .copy_from_slice(&proposal.endOfSubmissionWindowTimestamp.to::<u64>().to_be_bytes());

    hash_words(&[
        packed,
        address_word(proposal.proposer),
        proposal.coreStateHash,
        proposal.derivationHash,
    ])
}

/// Optimized derivation hash.
///
/// The first 8 bytes of the packed word hold `origin << 16 | forced << 8 | pctg`.
pub fn hash_derivation_optimized(derivation: &Derivation) -> B256 {
    let origin = derivation.originBlockNumber.to::<u64>();
    let forced = u64::from(derivation.isForcedInclusion);
    let pctg = u64::from(derivation.basefeeSharingPctg);

    let mut packed = B256::ZERO;
    packed[..8].copy_from_slice(&((origin << 16) | (forced << 8) | pctg).to_be_bytes());

    hash_words(&[packed, derivation.originBlockHash, hash_blob_slice(&derivation.blobSlice)])
}

/// Optimized transition hash: `H(proposal hash, parent transition hash, checkpoint hash)`.
pub fn hash_transition_optimized(transition: &Transition) -> B256 {
    hash_words(&[
        transition.proposalHash,
        transition.parentTransitionHash,
        hash_checkpoint_optimized(&transition.checkpoint),
    ])
}

/// Optimized hash of a transitions array.
///
/// Arrays of one or two transitions are hashed together with their length. Longer arrays
/// hash the length word followed by every element hash.
pub fn hash_transitions_array_optimized(transitions: &[Transition]) -> B256 {
    let hashes = transitions.iter().map(hash_transition_optimized).collect::<Vec<_>>();
    match hashes.as_slice() {
        [] => KECCAK256_EMPTY,
        [h] => hash_words(&[len_word(1), *h]),
        [h0, h1] => hash_words(&[len_word(2), *h0, *h1]),
        _ => hash_length_prefixed(&hashes),
    }
}

/// Optimized transition record hash, truncated to 26 bytes.
pub fn hash_transition_record_optimized(record: &TransitionRecord) -> TransitionRecordHash {
    truncate(hash_words(&[
        U256::from(record.span).into(),
        hash_bond_instructions(&record.bondInstructions),
        record.transitionHash,
        record.checkpointHash,
    ]))
}

/// Storage key of the transition record proving `proposal_id` on top of
/// `parent_transition_hash`.
pub fn compose_transition_key(proposal_id: u64, parent_transition_hash: B256) -> B256 {
    hash_words(&[U256::from(proposal_id).into(), parent_transition_hash])
}

/// Optimized hash of a bond instructions array. Unlike transitions, only the single
/// element case is hashed together with its length.
pub fn hash_bond_instructions(instructions: &[BondInstruction]) -> B256 {
    let hashes = instructions.iter().map(hash_bond_instruction).collect::<Vec<_>>();
    match hashes.as_slice() {
        [] => KECCAK256_EMPTY,
        [h] => hash_words(&[len_word(1), *h]),
        _ => hash_length_prefixed(&hashes),
    }
}

/// Optimized hash of one bond instruction: `H(proposal id, type, payer, receiver)`.
pub fn hash_bond_instruction(instruction: &BondInstruction) -> B256 {
    hash_words(&[
        u48_word(instruction.proposalId),
        U256::from(instruction.bondType).into(),
        address_word(instruction.payer),
        address_word(instruction.receiver),
    ])
}

/// Optimized blob slice hash: `H(hashes hash, offset, timestamp)`.
pub fn hash_blob_slice(slice: &BlobSlice) -> B256 {
    let hashes = if slice.blobHashes.is_empty() {
        KECCAK256_EMPTY
    } else {
        hash_length_prefixed(&slice.blobHashes)
    };

    hash_words(&[hashes, U256::from(slice.offset.to::<u32>()).into(), u48_word(slice.timestamp)])
}

fn hash_words(words: &[B256]) -> B256 {
    let mut hasher = Keccak256::new();
    for word in words {
        hasher.update(word);
    }
    hasher.finalize()
}

/// `keccak256(len ‖ hashes)` with the length as a 32-byte word.
fn hash_length_prefixed(hashes: &[B256]) -> B256 {
    let mut hasher = Keccak256::new();
    hasher.update(len_word(hashes.len()));
    for hash in hashes {
        hasher.update(hash);
    }
    hasher.finalize()
}

fn len_word(len: usize) -> B256 {
    U256::from(len).into()
}

fn u48_word(value: U48) -> B256 {
    U256::from(value.to::<u64>()).into()
}

fn address_word(address: Address) -> B256 {
    address.into_word()
}

fn truncate(hash: B256) -> TransitionRecordHash {
    TransitionRecordHash::from_slice(&hash[..26])
}
