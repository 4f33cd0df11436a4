//! The compact codec of the Shasta inbox.
//!
//! The `Proposed` and `Proved` events carry their payloads as packed bytes, and `propose` and
//! `prove` take their inputs the same way. Every field is written big-endian at its Solidity
//! width with no padding, and arrays are prefixed by a `uint24` length (`uint16` for the bond
//! instructions of a proved event).

use tkb_primitives::taiko::constants::bond_type;

use crate::{
    CodecError,
    pack::{Packer, Unpacker},
};

mod types;
pub use types::*;

mod proposed;
pub use proposed::{decode_proposed_event, encode_proposed_event, proposed_event_size};

mod proved;
pub use proved::{decode_proved_event, encode_proved_event, proved_event_size};

mod propose_input;
pub use propose_input::{decode_propose_input, encode_propose_input, propose_input_size};

mod prove_input;
pub use prove_input::{decode_prove_input, encode_prove_input, prove_input_size};

/// Standard and optimized hashing of the inbox types.
pub mod hashing;

mod summary;

#[cfg(test)]
pub(crate) mod test_utils;

/// Packed size of a [`CoreState`].
const CORE_STATE_SIZE: usize = 6 * 3 + 32 * 2;

/// Packed size of a [`Proposal`].
const PROPOSAL_SIZE: usize = 6 * 3 + 20 + 32 * 2;

/// Packed size of a [`Checkpoint`].
const CHECKPOINT_SIZE: usize = 6 + 32 * 2;

/// Packed size of a [`Transition`].
const TRANSITION_SIZE: usize = 32 * 2 + CHECKPOINT_SIZE;

/// Packed size of a [`TransitionMetadata`].
const METADATA_SIZE: usize = 20 * 2;

/// Packed size of a [`BondInstruction`].
const BOND_INSTRUCTION_SIZE: usize = 6 + 1 + 20 * 2;

fn pack_core_state(packer: &mut Packer, state: &CoreState) {
    packer.u48(state.nextProposalId);
    packer.u48(state.nextProposalBlockId);
    packer.u48(state.lastFinalizedProposalId);
    packer.b256(&state.lastFinalizedTransitionHash);
    packer.b256(&state.bondInstructionsHash);
}

fn unpack_core_state(unpacker: &mut Unpacker<'_>) -> Result<CoreState, CodecError> {
    Ok(CoreState {
        nextProposalId: unpacker.u48()?,
        nextProposalBlockId: unpacker.u48()?,
        lastFinalizedProposalId: unpacker.u48()?,
        lastFinalizedTransitionHash: unpacker.b256()?,
        bondInstructionsHash: unpacker.b256()?,
    })
}

fn pack_checkpoint(packer: &mut Packer, checkpoint: &Checkpoint) {
    packer.u48(checkpoint.blockNumber);
    packer.b256(&checkpoint.blockHash);
    packer.b256(&checkpoint.stateRoot);
}

fn unpack_checkpoint(unpacker: &mut Unpacker<'_>) -> Result<Checkpoint, CodecError> {
    Ok(Checkpoint {
        blockNumber: unpacker.u48()?,
        blockHash: unpacker.b256()?,
        stateRoot: unpacker.b256()?,
    })
}

fn pack_transition(packer: &mut Packer, transition: &Transition) {
    packer.b256(&transition.proposalHash);
    packer.b256(&transition.parentTransitionHash);
    pack_checkpoint(packer, &transition.checkpoint);
}

fn unpack_transition(unpacker: &mut Unpacker<'_>) -> Result<Transition, CodecError> {
    Ok(Transition {
        proposalHash: unpacker.b256()?,
        parentTransitionHash: unpacker.b256()?,
        checkpoint: unpack_checkpoint(unpacker)?,
    })
}

fn pack_metadata(packer: &mut Packer, metadata: &TransitionMetadata) {
    packer.address(&metadata.designatedProver);
    packer.address(&metadata.actualProver);
}

fn unpack_metadata(unpacker: &mut Unpacker<'_>) -> Result<TransitionMetadata, CodecError> {
    Ok(TransitionMetadata {
        designatedProver: unpacker.address()?,
        actualProver: unpacker.address()?,
    })
}

fn pack_bond_instruction(packer: &mut Packer, bond: &BondInstruction) {
    packer.u48(bond.proposalId);
    packer.u8(bond.bondType);
    packer.address(&bond.payer);
    packer.address(&bond.receiver);
}

fn unpack_bond_instruction(unpacker: &mut Unpacker<'_>) -> Result<BondInstruction, CodecError> {
    let proposal_id = unpacker.u48()?;
    let bond_type = unpacker.u8()?;
    if bond_type > bond_type::LIVENESS {
        return Err(CodecError::InvalidBondType(bond_type));
    }

    Ok(BondInstruction {
        proposalId: proposal_id,
        bondType: bond_type,
        payer: unpacker.address()?,
        receiver: unpacker.address()?,
    })
}

/// Reads `len` items of `item_size` packed bytes each.
///
/// The reservation never exceeds what the remaining input can hold.
fn unpack_array<'a, T>(
    unpacker: &mut Unpacker<'a>,
    len: usize,
    item_size: usize,
    mut unpack: impl FnMut(&mut Unpacker<'a>) -> Result<T, CodecError>,
) -> Result<Vec<T>, CodecError> {
    let mut items = Vec::with_capacity(len.min(unpacker.remaining() / item_size.max(1)));
    for _ in 0..len {
        items.push(unpack(unpacker)?);
    }
    Ok(items)
}
