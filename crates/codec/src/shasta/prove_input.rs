use alloy_primitives::Bytes;

use super::{
    METADATA_SIZE, PROPOSAL_SIZE, Proposal, ProveInput, TRANSITION_SIZE, pack_metadata,
    pack_transition, unpack_array, unpack_metadata, unpack_transition,
};
use crate::{
    CodecError,
    pack::{MAX_U24, Packer, Unpacker, check_len},
};

/// Returns the packed size of a `ProveInput` proving `proposals` proposals.
pub const fn prove_input_size(proposals: usize) -> usize {
    3 + 3 + proposals * (PROPOSAL_SIZE + TRANSITION_SIZE + METADATA_SIZE)
}

/// Packs the input of `Inbox.prove`.
///
/// Proposals, transitions and metadata are aligned by index and must have the same length.
/// The metadata array has no length prefix of its own.
pub fn encode_prove_input(input: &ProveInput) -> Result<Bytes, CodecError> {
    let len = input.proposals.len();
    check_len("proposals", len, MAX_U24)?;
    if input.transitions.len() != len {
        return Err(CodecError::LengthMismatch {
            field: "transitions",
            expected: len,
            actual: input.transitions.len(),
        });
    }
    if input.metadata.len() != len {
        return Err(CodecError::LengthMismatch {
            field: "metadata",
            expected: len,
            actual: input.metadata.len(),
        });
    }

    let mut packer = Packer::with_capacity(prove_input_size(len));
    packer.len_u24("proposals", len)?;
    for proposal in &input.proposals {
        pack_proposal(&mut packer, proposal);
    }

    packer.len_u24("transitions", len)?;
    for transition in &input.transitions {
        pack_transition(&mut packer, transition);
    }

    for metadata in &input.metadata {
        pack_metadata(&mut packer, metadata);
    }

    Ok(packer.finish())
}

/// Unpacks the input of `Inbox.prove`.
pub fn decode_prove_input(data: &[u8]) -> Result<ProveInput, CodecError> {
    let mut unpacker = Unpacker::new(data);

    let len = unpacker.len_u24()?;
    let proposals = unpack_array(&mut unpacker, len, PROPOSAL_SIZE, unpack_proposal)?;

    let transitions_len = unpacker.len_u24()?;
    if transitions_len != len {
        return Err(CodecError::LengthMismatch {
            field: "transitions",
            expected: len,
            actual: transitions_len,
        });
    }
    let transitions = unpack_array(&mut unpacker, len, TRANSITION_SIZE, unpack_transition)?;
    let metadata = unpack_array(&mut unpacker, len, METADATA_SIZE, unpack_metadata)?;

    unpacker.finish()?;
    Ok(ProveInput { proposals, transitions, metadata })
}

/// Proposals of a prove input lead with the proposer, unlike those of a propose input.
fn pack_proposal(packer: &mut Packer, proposal: &Proposal) {
    packer.u48(proposal.id);
    packer.address(&proposal.proposer);
    packer.u48(proposal.timestamp);
    packer.u48(proposal.endOfSubmissionWindowTimestamp);
    packer.b256(&proposal.coreStateHash);
    packer.b256(&proposal.derivationHash);
}

fn unpack_proposal(unpacker: &mut Unpacker<'_>) -> Result<Proposal, CodecError> {
    Ok(Proposal {
        id: unpacker.u48()?,
        proposer: unpacker.address()?,
        timestamp: unpacker.u48()?,
        endOfSubmissionWindowTimestamp: unpacker.u48()?,
        coreStateHash: unpacker.b256()?,
        derivationHash: unpacker.b256()?,
    })
}
