use alloy_primitives::Bytes;

use super::{
    BOND_INSTRUCTION_SIZE, CHECKPOINT_SIZE, CORE_STATE_SIZE, PROPOSAL_SIZE, Proposal,
    ProposeInput, TransitionRecord, pack_bond_instruction, pack_checkpoint, pack_core_state,
    unpack_array, unpack_bond_instruction, unpack_checkpoint, unpack_core_state,
};
use crate::{
    CodecError,
    pack::{MAX_U24, Packer, Unpacker, check_len},
};

/// Fixed part of a packed `ProposeInput`: deadline, core state, the two array lengths, blob
/// reference, checkpoint flag and forced inclusion count.
const FIXED_SIZE: usize = 6 + CORE_STATE_SIZE + 3 + (2 + 2 + 3) + 3 + 1 + 1;

/// Fixed part of a packed transition record: span, bond count and the two hashes.
const RECORD_FIXED_SIZE: usize = 1 + 3 + 32 * 2;

/// Returns the packed size of a `ProposeInput`.
pub fn propose_input_size(input: &ProposeInput) -> usize {
    let checkpoint = if input.checkpoint.is_empty() { 0 } else { CHECKPOINT_SIZE };
    let records = input
        .transitionRecords
        .iter()
        .map(|record| RECORD_FIXED_SIZE + record.bondInstructions.len() * BOND_INSTRUCTION_SIZE)
        .sum::<usize>();

    FIXED_SIZE + checkpoint + input.parentProposals.len() * PROPOSAL_SIZE + records
}

/// Packs the input of `Inbox.propose`.
///
/// An all-zero checkpoint is written as a single `0` flag byte.
pub fn encode_propose_input(input: &ProposeInput) -> Result<Bytes, CodecError> {
    check_len("parent proposals", input.parentProposals.len(), MAX_U24)?;
    check_len("transition records", input.transitionRecords.len(), MAX_U24)?;
    for record in &input.transitionRecords {
        check_len("bond instructions", record.bondInstructions.len(), MAX_U24)?;
    }

    let mut packer = Packer::with_capacity(propose_input_size(input));
    packer.u48(input.deadline);
    pack_core_state(&mut packer, &input.coreState);

    packer.len_u24("parent proposals", input.parentProposals.len())?;
    for proposal in &input.parentProposals {
        pack_proposal(&mut packer, proposal);
    }

    let blob = &input.blobReference;
    packer.u16(blob.blobStartIndex);
    packer.u16(blob.numBlobs);
    packer.u24(blob.offset);

    packer.len_u24("transition records", input.transitionRecords.len())?;
    for record in &input.transitionRecords {
        pack_record(&mut packer, record)?;
    }

    if input.checkpoint.is_empty() {
        packer.u8(0);
    } else {
        packer.u8(1);
        pack_checkpoint(&mut packer, &input.checkpoint);
    }

    packer.u8(input.numForcedInclusions);
    Ok(packer.finish())
}

/// Unpacks the input of `Inbox.propose`.
pub fn decode_propose_input(data: &[u8]) -> Result<ProposeInput, CodecError> {
    let mut unpacker = Unpacker::new(data);
    let mut input = ProposeInput {
        deadline: unpacker.u48()?,
        coreState: unpack_core_state(&mut unpacker)?,
        ..Default::default()
    };

    let count = unpacker.len_u24()?;
    input.parentProposals = unpack_array(&mut unpacker, count, PROPOSAL_SIZE, unpack_proposal)?;

    input.blobReference.blobStartIndex = unpacker.u16()?;
    input.blobReference.numBlobs = unpacker.u16()?;
    input.blobReference.offset = unpacker.u24()?;

    let count = unpacker.len_u24()?;
    input.transitionRecords =
        unpack_array(&mut unpacker, count, RECORD_FIXED_SIZE, unpack_record)?;

    match unpacker.u8()? {
        0 => {}
        1 => input.checkpoint = unpack_checkpoint(&mut unpacker)?,
        flag => return Err(CodecError::InvalidCheckpointFlag(flag)),
    }

    input.numForcedInclusions = unpacker.u8()?;
    unpacker.finish()?;
    Ok(input)
}

fn pack_proposal(packer: &mut Packer, proposal: &Proposal) {
    packer.u48(proposal.id);
    packer.u48(proposal.timestamp);
    packer.u48(proposal.endOfSubmissionWindowTimestamp);
    packer.address(&proposal.proposer);
    packer.b256(&proposal.coreStateHash);
    packer.b256(&proposal.derivationHash);
}

fn unpack_proposal(unpacker: &mut Unpacker<'_>) -> Result<Proposal, CodecError> {
    Ok(Proposal {
        id: unpacker.u48()?,
        timestamp: unpacker.u48()?,
        endOfSubmissionWindowTimestamp: unpacker.u48()?,
        proposer: unpacker.address()?,
        coreStateHash: unpacker.b256()?,
        derivationHash: unpacker.b256()?,
    })
}

fn pack_record(packer: &mut Packer, record: &TransitionRecord) -> Result<(), CodecError> {
    packer.u8(record.span);
    packer.len_u24("bond instructions", record.bondInstructions.len())?;
    for bond in &record.bondInstructions {
        pack_bond_instruction(packer, bond);
    }
    packer.b256(&record.transitionHash);
    packer.b256(&record.checkpointHash);
    Ok(())
}

fn unpack_record(unpacker: &mut Unpacker<'_>) -> Result<TransitionRecord, CodecError> {
    let span = unpacker.u8()?;
    let count = unpacker.len_u24()?;
    let bonds = unpack_array(unpacker, count, BOND_INSTRUCTION_SIZE, unpack_bond_instruction)?;

    Ok(TransitionRecord {
        span,
        bondInstructions: bonds,
        transitionHash: unpacker.b256()?,
        checkpointHash: unpacker.b256()?,
    })
}

#[cfg(test)]
mod tests {
    use alloy_primitives::aliases::U48;

    use super::*;
    use crate::shasta::{
        Checkpoint,
        test_utils::{random_checkpoint, random_propose_input},
    };

    #[test]
    fn propose_input_layout() {
        let mut input = random_propose_input(0, &[]);
        input.checkpoint = Checkpoint::default();
        assert_eq!(propose_input_size(&input), 103);
        let encoded = encode_propose_input(&input).unwrap();
        assert_eq!(encoded.len(), 103);
        assert_eq!(decode_propose_input(&encoded).unwrap(), input);

        let input = random_propose_input(2, &[0, 3]);
        let expected = 103 + 70 + 2 * 102 + (68 + (68 + 3 * 47));
        assert_eq!(propose_input_size(&input), expected);
        let encoded = encode_propose_input(&input).unwrap();
        assert_eq!(encoded.len(), expected);
        assert_eq!(decode_propose_input(&encoded).unwrap(), input);
    }

    #[test]
    fn checkpoint_flag() {
        let mut input = random_propose_input(0, &[]);
        input.checkpoint = Checkpoint::default();
        let encoded = encode_propose_input(&input).unwrap();
        // flag, then the forced inclusion count
        assert_eq!(encoded[encoded.len() - 2], 0);

        input.checkpoint = Checkpoint { blockNumber: U48::from(1u64), ..Default::default() };
        let encoded = encode_propose_input(&input).unwrap();
        assert_eq!(encoded[encoded.len() - 2 - CHECKPOINT_SIZE], 1);
        assert_eq!(decode_propose_input(&encoded).unwrap().checkpoint, input.checkpoint);

        let mut corrupted = encode_propose_input(&random_propose_input(1, &[1])).unwrap().to_vec();
        let flag = corrupted.len() - 2 - CHECKPOINT_SIZE;
        corrupted[flag] = 2;
        let err = decode_propose_input(&corrupted).unwrap_err();
        assert!(matches!(err, CodecError::InvalidCheckpointFlag(2)), "{err:?}");
    }

    #[test]
    fn rejects_malformed_inputs() {
        let mut input = random_propose_input(1, &[2]);
        input.checkpoint = random_checkpoint();
        let encoded = encode_propose_input(&input).unwrap();

        for cut in [1, 10, encoded.len() - 1] {
            let err = decode_propose_input(&encoded[..cut]).unwrap_err();
            assert!(matches!(err, CodecError::Truncated { .. }), "cut {cut}: {err:?}");
        }

        let mut extended = encoded.to_vec();
        extended.push(0xff);
        assert!(matches!(decode_propose_input(&extended), Err(CodecError::TrailingBytes(1))));
    }

    #[test]
    fn corrupted_bond_type() {
        let input = random_propose_input(0, &[1]);
        let mut encoded = encode_propose_input(&input).unwrap().to_vec();
        // fixed prefix up to the records, record span and bond count, bond proposal id
        let offset = 6 + CORE_STATE_SIZE + 3 + 7 + 3 + 1 + 3 + 6;
        encoded[offset] = 9;
        let err = decode_propose_input(&encoded).unwrap_err();
        assert!(matches!(err, CodecError::InvalidBondType(9)), "{err:?}");
    }
}
