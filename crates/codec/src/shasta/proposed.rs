use alloy_primitives::Bytes;

use super::{
    CORE_STATE_SIZE, ProposedEventPayload, pack_core_state, unpack_array, unpack_core_state,
};
use crate::{
    CodecError,
    pack::{MAX_U24, Packer, Unpacker, check_len},
};

/// Fixed part of a packed `Proposed` payload.
const FIXED_SIZE: usize = 6 + 20 + 6 + 6 // proposal id, proposer, timestamp, end of window
    + 6 + 32 + 1 + 1 // origin block number and hash, forced flag, basefee sharing pctg
    + 3 + 3 + 6 // blob hash count, blob offset, blob timestamp
    + 32 + 32 // core state hash, derivation hash
    + CORE_STATE_SIZE;

/// Returns the packed size of a `Proposed` payload carrying `blob_hashes` blob hashes.
pub const fn proposed_event_size(blob_hashes: usize) -> usize {
    FIXED_SIZE + blob_hashes * 32
}

/// Packs the payload of a `Proposed` event.
pub fn encode_proposed_event(payload: &ProposedEventPayload) -> Result<Bytes, CodecError> {
    let ProposedEventPayload { proposal, derivation, coreState } = payload;
    let hashes = &derivation.blobSlice.blobHashes;
    check_len("blob hashes", hashes.len(), MAX_U24)?;

    let mut packer = Packer::with_capacity(proposed_event_size(hashes.len()));
    packer.u48(proposal.id);
    packer.address(&proposal.proposer);
    packer.u48(proposal.timestamp);
    packer.u48(proposal.endOfSubmissionWindowTimestamp);

    packer.u48(derivation.originBlockNumber);
    packer.b256(&derivation.originBlockHash);
    packer.bool(derivation.isForcedInclusion);
    packer.u8(derivation.basefeeSharingPctg);

    packer.len_u24("blob hashes", hashes.len())?;
    for hash in hashes {
        packer.b256(hash);
    }
    packer.u24(derivation.blobSlice.offset);
    packer.u48(derivation.blobSlice.timestamp);

    packer.b256(&proposal.coreStateHash);
    packer.b256(&proposal.derivationHash);
    pack_core_state(&mut packer, coreState);

    Ok(packer.finish())
}

/// Unpacks the payload of a `Proposed` event.
pub fn decode_proposed_event(data: &[u8]) -> Result<ProposedEventPayload, CodecError> {
    let mut unpacker = Unpacker::new(data);
    let mut payload = ProposedEventPayload::default();

    let proposal = &mut payload.proposal;
    proposal.id = unpacker.u48()?;
    proposal.proposer = unpacker.address()?;
    proposal.timestamp = unpacker.u48()?;
    proposal.endOfSubmissionWindowTimestamp = unpacker.u48()?;

    let derivation = &mut payload.derivation;
    derivation.originBlockNumber = unpacker.u48()?;
    derivation.originBlockHash = unpacker.b256()?;
    derivation.isForcedInclusion = unpacker.bool()?;
    derivation.basefeeSharingPctg = unpacker.u8()?;

    let count = unpacker.len_u24()?;
    derivation.blobSlice.blobHashes = unpack_array(&mut unpacker, count, 32, Unpacker::b256)?;
    derivation.blobSlice.offset = unpacker.u24()?;
    derivation.blobSlice.timestamp = unpacker.u48()?;

    payload.proposal.coreStateHash = unpacker.b256()?;
    payload.proposal.derivationHash = unpacker.b256()?;
    payload.coreState = unpack_core_state(&mut unpacker)?;

    unpacker.finish()?;
    Ok(payload)
}
