use alloy_primitives::Bytes;

use super::{
    BOND_INSTRUCTION_SIZE, METADATA_SIZE, ProvedEventPayload, TRANSITION_SIZE,
    pack_bond_instruction, pack_metadata, pack_transition, unpack_array, unpack_bond_instruction,
    unpack_metadata, unpack_transition,
};
use crate::{
    CodecError,
    pack::{MAX_U16, Packer, Unpacker, check_len},
};

/// Fixed part of a packed `Proved` payload: proposal id, transition, record span and hashes,
/// metadata and the bond instruction count.
const FIXED_SIZE: usize = 6 + TRANSITION_SIZE + 1 + 32 * 2 + METADATA_SIZE + 2;

/// Returns the packed size of a `Proved` payload carrying `bond_instructions` instructions.
pub const fn proved_event_size(bond_instructions: usize) -> usize {
    FIXED_SIZE + bond_instructions * BOND_INSTRUCTION_SIZE
}

/// Packs the payload of a `Proved` event.
///
/// The bond instructions of the transition record go last, behind a `uint16` count.
pub fn encode_proved_event(payload: &ProvedEventPayload) -> Result<Bytes, CodecError> {
    let record = &payload.transitionRecord;
    let bonds = &record.bondInstructions;
    check_len("bond instructions", bonds.len(), MAX_U16)?;

    let mut packer = Packer::with_capacity(proved_event_size(bonds.len()));
    packer.u48(payload.proposalId);
    pack_transition(&mut packer, &payload.transition);

    packer.u8(record.span);
    packer.b256(&record.transitionHash);
    packer.b256(&record.checkpointHash);
    pack_metadata(&mut packer, &payload.metadata);

    packer.len_u16("bond instructions", bonds.len())?;
    for bond in bonds {
        pack_bond_instruction(&mut packer, bond);
    }

    Ok(packer.finish())
}

/// Unpacks the payload of a `Proved` event.
pub fn decode_proved_event(data: &[u8]) -> Result<ProvedEventPayload, CodecError> {
    let mut unpacker = Unpacker::new(data);
    let mut payload = ProvedEventPayload {
        proposalId: unpacker.u48()?,
        transition: unpack_transition(&mut unpacker)?,
        ..Default::default()
    };

    let record = &mut payload.transitionRecord;
    record.span = unpacker.u8()?;
    record.transitionHash = unpacker.b256()?;
    record.checkpointHash = unpacker.b256()?;
    payload.metadata = unpack_metadata(&mut unpacker)?;

    let count = unpacker.len_u16()?;
    payload.transitionRecord.bondInstructions =
        unpack_array(&mut unpacker, count, BOND_INSTRUCTION_SIZE, unpack_bond_instruction)?;

    unpacker.finish()?;
    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shasta::test_utils::random_proved;

    #[test]
    fn proved_event_layout() {
        assert_eq!(proved_event_size(0), 247);
        assert_eq!(proved_event_size(2), 247 + 94);

        for bonds in [0, 1, 5] {
            let payload = random_proved(bonds);
            let encoded = encode_proved_event(&payload).unwrap();
            assert_eq!(encoded.len(), proved_event_size(bonds));
            assert_eq!(decode_proved_event(&encoded).unwrap(), payload);
        }
    }

    #[test]
    fn bond_count_is_a_uint16() {
        let payload = random_proved(3);
        let encoded = encode_proved_event(&payload).unwrap();
        let offset = FIXED_SIZE - 2;
        assert_eq!(&encoded[offset..offset + 2], &[0, 3]);
    }

    #[test]
    fn rejects_unknown_bond_types() {
        let payload = random_proved(1);
        let mut encoded = encode_proved_event(&payload).unwrap().to_vec();
        // bond type follows the 6-byte proposal id of the instruction
        encoded[FIXED_SIZE + 6] = 3;
        let err = decode_proved_event(&encoded).unwrap_err();
        assert!(matches!(err, CodecError::InvalidBondType(3)), "{err:?}");
    }

    #[test]
    fn rejects_malformed_payloads() {
        let encoded = encode_proved_event(&random_proved(2)).unwrap();

        let err = decode_proved_event(&encoded[..FIXED_SIZE]).unwrap_err();
        assert!(matches!(err, CodecError::Truncated { offset, .. } if offset == FIXED_SIZE));

        let mut extended = encoded.to_vec();
        extended.extend_from_slice(&[0; 4]);
        assert!(matches!(decode_proved_event(&extended), Err(CodecError::TrailingBytes(4))));
    }

    #[test]
    fn too_many_bond_instructions() {
        let mut payload = random_proved(0);
        payload.transitionRecord.bondInstructions = vec![Default::default(); MAX_U16 + 1];
        let err = encode_proved_event(&payload).unwrap_err();
        assert!(matches!(err, CodecError::LengthOverflow { max: MAX_U16, .. }), "{err:?}");
    }
}
