//! `abi.encode` helpers for the Ontake `TaikoL1` inputs.

#![allow(missing_docs)]

use alloy_primitives::{Address, B256, Bytes};
use alloy_sol_types::{SolCall, SolValue, sol};

use crate::CodecError;

sol! {
    /// `TaikoData.BlockParams`, the parameters of a legacy `proposeBlock`.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlockParams {
        address assignedProver;
        address coinbase;
        bytes32 extraData;
        bytes32 parentMetaHash;
        HookCall[] hookCalls;
        bytes signature;
        uint32 l1StateBlockNumber;
        uint64 timestamp;
        uint32 blobTxListOffset;
        uint32 blobTxListLength;
        uint8 blobIndex;
    }

    /// `TaikoData.BlockParamsV2`, the parameters of `proposeBlockV2`.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlockParamsV2 {
        address coinbase;
        bytes32 parentMetaHash;
        uint64 anchorBlockId;
        uint64 timestamp;
        uint32 blobTxListOffset;
        uint32 blobTxListLength;
        uint8 blobIndex;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct HookCall {
        address hook;
        bytes data;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct TierFee {
        uint16 tier;
        uint128 fee;
    }

    /// A prover's signed commitment to prove a block.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct ProverAssignment {
        address feeToken;
        uint64 expiry;
        uint64 maxBlockId;
        uint64 maxProposedIn;
        bytes32 metaHash;
        bytes32 parentMetaHash;
        TierFee[] tierFees;
        bytes signature;
    }

    /// `AssignmentHook.Input`, the data of the assignment hook call.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct AssignmentHookInput {
        ProverAssignment assignment;
        uint256 tip;
    }

    /// `TaikoData.BlockMetadata` of the legacy proposal flow.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlockMetadata {
        bytes32 l1Hash;
        bytes32 difficulty;
        bytes32 blobHash;
        bytes32 extraData;
        bytes32 depositsHash;
        address coinbase;
        uint64 id;
        uint32 gasLimit;
        uint64 timestamp;
        uint64 l1Height;
        uint16 minTier;
        bool blobUsed;
        bytes32 parentMetaHash;
        address sender;
    }

    /// `TaikoData.BlockMetadataV2`, emitted by `proposeBlockV2`.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlockMetadataV2 {
        bytes32 anchorBlockHash;
        bytes32 difficulty;
        bytes32 blobHash;
        bytes32 extraData;
        address coinbase;
        uint64 id;
        uint32 gasLimit;
        uint64 timestamp;
        uint64 anchorBlockId;
        uint16 minTier;
        bool blobUsed;
        bytes32 parentMetaHash;
        address proposer;
        uint96 livenessBond;
        uint64 proposedAt;
        uint64 proposedIn;
        uint32 blobTxListOffset;
        uint32 blobTxListLength;
        uint8 blobIndex;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Transition {
        bytes32 parentHash;
        bytes32 blockHash;
        bytes32 stateRoot;
        bytes32 graffiti;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct TierProof {
        uint16 tier;
        bytes data;
    }

    function proposeBlock(bytes _params, bytes _txList) external payable;
    function proposeBlockV2(bytes _params, bytes _txList) external;
}

/// Domain separator of the prover assignment signing payload.
const PROVER_ASSIGNMENT_DOMAIN: &[u8] = b"PROVER_ASSIGNMENT";

/// `abi.encode(params)` for `proposeBlock`.
pub fn encode_block_params(params: &BlockParams) -> Bytes {
    params.abi_encode().into()
}

/// `abi.encode(params)` for `proposeBlockV2`.
pub fn encode_block_params_v2(params: &BlockParamsV2) -> Bytes {
    params.abi_encode().into()
}

/// `abi.encode(input)` for the assignment hook data of a legacy proposal.
pub fn encode_assignment_hook_input(input: &AssignmentHookInput) -> Bytes {
    input.abi_encode().into()
}

/// The fields of a prover assignment that the prover signs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProverAssignmentPayload {
    /// The L1 chain id.
    pub chain_id: u64,
    /// The `TaikoL1` contract.
    pub taiko_address: Address,
    /// The assignment hook contract.
    pub assignment_hook_address: Address,
    /// The proposer of the block.
    pub block_proposer: Address,
    /// The prover taking the assignment.
    pub assigned_prover: Address,
    /// The blob carrying the block's transactions.
    pub blob_hash: B256,
    /// The token the fee is paid in, zero for ether.
    pub fee_token: Address,
    /// The assignment is void after this timestamp.
    pub expiry: u64,
    /// The assignment is void for blocks above this id.
    pub max_block_id: u64,
    /// The assignment is void if the block is proposed after this L1 block.
    pub max_proposed_in: u64,
    /// The fee per proof tier.
    pub tier_fees: Vec<TierFee>,
}

/// Builds the payload a prover signs to accept an assignment.
///
/// The layout is `"PROVER_ASSIGNMENT"` right-padded to 32 bytes, the chain id as 8 big-endian
/// bytes, the taiko address, proposer, prover, blob hash, the hash of the fee terms and the
/// hook address. The fee terms are `abi.encode(0, 0, feeToken, expiry, maxBlockId,
/// maxProposedIn, tierFees)`, with the two meta hashes zeroed.
pub fn encode_prover_assignment_payload(payload: &ProverAssignmentPayload) -> Bytes {
    let fee_terms = (
        B256::ZERO,
        B256::ZERO,
        payload.fee_token,
        payload.expiry,
        payload.max_block_id,
        payload.max_proposed_in,
        payload.tier_fees.clone(),
    )
        .abi_encode_params();

    let mut domain = B256::ZERO;
    domain[..PROVER_ASSIGNMENT_DOMAIN.len()].copy_from_slice(PROVER_ASSIGNMENT_DOMAIN);

    let mut out = Vec::with_capacity(32 + 8 + 20 * 3 + 32 * 2 + 20);
    out.extend_from_slice(domain.as_slice());
    out.extend_from_slice(&payload.chain_id.to_be_bytes());
    out.extend_from_slice(payload.taiko_address.as_slice());
    out.extend_from_slice(payload.block_proposer.as_slice());
    out.extend_from_slice(payload.assigned_prover.as_slice());
    out.extend_from_slice(payload.blob_hash.as_slice());
    out.extend_from_slice(alloy_primitives::keccak256(fee_terms).as_slice());
    out.extend_from_slice(payload.assignment_hook_address.as_slice());
    out.into()
}

/// Block metadata of either proposal flow.
pub trait ProvableMetadata: SolValue + Clone {}

impl ProvableMetadata for BlockMetadata {}
impl ProvableMetadata for BlockMetadataV2 {}

/// `abi.encode(meta, transition, proof)` for `proveBlock`.
pub fn encode_prove_block_input<M: ProvableMetadata>(
    meta: &M,
    transition: &Transition,
    proof: &TierProof,
) -> Bytes {
    (meta.clone(), transition.clone(), proof.clone()).abi_encode_params().into()
}

/// Returns the `_txList` argument of `proposeBlock` or `proposeBlockV2` calldata.
pub fn unpack_tx_list_bytes(calldata: &[u8]) -> Result<Bytes, CodecError> {
    let selector = calldata.get(..4).ok_or(CodecError::MissingSelector)?;
    match <[u8; 4]>::try_from(selector).map_err(|_| CodecError::MissingSelector)? {
        proposeBlockCall::SELECTOR => Ok(proposeBlockCall::abi_decode(calldata)?._txList),
        proposeBlockV2Call::SELECTOR => Ok(proposeBlockV2Call::abi_decode(calldata)?._txList),
        other => Err(CodecError::UnexpectedSelector(other.into())),
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{U256, Uint, keccak256};

    use super::*;

    #[test]
    fn block_params_v2_is_a_static_tuple() {
        let params = BlockParamsV2 {
            coinbase: Address::repeat_byte(0x11),
            anchorBlockId: 5,
            blobTxListLength: 42,
            blobIndex: 1,
            ..Default::default()
        };
        let encoded = encode_block_params_v2(&params);
        assert_eq!(encoded.len(), 7 * 32);
        assert_eq!(&encoded[12..32], params.coinbase.as_slice());
        assert_eq!(BlockParamsV2::abi_decode(&encoded).unwrap(), params);
    }

    #[test]
    fn block_params_with_hooks() {
        let params = BlockParams {
            assignedProver: Address::repeat_byte(0x22),
            hookCalls: vec![HookCall {
                hook: Address::repeat_byte(0x33),
                data: encode_assignment_hook_input(&AssignmentHookInput::default()),
            }],
            signature: Bytes::from_static(&[1; 65]),
            ..Default::default()
        };
        let encoded = encode_block_params(&params);
        // dynamic struct: leading offset word
        assert_eq!(U256::from_be_slice(&encoded[..32]), U256::from(32));
        assert_eq!(BlockParams::abi_decode(&encoded).unwrap(), params);
    }

    #[test]
    fn prover_assignment_payload_layout() {
        let payload = ProverAssignmentPayload {
            chain_id: 167_000,
            taiko_address: Address::repeat_byte(1),
            assignment_hook_address: Address::repeat_byte(2),
            block_proposer: Address::repeat_byte(3),
            assigned_prover: Address::repeat_byte(4),
            blob_hash: B256::repeat_byte(5),
            fee_token: Address::ZERO,
            expiry: 100,
            max_block_id: 200,
            max_proposed_in: 300,
            tier_fees: vec![TierFee { tier: 100, fee: 1_000 }],
        };
        let encoded = encode_prover_assignment_payload(&payload);
        assert_eq!(encoded.len(), 32 + 8 + 60 + 64 + 20);
        assert_eq!(&encoded[..17], b"PROVER_ASSIGNMENT");
        assert!(encoded[17..32].iter().all(|b| *b == 0));
        assert_eq!(&encoded[32..40], &167_000u64.to_be_bytes());
        assert_eq!(&encoded[40..60], payload.taiko_address.as_slice());
        assert_eq!(&encoded[100..132], payload.blob_hash.as_slice());
        assert_eq!(&encoded[164..], payload.assignment_hook_address.as_slice());

        let fee_terms = (
            B256::ZERO,
            B256::ZERO,
            Address::ZERO,
            100u64,
            200u64,
            300u64,
            vec![TierFee { tier: 100, fee: 1_000 }],
        )
            .abi_encode_params();
        assert_eq!(&encoded[132..164], keccak256(fee_terms).as_slice());
    }

    #[test]
    fn prove_block_input_for_both_metadata_versions() {
        let transition = Transition { blockHash: B256::repeat_byte(9), ..Default::default() };
        let proof = TierProof { tier: 200, data: Bytes::from_static(b"proof") };

        let meta = BlockMetadataV2 {
            id: 10,
            livenessBond: Uint::from(125u64),
            ..Default::default()
        };
        let encoded = encode_prove_block_input(&meta, &transition, &proof);
        let (decoded_meta, decoded_transition, decoded_proof) =
            <(BlockMetadataV2, Transition, TierProof)>::abi_decode_params(&encoded).unwrap();
        assert_eq!(decoded_meta, meta);
        assert_eq!(decoded_transition, transition);
        assert_eq!(decoded_proof, proof);

        let legacy = BlockMetadata { id: 3, ..Default::default() };
        let encoded = encode_prove_block_input(&legacy, &transition, &proof);
        let (decoded_meta, ..) =
            <(BlockMetadata, Transition, TierProof)>::abi_decode_params(&encoded).unwrap();
        assert_eq!(decoded_meta, legacy);
    }

    #[test]
    fn tx_list_from_propose_calldata() {
        let tx_list = Bytes::from_static(&[0xaa, 0xbb]);
        let params = encode_block_params_v2(&BlockParamsV2::default());

        let calldata =
            proposeBlockV2Call { _params: params.clone(), _txList: tx_list.clone() }.abi_encode();
        assert_eq!(unpack_tx_list_bytes(&calldata).unwrap(), tx_list);

        let calldata = proposeBlockCall { _params: params, _txList: tx_list.clone() }.abi_encode();
        assert_eq!(unpack_tx_list_bytes(&calldata).unwrap(), tx_list);
    }

    #[test]
    fn tx_list_from_other_calldata() {
        let err = unpack_tx_list_bytes(&[0xde, 0xad, 0xbe, 0xef, 0x00]).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedSelector(_)), "{err:?}");
        assert!(matches!(unpack_tx_list_bytes(&[0x01]), Err(CodecError::MissingSelector)));
    }
}
