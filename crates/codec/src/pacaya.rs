//! `abi.encode` helpers for the Pacaya `TaikoInbox` inputs.

#![allow(missing_docs)]

use alloy::consensus::TxEnvelope;
use alloy_primitives::Bytes;
use alloy_sol_types::{SolCall, SolValue, sol};
use tkb_primitives::compression;

use crate::CodecError;

sol! {
    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlockParams {
        uint16 numTransactions;
        uint8 timeShift;
        bytes32[] signalSlots;
    }

    /// Where the transactions of a batch live. `blobHashes` is only set for forced
    /// inclusions; regular proposals reference blobs of their own transaction by index.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct BlobParams {
        bytes32[] blobHashes;
        uint8 firstBlobIndex;
        uint8 numBlobs;
        uint32 byteOffset;
        uint32 byteSize;
        uint64 createdIn;
    }

    /// The parameters of `proposeBatch`.
    #[derive(Debug, Default, PartialEq, Eq)]
    struct BatchParams {
        address proposer;
        address coinbase;
        bytes32 parentMetaHash;
        uint64 anchorBlockId;
        uint64 lastBlockTimestamp;
        bool revertIfNotFirstProposal;
        BlobParams blobParams;
        BlockParams[] blocks;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct BatchMetadata {
        bytes32 infoHash;
        address proposer;
        uint64 batchId;
        uint64 proposedAt;
    }

    #[derive(Debug, Default, PartialEq, Eq)]
    struct Transition {
        bytes32 parentHash;
        bytes32 blockHash;
        bytes32 stateRoot;
    }

    function proposeBatch(bytes _params, bytes _txList) external;
    function proposeBatchWithExpectedLastBlockId(
        bytes _params,
        bytes _txList,
        uint96 _expectedLastBlockId
    ) external;
}

/// `abi.encode(params)` as taken by `TaikoInbox.proposeBatch`.
pub fn encode_batch_params(params: &BatchParams) -> Bytes {
    params.abi_encode().into()
}

/// `abi.encode(bytes, bytes)` as taken by `TaikoWrapper.proposeBatch`.
///
/// The first element is the encoded forced inclusion batch, or empty bytes when there is none.
pub fn encode_wrapped_batch_params(forced: Option<&BatchParams>, params: &BatchParams) -> Bytes {
    let forced = forced.map(encode_batch_params).unwrap_or_default();
    (forced, encode_batch_params(params)).abi_encode_params().into()
}

/// `abi.encode(metas, transitions)` as taken by `TaikoInbox.proveBatches`.
pub fn encode_prove_batches_params(
    metas: &[BatchMetadata],
    transitions: &[Transition],
) -> Result<Bytes, CodecError> {
    if metas.len() != transitions.len() {
        return Err(CodecError::LengthMismatch {
            field: "transitions",
            expected: metas.len(),
            actual: transitions.len(),
        });
    }

    Ok((metas.to_vec(), transitions.to_vec()).abi_encode_params().into())
}

/// The decoded arguments of a `proposeBatch` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProposeBatchCalldata {
    /// The forced inclusion batch processed in front of `params`, when the call went
    /// through the wrapper and carried one.
    pub forced_inclusion: Option<BatchParams>,
    /// The proposed batch.
    pub params: BatchParams,
    /// The compressed transaction list, empty when the batch uses blobs.
    pub tx_list: Bytes,
}

/// Decodes `proposeBatch` calldata sent to the inbox, the wrapper or the preconf router.
///
/// The wrapped `(bytes, bytes)` layout is tried first, and the params are read as a plain
/// `BatchParams` if that fails.
pub fn decode_propose_batch_calldata(calldata: &[u8]) -> Result<ProposeBatchCalldata, CodecError> {
    let selector = calldata.get(..4).ok_or(CodecError::MissingSelector)?;
    let (params, tx_list) =
        match <[u8; 4]>::try_from(selector).map_err(|_| CodecError::MissingSelector)? {
            proposeBatchCall::SELECTOR => {
                let call = proposeBatchCall::abi_decode(calldata)?;
                (call._params, call._txList)
            }
            proposeBatchWithExpectedLastBlockIdCall::SELECTOR => {
                let call = proposeBatchWithExpectedLastBlockIdCall::abi_decode(calldata)?;
                (call._params, call._txList)
            }
            other => return Err(CodecError::UnexpectedSelector(other.into())),
        };

    if let Some((forced_inclusion, params)) = decode_wrapped(&params) {
        return Ok(ProposeBatchCalldata { forced_inclusion, params, tx_list });
    }

    let params = BatchParams::abi_decode(&params)?;
    Ok(ProposeBatchCalldata { forced_inclusion: None, params, tx_list })
}

fn decode_wrapped(data: &[u8]) -> Option<(Option<BatchParams>, BatchParams)> {
    let (forced, params) = <(Bytes, Bytes)>::abi_decode_params(data).ok()?;
    let params = BatchParams::abi_decode(&params).ok()?;
    if forced.is_empty() {
        return Some((None, params));
    }
    Some((Some(BatchParams::abi_decode(&forced).ok()?), params))
}

/// Decompresses and decodes the transaction list of a calldata proposal.
pub fn decode_tx_list(tx_list: &[u8]) -> Result<Vec<TxEnvelope>, CodecError> {
    Ok(compression::decode_tx_list(tx_list)?)
}

#[cfg(test)]
mod tests {
    use alloy::consensus::{Signed, TxEip1559};
    use alloy_primitives::{Address, B256, Signature, TxKind, U256, aliases::U96};
    use tkb_primitives::compression::rlp_encode_and_compress;

    use super::*;

    fn params(anchor: u64) -> BatchParams {
        BatchParams {
            proposer: Address::repeat_byte(0x11),
            coinbase: Address::repeat_byte(0x22),
            anchorBlockId: anchor,
            lastBlockTimestamp: 1_700_000_000,
            blobParams: BlobParams { numBlobs: 1, byteSize: 1_024, ..Default::default() },
            blocks: vec![
                BlockParams { numTransactions: 3, timeShift: 0, signalSlots: vec![] },
                BlockParams {
                    numTransactions: 1,
                    timeShift: 2,
                    signalSlots: vec![B256::repeat_byte(1)],
                },
            ],
            ..Default::default()
        }
    }

    #[test]
    fn wrapped_params_layout() {
        let encoded = encode_wrapped_batch_params(None, &params(1));
        let (forced, inner) = <(Bytes, Bytes)>::abi_decode_params(&encoded).unwrap();
        assert!(forced.is_empty());
        assert_eq!(inner, encode_batch_params(&params(1)));

        let encoded = encode_wrapped_batch_params(Some(&params(2)), &params(3));
        let (forced, _) = <(Bytes, Bytes)>::abi_decode_params(&encoded).unwrap();
        assert_eq!(BatchParams::abi_decode(&forced).unwrap(), params(2));
    }

    #[test]
    fn prove_batches_params() {
        let metas = vec![BatchMetadata { batchId: 7, ..Default::default() }];
        let transitions =
            vec![Transition { blockHash: B256::repeat_byte(3), ..Default::default() }];
        let encoded = encode_prove_batches_params(&metas, &transitions).unwrap();
        let (decoded_metas, decoded_transitions) =
            <(Vec<BatchMetadata>, Vec<Transition>)>::abi_decode_params(&encoded).unwrap();
        assert_eq!(decoded_metas, metas);
        assert_eq!(decoded_transitions, transitions);

        let err = encode_prove_batches_params(&metas, &[]).unwrap_err();
        assert!(matches!(err, CodecError::LengthMismatch { expected: 1, actual: 0, .. }));
    }

    #[test]
    fn decodes_inbox_calldata() {
        let tx_list = Bytes::from_static(&[1, 2, 3]);
        let calldata = proposeBatchCall {
            _params: encode_batch_params(&params(5)),
            _txList: tx_list.clone(),
        }
        .abi_encode();

        let decoded = decode_propose_batch_calldata(&calldata).unwrap();
        assert_eq!(decoded.params, params(5));
        assert_eq!(decoded.forced_inclusion, None);
        assert_eq!(decoded.tx_list, tx_list);
    }

    #[test]
    fn decodes_wrapped_calldata() {
        let calldata = proposeBatchCall {
            _params: encode_wrapped_batch_params(Some(&params(8)), &params(9)),
            _txList: Bytes::new(),
        }
        .abi_encode();
        let decoded = decode_propose_batch_calldata(&calldata).unwrap();
        assert_eq!(decoded.forced_inclusion, Some(params(8)));
        assert_eq!(decoded.params, params(9));

        let calldata = proposeBatchWithExpectedLastBlockIdCall {
            _params: encode_wrapped_batch_params(None, &params(10)),
            _txList: Bytes::new(),
            _expectedLastBlockId: U96::from(100u64),
        }
        .abi_encode();
        let decoded = decode_propose_batch_calldata(&calldata).unwrap();
        assert_eq!(decoded.forced_inclusion, None);
        assert_eq!(decoded.params, params(10));
    }

    #[test]
    fn rejects_unknown_calldata() {
        let err = decode_propose_batch_calldata(&[0u8; 36]).unwrap_err();
        assert!(matches!(err, CodecError::UnexpectedSelector(_)), "{err:?}");
        assert!(matches!(decode_propose_batch_calldata(&[]), Err(CodecError::MissingSelector)));
    }

    #[test]
    fn tx_list_round_trip() {
        let tx = TxEip1559 {
            chain_id: 167_000,
            nonce: 1,
            gas_limit: 21_000,
            max_fee_per_gas: 2,
            max_priority_fee_per_gas: 1,
            to: TxKind::Call(Address::repeat_byte(0x44)),
            value: U256::from(10),
            ..Default::default()
        };
        let sig = Signature::new(U256::from(1), U256::from(2), false);
        let txs = vec![TxEnvelope::Eip1559(Signed::new_unhashed(tx, sig))];

        let compressed = rlp_encode_and_compress(&txs).unwrap();
        assert_eq!(decode_tx_list(&compressed).unwrap(), txs);
        assert!(matches!(decode_tx_list(&[0xff, 0x00]), Err(CodecError::TxList(_))));
    }
}
