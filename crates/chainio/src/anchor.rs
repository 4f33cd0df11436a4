use alloy::{
    consensus::Transaction as _,
    rpc::types::{Block, Transaction},
};
use alloy_primitives::Address;
use alloy_sol_types::SolCall;
use tkb_primitives::taiko::constants::TAIKO_GOLDEN_TOUCH_ACCOUNT;

/// Errors that can occur when locating or decoding the anchor transaction of an L2 block.
#[derive(Debug, thiserror::Error)]
#[allow(missing_docs)]
pub enum AnchorError {
    #[error("anchor transaction not found in block")]
    AnchorTransactionNotFound,
    #[error("anchor transaction from is not the golden touch account: {got}, expected: {expected}")]
    InvalidSigner { got: Address, expected: Address },
    #[error("failed to decode anchor calldata: {0}")]
    Decode(#[from] alloy_sol_types::Error),
}

/// Returns the anchor transaction of a full L2 block.
///
/// The anchor is always the first transaction of the block, sent by [`TAIKO_GOLDEN_TOUCH_ACCOUNT`].
pub fn anchor_transaction(block: &Block) -> Result<&Transaction, AnchorError> {
    let Some(first) = block.transactions.as_transactions().and_then(|txs| txs.first()) else {
        return Err(AnchorError::AnchorTransactionNotFound);
    };

    if first.inner.signer() != TAIKO_GOLDEN_TOUCH_ACCOUNT {
        return Err(AnchorError::InvalidSigner {
            got: first.inner.signer(),
            expected: TAIKO_GOLDEN_TOUCH_ACCOUNT,
        });
    }

    Ok(first)
}

/// Decode the anchor transaction of a full L2 block as a `C` call.
///
/// Returns an error if:
/// - the block has no transactions, or only their hashes;
/// - the first transaction is not from the golden touch account;
/// - its calldata is not a `C` call.
pub fn decode_anchor_call<C: SolCall>(block: &Block) -> Result<C, AnchorError> {
    let tx = anchor_transaction(block)?;
    Ok(C::abi_decode(tx.input())?)
}

#[cfg(test)]
mod tests {
    use alloy::{
        consensus::{Signed, TxEip1559, TxEnvelope, transaction::Recovered},
        rpc::types::{BlockTransactions, Header},
    };
    use alloy_primitives::{B256, Bytes, Signature, U256};

    use super::*;
    use crate::pacaya::anchor::ITaikoAnchor;

    fn block_with(signer: Address, input: Bytes) -> Block {
        let tx = TxEip1559 { input, ..Default::default() };
        let signature = Signature::new(U256::from(1), U256::from(2), false);
        let envelope = TxEnvelope::Eip1559(Signed::new_unhashed(tx, signature));
        let tx = Transaction {
            inner: Recovered::new_unchecked(envelope, signer),
            block_hash: None,
            block_number: Some(1),
            transaction_index: Some(0),
            effective_gas_price: None,
        };

        Block {
            header: Header::default(),
            uncles: Vec::new(),
            transactions: BlockTransactions::Full(vec![tx]),
            withdrawals: None,
        }
    }

    fn anchor_v3() -> ITaikoAnchor::anchorV3Call {
        ITaikoAnchor::anchorV3Call {
            _anchorBlockId: 100,
            _anchorStateRoot: B256::repeat_byte(7),
            _parentGasUsed: 21_000,
            _baseFeeConfig: Default::default(),
            _signalSlots: vec![B256::repeat_byte(1)],
        }
    }

    #[test]
    fn decodes_the_first_transaction() {
        let block = block_with(TAIKO_GOLDEN_TOUCH_ACCOUNT, anchor_v3().abi_encode().into());
        let decoded = decode_anchor_call::<ITaikoAnchor::anchorV3Call>(&block).unwrap();
        assert_eq!(decoded._anchorBlockId, 100);
        assert_eq!(decoded._signalSlots, vec![B256::repeat_byte(1)]);
    }

    #[test]
    fn rejects_other_signers() {
        let block = block_with(Address::repeat_byte(9), anchor_v3().abi_encode().into());
        let err = anchor_transaction(&block).unwrap_err();
        assert!(matches!(
            err,
            AnchorError::InvalidSigner { got, .. } if got == Address::repeat_byte(9)
        ));
    }

    #[test]
    fn rejects_empty_blocks_and_other_calls() {
        let mut block = block_with(TAIKO_GOLDEN_TOUCH_ACCOUNT, Bytes::new());
        let err = decode_anchor_call::<ITaikoAnchor::anchorV3Call>(&block).unwrap_err();
        assert!(matches!(err, AnchorError::Decode(_)));

        block.transactions = BlockTransactions::Hashes(vec![B256::ZERO]);
        let err = anchor_transaction(&block).unwrap_err();
        assert!(matches!(err, AnchorError::AnchorTransactionNotFound));
    }
}
