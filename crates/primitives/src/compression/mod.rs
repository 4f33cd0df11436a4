use std::{
    self,
    io::{Read, Write},
};

use alloy::consensus::TxEnvelope;
use alloy_primitives::Bytes;
use alloy_rlp::Decodable;
use flate2::{Compression, read::ZlibDecoder, write::ZlibEncoder};

/// Upper bound on the decompressed size of a transaction list.
///
/// Matches the maximum blob payload a proposal can carry, so anything larger is either
/// malformed or hostile.
pub const MAX_DECOMPRESSED_TX_LIST_SIZE: u64 = 6 * 131_072;

/// Errors that can occur while decoding a compressed transaction list.
#[derive(Debug, thiserror::Error)]
pub enum TxListError {
    /// The payload is not valid zlib data.
    #[error("failed to decompress tx list: {0}")]
    Decompress(#[from] std::io::Error),
    /// The decompressed payload exceeds [`MAX_DECOMPRESSED_TX_LIST_SIZE`].
    #[error("decompressed tx list is too large: more than {MAX_DECOMPRESSED_TX_LIST_SIZE} bytes")]
    TooLarge,
    /// The decompressed payload is not an RLP list of transactions.
    #[error("failed to RLP-decode tx list: {0}")]
    Rlp(#[from] alloy_rlp::Error),
}

/// Compress the input bytes using `zlib`.
pub fn zlib_compress(input: &[u8]) -> std::io::Result<Bytes> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(input)?;
    encoder.finish().map(Bytes::from)
}

/// Decompress the input bytes using `zlib`.
pub fn zlib_decompress(input: &[u8]) -> std::io::Result<Bytes> {
    let mut decoder = ZlibDecoder::new(input);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;
    Ok(Bytes::from(decompressed))
}

/// RLP-encode and compress with zlib a given encodable object.
pub fn rlp_encode_and_compress<E: alloy_rlp::Encodable>(b: &E) -> std::io::Result<Bytes> {
    let rlp_encoded_tx_list = alloy_rlp::encode(b);
    zlib_compress(&rlp_encoded_tx_list)
}

/// Decompress a `txList` as submitted in a proposal and decode the transactions it carries.
///
/// Empty input decodes to an empty list, as proposals that reference blobs leave the
/// calldata `txList` empty.
pub fn decode_tx_list(compressed: &[u8]) -> Result<Vec<TxEnvelope>, TxListError> {
    if compressed.is_empty() {
        return Ok(Vec::new());
    }

    let mut decoder = ZlibDecoder::new(compressed).take(MAX_DECOMPRESSED_TX_LIST_SIZE + 1);
    let mut decompressed = Vec::new();
    decoder.read_to_end(&mut decompressed)?;

    if decompressed.len() as u64 > MAX_DECOMPRESSED_TX_LIST_SIZE {
        return Err(TxListError::TooLarge);
    }

    let mut buf = decompressed.as_slice();
    let txs = Vec::<TxEnvelope>::decode(&mut buf)?;
    if !buf.is_empty() {
        return Err(TxListError::Rlp(alloy_rlp::Error::UnexpectedLength));
    }

    Ok(txs)
}

#[cfg(test)]
mod tests {
    use alloy::consensus::{Signed, TxLegacy};
    use alloy_primitives::{Address, Signature, TxKind, U256};

    use super::*;

    fn legacy_tx(nonce: u64) -> TxEnvelope {
        let tx = TxLegacy {
            chain_id: Some(167_000),
            nonce,
            gas_price: 10_000_000,
            gas_limit: 21_000,
            to: TxKind::Call(Address::repeat_byte(0x11)),
            value: U256::from(nonce),
            input: Bytes::new(),
        };
        let sig = Signature::new(U256::from(1u64 + nonce), U256::from(2u64), false);
        TxEnvelope::Legacy(Signed::new_unhashed(tx, sig))
    }

    #[test]
    fn test_encode_and_compress_tx_list() {
        // Generate 200 transactions with different values
        let txs: Vec<Bytes> =
            (0..200).map(|i| Bytes::from(format!("0x{:04x}", i).into_bytes())).collect();

        let uncompressed_size: usize = txs.iter().map(|tx| tx.len()).sum();
        assert_eq!(uncompressed_size, 1200, "Each tx should be 6 bytes (200 * 6 = 1200)");

        let compressed = rlp_encode_and_compress(&txs).unwrap();
        assert!(
            compressed.len() < uncompressed_size,
            "Compressed size ({}) should be less than uncompressed size ({})",
            compressed.len(),
            uncompressed_size
        );

        let decompressed = zlib_decompress(&compressed).unwrap();
        assert_eq!(decompressed, Bytes::from(alloy_rlp::encode(&txs)));
    }

    #[test]
    fn decode_tx_list_recovers_transactions() {
        let txs = (0..5).map(legacy_tx).collect::<Vec<_>>();
        let compressed = rlp_encode_and_compress(&txs).unwrap();

        let decoded = decode_tx_list(&compressed).unwrap();
        assert_eq!(decoded.len(), 5);
        assert_eq!(decoded, txs);
    }

    #[test]
    fn decode_tx_list_empty_input() {
        assert!(decode_tx_list(&[]).unwrap().is_empty());
    }

    #[test]
    fn decode_tx_list_rejects_garbage() {
        let err = decode_tx_list(&[0xde, 0xad, 0xbe, 0xef]).unwrap_err();
        assert!(matches!(err, TxListError::Decompress(_)), "got {err:?}");

        // valid zlib, invalid rlp
        let compressed = zlib_compress(&[0x01, 0x02, 0x03]).unwrap();
        let err = decode_tx_list(&compressed).unwrap_err();
        assert!(matches!(err, TxListError::Rlp(_)), "got {err:?}");
    }

    #[test]
    fn decode_tx_list_rejects_oversized_payloads() {
        let payload = vec![0u8; MAX_DECOMPRESSED_TX_LIST_SIZE as usize + 10];
        let compressed = zlib_compress(&payload).unwrap();
        assert!(matches!(decode_tx_list(&compressed), Err(TxListError::TooLarge)));
    }
}
