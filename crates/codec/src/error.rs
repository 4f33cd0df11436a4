use alloy_primitives::Selector;
use tkb_primitives::compression::TxListError;

/// Errors returned by the encoders and decoders of this crate.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The input ended before the field at `offset` could be read.
    #[error("unexpected end of input at offset {offset}: {needed} more bytes needed")]
    Truncated {
        /// Offset of the field that could not be read.
        offset: usize,
        /// Number of bytes missing.
        needed: usize,
    },
    /// The input has bytes left over after a complete payload.
    #[error("{0} trailing bytes after payload")]
    TrailingBytes(usize),
    /// An array is too long for the width of its length prefix.
    #[error("{field} length {len} exceeds the maximum of {max}")]
    LengthOverflow {
        /// The array being encoded.
        field: &'static str,
        /// Its length.
        len: usize,
        /// The largest length its prefix can carry.
        max: usize,
    },
    /// Two arrays that must be aligned have different lengths.
    #[error("{field} length mismatch: expected {expected}, got {actual}")]
    LengthMismatch {
        /// The array with the unexpected length.
        field: &'static str,
        /// The length it should have.
        expected: usize,
        /// The length it has.
        actual: usize,
    },
    /// A bond instruction carries a bond type above `LIVENESS`.
    #[error("invalid bond type {0}")]
    InvalidBondType(u8),
    /// The checkpoint presence flag is neither 0 nor 1.
    #[error("invalid checkpoint flag {0}")]
    InvalidCheckpointFlag(u8),
    /// The calldata does not target a function this decoder knows.
    #[error("unexpected function selector {0}")]
    UnexpectedSelector(Selector),
    /// The calldata is shorter than a function selector.
    #[error("calldata is too short to carry a function selector")]
    MissingSelector,
    /// ABI decoding failed.
    #[error(transparent)]
    Abi(#[from] alloy_sol_types::Error),
    /// The compressed transaction list could not be decoded.
    #[error(transparent)]
    TxList(#[from] TxListError),
}
