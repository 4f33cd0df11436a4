use std::fmt;

use alloy::transports::TransportError;
use alloy_primitives::{Address, B256, Bytes};
use alloy_sol_types::SolInterface;
use tkb_primitives::Fork;

use crate::{
    TryParseTransportErrorResult,
    errors::{DecodedError, decode_custom_error},
    try_parse_transport_error,
};

/// Errors returned by the binding roles.
#[derive(Debug, thiserror::Error)]
pub enum BindingError {
    /// The RPC request failed.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// The call reverted with a known custom error.
    #[error("execution reverted: {0}")]
    Revert(DecodedError),
    /// The call reverted with data that matches no known error.
    #[error("execution reverted with unknown data: {0}")]
    UnknownRevert(Bytes),
    /// Return data or log data could not be ABI-decoded.
    #[error("failed to decode: {0}")]
    Decode(#[from] alloy_sol_types::Error),
    /// A compact event payload could not be decoded.
    #[error("failed to decode compact payload: {0}")]
    Codec(#[from] tkb_codec::CodecError),
    /// The log was emitted by another contract.
    #[error("log emitted by {actual}, expected {expected}")]
    AddressMismatch {
        /// The address of the binding.
        expected: Address,
        /// The address that emitted the log.
        actual: Address,
    },
    /// The log is not an instance of the requested event.
    #[error("log topic0 {actual:?} is not the signature of {event} ({expected})")]
    EventSignatureMismatch {
        /// The Solidity signature of the requested event.
        event: &'static str,
        /// The selector of the requested event.
        expected: B256,
        /// The first topic of the log, if any.
        actual: Option<B256>,
    },
}

impl BindingError {
    /// Returns the decoded revert, if the call reverted with a known error.
    pub const fn as_revert(&self) -> Option<&DecodedError> {
        match self {
            Self::Revert(decoded) => Some(decoded),
            _ => None,
        }
    }
}

/// Decode a failed RPC request into a [`BindingError`].
///
/// The contract's own error interface `E` is tried first, then every known interface.
pub(crate) fn decode_revert<E: SolInterface + fmt::Debug>(
    err: TransportError,
    fork: Option<Fork>,
    contract: &'static str,
) -> BindingError {
    match try_parse_transport_error::<E>(err) {
        TryParseTransportErrorResult::Decoded(decoded) => {
            BindingError::Revert(DecodedError { fork, contract, error: format!("{decoded:?}") })
        }
        TryParseTransportErrorResult::UnknownSelector(data) => {
            decode_custom_error(&data)
                .map_or(BindingError::UnknownRevert(data), BindingError::Revert)
        }
        TryParseTransportErrorResult::Original(err) => BindingError::Transport(err),
    }
}
