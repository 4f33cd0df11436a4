#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Encoders and decoders for the inputs and event payloads of the Taiko rollup contracts.
//!
//! Ontake and Pacaya use plain `abi.encode` for their proposal and proof parameters, while
//! Shasta packs its event payloads and inputs into a compact big-endian layout.

mod error;
pub use error::CodecError;

mod pack;

/// Ontake `TaikoL1` input encoders and calldata decoders.
pub mod ontake;

/// Pacaya `TaikoInbox` input encoders and calldata decoders.
pub mod pacaya;

/// Shasta compact codec and hashing.
pub mod shasta;
