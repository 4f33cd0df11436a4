#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Primitive types, utilities and constants shared by the Taiko bindings crates.

use std::fmt;

use alloy_primitives::U256;

/// Taiko chain primitives and constants.
pub mod taiko;

/// Compression utilities.
pub mod compression;

/// Transport retries utilities
pub mod retries;

/// Utility for summarizing objects into a string for logging purposes.
pub mod summary;

/// Utilities for handling long-running tasks.
pub mod task;

mod fork;
pub use fork::{Fork, UnknownFork};

/// An amount of an 18-decimals token (ETH, TAIKO bonds), displayed in whole units with up to
/// 9 decimals (gwei precision). Smaller remainders are truncated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TokenAmount(pub U256);

impl TokenAmount {
    const UNIT: U256 = U256::from_limbs([1_000_000_000_000_000_000, 0, 0, 0]);
    const GWEI: U256 = U256::from_limbs([1_000_000_000, 0, 0, 0]);
}

impl fmt::Display for TokenAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (whole, rest) = self.0.div_rem(Self::UNIT);
        let gwei = (rest / Self::GWEI).to::<u64>();
        if gwei == 0 {
            return write!(f, "{whole}");
        }

        let decimals = format!("{gwei:09}");
        write!(f, "{whole}.{}", decimals.trim_end_matches('0'))
    }
}
