use alloy_primitives::{Address, address};

/// The address of the "golden touch" account, the only sender allowed to submit the `anchor`
/// transaction at the top of every L2 block.
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/c7e9bfbd65f3d7515b66933d96a5c910ab00f82a/packages/protocol/contracts/layer2/based/TaikoAnchor.sol#L31>
pub const TAIKO_GOLDEN_TOUCH_ACCOUNT: Address =
    address!("0000777735367b36bC9B61C50022d9D0700dB4Ec");

/// The gas limit for the `anchorV2` L2 transactions (Ontake).
pub const TAIKO_ANCHOR_V2_GAS_LIMIT: u64 = 250_000;

/// The gas limit for the `anchorV3` L2 transactions (Pacaya).
///
/// Ref: <https://github.com/taikoxyz/taiko-geth/blob/taiko/consensus/taiko/consensus.go#L43>
pub const TAIKO_ANCHOR_V3_GAS_LIMIT: u64 = 1_000_000;

/// The gas limit for the `anchorV4` L2 transactions (Shasta).
pub const TAIKO_ANCHOR_V4_GAS_LIMIT: u64 = 1_000_000;

/// The `BondType` discriminants shared by the Shasta `Inbox`, `Anchor` and `BondManager`.
pub mod bond_type {
    /// No bond is moved.
    pub const NONE: u8 = 0;
    /// The designated prover failed to prove within the proving window.
    pub const PROVABILITY: u8 = 1;
    /// The proposal was proved late by someone else.
    pub const LIVENESS: u8 = 2;
}
