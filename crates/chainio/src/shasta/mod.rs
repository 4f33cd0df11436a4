/// `Anchor.sol` L2 contract bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer2/core/Anchor.sol>
pub mod anchor;

/// `BondManager.sol` L2 contract bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer2/core/BondManager.sol>
pub mod bond_manager;

/// `ComposeVerifier.sol` L1 contract bindings
pub mod compose_verifier;

/// `Inbox.sol` L1 contract bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/core/impl/Inbox.sol>
pub mod inbox;

/// `InboxHelper.sol` contract bindings
pub mod inbox_helper;
