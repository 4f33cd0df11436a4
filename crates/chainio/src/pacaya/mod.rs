/// `TaikoAnchor.sol` L2 contract bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer2/based/TaikoAnchor.sol>
pub mod anchor;

/// `ComposeVerifier.sol` L1 contract bindings
pub mod compose_verifier;

/// `ForcedInclusionStore.sol` L1 contract bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/forced-inclusion/ForcedInclusionStore.sol>
pub mod forced_inclusion_store;

/// `ForkRouter.sol` L1 contract bindings
pub mod fork_router;

/// `ITaikoInbox.sol` L1 contract bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/based/ITaikoInbox.sol>
pub mod inbox;

/// `IPreconfRouter.sol` L1 contract bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/preconf/iface/IPreconfRouter.sol>
pub mod preconf_router;

/// `IPreconfWhitelist.sol` L1 contract bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/preconf/iface/IPreconfWhitelist.sol>
pub mod preconf_whitelist;

/// `ResolverBase.sol` contract bindings
pub mod resolver_base;

/// `TaikoToken.sol` contract bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/token/TaikoToken.sol>
pub mod token;

/// `TaikoWrapper.sol` L1 contract bindings
///
/// Ref: <https://github.com/taikoxyz/taiko-mono/blob/main/packages/protocol/contracts/layer1/forced-inclusion/TaikoWrapper.sol>
pub mod wrapper;
