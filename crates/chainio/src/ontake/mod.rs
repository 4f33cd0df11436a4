/// `AddressManager.sol` L1 contract bindings
pub mod address_manager;

/// `GuardianVerifier.sol` L1 contract bindings
pub mod guardian_verifier;

/// `PreconfTaskManager.sol` L1 contract bindings
pub mod preconf_task_manager;

/// `ProverSet.sol` L1 contract bindings
pub mod prover_set;

/// `SequencerRegistry.sol` L1 contract bindings
pub mod sequencer_registry;

/// `TaikoL1.sol` L1 contract bindings, including the errors and events of its linked libraries
pub mod taiko_l1;

/// `TaikoL2.sol` L2 contract bindings
pub mod taiko_l2;

/// `TierProviderV2.sol` L1 contract bindings
pub mod tier_provider;
