use alloy::{providers::Provider, sol};
use alloy_primitives::{Address, B256, Bytes, keccak256};
use alloy_sol_types::SolValue;
use tkb_primitives::summary::Summary;

use self::IEssentialContract::IEssentialContractErrors;
use crate::bind::{Binding, BindingError, CallOpts, contract_binding};

contract_binding! {
    /// A wrapper over the `EssentialContract` base of every upgradeable Taiko contract.
    EssentialContract(IEssentialContract::IEssentialContractInstance),
    errors: IEssentialContractErrors,
    fork: None,
}

/// A snapshot of the ownership, pause and upgrade state of a contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EssentialState {
    /// The current owner.
    pub owner: Address,
    /// The owner-to-be, if a two-step transfer is in progress.
    pub pending_owner: Address,
    /// Whether the contract is paused.
    pub paused: bool,
    /// The implementation behind the proxy.
    pub implementation: Address,
}

impl Summary for EssentialState {
    fn summary(&self) -> String {
        format!(
            "owner: {}, pending owner: {}, paused: {}, implementation: {}",
            self.owner, self.pending_owner, self.paused, self.implementation
        )
    }
}

impl<P: Provider + Clone> EssentialContract<P> {
    /// Returns the implementation behind the proxy, through the contract's `impl()` getter.
    pub async fn implementation(&self) -> Result<Address, BindingError> {
        let selector = keccak256("impl()");
        let output = self
            .caller()
            .call_raw(&CallOpts::default(), Bytes::copy_from_slice(&selector[..4]))
            .await?;

        Ok(Address::abi_decode(&output)?)
    }

    /// Fetch the ownership, pause and upgrade state in one go.
    pub async fn state(&self) -> Result<EssentialState, BindingError> {
        let caller = self.caller();
        let opts = CallOpts::default();

        let (owner, pending_owner, paused, implementation) = tokio::try_join!(
            caller.call(&opts, &IEssentialContract::ownerCall {}),
            caller.call(&opts, &IEssentialContract::pendingOwnerCall {}),
            caller.call(&opts, &IEssentialContract::pausedCall {}),
            self.implementation(),
        )?;

        Ok(EssentialState { owner, pending_owner, paused, implementation })
    }

    /// Returns the ERC-1967 implementation slot, as exposed by `proxiableUUID()`.
    pub async fn proxiable_uuid(&self) -> Result<B256, BindingError> {
        self.caller().call(&CallOpts::default(), &IEssentialContract::proxiableUUIDCall {}).await
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IEssentialContract {
        error ACCESS_DENIED();
        error ETH_TRANSFER_FAILED();
        error FUNC_NOT_IMPLEMENTED();
        error INVALID_PAUSE_STATUS();
        error REENTRANT_CALL();
        error RESOLVER_NOT_FOUND();
        error ZERO_ADDRESS();
        error ZERO_VALUE();

        event AdminChanged(address previousAdmin, address newAdmin);
        event BeaconUpgraded(address indexed beacon);
        event Initialized(uint8 version);
        event OwnershipTransferStarted(address indexed previousOwner, address indexed newOwner);
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);
        event Paused(address account);
        event Unpaused(address account);
        event Upgraded(address indexed implementation);

        function acceptOwnership() external;
        function inNonReentrant() external view returns (bool);
        function lastUnpausedAt() external view returns (uint64);
        function owner() external view returns (address);
        function pause() external;
        function paused() external view returns (bool);
        function pendingOwner() external view returns (address);
        function proxiableUUID() external view returns (bytes32);
        function renounceOwnership() external;
        function resolver() external view returns (address);
        function transferOwnership(address newOwner) external;
        function unpause() external;
        function upgradeTo(address newImplementation) external;
        function upgradeToAndCall(address newImplementation, bytes memory data) external payable;
    }
}
