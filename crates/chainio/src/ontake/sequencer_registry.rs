use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use alloy_primitives::Address;
use tkb_primitives::Fork;

use self::ISequencerRegistry::ISequencerRegistryErrors;
use crate::{bind::contract_binding, map_contract_error};

contract_binding! {
    /// A wrapper over the Ontake `SequencerRegistry` contract.
    SequencerRegistry(ISequencerRegistry::ISequencerRegistryInstance),
    errors: ISequencerRegistryErrors,
    fork: Some(Fork::Ontake),
}

impl<P: Provider + Clone> SequencerRegistry<P> {
    /// Returns true if `proposer` may propose blocks.
    pub async fn is_eligible_signer(&self, proposer: Address) -> ContractResult<bool> {
        self.0
            .isEligibleSigner(proposer)
            .call()
            .await
            .map_err(map_contract_error::<ISequencerRegistryErrors>)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface ISequencerRegistry {
        error RESOLVER_DENIED();
        error RESOLVER_INVALID_MANAGER();
        error RESOLVER_UNEXPECTED_CHAINID();
        error RESOLVER_ZERO_ADDR(uint64 chainId, bytes32 name);

        event SequencerUpdated(address indexed sequencer, bool enabled);

        function addressManager() external view returns (address);
        function init(address _owner) external;
        function isEligibleSigner(address _proposer) external view returns (bool);
        function resolve(bytes32 _name, bool _allowZeroAddress) external view returns (address);
        function resolve(uint64 _chainId, bytes32 _name, bool _allowZeroAddress) external view
            returns (address);
        function sequencers(address sequencer) external view returns (bool enabled);
        function setSequencers(address[] memory _sequencers, bool[] memory _enabled) external;
    }
}
