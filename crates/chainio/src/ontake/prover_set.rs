use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use alloy_primitives::Address;
use tkb_primitives::Fork;

use self::IProverSet::IProverSetErrors;
use crate::{bind::contract_binding, map_contract_error};

contract_binding! {
    /// A wrapper over the Ontake `ProverSet` contract, which proposes and proves on behalf of
    /// its enabled provers.
    ProverSet(IProverSet::IProverSetInstance),
    errors: IProverSetErrors,
    fork: Some(Fork::Ontake),
}

impl<P: Provider + Clone> ProverSet<P> {
    /// Returns true if `prover` is enabled in the set.
    pub async fn is_prover(&self, prover: Address) -> ContractResult<bool> {
        self.0.isProver(prover).call().await.map_err(map_contract_error::<IProverSetErrors>)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IProverSet {
        error INVALID_STATUS();
        error PERMISSION_DENIED();
        error RESOLVER_DENIED();
        error RESOLVER_INVALID_MANAGER();
        error RESOLVER_UNEXPECTED_CHAINID();
        error RESOLVER_ZERO_ADDR(uint64 chainId, bytes32 name);

        event ProverEnabled(address indexed prover, bool indexed enabled);

        function addressManager() external view returns (address);
        function admin() external view returns (address);
        function approveAllowance(address _address, uint256 _allowance) external;
        function delegate(address _delegatee) external;
        function depositBond(uint256 _amount) external;
        function enableProver(address _prover, bool _isProver) external;
        function init(address _owner, address _admin, address _rollupAddressManager) external;
        function isProver(address prover) external view returns (bool isProver);
        function isValidSignature(bytes32 _hash, bytes memory _signature) external view
            returns (bytes4 magicValue_);
        function proposeBlock(bytes memory _params, bytes memory _txList) external payable;
        function proposeBlockV2(bytes memory _params, bytes memory _txList) external payable;
        function proveBlock(uint64 _blockId, bytes memory _input) external;
        function resolve(bytes32 _name, bool _allowZeroAddress) external view returns (address);
        function resolve(uint64 _chainId, bytes32 _name, bool _allowZeroAddress) external view
            returns (address);
        function withdrawBond(uint256 _amount) external;
        function withdrawEtherToAdmin(uint256 _amount) external;
        function withdrawToAdmin(uint256 _amount) external;
    }
}
