use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use alloy_primitives::{Address, B256};
use tkb_primitives::Fork;

use self::IAddressManager::IAddressManagerErrors;
use crate::{bind::contract_binding, map_contract_error};

contract_binding! {
    /// A wrapper over the Ontake `AddressManager` contract, the name registry of the protocol.
    AddressManager(IAddressManager::IAddressManagerInstance),
    errors: IAddressManagerErrors,
    fork: Some(Fork::Ontake),
}

/// Encode a registry name such as `"taiko_token"` as the `bytes32` key used on-chain.
///
/// Names longer than 32 bytes are truncated.
pub fn name_key(name: &str) -> B256 {
    let bytes = name.as_bytes();
    B256::right_padding_from(&bytes[..bytes.len().min(32)])
}

impl<P: Provider + Clone> AddressManager<P> {
    /// Returns the address registered under `name` for `chain_id`, or zero if unset.
    pub async fn get_address(&self, chain_id: u64, name: &str) -> ContractResult<Address> {
        self.0
            .getAddress(chain_id, name_key(name))
            .call()
            .await
            .map_err(map_contract_error::<IAddressManagerErrors>)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IAddressManager {
        error AM_ADDRESS_ALREADY_SET();
        error RESOLVER_DENIED();
        error RESOLVER_INVALID_MANAGER();
        error RESOLVER_UNEXPECTED_CHAINID();
        error RESOLVER_ZERO_ADDR(uint64 chainId, bytes32 name);

        event AddressSet(uint64 indexed chainId, bytes32 indexed name, address newAddress, address oldAddress);

        function addressManager() external view returns (address);
        function getAddress(uint64 _chainId, bytes32 _name) external view returns (address);
        function init(address _owner) external;
        function init2() external;
        function resolve(bytes32 _name, bool _allowZeroAddress) external view returns (address);
        function resolve(uint64 _chainId, bytes32 _name, bool _allowZeroAddress) external view
            returns (address);
        function setAddress(uint64 _chainId, bytes32 _name, address _newAddress) external;
    }
}
