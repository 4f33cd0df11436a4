use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use alloy_primitives::{Address, U256};
use tkb_primitives::Fork;

use self::IResolverBase::IResolverBaseErrors;
use crate::{bind::contract_binding, map_contract_error, ontake::address_manager::name_key};

contract_binding! {
    /// A wrapper over a Pacaya resolver (`DefaultResolver`), the successor of the Ontake
    /// `AddressManager`.
    ResolverBase(IResolverBase::IResolverBaseInstance),
    errors: IResolverBaseErrors,
    fork: Some(Fork::Pacaya),
}

impl<P: Provider + Clone> ResolverBase<P> {
    /// Resolves `name` on `chain_id`. Fails with `RESOLVED_TO_ZERO_ADDRESS` for unknown names
    /// unless `allow_zero_address` is set.
    pub async fn resolve(
        &self,
        chain_id: u64,
        name: &str,
        allow_zero_address: bool,
    ) -> ContractResult<Address> {
        self.0
            .resolve(U256::from(chain_id), name_key(name), allow_zero_address)
            .call()
            .await
            .map_err(map_contract_error::<IResolverBaseErrors>)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IResolverBase {
        error RESOLVED_TO_ZERO_ADDRESS();

        function resolve(uint256 _chainId, bytes32 _name, bool _allowZeroAddress) external view
            returns (address addr_);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Bytes;
    use alloy_sol_types::SolError;
    use serde_json::json;

    use super::*;
    use crate::test_utils::MockNode;

    #[tokio::test]
    async fn unknown_names_revert() {
        let node = MockNode::start(|_, _| {
            let data = Bytes::from(IResolverBase::RESOLVED_TO_ZERO_ADDRESS {}.abi_encode());
            Err(json!({"code": 3, "message": "execution reverted", "data": data}))
        })
        .await;

        let resolver = ResolverBase::from_provider(Address::repeat_byte(0x17), node.provider());
        let err = resolver.resolve(1, "unknown", false).await.unwrap_err();
        assert!(err.to_string().contains("RESOLVED_TO_ZERO_ADDRESS"), "{err}");
    }
}
