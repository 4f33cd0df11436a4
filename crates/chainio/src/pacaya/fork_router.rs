use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use alloy_primitives::{Address, FixedBytes};
use tkb_primitives::Fork;

use self::IForkRouter::IForkRouterErrors;
use crate::{bind::contract_binding, map_contract_error};

contract_binding! {
    /// A wrapper over the `ForkRouter` contract, which routes inbox calls to the Ontake or the
    /// Pacaya implementation.
    ForkRouter(IForkRouter::IForkRouterInstance),
    errors: IForkRouterErrors,
    fork: Some(Fork::Pacaya),
}

impl<P: Provider + Clone> ForkRouter<P> {
    /// Returns the old and the new fork implementations.
    pub async fn get_forks(&self) -> ContractResult<(Address, Address)> {
        let old = self.0.oldFork().call().await.map_err(map_contract_error::<IForkRouterErrors>)?;
        let new = self.0.newFork().call().await.map_err(map_contract_error::<IForkRouterErrors>)?;
        Ok((old, new))
    }

    /// Returns true if calls with the given selector are routed to the old fork.
    pub async fn should_route_to_old_fork(&self, selector: [u8; 4]) -> ContractResult<bool> {
        self.0
            .shouldRouteToOldFork(FixedBytes(selector))
            .call()
            .await
            .map_err(map_contract_error::<IForkRouterErrors>)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IForkRouter {
        error InvalidParams();
        error ZeroForkAddress();

        function newFork() external view returns (address);
        function oldFork() external view returns (address);
        function shouldRouteToOldFork(bytes4) external pure returns (bool);
    }
}
