use alloy::{
    contract::{Error as ContractError, Result as ContractResult},
    providers::Provider,
    sol,
    transports::TransportErrorKind,
};
use alloy_primitives::{Address, U256};
use tkb_primitives::Fork;
use tracing::{debug, error};

use self::ITaikoToken::ITaikoTokenErrors;
use crate::{bind::contract_binding, map_contract_error};

contract_binding! {
    /// A wrapper over the `TaikoToken` contract, the bond token of the protocol.
    TaikoToken(ITaikoToken::ITaikoTokenInstance),
    errors: ITaikoTokenErrors,
    fork: Some(Fork::Pacaya),
}

impl<P: Provider + Clone> TaikoToken<P> {
    /// Check if the spender has sufficient allowance for TAIKO tokens and approve if needed.
    /// Uses a large approval amount to avoid frequent re-approvals.
    ///
    /// The provider must be able to sign for `operator`.
    pub async fn check_and_approve(
        &self,
        spender: Address,
        min_allowance: U256,
        operator: Address,
    ) -> ContractResult<()> {
        let allowance = self
            .0
            .allowance(operator, spender)
            .call()
            .await
            .map_err(map_contract_error::<ITaikoTokenErrors>)?;

        if allowance >= min_allowance {
            return Ok(());
        }

        debug!(%operator, %spender, %allowance, "Approving spender to spend $TAIKO");

        let pending = self
            .0
            .approve(spender, U256::MAX)
            .from(operator)
            .send()
            .await
            .map_err(map_contract_error::<ITaikoTokenErrors>)?;
        let receipt = pending.get_receipt().await?;

        if !receipt.status() {
            let tx = receipt.transaction_hash;
            error!(%operator, %spender, %tx, "Failed to approve spender to spend $TAIKO");
            return Err(ContractError::TransportError(TransportErrorKind::custom_str(
                "failed to approve spender to spend $TAIKO",
            )));
        }

        debug!(%operator, %spender, "Approved spender to spend infinite $TAIKO");
        Ok(())
    }

    /// Returns the amount of tokens owned by an account.
    pub async fn balance_of(&self, account: Address) -> ContractResult<U256> {
        self.0.balanceOf(account).call().await.map_err(map_contract_error::<ITaikoTokenErrors>)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface ITaikoToken {
        error TT_INVALID_PARAM();

        event Approval(address indexed owner, address indexed spender, uint256 value);
        event Transfer(address indexed from, address indexed to, uint256 value);

        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
        function balanceOf(address account) external view returns (uint256);
        function decimals() external view returns (uint8);
        function symbol() external view returns (string memory);
        function totalSupply() external view returns (uint256);
        function transfer(address to, uint256 amount) external returns (bool);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::Bytes;
    use alloy_sol_types::{SolCall, SolValue};
    use serde_json::json;

    use super::*;
    use crate::test_utils::MockNode;

    #[tokio::test]
    async fn sufficient_allowance_sends_nothing() {
        let node = MockNode::start(|method, params| {
            assert_eq!(method, "eth_call", "no transaction must be sent");
            let input: Bytes = serde_json::from_value(params[0]["input"].clone()).unwrap();
            assert_eq!(input[..4], ITaikoToken::allowanceCall::SELECTOR);
            Ok(json!(Bytes::from(U256::from(1_000).abi_encode())))
        })
        .await;

        let token = TaikoToken::from_provider(Address::repeat_byte(0x18), node.provider());
        token
            .check_and_approve(Address::repeat_byte(1), U256::from(1_000), Address::repeat_byte(2))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn balance() {
        let node = MockNode::start(|_, _| Ok(json!(Bytes::from(U256::from(42).abi_encode()))))
            .await;
        let token = TaikoToken::from_provider(Address::repeat_byte(0x18), node.provider());
        assert_eq!(token.balance_of(Address::ZERO).await.unwrap(), U256::from(42));
    }
}
