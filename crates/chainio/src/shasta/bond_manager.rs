use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use alloy_primitives::{Address, U256};
use tkb_primitives::{Fork, summary::Summary};

use self::IBondManager::{
    BondDeposited, BondInstructionProcessed, BondWithdrawn, IBondManagerErrors,
    WithdrawalRequested,
};
use crate::{bind::contract_binding, map_contract_error};

contract_binding! {
    /// A wrapper over the Shasta L2 `BondManager` contract, which holds proposer and prover
    /// bonds and settles the bond instructions relayed from L1.
    BondManager(IBondManager::IBondManagerInstance),
    errors: IBondManagerErrors,
    fork: Some(Fork::Shasta),
}

/// The bond of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bond {
    /// The bonded amount.
    pub balance: U256,
    /// When a withdrawal was requested, or zero if none is pending.
    pub withdrawal_requested_at: u64,
}

impl<P: Provider + Clone> BondManager<P> {
    /// Retrieves the bond of `account`, including any pending withdrawal request.
    pub async fn get_bond(&self, account: Address) -> ContractResult<Bond> {
        let res = self
            .0
            .bond(account)
            .call()
            .await
            .map_err(map_contract_error::<IBondManagerErrors>)?;

        Ok(Bond {
            balance: res.balance,
            withdrawal_requested_at: res.withdrawalRequestedAt.to::<u64>(),
        })
    }

    /// Retrieves the bond balance of `account`.
    pub async fn get_bond_balance(&self, account: Address) -> ContractResult<U256> {
        self.0
            .getBondBalance(account)
            .call()
            .await
            .map_err(map_contract_error::<IBondManagerErrors>)
    }

    /// Returns true if `account` would keep the minimum bond after locking `additional_bond`.
    pub async fn has_sufficient_bond(
        &self,
        account: Address,
        additional_bond: U256,
    ) -> ContractResult<bool> {
        self.0
            .hasSufficientBond(account, additional_bond)
            .call()
            .await
            .map_err(map_contract_error::<IBondManagerErrors>)
    }

    /// Returns the minimum bond an account must keep.
    pub async fn min_bond(&self) -> ContractResult<U256> {
        self.0.minBond().call().await.map_err(map_contract_error::<IBondManagerErrors>)
    }

    /// Returns the delay between a withdrawal request and the withdrawal, in seconds.
    pub async fn withdrawal_delay(&self) -> ContractResult<u64> {
        let delay = self
            .0
            .withdrawalDelay()
            .call()
            .await
            .map_err(map_contract_error::<IBondManagerErrors>)?;
        Ok(delay.to::<u64>())
    }
}

impl Summary for BondDeposited {
    fn summary(&self) -> String {
        format!(
            "depositor: {}, recipient: {}, amount: {}",
            self.depositor, self.recipient, self.amount
        )
    }
}

impl Summary for BondWithdrawn {
    fn summary(&self) -> String {
        format!("account: {}, amount: {}", self.account, self.amount)
    }
}

impl Summary for WithdrawalRequested {
    fn summary(&self) -> String {
        format!("account: {}, withdrawable at: {}", self.account, self.withdrawableAt)
    }
}

impl Summary for BondInstructionProcessed {
    fn summary(&self) -> String {
        format!(
            "signal: {}, proposal id: {}, bond type: {}, payer: {}, payee: {}, debited: {}",
            self.signal,
            self.instruction.proposalId,
            self.instruction.bondType,
            self.instruction.payer,
            self.instruction.payee,
            self.debitedAmount,
        )
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IBondManager {
        error InvalidAddress();
        error InvalidBondType();
        error InvalidL1ChainId();
        error MustMaintainMinBond();
        error NoBondInstruction();
        error NoBondToWithdraw();
        error NoWithdrawalRequested();
        error SignalAlreadyProcessed();
        error WithdrawalAlreadyRequested();

        event BondCredited(address indexed account, uint256 amount);
        event BondDebited(address indexed account, uint256 amount);
        event BondDeposited(address indexed depositor, address indexed recipient, uint256 amount);
        event BondInstructionProcessed(bytes32 indexed signal, BondInstruction instruction, uint256 debitedAmount);
        event BondWithdrawn(address indexed account, uint256 amount);
        event WithdrawalCancelled(address indexed account);
        event WithdrawalRequested(address indexed account, uint256 withdrawableAt);

        #[derive(Default)]
        struct BondInstruction {
            uint48 proposalId;
            uint8 bondType;
            address payer;
            address payee;
        }

        function bond(address account) external view
            returns (uint256 balance, uint48 withdrawalRequestedAt);
        function bondOperator() external view returns (address);
        function bondToken() external view returns (address);
        function cancelWithdrawal() external;
        function creditBond(address _address, uint256 _bond) external;
        function debitBond(address _address, uint256 _bond) external
            returns (uint256 amountDebited_);
        function deposit(uint256 _amount) external;
        function depositTo(address _recipient, uint256 _amount) external;
        function getBondBalance(address _address) external view returns (uint256);
        function hasSufficientBond(address _address, uint256 _additionalBond) external view
            returns (bool);
        function init(address _owner) external;
        function l1ChainId() external view returns (uint64);
        function l1Inbox() external view returns (address);
        function livenessBond() external view returns (uint256);
        function minBond() external view returns (uint256);
        function processBondInstruction(BondInstruction memory _instruction, bytes memory _proof) external;
        function processedSignals(bytes32 signal) external view returns (bool processed);
        function requestWithdrawal() external;
        function signalService() external view returns (address);
        function withdraw(address _to, uint256 _amount) external;
        function withdrawalDelay() external view returns (uint48);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Bytes, aliases::U48};
    use alloy_sol_types::{SolCall, SolError};
    use serde_json::json;

    use super::*;
    use crate::test_utils::MockNode;

    const MANAGER: Address = Address::repeat_byte(0x50);

    #[tokio::test]
    async fn bond_and_sufficiency() {
        let node = MockNode::start(|_, params| {
            let input: Bytes = serde_json::from_value(params[0]["input"].clone()).unwrap();
            let output = match <[u8; 4]>::try_from(&input[..4]).unwrap() {
                IBondManager::bondCall::SELECTOR => {
                    IBondManager::bondCall::abi_encode_returns(&IBondManager::bondReturn {
                        balance: U256::from(500),
                        withdrawalRequestedAt: U48::from(1_000u64),
                    })
                }
                IBondManager::hasSufficientBondCall::SELECTOR => {
                    let call = IBondManager::hasSufficientBondCall::abi_decode(&input).unwrap();
                    IBondManager::hasSufficientBondCall::abi_encode_returns(
                        &(call._additionalBond <= U256::from(100)),
                    )
                }
                _ => unreachable!(),
            };
            Ok(json!(Bytes::from(output)))
        })
        .await;

        let manager = BondManager::from_provider(MANAGER, node.provider());
        let bond = manager.get_bond(Address::repeat_byte(1)).await.unwrap();
        assert_eq!(bond, Bond { balance: U256::from(500), withdrawal_requested_at: 1_000 });

        assert!(manager.has_sufficient_bond(Address::ZERO, U256::from(100)).await.unwrap());
        assert!(!manager.has_sufficient_bond(Address::ZERO, U256::from(101)).await.unwrap());
    }

    #[tokio::test]
    async fn reverts_are_decoded() {
        let node = MockNode::start(|_, _| {
            let data = Bytes::from(IBondManager::NoWithdrawalRequested {}.abi_encode());
            Err(json!({"code": 3, "message": "execution reverted", "data": data}))
        })
        .await;

        let manager = BondManager::from_provider(MANAGER, node.provider());
        let err = manager.min_bond().await.unwrap_err();
        assert!(err.to_string().contains("NoWithdrawalRequested"), "{err}");
    }

    #[test]
    fn withdrawal_requested_summary() {
        let event = WithdrawalRequested {
            account: Address::repeat_byte(2),
            withdrawableAt: U256::from(42),
        };
        assert!(event.summary().ends_with("withdrawable at: 42"));
    }
}
