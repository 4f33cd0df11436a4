use alloy::{contract::Result as ContractResult, providers::Provider, rpc::types::Filter, sol};
use alloy_primitives::Address;
use alloy_sol_types::SolEvent;
use tkb_primitives::{Fork, summary::Summary};

use self::IPreconfWhitelist::{IPreconfWhitelistErrors, OperatorAdded, OperatorRemoved};
use crate::{bind::contract_binding, iter::IterableEvent, map_contract_error};

contract_binding! {
    /// A wrapper over the Pacaya `PreconfWhitelist` contract, which elects the preconfer of
    /// each epoch.
    PreconfWhitelist(IPreconfWhitelist::IPreconfWhitelistInstance),
    errors: IPreconfWhitelistErrors,
    fork: Some(Fork::Pacaya),
}

/// The registration of a whitelisted operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OperatorInfo {
    /// The timestamp the operator becomes eligible at.
    pub active_since: u32,
    /// The timestamp the operator stops being eligible at, or zero.
    pub inactive_since: u32,
    /// The index of the operator in the whitelist.
    pub index: u8,
    /// The address signing preconfirmations for the proposer.
    pub sequencer: Address,
}

impl<P: Provider + Clone> PreconfWhitelist<P> {
    /// Get the operator for the current epoch.
    pub async fn get_operator_for_current_epoch(&self) -> ContractResult<Address> {
        self.0
            .getOperatorForCurrentEpoch()
            .call()
            .await
            .map_err(map_contract_error::<IPreconfWhitelistErrors>)
    }

    /// Get the operator for the next epoch.
    pub async fn get_operator_for_next_epoch(&self) -> ContractResult<Address> {
        self.0
            .getOperatorForNextEpoch()
            .call()
            .await
            .map_err(map_contract_error::<IPreconfWhitelistErrors>)
    }

    /// Check if a proposer is active in the whitelist for the epoch starting at
    /// `epoch_timestamp`.
    ///
    /// Note: "active" in the contract just means that the operator is able to be selected as the
    /// sequencer, not that it is currently the sequencer.
    pub async fn is_operator_active(
        &self,
        proposer: Address,
        epoch_timestamp: u32,
    ) -> ContractResult<bool> {
        self.0
            .isOperatorActive(proposer, epoch_timestamp)
            .call()
            .await
            .map_err(map_contract_error::<IPreconfWhitelistErrors>)
    }

    /// Returns the registration of `proposer`. Unknown proposers have a zero sequencer.
    pub async fn get_operator(&self, proposer: Address) -> ContractResult<OperatorInfo> {
        let res = self
            .0
            .operators(proposer)
            .call()
            .await
            .map_err(map_contract_error::<IPreconfWhitelistErrors>)?;

        Ok(OperatorInfo {
            active_since: res.activeSince,
            inactive_since: res.inactiveSince,
            index: res.index,
            sequencer: res.sequencerAddress,
        })
    }

    /// Return a filter for both the [`OperatorAdded`] and [`OperatorRemoved`] events.
    pub fn operator_changed_filter(&self) -> Filter {
        Filter::new()
            .address(*self.0.address())
            .events([OperatorAdded::SIGNATURE, OperatorRemoved::SIGNATURE])
    }
}

impl IterableEvent for OperatorAdded {}

impl IterableEvent for OperatorRemoved {}

impl Summary for OperatorAdded {
    fn summary(&self) -> String {
        format!(
            "proposer: {}, sequencer: {}, active since: {}",
            self.proposer, self.sequencer, self.activeSince
        )
    }
}

impl Summary for OperatorRemoved {
    fn summary(&self) -> String {
        format!(
            "proposer: {}, sequencer: {}, inactive since: {}",
            self.proposer, self.sequencer, self.inactiveSince
        )
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IPreconfWhitelist {
        error InvalidOperatorAddress();
        error InvalidOperatorCount();
        error InvalidOperatorIndex();
        error OperatorAlreadyExists();
        error OperatorAlreadyRemoved();
        error OperatorNotAvailableYet();

        event Consolidated(uint8 previousCount, uint8 newCount, bool havingPerfectOperators);
        event OperatorAdded(address indexed proposer, address indexed sequencer, uint256 activeSince);
        event OperatorChangeDelaySet(uint8 delay);
        event OperatorRemoved(address indexed proposer, address indexed sequencer, uint256 inactiveSince);

        function addOperator(address _proposer, address _sequencer) external;
        function consolidate() external;
        function epochStartTimestamp(uint256 _offset) external view returns (uint32);
        function getOperatorCandidatesForCurrentEpoch() external view returns (address[] memory);
        function getOperatorCandidatesForNextEpoch() external view returns (address[] memory);
        function getOperatorForCurrentEpoch() external view returns (address);
        function getOperatorForNextEpoch() external view returns (address);
        function havingPerfectOperators() external view returns (bool);
        function init(address _owner, uint8 _operatorChangeDelay, uint8 _randomnessDelay) external;
        function isOperatorActive(address _proposer, uint32 _epochTimestamp) external view
            returns (bool);
        function operatorChangeDelay() external view returns (uint8);
        function operatorCount() external view returns (uint8);
        function operatorMapping(uint256 index) external view returns (address proposer);
        function operators(address proposer) external view
            returns (uint32 activeSince, uint32 inactiveSince, uint8 index, address sequencerAddress);
        function randomnessDelay() external view returns (uint8);
        function removeOperator(address _proposer, bool _effectiveImmediately) external;
        function removeOperator(uint256 _operatorIndex) external;
        function removeSelf() external;
        function setOperatorChangeDelay(uint8 _operatorChangeDelay) external;
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{B256, Bytes};
    use alloy_sol_types::{SolType, SolValue, sol_data};
    use serde_json::json;

    use super::*;
    use crate::test_utils::MockNode;

    #[tokio::test]
    async fn operator_registration() {
        let node = MockNode::start(|_, _| {
            let output = <(sol_data::Uint<32>, sol_data::Uint<32>, sol_data::Uint<8>, sol_data::Address)>::abi_encode_params(
                &(10u32, 0u32, 2u8, Address::repeat_byte(0x77)),
            );
            Ok(json!(Bytes::from(output)))
        })
        .await;

        let whitelist =
            PreconfWhitelist::from_provider(Address::repeat_byte(0x15), node.provider());
        let info = whitelist.get_operator(Address::repeat_byte(0x01)).await.unwrap();
        assert_eq!(info, OperatorInfo {
            active_since: 10,
            inactive_since: 0,
            index: 2,
            sequencer: Address::repeat_byte(0x77),
        });
    }

    #[tokio::test]
    async fn operator_changed_filter_matches_both_events() {
        let node = MockNode::start(|_, _| Ok(json!(null))).await;
        let whitelist =
            PreconfWhitelist::from_provider(Address::repeat_byte(0x15), node.provider());
        let filter = whitelist.operator_changed_filter();

        assert!(filter.topics[0].matches(&OperatorAdded::SIGNATURE_HASH));
        assert!(filter.topics[0].matches(&OperatorRemoved::SIGNATURE_HASH));
        assert!(!filter.topics[0].matches(&B256::ZERO));
    }
}
