use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use tkb_primitives::Fork;

use self::ITierProvider::{ITierProviderErrors, Tier};
use crate::{bind::contract_binding, map_contract_error};

contract_binding! {
    /// A wrapper over an Ontake tier provider (`TierProviderV2`, `DevnetTierProvider`, ...).
    TierProvider(ITierProvider::ITierProviderInstance),
    errors: ITierProviderErrors,
    fork: Some(Fork::Ontake),
}

impl<P: Provider + Clone> TierProvider<P> {
    /// Returns every tier the provider supports, keyed by tier id.
    pub async fn get_tiers(&self) -> ContractResult<Vec<(u16, Tier)>> {
        let ids =
            self.0.getTierIds().call().await.map_err(map_contract_error::<ITierProviderErrors>)?;

        let mut tiers = Vec::with_capacity(ids.len());
        for id in ids {
            let tier =
                self.0.getTier(id).call().await.map_err(map_contract_error::<ITierProviderErrors>)?;
            tiers.push((id, tier));
        }

        Ok(tiers)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface ITierProvider {
        error TIER_NOT_FOUND();

        #[derive(Default)]
        struct Tier {
            bytes32 verifierName;
            uint96 validityBond;
            uint96 contestBond;
            uint24 cooldownWindow;
            uint16 provingWindow;
            uint8 maxBlocksToVerifyPerProof;
        }

        function BOND_UNIT() external view returns (uint96);
        function GRACE_PERIOD() external view returns (uint16);
        function getMinTier(address, uint256) external pure returns (uint16);
        function getProvider(uint256) external view returns (address);
        function getTier(uint16 _tierId) external pure returns (Tier memory);
        function getTierIds() external pure returns (uint16[] memory tiers_);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, B256, Bytes};
    use alloy_sol_types::{SolCall, SolError, SolValue};
    use serde_json::json;

    use super::*;
    use crate::test_utils::MockNode;

    #[tokio::test]
    async fn get_tiers() {
        let node = MockNode::start(|_, params| {
            let input: Bytes = serde_json::from_value(params[0]["input"].clone()).unwrap();
            let output = match <[u8; 4]>::try_from(&input[..4]).unwrap() {
                ITierProvider::getTierIdsCall::SELECTOR => vec![0u16, 200].abi_encode(),
                ITierProvider::getTierCall::SELECTOR => {
                    let call = ITierProvider::getTierCall::abi_decode(&input).unwrap();
                    if call._tierId == 200 {
                        let data = ITierProvider::TIER_NOT_FOUND {}.abi_encode();
                        return Err(json!({"code": 3, "message": "execution reverted", "data": Bytes::from(data)}));
                    }
                    Tier {
                        verifierName: B256::repeat_byte(1),
                        provingWindow: 60,
                        ..Default::default()
                    }
                        .abi_encode()
                }
                _ => unreachable!(),
            };
            Ok(json!(Bytes::from(output)))
        })
        .await;

        let provider = TierProvider::from_provider(Address::repeat_byte(0x05), node.provider());
        let err = provider.get_tiers().await.unwrap_err();
        assert!(err.to_string().contains("TIER_NOT_FOUND"), "{err}");

        let tier = provider.getTier(0).call().await.unwrap();
        assert_eq!(tier.provingWindow, 60);
    }
}
