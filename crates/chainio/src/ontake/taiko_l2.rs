use alloy::{
    contract::Result as ContractResult, providers::Provider, rpc::types::Block, sol,
};
use alloy_sol_types::SolCall;
use tkb_primitives::{Fork, summary::Summary};

use self::ITaikoL2::{Anchored, ITaikoL2Errors, anchorV2Call};
use crate::{
    anchor::{AnchorError, decode_anchor_call},
    bind::contract_binding,
    map_contract_error,
};

contract_binding! {
    /// A wrapper over the Ontake `TaikoL2` anchor contract.
    TaikoL2(ITaikoL2::ITaikoL2Instance),
    errors: ITaikoL2Errors,
    fork: Some(Fork::Ontake),
}

/// The base fee of the next L2 block and the parent gas excess it was derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OntakeBaseFee {
    /// The base fee in wei.
    pub basefee: u128,
    /// The parent gas excess after this block.
    pub parent_gas_excess: u64,
}

impl<P: Provider + Clone> TaikoL2<P> {
    /// Calculates the base fee of the next block, anchored to `anchor_block_id`.
    pub async fn get_basefee(
        &self,
        anchor_block_id: u64,
        parent_gas_used: u32,
    ) -> ContractResult<OntakeBaseFee> {
        let res = self
            .0
            .getBasefee(anchor_block_id, parent_gas_used)
            .call()
            .await
            .map_err(map_contract_error::<ITaikoL2Errors>)?;

        Ok(OntakeBaseFee {
            basefee: res.basefee_.saturating_to::<u128>(),
            parent_gas_excess: res.parentGasExcess_,
        })
    }

    /// Returns the id of the last L1 block synced into L2.
    pub async fn last_synced_block(&self) -> ContractResult<u64> {
        self.0.lastSyncedBlock().call().await.map_err(map_contract_error::<ITaikoL2Errors>)
    }
}

/// Decode `anchorV2` calldata.
pub fn decode_anchor_tx_data(data: &[u8]) -> Result<anchorV2Call, AnchorError> {
    Ok(anchorV2Call::abi_decode(data)?)
}

/// Decode the `anchorV2` transaction of a full L2 block.
pub fn decode_anchor_tx(block: &Block) -> Result<anchorV2Call, AnchorError> {
    decode_anchor_call(block)
}

impl Summary for Anchored {
    fn summary(&self) -> String {
        format!("parent hash: {}, parent gas excess: {}", self.parentHash, self.parentGasExcess)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface ITaikoL2 {
        error EIP1559_INVALID_PARAMS();
        error L2_BASEFEE_MISMATCH();
        error L2_FORK_ERROR();
        error L2_INVALID_L1_CHAIN_ID();
        error L2_INVALID_L2_CHAIN_ID();
        error L2_INVALID_PARAM();
        error L2_INVALID_SENDER();
        error L2_PUBLIC_INPUT_HASH_MISMATCH();
        error L2_TOO_LATE();
        error RESOLVER_DENIED();
        error RESOLVER_INVALID_MANAGER();
        error RESOLVER_UNEXPECTED_CHAINID();
        error RESOLVER_ZERO_ADDR(uint64 chainId, bytes32 name);

        event Anchored(bytes32 parentHash, uint64 parentGasExcess);

        #[derive(Default)]
        struct BaseFeeConfig {
            uint8 adjustmentQuotient;
            uint8 sharingPctg;
            uint32 gasIssuancePerSecond;
            uint64 minGasExcess;
            uint32 maxGasIssuancePerBlock;
        }

        #[derive(Default)]
        struct Config {
            uint32 gasTargetPerL1Block;
            uint8 basefeeAdjustmentQuotient;
        }

        function GOLDEN_TOUCH_ADDRESS() external view returns (address);
        function addressManager() external view returns (address);
        function adjustExcess(uint64 _currGasExcess, uint64 _currGasTarget, uint64 _newGasTarget) external pure
            returns (uint64 newGasExcess_);
        function anchor(bytes32, bytes32 _l1StateRoot, uint64 _l1BlockId, uint32 _parentGasUsed) external;
        function anchorV2(uint64 _anchorBlockId, bytes32 _anchorStateRoot, uint32 _parentGasUsed, BaseFeeConfig memory _baseFeeConfig) external;
        function calculateBaseFee(BaseFeeConfig memory _baseFeeConfig, uint64 _blocktime, uint64 _parentGasExcess, uint32 _parentGasUsed) external pure
            returns (uint256 basefee_, uint64 parentGasExcess_);
        function getBasefee(uint64 _anchorBlockId, uint32 _parentGasUsed) external view
            returns (uint256 basefee_, uint64 parentGasExcess_);
        function getBlockHash(uint256 _blockId) external view returns (bytes32);
        function getConfig() external view returns (Config memory);
        function init(address _owner, address _rollupAddressManager, uint64 _l1ChainId, uint64 _initialGasExcess) external;
        function l1ChainId() external view returns (uint64);
        function lastSyncedBlock() external view returns (uint64);
        function ontakeForkHeight() external pure returns (uint64);
        function parentGasExcess() external view returns (uint64);
        function parentGasTarget() external view returns (uint64);
        function parentTimestamp() external view returns (uint64);
        function publicInputHash() external view returns (bytes32);
        function resolve(bytes32 _name, bool _allowZeroAddress) external view returns (address);
        function resolve(uint64 _chainId, bytes32 _name, bool _allowZeroAddress) external view
            returns (address);
        function skipFeeCheck() external pure returns (bool);
        function withdraw(address _token, address _to) external;
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, B256, Bytes, U256};
    use alloy_sol_types::SolValue;
    use serde_json::json;

    use super::*;
    use crate::test_utils::MockNode;

    #[test]
    fn anchor_v2_calldata() {
        let call = anchorV2Call {
            _anchorBlockId: 1_000,
            _anchorStateRoot: B256::repeat_byte(3),
            _parentGasUsed: 30_000,
            _baseFeeConfig: ITaikoL2::BaseFeeConfig {
                adjustmentQuotient: 8,
                sharingPctg: 75,
                gasIssuancePerSecond: 5_000_000,
                minGasExcess: 1_340_000_000,
                maxGasIssuancePerBlock: 600_000_000,
            },
        };

        let decoded = decode_anchor_tx_data(&call.abi_encode()).unwrap();
        assert_eq!(decoded._anchorBlockId, 1_000);
        assert_eq!(decoded._baseFeeConfig.sharingPctg, 75);

        let err = decode_anchor_tx_data(&[0u8; 4]).unwrap_err();
        assert!(matches!(err, AnchorError::Decode(_)));
    }

    #[tokio::test]
    async fn basefee() {
        let node = MockNode::start(|_, params| {
            let input: Bytes = serde_json::from_value(params[0]["input"].clone()).unwrap();
            assert_eq!(input[..4], ITaikoL2::getBasefeeCall::SELECTOR);
            Ok(json!(Bytes::from((U256::from(10_000_000u64), 42u64).abi_encode_params())))
        })
        .await;

        let l2 = TaikoL2::from_provider(Address::repeat_byte(0x02), node.provider());
        let fee = l2.get_basefee(10, 21_000).await.unwrap();
        assert_eq!(fee, OntakeBaseFee { basefee: 10_000_000, parent_gas_excess: 42 });
    }
}
