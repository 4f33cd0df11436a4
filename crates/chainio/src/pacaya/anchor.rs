use alloy::{
    contract::Result as ContractResult, providers::Provider, rpc::types::Block, sol,
};
use alloy_primitives::{B256, U256};
use alloy_sol_types::SolCall;
use tkb_primitives::Fork;

use self::ITaikoAnchor::{BaseFeeConfig, ITaikoAnchorErrors, anchorV3Call};
use crate::{
    anchor::{AnchorError, decode_anchor_call},
    bind::contract_binding,
    map_contract_error,
};

contract_binding! {
    /// A wrapper over the Pacaya L2 `TaikoAnchor` contract.
    TaikoAnchor(ITaikoAnchor::ITaikoAnchorInstance),
    errors: ITaikoAnchorErrors,
    fork: Some(Fork::Pacaya),
}

/// Data structure returned by `getBasefeeV2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseFeeResult {
    /// The calculated EIP-1559 base fee per gas.
    pub base_fee: U256,
    /// The new gas target value.
    pub new_gas_target: u64,
    /// The new gas excess value.
    pub new_gas_excess: u64,
}

impl<P: Provider + Clone> TaikoAnchor<P> {
    /// Calculates the base fee and gas excess of a block with the given EIP-1559
    /// configuration.
    pub async fn get_base_fee_v2(
        &self,
        parent_gas_used: u32,
        block_timestamp: u64,
        base_fee_config: BaseFeeConfig,
    ) -> ContractResult<BaseFeeResult> {
        let data = self
            .0
            .getBasefeeV2(parent_gas_used, block_timestamp, base_fee_config)
            .call()
            .await
            .map_err(map_contract_error::<ITaikoAnchorErrors>)?;

        Ok(BaseFeeResult {
            base_fee: data.basefee_,
            new_gas_target: data.newGasTarget_,
            new_gas_excess: data.newGasExcess_,
        })
    }

    /// Returns the id of the last L1 block synced into L2.
    pub async fn last_synced_block(&self) -> ContractResult<u64> {
        self.0.lastSyncedBlock().call().await.map_err(map_contract_error::<ITaikoAnchorErrors>)
    }
}

// Same type, different namespace
impl From<super::inbox::ITaikoInbox::BaseFeeConfig> for BaseFeeConfig {
    fn from(config: super::inbox::ITaikoInbox::BaseFeeConfig) -> Self {
        Self {
            adjustmentQuotient: config.adjustmentQuotient,
            sharingPctg: config.sharingPctg,
            gasIssuancePerSecond: config.gasIssuancePerSecond,
            minGasExcess: config.minGasExcess,
            maxGasIssuancePerBlock: config.maxGasIssuancePerBlock,
        }
    }
}

/// The inputs of an `anchorV3` transaction.
#[derive(Debug, Clone)]
pub struct AnchorV3Input {
    /// Anchor block number
    pub anchor_block_id: u64,
    /// Anchor block state root
    pub anchor_state_root: B256,
    /// Parent L2 block gas used
    pub parent_gas_used: u32,
    /// L2 base fee configuration
    pub base_fee_config: BaseFeeConfig,
    /// Signal slots
    pub signal_slots: Vec<B256>,
}

impl From<anchorV3Call> for AnchorV3Input {
    fn from(anchor: anchorV3Call) -> Self {
        Self {
            anchor_block_id: anchor._anchorBlockId,
            anchor_state_root: anchor._anchorStateRoot,
            parent_gas_used: anchor._parentGasUsed,
            base_fee_config: anchor._baseFeeConfig,
            signal_slots: anchor._signalSlots,
        }
    }
}

impl From<AnchorV3Input> for anchorV3Call {
    fn from(value: AnchorV3Input) -> Self {
        Self {
            _anchorBlockId: value.anchor_block_id,
            _anchorStateRoot: value.anchor_state_root,
            _parentGasUsed: value.parent_gas_used,
            _baseFeeConfig: value.base_fee_config,
            _signalSlots: value.signal_slots,
        }
    }
}

/// Decode `anchorV3` calldata.
pub fn decode_anchor_tx_data(data: &[u8]) -> Result<AnchorV3Input, AnchorError> {
    Ok(anchorV3Call::abi_decode(data)?.into())
}

/// Decode the `anchorV3` transaction of a full L2 block.
///
/// Returns an error if:
/// - the block is empty.
/// - the first transaction in the block is not from the golden touch account.
/// - the transaction data cannot be decoded properly.
pub fn decode_anchor_tx(block: &Block) -> Result<AnchorV3Input, AnchorError> {
    decode_anchor_call::<anchorV3Call>(block).map(Into::into)
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface ITaikoAnchor {
        error L2_BASEFEE_MISMATCH();
        error L2_DEPRECATED_METHOD();
        error L2_FORK_ERROR();
        error L2_INVALID_L1_CHAIN_ID();
        error L2_INVALID_L2_CHAIN_ID();
        error L2_INVALID_SENDER();
        error L2_PUBLIC_INPUT_HASH_MISMATCH();
        error L2_TOO_LATE();

        event Anchored(bytes32 parentHash, uint64 parentGasExcess);
        event EIP1559Update(uint64 oldGasTarget, uint64 newGasTarget, uint64 oldGasExcess, uint64 newGasExcess, uint256 basefee);

        #[derive(Default)]
        struct BaseFeeConfig {
            uint8 adjustmentQuotient;
            uint8 sharingPctg;
            uint32 gasIssuancePerSecond;
            uint64 minGasExcess;
            uint32 maxGasIssuancePerBlock;
        }

        function GOLDEN_TOUCH_ADDRESS() external view returns (address);
        function adjustExcess(uint64 _currGasExcess, uint64 _currGasTarget, uint64 _newGasTarget) external pure
            returns (uint64 newGasExcess_);
        function anchor(bytes32 _l1BlockHash, bytes32 _l1StateRoot, uint64 _l1BlockId, uint32 _parentGasUsed) external;
        function anchorV2(uint64 _anchorBlockId, bytes32 _anchorStateRoot, uint32 _parentGasUsed, BaseFeeConfig memory _baseFeeConfig) external;
        function anchorV3(uint64 _anchorBlockId, bytes32 _anchorStateRoot, uint32 _parentGasUsed, BaseFeeConfig memory _baseFeeConfig, bytes32[] memory _signalSlots) external;
        function calculateBaseFee(BaseFeeConfig memory _baseFeeConfig, uint64 _blocktime, uint64 _parentGasExcess, uint32 _parentGasUsed) external pure
            returns (uint256 basefee_, uint64 parentGasExcess_);
        function getBasefee(uint64 _anchorBlockId, uint32 _parentGasUsed) external pure
            returns (uint256 basefee_, uint64 parentGasExcess_);
        function getBasefeeV2(uint32 _parentGasUsed, uint64 _blockTimestamp, BaseFeeConfig memory _baseFeeConfig) external view
            returns (uint256 basefee_, uint64 newGasTarget_, uint64 newGasExcess_);
        function getBlockHash(uint256 _blockId) external view returns (bytes32);
        function init(address _owner, uint64 _l1ChainId, uint64 _initialGasExcess) external;
        function isOnL1() external pure returns (bool);
        function l1ChainId() external view returns (uint64);
        function lastSyncedBlock() external view returns (uint64);
        function pacayaForkHeight() external view returns (uint64);
        function parentGasExcess() external view returns (uint64);
        function parentGasTarget() external view returns (uint64);
        function parentTimestamp() external view returns (uint64);
        function publicInputHash() external view returns (bytes32);
        function signalService() external view returns (address);
        function skipFeeCheck() external pure returns (bool);
        function withdraw(address _token, address _to) external;
    }
}
