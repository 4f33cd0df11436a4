use alloy::{
    contract::Result as ContractResult, providers::Provider, rpc::types::TransactionRequest, sol,
};
use alloy_primitives::{Address, Bytes};
use tkb_codec::pacaya::{BatchParams, encode_wrapped_batch_params};
use tkb_primitives::{Fork, summary::Summary};

use self::ITaikoWrapper::{ForcedInclusionProcessed, ITaikoWrapperErrors};
use crate::{bind::contract_binding, iter::IterableEvent, map_contract_error};

contract_binding! {
    /// A wrapper over the Pacaya `TaikoWrapper` contract, which enforces forced inclusions in
    /// front of the inbox.
    TaikoWrapper(ITaikoWrapper::ITaikoWrapperInstance),
    errors: ITaikoWrapperErrors,
    fork: Some(Fork::Pacaya),
}

impl<P: Provider + Clone> TaikoWrapper<P> {
    /// Returns the address of the preconf router contract.
    pub async fn get_preconf_router(&self) -> ContractResult<Address> {
        self.0.preconfRouter().call().await.map_err(map_contract_error::<ITaikoWrapperErrors>)
    }

    /// Returns the address of the forced inclusion store.
    pub async fn get_forced_inclusion_store(&self) -> ContractResult<Address> {
        self.0
            .forcedInclusionStore()
            .call()
            .await
            .map_err(map_contract_error::<ITaikoWrapperErrors>)
    }

    /// Returns a [`TransactionRequest`] for `proposeBatch`, with the forced inclusion batch (if
    /// any) wrapped in front of the sequencer batch.
    pub fn propose_batch_request(
        &self,
        forced: Option<&BatchParams>,
        params: &BatchParams,
        tx_list: Bytes,
    ) -> TransactionRequest {
        let encoded = encode_wrapped_batch_params(forced, params);
        self.0.proposeBatch(encoded, tx_list).into_transaction_request()
    }
}

impl IterableEvent for ForcedInclusionProcessed {}

impl Summary for ForcedInclusionProcessed {
    fn summary(&self) -> String {
        let fi = &self.forcedInclusion;
        format!(
            "blob hash: {}, fee: {} gwei, created at batch: {}, blob offset: {}, blob size: {}",
            fi.blobHash, fi.feeInGwei, fi.createdAtBatchId, fi.blobByteOffset, fi.blobByteSize
        )
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface ITaikoWrapper {
        error FUNCTION_DISABLED();
        error InvalidBlobByteOffset();
        error InvalidBlobByteSize();
        error InvalidBlobCreatedIn();
        error InvalidBlobHash();
        error InvalidBlobHashesSize();
        error InvalidBlobParams();
        error InvalidBlockSize();
        error InvalidBlockTxs();
        error InvalidProposer();
        error InvalidSignalSlots();
        error InvalidTimeShift();
        error OldestForcedInclusionDue();

        event ForcedInclusionProcessed(ForcedInclusion forcedInclusion);

        #[derive(Default)]
        struct BatchInfo {
            bytes32 txsHash;
            BlockParams[] blocks;
            bytes32[] blobHashes;
            bytes32 extraData;
            address coinbase;
            uint64 proposedIn;
            uint64 blobCreatedIn;
            uint32 blobByteOffset;
            uint32 blobByteSize;
            uint32 gasLimit;
            uint96 baseFee;
            uint64 lastBlockId;
            uint64 lastBlockTimestamp;
            uint64 anchorBlockId;
            bytes32 anchorBlockHash;
            BaseFeeConfig baseFeeConfig;
        }

        #[derive(Default)]
        struct BlockParams {
            uint16 numTransactions;
            uint8 timeShift;
            bytes32[] signalSlots;
        }

        #[derive(Default)]
        struct BaseFeeConfig {
            uint8 adjustmentQuotient;
            uint8 sharingPctg;
            uint32 gasIssuancePerSecond;
            uint64 minGasExcess;
            uint32 maxGasIssuancePerBlock;
        }

        #[derive(Default)]
        struct BatchMetadata {
            bytes32 infoHash;
            address proposer;
            uint64 batchId;
            uint64 proposedAt;
        }

        #[derive(Default)]
        struct ForcedInclusion {
            bytes32 blobHash;
            uint64 feeInGwei;
            uint64 createdAtBatchId;
            uint32 blobByteOffset;
            uint32 blobByteSize;
            uint64 blobCreatedIn;
        }

        function MIN_TXS_PER_FORCED_INCLUSION() external view returns (uint16);
        function forcedInclusionStore() external view returns (address);
        function inbox() external view returns (address);
        function init(address _owner) external;
        function preconfRouter() external view returns (address);
        function proposeBatch(bytes memory _params, bytes memory _txList) external
            returns (BatchInfo memory, BatchMetadata memory);
    }
}
