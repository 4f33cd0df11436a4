use alloy::{
    contract::Result as ContractResult, providers::Provider, rpc::types::TransactionRequest, sol,
};
use alloy_primitives::{Address, B256, Bytes, U256};
use tkb_codec::pacaya::{BatchParams, encode_batch_params};
use tkb_primitives::{Fork, summary::Summary};

use self::ITaikoInbox::{
    Batch, BatchProposed, BatchesProved, BatchesVerified, Config, ITaikoInboxErrors, Stats1,
    Stats2, TransitionState,
};
use crate::{
    bind::{Binding, DecodedLog, FilterOpts, Topics, contract_binding},
    iter::{IterableEvent, IteratorError, ensure_consecutive},
    map_contract_error,
};

contract_binding! {
    /// A wrapper over the Pacaya `TaikoInbox` rollup contract.
    TaikoInbox(ITaikoInbox::ITaikoInboxInstance),
    errors: ITaikoInboxErrors,
    fork: Some(Fork::Pacaya),
}

/// A transition together with the batch and L2 block it belongs to.
#[derive(Debug, Clone)]
pub struct BatchTransition {
    /// The batch id.
    pub batch_id: u64,
    /// The id of the last L2 block of the batch.
    pub block_id: u64,
    /// The transition state.
    pub transition: TransitionState,
}

impl<P: Provider + Clone> TaikoInbox<P> {
    /// Retrieves the current protocol configuration.
    pub async fn get_pacaya_config(&self) -> ContractResult<Config> {
        self.0.pacayaConfig().call().await.map_err(map_contract_error::<ITaikoInboxErrors>)
    }

    /// Retrieves the first group of rollup stats.
    pub async fn get_stats1(&self) -> ContractResult<Stats1> {
        self.0.getStats1().call().await.map_err(map_contract_error::<ITaikoInboxErrors>)
    }

    /// Retrieves the second group of rollup stats, including the number of batches.
    pub async fn get_stats2(&self) -> ContractResult<Stats2> {
        self.0.getStats2().call().await.map_err(map_contract_error::<ITaikoInboxErrors>)
    }

    /// Retrieves a batch by its id.
    pub async fn get_batch(&self, batch_id: u64) -> ContractResult<Batch> {
        self.0.getBatch(batch_id).call().await.map_err(map_contract_error::<ITaikoInboxErrors>)
    }

    /// Retrieves the meta hash of the latest batch, which the next proposal must reference.
    ///
    /// Fails if the inbox holds no batch at all, not even the genesis one.
    pub async fn get_parent_meta_hash(&self) -> ContractResult<B256> {
        // Two round trips: the batch id comes from the stats.
        let stats2 = self.get_stats2().await?;
        let Some(parent_id) = stats2.numBatches.checked_sub(1) else {
            return Err(alloy_sol_types::Error::custom("inbox has no batches, no parent").into());
        };

        let batch = self.get_batch(parent_id).await?;
        Ok(batch.metaHash)
    }

    /// Retrieves the transition of the last verified batch.
    pub async fn get_last_verified_transition(&self) -> ContractResult<BatchTransition> {
        let res = self
            .0
            .getLastVerifiedTransition()
            .call()
            .await
            .map_err(map_contract_error::<ITaikoInboxErrors>)?;

        Ok(BatchTransition { batch_id: res.batchId_, block_id: res.blockId_, transition: res.ts_ })
    }

    /// Retrieves the bond balance of `user`.
    pub async fn bond_balance_of(&self, user: Address) -> ContractResult<U256> {
        self.0.bondBalanceOf(user).call().await.map_err(map_contract_error::<ITaikoInboxErrors>)
    }

    /// Fetch the `BatchProposed` events of a range, checking that their batch ids are
    /// consecutive.
    pub async fn filter_batch_proposed(
        &self,
        opts: &FilterOpts,
    ) -> Result<Vec<DecodedLog<BatchProposed>>, IteratorError> {
        let logs = self
            .filterer()
            .filter::<BatchProposed>(opts, &Topics::any())
            .await?
            .collect::<Result<Vec<_>, _>>()?;

        ensure_consecutive(&logs)?;
        Ok(logs)
    }

    /// Returns a [`TransactionRequest`] for `proposeBatch`, sent to the inbox directly.
    pub fn propose_batch_request(
        &self,
        params: &BatchParams,
        tx_list: Bytes,
    ) -> TransactionRequest {
        self.0.proposeBatch(encode_batch_params(params), tx_list).into_transaction_request()
    }
}

impl IterableEvent for BatchProposed {
    fn sequence_id(&self) -> Option<u64> {
        Some(self.meta.batchId)
    }
}

impl IterableEvent for BatchesProved {}

impl IterableEvent for BatchesVerified {}

impl Summary for BatchProposed {
    fn summary(&self) -> String {
        let last_block_ts = self.info.lastBlockTimestamp;
        let total_shift = self.info.blocks.iter().map(|b| u64::from(b.timeShift)).sum::<u64>();
        let first_block_ts = last_block_ts.saturating_sub(total_shift);

        format!(
            "batch id: {}, proposer: {}, coinbase: {}, blobs: {}, proposed in: {}, blocks: {}, first block ts: {}, last block ts: {}, last block id: {}, anchor block id: {}, tx list: {} bytes",
            self.meta.batchId,
            self.meta.proposer,
            self.info.coinbase,
            self.info.blobHashes.len(),
            self.info.proposedIn,
            self.info.blocks.len(),
            first_block_ts,
            last_block_ts,
            self.info.lastBlockId,
            self.info.anchorBlockId,
            self.txList.len(),
        )
    }
}

impl Summary for BatchesProved {
    fn summary(&self) -> String {
        format!(
            "verifier: {}, batch ids: {:?}, block hashes: {:?}",
            self.verifier,
            self.batchIds,
            self.transitions.iter().map(|t| t.blockHash).collect::<Vec<_>>(),
        )
    }
}

impl Summary for BatchesVerified {
    fn summary(&self) -> String {
        format!("batch id: {}, block hash: {}", self.batchId, self.blockHash)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface ITaikoInbox {
        error AnchorBlockIdSmallerThanParent();
        error AnchorBlockIdTooLarge();
        error AnchorBlockIdTooSmall();
        error ArraySizesMismatch();
        error BatchNotFound();
        error BatchVerified();
        error BeyondCurrentFork();
        error BlobNotFound();
        error BlobNotSpecified();
        error BlockNotFound();
        error CustomProposerMissing();
        error CustomProposerNotAllowed();
        error EtherNotPaidAsBond();
        error FUNCTION_DISABLED();
        error FirstBlockTimeShiftNotZero();
        error ForkNotActivated();
        error InsufficientBond();
        error InvalidBlobCreatedIn();
        error InvalidBlobParams();
        error InvalidGenesisBlockHash();
        error InvalidParams();
        error InvalidProofType();
        error InvalidTransitionBlockHash();
        error InvalidTransitionParentHash();
        error InvalidTransitionStateRoot();
        error MetaHashMismatch();
        error MsgValueNotZero();
        error NoBlocksToProve();
        error NotFirstProposal();
        error NotInboxWrapper();
        error ParentMetaHashMismatch();
        error ProposeWithProofModeDisabled();
        error ProposeWithProofModeEnabled();
        error RollbackNotAllowed();
        error SameTransition();
        error SignalNotSent();
        error TimestampSmallerThanParent();
        error TimestampTooLarge();
        error TimestampTooSmall();
        error TooManyBatches();
        error TooManyBlocks();
        error TooManyConflictingProofs();
        error TooManySignals();
        error TransitionNotFound();
        error ZeroAnchorBlockHash();

        event BatchProposed(BatchInfo info, BatchMetadata meta, bytes txList);
        event BatchesProved(address verifier, uint64[] batchIds, Transition[] transitions);
        event BatchesRollbacked(uint64 startId, uint64 endId);
        event BatchesVerified(uint64 batchId, bytes32 blockHash);
        event BondCredited(address indexed user, uint256 amount);
        event BondDebited(address indexed user, uint256 amount);
        event BondDeposited(address indexed user, uint256 amount);
        event BondWithdrawn(address indexed user, uint256 amount);
        event ConflictingProof(uint64 batchId, TransitionState oldTran, Transition newTran);
        event Stats1Updated(Stats1 stats1);
        event Stats2Updated(Stats2 stats2);

        #[derive(Default)]
        struct Batch {
            bytes32 metaHash;
            uint64 lastBlockId;
            uint96 reserved3;
            uint96 livenessBond;
            uint64 batchId;
            uint64 lastBlockTimestamp;
            uint64 anchorBlockId;
            uint24 nextTransitionId;
            uint8 finalisingTransitionIndex;
            uint24 verifiedTransitionId;
        }

        #[derive(Default)]
        struct TransitionState {
            bytes32 parentHash;
            bytes32 blockHash;
            bytes32 stateRoot;
            uint16 proofType;
            address bondReceiver;
            uint48 createdAt;
        }

        #[derive(Default)]
        struct Stats1 {
            uint64 genesisHeight;
            uint64 verificationStreakStartedAt;
            uint64 lastSyncedBatchId;
            uint64 lastSyncedAt;
        }

        #[derive(Default)]
        struct Stats2 {
            uint64 numBatches;
            uint64 lastVerifiedBatchId;
            bool proposeWithProofMode;
            uint56 lastProposedIn;
            uint64 _reserved2;
        }

        #[derive(Default)]
        struct Config {
            uint64 chainId;
            uint64 maxUnverifiedBatches;
            uint64 batchRingBufferSize;
            uint64 maxBatchesToVerify;
            uint32 blockMaxGasLimit;
            uint96 livenessBondBase;
            uint96 livenessBondPerBlock;
            uint8 stateRootSyncInternal;
            uint64 maxAnchorHeightOffset;
            BaseFeeConfig baseFeeConfig;
            uint24 provingWindow;
            uint24 cooldownWindow;
            uint8 maxSignalsToReceive;
            uint16 maxBlocksPerBatch;
            ForkHeights forkHeights;
            uint64 maxVerificationDelay;
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
        struct ForkHeights {
            uint64 ontake;
            uint64 pacaya;
            uint64 shasta;
            uint64 unzen;
        }

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
        struct BatchMetadata {
            bytes32 infoHash;
            address proposer;
            uint64 batchId;
            uint64 proposedAt;
        }

        #[derive(Default)]
        struct Transition {
            bytes32 parentHash;
            bytes32 blockHash;
            bytes32 stateRoot;
        }

        function bondBalanceOf(address _user) external view returns (uint256);
        function bondToken() external view returns (address);
        function dao() external view returns (address);
        function depositBond(uint256 _amount) external payable;
        function getBatch(uint64 _batchId) external view returns (Batch memory batch_);
        function getBatchVerifyingTransition(uint64 _batchId) external view
            returns (TransitionState memory ts_);
        function getLastSyncedTransition() external view
            returns (uint64 batchId_, uint64 blockId_, TransitionState memory ts_);
        function getLastVerifiedTransition() external view
            returns (uint64 batchId_, uint64 blockId_, TransitionState memory ts_);
        function getStats1() external view returns (Stats1 memory);
        function getStats2() external view returns (Stats2 memory);
        function getTransitionsById(uint64 _batchId, uint24 _tid) external view
            returns (TransitionState[] memory);
        function getTransitionsByParentHash(uint64 _batchId, bytes32 _parentHash) external view
            returns (TransitionState[] memory);
        function getVerificationStreakStartedAt() external view returns (uint256);
        function inboxWrapper() external view returns (address);
        function init(address _owner, bytes32 _genesisBlockHash) external;
        function isOnL1() external pure returns (bool);
        function pacayaConfig() external view returns (Config memory);
        function proposeBatch(bytes memory _params, bytes memory _txList) external
            returns (BatchInfo memory info_, BatchMetadata memory meta_);
        function proposeWithProof(bytes memory _proposeParams, bytes memory _txList, bytes memory _proveParams, bytes memory _proof) external
            returns (BatchInfo memory info_, BatchMetadata memory meta_);
        function proveBatches(bytes memory _params, bytes memory _proof) external;
        function rollbackBatches() external;
        function setProposeWithProofMode(bool _enabled) external;
        function signalService() external view returns (address);
        function state() external view
            returns (bytes32 __reserve1, Stats1 memory stats1, Stats2 memory stats2);
        function verifier() external view returns (address);
        function verifyBatches(uint64 _length) external;
        function withdrawBond(uint256 _amount) external;
    }
}
