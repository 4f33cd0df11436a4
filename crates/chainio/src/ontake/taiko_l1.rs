use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use alloy_primitives::B256;
use tkb_primitives::{Fork, summary::Summary};

use self::ITaikoL1::{
    Block, BlockProposedV2, BlockVerifiedV2, Config, ITaikoL1Errors, SlotA, SlotB,
    TransitionProvedV2,
};
use crate::{bind::contract_binding, iter::IterableEvent, map_contract_error};

contract_binding! {
    /// A wrapper over the Ontake `TaikoL1` rollup contract.
    TaikoL1(ITaikoL1::ITaikoL1Instance),
    errors: ITaikoL1Errors,
    fork: Some(Fork::Ontake),
}

/// A block as reported by `getLastVerifiedBlock` and `getLastSyncedBlock`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockCheckpoint {
    /// The L2 block id.
    pub block_id: u64,
    /// The L2 block hash.
    pub block_hash: B256,
    /// The L2 state root.
    pub state_root: B256,
}

impl<P: Provider + Clone> TaikoL1<P> {
    /// Retrieves the protocol configuration.
    pub async fn get_config(&self) -> ContractResult<Config> {
        self.0.getConfig().call().await.map_err(map_contract_error::<ITaikoL1Errors>)
    }

    /// Retrieves the two state slots of the rollup.
    pub async fn get_state_variables(&self) -> ContractResult<(SlotA, SlotB)> {
        let vars = self
            .0
            .getStateVariables()
            .call()
            .await
            .map_err(map_contract_error::<ITaikoL1Errors>)?;

        Ok((vars._0, vars._1))
    }

    /// Retrieves a block by its id.
    pub async fn get_block(&self, block_id: u64) -> ContractResult<Block> {
        self.0.getBlock(block_id).call().await.map_err(map_contract_error::<ITaikoL1Errors>)
    }

    /// Retrieves the last verified block.
    pub async fn get_last_verified_block(&self) -> ContractResult<BlockCheckpoint> {
        let block = self
            .0
            .getLastVerifiedBlock()
            .call()
            .await
            .map_err(map_contract_error::<ITaikoL1Errors>)?;

        Ok(BlockCheckpoint {
            block_id: block.blockId_,
            block_hash: block.blockHash_,
            state_root: block.stateRoot_,
        })
    }
}

impl IterableEvent for BlockProposedV2 {}

impl IterableEvent for TransitionProvedV2 {}

impl IterableEvent for BlockVerifiedV2 {}

impl Summary for BlockProposedV2 {
    fn summary(&self) -> String {
        format!(
            "block id: {}, proposer: {}, coinbase: {}, anchor block id: {}, timestamp: {}, blob used: {}, proposed in: {}, min tier: {}",
            self.blockId,
            self.meta.proposer,
            self.meta.coinbase,
            self.meta.anchorBlockId,
            self.meta.timestamp,
            self.meta.blobUsed,
            self.meta.proposedIn,
            self.meta.minTier,
        )
    }
}

impl Summary for TransitionProvedV2 {
    fn summary(&self) -> String {
        format!(
            "block id: {}, prover: {}, tier: {}, parent hash: {}, block hash: {}, proposed in: {}",
            self.blockId,
            self.prover,
            self.tier,
            self.tran.parentHash,
            self.tran.blockHash,
            self.proposedIn,
        )
    }
}

impl Summary for BlockVerifiedV2 {
    fn summary(&self) -> String {
        format!(
            "block id: {}, prover: {}, block hash: {}, tier: {}",
            self.blockId, self.prover, self.blockHash, self.tier
        )
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface ITaikoL1 {
        // LibProposing, LibProving, LibVerifying, LibUtils and LibDepositing are linked
        // into TaikoL1: their errors and events are emitted from its address.
        error L1_ALREADY_CONTESTED();
        error L1_ALREADY_PROVED();
        error L1_BLOCK_MISMATCH();
        error L1_CANNOT_CONTEST();
        error L1_FORK_ERROR();
        error L1_INVALID_BLOCK_ID();
        error L1_INVALID_GENESIS_HASH();
        error L1_INVALID_PAUSE_STATUS();
        error L1_INVALID_TIER();
        error L1_INVALID_TRANSITION();
        error L1_NOT_ASSIGNED_PROVER();
        error L1_PROVING_PAUSED();
        error L1_RECEIVE_DISABLED();
        error L1_TRANSITION_NOT_FOUND();
        error L1_UNEXPECTED_TRANSITION_ID();
        error RESOLVER_DENIED();
        error RESOLVER_INVALID_MANAGER();
        error RESOLVER_UNEXPECTED_CHAINID();
        error RESOLVER_ZERO_ADDR(uint64 chainId, bytes32 name);
        error L1_BLOB_NOT_AVAILABLE();
        error L1_BLOB_NOT_FOUND();
        error L1_INVALID_ANCHOR_BLOCK();
        error L1_INVALID_PROPOSER();
        error L1_INVALID_TIMESTAMP();
        error L1_LIVENESS_BOND_NOT_RECEIVED();
        error L1_TOO_MANY_BLOCKS();
        error L1_UNEXPECTED_PARENT();
        error L1_DIFF_VERIFIER();
        error L1_INVALID_MSG_VALUE();
        error L1_INVALID_PARAMS();
        error L1_TRANSITION_ID_ZERO();
        error L1_INVALID_CONFIG();
        error L1_TOO_LATE();
        error L1_INVALID_ETH_DEPOSIT();

        event BlockProposed(uint256 indexed blockId, address indexed assignedProver, uint96 livenessBond, BlockMetadata meta, EthDeposit[] depositsProcessed);
        event BlockProposedV2(uint256 indexed blockId, BlockMetadataV2 meta);
        event BlockVerified(uint256 indexed blockId, address indexed prover, bytes32 blockHash, bytes32 stateRoot, uint16 tier);
        event BlockVerifiedV2(uint256 indexed blockId, address indexed prover, bytes32 blockHash, uint16 tier);
        event BondCredited(address indexed user, uint256 amount);
        event BondDebited(address indexed user, uint256 amount);
        event CalldataTxList(uint256 indexed blockId, bytes txList);
        event ProvingPaused(bool paused);
        event StateVariablesUpdated(SlotB slotB);
        event TransitionContested(uint256 indexed blockId, Transition tran, address contester, uint96 contestBond, uint16 tier);
        event TransitionContestedV2(uint256 indexed blockId, Transition tran, address contester, uint96 contestBond, uint16 tier, uint64 proposedIn);
        event TransitionProved(uint256 indexed blockId, Transition tran, address prover, uint96 validityBond, uint16 tier);
        event TransitionProvedV2(uint256 indexed blockId, Transition tran, address prover, uint96 validityBond, uint16 tier, uint64 proposedIn);
        event BondCredited(address indexed user, uint256 blockId, uint256 amount);
        event BondDebited(address indexed user, uint256 blockId, uint256 amount);
        event BondDeposited(address indexed user, uint256 amount);
        event EthDeposited(EthDeposit deposit);

        #[derive(Default)]
        struct Block {
            bytes32 metaHash;
            address assignedProver;
            uint96 livenessBond;
            uint64 blockId;
            uint64 proposedAt;
            uint64 proposedIn;
            uint24 nextTransitionId;
            bool livenessBondReturned;
            uint24 verifiedTransitionId;
        }

        #[derive(Default)]
        struct Config {
            uint64 chainId;
            uint64 blockMaxProposals;
            uint64 blockRingBufferSize;
            uint64 maxBlocksToVerify;
            uint32 blockMaxGasLimit;
            uint96 livenessBond;
            uint8 stateRootSyncInternal;
            uint64 maxAnchorHeightOffset;
            uint8 basefeeSharingPctg;
            uint8 blockGasTargetMillion;
            uint64 ontakeForkHeight;
        }

        #[derive(Default)]
        struct SlotA {
            uint64 genesisHeight;
            uint64 genesisTimestamp;
            uint64 lastSyncedBlockId;
            uint64 lastSynecdAt;
        }

        #[derive(Default)]
        struct SlotB {
            uint64 numBlocks;
            uint64 lastVerifiedBlockId;
            bool provingPaused;
            uint8 __reservedB1;
            uint16 __reservedB2;
            uint32 __reservedB3;
            uint64 lastUnpausedAt;
        }

        #[derive(Default)]
        struct TransitionState {
            bytes32 key;
            bytes32 blockHash;
            bytes32 stateRoot;
            address prover;
            uint96 validityBond;
            address contester;
            uint96 contestBond;
            uint64 timestamp;
            uint16 tier;
            uint8 __reserved1;
        }

        #[derive(Default)]
        struct BlockMetadata {
            bytes32 l1Hash;
            bytes32 difficulty;
            bytes32 blobHash;
            bytes32 extraData;
            bytes32 depositsHash;
            address coinbase;
            uint64 id;
            uint32 gasLimit;
            uint64 timestamp;
            uint64 l1Height;
            uint16 minTier;
            bool blobUsed;
            bytes32 parentMetaHash;
            address sender;
        }

        #[derive(Default)]
        struct EthDeposit {
            address recipient;
            uint96 amount;
            uint64 id;
        }

        #[derive(Default)]
        struct BlockMetadataV2 {
            bytes32 anchorBlockHash;
            bytes32 difficulty;
            bytes32 blobHash;
            bytes32 extraData;
            address coinbase;
            uint64 id;
            uint32 gasLimit;
            uint64 timestamp;
            uint64 anchorBlockId;
            uint16 minTier;
            bool blobUsed;
            bytes32 parentMetaHash;
            address proposer;
            uint96 livenessBond;
            uint64 proposedAt;
            uint64 proposedIn;
            uint32 blobTxListOffset;
            uint32 blobTxListLength;
            uint8 blobIndex;
        }

        #[derive(Default)]
        struct Transition {
            bytes32 parentHash;
            bytes32 blockHash;
            bytes32 stateRoot;
            bytes32 graffiti;
        }

        #[derive(Default)]
        struct BaseFeeConfig {
            uint8 adjustmentQuotient;
            uint8 sharingPctg;
            uint32 gasIssuancePerSecond;
            uint64 minGasExcess;
            uint32 maxGasIssuancePerBlock;
        }

        function addressManager() external view returns (address);
        function bondBalanceOf(address _user) external view returns (uint256);
        function depositBond(uint256 _amount) external;
        function getBlock(uint64 _blockId) external view returns (Block memory blk_);
        function getConfig() external pure returns (Config memory);
        function getLastSyncedBlock() external view
            returns (uint64 blockId_, bytes32 blockHash_, bytes32 stateRoot_);
        function getLastVerifiedBlock() external view
            returns (uint64 blockId_, bytes32 blockHash_, bytes32 stateRoot_);
        function getStateVariables() external view returns (SlotA memory, SlotB memory);
        function getTransition(uint64 _blockId, bytes32 _parentHash) external view
            returns (TransitionState memory);
        function getTransition(uint64 _blockId, uint32 _tid) external view
            returns (TransitionState memory);
        function getVerifiedBlockProver(uint64 _blockId) external view returns (address prover_);
        function init(address _owner, address _rollupAddressManager, bytes32 _genesisBlockHash, bool _toPause) external;
        function init2() external;
        function pauseProving(bool _pause) external;
        function proposeBlock(bytes memory _params, bytes memory _txList) external payable
            returns (BlockMetadata memory meta_, EthDeposit[] memory deposits_);
        function proposeBlockV2(bytes memory _params, bytes memory _txList) external
            returns (BlockMetadataV2 memory meta_);
        function proveBlock(uint64 _blockId, bytes memory _input) external;
        function resolve(bytes32 _name, bool _allowZeroAddress) external view returns (address);
        function resolve(uint64 _chainId, bytes32 _name, bool _allowZeroAddress) external view
            returns (address);
        function state() external view
            returns (bytes32 __reserve1, SlotA memory slotA, SlotB memory slotB);
        function verifyBlocks(uint64 _maxBlocksToVerify) external;
        function withdrawBond(uint256 _amount) external;
    }
}
