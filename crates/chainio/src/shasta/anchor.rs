use alloy::{
    contract::Result as ContractResult, providers::Provider, rpc::types::Block, sol,
};
use alloy_primitives::{Address, B256, Bytes, U256, aliases::U48};
use alloy_sol_types::SolCall;
use tkb_primitives::{Fork, summary::Summary};

use self::IAnchor::{
    Anchored, BlockParams, BlockState, BondInstruction, IAnchorErrors, ProposalParams,
    ProposalState, anchorV4Call,
};
use crate::{
    anchor::{AnchorError, decode_anchor_call},
    bind::contract_binding,
    map_contract_error,
};

contract_binding! {
    /// A wrapper over the Shasta L2 `Anchor` contract.
    Anchor(IAnchor::IAnchorInstance),
    errors: IAnchorErrors,
    fork: Some(Fork::Shasta),
}

/// The prover designated for a proposal, as resolved by `getDesignatedProver`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DesignatedProver {
    /// Whether the proposer lacks the bond to cover the proposal.
    pub is_low_bond_proposal: bool,
    /// The designated prover.
    pub prover: Address,
    /// The fee owed to the designated prover.
    pub proving_fee: U256,
}

impl<P: Provider + Clone> Anchor<P> {
    /// Retrieves the anchor state of the current block.
    pub async fn get_block_state(&self) -> ContractResult<BlockState> {
        self.0.getBlockState().call().await.map_err(map_contract_error::<IAnchorErrors>)
    }

    /// Retrieves the bond state of the current proposal.
    pub async fn get_proposal_state(&self) -> ContractResult<ProposalState> {
        self.0.getProposalState().call().await.map_err(map_contract_error::<IAnchorErrors>)
    }

    /// Resolves the designated prover of a proposal from its prover authorization.
    pub async fn get_designated_prover(
        &self,
        proposal_id: u64,
        proposer: Address,
        prover_auth: Bytes,
        current_designated_prover: Address,
    ) -> ContractResult<DesignatedProver> {
        let res = self
            .0
            .getDesignatedProver(
                U48::from(proposal_id),
                proposer,
                prover_auth,
                current_designated_prover,
            )
            .call()
            .await
            .map_err(map_contract_error::<IAnchorErrors>)?;

        Ok(DesignatedProver {
            is_low_bond_proposal: res.isLowBondProposal_,
            prover: res.designatedProver_,
            proving_fee: res.provingFeeToTransfer_,
        })
    }

    /// Returns the chain id of the L1 the anchor syncs from.
    pub async fn l1_chain_id(&self) -> ContractResult<u64> {
        self.0.l1ChainId().call().await.map_err(map_contract_error::<IAnchorErrors>)
    }
}

/// The inputs of an `anchorV4` transaction.
#[derive(Debug, Clone, Default)]
pub struct AnchorV4Input {
    /// The proposal the block belongs to.
    pub proposal_id: u64,
    /// The proposer of the proposal.
    pub proposer: Address,
    /// The ABI-encoded prover authorization.
    pub prover_auth: Bytes,
    /// The bond instructions hash the proposal expects after processing `bond_instructions`.
    pub bond_instructions_hash: B256,
    /// The bond instructions to process, only set on the first block of a proposal.
    pub bond_instructions: Vec<BondInstruction>,
    /// The index of the block within its proposal.
    pub block_index: u16,
    /// The L1 block number to anchor, or zero to keep the previous anchor.
    pub anchor_block_number: u64,
    /// The hash of the anchor block.
    pub anchor_block_hash: B256,
    /// The state root of the anchor block.
    pub anchor_state_root: B256,
}

impl From<anchorV4Call> for AnchorV4Input {
    fn from(anchor: anchorV4Call) -> Self {
        let proposal = anchor._proposalParams;
        let block = anchor._blockParams;
        Self {
            proposal_id: proposal.proposalId.to::<u64>(),
            proposer: proposal.proposer,
            prover_auth: proposal.proverAuth,
            bond_instructions_hash: proposal.bondInstructionsHash,
            bond_instructions: proposal.bondInstructions,
            block_index: block.blockIndex,
            anchor_block_number: block.anchorBlockNumber.to::<u64>(),
            anchor_block_hash: block.anchorBlockHash,
            anchor_state_root: block.anchorStateRoot,
        }
    }
}

impl From<AnchorV4Input> for anchorV4Call {
    fn from(value: AnchorV4Input) -> Self {
        Self {
            _proposalParams: ProposalParams {
                proposalId: U48::from(value.proposal_id),
                proposer: value.proposer,
                proverAuth: value.prover_auth,
                bondInstructionsHash: value.bond_instructions_hash,
                bondInstructions: value.bond_instructions,
            },
            _blockParams: BlockParams {
                blockIndex: value.block_index,
                anchorBlockNumber: U48::from(value.anchor_block_number),
                anchorBlockHash: value.anchor_block_hash,
                anchorStateRoot: value.anchor_state_root,
            },
        }
    }
}

/// Decode `anchorV4` calldata.
pub fn decode_anchor_tx_data(data: &[u8]) -> Result<AnchorV4Input, AnchorError> {
    Ok(anchorV4Call::abi_decode(data)?.into())
}

/// Decode the `anchorV4` transaction of a full L2 block.
pub fn decode_anchor_tx(block: &Block) -> Result<AnchorV4Input, AnchorError> {
    decode_anchor_call::<anchorV4Call>(block).map(Into::into)
}

impl Summary for Anchored {
    fn summary(&self) -> String {
        format!(
            "anchor block number: {}, designated prover: {}, low bond: {}, bond instructions hash: {}, ancestors hash: {}",
            self.anchorBlockNumber,
            self.designatedProver,
            self.isLowBondProposal,
            self.bondInstructionsHash,
            self.ancestorsHash,
        )
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IAnchor {
        error AncestorsHashMismatch();
        error BondInstructionsHashMismatch();
        error InvalidAddress();
        error InvalidAnchorBlockNumber();
        error InvalidBlockIndex();
        error InvalidL1ChainId();
        error InvalidL2ChainId();
        error InvalidSender();
        error NonZeroAnchorBlockHash();
        error NonZeroAnchorStateRoot();
        error NonZeroBlockIndex();
        error ProposalIdMismatch();
        error ProposerMismatch();
        error ZeroBlockCount();

        event Anchored(bytes32 bondInstructionsHash, address designatedProver, bool isLowBondProposal, uint48 anchorBlockNumber, bytes32 ancestorsHash);
        event Withdrawn(address token, address to, uint256 amount);

        #[derive(Default)]
        struct ProverAuth {
            uint48 proposalId;
            address proposer;
            uint256 provingFee;
            bytes signature;
        }

        #[derive(Default)]
        struct ProposalParams {
            uint48 proposalId;
            address proposer;
            bytes proverAuth;
            bytes32 bondInstructionsHash;
            BondInstruction[] bondInstructions;
        }

        #[derive(Default)]
        struct BondInstruction {
            uint48 proposalId;
            uint8 bondType;
            address payer;
            address payee;
        }

        #[derive(Default)]
        struct BlockParams {
            uint16 blockIndex;
            uint48 anchorBlockNumber;
            bytes32 anchorBlockHash;
            bytes32 anchorStateRoot;
        }

        #[derive(Default)]
        struct BlockState {
            uint48 anchorBlockNumber;
            bytes32 ancestorsHash;
        }

        #[derive(Default)]
        struct ProposalState {
            bytes32 bondInstructionsHash;
            address designatedProver;
            bool isLowBondProposal;
        }

        function ANCHOR_GAS_LIMIT() external view returns (uint64);
        function GOLDEN_TOUCH_ADDRESS() external view returns (address);
        function _isMatchingProverAuthContext(ProverAuth memory _auth, uint48 _proposalId, address _proposer) external pure
            returns (bool);
        function anchorV4(ProposalParams memory _proposalParams, BlockParams memory _blockParams) external;
        function bondManager() external view returns (address);
        function checkpointStore() external view returns (address);
        function getBlockState() external view returns (BlockState memory);
        function getDesignatedProver(uint48 _proposalId, address _proposer, bytes memory _proverAuth, address _currentDesignatedProver) external view
            returns (bool isLowBondProposal_, address designatedProver_, uint256 provingFeeToTransfer_);
        function getProposalState() external view returns (ProposalState memory);
        function l1ChainId() external view returns (uint64);
        function livenessBond() external view returns (uint256);
        function provabilityBond() external view returns (uint256);
        function validateProverAuth(uint48 _proposalId, address _proposer, bytes memory _proverAuth) external pure
            returns (address signer_, uint256 provingFee_);
        function withdraw(address _token, address _to) external;
    }
}
