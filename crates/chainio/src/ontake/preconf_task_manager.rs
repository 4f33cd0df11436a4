use alloy::sol;
use tkb_primitives::Fork;

use crate::{bind::contract_binding, essential::IEssentialContract::IEssentialContractErrors};

contract_binding! {
    /// A wrapper over the Ontake `PreconfTaskManager` contract.
    ///
    /// The contract declares no errors of its own.
    PreconfTaskManager(IPreconfTaskManager::IPreconfTaskManagerInstance),
    errors: IEssentialContractErrors,
    fork: Some(Fork::Ontake),
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IPreconfTaskManager {

        #[derive(Default)]
        struct LookaheadBufferEntry {
            bool isFallback;
            uint40 timestamp;
            uint40 prevTimestamp;
            address preconfer;
        }

        #[derive(Default)]
        struct LookaheadSetParam {
            uint256 timestamp;
            address preconfer;
        }

        function getLookaheadBuffer() external view returns (LookaheadBufferEntry[64] memory);
        function newBlockProposal(bytes[] memory blockParams, bytes[] memory txLists, uint256 lookaheadPointer, LookaheadSetParam[] memory lookaheadSetParams) external payable;
    }
}
