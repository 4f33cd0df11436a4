use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use alloy_primitives::U256;
use tkb_primitives::{Fork, summary::Summary};

use self::IForcedInclusionStore::{
    ForcedInclusion, ForcedInclusionStored, IForcedInclusionStoreErrors,
};
use crate::{bind::contract_binding, iter::IterableEvent, map_contract_error};

contract_binding! {
    /// A wrapper over the Pacaya `ForcedInclusionStore` contract, the queue of transactions
    /// users force into L2.
    ForcedInclusionStore(IForcedInclusionStore::IForcedInclusionStoreInstance),
    errors: IForcedInclusionStoreErrors,
    fork: Some(Fork::Pacaya),
}

impl<P: Provider + Clone> ForcedInclusionStore<P> {
    /// Returns the oldest queued forced inclusion, or `None` if the queue is empty.
    pub async fn get_oldest_forced_inclusion(&self) -> ContractResult<Option<ForcedInclusion>> {
        let map_err = map_contract_error::<IForcedInclusionStoreErrors>;
        let head = self.0.head().call().await.map_err(map_err)?;
        let tail = self.0.tail().call().await.map_err(map_err)?;
        if head >= tail {
            return Ok(None);
        }

        self.0
            .getForcedInclusion(U256::from(head))
            .call()
            .await
            .map(Some)
            .map_err(map_err)
    }

    /// Returns true if the oldest forced inclusion must be processed by the next batch.
    pub async fn is_oldest_forced_inclusion_due(&self) -> ContractResult<bool> {
        self.0
            .isOldestForcedInclusionDue()
            .call()
            .await
            .map_err(map_contract_error::<IForcedInclusionStoreErrors>)
    }
}

impl IterableEvent for ForcedInclusionStored {}

impl Summary for ForcedInclusionStored {
    fn summary(&self) -> String {
        let fi = &self.forcedInclusion;
        format!(
            "blob hash: {}, fee: {} gwei, created at batch: {}, blob created in: {}",
            fi.blobHash, fi.feeInGwei, fi.createdAtBatchId, fi.blobCreatedIn
        )
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IForcedInclusionStore {
        error BlobNotFound();
        error IncorrectFee();
        error InvalidIndex();
        error InvalidParams();
        error NoForcedInclusionFound();

        event ForcedInclusionConsumed(ForcedInclusion forcedInclusion);
        event ForcedInclusionStored(ForcedInclusion forcedInclusion);

        #[derive(Default)]
        struct ForcedInclusion {
            bytes32 blobHash;
            uint64 feeInGwei;
            uint64 createdAtBatchId;
            uint32 blobByteOffset;
            uint32 blobByteSize;
            uint64 blobCreatedIn;
        }

        function consumeOldestForcedInclusion(address _feeRecipient) external
            returns (ForcedInclusion memory inclusion_);
        function feeInGwei() external view returns (uint64);
        function getForcedInclusion(uint256 index) external view returns (ForcedInclusion memory);
        function getOldestForcedInclusionDeadline() external view returns (uint256);
        function head() external view returns (uint64);
        function inbox() external view returns (address);
        function inboxWrapper() external view returns (address);
        function inclusionDelay() external view returns (uint8);
        function init(address _owner) external;
        function isOldestForcedInclusionDue() external view returns (bool);
        function lastProcessedAtBatchId() external view returns (uint64);
        function queue(uint256 id) external view
            returns (bytes32 blobHash, uint64 feeInGwei, uint64 createdAtBatchId, uint32 blobByteOffset, uint32 blobByteSize, uint64 blobCreatedIn);
        function storeForcedInclusion(uint8 blobIndex, uint32 blobByteOffset, uint32 blobByteSize) external payable;
        function tail() external view returns (uint64);
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::{Address, B256, Bytes};
    use alloy_sol_types::{SolCall, SolValue};
    use serde_json::json;

    use super::*;
    use crate::test_utils::MockNode;

    async fn store_node(head: u64, tail: u64) -> MockNode {
        MockNode::start(move |_, params| {
            let input: Bytes = serde_json::from_value(params[0]["input"].clone()).unwrap();
            let output = match <[u8; 4]>::try_from(&input[..4]).unwrap() {
                IForcedInclusionStore::headCall::SELECTOR => head.abi_encode(),
                IForcedInclusionStore::tailCall::SELECTOR => tail.abi_encode(),
                IForcedInclusionStore::getForcedInclusionCall::SELECTOR => {
                    let call =
                        IForcedInclusionStore::getForcedInclusionCall::abi_decode(&input).unwrap();
                    ForcedInclusion {
                        blobHash: B256::repeat_byte(call.index.to::<u8>()),
                        ..Default::default()
                    }
                    .abi_encode()
                }
                _ => unreachable!(),
            };
            Ok(json!(Bytes::from(output)))
        })
        .await
    }

    #[tokio::test]
    async fn oldest_forced_inclusion() {
        let node = store_node(3, 5).await;
        let store =
            ForcedInclusionStore::from_provider(Address::repeat_byte(0x16), node.provider());
        let oldest = store.get_oldest_forced_inclusion().await.unwrap().unwrap();
        assert_eq!(oldest.blobHash, B256::repeat_byte(3));

        let node = store_node(5, 5).await;
        let store =
            ForcedInclusionStore::from_provider(Address::repeat_byte(0x16), node.provider());
        assert!(store.get_oldest_forced_inclusion().await.unwrap().is_none());
    }
}
