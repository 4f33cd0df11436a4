use alloy::{
    contract::Result as ContractResult, providers::Provider, rpc::types::TransactionRequest, sol,
};
use alloy_primitives::{Address, Bytes, aliases::U96};
use tkb_codec::pacaya::{BatchParams, encode_wrapped_batch_params};
use tkb_primitives::Fork;

use self::IPreconfRouter::IPreconfRouterErrors;
use crate::{bind::contract_binding, map_contract_error};

contract_binding! {
    /// A wrapper over the Pacaya `PreconfRouter` contract.
    ///
    /// `PreconfRouter` shares the batch posting interface of `TaikoInbox`, behind the
    /// `TaikoWrapper` params layout.
    PreconfRouter(IPreconfRouter::IPreconfRouterInstance),
    errors: IPreconfRouterErrors,
    fork: Some(Fork::Pacaya),
}

impl<P: Provider + Clone> PreconfRouter<P> {
    /// Returns the address of the preconf whitelist.
    pub async fn get_preconf_whitelist(&self) -> ContractResult<Address> {
        self.0.preconfWhitelist().call().await.map_err(map_contract_error::<IPreconfRouterErrors>)
    }

    /// Returns the fallback preconfer, allowed to propose when no operator is whitelisted.
    pub async fn get_fallback_preconfer(&self) -> ContractResult<Address> {
        self.0.fallbackPreconfer().call().await.map_err(map_contract_error::<IPreconfRouterErrors>)
    }

    /// Returns a [`TransactionRequest`] for the `proposeBatch` function.
    pub fn propose_batch_request(
        &self,
        params: &BatchParams,
        tx_list: Bytes,
    ) -> TransactionRequest {
        // The router rejects forced inclusions: the first half of the layout stays empty.
        let encoded = encode_wrapped_batch_params(None, params);
        self.0.proposeBatch(encoded, tx_list).into_transaction_request()
    }

    /// Returns a [`TransactionRequest`] for `proposeBatchWithExpectedLastBlockId`, which reverts
    /// with `InvalidLastBlockId` if the batch would not end at `expected_last_block_id`.
    pub fn propose_batch_with_expected_last_block_id_request(
        &self,
        params: &BatchParams,
        tx_list: Bytes,
        expected_last_block_id: u64,
    ) -> TransactionRequest {
        let encoded = encode_wrapped_batch_params(None, params);
        self.0
            .proposeBatchWithExpectedLastBlockId(
                encoded,
                tx_list,
                U96::from(expected_last_block_id),
            )
            .into_transaction_request()
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IPreconfRouter {
        error ForcedInclusionNotSupported();
        error InvalidLastBlockId(uint96 _actual, uint96 _expected);
        error NotPreconferOrFallback();
        error ProposerIsNotPreconfer();

        #[derive(Default)]
        struct Config {
            uint256 handOverSlots;
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

        function fallbackPreconfer() external view returns (address);
        function getConfig() external pure returns (Config memory);
        function init(address _owner) external;
        function preconfWhitelist() external view returns (address);
        function proposeBatch(bytes memory _params, bytes memory _txList) external
            returns (BatchInfo memory, BatchMetadata memory);
        function proposeBatchEntrypoint() external view returns (address);
        function proposeBatchWithExpectedLastBlockId(bytes memory _params, bytes memory _txList, uint96 _expectedLastBlockId) external
            returns (BatchInfo memory info_, BatchMetadata memory meta_);
    }
}

#[cfg(test)]
mod tests {
    use alloy_sol_types::{SolCall, SolError};
    use serde_json::json;

    use super::*;
    use crate::{errors::decode_custom_error, test_utils::MockNode};

    #[tokio::test]
    async fn expected_last_block_id() {
        let node = MockNode::start(|_, _| Ok(json!(null))).await;
        let router = PreconfRouter::from_provider(Address::repeat_byte(0x13), node.provider());

        let request = router.propose_batch_with_expected_last_block_id_request(
            &BatchParams::default(),
            Bytes::new(),
            1_234,
        );
        let call = IPreconfRouter::proposeBatchWithExpectedLastBlockIdCall::abi_decode(
            request.input.input().unwrap(),
        )
        .unwrap();
        assert_eq!(call._expectedLastBlockId, U96::from(1_234));
    }

    #[test]
    fn invalid_last_block_id_is_decoded() {
        let err = IPreconfRouter::InvalidLastBlockId {
            _actual: U96::from(10),
            _expected: U96::from(11),
        };
        let decoded = decode_custom_error(&err.abi_encode()).unwrap();
        assert_eq!(decoded.contract, "PreconfRouter");
        assert!(decoded.error.contains("InvalidLastBlockId"));
    }
}
