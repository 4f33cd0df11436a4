use alloy::{contract::Result as ContractResult, providers::Provider, sol};
use alloy_primitives::Address;
use tkb_primitives::Fork;

use self::IComposeVerifier::IComposeVerifierErrors;
use crate::{bind::contract_binding, map_contract_error};

contract_binding! {
    /// A wrapper over the Shasta `ComposeVerifier` contract, which checks a proposal proof
    /// against a combination of its sub-verifiers.
    ComposeVerifier(IComposeVerifier::IComposeVerifierInstance),
    errors: IComposeVerifierErrors,
    fork: Some(Fork::Shasta),
}

impl<P: Provider + Clone> ComposeVerifier<P> {
    /// Returns the address of the sub-verifier registered under `verifier_id`, or the zero
    /// address if there is none.
    pub async fn get_verifier_address(&self, verifier_id: u8) -> ContractResult<Address> {
        self.0
            .getVerifierAddress(verifier_id)
            .call()
            .await
            .map_err(map_contract_error::<IComposeVerifierErrors>)
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IComposeVerifier {
        error CV_INVALID_SUB_VERIFIER();
        error CV_INVALID_SUB_VERIFIER_ORDER();
        error CV_VERIFIERS_INSUFFICIENT();

        function getVerifierAddress(uint8 _verifierId) external view returns (address);
        function opVerifier() external view returns (address);
        function risc0RethVerifier() external view returns (address);
        function sgxGethVerifier() external view returns (address);
        function sgxRethVerifier() external view returns (address);
        function sp1RethVerifier() external view returns (address);
        function tdxGethVerifier() external view returns (address);
        function verifyProof(uint256 _proposalAge, bytes32 _commitmentHash, bytes memory _proof) external view;
    }
}
