use alloy::sol;
use tkb_primitives::Fork;

use self::IComposeVerifier::IComposeVerifierErrors;
use crate::bind::contract_binding;

contract_binding! {
    /// A wrapper over the Pacaya `ComposeVerifier` contract, which dispatches batch proofs to
    /// its sub-verifiers.
    ComposeVerifier(IComposeVerifier::IComposeVerifierInstance),
    errors: IComposeVerifierErrors,
    fork: Some(Fork::Pacaya),
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IComposeVerifier {
        error CV_INVALID_SUB_VERIFIER();
        error CV_INVALID_SUB_VERIFIER_ORDER();
        error CV_VERIFIERS_INSUFFICIENT();
        error FUNCTION_DISABLED();

        #[derive(Default)]
        struct Context {
            uint64 batchId;
            bytes32 metaHash;
            Transition transition;
        }

        #[derive(Default)]
        struct Transition {
            bytes32 parentHash;
            bytes32 blockHash;
            bytes32 stateRoot;
        }

        function init(address _owner) external;
        function opVerifier() external view returns (address);
        function risc0RethVerifier() external view returns (address);
        function sgxGethVerifier() external view returns (address);
        function sgxRethVerifier() external view returns (address);
        function sp1RethVerifier() external view returns (address);
        function taikoInbox() external view returns (address);
        function tdxGethVerifier() external view returns (address);
        function verifyProof(Context[] memory _ctxs, bytes memory _proof) external;
    }
}
