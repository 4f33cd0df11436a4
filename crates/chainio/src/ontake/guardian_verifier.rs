use alloy::sol;
use tkb_primitives::Fork;

use self::IGuardianVerifier::IGuardianVerifierErrors;
use crate::bind::contract_binding;

contract_binding! {
    /// A wrapper over the Ontake `GuardianVerifier` contract.
    GuardianVerifier(IGuardianVerifier::IGuardianVerifierInstance),
    errors: IGuardianVerifierErrors,
    fork: Some(Fork::Ontake),
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    #[derive(Debug)]
    interface IGuardianVerifier {
        error GV_INVALID_PROOF();
        error GV_PERMISSION_DENIED();
        error RESOLVER_DENIED();
        error RESOLVER_INVALID_MANAGER();
        error RESOLVER_UNEXPECTED_CHAINID();
        error RESOLVER_ZERO_ADDR(uint64 chainId, bytes32 name);
        error ZERO_ADDR_MANAGER();

        #[derive(Default)]
        struct Context {
            bytes32 metaHash;
            bytes32 blobHash;
            address prover;
            uint64 blockId;
            bool isContesting;
            bool blobUsed;
            address msgSender;
        }

        #[derive(Default)]
        struct Transition {
            bytes32 parentHash;
            bytes32 blockHash;
            bytes32 stateRoot;
            bytes32 graffiti;
        }

        #[derive(Default)]
        struct TierProof {
            uint16 tier;
            bytes data;
        }

        function addressManager() external view returns (address);
        function init(address _owner, address _addressManager) external;
        function resolve(bytes32 _name, bool _allowZeroAddress) external view returns (address);
        function resolve(uint64 _chainId, bytes32 _name, bool _allowZeroAddress) external view
            returns (address);
        function verifyProof(Context memory _ctx, Transition memory, TierProof memory _proof) external view;
    }
}
