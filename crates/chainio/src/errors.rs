use std::fmt;

use alloy::{contract::Error as ContractError, transports::TransportError};
use alloy_sol_types::{Panic, Revert, SolError, SolInterface};
use tkb_primitives::Fork;

use crate::{essential::IEssentialContract, ontake, pacaya, shasta};

/// A custom error decoded from revert data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedError {
    /// The fork of the interface that declares the error, if any.
    pub fork: Option<Fork>,
    /// The name of the interface that declares the error.
    pub contract: &'static str,
    /// The error name and its arguments.
    pub error: String,
}

impl fmt::Display for DecodedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.fork {
            Some(fork) => write!(f, "{} ({fork}): {}", self.contract, self.error),
            None => write!(f, "{}: {}", self.contract, self.error),
        }
    }
}

type Decoder = fn(&[u8]) -> Option<String>;

fn decode_with<I: SolInterface + fmt::Debug>(data: &[u8]) -> Option<String> {
    I::abi_decode(data).ok().map(|decoded| format!("{decoded:?}"))
}

/// Every known error interface, in lookup order.
const INTERFACES: &[(Option<Fork>, &str, Decoder)] = &[
    (Some(Fork::Ontake), "TaikoL1", decode_with::<ontake::taiko_l1::ITaikoL1::ITaikoL1Errors>),
    (Some(Fork::Ontake), "TaikoL2", decode_with::<ontake::taiko_l2::ITaikoL2::ITaikoL2Errors>),
    (
        Some(Fork::Ontake),
        "GuardianVerifier",
        decode_with::<ontake::guardian_verifier::IGuardianVerifier::IGuardianVerifierErrors>,
    ),
    (Some(Fork::Ontake), "ProverSet", decode_with::<ontake::prover_set::IProverSet::IProverSetErrors>),
    (
        Some(Fork::Ontake),
        "AddressManager",
        decode_with::<ontake::address_manager::IAddressManager::IAddressManagerErrors>,
    ),
    (
        Some(Fork::Ontake),
        "TierProvider",
        decode_with::<ontake::tier_provider::ITierProvider::ITierProviderErrors>,
    ),
    (
        Some(Fork::Ontake),
        "SequencerRegistry",
        decode_with::<ontake::sequencer_registry::ISequencerRegistry::ISequencerRegistryErrors>,
    ),
    (Some(Fork::Pacaya), "TaikoInbox", decode_with::<pacaya::inbox::ITaikoInbox::ITaikoInboxErrors>),
    (
        Some(Fork::Pacaya),
        "TaikoWrapper",
        decode_with::<pacaya::wrapper::ITaikoWrapper::ITaikoWrapperErrors>,
    ),
    (
        Some(Fork::Pacaya),
        "ForcedInclusionStore",
        decode_with::<
            pacaya::forced_inclusion_store::IForcedInclusionStore::IForcedInclusionStoreErrors,
        >,
    ),
    (
        Some(Fork::Pacaya),
        "TaikoAnchor",
        decode_with::<pacaya::anchor::ITaikoAnchor::ITaikoAnchorErrors>,
    ),
    (
        Some(Fork::Pacaya),
        "ResolverBase",
        decode_with::<pacaya::resolver_base::IResolverBase::IResolverBaseErrors>,
    ),
    (
        Some(Fork::Pacaya),
        "ComposeVerifier",
        decode_with::<pacaya::compose_verifier::IComposeVerifier::IComposeVerifierErrors>,
    ),
    (
        Some(Fork::Pacaya),
        "ForkRouter",
        decode_with::<pacaya::fork_router::IForkRouter::IForkRouterErrors>,
    ),
    (Some(Fork::Pacaya), "TaikoToken", decode_with::<pacaya::token::ITaikoToken::ITaikoTokenErrors>),
    (
        Some(Fork::Pacaya),
        "PreconfRouter",
        decode_with::<pacaya::preconf_router::IPreconfRouter::IPreconfRouterErrors>,
    ),
    (
        Some(Fork::Pacaya),
        "PreconfWhitelist",
        decode_with::<pacaya::preconf_whitelist::IPreconfWhitelist::IPreconfWhitelistErrors>,
    ),
    (Some(Fork::Shasta), "Inbox", decode_with::<shasta::inbox::IInbox::IInboxErrors>),
    (Some(Fork::Shasta), "Anchor", decode_with::<shasta::anchor::IAnchor::IAnchorErrors>),
    (
        Some(Fork::Shasta),
        "BondManager",
        decode_with::<shasta::bond_manager::IBondManager::IBondManagerErrors>,
    ),
    (
        Some(Fork::Shasta),
        "ComposeVerifier",
        decode_with::<shasta::compose_verifier::IComposeVerifier::IComposeVerifierErrors>,
    ),
    (
        Some(Fork::Shasta),
        "InboxHelper",
        decode_with::<shasta::inbox_helper::IInboxHelper::IInboxHelperErrors>,
    ),
    (None, "EssentialContract", decode_with::<IEssentialContract::IEssentialContractErrors>),
];

/// Decode revert data against every known error interface.
///
/// Interfaces are tried fork by fork (ontake, pacaya, shasta), then the shared
/// `EssentialContract` errors, then the standard `Error(string)` and `Panic(uint256)`.
/// An error declared by more than one contract resolves to the first one in that order.
pub fn decode_custom_error(data: &[u8]) -> Option<DecodedError> {
    for (fork, contract, decode) in INTERFACES {
        if let Some(error) = decode(data) {
            return Some(DecodedError { fork: *fork, contract, error });
        }
    }

    if let Ok(revert) = Revert::abi_decode(data) {
        return Some(DecodedError {
            fork: None,
            contract: "Error",
            error: format!("Error({:?})", revert.reason),
        });
    }

    if let Ok(panic) = Panic::abi_decode(data) {
        let error = match panic.kind() {
            Some(kind) => format!("Panic({kind:?})"),
            None => format!("Panic({:#x})", panic.code),
        };
        return Some(DecodedError { fork: None, contract: "Panic", error });
    }

    None
}

/// Decode the revert data carried by a JSON-RPC error response, if any.
pub fn decode_transport_error(err: &TransportError) -> Option<DecodedError> {
    let data = err.as_error_resp()?.as_revert_data()?;
    decode_custom_error(&data)
}

/// Decode the revert data carried by a failed contract call, if any.
pub fn decode_contract_error(err: &ContractError) -> Option<DecodedError> {
    match err {
        ContractError::TransportError(err) => decode_transport_error(err),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use alloy::rpc::json_rpc::ErrorPayload;
    use alloy_primitives::{Bytes, U256};

    use super::*;

    #[test]
    fn ontake_errors_resolve_first() {
        let data = ontake::taiko_l1::ITaikoL1::L1_INVALID_BLOCK_ID {}.abi_encode();
        let decoded = decode_custom_error(&data).unwrap();
        assert_eq!(decoded.fork, Some(Fork::Ontake));
        assert_eq!(decoded.contract, "TaikoL1");
        assert!(decoded.error.contains("L1_INVALID_BLOCK_ID"));
        assert_eq!(decoded.to_string(), format!("TaikoL1 (ontake): {}", decoded.error));
    }

    #[test]
    fn pacaya_only_error() {
        let data = pacaya::inbox::ITaikoInbox::BatchNotFound {}.abi_encode();
        let decoded = decode_custom_error(&data).unwrap();
        assert_eq!(decoded.fork, Some(Fork::Pacaya));
        assert_eq!(decoded.contract, "TaikoInbox");
    }

    #[test]
    fn shared_errors_resolve_to_the_first_fork() {
        // Declared by both the Pacaya and the Shasta inbox.
        let data = shasta::inbox::IInbox::BlobNotFound {}.abi_encode();
        let decoded = decode_custom_error(&data).unwrap();
        assert_eq!(decoded.fork, Some(Fork::Pacaya));

        let data = shasta::inbox::IInbox::DeadlineExceeded {}.abi_encode();
        let decoded = decode_custom_error(&data).unwrap();
        assert_eq!(decoded.fork, Some(Fork::Shasta));
        assert_eq!(decoded.contract, "Inbox");
    }

    #[test]
    fn essential_errors() {
        let data = IEssentialContract::ACCESS_DENIED {}.abi_encode();
        let decoded = decode_custom_error(&data).unwrap();
        assert_eq!(decoded.fork, None);
        assert_eq!(decoded.contract, "EssentialContract");
        assert_eq!(decoded.to_string(), "EssentialContract: ACCESS_DENIED(ACCESS_DENIED)");
    }

    #[test]
    fn standard_reverts() {
        let data = Revert { reason: "not enough bond".to_owned() }.abi_encode();
        let decoded = decode_custom_error(&data).unwrap();
        assert_eq!(decoded.contract, "Error");
        assert_eq!(decoded.error, "Error(\"not enough bond\")");

        let data = Panic { code: U256::from(0x11) }.abi_encode();
        let decoded = decode_custom_error(&data).unwrap();
        assert_eq!(decoded.contract, "Panic");
        assert!(decoded.error.contains("ArithmeticOverflow"), "{decoded}");
    }

    #[test]
    fn unknown_selector() {
        assert!(decode_custom_error(&[0xde, 0xad, 0xbe, 0xef]).is_none());
        assert!(decode_custom_error(&[]).is_none());
    }

    #[test]
    fn transport_errors_carry_revert_data() {
        let data = Bytes::from(pacaya::inbox::ITaikoInbox::TooManyBatches {}.abi_encode());
        let payload: ErrorPayload = serde_json::from_value(serde_json::json!({
            "code": 3,
            "message": "execution reverted",
            "data": data,
        }))
        .unwrap();

        let err = TransportError::ErrorResp(payload);
        let decoded = decode_transport_error(&err).unwrap();
        assert!(decoded.error.contains("TooManyBatches"));

        let err = ContractError::TransportError(err);
        assert_eq!(decode_contract_error(&err), Some(decoded));
        assert!(decode_contract_error(&ContractError::UnknownFunction("x".into())).is_none());
    }
}
