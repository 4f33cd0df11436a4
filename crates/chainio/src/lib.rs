#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Typed bindings for the Taiko rollup contracts of every protocol fork, with a role-split
//! (caller, transactor, filterer) access layer on top of the generated `alloy` instances.

use alloy::{
    contract::Error as ContractError,
    network::EthereumWallet,
    providers::{
        ProviderBuilder, RootProvider, WsConnect,
        fillers::{FillProvider, JoinFill, WalletFiller},
        utils::JoinedRecommendedFillers,
    },
    rpc::client::ClientBuilder,
    signers::local::PrivateKeySigner,
    transports::{TransportError, TransportResult},
};
use alloy_primitives::Bytes;
use alloy_sol_types::SolInterface;
use tkb_primitives::retries::DEFAULT_RETRY_LAYER;
use url::Url;

/// Locating and decoding the anchor transaction of L2 blocks.
pub mod anchor;

/// Role-split access to any contract binding.
pub mod bind;

/// Custom error decoding across every fork's contract interfaces.
pub mod errors;

/// The `EssentialContract` interface shared by every upgradeable Taiko contract.
pub mod essential;

/// Reorg-aware iteration over L1 block ranges and contract events.
pub mod iter;

/// Ontake fork bindings (`TaikoL1`, `TaikoL2` and friends).
pub mod ontake;

/// Pacaya fork bindings (`TaikoInbox`, `TaikoAnchor` and friends).
pub mod pacaya;

/// Shasta fork bindings (`Inbox`, `Anchor`, `BondManager` and friends).
pub mod shasta;

#[cfg(test)]
mod test_utils;

/// Alias to the joined recommended fillers + wallet filler for Ethereum wallets.
pub type JoinedWalletFillers = JoinFill<JoinedRecommendedFillers, WalletFiller<EthereumWallet>>;

/// Alias to the default wallet provider with all recommended fillers (read + write).
pub type DefaultWalletProvider = FillProvider<JoinedWalletFillers, RootProvider>;

/// Alias to the default provider with all recommended fillers (read-only).
pub type DefaultProvider = FillProvider<JoinedRecommendedFillers, RootProvider>;

/// Create a read-only HTTP provider with the default retry layer.
pub fn default_provider<U: Into<Url>>(el_client_url: U) -> DefaultProvider {
    let client = ClientBuilder::default().layer(DEFAULT_RETRY_LAYER).http(el_client_url.into());
    ProviderBuilder::new().connect_client(client)
}

/// Create a read-only WebSocket provider with the default retry layer.
/// Required for log subscriptions.
pub async fn ws_provider<U: Into<Url>>(el_client_ws_url: U) -> TransportResult<DefaultProvider> {
    let ws = WsConnect::new(el_client_ws_url.into());
    let client = ClientBuilder::default().layer(DEFAULT_RETRY_LAYER).pubsub(ws).await?;
    Ok(ProviderBuilder::new().connect_client(client))
}

/// Create an HTTP provider that signs transactions with the given wallet.
pub fn wallet_provider<U: Into<Url>>(
    el_client_url: U,
    wallet: PrivateKeySigner,
) -> DefaultWalletProvider {
    let client = ClientBuilder::default().layer(DEFAULT_RETRY_LAYER).http(el_client_url.into());
    ProviderBuilder::new().wallet(wallet).connect_client(client)
}

/// Try to decode a contract error into a specific Solidity error interface.
/// If the error cannot be decoded or it is not a contract error, return the original error.
///
/// Example usage:
///
/// ```ignore
/// let returndata = match inbox.getStats2().call().await {
///     Ok(returndata) => returndata,
///     Err(err) => {
///         let decoded_error = try_parse_contract_error::<ITaikoInboxErrors>(err)?;
///         return Err(SolError::custom(format!("{:?}", decoded_error)).into());
///     }
/// };
/// ```
///
/// See also [`ContractError::as_decoded_interface_error`] for more details.
pub fn try_parse_contract_error<I: SolInterface>(error: ContractError) -> Result<I, ContractError> {
    error.as_decoded_interface_error::<I>().ok_or(error)
}

/// The result of trying to parse a transport error into a specific interface.
#[derive(Debug)]
pub enum TryParseTransportErrorResult<I: SolInterface> {
    /// The error was successfully decoded into the specified interface.
    Decoded(I),
    /// The error was not decoded but the revert data was extracted.
    UnknownSelector(Bytes),
    /// The error was not decoded and the revert data was not extracted.
    Original(TransportError),
}

/// The same as [`try_parse_contract_error`] but if you already know it is [`TransportError`].
pub fn try_parse_transport_error<I: SolInterface>(
    error: TransportError,
) -> TryParseTransportErrorResult<I> {
    // Performs the same operation as [`ContractError::as_decoded_interface_error`].
    // This unwrapping is needed because otherwise we can't clone the original error.
    let revert_data = error.as_error_resp().and_then(|e| e.as_revert_data());
    let decoded = revert_data.as_ref().and_then(|data| I::abi_decode(data).ok());

    if let Some(decoded) = decoded {
        TryParseTransportErrorResult::Decoded(decoded)
    } else if let Some(revert_data) = revert_data {
        TryParseTransportErrorResult::UnknownSelector(revert_data)
    } else {
        TryParseTransportErrorResult::Original(error)
    }
}

/// Map a failed wrapper call into a contract error carrying the decoded revert, if any.
///
/// The contract's own error interface is tried first, then every known interface.
pub(crate) fn map_contract_error<I: SolInterface + std::fmt::Debug>(
    err: ContractError,
) -> ContractError {
    use alloy_sol_types::Error as SolError;

    match try_parse_contract_error::<I>(err) {
        Ok(decoded) => SolError::custom(format!("{:?}", decoded)).into(),
        Err(err) => match errors::decode_contract_error(&err) {
            Some(decoded) => SolError::custom(decoded.to_string()).into(),
            None => err,
        },
    }
}
