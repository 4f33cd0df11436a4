use alloy::{
    providers::{Provider, ProviderBuilder},
    rpc::{
        client::{ClientBuilder, RpcClient},
        types::{Block, BlockNumberOrTag, Header, SyncStatus},
    },
    transports::{TransportErrorKind, TransportResult},
};
use alloy_primitives::{B256, Bytes, U64, hex};
use alloy_rpc_types_trace::geth::{
    CallConfig, CallFrame, GethDebugBuiltInTracerType, GethDebugTracerType, GethDebugTracingOptions,
};
use derive_more::derive::{Deref, DerefMut};
use tkb_chainio::{DefaultProvider, errors::decode_custom_error};
use tkb_primitives::retries::DEFAULT_RETRY_LAYER;
use tracing::debug;
use url::Url;

/// An HTTP-based JSON-RPC execution client.
///
/// This struct is a wrapper over an inner [`DefaultProvider`] and extends it with the
/// methods the bindings tooling needs.
#[derive(Clone, Debug, Deref, DerefMut)]
pub struct ExecutionClient {
    /// The raw RPC client, for methods the provider does not expose.
    rpc: RpcClient,
    /// The inner provider that implements all the JSON-RPC methods, that can be
    /// easily used via dereferencing this struct.
    #[deref]
    #[deref_mut]
    inner: DefaultProvider,
}

impl ExecutionClient {
    /// Create a new [`ExecutionClient`] with the given HTTP URL.
    pub fn new<U: Into<Url>>(http_url: U) -> Self {
        let rpc = ClientBuilder::default().layer(DEFAULT_RETRY_LAYER).http(http_url.into());
        let inner = ProviderBuilder::new().connect_client(rpc.clone());

        Self { rpc, inner }
    }

    /// Get the latest block number
    pub async fn get_head(&self) -> TransportResult<u64> {
        let result: U64 = self.rpc.request("eth_blockNumber", ()).await?;

        Ok(result.to())
    }

    /// Get the block with the given number. If `None`, the latest block is returned.
    pub async fn get_block(&self, block_number: Option<u64>, full: bool) -> TransportResult<Block> {
        let tag = block_number.map_or(BlockNumberOrTag::Latest, BlockNumberOrTag::Number);

        let block: Option<Block> = self.rpc.request("eth_getBlockByNumber", (tag, full)).await?;
        block.ok_or_else(|| TransportErrorKind::custom_str(&format!("Block not found: {tag}")))
    }

    /// Get the header of the block with the given number. If `None`, the latest block is returned.
    pub async fn get_header(&self, block_number: Option<u64>) -> TransportResult<Header> {
        let tag = block_number.map_or(BlockNumberOrTag::Latest, BlockNumberOrTag::Number);

        let block: Option<Block> = self.rpc.request("eth_getBlockByNumber", (tag, false)).await?;
        block
            .map(|block| block.header)
            .ok_or_else(|| TransportErrorKind::custom_str(&format!("Header not found: {tag}")))
    }

    /// Check if the client is synced. Returns `true` if the client is synced.
    pub async fn is_synced(&self) -> TransportResult<bool> {
        let status = self.syncing().await?;
        Ok(matches!(status, SyncStatus::None))
    }

    /// Runs a simple `debug_traceTransaction` RPC call to establish the revert reason of a
    /// transaction, if any.
    ///
    /// NOTE: assumes a client compatible with the `debug_traceTransaction` RPC call
    pub async fn debug_revert_reason(&self, tx_hash: B256) -> TransportResult<RevertReasonTrace> {
        let opts = GethDebugTracingOptions::default()
            .with_tracer(GethDebugTracerType::BuiltInTracer(GethDebugBuiltInTracerType::CallTracer))
            .with_config(CallConfig::default().only_top_call());

        debug!(%tx_hash, "Tracing transaction for its revert reason");
        let trace: CallFrame = self.rpc.request("debug_traceTransaction", (tx_hash, opts)).await?;

        // Prefer the tracer's revert reason, then the raw output.
        match trace.revert_reason {
            Some(reason) => Ok(RevertReasonTrace::String(reason)),
            None => match trace.output {
                Some(output) if trace.error.is_some() => {
                    Ok(RevertReasonTrace::ContractBytes(output))
                }
                _ => Ok(RevertReasonTrace::Unknown),
            },
        }
    }
}

/// The result of a `debug_traceTransaction` output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevertReasonTrace {
    /// The revert reason is a string.
    String(String),
    /// The output is a bytes object.
    ContractBytes(Bytes),
    /// The reason is unknown
    Unknown,
}

impl RevertReasonTrace {
    /// Decode the revert reason against every known contract error interface.
    ///
    /// Undecodable revert data is rendered as hex.
    pub fn decode(&self) -> String {
        match self {
            Self::String(reason) => reason.clone(),
            Self::ContractBytes(bytes) => match decode_custom_error(bytes) {
                Some(decoded) => decoded.to_string(),
                None => format!("unknown revert data: {}", hex::encode_prefixed(bytes)),
            },
            Self::Unknown => "unknown".to_owned(),
        }
    }
}
