//! A minimal JSON-RPC node served by `mockito`, for tests.

use alloy::{
    providers::RootProvider,
    rpc::types::{Block, BlockTransactions, Header, Log},
};
use alloy_primitives::{Address, B256, Bytes};
use alloy_sol_types::SolEvent;
use mockito::{Mock, Server, ServerGuard};
use serde_json::{Value, json};

/// Answers every JSON-RPC request with the result (or error object) returned by the handler.
pub(crate) struct MockNode {
    server: ServerGuard,
    _mock: Mock,
}

impl MockNode {
    pub(crate) async fn start<F>(handler: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<Value, Value> + Send + Sync + 'static,
    {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body_from_request(move |req| {
                let body: Value = serde_json::from_slice(req.body().unwrap()).unwrap();
                let method = body["method"].as_str().unwrap_or_default();
                let response = match handler(method, &body["params"]) {
                    Ok(result) => json!({"jsonrpc": "2.0", "id": body["id"], "result": result}),
                    Err(error) => json!({"jsonrpc": "2.0", "id": body["id"], "error": error}),
                };
                serde_json::to_vec(&response).unwrap()
            })
            .create_async()
            .await;

        Self { server, _mock: mock }
    }

    /// A provider without fillers, so that only the requests under test hit the node.
    pub(crate) fn provider(&self) -> RootProvider {
        RootProvider::new_http(self.server.url().parse().unwrap())
    }
}

/// Parse a JSON-RPC hex quantity.
pub(crate) fn quantity(value: &Value) -> u64 {
    let s = value.as_str().unwrap_or("0x0").trim_start_matches("0x");
    u64::from_str_radix(s, 16).unwrap()
}

/// A header at `number` whose hash depends on `salt`, so that forks of the same height differ.
pub(crate) fn header(number: u64, salt: u8) -> Header {
    let inner = alloy::consensus::Header {
        number,
        extra_data: Bytes::from(vec![salt]),
        ..Default::default()
    };
    Header { hash: inner.hash_slow(), inner, total_difficulty: None, size: None }
}

/// The JSON-RPC representation of an empty block with the given header.
pub(crate) fn block_json(header: &Header) -> Value {
    let block: Block = Block {
        header: header.clone(),
        uncles: Vec::new(),
        transactions: BlockTransactions::Hashes(Vec::new()),
        withdrawals: None,
    };
    serde_json::to_value(block).unwrap()
}

/// The JSON-RPC representation of `event` emitted by `address` in the block of `header`.
pub(crate) fn log_json<E: SolEvent>(
    address: Address,
    event: &E,
    header: &Header,
    index: u64,
) -> Value {
    let log = Log {
        inner: alloy_primitives::Log { address, data: event.encode_log_data() },
        block_hash: Some(header.hash),
        block_number: Some(header.number),
        block_timestamp: None,
        transaction_hash: Some(B256::with_last_byte(index as u8)),
        transaction_index: Some(0),
        log_index: Some(index),
        removed: false,
    };
    serde_json::to_value(log).unwrap()
}
