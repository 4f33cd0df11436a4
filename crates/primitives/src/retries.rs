use alloy::transports::layers::RetryBackoffLayer;

/// The default retry layer used by every RPC client in the workspace.
///
/// - at most 10 retries on rate-limit responses;
/// - 300ms initial backoff;
/// - 330 compute units per second, the default budget of most hosted providers.
pub const DEFAULT_RETRY_LAYER: RetryBackoffLayer = RetryBackoffLayer::new(10, 300, 330);
