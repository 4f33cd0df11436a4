use alloy::rpc::types::Log;

/// A trait for objects that can be summarized into a string for logging purposes.
///
/// Sometimes the Debug impl is too verbose, and the Display impl does something different
/// than what we want. This trait allows us to have our custom verbosity.
pub trait Summary {
    /// Returns a summary of the object.
    fn summary(&self) -> String;
}

impl Summary for Log {
    fn summary(&self) -> String {
        format!(
            "block={}, tx={}, log_index={}, address={}, topic0={}, removed={}",
            self.block_number.unwrap_or_default(),
            self.transaction_hash.unwrap_or_default(),
            self.log_index.unwrap_or_default(),
            self.address(),
            self.topic0().copied().unwrap_or_default(),
            self.removed,
        )
    }
}
