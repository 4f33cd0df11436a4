use std::time::Duration;

use clap::Parser;

/// Options of the block batch iterator used to walk historical events.
#[derive(Debug, Clone, Parser)]
pub struct IteratorOpts {
    /// The maximum number of blocks fetched per batch.
    #[clap(
        long = "iter.blocks-per-epoch",
        env = "TKB_ITER_BLOCKS_PER_EPOCH",
        default_value_t = 1000
    )]
    pub blocks_read_per_epoch: u64,
    /// The number of blocks to stay behind the head when no end height is set.
    #[clap(long = "iter.confirmations", env = "TKB_ITER_CONFIRMATIONS", default_value_t = 0)]
    pub block_confirmations: u64,
    /// How many blocks to rewind when the cursor is re-orged out.
    #[clap(
        long = "iter.reorg-rewind-depth",
        env = "TKB_ITER_REORG_REWIND_DEPTH",
        default_value_t = 0
    )]
    pub reorg_rewind_depth: u64,
    /// The delay between two attempts of a failed batch, in seconds.
    #[clap(long = "iter.retry-interval", env = "TKB_ITER_RETRY_INTERVAL", default_value_t = 12)]
    pub retry_interval_secs: u64,
    /// The number of retries of a failed batch. Unbounded when unset.
    #[clap(long = "iter.max-retries", env = "TKB_ITER_MAX_RETRIES")]
    pub max_retries: Option<usize>,
}

impl IteratorOpts {
    /// Returns the retry interval as a [`Duration`].
    pub const fn retry_interval(&self) -> Duration {
        Duration::from_secs(self.retry_interval_secs)
    }
}
