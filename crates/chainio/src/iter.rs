use std::{future::Future, marker::PhantomData, ops::ControlFlow, time::Duration};

use alloy::{
    eips::BlockNumberOrTag,
    providers::Provider,
    rpc::types::Header,
    transports::TransportError,
};
use alloy_primitives::B256;
use alloy_sol_types::SolEvent;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, warn};

use crate::bind::{Binding, BindingError, DecodedLog, FilterOpts, Filterer, Topics};

/// The default number of blocks walked per batch.
pub const DEFAULT_BLOCKS_READ_PER_EPOCH: u64 = 1000;

/// The default delay between two attempts of a failed batch.
pub const DEFAULT_RETRY_INTERVAL: Duration = Duration::from_secs(12);

/// Errors returned by the block and event iterators.
#[derive(Debug, thiserror::Error)]
pub enum IteratorError {
    /// The configured end height is lower than the start height.
    #[error("end height {end} is lower than start height {start}")]
    InvalidRange {
        /// The configured start height.
        start: u64,
        /// The configured end height.
        end: u64,
    },
    /// The node does not know the requested block.
    #[error("block {0} not found")]
    BlockNotFound(BlockNumberOrTag),
    /// A log carries no block hash, so the cursor cannot be moved to it.
    #[error("log has no block hash")]
    MissingBlockHash,
    /// Two consecutive events of a batch do not have consecutive ids.
    #[error("events are not continuous: expected id {expected}, got {actual}")]
    NonConsecutive {
        /// The id following the last handled event.
        expected: u64,
        /// The id of the event that was found instead.
        actual: u64,
    },
    /// The RPC request failed.
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// Fetching or decoding logs failed.
    #[error(transparent)]
    Binding(#[from] BindingError),
    /// The batch or event handler failed.
    #[error("handler failed: {0}")]
    Handler(String),
}

impl IteratorError {
    /// Returns false for errors that a retry of the same batch would hit again, like logs
    /// that do not decode.
    pub const fn is_retryable(&self) -> bool {
        !matches!(
            self,
            Self::InvalidRange { .. }
                | Self::Binding(
                    BindingError::Decode(_)
                        | BindingError::Codec(_)
                        | BindingError::AddressMismatch { .. }
                        | BindingError::EventSignatureMismatch { .. }
                )
        )
    }
}

/// Configuration of a [`BlockBatchIterator`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IteratorConfig {
    /// The first block of the walk.
    pub start_height: u64,
    /// The last block of the walk. When unset, the walk follows the head minus
    /// `block_confirmations`.
    pub end_height: Option<u64>,
    /// The maximum number of blocks per batch.
    pub blocks_read_per_epoch: u64,
    /// The number of blocks to stay behind the head when `end_height` is unset.
    pub block_confirmations: u64,
    /// How far back the cursor goes when it is no longer canonical.
    pub reorg_rewind_depth: u64,
    /// The delay between two attempts of a failed batch.
    pub retry_interval: Duration,
    /// The number of retries of a failed batch. Unbounded when unset.
    pub max_retries: Option<usize>,
}

impl IteratorConfig {
    /// A configuration starting at `start_height`, with default values for everything else.
    pub const fn new(start_height: u64) -> Self {
        Self {
            start_height,
            end_height: None,
            blocks_read_per_epoch: DEFAULT_BLOCKS_READ_PER_EPOCH,
            block_confirmations: 0,
            reorg_rewind_depth: 0,
            retry_interval: DEFAULT_RETRY_INTERVAL,
            max_retries: None,
        }
    }

    /// Sets the last block of the walk.
    pub const fn with_end_height(mut self, end_height: u64) -> Self {
        self.end_height = Some(end_height);
        self
    }
}

/// Lets a batch handler move the cursor or stop the walk.
#[derive(Debug, Default)]
pub struct BatchControl {
    current: Option<Header>,
    ended: bool,
}

impl BatchControl {
    /// Moves the cursor to `header`. A retry of a failed batch resumes from there.
    pub fn update_current(&mut self, header: Header) {
        self.current = Some(header);
    }

    /// Stops the walk after the current batch.
    pub const fn end(&mut self) {
        self.ended = true;
    }

    /// Returns true if the handler ended the walk.
    pub const fn is_ended(&self) -> bool {
        self.ended
    }
}

/// Receives the block ranges walked by a [`BlockBatchIterator`].
pub trait BatchHandler<P>: Send {
    /// Handle the blocks in `[start, end]`.
    fn on_blocks(
        &mut self,
        provider: &P,
        start: &Header,
        end: &Header,
        control: &mut BatchControl,
    ) -> impl Future<Output = Result<(), IteratorError>> + Send;
}

enum Step {
    Continue,
    Done,
}

/// Walks a block range in batches, rewinding when the cursor is re-orged out.
#[derive(Debug)]
pub struct BlockBatchIterator<P> {
    provider: P,
    config: IteratorConfig,
    current: Header,
}

impl<P: Provider + Clone> BlockBatchIterator<P> {
    /// Create an iterator positioned at the configured start height.
    pub async fn new(provider: P, config: IteratorConfig) -> Result<Self, IteratorError> {
        if let Some(end) = config.end_height {
            if end < config.start_height {
                return Err(IteratorError::InvalidRange { start: config.start_height, end });
            }
        }

        let current = header_by_number(&provider, config.start_height).await?;
        Ok(Self { provider, config, current })
    }

    /// Returns the header the next batch starts from.
    pub const fn current(&self) -> &Header {
        &self.current
    }

    /// Returns the configuration of the iterator.
    pub const fn config(&self) -> &IteratorConfig {
        &self.config
    }

    /// Walk the range, handing each batch to `handler`, until the destination is reached or
    /// the handler ends the walk.
    ///
    /// A failed batch is retried after `retry_interval`, up to `max_retries` times, unless
    /// its error is not [retryable](IteratorError::is_retryable).
    pub async fn iter<H: BatchHandler<P>>(&mut self, handler: &mut H) -> Result<(), IteratorError> {
        loop {
            match self.step_with_retries(handler).await? {
                Step::Continue => continue,
                Step::Done => return Ok(()),
            }
        }
    }

    async fn step_with_retries<H: BatchHandler<P>>(
        &mut self,
        handler: &mut H,
    ) -> Result<Step, IteratorError> {
        let mut delays = FixedInterval::new(self.config.retry_interval)
            .take(self.config.max_retries.unwrap_or(usize::MAX));

        loop {
            match self.step(handler).await {
                Ok(step) => return Ok(step),
                Err(err) if !err.is_retryable() => return Err(err),
                Err(err) => match delays.next() {
                    Some(delay) => {
                        warn!(%err, current = self.current.number, ?delay, "Block batch failed, retrying");
                        tokio::time::sleep(delay).await;
                    }
                    None => return Err(err),
                },
            }
        }
    }

    async fn step<H: BatchHandler<P>>(&mut self, handler: &mut H) -> Result<Step, IteratorError> {
        self.ensure_current_not_reorged().await?;

        let destination = match self.config.end_height {
            Some(end) => end,
            None => {
                let head = self.provider.get_block_number().await?;
                head.saturating_sub(self.config.block_confirmations)
            }
        };

        let current = self.current.number;
        if current >= destination {
            return Ok(Step::Done);
        }

        let end_height = current.saturating_add(self.config.blocks_read_per_epoch.max(1));
        let is_last_epoch = end_height >= destination;
        let end_header = header_by_number(&self.provider, end_height.min(destination)).await?;

        let mut control = BatchControl::default();
        let result =
            handler.on_blocks(&self.provider, &self.current, &end_header, &mut control).await;

        if let Some(header) = control.current.take() {
            self.current = header;
        }
        result?;

        if control.ended {
            debug!(current = self.current.number, "Block batch iteration ended by handler");
            return Ok(Step::Done);
        }

        self.current = end_header;
        if is_last_epoch { Ok(Step::Done) } else { Ok(Step::Continue) }
    }

    async fn ensure_current_not_reorged(&mut self) -> Result<(), IteratorError> {
        if self.provider.get_block_by_hash(self.current.hash).await?.is_some() {
            return Ok(());
        }

        let head = self.provider.get_block_number().await?;
        let rewind_to =
            self.current.number.saturating_sub(self.config.reorg_rewind_depth).min(head);

        warn!(
            current = self.current.number,
            hash = %self.current.hash,
            rewind_to,
            "Iterator cursor re-orged out, rewinding"
        );
        self.current = header_by_number(&self.provider, rewind_to).await?;

        Ok(())
    }
}

async fn header_by_number<P: Provider>(provider: &P, number: u64) -> Result<Header, IteratorError> {
    let tag = BlockNumberOrTag::Number(number);
    let block = provider.get_block_by_number(tag).await?;
    block.map(|block| block.header).ok_or(IteratorError::BlockNotFound(tag))
}

async fn header_by_hash<P: Provider>(provider: &P, hash: B256) -> Result<Header, IteratorError> {
    let block = provider.get_block_by_hash(hash).await?;
    block.map(|block| block.header).ok_or(IteratorError::MissingBlockHash)
}

/// An event that can be walked by an [`EventIterator`].
pub trait IterableEvent: SolEvent + Send + Sync + 'static {
    /// The sequence id of the event, for events that must be consecutive within a batch.
    fn sequence_id(&self) -> Option<u64> {
        None
    }
}

/// Check that the sequenced events of a fetched range have consecutive ids.
///
/// Events without a sequence id are skipped.
pub fn ensure_consecutive<E: IterableEvent>(events: &[DecodedLog<E>]) -> Result<(), IteratorError> {
    let mut ids = events.iter().filter_map(|log| log.event.sequence_id());
    let Some(mut last) = ids.next() else { return Ok(()) };

    for id in ids {
        if id != last + 1 {
            return Err(IteratorError::NonConsecutive { expected: last + 1, actual: id });
        }
        last = id;
    }

    Ok(())
}

/// Receives the events walked by an [`EventIterator`].
pub trait EventHandler<E>: Send {
    /// Handle one event. Returning [`ControlFlow::Break`] ends the walk.
    fn on_event(
        &mut self,
        event: DecodedLog<E>,
    ) -> impl Future<Output = Result<ControlFlow<()>, IteratorError>> + Send;
}

/// Walks the `E` events of one contract over a block range.
///
/// The cursor follows the block of the last handled event, so that a failed batch resumes
/// right after it.
#[derive(Debug)]
pub struct EventIterator<P, E> {
    blocks: BlockBatchIterator<P>,
    filterer: Filterer<P>,
    topics: Topics,
    _event: PhantomData<fn() -> E>,
}

impl<P: Provider + Clone, E: IterableEvent> EventIterator<P, E> {
    /// Create an iterator over the `E` events emitted by `binding`.
    pub async fn new<B>(binding: &B, config: IteratorConfig) -> Result<Self, IteratorError>
    where
        B: Binding<Provider = P>,
    {
        let blocks = BlockBatchIterator::new(binding.provider().clone(), config).await?;
        Ok(Self {
            blocks,
            filterer: binding.filterer(),
            topics: Topics::any(),
            _event: PhantomData,
        })
    }

    /// Only walk events matching `topics`.
    pub fn with_topics(mut self, topics: Topics) -> Self {
        self.topics = topics;
        self
    }

    /// Returns the header the next batch starts from.
    pub const fn current(&self) -> &Header {
        self.blocks.current()
    }

    /// Walk the events, handing each one to `handler`.
    pub async fn iter<H: EventHandler<E>>(&mut self, handler: &mut H) -> Result<(), IteratorError> {
        let mut batch = EventBatch {
            filterer: &self.filterer,
            topics: &self.topics,
            handler,
            _event: PhantomData,
        };
        self.blocks.iter(&mut batch).await
    }
}

struct EventBatch<'a, P, E, H> {
    filterer: &'a Filterer<P>,
    topics: &'a Topics,
    handler: &'a mut H,
    _event: PhantomData<fn() -> E>,
}

impl<P, E, H> BatchHandler<P> for EventBatch<'_, P, E, H>
where
    P: Provider + Clone,
    E: IterableEvent,
    H: EventHandler<E>,
{
    async fn on_blocks(
        &mut self,
        provider: &P,
        start: &Header,
        end: &Header,
        control: &mut BatchControl,
    ) -> Result<(), IteratorError> {
        let opts = FilterOpts::range(start.number, end.number);
        let logs = self.filterer.filter::<E>(&opts, self.topics).await?;

        let mut last_id = None;
        for log in logs {
            let log = log?;

            let id = log.event.sequence_id();
            if let (Some(last), Some(id)) = (last_id, id) {
                if id != last + 1 {
                    warn!(
                        event = E::SIGNATURE,
                        from = start.number,
                        to = end.number,
                        last,
                        id,
                        "Events are not continuous, rescanning"
                    );
                    return Err(IteratorError::NonConsecutive { expected: last + 1, actual: id });
                }
            }

            let block_hash = log.log.block_hash.ok_or(IteratorError::MissingBlockHash)?;
            if self.handler.on_event(log).await?.is_break() {
                debug!(event = E::SIGNATURE, from = start.number, to = end.number, "Event iteration ended");
                control.end();
                return Ok(());
            }

            control.update_current(header_by_hash(provider, block_hash).await?);
            last_id = id.or(last_id);
        }

        Ok(())
    }
}
