use std::{collections::HashSet, marker::PhantomData, vec};

use alloy::{
    eips::BlockNumberOrTag,
    providers::Provider,
    rpc::types::{Filter, Log},
};
use alloy_primitives::{Address, B256};
use alloy_sol_types::SolEvent;
use futures::{
    Stream, StreamExt, future,
    stream::{self, BoxStream},
};
use tracing::debug;

use super::{FilterOpts, Topics, WatchOpts, error::BindingError};

/// A decoded event together with the raw log it was decoded from.
#[derive(Debug, Clone)]
pub struct DecodedLog<E> {
    /// The decoded event.
    pub event: E,
    /// The raw log, carrying the block, transaction and removal metadata.
    pub log: Log,
}

impl<E: SolEvent> DecodedLog<E> {
    /// Decode `log` as an `E` event. The emitter address is not checked.
    pub fn decode(log: Log) -> Result<Self, BindingError> {
        let decoded = log.log_decode::<E>()?;
        Ok(Self { event: decoded.inner.data, log })
    }
}

impl<E> DecodedLog<E> {
    /// Returns the number of the block the log was emitted in.
    pub const fn block_number(&self) -> Option<u64> {
        self.log.block_number
    }

    /// Returns true if the log was removed by a reorg.
    pub const fn removed(&self) -> bool {
        self.log.removed
    }
}

/// An iterator over fetched logs that decodes each one lazily.
///
/// A log that fails to decode yields an error but does not end the iteration.
#[derive(Debug)]
pub struct LogIterator<E> {
    logs: vec::IntoIter<Log>,
    _event: PhantomData<fn() -> E>,
}

impl<E> LogIterator<E> {
    /// Wrap a list of logs.
    pub fn new(logs: Vec<Log>) -> Self {
        Self { logs: logs.into_iter(), _event: PhantomData }
    }
}

impl<E: SolEvent> Iterator for LogIterator<E> {
    type Item = Result<DecodedLog<E>, BindingError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.logs.next().map(DecodedLog::decode)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.logs.size_hint()
    }
}

impl<E: SolEvent> ExactSizeIterator for LogIterator<E> {}

/// Event access to a contract: historical queries, live subscriptions and log parsing.
#[derive(Debug, Clone)]
pub struct Filterer<P> {
    address: Address,
    provider: P,
}

impl<P: Provider> Filterer<P> {
    /// Create a filterer for the contract at `address`.
    pub const fn new(address: Address, provider: P) -> Self {
        Self { address, provider }
    }

    /// Returns the address of the contract.
    pub const fn address(&self) -> Address {
        self.address
    }

    /// Returns a log [`Filter`] matching `E` events of this contract with the given topics.
    pub fn event_filter<E: SolEvent>(&self, topics: &Topics) -> Filter {
        let mut filter = Filter::new().address(self.address).event_signature(E::SIGNATURE_HASH);
        if !topics.topic1.is_empty() {
            filter = filter.topic1(topics.topic1.clone());
        }
        if !topics.topic2.is_empty() {
            filter = filter.topic2(topics.topic2.clone());
        }
        if !topics.topic3.is_empty() {
            filter = filter.topic3(topics.topic3.clone());
        }
        filter
    }

    /// Fetch the `E` events emitted in the `[opts.start, opts.end]` range.
    pub async fn filter<E: SolEvent>(
        &self,
        opts: &FilterOpts,
        topics: &Topics,
    ) -> Result<LogIterator<E>, BindingError> {
        let to_block = opts.end.map_or(BlockNumberOrTag::Latest, BlockNumberOrTag::Number);
        let filter = self.event_filter::<E>(topics).from_block(opts.start).to_block(to_block);

        let logs = self.provider.get_logs(&filter).await?;
        debug!(
            event = E::SIGNATURE,
            from = opts.start,
            to = ?opts.end,
            count = logs.len(),
            "Fetched logs"
        );

        Ok(LogIterator::new(logs))
    }

    /// Subscribe to `E` events over `eth_subscribe("logs")`.
    ///
    /// Requires a pubsub (WebSocket or IPC) provider. Logs removed by a reorg are forwarded
    /// with `removed == true`.
    ///
    /// When `opts.start` is set, the events emitted since that block are fetched with
    /// `eth_getLogs` and yielded before the live ones.
    pub async fn watch<E: SolEvent + Send + 'static>(
        &self,
        opts: &WatchOpts,
        topics: &Topics,
    ) -> Result<BoxStream<'static, Result<DecodedLog<E>, BindingError>>, BindingError> {
        let filter = self.event_filter::<E>(topics);

        // Subscribe before the replay, so that no event falls between the two.
        let sub = self.provider.subscribe_logs(&filter).await?;
        debug!(event = E::SIGNATURE, address = %self.address, "Subscribed to logs");

        let replayed = match opts.start {
            Some(start) => {
                let filter = filter.from_block(start).to_block(BlockNumberOrTag::Latest);
                self.provider.get_logs(&filter).await?
            }
            None => Vec::new(),
        };
        debug!(event = E::SIGNATURE, start = ?opts.start, count = replayed.len(), "Replaying logs");

        Ok(replay_then_follow(replayed, sub.into_stream()).map(DecodedLog::decode).boxed())
    }

    /// Decode a single log as an `E` event emitted by this contract.
    pub fn parse<E: SolEvent>(&self, log: &Log) -> Result<DecodedLog<E>, BindingError> {
        if log.address() != self.address {
            return Err(BindingError::AddressMismatch {
                expected: self.address,
                actual: log.address(),
            });
        }

        let topic0 = log.topic0().copied();
        if topic0 != Some(E::SIGNATURE_HASH) {
            return Err(BindingError::EventSignatureMismatch {
                event: E::SIGNATURE,
                expected: E::SIGNATURE_HASH,
                actual: topic0,
            });
        }

        DecodedLog::decode(log.clone())
    }
}

/// Yield the `replayed` logs, then the `live` ones that were not replayed already.
///
/// Removals are always forwarded.
fn replay_then_follow<S>(replayed: Vec<Log>, live: S) -> impl Stream<Item = Log> + Send + 'static
where
    S: Stream<Item = Log> + Send + 'static,
{
    let seen: HashSet<_> = replayed.iter().map(log_position).collect();
    let live = live.filter(move |log| {
        let duplicate = !log.removed && seen.contains(&log_position(log));
        future::ready(!duplicate)
    });

    stream::iter(replayed).chain(live)
}

fn log_position(log: &Log) -> (Option<B256>, Option<u64>) {
    (log.block_hash, log.log_index)
}

#[cfg(test)]
mod tests {
    use alloy::{providers::ProviderBuilder, sol};
    use alloy_primitives::{B256, LogData, U256};

    use super::*;

    sol! {
        #[derive(Debug, PartialEq)]
        event Deposited(address indexed user, uint256 amount);

        #[derive(Debug, PartialEq)]
        event Withdrawn(address indexed user, uint256 amount);
    }

    fn filterer(address: Address) -> Filterer<impl Provider> {
        let provider = ProviderBuilder::new().connect_http("http://localhost:1".parse().unwrap());
        Filterer::new(address, provider)
    }

    fn rpc_log(address: Address, data: LogData) -> Log {
        Log {
            inner: alloy_primitives::Log { address, data },
            block_number: Some(10),
            ..Default::default()
        }
    }

    #[test]
    fn parse_decodes_matching_logs() {
        let contract = Address::repeat_byte(0x01);
        let event = Deposited { user: Address::repeat_byte(0x02), amount: U256::from(42) };
        let log = rpc_log(contract, event.encode_log_data());

        let decoded = filterer(contract).parse::<Deposited>(&log).unwrap();
        assert_eq!(decoded.event, event);
        assert_eq!(decoded.block_number(), Some(10));
        assert!(!decoded.removed());
    }

    #[test]
    fn parse_rejects_foreign_logs() {
        let contract = Address::repeat_byte(0x01);
        let event = Deposited { user: Address::repeat_byte(0x02), amount: U256::from(42) };
        let log = rpc_log(Address::repeat_byte(0x03), event.encode_log_data());

        let err = filterer(contract).parse::<Deposited>(&log).unwrap_err();
        assert!(matches!(
            err,
            BindingError::AddressMismatch { actual, .. } if actual == Address::repeat_byte(0x03)
        ));
    }

    #[test]
    fn parse_rejects_other_events() {
        let contract = Address::repeat_byte(0x01);
        let event = Withdrawn { user: Address::repeat_byte(0x02), amount: U256::from(1) };
        let log = rpc_log(contract, event.encode_log_data());

        let err = filterer(contract).parse::<Deposited>(&log).unwrap_err();
        match err {
            BindingError::EventSignatureMismatch { expected, actual, .. } => {
                assert_eq!(expected, Deposited::SIGNATURE_HASH);
                assert_eq!(actual, Some(Withdrawn::SIGNATURE_HASH));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn log_iterator_keeps_going_after_decode_errors() {
        let contract = Address::repeat_byte(0x01);
        let good = Deposited { user: Address::repeat_byte(0x02), amount: U256::from(7) };
        // right selector, truncated data
        let bad = LogData::new_unchecked(
            vec![Deposited::SIGNATURE_HASH, B256::ZERO],
            vec![0u8; 3].into(),
        );

        let logs = vec![
            rpc_log(contract, bad),
            rpc_log(contract, good.encode_log_data()),
        ];
        let mut iter = LogIterator::<Deposited>::new(logs);
        assert_eq!(iter.len(), 2);
        assert!(iter.next().unwrap().is_err());
        assert_eq!(iter.next().unwrap().unwrap().event, good);
        assert!(iter.next().is_none());
    }

    fn positioned(block: u8, index: u64, removed: bool) -> Log {
        let event = Deposited { user: Address::repeat_byte(0x02), amount: U256::from(index) };
        Log {
            block_hash: Some(B256::repeat_byte(block)),
            log_index: Some(index),
            removed,
            ..rpc_log(Address::repeat_byte(0x01), event.encode_log_data())
        }
    }

    #[tokio::test]
    async fn replayed_logs_come_first_and_once() {
        let replayed = vec![positioned(1, 0, false), positioned(2, 1, false)];
        let live = stream::iter(vec![
            positioned(2, 1, false),
            positioned(2, 1, true),
            positioned(3, 2, false),
        ]);

        let logs: Vec<_> = replay_then_follow(replayed, live).collect().await;
        let positions: Vec<_> =
            logs.iter().map(|log| (log_position(log), log.removed)).collect();
        assert_eq!(
            positions,
            [
                ((Some(B256::repeat_byte(1)), Some(0)), false),
                ((Some(B256::repeat_byte(2)), Some(1)), false),
                ((Some(B256::repeat_byte(2)), Some(1)), true),
                ((Some(B256::repeat_byte(3)), Some(2)), false),
            ]
        );
    }

    #[tokio::test]
    async fn watch_needs_a_pubsub_provider() {
        let err = filterer(Address::repeat_byte(0x01))
            .watch::<Deposited>(&WatchOpts::default(), &Topics::any())
            .await
            .err()
            .expect("http cannot subscribe");
        assert!(matches!(err, BindingError::Transport(_)), "{err}");
    }

    /// This test is ignored because it requires a live node with a WebSocket endpoint.
    #[ignore]
    #[tokio::test]
    async fn watch_live_node() {
        let provider = crate::ws_provider(url::Url::parse("ws://localhost:8546").unwrap())
            .await
            .unwrap();
        let filterer = Filterer::new(Address::repeat_byte(0x01), provider);

        let opts = WatchOpts { start: Some(0) };
        let mut logs = filterer.watch::<Deposited>(&opts, &Topics::any()).await.unwrap();
        if let Some(log) = logs.next().await {
            println!("log: {:?}", log.unwrap());
        }
    }

    #[test]
    fn event_filter_sets_selector_and_topics() {
        let contract = Address::repeat_byte(0x01);
        let user = Address::repeat_byte(0x02);
        let filter = filterer(contract)
            .event_filter::<Deposited>(&Topics::any().with_topic1([user.into_word()]));

        assert!(filter.address.matches(&contract));
        assert!(filter.topics[0].matches(&Deposited::SIGNATURE_HASH));
        assert!(filter.topics[1].matches(&user.into_word()));
        assert!(!filter.topics[1].matches(&B256::ZERO));
        assert!(filter.topics[2].is_empty());
    }
}
