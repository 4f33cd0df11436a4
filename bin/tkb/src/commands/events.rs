use alloy::{providers::Provider, rpc::types::Header};
use alloy_primitives::B256;
use tkb_chainio::{
    bind::{FilterOpts, Filterer, Topics},
    default_provider,
    iter::{
        BatchControl, BatchHandler, BlockBatchIterator, IterableEvent, IteratorConfig,
        IteratorError, ensure_consecutive,
    },
    ontake::taiko_l1::ITaikoL1::{BlockProposedV2, BlockVerifiedV2, TransitionProvedV2},
    pacaya::inbox::ITaikoInbox::{BatchProposed, BatchesProved, BatchesVerified},
    shasta::inbox::IInbox::{Proposed, Proved},
};
use tkb_config::{EventsOpts, IteratorOpts};
use tkb_primitives::{Fork, summary::Summary};
use tracing::{info, warn};

use super::{PrintedEvent, event_name, inbox_filterer};
use crate::metrics::EventMetrics;

/// Print the proposal, proof and verification events of a fork in a block range.
pub(crate) async fn run(opts: EventsOpts) -> eyre::Result<()> {
    let address = opts.contracts.inbox(opts.fork)?;
    let provider = default_provider(opts.l1.el_url.clone());

    let config = iterator_config(opts.from, opts.to, &opts.iterator);
    let mut iterator = BlockBatchIterator::new(provider.clone(), config).await?;

    let mut printer = EventPrinter {
        filterer: inbox_filterer(opts.fork, address, provider),
        fork: opts.fork,
        as_json: opts.json,
        last_scanned: None,
        printed: 0,
    };
    iterator.iter(&mut printer).await?;

    let last_block = printer.last_scanned.map(|(number, _)| number);
    info!(fork = %opts.fork, count = printer.printed, ?last_block, "Printed events");
    Ok(())
}

fn iterator_config(from: u64, to: Option<u64>, opts: &IteratorOpts) -> IteratorConfig {
    let mut config = IteratorConfig::new(from);
    config.blocks_read_per_epoch = opts.blocks_read_per_epoch;
    config.block_confirmations = opts.block_confirmations;
    config.reorg_rewind_depth = opts.reorg_rewind_depth;
    config.retry_interval = opts.retry_interval();
    config.max_retries = opts.max_retries;

    match to {
        Some(to) => config.with_end_height(to),
        None => config,
    }
}

/// Fetches the events of every walked batch and prints them in log order.
struct EventPrinter<P> {
    filterer: Filterer<P>,
    fork: Fork,
    as_json: bool,
    /// The number and hash of the last block scanned.
    last_scanned: Option<(u64, B256)>,
    printed: usize,
}

impl<P: Provider + Clone> EventPrinter<P> {
    async fn fetch_range(&self, opts: &FilterOpts) -> Result<Vec<PrintedEvent>, IteratorError> {
        let mut events = match self.fork {
            Fork::Ontake => {
                let mut events = self.fetch::<BlockProposedV2>(opts).await?;
                events.extend(self.fetch::<TransitionProvedV2>(opts).await?);
                events.extend(self.fetch::<BlockVerifiedV2>(opts).await?);
                events
            }
            Fork::Pacaya => {
                let mut events = self.fetch::<BatchProposed>(opts).await?;
                events.extend(self.fetch::<BatchesProved>(opts).await?);
                events.extend(self.fetch::<BatchesVerified>(opts).await?);
                events
            }
            Fork::Shasta => {
                let mut events = self.fetch::<Proposed>(opts).await?;
                events.extend(self.fetch::<Proved>(opts).await?);
                events
            }
        };

        events.sort_by_key(|event| (event.log.block_number, event.log.log_index));
        Ok(events)
    }

    /// Fetch the `E` events of the range. Sequenced events must be consecutive, and a log that
    /// does not decode fails the whole range.
    async fn fetch<E: IterableEvent + Summary>(
        &self,
        opts: &FilterOpts,
    ) -> Result<Vec<PrintedEvent>, IteratorError> {
        let mut decoded = Vec::new();
        for log in self.filterer.filter::<E>(opts, &Topics::any()).await? {
            match log {
                Ok(log) => decoded.push(log),
                Err(err) => {
                    EventMetrics::increment_decode_errors(self.fork);
                    return Err(err.into());
                }
            }
        }

        ensure_consecutive(&decoded)?;

        Ok(decoded
            .into_iter()
            .map(|decoded| PrintedEvent {
                name: event_name::<E>(),
                summary: decoded.event.summary(),
                log: decoded.log,
            })
            .collect())
    }
}

impl<P> EventPrinter<P> {
    /// The first block of a batch starting at `start` that still needs scanning.
    ///
    /// Consecutive batches share their boundary block, which is only scanned once. Any other
    /// start means the walk was rewound by a reorg, and the whole batch is scanned again.
    fn scan_from(&self, start: &Header) -> u64 {
        match self.last_scanned {
            Some((number, hash)) if number == start.number && hash == start.hash => number + 1,
            Some((number, _)) => {
                warn!(
                    fork = %self.fork,
                    last_scanned = number,
                    from = start.number,
                    "Rescanning rewound blocks"
                );
                start.number
            }
            None => start.number,
        }
    }
}

impl<P: Provider + Clone> BatchHandler<P> for EventPrinter<P> {
    async fn on_blocks(
        &mut self,
        _provider: &P,
        start: &Header,
        end: &Header,
        _control: &mut BatchControl,
    ) -> Result<(), IteratorError> {
        let from = self.scan_from(start);
        if from > end.number {
            return Ok(());
        }

        let events = self.fetch_range(&FilterOpts::range(from, end.number)).await?;
        for event in &events {
            println!("{}", event.render(self.fork, self.as_json));
            EventMetrics::increment_events(self.fork, event.name);
        }

        self.printed += events.len();
        self.last_scanned = Some((end.number, end.hash));
        EventMetrics::set_last_scanned_block(self.fork, end.number);

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::{Arc, Mutex},
        time::Duration,
    };

    use alloy::providers::RootProvider;
    use alloy_primitives::{Address, Bytes};
    use alloy_sol_types::SolEvent;
    use mockito::{Mock, Server, ServerGuard};
    use serde_json::{Value, json};
    use tkb_chainio::bind::BindingError;

    use super::*;

    const INBOX: Address = Address::repeat_byte(0x10);

    type Ranges = Arc<Mutex<Vec<(String, String)>>>;

    fn header(number: u64, salt: u8) -> Header {
        let inner = alloy::consensus::Header {
            number,
            extra_data: Bytes::from(vec![salt]),
            ..Default::default()
        };
        Header { hash: inner.hash_slow(), inner, total_difficulty: None, size: None }
    }

    /// A node answering every `eth_getLogs` with `logs` and recording the requested ranges.
    async fn logs_node(logs: Value) -> (ServerGuard, Mock, Ranges) {
        let ranges = Ranges::default();
        let recorded = ranges.clone();

        let mut server = Server::new_async().await;
        let mock = server
            .mock("POST", "/")
            .with_header("content-type", "application/json")
            .with_body_from_request(move |req| {
                let body: Value = serde_json::from_slice(req.body().unwrap()).unwrap();
                assert_eq!(body["method"], "eth_getLogs");

                let filter = &body["params"][0];
                recorded.lock().unwrap().push((
                    filter["fromBlock"].as_str().unwrap().to_owned(),
                    filter["toBlock"].as_str().unwrap().to_owned(),
                ));

                let response = json!({"jsonrpc": "2.0", "id": body["id"], "result": logs.clone()});
                serde_json::to_vec(&response).unwrap()
            })
            .create_async()
            .await;

        (server, mock, ranges)
    }

    fn provider(server: &ServerGuard) -> RootProvider {
        RootProvider::new_http(server.url().parse().unwrap())
    }

    fn printer(server: &ServerGuard) -> EventPrinter<RootProvider> {
        EventPrinter {
            filterer: inbox_filterer(Fork::Shasta, INBOX, provider(server)),
            fork: Fork::Shasta,
            as_json: false,
            last_scanned: None,
            printed: 0,
        }
    }

    #[tokio::test]
    async fn rewound_blocks_are_scanned_again() {
        let (server, _mock, ranges) = logs_node(json!([])).await;
        let provider = provider(&server);
        let mut printer = printer(&server);
        let mut control = BatchControl::default();

        let batches = [
            (header(0, 0), header(10, 0)),
            (header(10, 0), header(20, 0)),
            // rewound below the last scanned block
            (header(7, 1), header(17, 1)),
            // same height as the last scanned block, but another hash
            (header(17, 2), header(27, 2)),
        ];
        for (start, end) in &batches {
            printer.on_blocks(&provider, start, end, &mut control).await.unwrap();
        }

        // Shasta has two events, so every range is queried twice.
        let ranges = ranges.lock().unwrap().clone();
        let scanned: Vec<_> =
            ranges.iter().step_by(2).map(|(from, to)| (from.as_str(), to.as_str())).collect();
        assert_eq!(scanned, [("0x0", "0xa"), ("0xb", "0x14"), ("0x7", "0x11"), ("0x11", "0x1b")]);
        assert_eq!(printer.last_scanned, Some((27, header(27, 2).hash)));
    }

    #[tokio::test]
    async fn undecodable_logs_fail_the_batch() {
        let log = json!({
            "address": INBOX,
            "topics": [Proposed::SIGNATURE_HASH],
            "data": "0x01",
            "blockNumber": "0x3",
            "logIndex": "0x0",
            "removed": false,
        });
        let (server, _mock, _) = logs_node(json!([log])).await;
        let mut printer = printer(&server);

        let err = printer
            .on_blocks(
                &provider(&server),
                &header(0, 0),
                &header(10, 0),
                &mut BatchControl::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, IteratorError::Binding(BindingError::Decode(_))), "{err}");
        assert!(!err.is_retryable());
        assert_eq!(printer.printed, 0);
        assert_eq!(printer.last_scanned, None);
    }

    #[test]
    fn iterator_config_from_options() {
        let opts = IteratorOpts {
            blocks_read_per_epoch: 50,
            block_confirmations: 3,
            reorg_rewind_depth: 10,
            retry_interval_secs: 1,
            max_retries: Some(2),
        };

        let config = iterator_config(100, Some(200), &opts);
        assert_eq!(config.start_height, 100);
        assert_eq!(config.end_height, Some(200));
        assert_eq!(config.blocks_read_per_epoch, 50);
        assert_eq!(config.block_confirmations, 3);
        assert_eq!(config.reorg_rewind_depth, 10);
        assert_eq!(config.retry_interval, Duration::from_secs(1));
        assert_eq!(config.max_retries, Some(2));

        assert_eq!(iterator_config(100, None, &opts).end_height, None);
    }
}
