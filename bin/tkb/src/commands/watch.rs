use alloy_sol_types::SolEvent;
use eyre::{OptionExt, bail};
use futures::StreamExt;
use tkb_chainio::{
    DefaultProvider,
    bind::{self, BindingError, Filterer, Topics},
    ontake::taiko_l1::ITaikoL1::{BlockProposedV2, BlockVerifiedV2, TransitionProvedV2},
    pacaya::inbox::ITaikoInbox::{BatchProposed, BatchesProved, BatchesVerified},
    shasta::inbox::IInbox::{Proposed, Proved},
    ws_provider,
};
use tkb_config::WatchOpts;
use tkb_primitives::{Fork, summary::Summary, task::CriticalTasks};
use tracing::{info, warn};

use super::{PrintedEvent, event_name, inbox_filterer};
use crate::metrics::EventMetrics;

/// Follow the proposal, proof and verification events of a fork until interrupted.
///
/// Each event type runs in its own task. The command fails as soon as one of them exits.
pub(crate) async fn run(opts: WatchOpts) -> eyre::Result<()> {
    let ws_url = opts.l1.el_ws_url.clone().ok_or_eyre("watching requires --l1.el-ws-url")?;
    let address = opts.contracts.inbox(opts.fork)?;

    let provider = ws_provider(ws_url).await?;
    let watcher = Watcher {
        filterer: inbox_filterer(opts.fork, address, provider),
        opts: bind::WatchOpts { start: opts.from },
        fork: opts.fork,
        as_json: opts.json,
    };

    let mut tasks = CriticalTasks::new();
    match opts.fork {
        Fork::Ontake => {
            watcher.spawn::<BlockProposedV2>(&mut tasks).await?;
            watcher.spawn::<TransitionProvedV2>(&mut tasks).await?;
            watcher.spawn::<BlockVerifiedV2>(&mut tasks).await?;
        }
        Fork::Pacaya => {
            watcher.spawn::<BatchProposed>(&mut tasks).await?;
            watcher.spawn::<BatchesProved>(&mut tasks).await?;
            watcher.spawn::<BatchesVerified>(&mut tasks).await?;
        }
        Fork::Shasta => {
            watcher.spawn::<Proposed>(&mut tasks).await?;
            watcher.spawn::<Proved>(&mut tasks).await?;
        }
    }

    info!(
        fork = %opts.fork,
        %address,
        from = ?opts.from,
        subscriptions = tasks.len(),
        "Watching events"
    );

    let Some(exit) = (&mut tasks).await else { return Ok(()) };
    tasks.abort_all();

    let name = exit.name.clone();
    match exit.panic_message() {
        Some(panic) => bail!("{name} watcher panicked: {panic}"),
        None => bail!("{name} subscription closed"),
    }
}

struct Watcher {
    filterer: Filterer<DefaultProvider>,
    opts: bind::WatchOpts,
    fork: Fork,
    as_json: bool,
}

impl Watcher {
    /// Subscribe to `E` events and print them from a new task tracked by `tasks`.
    async fn spawn<E: SolEvent + Summary + Send + 'static>(
        &self,
        tasks: &mut CriticalTasks,
    ) -> Result<(), BindingError> {
        let mut logs = self.filterer.watch::<E>(&self.opts, &Topics::any()).await?;
        let (fork, as_json) = (self.fork, self.as_json);

        tasks.spawn(event_name::<E>(), async move {
            while let Some(log) = logs.next().await {
                let log = match log {
                    Ok(log) => log,
                    Err(err) => {
                        warn!(%err, event = event_name::<E>(), "Failed to decode log, skipping");
                        EventMetrics::increment_decode_errors(fork);
                        continue;
                    }
                };

                let event = PrintedEvent {
                    name: event_name::<E>(),
                    summary: log.event.summary(),
                    log: log.log,
                };
                if event.log.removed {
                    let block = event.log.block_number;
                    warn!(event = event.name, ?block, "Event removed by a reorg");
                    EventMetrics::increment_removed_logs(fork);
                } else {
                    EventMetrics::increment_events(fork, event.name);
                }

                println!("{}", event.render(fork, as_json));
            }
        });

        Ok(())
    }
}
