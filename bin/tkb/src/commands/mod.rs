use alloy::{providers::Provider, rpc::types::Log};
use alloy_primitives::Address;
use alloy_sol_types::SolEvent;
use serde_json::json;
use tkb_chainio::{
    bind::{Binding, Filterer},
    ontake::taiko_l1::TaikoL1,
    pacaya::inbox::TaikoInbox,
    shasta::inbox::Inbox,
};
use tkb_config::Command;
use tkb_primitives::Fork;

mod decode;
mod events;
mod inspect;
mod watch;

/// Run a parsed command to completion.
pub(crate) async fn run(command: Command) -> eyre::Result<()> {
    match command {
        Command::Inspect(opts) => inspect::run(opts).await,
        Command::Events(opts) => events::run(opts).await,
        Command::Watch(opts) => watch::run(opts).await,
        Command::Decode(command) => {
            println!("{}", decode::decode(command).await?);
            Ok(())
        }
    }
}

/// Returns event access to the L1 rollup contract of `fork` at `address`.
pub(crate) fn inbox_filterer<P: Provider + Clone>(
    fork: Fork,
    address: Address,
    provider: P,
) -> Filterer<P> {
    match fork {
        Fork::Ontake => TaikoL1::from_provider(address, provider).filterer(),
        Fork::Pacaya => TaikoInbox::from_provider(address, provider).filterer(),
        Fork::Shasta => Inbox::from_provider(address, provider).filterer(),
    }
}

/// Returns the name of an event, without its parameter list.
pub(crate) fn event_name<E: SolEvent>() -> &'static str {
    E::SIGNATURE.split_once('(').map_or(E::SIGNATURE, |(name, _)| name)
}

/// A decoded contract event, ready to be printed.
#[derive(Debug, Clone)]
pub(crate) struct PrintedEvent {
    pub(crate) name: &'static str,
    pub(crate) summary: String,
    pub(crate) log: Log,
}

impl PrintedEvent {
    /// Render the event as a single line, either human readable or JSON.
    pub(crate) fn render(&self, fork: Fork, as_json: bool) -> String {
        if as_json {
            return json!({
                "fork": fork,
                "event": self.name,
                "block": self.log.block_number,
                "tx": self.log.transaction_hash,
                "logIndex": self.log.log_index,
                "removed": self.log.removed,
                "summary": self.summary,
            })
            .to_string();
        }

        let removed = if self.log.removed { " (removed)" } else { "" };
        format!(
            "[{fork}] #{} {}{removed}: {}",
            self.log.block_number.unwrap_or_default(),
            self.name,
            self.summary
        )
    }
}

#[cfg(test)]
mod tests {
    use alloy_primitives::B256;
    use serde_json::Value;
    use tkb_chainio::{pacaya::inbox::ITaikoInbox::BatchProposed, shasta::inbox::IInbox::Proved};

    use super::*;

    fn printed() -> PrintedEvent {
        let log = Log {
            block_number: Some(12),
            transaction_hash: Some(B256::repeat_byte(0xaa)),
            log_index: Some(3),
            ..Default::default()
        };
        PrintedEvent { name: "Proposed", summary: "id=7".to_owned(), log }
    }

    #[test]
    fn event_names_drop_the_parameters() {
        assert_eq!(event_name::<BatchProposed>(), "BatchProposed");
        assert_eq!(event_name::<Proved>(), "Proved");
    }

    #[test]
    fn render_plain() {
        let mut event = printed();
        assert_eq!(event.render(Fork::Shasta, false), "[shasta] #12 Proposed: id=7");

        event.log.removed = true;
        assert_eq!(event.render(Fork::Shasta, false), "[shasta] #12 Proposed (removed): id=7");
    }

    #[test]
    fn render_json() {
        let line = printed().render(Fork::Pacaya, true);
        let value: Value = serde_json::from_str(&line).unwrap();

        assert_eq!(value["fork"], "pacaya");
        assert_eq!(value["event"], "Proposed");
        assert_eq!(value["block"], 12);
        assert_eq!(value["logIndex"], 3);
        assert_eq!(value["removed"], false);
        assert_eq!(value["summary"], "id=7");
    }
}
