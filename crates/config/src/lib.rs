#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Command line options and telemetry setup for the `tkb` tool.

use alloy_primitives::{Address, B256, Bytes};
use clap::{
    Parser, Subcommand,
    builder::{
        Styles,
        styling::{AnsiColor, Color, Style},
    },
};
use tkb_primitives::Fork;

mod chain;
pub use chain::{ContractAddresses, L1Opts, L2Opts, MissingAddress};

mod iterator;
pub use iterator::IteratorOpts;

mod telemetry;
pub use telemetry::{LogProvider, TelemetryError, TelemetryOpts};

/// CLI options for the Taiko bindings tool.
#[derive(Debug, Clone, Parser)]
#[command(author, version, styles = cli_styles(), about)]
pub struct Opts {
    /// A unique name for this instance, used in metrics and logs
    #[clap(long, env = "TKB_INSTANCE_NAME", default_value = "tkb", global = true)]
    pub instance_name: String,
    /// Telemetry-related configuration options
    #[clap(flatten)]
    pub telemetry: TelemetryOpts,
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// The commands of the Taiko bindings tool.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Read and print the main contract state of a fork.
    Inspect(InspectOpts),
    /// Print the historical proposal and proof events of a fork.
    Events(EventsOpts),
    /// Follow the live proposal and proof events of a fork.
    Watch(WatchOpts),
    /// Decode revert data, transactions and encoded payloads.
    #[command(subcommand)]
    Decode(DecodeCommand),
}

/// Options of the `inspect` command.
#[derive(Debug, Clone, Parser)]
pub struct InspectOpts {
    /// The fork to inspect: ontake, pacaya or shasta.
    pub fork: Fork,
    /// An account whose bond balance is printed.
    #[clap(long)]
    pub account: Option<Address>,
    /// L1-related configuration options
    #[clap(flatten)]
    pub l1: L1Opts,
    /// L2-related configuration options
    #[clap(flatten)]
    pub l2: L2Opts,
    /// The contract addresses of every fork
    #[clap(flatten)]
    pub contracts: ContractAddresses,
}

/// Options of the `events` command.
#[derive(Debug, Clone, Parser)]
pub struct EventsOpts {
    /// The fork whose events are printed: ontake, pacaya or shasta.
    pub fork: Fork,
    /// The first L1 block to scan.
    #[clap(long)]
    pub from: u64,
    /// The last L1 block to scan. Defaults to the head minus the confirmations.
    #[clap(long)]
    pub to: Option<u64>,
    /// Print the events as JSON lines instead of summaries.
    #[clap(long)]
    pub json: bool,
    /// L1-related configuration options
    #[clap(flatten)]
    pub l1: L1Opts,
    /// The contract addresses of every fork
    #[clap(flatten)]
    pub contracts: ContractAddresses,
    /// Block batch iterator options
    #[clap(flatten)]
    pub iterator: IteratorOpts,
}

/// Options of the `watch` command.
#[derive(Debug, Clone, Parser)]
pub struct WatchOpts {
    /// The fork whose events are followed: ontake, pacaya or shasta.
    pub fork: Fork,
    /// Replay the events emitted since this L1 block before following new ones.
    #[clap(long)]
    pub from: Option<u64>,
    /// Print the events as JSON lines instead of summaries.
    #[clap(long)]
    pub json: bool,
    /// L1-related configuration options
    #[clap(flatten)]
    pub l1: L1Opts,
    /// The contract addresses of every fork
    #[clap(flatten)]
    pub contracts: ContractAddresses,
}

/// The payloads the `decode` command understands.
#[derive(Debug, Clone, Subcommand)]
pub enum DecodeCommand {
    /// Decode revert data against every known contract error.
    Error {
        /// The hex-encoded revert data.
        data: Bytes,
    },
    /// Trace a failed transaction and decode its revert reason.
    Tx {
        /// The hash of the transaction.
        hash: B256,
        /// L1-related configuration options
        #[clap(flatten)]
        l1: L1Opts,
    },
    /// Decode the compact payload of a Shasta `Proposed` event.
    Proposed {
        /// The hex-encoded payload.
        data: Bytes,
    },
    /// Decode the compact payload of a Shasta `Proved` event.
    Proved {
        /// The hex-encoded payload.
        data: Bytes,
    },
    /// Decode the compact input of a Shasta `propose` call.
    ProposeInput {
        /// The hex-encoded input.
        data: Bytes,
    },
    /// Decode the compact input of a Shasta `prove` call.
    ProveInput {
        /// The hex-encoded input.
        data: Bytes,
    },
    /// Decode Ontake or Pacaya propose calldata and its transaction list.
    Calldata {
        /// The hex-encoded calldata, selector included.
        data: Bytes,
    },
}

/// Styles for the CLI.
const fn cli_styles() -> Styles {
    Styles::styled()
        .usage(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .header(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Yellow))))
        .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .invalid(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .error(Style::new().bold().fg_color(Some(Color::Ansi(AnsiColor::Red))))
        .valid(Style::new().bold().underline().fg_color(Some(Color::Ansi(AnsiColor::Green))))
        .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::White))))
}
