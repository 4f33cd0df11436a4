#![cfg_attr(not(test), warn(unused_crate_dependencies))]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

//! Inspect, follow and decode the Taiko rollup contracts of every protocol fork.

use clap::Parser;
use tracing::{debug, info};

use tkb_config::Opts;

mod allocator;
use allocator::{Allocator, new_allocator};

mod commands;

mod metrics;

#[global_allocator]
static ALLOC: Allocator = new_allocator();

#[tokio::main]
async fn main() -> eyre::Result<()> {
    if let Ok(custom_env_file) = std::env::var("ENV_FILE") {
        // Try from custom env file, and abort if it fails
        dotenvy::from_filename(custom_env_file)?;
    } else {
        // Try from default .env file, and ignore if it fails. It might
        // be that the user isn't using it.
        dotenvy::dotenv().ok();
    }

    let opts = Opts::parse();

    let log_provider = opts.telemetry.setup(&opts.instance_name)?;

    debug!(instance = %opts.instance_name, "tkb starting");

    let result = tokio::select! {
        result = commands::run(opts.command) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl-C, shutting down");
            Ok(())
        }
    };

    allocator::log_stats();
    log_provider.shutdown();

    result
}
