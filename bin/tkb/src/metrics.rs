use metrics::{counter, gauge};
use tkb_primitives::Fork;

/// Metrics of the event commands.
#[derive(Debug, Clone, Copy)]
pub(crate) struct EventMetrics;

impl EventMetrics {
    /// Increments the amount of decoded events of a fork.
    pub(crate) fn increment_events(fork: Fork, event: &'static str) {
        counter!("tkb_events_total", "fork" => fork.as_str(), "event" => event).increment(1);
    }

    /// Increments the amount of logs that failed to decode.
    pub(crate) fn increment_decode_errors(fork: Fork) {
        counter!("tkb_event_decode_errors_total", "fork" => fork.as_str()).increment(1);
    }

    /// Increments the amount of removed (re-orged) logs received.
    pub(crate) fn increment_removed_logs(fork: Fork) {
        counter!("tkb_removed_logs_total", "fork" => fork.as_str()).increment(1);
    }

    /// Sets the last L1 block scanned for events.
    pub(crate) fn set_last_scanned_block(fork: Fork, block: u64) {
        gauge!("tkb_last_scanned_block", "fork" => fork.as_str()).set(block as f64);
    }
}
