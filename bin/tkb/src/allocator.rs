//! The global allocator of the `tkb` binary.
//!
//! jemalloc on unix when the `jemalloc` feature is enabled, the system allocator otherwise.
//! Same setup as the Reth allocator:
//! <https://github.com/paradigmxyz/reth/blob/main/crates/cli/util/src/allocator.rs>

#[cfg(all(feature = "jemalloc", unix))]
type AllocatorInner = tikv_jemallocator::Jemalloc;
#[cfg(not(all(feature = "jemalloc", unix)))]
type AllocatorInner = std::alloc::System;

/// Custom allocator.
pub(crate) type Allocator = AllocatorInner;

/// Creates a new [custom allocator][Allocator].
pub(crate) const fn new_allocator() -> Allocator {
    AllocatorInner {}
}

/// Logs the allocated and resident bytes reported by jemalloc.
#[cfg(all(feature = "jemalloc-prof", unix))]
pub(crate) fn log_stats() {
    use tikv_jemalloc_ctl::{epoch, stats};

    // The statistics are cached until the epoch is advanced.
    if epoch::advance().is_err() {
        return;
    }

    match (stats::allocated::read(), stats::resident::read()) {
        (Ok(allocated), Ok(resident)) => tracing::info!(allocated, resident, "jemalloc stats"),
        (Err(err), _) | (_, Err(err)) => tracing::warn!(%err, "Failed to read jemalloc stats"),
    }
}

/// Logs the allocated and resident bytes reported by jemalloc.
#[cfg(not(all(feature = "jemalloc-prof", unix)))]
pub(crate) const fn log_stats() {}
