//! Debug assertion macros for the stream adapter.
//!
//! Active only in debug builds (`#[cfg(debug_assertions)]`), zero
//! overhead in release.

// =============================================================================
// INV-STREAM-01: Stream Ends Only Closed-And-Drained
// =============================================================================

/// Assert `QueueStream::poll_next` only returns `None` once the
/// underlying queue reports `is_closed()`.
///
/// Used in: `QueueStream::poll_next`.
macro_rules! debug_assert_stream_end_matches_queue {
    ($queue_is_closed:expr) => {
        debug_assert!(
            $queue_is_closed,
            "INV-STREAM-01 violated: stream yielded None but queue is not closed-and-drained"
        )
    };
}

// =============================================================================
// INV-SHUT-01: Shutdown Observed
// =============================================================================

/// Assert that after `ShutdownSignal::shutdown()` returns, the
/// underlying queue's `close_requested()` is already observable.
///
/// Used in: `ShutdownSignal::shutdown`.
macro_rules! debug_assert_shutdown_observed {
    ($observed:expr) => {
        debug_assert!(
            $observed,
            "INV-SHUT-01 violated: shutdown() returned but close was not yet observable"
        )
    };
}

pub(crate) use debug_assert_shutdown_observed;
pub(crate) use debug_assert_stream_end_matches_queue;
