//! Debug assertion macros for `AwaitableQueue` invariants.
//!
//! Active only in debug builds (`#[cfg(debug_assertions)]`), zero
//! overhead in release.

// =============================================================================
// INV-BITS-01: INPUT implies ANY
// =============================================================================

/// Assert `has_data_bits.INPUT == 1 => has_data_bits.ANY == 1`.
///
/// Used in: every writer of `has_data_bits` in `queue.rs`.
macro_rules! debug_assert_bits_legal {
    ($any:expr, $input:expr) => {
        debug_assert!(
            !$input || $any,
            "INV-BITS-01 violated: has_data_bits observed as (ANY={}, INPUT={})",
            $any,
            $input
        )
    };
}

// =============================================================================
// INV-CLOSE-01: Monotonic Close
// =============================================================================

/// Assert `close_invoked` only ever transitions `false -> true`.
///
/// Used in: `AwaitableQueue::close()`.
macro_rules! debug_assert_close_monotonic {
    ($was_closed:expr, $now_closed:expr) => {
        debug_assert!(
            !$was_closed || $now_closed,
            "INV-CLOSE-01 violated: close_invoked went from true back to false"
        )
    };
}

// =============================================================================
// INV-CLOSE-02: Empty Fires Once, After Close
// =============================================================================

/// Assert `empty` is only closed while `close_invoked` already holds.
///
/// Used in: `update_wait`, `AwaitableQueue::close()`.
macro_rules! debug_assert_empty_after_close {
    ($close_invoked:expr) => {
        debug_assert!(
            $close_invoked,
            "INV-CLOSE-02 violated: empty one-shot closed before close_invoked was set"
        )
    };
}

// =============================================================================
// INV-SLICE-01: Non-Empty Stored Slices
// =============================================================================

/// Assert a `ValueSlice` pushed into `sos`/`outputs` is non-empty.
///
/// Used in: every push site onto a `SliceList` in `queue.rs`.
macro_rules! debug_assert_slice_nonempty {
    ($slice:expr) => {
        debug_assert!(
            !$slice.is_empty(),
            "INV-SLICE-01 violated: pushed an empty ValueSlice onto a SliceList"
        )
    };
}

// =============================================================================
// INV-FIFO-01: Per-Producer FIFO
// =============================================================================

/// Assert a per-producer sequence counter only increases.
///
/// Used in: property/loom tests driving concurrent `send` from a
/// fixed producer identity.
macro_rules! debug_assert_fifo_monotonic {
    ($producer:expr, $old:expr, $new:expr) => {
        debug_assert!(
            $new >= $old,
            "INV-FIFO-01 violated: producer {} sequence went from {} to {}",
            $producer,
            $old,
            $new
        )
    };
}

// =============================================================================
// INV-LOCK-01: Single Nesting Order
// =============================================================================

/// Assert the only permitted lock nesting (`output -> input`) is
/// respected. `$output` is the queue's `output: Mutex<OutputState<T>>`;
/// since `std::sync::Mutex` isn't reentrant, `try_lock()` from the same
/// thread fails iff this thread itself already holds the guard, which
/// is exactly the property the nesting order requires before taking
/// `input` as well.
///
/// Used in: `transfer_from_input`, `get_all`, right before each locks
/// `input`.
macro_rules! debug_assert_lock_order {
    ($output:expr) => {
        debug_assert!(
            $output.try_lock().is_err(),
            "INV-LOCK-01 violated: input lock about to be acquired without output lock already held"
        )
    };
}

// =============================================================================
// Fatal error taxonomy (§7): InvariantViolated, ArgumentNil
// =============================================================================

/// Abort with [`crate::error::QueueError::InvariantViolated`]. Reserved
/// for states that imply a bug in this crate, never for caller input —
/// every call site here is an internal "should never happen" check that
/// `debug_assert!` would also catch in a debug build; this is the
/// release-mode backstop for the same condition.
macro_rules! fatal_invariant {
    ($msg:expr) => {
        panic!("{}", $crate::error::QueueError::InvariantViolated($msg))
    };
}

/// Abort with [`crate::error::QueueError::ArgumentNil`]. No current
/// public operation takes an optional required parameter — Rust's type
/// system rules that out — so this has no call site today; kept for the
/// taxonomy's completeness (§7) should a future API need it.
#[allow(unused_macros)]
macro_rules! fatal_argument_nil {
    ($param:expr, $caller:expr) => {
        panic!(
            "{}",
            $crate::error::QueueError::ArgumentNil {
                param: $param,
                caller: $caller,
            }
        )
    };
}

pub(crate) use debug_assert_bits_legal;
pub(crate) use debug_assert_close_monotonic;
pub(crate) use debug_assert_empty_after_close;
pub(crate) use debug_assert_fifo_monotonic;
pub(crate) use debug_assert_lock_order;
pub(crate) use debug_assert_slice_nonempty;
pub(crate) use fatal_invariant;
