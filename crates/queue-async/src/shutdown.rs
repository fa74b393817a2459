//! A cloneable signal for triggering queue shutdown from any task.

#[cfg(debug_assertions)]
use crate::invariants::debug_assert_shutdown_observed;
use awaitable_queue::AwaitableQueue;
use std::sync::Arc;

/// A cloneable handle that closes the underlying [`AwaitableQueue`].
///
/// Closing the queue does not drop any data: producers may still
/// `send` afterward (the queue delivers it), and [`QueueStream`](crate::stream::QueueStream)
/// keeps yielding until the queue is both closed and drained. Multiple
/// clones may call [`shutdown`](Self::shutdown); the underlying
/// `close()` is idempotent, so only the first call has any effect.
pub struct ShutdownSignal<T> {
    queue: Arc<AwaitableQueue<T>>,
}

// Manual impl: derive(Clone) would require `T: Clone`, but cloning this
// type only clones the `Arc` wrapper, never a `T` value.
impl<T> Clone for ShutdownSignal<T> {
    fn clone(&self) -> Self {
        Self {
            queue: Arc::clone(&self.queue),
        }
    }
}

impl<T: Default> ShutdownSignal<T> {
    pub(crate) fn new(queue: Arc<AwaitableQueue<T>>) -> Self {
        Self { queue }
    }

    /// Requests graceful shutdown: the queue stops accepting new
    /// registrations conceptually (producers already hold the `Arc`
    /// and may keep sending; closing the queue does not block them),
    /// and the stream will end once drained.
    pub fn shutdown(&self) {
        self.queue.close();
        #[cfg(debug_assertions)]
        debug_assert_shutdown_observed!(self.queue.close_requested());
    }

    /// `true` once [`shutdown`](Self::shutdown) (or any other path to
    /// `AwaitableQueue::close`) has been observed, independent of
    /// whether the queue has fully drained yet.
    pub fn is_shutdown(&self) -> bool {
        self.queue.close_requested()
    }
}
