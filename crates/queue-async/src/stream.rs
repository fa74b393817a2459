//! Async stream view over an [`AwaitableQueue`].

use crate::config::StreamConfig;
#[cfg(debug_assertions)]
use crate::invariants::debug_assert_stream_end_matches_queue;
use crate::shutdown::ShutdownSignal;
use awaitable_queue::AwaitableQueue;
use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tokio::time::{interval, Interval};

use futures_core::Stream;
use pin_project_lite::pin_project;

type PendingFut<T> = Pin<Box<dyn Future<Output = (Option<T>, bool)> + Send>>;

/// Owns a clone of the queue's `Arc`, so the returned future is `'static`
/// and can be stored alongside the stream that also owns a clone.
async fn wait_for_value<T: Send + Default + 'static>(
    queue: Arc<AwaitableQueue<T>>,
) -> (Option<T>, bool) {
    queue.await_value_async().await
}

pin_project! {
    /// An async [`Stream`] view over an [`AwaitableQueue`].
    ///
    /// Draining is hybrid: every poll first drains whatever is
    /// immediately available non-blockingly (batched up to
    /// `config.batch_hint`), the same way a tight polling loop would,
    /// and only falls back to awaiting the queue's wait handles when
    /// the buffer and the queue are both empty. A `poll_interval`
    /// timer is a safety net against a missed wakeup — `data_wait_ch`
    /// is documented as eventually, not immediately, consistent.
    ///
    /// The stream ends (`poll_next` returns `None`) exactly when
    /// `AwaitableQueue::is_closed` becomes true: closed, and drained.
    pub struct QueueStream<T: Send + Default + 'static> {
        queue: Arc<AwaitableQueue<T>>,
        config: StreamConfig,
        buffer: VecDeque<T>,
        pending: Option<PendingFut<T>>,
        #[pin]
        poll_timer: Interval,
    }
}

impl<T: Send + Default + 'static> QueueStream<T> {
    pub(crate) fn new(queue: Arc<AwaitableQueue<T>>, config: StreamConfig) -> Self {
        Self {
            poll_timer: interval(config.poll_interval),
            buffer: VecDeque::with_capacity(config.batch_hint),
            queue,
            config,
            pending: None,
        }
    }

    /// A cloneable signal that closes the wrapped queue from elsewhere.
    pub fn shutdown_signal(&self) -> ShutdownSignal<T> {
        ShutdownSignal::new(Arc::clone(&self.queue))
    }

    /// The queue this stream drains. Clone the returned `Arc` to hand
    /// producers their own send handle — `AwaitableQueue::send` needs
    /// no registration step, unlike a bounded ring's per-producer slot.
    pub fn queue(&self) -> &Arc<AwaitableQueue<T>> {
        &self.queue
    }

    /// Number of items currently buffered ahead of the queue itself.
    pub fn buffered_count(&self) -> usize {
        self.buffer.len()
    }
}

impl<T: Send + Default + 'static> Stream for QueueStream<T> {
    type Item = T;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<T>> {
        let mut this = self.project();

        if let Some(item) = this.buffer.pop_front() {
            return Poll::Ready(Some(item));
        }

        drain_into(&this.queue, &mut this.buffer, this.config.batch_hint);
        if let Some(item) = this.buffer.pop_front() {
            return Poll::Ready(Some(item));
        }

        if this.queue.is_closed() {
            #[cfg(debug_assertions)]
            debug_assert_stream_end_matches_queue!(this.queue.is_closed());
            return Poll::Ready(None);
        }

        let pending = this
            .pending
            .get_or_insert_with(|| Box::pin(wait_for_value(Arc::clone(this.queue))));

        match pending.as_mut().poll(cx) {
            Poll::Ready((Some(value), true)) => {
                *this.pending = None;
                Poll::Ready(Some(value))
            }
            Poll::Ready((_, _)) => {
                *this.pending = None;
                #[cfg(debug_assertions)]
                debug_assert_stream_end_matches_queue!(this.queue.is_closed());
                Poll::Ready(None)
            }
            Poll::Pending => {
                // Safety net: if the poll-interval timer fires while we're
                // waiting, retry the non-blocking drain on the next wake in
                // case a notification was missed (data_wait is eventually,
                // not immediately, consistent).
                if this.poll_timer.as_mut().poll_tick(cx).is_ready() {
                    cx.waker().wake_by_ref();
                }
                Poll::Pending
            }
        }
    }
}

fn drain_into<T: Default>(queue: &AwaitableQueue<T>, buffer: &mut VecDeque<T>, batch_hint: usize) {
    while buffer.len() < batch_hint {
        let (value, has_value) = queue.get();
        match value {
            Some(v) if has_value => buffer.push_back(v),
            _ => break,
        }
    }
}
