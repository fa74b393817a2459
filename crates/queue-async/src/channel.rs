//! Channel construction.

use crate::config::StreamConfig;
use crate::stream::QueueStream;
use awaitable_queue::{AwaitableQueue, QueueConfig};
use std::sync::Arc;

/// Creates a new queue and a [`Stream`](futures_core::Stream) adapter
/// over it, using the default [`StreamConfig`].
///
/// The returned `Arc<AwaitableQueue<T>>` is the send handle: clone it
/// freely across producer tasks or threads, there is no registration
/// step. The [`QueueStream`] is the single consumer side; fan it out
/// with `tokio_stream::StreamExt` combinators if more than one task
/// needs to see the items.
///
/// # Example
///
/// ```
/// use awaitable_queue::QueueConfig;
/// use queue_async::channel;
/// use tokio_stream::StreamExt;
///
/// # #[tokio::main]
/// # async fn main() {
/// let (tx, mut rx) = channel::<u64>(QueueConfig::default());
/// tx.send(42);
/// tx.close();
/// assert_eq!(rx.next().await, Some(42));
/// assert_eq!(rx.next().await, None);
/// # }
/// ```
pub fn channel<T: Send + Default + 'static>(
    config: QueueConfig,
) -> (Arc<AwaitableQueue<T>>, QueueStream<T>) {
    channel_with_stream_config(config, StreamConfig::default())
}

/// Like [`channel`], but with an explicit [`StreamConfig`] controlling
/// the stream's polling safety net and batch size.
pub fn channel_with_stream_config<T: Send + Default + 'static>(
    config: QueueConfig,
    stream_config: StreamConfig,
) -> (Arc<AwaitableQueue<T>>, QueueStream<T>) {
    let queue = Arc::new(AwaitableQueue::with_config(config));
    let stream = QueueStream::new(Arc::clone(&queue), stream_config);
    (queue, stream)
}
