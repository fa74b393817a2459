//! Async `Stream` adapter over [`awaitable_queue::AwaitableQueue`].
//!
//! # Features
//!
//! - **Hybrid polling**: non-blocking drain first, event-driven wait
//!   via the queue's async wait handle, with a configurable poll
//!   interval as a safety net against missed wakeups.
//! - **No backpressure, no registration**: the queue is unbounded and
//!   `send` never blocks, so producers just clone the `Arc` and call
//!   it directly. There is no sender type and nothing to register.
//! - **Graceful shutdown**: a cloneable [`ShutdownSignal`] closes the
//!   queue from any task; the stream ends once closed and drained.
//!
//! # Example
//!
//! ```
//! use awaitable_queue::QueueConfig;
//! use queue_async::channel;
//! use tokio_stream::StreamExt;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let (tx, mut rx) = channel::<u64>(QueueConfig::default());
//!
//! tx.send(42);
//! tx.send(43);
//! tx.close();
//!
//! while let Some(item) = rx.next().await {
//!     println!("received: {item}");
//! }
//! # }
//! ```

mod channel;
mod config;
mod invariants;
mod shutdown;
mod stream;

pub use channel::{channel, channel_with_stream_config};
pub use config::StreamConfig;
pub use shutdown::ShutdownSignal;
pub use stream::QueueStream;

// Re-export useful stream combinators.
pub use tokio_stream::StreamExt;
