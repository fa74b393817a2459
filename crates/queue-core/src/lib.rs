//! `awaitable-queue`: an unbounded, awaitable, multi-producer/multi-consumer
//! queue with close-then-drain semantics.
//!
//! The centerpiece is [`AwaitableQueue<T>`](queue::AwaitableQueue). Producers
//! call [`send`](queue::AwaitableQueue::send)/[`send_slice`](queue::AwaitableQueue::send_slice)
//! and never block on capacity; consumers call [`get`](queue::AwaitableQueue::get)
//! and friends, or await [`await_value_async`](queue::AwaitableQueue::await_value_async)
//! from an async task. `close()` is idempotent and lets producers keep
//! sending — the queue signals `close_ch()` only once it is both closed
//! and fully drained.
//!
//! Supporting types: a reusable one-shot latch ([`event::OneShot`]) and
//! cyclic event ([`event::Cyclic`]), a lock-free multi-producer error
//! accumulator ([`error::AtomicError`]), the slot-clearing
//! [`zero_out::ZeroOut`] policy, and the slice-away recycler
//! ([`recycler::ValueSlice`]) that backs the queue's internal buffers.
//!
//! ```
//! use awaitable_queue::AwaitableQueue;
//!
//! let q: AwaitableQueue<i32> = AwaitableQueue::new();
//! q.send(1);
//! q.send(2);
//! q.close();
//! assert_eq!(q.get(), (Some(1), true));
//! assert_eq!(q.get(), (Some(2), true));
//! assert_eq!(q.get(), (None, false));
//! assert!(q.is_closed());
//! ```

pub mod config;
pub mod error;
pub mod event;
mod invariants;
pub mod queue;
pub mod recycler;
pub mod zero_out;

pub use config::{QueueConfig, SliceSize};
pub use error::{AtomicError, ErrorChain, QueueError};
pub use event::{Cyclic, OneShot};
pub use queue::{AwaitableQueue, ReadOutcome};
pub use recycler::{SliceList, ValueSlice};
pub use zero_out::{ZeroOut, ZeroOutConfig};
