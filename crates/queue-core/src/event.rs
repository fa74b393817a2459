//! `OneShot` and `Cyclic` wait handles.
//!
//! Both are built on the same private core: an `AtomicBool` for the
//! `O(1)` non-blocking check, a `(Mutex<()>, Condvar)` pair so a plain
//! OS thread can block with no executor running, and a
//! `tokio::sync::Notify` so the handle composes with `tokio::select!`
//! for callers already on an async runtime — mirroring how this
//! crate's stream adapter pairs a `Notify` with blocking-safe state
//! elsewhere in the workspace.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Duration;
use tokio::sync::Notify;

struct EventCore {
    closed: AtomicBool,
    gate: Mutex<()>,
    condvar: Condvar,
    notify: Notify,
}

impl EventCore {
    fn new(initially_closed: bool) -> Self {
        Self {
            closed: AtomicBool::new(initially_closed),
            gate: Mutex::new(()),
            condvar: Condvar::new(),
            notify: Notify::new(),
        }
    }

    #[inline]
    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Transitions to closed if not already. Returns `true` if this
    /// call was the one that performed the transition.
    fn close(&self) -> bool {
        if self
            .closed
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
        {
            // Winner only: wake blocking waiters and select-aware waiters.
            let _guard = self.gate.lock().unwrap();
            self.condvar.notify_all();
            drop(_guard);
            self.notify.notify_waiters();
            true
        } else {
            false
        }
    }

    /// Transitions to open unconditionally. Does not wake anyone —
    /// only closers have waiters worth notifying.
    fn open(&self) {
        self.closed.store(false, Ordering::Release);
    }

    /// Wakes every waiter without touching `closed`. For callers whose
    /// predicate can turn true independently of this handle's own
    /// open/closed state (e.g. a sibling handle closing), so a waiter
    /// parked here would otherwise sit out the full timeout.
    fn kick(&self) {
        let _guard = self.gate.lock().unwrap();
        self.condvar.notify_all();
        drop(_guard);
        self.notify.notify_waiters();
    }

    fn wait_blocking(&self) {
        if self.is_closed() {
            return;
        }
        let guard = self.gate.lock().unwrap();
        let _unused = self
            .condvar
            .wait_while(guard, |()| !self.is_closed())
            .unwrap();
    }

    /// Blocks up to `timeout`, waking early on close. Acts as a
    /// polling safety net for callers selecting across more than one
    /// handle that can't share a single `Condvar`.
    fn wait_blocking_timeout(&self, timeout: Duration) {
        self.wait_blocking_timeout_until(timeout, || false);
    }

    /// Like `wait_blocking_timeout`, but also wakes early once
    /// `extra_done` turns true — for a caller tracking a condition a
    /// sibling handle's `kick()` can satisfy without this handle ever
    /// closing itself. `extra_done` is folded into the `Condvar`
    /// predicate so a `kick()` actually breaks the wait instead of
    /// just spuriously re-checking the same always-false condition.
    fn wait_blocking_timeout_until(&self, timeout: Duration, mut extra_done: impl FnMut() -> bool) {
        if self.is_closed() || extra_done() {
            return;
        }
        let guard = self.gate.lock().unwrap();
        let _unused = self
            .condvar
            .wait_timeout_while(guard, timeout, |()| !self.is_closed() && !extra_done())
            .unwrap();
    }

    async fn wait_async(&self) {
        loop {
            if self.is_closed() {
                return;
            }
            let notified = self.notify.notified();
            tokio::pin!(notified);
            // Re-check after registering so a close() that raced in
            // between the first check and this await is not missed.
            if self.is_closed() {
                return;
            }
            notified.await;
        }
    }
}

/// A single-transition "closed" latch with many waiters.
///
/// `close()` is idempotent and irreversible: once closed, it stays
/// closed for the lifetime of the handle.
pub struct OneShot {
    core: EventCore,
}

impl OneShot {
    pub fn new() -> Self {
        Self {
            core: EventCore::new(false),
        }
    }

    /// Transitions to closed. Idempotent; safe to call from any thread.
    #[inline]
    pub fn close(&self) {
        self.core.close();
    }

    /// `O(1)`, wait-free.
    #[inline]
    pub fn is_closed(&self) -> bool {
        self.core.is_closed()
    }

    /// Blocks the calling OS thread until closed.
    pub fn wait(&self) {
        self.core.wait_blocking();
    }

    /// Awaits until closed; composes with `tokio::select!`.
    pub async fn wait_async(&self) {
        self.core.wait_async().await;
    }
}

impl Default for OneShot {
    fn default() -> Self {
        Self::new()
    }
}

/// An open/close event, reopenable, with many waiters.
///
/// Eventually consistent: a waiter that wakes after a `close` must
/// re-check whatever predicate `close` was meant to signal, since the
/// event may already have cycled back to open by the time it acts.
pub struct Cyclic {
    core: EventCore,
}

impl Cyclic {
    /// Creates the event already closed.
    pub fn new_closed() -> Self {
        Self {
            core: EventCore::new(true),
        }
    }

    pub fn new_open() -> Self {
        Self {
            core: EventCore::new(false),
        }
    }

    #[inline]
    pub fn close(&self) {
        self.core.close();
    }

    #[inline]
    pub fn open(&self) {
        self.core.open();
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.core.is_closed()
    }

    pub fn wait(&self) {
        self.core.wait_blocking();
    }

    /// Blocks up to `timeout`, waking early if the event closes.
    pub fn wait_timeout(&self, timeout: Duration) {
        self.core.wait_blocking_timeout(timeout);
    }

    /// Like [`wait_timeout`](Self::wait_timeout), but also wakes early
    /// once `extra_done` turns true. Pairs with [`notify_all`](
    /// Self::notify_all): a caller elsewhere can `kick()` this handle
    /// to re-check `extra_done` immediately instead of waiting out the
    /// rest of `timeout`.
    pub fn wait_timeout_until(&self, timeout: Duration, extra_done: impl FnMut() -> bool) {
        self.core.wait_blocking_timeout_until(timeout, extra_done);
    }

    pub async fn wait_async(&self) {
        self.core.wait_async().await;
    }

    /// Wakes every waiter without opening or closing the event. Lets a
    /// caller rouse a waiter parked here over a condition tracked by a
    /// different handle entirely (see [`AwaitableQueue::close`](
    /// crate::queue::AwaitableQueue::close)).
    pub(crate) fn notify_all(&self) {
        self.core.kick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn one_shot_starts_open() {
        let ev = OneShot::new();
        assert!(!ev.is_closed());
    }

    #[test]
    fn one_shot_close_is_idempotent() {
        let ev = OneShot::new();
        ev.close();
        ev.close();
        assert!(ev.is_closed());
    }

    #[test]
    fn one_shot_wakes_blocked_waiter() {
        let ev = Arc::new(OneShot::new());
        let waiter = {
            let ev = Arc::clone(&ev);
            thread::spawn(move || ev.wait())
        };
        thread::sleep(Duration::from_millis(20));
        ev.close();
        waiter.join().unwrap();
    }

    #[test]
    fn cyclic_open_close_cycle() {
        let ev = Cyclic::new_open();
        assert!(!ev.is_closed());
        ev.close();
        assert!(ev.is_closed());
        ev.open();
        assert!(!ev.is_closed());
    }

    #[test]
    fn cyclic_wait_timeout_returns_on_timeout_when_open() {
        let ev = Cyclic::new_open();
        let start = std::time::Instant::now();
        ev.wait_timeout(Duration::from_millis(15));
        assert!(start.elapsed() >= Duration::from_millis(15));
    }

    #[test]
    fn cyclic_wait_timeout_returns_early_on_close() {
        let ev = Arc::new(Cyclic::new_open());
        let waiter = {
            let ev = Arc::clone(&ev);
            thread::spawn(move || ev.wait_timeout(Duration::from_secs(5)))
        };
        thread::sleep(Duration::from_millis(10));
        ev.close();
        waiter.join().unwrap();
    }

    #[test]
    fn cyclic_wait_timeout_until_wakes_on_kick_when_extra_done() {
        // Timeout is deliberately long: if notify_all()/extra_done
        // don't actually shortcut the wait, this would take 5s and
        // the elapsed-time assertion below would fail, unlike a test
        // whose window happens to already be short.
        let ev = Arc::new(Cyclic::new_open());
        let done = Arc::new(AtomicBool::new(false));
        let waiter = {
            let ev = Arc::clone(&ev);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let start = std::time::Instant::now();
                ev.wait_timeout_until(Duration::from_secs(5), || done.load(Ordering::Acquire));
                start.elapsed()
            })
        };
        thread::sleep(Duration::from_millis(20));
        done.store(true, Ordering::Release);
        ev.notify_all();
        let elapsed = waiter.join().unwrap();
        assert!(
            elapsed < Duration::from_millis(500),
            "took {elapsed:?} to notice extra_done + notify_all; kick is not waking the wait"
        );
    }

    #[tokio::test]
    async fn one_shot_wait_async_resolves_after_close() {
        let ev = Arc::new(OneShot::new());
        let waiter = {
            let ev = Arc::clone(&ev);
            tokio::spawn(async move { ev.wait_async().await })
        };
        tokio::time::sleep(Duration::from_millis(10)).await;
        ev.close();
        waiter.await.unwrap();
    }
}
