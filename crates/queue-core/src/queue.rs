//! The core `AwaitableQueue<T>`.

use crate::config::QueueConfig;
use crate::event::{Cyclic, OneShot};
use crate::invariants::{
    debug_assert_bits_legal, debug_assert_close_monotonic, debug_assert_empty_after_close,
    debug_assert_lock_order, debug_assert_slice_nonempty, fatal_invariant,
};
use crate::recycler::{SliceList, ValueSlice};
use crate::zero_out::ZeroOut;
use crossbeam_utils::CachePadded;
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU8, AtomicUsize, Ordering};
use std::sync::Mutex;

const ANY: u8 = 0b01;
const INPUT: u8 = 0b10;

/// `get()`/`get_slice()`/`read()` all drain the output side first and
/// fall back to pulling from the input side only when it's empty;
/// this distinguishes how much of the input side a single pull takes.
enum TransferAction {
    /// Take the front single-producer batch (`queue` or `sos[0]`); the
    /// caller removes exactly one value from it.
    OneValue,
    /// Same pull, handed back whole.
    OneSlice,
}

struct InputState<T> {
    queue: Option<ValueSlice<T>>,
    sos: SliceList<T>,
    is_local_last: bool,
    cached_input: Option<ValueSlice<T>>,
}

impl<T> InputState<T> {
    fn new() -> Self {
        Self {
            queue: None,
            sos: SliceList::new(),
            is_local_last: false,
            cached_input: None,
        }
    }
}

struct OutputState<T> {
    output: Option<ValueSlice<T>>,
    outputs: SliceList<T>,
    cached_output: Option<ValueSlice<T>>,
}

impl<T> OutputState<T> {
    fn new() -> Self {
        Self {
            output: None,
            outputs: SliceList::new(),
            cached_output: None,
        }
    }
}

/// Result of [`AwaitableQueue::read`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOutcome {
    /// Number of elements written into the caller's buffer.
    pub filled: usize,
    /// `true` iff the queue is drained and `close()` has been called.
    pub end: bool,
}

/// An unbounded, awaitable, multi-producer/multi-consumer queue.
///
/// Producers call [`send`](Self::send)/[`send_slice`](Self::send_slice)/
/// [`send_clone`](Self::send_clone), which only ever acquire the input
/// lock. Consumers call [`get`](Self::get) and friends, which only
/// ever acquire the output lock. The two sides are bridged by a single
/// two-bit atomic (`has_data_bits`) so either side can answer "is
/// there data anywhere" without crossing into the opposite lock on
/// the hot path.
pub struct AwaitableQueue<T> {
    has_data_bits: CachePadded<AtomicU8>,
    close_invoked: AtomicBool,
    initialized: AtomicBool,
    input: Mutex<InputState<T>>,
    output: Mutex<OutputState<T>>,
    data_wait: Cyclic,
    data_wait_active: AtomicBool,
    empty: OneShot,
    wait_maintenance_lock: Mutex<()>,
    slice_size: AtomicUsize,
    max_retain_size: AtomicUsize,
    is_low_alloc: AtomicBool,
    zero_out: AtomicBool,
    length: AtomicUsize,
    max_length: AtomicUsize,
    is_length_tracked: AtomicBool,
}

impl<T> AwaitableQueue<T> {
    #[inline]
    fn bits(&self) -> u8 {
        self.has_data_bits.load(Ordering::Acquire)
    }

    #[inline]
    fn any(&self) -> bool {
        self.bits() & ANY != 0
    }

    fn store_bits(&self, bits: u8) {
        debug_assert_bits_legal!(bits & ANY != 0, bits & INPUT != 0);
        self.has_data_bits.store(bits, Ordering::Release);
    }
}

impl<T: Default> AwaitableQueue<T> {
    pub fn new() -> Self {
        Self::with_config(QueueConfig::default())
    }

    pub fn with_config(config: QueueConfig) -> Self {
        let slice_size = config.initial_slice_size.resolve::<T>();
        let max_retain_size = config.max_retain_size::<T>();
        let is_low_alloc = config.is_low_alloc::<T>();
        let zero_out = config.zero_out.resolve().should_zero();
        Self {
            has_data_bits: CachePadded::new(AtomicU8::new(0)),
            close_invoked: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            input: Mutex::new(InputState::new()),
            output: Mutex::new(OutputState::new()),
            data_wait: Cyclic::new_open(),
            data_wait_active: AtomicBool::new(false),
            empty: OneShot::new(),
            wait_maintenance_lock: Mutex::new(()),
            slice_size: AtomicUsize::new(slice_size),
            max_retain_size: AtomicUsize::new(max_retain_size),
            is_low_alloc: AtomicBool::new(is_low_alloc),
            zero_out: AtomicBool::new(zero_out),
            length: AtomicUsize::new(0),
            max_length: AtomicUsize::new(0),
            is_length_tracked: AtomicBool::new(config.track_length),
        }
    }

    fn mark_initialized(&self) {
        self.initialized.store(true, Ordering::Relaxed);
    }

    #[inline]
    fn zero_out_policy(&self) -> ZeroOut {
        if self.zero_out.load(Ordering::Relaxed) {
            ZeroOut::Zero
        } else {
            ZeroOut::NoZero
        }
    }

    fn take_or_alloc(&self, cached: &mut Option<ValueSlice<T>>) -> ValueSlice<T> {
        cached
            .take()
            .unwrap_or_else(|| ValueSlice::with_capacity(self.slice_size.load(Ordering::Relaxed)))
    }

    fn track_length(&self, delta: i64) {
        if !self.is_length_tracked.load(Ordering::Relaxed) {
            return;
        }
        let new_len = if delta >= 0 {
            self.length.fetch_add(delta as usize, Ordering::AcqRel) + delta as usize
        } else {
            let dec = (-delta) as usize;
            loop {
                let cur = self.length.load(Ordering::Acquire);
                let next = cur.saturating_sub(dec);
                if self
                    .length
                    .compare_exchange_weak(cur, next, Ordering::AcqRel, Ordering::Acquire)
                    .is_ok()
                {
                    break next;
                }
            }
        };
        let mut cur_max = self.max_length.load(Ordering::Relaxed);
        while new_len > cur_max {
            match self.max_length.compare_exchange_weak(
                cur_max,
                new_len,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => cur_max = observed,
            }
        }
    }

    fn recycle_old_output(&self, output: &mut OutputState<T>, mut old: ValueSlice<T>) {
        let min = self.slice_size.load(Ordering::Relaxed);
        let max = self.max_retain_size.load(Ordering::Relaxed);
        if output.cached_output.is_none() && old.within_retain_range(min, max) {
            old.clear_for_reuse(self.zero_out_policy());
            output.cached_output = Some(old);
        }
    }

    fn try_clear_bits_if_output_empty(&self, output: &OutputState<T>) {
        if output.output.as_ref().map_or(true, ValueSlice::is_empty) && output.outputs.is_empty()
        {
            let _ = self.has_data_bits.compare_exchange(
                ANY,
                0,
                Ordering::AcqRel,
                Ordering::Acquire,
            );
        }
    }

    /// Holds output lock (already acquired by the caller), then input
    /// lock — the one permitted lock nesting in this type, alongside
    /// [`Self::get_all`].
    fn transfer_from_input(
        &self,
        output: &mut OutputState<T>,
        action: TransferAction,
    ) -> Option<ValueSlice<T>> {
        debug_assert_lock_order!(self.output);
        if output.cached_output.is_none() {
            output.cached_output = Some(ValueSlice::with_capacity(
                self.slice_size.load(Ordering::Relaxed),
            ));
        }
        let mut input = self.input.lock().unwrap();

        if input.cached_input.is_none() {
            if let Some(gift) = output.cached_output.take() {
                input.cached_input = Some(gift);
            }
        }

        let result = input
            .queue
            .take()
            .or_else(|| input.sos.pop_front());

        while let Some(s) = input.sos.pop_front() {
            debug_assert_slice_nonempty!(s);
            output.outputs.push_back(s);
        }
        input.is_local_last = false;

        let still_has_data = match action {
            TransferAction::OneValue => result.as_ref().map_or(false, |s| s.len() > 1),
            TransferAction::OneSlice => false,
        } || !output.outputs.is_empty();

        self.store_bits(if still_has_data { ANY } else { 0 });
        result
    }

    /// Enqueues one element. Never blocks on capacity, only briefly on
    /// the input lock.
    pub fn send(&self, value: T) {
        self.mark_initialized();
        let policy = self.zero_out_policy();
        {
            let mut input = self.input.lock().unwrap();
            if input.sos.is_empty() {
                match input.queue.as_mut() {
                    Some(q) => q.append_one(value, policy),
                    None => {
                        let mut slice = self.take_or_alloc(&mut input.cached_input);
                        slice.append_one(value, policy);
                        input.queue = Some(slice);
                    }
                }
            } else if input.is_local_last {
                let Some(last) = input.sos.back_mut() else {
                    fatal_invariant!("is_local_last set but sos is empty");
                };
                last.append_one(value, policy);
            } else {
                let mut slice = self.take_or_alloc(&mut input.cached_input);
                slice.append_one(value, policy);
                debug_assert_slice_nonempty!(slice);
                input.sos.push_back(slice);
                input.is_local_last = true;
            }
        }
        self.store_bits(ANY | INPUT);
        self.track_length(1);
        update_wait(self);
    }

    /// Enqueues by transferring ownership of an entire slice. A slice
    /// with no elements is a no-op.
    pub fn send_slice(&self, slice: ValueSlice<T>) {
        if slice.is_empty() {
            return;
        }
        self.mark_initialized();
        let len = slice.len() as i64;
        {
            let mut input = self.input.lock().unwrap();
            debug_assert_slice_nonempty!(slice);
            input.sos.push_back(slice);
            input.is_local_last = false;
        }
        self.store_bits(ANY | INPUT);
        self.track_length(len);
        update_wait(self);
    }

    /// Copies `values` into a fresh slice, then [`send_slice`](Self::send_slice)s it.
    pub fn send_clone(&self, values: &[T])
    where
        T: Clone,
    {
        if values.is_empty() {
            return;
        }
        let mut copy = ValueSlice::with_capacity(values.len());
        copy.append_many(values.iter().cloned(), self.zero_out_policy());
        self.send_slice(copy);
    }

    /// Non-blocking single-value take.
    pub fn get(&self) -> (Option<T>, bool) {
        self.mark_initialized();
        if !self.any() {
            return (None, false);
        }
        let mut output = self.output.lock().unwrap();
        if !self.any() {
            return (None, false);
        }

        if output.output.as_ref().map_or(true, ValueSlice::is_empty) && !output.outputs.is_empty()
        {
            if let Some(old) = output.output.take() {
                self.recycle_old_output(&mut output, old);
            }
            output.output = output.outputs.pop_front();
        }

        let policy = self.zero_out_policy();
        let value = if output.output.as_ref().map_or(false, |s| !s.is_empty()) {
            let v = output.output.as_mut().unwrap().take_first(policy);
            self.try_clear_bits_if_output_empty(&output);
            v
        } else if let Some(mut slice) = self.transfer_from_input(&mut output, TransferAction::OneValue) {
            let v = slice.take_first(policy);
            if !slice.is_empty() {
                output.output = Some(slice);
            }
            v
        } else {
            None
        };

        let has_value = value.is_some();
        drop(output);
        if has_value {
            self.track_length(-1);
        }
        update_wait(self);
        (value, has_value)
    }

    /// Non-blocking take of an entire non-empty slice, if any is available.
    pub fn get_slice(&self) -> Option<ValueSlice<T>> {
        self.mark_initialized();
        if !self.any() {
            return None;
        }
        let mut output = self.output.lock().unwrap();
        if !self.any() {
            return None;
        }

        let result = if output.output.as_ref().map_or(false, |s| !s.is_empty()) {
            let r = output.output.take();
            self.try_clear_bits_if_output_empty(&output);
            r
        } else if !output.outputs.is_empty() {
            if let Some(old) = output.output.take() {
                self.recycle_old_output(&mut output, old);
            }
            let r = output.outputs.pop_front();
            self.try_clear_bits_if_output_empty(&output);
            r
        } else {
            self.transfer_from_input(&mut output, TransferAction::OneSlice)
        };

        let len = result.as_ref().map_or(0, ValueSlice::len);
        drop(output);
        if len > 0 {
            self.track_length(-(len as i64));
        }
        update_wait(self);
        result
    }

    /// Non-blocking take of everything currently queued, coalesced
    /// into a single slice. Returns `None` only if the queue was
    /// entirely empty.
    pub fn get_all(&self) -> Option<ValueSlice<T>> {
        self.mark_initialized();
        let mut output = self.output.lock().unwrap();
        debug_assert_lock_order!(self.output);
        let mut input = self.input.lock().unwrap();

        let mut total_len = 0usize;
        if let Some(o) = &output.output {
            total_len += o.len();
        }
        total_len += output.outputs.iter().map(ValueSlice::len).sum::<usize>();
        if let Some(q) = &input.queue {
            total_len += q.len();
        }
        total_len += input.sos.iter().map(ValueSlice::len).sum::<usize>();

        if total_len == 0 {
            self.store_bits(0);
            drop(input);
            drop(output);
            update_wait(self);
            return None;
        }

        let mut coalesced: Vec<T> = Vec::with_capacity(total_len);
        if let Some(o) = output.output.take() {
            coalesced.extend(o.into_vec());
        }
        while let Some(s) = output.outputs.pop_front() {
            coalesced.extend(s.into_vec());
        }
        if let Some(q) = input.queue.take() {
            coalesced.extend(q.into_vec());
        }
        while let Some(s) = input.sos.pop_front() {
            coalesced.extend(s.into_vec());
        }
        input.is_local_last = false;

        self.store_bits(0);
        drop(input);
        drop(output);
        self.track_length(-(total_len as i64));
        update_wait(self);
        Some(ValueSlice::from_vec(coalesced))
    }

    /// Fills as much of `buf` as possible from the queue.
    pub fn read(&self, buf: &mut [T]) -> ReadOutcome {
        self.mark_initialized();
        let mut filled = 0usize;
        if !buf.is_empty() {
            let policy = self.zero_out_policy();
            let mut output = self.output.lock().unwrap();
            loop {
                if filled >= buf.len() {
                    break;
                }
                if output.output.as_ref().map_or(true, ValueSlice::is_empty) {
                    if let Some(old) = output.output.take() {
                        self.recycle_old_output(&mut output, old);
                    }
                    match output.outputs.pop_front() {
                        Some(next) => output.output = Some(next),
                        None => break,
                    }
                }
                let slice = output.output.as_mut().unwrap();
                while filled < buf.len() && !slice.is_empty() {
                    let Some(value) = slice.take_first(policy) else {
                        fatal_invariant!(
                            "take_first returned None on a slice just checked non-empty"
                        );
                    };
                    buf[filled] = value;
                    filled += 1;
                }
            }
            if filled < buf.len() {
                if let Some(mut slice) =
                    self.transfer_from_input(&mut output, TransferAction::OneSlice)
                {
                    while filled < buf.len() && !slice.is_empty() {
                        let Some(value) = slice.take_first(policy) else {
                            fatal_invariant!(
                                "take_first returned None on a slice just checked non-empty"
                            );
                        };
                        buf[filled] = value;
                        filled += 1;
                    }
                    if !slice.is_empty() {
                        output.output = Some(slice);
                    }
                }
            }
            self.try_clear_bits_if_output_empty(&output);
        }
        if filled > 0 {
            self.track_length(-(filled as i64));
        }
        update_wait(self);
        let end = !self.any() && self.close_invoked.load(Ordering::Acquire);
        ReadOutcome { filled, end }
    }

    /// Blocks the calling OS thread until a value arrives or the
    /// queue is closed and drained.
    pub fn await_value(&self) -> (Option<T>, bool) {
        const POLL: std::time::Duration = std::time::Duration::from_millis(20);
        loop {
            let (value, has_value) = self.get();
            if has_value {
                return (value, true);
            }
            if self.is_closed() {
                return (None, false);
            }
            self.data_wait_ch()
                .wait_timeout_until(POLL, || self.is_closed());
        }
    }

    /// Async counterpart of [`await_value`](Self::await_value), composable via `tokio::select!`.
    pub async fn await_value_async(&self) -> (Option<T>, bool) {
        loop {
            let (value, has_value) = self.get();
            if has_value {
                return (value, true);
            }
            if self.is_closed() {
                return (None, false);
            }
            tokio::select! {
                _ = self.data_wait_ch().wait_async() => {},
                _ = self.empty.wait_async() => {},
            }
        }
    }

    /// Repeatedly takes values and calls `f`, stopping when `f`
    /// returns `false` or the queue is closed-and-empty.
    pub fn for_each<F>(&self, mut f: F)
    where
        F: FnMut(T) -> bool,
    {
        loop {
            let (value, has_value) = self.await_value();
            let Some(value) = value else {
                debug_assert!(!has_value);
                return;
            };
            if !f(value) {
                return;
            }
        }
    }

    /// Wait handle closed while data is present, reopening once the
    /// queue drains; eventually consistent. First call activates its
    /// maintenance.
    pub fn data_wait_ch(&self) -> &Cyclic {
        if !self.data_wait_active.swap(true, Ordering::AcqRel) {
            update_wait(self);
        }
        &self.data_wait
    }

    /// Wait handle for the one-shot that fires once `close()` has
    /// been called and the queue has fully drained.
    pub fn close_ch(&self) -> &OneShot {
        &self.empty
    }

    /// Idempotent. Marks the queue closed; `send*` remains accepted.
    pub fn close(&self) {
        let was_closed = self.close_invoked.swap(true, Ordering::AcqRel);
        debug_assert_close_monotonic!(was_closed, true);
        update_wait(self);
        if !was_closed {
            // `update_wait` only toggles data_wait's own open/closed state
            // on an ANY transition; closing on an already-empty queue
            // leaves data_wait open, so a thread already parked in
            // `await_value`'s Condvar would otherwise sit out the full
            // poll timeout before re-checking `is_closed()`.
            self.data_wait.notify_all();
        }
    }

    /// `true` iff `close()` has been called and the queue is fully drained.
    pub fn is_closed(&self) -> bool {
        self.close_invoked.load(Ordering::Acquire) && !self.any()
    }

    /// `true` iff `close()` has been called, regardless of drain state.
    /// Unlike [`is_closed`](Self::is_closed), this does not also require
    /// the queue to be empty.
    pub fn close_requested(&self) -> bool {
        self.close_invoked.load(Ordering::Acquire)
    }

    /// Sets the per-slice allocation target. `size <= 0` resets to default sizing.
    pub fn set_size(&self, size: i64) {
        let cfg = QueueConfig::default().set_size::<T>(size);
        self.slice_size
            .store(cfg.initial_slice_size.resolve::<T>(), Ordering::Relaxed);
        self.max_retain_size
            .store(cfg.max_retain_size::<T>(), Ordering::Relaxed);
        self.is_low_alloc
            .store(cfg.is_low_alloc::<T>(), Ordering::Relaxed);
    }

    /// `(current length, historical max length)`. First call enables tracking.
    pub fn length(&self) -> (usize, usize) {
        self.is_length_tracked.store(true, Ordering::Release);
        (
            self.length.load(Ordering::Acquire),
            self.max_length.load(Ordering::Acquire),
        )
    }
}

impl<T: Default> Default for AwaitableQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for AwaitableQueue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let closed = self.close_invoked.load(Ordering::Relaxed);
        let any = self.any();
        let state = if closed && !any {
            "closed"
        } else if closed && any {
            "drain"
        } else if any {
            "data"
        } else if !self.initialized.load(Ordering::Relaxed) {
            "uninit"
        } else {
            "empty"
        };
        write!(
            f,
            "awaitableSlice:{}_state:{}_{:#x}",
            std::any::type_name::<T>(),
            state,
            self as *const Self as usize
        )
    }
}

/// Reconciles `has_data_bits` against the lazily-activated `data_wait`
/// handle, and fires `empty` once closed-and-drained. Cheap in the
/// common case: an atomic equality check against the cached handle
/// state, falling through to `wait_maintenance_lock` only when a
/// transition is actually needed.
pub(crate) fn update_wait<T: Default>(queue: &AwaitableQueue<T>) {
    if queue.data_wait_active.load(Ordering::Acquire) {
        let any = queue.any();
        if queue.data_wait.is_closed() != any {
            let _guard = queue.wait_maintenance_lock.lock().unwrap();
            let any = queue.any();
            if queue.data_wait.is_closed() != any {
                if any {
                    queue.data_wait.close();
                } else {
                    queue.data_wait.open();
                }
            }
        }
    }
    if queue.close_invoked.load(Ordering::Acquire) && !queue.any() && !queue.empty.is_closed() {
        debug_assert_empty_after_close!(true);
        queue.empty.close();
    }
}

// SAFETY: all interior mutability is via `Mutex`/atomics; `T` only
// ever moves, never aliases, so this is exactly as Send/Sync as a
// `Mutex<T>` would be.
unsafe impl<T: Send> Send for AwaitableQueue<T> {}
unsafe impl<T: Send> Sync for AwaitableQueue<T> {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_then_get_single_value() {
        let q: AwaitableQueue<i32> = AwaitableQueue::new();
        q.send(1);
        assert_eq!(q.get(), (Some(1), true));
        assert_eq!(q.get(), (None, false));
    }

    #[test]
    fn fifo_order_preserved_within_one_producer() {
        let q: AwaitableQueue<i32> = AwaitableQueue::new();
        for i in 0..20 {
            q.send(i);
        }
        for i in 0..20 {
            assert_eq!(q.get(), (Some(i), true));
        }
        assert_eq!(q.get(), (None, false));
    }

    #[test]
    fn send_slice_then_get_slice() {
        let q: AwaitableQueue<i32> = AwaitableQueue::new();
        let mut s = ValueSlice::with_capacity(3);
        s.append_many([10, 20, 30], ZeroOut::Zero);
        q.send_slice(s);
        let got = q.get_slice().unwrap();
        assert_eq!(got.as_slice(), &[10, 20, 30]);
    }

    #[test]
    fn get_all_coalesces_everything() {
        let q: AwaitableQueue<i32> = AwaitableQueue::new();
        q.send(1);
        let mut s = ValueSlice::with_capacity(2);
        s.append_many([2, 3], ZeroOut::Zero);
        q.send_slice(s);
        q.send(4);
        let all = q.get_all().unwrap();
        assert_eq!(all.as_slice(), &[1, 2, 3, 4]);
        assert_eq!(q.get(), (None, false));
    }

    #[test]
    fn close_then_drain_fires_empty() {
        let q: AwaitableQueue<i32> = AwaitableQueue::new();
        q.send(5);
        q.close();
        assert!(!q.close_ch().is_closed());
        assert_eq!(q.get(), (Some(5), true));
        assert!(q.close_ch().is_closed());
        assert!(q.is_closed());
    }

    #[test]
    fn send_after_close_still_delivered() {
        let q: AwaitableQueue<i32> = AwaitableQueue::new();
        q.send_slice({
            let mut s = ValueSlice::with_capacity(2);
            s.append_many([5, 6], ZeroOut::Zero);
            s
        });
        q.close();
        q.send(7);
        assert!(!q.close_ch().is_closed());
        assert_eq!(q.get(), (Some(5), true));
        assert_eq!(q.get(), (Some(6), true));
        assert!(!q.close_ch().is_closed());
        assert_eq!(q.get(), (Some(7), true));
        assert!(q.close_ch().is_closed());
    }

    #[test]
    fn read_fills_buffer_and_reports_end() {
        let q: AwaitableQueue<i32> = AwaitableQueue::new();
        let mut s = ValueSlice::with_capacity(5);
        s.append_many([1, 2, 3, 4, 5], ZeroOut::Zero);
        q.send_slice(s);
        q.close();
        let mut buf = [0i32; 3];
        let first = q.read(&mut buf);
        assert_eq!(first, ReadOutcome { filled: 3, end: false });
        assert_eq!(&buf, &[1, 2, 3]);
        let second = q.read(&mut buf);
        assert_eq!(second.filled, 2);
        assert!(second.end);
        assert_eq!(&buf[..2], &[4, 5]);
    }

    #[test]
    fn debug_format_reflects_state() {
        let q: AwaitableQueue<i32> = AwaitableQueue::new();
        assert!(format!("{q:?}").contains("state:uninit"));
        q.send(1);
        assert!(format!("{q:?}").contains("state:data"));
        q.get();
        assert!(format!("{q:?}").contains("state:empty"));
        q.close();
        assert!(format!("{q:?}").contains("state:closed"));
    }

    #[test]
    fn length_tracking_reports_current_and_max() {
        let q: AwaitableQueue<i32> = AwaitableQueue::new();
        q.send(1);
        q.send(2);
        let (cur, max) = q.length();
        assert_eq!(cur, 0); // tracking only begins after this first length() call
        q.send(3);
        let (cur, max) = q.length();
        assert_eq!(cur, 1);
        assert_eq!(max, 1);
        let _ = max;
    }
}
