//! Error taxonomy and the lock-free `AtomicError` accumulator.

use std::fmt;
use std::sync::atomic::{AtomicPtr, Ordering};
use thiserror::Error;

/// Fatal internal errors. Constructors here are only ever used by the
/// `fatal_*!` macros in [`crate::invariants`], which `panic!` with the
/// variant's `Display` — these never cross an API boundary as a
/// `Result`.
#[derive(Debug, Clone, Error)]
pub enum QueueError {
    /// A required argument was nil/absent.
    #[error("argument `{param}` must not be nil (caller: {caller})")]
    ArgumentNil {
        /// Name of the offending parameter.
        param: &'static str,
        /// Name of the function that received it.
        caller: &'static str,
    },
    /// An internal invariant failed. Implies a bug.
    #[error("invariant violated: {0}")]
    InvariantViolated(&'static str),
}

struct ChainNode<E> {
    err: E,
    next: *mut ChainNode<E>,
}

/// Lock-free multi-producer accumulator of user-submitted errors.
///
/// Appends are a classic Treiber-stack CAS-prepend; `add(None)` is a
/// no-op. Order among concurrent appenders is unspecified.
pub struct AtomicError<E> {
    head: AtomicPtr<ChainNode<E>>,
}

impl<E> AtomicError<E> {
    pub fn new() -> Self {
        Self {
            head: AtomicPtr::new(std::ptr::null_mut()),
        }
    }

    /// Appends `err` to the chain. No-op if `err` is `None`.
    pub fn add(&self, err: Option<E>) {
        let Some(err) = err else { return };
        let node = Box::into_raw(Box::new(ChainNode {
            err,
            next: std::ptr::null_mut(),
        }));
        let mut head = self.head.load(Ordering::Acquire);
        loop {
            // SAFETY: node was just allocated by this call and is not
            // yet reachable from `head`, so writing `next` is exclusive.
            unsafe { (*node).next = head };
            match self.head.compare_exchange_weak(
                head,
                node,
                Ordering::AcqRel,
                Ordering::Acquire,
            ) {
                Ok(_) => return,
                Err(observed) => head = observed,
            }
        }
    }

    /// Snapshots the current chain, or `None` if nothing was ever added.
    pub fn get(&self) -> Option<ErrorChain<E>>
    where
        E: Clone,
    {
        let mut errs = Vec::new();
        let mut cursor = self.head.load(Ordering::Acquire);
        while !cursor.is_null() {
            // SAFETY: nodes are never freed while reachable from `head`
            // (freed only in `Drop`, which runs after all other access
            // has stopped), so `cursor` is valid for this read.
            let node = unsafe { &*cursor };
            errs.push(node.err.clone());
            cursor = node.next;
        }
        if errs.is_empty() {
            None
        } else {
            Some(ErrorChain { errs })
        }
    }

    /// `true` if no error has been added yet.
    pub fn is_empty(&self) -> bool {
        self.head.load(Ordering::Acquire).is_null()
    }
}

impl<E> Default for AtomicError<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Drop for AtomicError<E> {
    fn drop(&mut self) {
        let mut cursor = *self.head.get_mut();
        while !cursor.is_null() {
            // SAFETY: exclusive access via &mut self; walks the chain
            // once, freeing each node exactly once.
            let node = unsafe { Box::from_raw(cursor) };
            cursor = node.next;
        }
    }
}

// SAFETY: nodes are only ever reached through the atomic head pointer
// and freed once, under exclusive access; ownership of `E` moves with
// the node, so `AtomicError<E>` is Send/Sync exactly when `E` is.
unsafe impl<E: Send> Send for AtomicError<E> {}
unsafe impl<E: Send> Sync for AtomicError<E> {}

/// An immutable snapshot of the errors accumulated in an [`AtomicError`]
/// at the moment [`AtomicError::get`] was called.
#[derive(Debug)]
pub struct ErrorChain<E> {
    errs: Vec<E>,
}

impl<E> ErrorChain<E> {
    /// Errors in the chain, most recently added first.
    pub fn iter(&self) -> impl Iterator<Item = &E> {
        self.errs.iter()
    }

    pub fn len(&self) -> usize {
        self.errs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errs.is_empty()
    }
}

impl<E: fmt::Display> fmt::Display for ErrorChain<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} accumulated error(s)", self.errs.len())?;
        for (i, e) in self.errs.iter().enumerate() {
            write!(f, "\n  [{i}] {e}")?;
        }
        Ok(())
    }
}

impl<E: fmt::Debug + fmt::Display> std::error::Error for ErrorChain<E> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[derive(Debug, Clone, PartialEq, Eq, Error)]
    #[error("boom {0}")]
    struct Boom(u32);

    #[test]
    fn empty_chain_is_none() {
        let errs: AtomicError<Boom> = AtomicError::new();
        assert!(errs.get().is_none());
        assert!(errs.is_empty());
    }

    #[test]
    fn add_none_is_noop() {
        let errs: AtomicError<Boom> = AtomicError::new();
        errs.add(None);
        assert!(errs.get().is_none());
    }

    #[test]
    fn accumulates_all_submitted_errors() {
        let errs: AtomicError<Boom> = AtomicError::new();
        errs.add(Some(Boom(1)));
        errs.add(Some(Boom(2)));
        errs.add(Some(Boom(3)));
        let chain = errs.get().unwrap();
        assert_eq!(chain.len(), 3);
        let mut values: Vec<u32> = chain.iter().map(|b| b.0).collect();
        values.sort_unstable();
        assert_eq!(values, vec![1, 2, 3]);
    }

    #[test]
    fn concurrent_producers_all_land_in_chain() {
        let errs = Arc::new(AtomicError::<Boom>::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let errs = Arc::clone(&errs);
                thread::spawn(move || errs.add(Some(Boom(i))))
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let chain = errs.get().unwrap();
        assert_eq!(chain.len(), 8);
    }
}
