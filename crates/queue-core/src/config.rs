//! Queue configuration and the tunable constants that back defaults.

use crate::zero_out::ZeroOutConfig;

/// Larger of 10 elements or 4 KiB worth of elements — the fallback
/// used when no explicit slice size is configured.
pub const DEFAULT_MIN_ELEMENTS: usize = 10;
/// Target bytes per freshly-allocated slice when sizing from `T`'s size.
pub const TARGET_SLICE_BYTES: usize = 4096;
/// Floor applied to `max_retain_size` regardless of configured slice size.
pub const MAX_RETAIN_FLOOR: usize = 100;
/// Upper bound on a single `append_one`/`append_many` growth step.
pub const MAX_APPEND_CAPACITY: usize = 16 * 1024 * 1024;

/// Per-slice allocation sizing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SliceSize {
    /// `max(DEFAULT_MIN_ELEMENTS, TARGET_SLICE_BYTES / size_of::<T>())`.
    #[default]
    Default,
    /// An explicit element count.
    Elements(usize),
}

impl SliceSize {
    /// Resolves to a concrete element count for element type `T`.
    pub fn resolve<T>(self) -> usize {
        match self {
            SliceSize::Default => {
                let by_bytes = TARGET_SLICE_BYTES / std::mem::size_of::<T>().max(1);
                DEFAULT_MIN_ELEMENTS.max(by_bytes)
            }
            SliceSize::Elements(n) if n == 0 => SliceSize::Default.resolve::<T>(),
            SliceSize::Elements(n) => n,
        }
    }
}

/// User-facing configuration for an [`crate::queue::AwaitableQueue`].
#[derive(Debug, Clone, Default)]
pub struct QueueConfig {
    /// Per-slice allocation target.
    pub initial_slice_size: SliceSize,
    /// Eviction-clearing policy override.
    pub zero_out: ZeroOutConfig,
    /// Whether `length()` tracking is enabled from construction.
    pub track_length: bool,
}

impl QueueConfig {
    pub fn with_initial_slice_size(mut self, size: SliceSize) -> Self {
        self.initial_slice_size = size;
        self
    }

    pub fn with_zero_out(mut self, policy: ZeroOutConfig) -> Self {
        self.zero_out = policy;
        self
    }

    pub fn with_track_length(mut self, track: bool) -> Self {
        self.track_length = track;
        self
    }

    /// `set_size`'s recognized-input mapping (§6): `size <= 0` is
    /// `SliceSize::Default`; a small size with small total bytes is
    /// "low-alloc" (still just `Elements(size)` — the distinction
    /// only affects `max_retain_size` via [`Self::max_retain_size`]).
    pub fn set_size<T>(mut self, size: i64) -> Self {
        self.initial_slice_size = if size <= 0 {
            SliceSize::Default
        } else {
            SliceSize::Elements(size as usize)
        };
        self
    }

    /// `max_retain_size = max(configured size, MAX_RETAIN_FLOOR)`.
    pub fn max_retain_size<T>(&self) -> usize {
        self.initial_slice_size
            .resolve::<T>()
            .max(MAX_RETAIN_FLOOR)
    }

    /// Low-alloc mode: `0 < size <= DEFAULT_MIN_ELEMENTS` and the
    /// resulting slice is smaller than `TARGET_SLICE_BYTES`.
    pub fn is_low_alloc<T>(&self) -> bool {
        match self.initial_slice_size {
            SliceSize::Elements(n) if n > 0 && n <= DEFAULT_MIN_ELEMENTS => {
                n * std::mem::size_of::<T>() < TARGET_SLICE_BYTES
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_slice_size_uses_byte_target() {
        assert_eq!(SliceSize::Default.resolve::<u8>(), TARGET_SLICE_BYTES);
        assert_eq!(SliceSize::Default.resolve::<[u8; 1024]>(), DEFAULT_MIN_ELEMENTS);
    }

    #[test]
    fn set_size_nonpositive_resets_to_default() {
        let cfg = QueueConfig::default().set_size::<u64>(0);
        assert_eq!(cfg.initial_slice_size, SliceSize::Default);
    }

    #[test]
    fn set_size_positive_is_verbatim() {
        let cfg = QueueConfig::default().set_size::<u64>(5);
        assert_eq!(cfg.initial_slice_size, SliceSize::Elements(5));
        assert!(cfg.is_low_alloc::<u64>());
    }

    #[test]
    fn max_retain_size_respects_floor() {
        let cfg = QueueConfig::default().set_size::<u64>(5);
        assert_eq!(cfg.max_retain_size::<u64>(), MAX_RETAIN_FLOOR);
    }
}
