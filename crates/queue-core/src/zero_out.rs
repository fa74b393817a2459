//! The `ZeroOut` eviction policy.

/// Governs whether a logically-freed element slot is overwritten with
/// `T::default()` before its backing storage is reused or retained.
///
/// `Zero` keeps a recycled backing array from holding stale `T` values
/// alive (relevant when `T` carries references, e.g. `Arc<_>` or boxed
/// data); `NoZero` skips the overwrite for types that cannot retain
/// anything worth collecting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZeroOut {
    /// Overwrite evicted slots with the default value.
    Zero,
    /// Leave evicted slots as-is.
    NoZero,
}

impl ZeroOut {
    #[inline]
    pub(crate) fn should_zero(self) -> bool {
        matches!(self, ZeroOut::Zero)
    }
}

/// User-facing override, as accepted by [`crate::config::QueueConfig`].
///
/// Stable Rust has no sound way to ask "does `T` contain embedded
/// references" at compile time without specialization, so `Auto`
/// resolves to the conservative choice ([`ZeroOut::Zero`]) rather than
/// attempting to infer it. Callers who know `T` is purely inline data
/// can opt out explicitly via `NoZero`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ZeroOutConfig {
    /// Resolve to [`ZeroOut::Zero`].
    #[default]
    Auto,
    /// Force [`ZeroOut::Zero`].
    Zero,
    /// Force [`ZeroOut::NoZero`].
    NoZero,
}

impl ZeroOutConfig {
    #[inline]
    pub(crate) fn resolve(self) -> ZeroOut {
        match self {
            ZeroOutConfig::Auto | ZeroOutConfig::Zero => ZeroOut::Zero,
            ZeroOutConfig::NoZero => ZeroOut::NoZero,
        }
    }
}
