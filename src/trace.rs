//! Diagnostics plumbing: conditional tracing macros and a split timer.
//!
//! With the `tracing` feature the macros forward to `tracing`; without it they
//! compile to nothing, so call sites never need `cfg` attributes. Diagnostics
//! never influence search results.

use std::time::{Duration, Instant};

/// Create an info-level span around a search call or pyramid level.
#[cfg(feature = "tracing")]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        tracing::info_span!($name $(, $($field)*)?)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_span {
    ($name:expr $(, $($field:tt)*)?) => {
        $crate::trace::NoopSpan
    };
}

/// Emit an info-level event with primitive fields.
///
/// Without the `tracing` feature the field expressions are still evaluated so
/// that bindings used only for diagnostics do not trigger unused warnings.
#[cfg(feature = "tracing")]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        tracing::info!(name: $name, $($key = $value),+)
    };
    ($name:expr) => {
        tracing::info!(name: $name)
    };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_event {
    ($name:expr, $($key:ident = $value:expr),+ $(,)?) => {
        let _ = ($($value,)+);
    };
    ($name:expr) => {};
}

pub(crate) use trace_event;
pub(crate) use trace_span;

/// Span stand-in used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Returns self, mimicking `Span::entered()`.
    #[inline]
    pub fn entered(self) -> Self {
        self
    }
}

/// Measures the time between consecutive checkpoints of a search.
pub(crate) struct SplitTimer {
    last: Instant,
}

impl SplitTimer {
    pub(crate) fn start() -> Self {
        Self {
            last: Instant::now(),
        }
    }

    /// Returns the time since the previous split (or start) and resets.
    pub(crate) fn split(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last);
        self.last = now;
        elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::SplitTimer;

    #[test]
    fn split_timer_is_monotonic() {
        let mut timer = SplitTimer::start();
        let first = timer.split();
        let second = timer.split();
        assert!(first.as_secs() < 60);
        assert!(second.as_secs() < 60);
    }
}
