#![forbid(unsafe_code)]

//! Logging and tracing support.
//!
//! With the `tracing` feature enabled the usual `tracing` macros are
//! re-exported. Without it, no-op macros with the same names are exported at
//! the crate root so instrumented call sites compile unchanged.

#[cfg(feature = "tracing")]
pub use tracing::{debug, debug_span, error, trace, trace_span};

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op debug macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    /// No-op debug_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! debug_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }

    /// No-op error macro when tracing is disabled.
    #[macro_export]
    macro_rules! error {
        ($($arg:tt)*) => {};
    }

    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }

    /// No-op trace_span macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace_span {
        ($($arg:tt)*) => {
            $crate::logging::NoopSpan
        };
    }
}

/// Span stand-in used when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSpan;

#[cfg(not(feature = "tracing"))]
impl NoopSpan {
    /// Enter the span. Returns a guard that does nothing on drop.
    #[inline]
    pub fn enter(&self) -> NoopGuard {
        NoopGuard
    }

    /// Owned variant of [`NoopSpan::enter`], mirroring `Span::entered`.
    #[inline]
    pub fn entered(self) -> NoopGuard {
        NoopGuard
    }
}

/// Guard returned by [`NoopSpan::enter`].
#[cfg(not(feature = "tracing"))]
#[derive(Debug)]
pub struct NoopGuard;

#[cfg(all(test, not(feature = "tracing")))]
mod tests {
    #[test]
    fn noop_macros_accept_tracing_syntax() {
        crate::debug!(width = 3, "laid out {}", "child");
        crate::error!("geometry failure");
        let span = crate::debug_span!("frame", width = 80, height = 24);
        let _guard = span.enter();
        let _owned = crate::trace_span!("paint", kind = "padding").entered();
    }
}
