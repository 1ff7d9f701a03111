#![forbid(unsafe_code)]

//! Core: geometry, abstract input events, and logging shims.

pub mod event;
pub mod geometry;
pub mod logging;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, debug_span, error, trace, trace_span};
