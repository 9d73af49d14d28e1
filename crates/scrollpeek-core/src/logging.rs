#![forbid(unsafe_code)]

//! Logging shim for the pure helpers.
//!
//! With the `tracing` feature `trace!` is the real `tracing` macro. Without
//! it the macro expands to nothing, so the locator and estimator stay free
//! of any logging cost in hot scroll paths.

#[cfg(feature = "tracing")]
pub use tracing::trace;

#[cfg(not(feature = "tracing"))]
mod noop_macros {
    /// No-op trace macro when tracing is disabled.
    #[macro_export]
    macro_rules! trace {
        ($($arg:tt)*) => {};
    }
}
