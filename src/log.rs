//! Logging shims for layout and rewrite diagnostics.
//!
//! With the `tracing` feature the macros below are `tracing`'s own; without it
//! they swallow their arguments, so call sites never need a `cfg`.

#[cfg(feature = "tracing")]
pub use tracing::{debug, warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::{debug, warn};
