#![forbid(unsafe_code)]

//! Engine logging.
//!
//! Call sites use `folio_core::{trace, debug, info, warn, error}`. The
//! `tracing` feature binds those names to the `tracing` macros; otherwise
//! they swallow their arguments and compile to nothing.
//!
//! | level   | used for                                              |
//! |---------|-------------------------------------------------------|
//! | `trace` | per-step detail: scramble ticks, focus index changes  |
//! | `debug` | lifecycle: mounts, teardowns, theme and mode switches |
//! | `warn`  | host failures the engines survive (browser APIs)      |
//!
//! Hosts that want the events on stdout enable `tracing-json` and call
//! [`init_json_logging`] once at startup; [`ENV_LOG_FILTER`] selects levels.

#[cfg(feature = "tracing")]
pub use tracing::{debug, error, info, trace, warn};

// Disabled levels. Arguments are not evaluated.

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! trace {
    ($($ignored:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! debug {
    ($($ignored:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! info {
    ($($ignored:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! warn {
    ($($ignored:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! error {
    ($($ignored:tt)*) => {};
}

/// Environment variable holding an `EnvFilter` directive, e.g.
/// `folio_fx=trace,info`.
pub const ENV_LOG_FILTER: &str = "FOLIO_LOG";

/// Directive used when [`ENV_LOG_FILTER`] is unset or blank.
pub const DEFAULT_FILTER: &str = "info";

/// Filter directive for a raw [`ENV_LOG_FILTER`] value.
#[must_use]
pub fn filter_directive(raw: Option<&str>) -> &str {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .unwrap_or(DEFAULT_FILTER)
}

/// Install a global JSON subscriber on stdout.
///
/// An unparsable [`ENV_LOG_FILTER`] falls back to [`DEFAULT_FILTER`]. Fails
/// if a global subscriber is already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    use tracing_subscriber::EnvFilter;

    let raw = std::env::var(ENV_LOG_FILTER).ok();
    let filter = EnvFilter::try_new(filter_directive(raw.as_deref()))
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
}
