#![forbid(unsafe_code)]

//! Structured logging hooks.
//!
//! With the `tracing` feature the usual macros are re-exported from the crate
//! root, so downstream crates can log through `sortable_core::debug!` without
//! naming `tracing` themselves. Without the feature this module is empty and
//! instrumentation compiles away.
//!
//! The `tracing-json` feature adds [`init_json_logging`], a one-call
//! subscriber setup for production hosts that ship logs as JSON lines.
//! Filtering follows `RUST_LOG` and falls back to `sortable=info`.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};

/// Default filter used when `RUST_LOG` is unset.
#[cfg(feature = "tracing-json")]
pub const DEFAULT_LOG_FILTER: &str = "sortable=info";

/// Install a global JSON subscriber writing to stderr.
///
/// Returns `false` if a global subscriber was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_logging() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
