//! Logging integration using tracing.
//!
//! Sets up a tracing subscriber writing to stderr and a bridge that
//! forwards `log` crate calls to tracing. `RUST_LOG` wins when set;
//! otherwise the level comes from the `--log-level` argument, falling
//! back to `info`.
//!
//! # Example
//!
//! ```ignore
//! use nodelet_zenoh::logger::init_ros_logging;
//! use tracing::info;
//!
//! init_ros_logging(None);
//! info!("client started");
//! ```

use nodelet_args::LogLevel;
use std::sync::OnceLock;
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Translate a `--log-level` value to an `EnvFilter` directive.
fn filter_directive(level: LogLevel) -> &'static str {
    match level {
        LogLevel::Debug => "debug",
        LogLevel::Info => "info",
        LogLevel::Warn => "warn",
        // tracing has no fatal level
        LogLevel::Error | LogLevel::Fatal => "error",
    }
}

/// Initialize logging with tracing integration.
///
/// This sets up:
/// 1. A tracing subscriber that outputs to stderr with file/line info
/// 2. A bridge that forwards `log` crate calls to tracing
///
/// `default_level` applies only when `RUST_LOG` is not set.
///
/// Subsequent calls are ignored, initialization happens once per process.
pub fn init_ros_logging(default_level: Option<LogLevel>) {
    LOGGER_INITIALIZED.get_or_init(|| {
        // log -> tracing bridge
        tracing_log::LogTracer::init().ok();

        let fallback = default_level.map(filter_directive).unwrap_or("info");
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));

        let fmt_layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(true)
            .with_line_number(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr);

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt_layer)
            .try_init()
            .ok();
    });
}
