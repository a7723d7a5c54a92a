//! Logging for dbwire.
//!
//! Two concerns live here:
//!
//! - the bridge from driver query events to a `tracing` logger
//!   ([`TracingQueryLogger`]), installed on connections opened with debug
//!   enabled;
//! - subscriber bootstrap controlled by environment variables.
//!
//! # Environment Variables
//!
//! - `DBWIRE_DEBUG=true` - Enable debug logging
//! - `DBWIRE_LOG_LEVEL=debug|info|warn|error|trace` - Set specific log level
//! - `DBWIRE_LOG_FORMAT=json|pretty|compact` - Set output format (default: json)
//!
//! # Usage
//!
//! ```rust,no_run
//! use dbwire_core::logging;
//!
//! // Initialize logging (call once at startup)
//! logging::init();
//! ```

use std::env;
use std::sync::Once;

use tracing::Dispatch;

use crate::database::{QueryEvent, QueryLogger};

static INIT: Once = Once::new();

/// Literal replacements applied to query text, tried in order at each position.
const QUERY_REPLACEMENTS: [(&str, &str); 5] = [
    ("\n", ""),
    ("\t", " "),
    ("      ", ""),
    ("  ", " "),
    ("   ", " "),
];

/// Collapse the whitespace of a query for single-line logging.
///
/// The input is scanned once from left to right. At each position the
/// replacements are tried in order and the first match is substituted;
/// replaced text is not scanned again.
///
/// ```rust
/// use dbwire_core::logging::normalize_query;
///
/// assert_eq!(normalize_query("SELECT *\n\tFROM users"), "SELECT * FROM users");
/// ```
pub fn normalize_query(query: &str) -> String {
    let mut result = String::with_capacity(query.len());
    let mut rest = query;

    'scan: while let Some(c) = rest.chars().next() {
        for (from, to) in QUERY_REPLACEMENTS {
            if let Some(tail) = rest.strip_prefix(from) {
                result.push_str(to);
                rest = tail;
                continue 'scan;
            }
        }
        result.push(c);
        rest = &rest[c.len_utf8()..];
    }

    result
}

/// Query logger writing debug records to a `tracing` dispatcher.
///
/// The dispatcher is shared, never shut down by this crate.
#[derive(Debug, Clone)]
pub struct TracingQueryLogger {
    dispatch: Dispatch,
}

impl TracingQueryLogger {
    /// Create a logger writing to `dispatch`.
    pub fn new(dispatch: Dispatch) -> Self {
        Self { dispatch }
    }
}

impl QueryLogger for TracingQueryLogger {
    fn log(&self, event: &QueryEvent) {
        tracing::dispatcher::with_default(&self.dispatch, || {
            tracing::debug!(
                target: "dbwire::query",
                spent = ?event.elapsed(),
                query = %normalize_query(&event.query),
                args = ?event.args,
                "exec query"
            );
        });
    }
}

/// Check if debug logging is enabled via `DBWIRE_DEBUG` environment variable.
///
/// Returns `true` if `DBWIRE_DEBUG` is set to "true", "1", or "yes" (case-insensitive).
#[inline]
pub fn is_debug_enabled() -> bool {
    env::var("DBWIRE_DEBUG")
        .map(|v| matches!(v.to_lowercase().as_str(), "true" | "1" | "yes"))
        .unwrap_or(false)
}

/// Get the configured log level from `DBWIRE_LOG_LEVEL` environment variable.
///
/// Defaults to "debug" if `DBWIRE_DEBUG` is enabled, otherwise "warn".
pub fn get_log_level() -> &'static str {
    let fallback = if is_debug_enabled() { "debug" } else { "warn" };
    match env::var("DBWIRE_LOG_LEVEL") {
        Ok(level) => match level.to_lowercase().as_str() {
            "trace" => "trace",
            "debug" => "debug",
            "info" => "info",
            "warn" => "warn",
            "error" => "error",
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

/// Get the configured log format from `DBWIRE_LOG_FORMAT` environment variable.
///
/// Defaults to "json" for structured logging.
pub fn get_log_format() -> &'static str {
    env::var("DBWIRE_LOG_FORMAT")
        .map(|f| match f.to_lowercase().as_str() {
            "pretty" => "pretty",
            "compact" => "compact",
            _ => "json",
        })
        .unwrap_or("json")
}

/// Build a dispatcher writing to stderr, usable as a connection logger.
///
/// `level` is a `tracing` filter directive such as `"debug"`; `format` is
/// one of `json`, `pretty` or `compact` (anything else means `json`).
#[cfg(feature = "tracing-subscriber")]
pub fn dispatch(level: &str, format: &str) -> Dispatch {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        "pretty" => {
            Dispatch::new(registry.with(fmt::layer().pretty().with_writer(std::io::stderr)))
        }
        "compact" => {
            Dispatch::new(registry.with(fmt::layer().compact().with_writer(std::io::stderr)))
        }
        _ => Dispatch::new(registry.with(fmt::layer().json().with_writer(std::io::stderr))),
    }
}

/// Initialize the global subscriber.
///
/// This should be called once at application startup. Subsequent calls are
/// no-ops, and nothing is installed unless `DBWIRE_DEBUG` or
/// `DBWIRE_LOG_LEVEL` is set.
pub fn init() {
    INIT.call_once(|| {
        if !is_debug_enabled() && env::var("DBWIRE_LOG_LEVEL").is_err() {
            return;
        }

        #[cfg(feature = "tracing-subscriber")]
        {
            let level = get_log_level();
            let directive = format!(
                "dbwire={level},dbwire_core={level},dbwire_postgres={level},dbwire_mysql={level}"
            );
            if tracing::dispatcher::set_global_default(dispatch(&directive, get_log_format()))
                .is_ok()
            {
                tracing::info!(
                    level = level,
                    format = get_log_format(),
                    "dbwire logging initialized"
                );
            }
        }
    });
}
