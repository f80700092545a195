//! Structured logging support for tangent projections
//!
//! The projection entry points emit `tracing` events (order, sample count,
//! maximum rank, chunking) at `debug` level and report rejected inputs at `warn`
//! level. This module installs a subscriber to collect them.
//!
//! # Example
//!
//! ```ignore
//! use tenrso_tangent::tracing_support::{init_tracing, TracingConfig, TracingFormat};
//!
//! init_tracing(TracingConfig {
//!     format: TracingFormat::Compact,
//!     filter: "tenrso_tangent=debug".to_string(),
//!     ..TracingConfig::default()
//! })?;
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set log level (e.g., `RUST_LOG=tenrso_tangent=debug`)
//! - `TENRSO_LOG_FORMAT`: Set output format (`json`, `compact` or `pretty`, default: `pretty`)

use anyhow::Result;
#[cfg(feature = "tracing")]
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Tracing output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TracingFormat {
    /// Pretty-printed human-readable format
    Pretty,
    /// JSON format for structured logging
    Json,
    /// Compact format (single line per event)
    Compact,
}

impl TracingFormat {
    /// Parse from string
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => TracingFormat::Json,
            "compact" => TracingFormat::Compact,
            _ => TracingFormat::Pretty,
        }
    }
}

/// Tracing configuration
#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Output format
    pub format: TracingFormat,
    /// Filter directive (e.g., "tenrso_tangent=debug,info")
    pub filter: String,
    /// Enable ANSI colors
    pub with_ansi: bool,
    /// Tag events with the worker thread; on by default with the `parallel`
    /// feature, where chunk partials are built on rayon workers
    pub with_thread_ids: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        let format = std::env::var("TENRSO_LOG_FORMAT")
            .map(|s| TracingFormat::parse(&s))
            .unwrap_or(TracingFormat::Pretty);

        let filter =
            std::env::var("RUST_LOG").unwrap_or_else(|_| "tenrso_tangent=info,warn".to_string());

        Self {
            format,
            filter,
            with_ansi: true,
            with_thread_ids: cfg!(feature = "parallel"),
        }
    }
}

/// Initialize the global tracing subscriber.
///
/// Call once at application startup. Fails if the filter directive is invalid
/// or a global subscriber is already installed.
#[cfg(feature = "tracing")]
pub fn init_tracing(config: TracingConfig) -> Result<()> {
    let filter = EnvFilter::try_new(&config.filter)?;

    match config.format {
        TracingFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .pretty()
                .with_ansi(config.with_ansi)
                .with_thread_ids(config.with_thread_ids)
                .with_filter(filter);

            tracing_subscriber::registry().with(fmt_layer).try_init()?;
        }
        TracingFormat::Json => {
            let fmt_layer = fmt::layer()
                .json()
                .with_thread_ids(config.with_thread_ids)
                .with_filter(filter);

            tracing_subscriber::registry().with(fmt_layer).try_init()?;
        }
        TracingFormat::Compact => {
            let fmt_layer = fmt::layer()
                .compact()
                .with_ansi(config.with_ansi)
                .with_thread_ids(config.with_thread_ids)
                .with_filter(filter);

            tracing_subscriber::registry().with(fmt_layer).try_init()?;
        }
    }

    Ok(())
}

/// Stub for when tracing feature is disabled
#[cfg(not(feature = "tracing"))]
pub fn init_tracing(_config: TracingConfig) -> Result<()> {
    Ok(())
}

/// Record the outcome of one projection call.
#[cfg(feature = "tracing")]
pub fn record_projection(order: usize, samples: usize, max_rank: usize, elapsed_ms: f64) {
    let throughput = if elapsed_ms > 0.0 {
        samples as f64 / elapsed_ms * 1e3
    } else {
        0.0
    };

    tracing::info!(
        order = order,
        samples = samples,
        max_rank = max_rank,
        elapsed_ms = elapsed_ms,
        samples_per_sec = throughput,
        "tangent_projection"
    );
}

/// Stub for when tracing is disabled
#[cfg(not(feature = "tracing"))]
pub fn record_projection(_order: usize, _samples: usize, _max_rank: usize, _elapsed_ms: f64) {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_format_parse() {
        assert_eq!(TracingFormat::parse("json"), TracingFormat::Json);
        assert_eq!(TracingFormat::parse("pretty"), TracingFormat::Pretty);
        assert_eq!(TracingFormat::parse("COMPACT"), TracingFormat::Compact);
        assert_eq!(TracingFormat::parse("unknown"), TracingFormat::Pretty);
    }

    #[test]
    fn test_default_config() {
        let config = TracingConfig::default();
        assert!(config.with_ansi);
        assert_eq!(config.with_thread_ids, cfg!(feature = "parallel"));
    }

    #[test]
    fn test_record_projection() {
        // No subscriber installed: must be a no-op
        record_projection(4, 1000, 8, 1.5);
        record_projection(4, 0, 8, 0.0);
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn test_invalid_filter_rejected() {
        let config = TracingConfig {
            filter: "tenrso_tangent=notalevel".to_string(),
            ..TracingConfig::default()
        };
        assert!(init_tracing(config).is_err());
    }
}
