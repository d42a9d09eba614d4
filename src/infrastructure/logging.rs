use tracing_subscriber::{
    fmt::{self, format::FmtSpan, writer::BoxMakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

use crate::config::LogFormat;

/// Log target used by this crate's events
pub const CRATE_TARGET: &str = env!("CARGO_CRATE_NAME");

pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
    /// Raises this crate's events to debug regardless of `level`
    pub debug: bool,
    /// Writes to stderr, keeping stdout for command output
    pub stderr: bool,
}

/// Builds the filter directive: `RUST_LOG` wins, then `level` plus the debug override
pub fn filter_directive(config: &LoggingConfig) -> String {
    if config.debug {
        format!("{},{}=debug", config.level, CRATE_TARGET)
    } else {
        config.level.clone()
    }
}

pub fn init_logging(config: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directive(config)));

    let writer = if config.stderr {
        BoxMakeWriter::new(std::io::stderr)
    } else {
        BoxMakeWriter::new(std::io::stdout)
    };

    // A subscriber may already be installed, e.g. by a host application
    let result = match config.format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .json()
                    .with_writer(writer)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .pretty()
                    .with_writer(writer)
                    .with_target(true)
                    .with_span_events(FmtSpan::CLOSE),
            )
            .try_init(),
    };

    if result.is_ok() {
        tracing::info!(
            level = %config.level,
            debug = config.debug,
            "Logging initialized"
        );
    }
}
