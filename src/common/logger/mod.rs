use tracing_subscriber::{EnvFilter, fmt, prelude::*};

pub mod formatter;

pub use formatter::*;

use crate::configs::Config;

const DEFAULT_LEVEL: &str = "info";

/// Builds the filter directive string from the logging section.
///
/// `RUST_LOG` still wins when it is set.
pub fn filter_directives(config: &Config) -> String {
    let log_level = config
        .logging
        .as_ref()
        .and_then(|l| l.level.as_deref())
        .unwrap_or(DEFAULT_LEVEL);

    let filters = config
        .logging
        .as_ref()
        .and_then(|l| l.filters.as_deref())
        .unwrap_or("");

    if filters.is_empty() {
        log_level.to_string()
    } else {
        format!("{},{}", log_level, filters)
    }
}

pub fn init(config: &Config) {
    let use_ansi = config
        .logging
        .as_ref()
        .and_then(|l| l.ansi)
        .unwrap_or(true);

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter_directives(config)));

    // Logs go to stderr so command output on stdout stays machine readable.
    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .event_format(ProbeFormatter::new(use_ansi))
        .with_ansi(use_ansi);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(stderr_layer)
        .init();
}
