//! Logging Configuration

use tracing_subscriber::EnvFilter;

const LOG_LEVEL_ENV: &str = "PADDOCK_LOG_LEVEL";

pub fn parse_log_level(value: &str) -> Option<&'static str> {
    match value.trim().to_lowercase().as_str() {
        "trace" => Some("trace"),
        "debug" => Some("debug"),
        "info" => Some("info"),
        "warn" => Some("warn"),
        "error" => Some("error"),
        "off" => Some("off"),
        _ => None,
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `PADDOCK_LOG_LEVEL`,
/// which wins over `default_level`. `log` records from library crates are
/// bridged into the same output.
pub fn init_logging(default_level: &str) {
    let level = match std::env::var(LOG_LEVEL_ENV) {
        Ok(val) => parse_log_level(&val).unwrap_or_else(|| {
            eprintln!(
                "Warning: Invalid {} '{}', falling back to default",
                LOG_LEVEL_ENV, val
            );
            default_level
        }),
        Err(_) => default_level,
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}
