//! Logging Configuration

use tracing_subscriber::EnvFilter;

const LOG_LEVEL_ENV: &str = "PADDOCK_LOG_LEVEL";
const DEFAULT_LOG_LEVEL: &str = "info";

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

/// `--log-level` wins over `PADDOCK_LOG_LEVEL`, which wins over `info`.
/// Unparsable values fall through to the next source.
pub fn resolve_log_level(flag: Option<&str>, env: Option<&str>) -> &'static str {
    flag.and_then(parse_log_level)
        .or_else(|| env.and_then(parse_log_level))
        .unwrap_or(DEFAULT_LOG_LEVEL)
}

/// Install the global subscriber on stderr so log lines stay out of the chat.
/// `RUST_LOG` overrides everything.
pub fn init_logging(flag: Option<&str>) {
    let env = std::env::var(LOG_LEVEL_ENV).ok();
    if let Some(value) = flag.filter(|value| parse_log_level(value).is_none()) {
        eprintln!("Warning: Invalid --log-level '{}', falling back", value);
    }
    let level = resolve_log_level(flag, env.as_deref());
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
