use tracing_subscriber::EnvFilter;

use crate::config::{LogLevel, LoggingConfig};

fn level_for(verbosity: u8, configured: LogLevel) -> LogLevel {
    match verbosity {
        0 => configured,
        1 => LogLevel::Info,
        2 => LogLevel::Debug,
        _ => LogLevel::Trace,
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `-v` and the config file.
pub fn init(verbosity: u8, config: &LoggingConfig) {
    let level = level_for(verbosity, config.level);
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_str()));

    // A second init (tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verbosity_overrides_config() {
        assert_eq!(level_for(0, LogLevel::Error), LogLevel::Error);
        assert_eq!(level_for(1, LogLevel::Error), LogLevel::Info);
        assert_eq!(level_for(2, LogLevel::Warn), LogLevel::Debug);
        assert_eq!(level_for(7, LogLevel::Warn), LogLevel::Trace);
    }
}
