//! Logging utilities and structured logging support

pub use log::{debug, error, info, trace, warn};

/// Initialize the logging system from `RUST_LOG`
pub fn init() {
    env_logger::init();
}

/// Initialize logging with a default level parsed from config.
///
/// `RUST_LOG` still overrides the default. Unknown level names fall back to
/// `info`. Calling this twice is harmless; the second call is ignored.
pub fn init_with_level(level: &str) {
    let _ = builder(level).try_init();
}

/// Logger builder defaulting to `level`, with `RUST_LOG` applied on top
pub fn builder(level: &str) -> env_logger::Builder {
    builder_with_env(level, env_logger::Env::default())
}

fn builder_with_env(level: &str, env: env_logger::Env<'_>) -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(parse_level(level));
    builder.parse_env(env);
    builder
}

/// Map a config string onto a level filter
pub fn parse_level(level: &str) -> log::LevelFilter {
    level.parse().unwrap_or(log::LevelFilter::Info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level("TRACE"), log::LevelFilter::Trace);
        assert_eq!(parse_level("warn"), log::LevelFilter::Warn);
        assert_eq!(parse_level("off"), log::LevelFilter::Off);
        assert_eq!(parse_level("nonsense"), log::LevelFilter::Info);
    }

    #[test]
    fn test_environment_overrides_config_level() {
        std::env::set_var("FLATLAND_TEST_LOG_OVERRIDE", "debug");
        let logger = builder_with_env("info", env_logger::Env::new().filter("FLATLAND_TEST_LOG_OVERRIDE")).build();
        assert_eq!(logger.filter(), log::LevelFilter::Debug);

        let logger = builder_with_env("warn", env_logger::Env::new().filter("FLATLAND_TEST_LOG_UNSET")).build();
        assert_eq!(logger.filter(), log::LevelFilter::Warn);
    }
}
