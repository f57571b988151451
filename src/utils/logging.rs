use clap::ValueEnum;
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::settings::{ClientSettings, LogFormat, LoggingConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    TRACE,
    DEBUG,
    INFO,
    WARN,
    ERROR,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match *self {
            LogLevel::TRACE => "trace",
            LogLevel::DEBUG => "debug",
            LogLevel::INFO => "info",
            LogLevel::WARN => "warn",
            LogLevel::ERROR => "error",
        }
    }
}

/// Effective logging config: the command line level wins over the file.
pub fn logging_config(settings: &ClientSettings, arg_log_level: Option<LogLevel>) -> LoggingConfig {
    let config = settings.logging.clone().unwrap_or_default();
    match arg_log_level {
        Some(level) => LoggingConfig::new(level.as_str().to_owned(), config.format),
        None => config,
    }
}

pub fn run(settings: &ClientSettings, arg_log_level: Option<LogLevel>) {
    init_logging(&logging_config(settings, arg_log_level));
}

/// Initialize tracing with the desired config. A subscriber that is already
/// installed is kept.
pub fn init_logging(cfg: &LoggingConfig) {
    let env_filter = EnvFilter::try_new(&cfg.level).unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    match cfg.format {
        LogFormat::Json => {
            let layer = fmt::layer()
                .json()
                .with_timer(UtcTime::rfc_3339())
                .flatten_event(true)
                .with_writer(std::io::stderr)
                .with_ansi(false);

            let _ = registry.with(layer).try_init();
        }
        LogFormat::Compact => {
            let layer = fmt::layer()
                .compact()
                .with_timer(UtcTime::rfc_3339())
                .with_writer(std::io::stderr)
                .with_ansi(true);

            let _ = registry.with(layer).try_init();
        }
    };
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn command_line_level_overrides_file_level() {
        let settings = ClientSettings {
            logging: Some(LoggingConfig::new("warn".to_owned(), LogFormat::Json)),
            ..ClientSettings::default()
        };

        let config = logging_config(&settings, Some(LogLevel::DEBUG));
        assert_eq!(config.level, "debug");
        assert_eq!(config.format, LogFormat::Json);

        let config = logging_config(&settings, None);
        assert_eq!(config.level, "warn");
    }

    #[test]
    fn defaults_to_compact_info() {
        let config = logging_config(&ClientSettings::default(), None);
        assert_eq!(config.level, "info");
        assert_eq!(config.format, LogFormat::Compact);
    }
}
