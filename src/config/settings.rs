use serde::Deserialize;

use crate::helpers::time::SAFETY_MARGIN_SECONDS_DEFAULT;

pub const TIMEOUT_MS_DEFAULT: u64 = 5000;

/// ================================
/// Client-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ClientSettings {
    /// subtracted from every token lifetime, see `Token::new`
    #[serde(default = "default_safety_margin_seconds")]
    pub safety_margin_seconds: u64,
    /// transport timeout for token and resource requests
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    pub logging: Option<LoggingConfig>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            safety_margin_seconds: SAFETY_MARGIN_SECONDS_DEFAULT,
            timeout_ms: TIMEOUT_MS_DEFAULT,
            logging: None,
        }
    }
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_safety_margin_seconds() -> u64 {
    SAFETY_MARGIN_SECONDS_DEFAULT
}

fn default_timeout_ms() -> u64 {
    TIMEOUT_MS_DEFAULT
}
