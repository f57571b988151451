use std::sync::LazyLock;
use std::{fs, path::Path};

use regex::Regex;
use serde::Deserialize;
use tracing::{debug, error};

use crate::config::providers::ExplicitConfig;
use crate::config::settings::ClientSettings;
use crate::error::ConfigurationError;

static ENV_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").expect("placeholder pattern is valid")
});

/// ================================
/// Client configuration file
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ClientConfigFile {
    #[serde(default)]
    pub settings: ClientSettings,
    /// explicit tenant connection, highest precedence
    pub connection: Option<ExplicitConfig>,
    /// name of the service binding holding the IoT service key
    pub service_name: Option<String>,
}

/// Load config from a YAML file, expanding `${VAR}` and `${VAR:default}`.
pub fn file_to_config(path: &Path) -> Result<ClientConfigFile, ConfigurationError> {
    let content = fs::read_to_string(path).map_err(|e| {
        ConfigurationError::InvalidSettings(format!("cannot read {}: {e}", path.display()))
    })?;
    parse_config(&expand_env_vars(&content))
}

pub fn parse_config(content: &str) -> Result<ClientConfigFile, ConfigurationError> {
    let config: ClientConfigFile = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))
        .map_err(|e| ConfigurationError::InvalidSettings(e.to_string()))?;

    if config.settings.timeout_ms == 0 {
        return Err(ConfigurationError::InvalidSettings(
            "settings.timeout_ms must be greater than 0".to_owned(),
        ));
    }
    debug!(
        safety_margin_seconds = config.settings.safety_margin_seconds,
        timeout_ms = config.settings.timeout_ms,
        "client config parsed"
    );
    Ok(config)
}

fn expand_env_vars(input: &str) -> String {
    ENV_PLACEHOLDER
        .replace_all(input, |caps: &regex::Captures| {
            let var = &caps[1];
            let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
            std::env::var(var).unwrap_or_else(|_| default.to_string())
        })
        .to_string()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::settings::LogFormat;

    #[test]
    fn empty_document_falls_back_to_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.settings.safety_margin_seconds, 60);
        assert_eq!(config.settings.timeout_ms, 5000);
        assert!(config.connection.is_none());
        assert!(config.service_name.is_none());
    }

    #[test]
    fn placeholders_use_defaults_when_variable_is_unset() {
        let expanded = expand_env_vars(
            "tenant: ${IOT_CLIENT_TEST_SURELY_UNSET_VAR:acme}\nhost: ${IOT_CLIENT_TEST_SURELY_UNSET_VAR}",
        );
        assert_eq!(expanded, "tenant: acme\nhost: ");
    }

    #[test]
    fn full_document_is_parsed() {
        let config = parse_config(
            r#"
settings:
  safety_margin_seconds: 30
  timeout_ms: 1500
  logging:
    level: debug
    format: json
connection:
  tenant: acme
  landscape: eu10
  host: hana.ondemand.com
  client_id: c1
  client_secret: s1
service_name: iot-account-dev
"#,
        )
        .unwrap();
        assert_eq!(config.settings.safety_margin_seconds, 30);
        assert_eq!(config.settings.timeout_ms, 1500);
        let logging = config.settings.logging.unwrap();
        assert_eq!(logging.format, LogFormat::Json);
        assert_eq!(config.connection.unwrap().tenant.as_deref(), Some("acme"));
        assert_eq!(config.service_name.as_deref(), Some("iot-account-dev"));
    }

    #[test]
    fn zero_timeout_is_rejected() {
        assert!(matches!(
            parse_config("settings:\n  timeout_ms: 0\n"),
            Err(ConfigurationError::InvalidSettings(_))
        ));
    }
}
