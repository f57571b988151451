//! Credential and destination discovery.
//!
//! Providers are consulted in order by [`ConfigChain`]: explicit
//! configuration, then service bindings, then environment variables. A
//! provider answers `Ok(None)` when it has nothing to offer and an error when
//! what it has is unusable.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::config::credentials::UaaCredentials;
use crate::error::ConfigurationError;
use crate::navigator::Navigator;

pub const IOT_SERVICE_TAG: &str = "leonardoiot";
pub const IDENTITY_BROKER_TAG: &str = "xsuaa";
pub const VCAP_SERVICES: &str = "VCAP_SERVICES";

pub const ENV_CLIENT_ID: &str = "AE_OAUTH_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "AE_OAUTH_CLIENT_SECRET";
pub const ENV_TENANT: &str = "AE_TENANT";
pub const ENV_LANDSCAPE: &str = "AE_LANDSCAPE";
pub const ENV_HOST: &str = "AE_HOST";

/// Everything a client needs to authenticate and to find its services.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub credentials: UaaCredentials,
    pub navigator: Navigator,
    /// identity zone that issues forwarded tokens, required for token exchange
    pub exchange_source: Option<UaaCredentials>,
}

pub trait ConfigProvider: Send + Sync {
    fn name(&self) -> &'static str;

    fn resolve(&self) -> Result<Option<ResolvedConfig>, ConfigurationError>;

    /// Identity broker credentials this provider knows about, independent of
    /// whether it also supplies the client credentials.
    fn exchange_source(&self) -> Result<Option<UaaCredentials>, ConfigurationError> {
        Ok(None)
    }
}

/// ================================
/// Explicit configuration
/// ================================
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ExplicitConfig {
    pub tenant: Option<String>,
    pub landscape: Option<String>,
    pub host: Option<String>,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
}

impl ExplicitConfig {
    pub fn new(
        tenant: impl Into<String>,
        landscape: impl Into<String>,
        host: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            tenant: Some(tenant.into()),
            landscape: Some(landscape.into()),
            host: Some(host.into()),
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
        }
    }
}

impl ConfigProvider for ExplicitConfig {
    fn name(&self) -> &'static str {
        "explicit"
    }

    fn resolve(&self) -> Result<Option<ResolvedConfig>, ConfigurationError> {
        tenant_config(
            self.name(),
            [
                ("tenant", self.tenant.as_deref()),
                ("landscape", self.landscape.as_deref()),
                ("host", self.host.as_deref()),
                ("client_id", self.client_id.as_deref()),
                ("client_secret", self.client_secret.as_deref()),
            ],
        )
    }
}

/// ================================
/// Environment variables
/// ================================
#[derive(Debug, Clone, Default)]
pub struct EnvironmentConfig {
    vars: HashMap<String, String>,
}

impl EnvironmentConfig {
    pub fn from_vars<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: vars
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    /// Snapshot of the process environment.
    pub fn from_process_env() -> Self {
        Self::from_vars(std::env::vars())
    }

    fn var(&self, key: &str) -> Option<&str> {
        self.vars.get(key).map(String::as_str)
    }
}

impl ConfigProvider for EnvironmentConfig {
    fn name(&self) -> &'static str {
        "environment"
    }

    fn resolve(&self) -> Result<Option<ResolvedConfig>, ConfigurationError> {
        tenant_config(
            self.name(),
            [
                (ENV_TENANT, self.var(ENV_TENANT)),
                (ENV_LANDSCAPE, self.var(ENV_LANDSCAPE)),
                (ENV_HOST, self.var(ENV_HOST)),
                (ENV_CLIENT_ID, self.var(ENV_CLIENT_ID)),
                (ENV_CLIENT_SECRET, self.var(ENV_CLIENT_SECRET)),
            ],
        )
    }
}

/// All fields absent: not configured. Some absent: incomplete.
/// Order of `fields`: tenant, landscape, host, client id, client secret.
fn tenant_config(
    source_name: &'static str,
    fields: [(&'static str, Option<&str>); 5],
) -> Result<Option<ResolvedConfig>, ConfigurationError> {
    let present = |value: Option<&str>| value.is_some_and(|v| !v.trim().is_empty());

    let missing: Vec<&'static str> = fields
        .iter()
        .filter(|(_, value)| !present(*value))
        .map(|(name, _)| *name)
        .collect();

    if missing.len() == fields.len() {
        return Ok(None);
    }
    if !missing.is_empty() {
        return Err(ConfigurationError::Incomplete {
            source_name,
            missing,
        });
    }

    let [tenant, landscape, host, client_id, client_secret] = fields.map(|(_, v)| v.unwrap_or_default());
    Ok(Some(ResolvedConfig {
        credentials: UaaCredentials::for_tenant(tenant, landscape, host, client_id, client_secret),
        navigator: Navigator::for_landscape(landscape, host),
        exchange_source: None,
    }))
}

/// ================================
/// Service bindings (VCAP_SERVICES)
/// ================================
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceBinding {
    pub name: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub credentials: Value,
}

#[derive(Debug, Clone, Default)]
pub struct ServiceBindings {
    services: Vec<ServiceBinding>,
    service_name: Option<String>,
}

impl ServiceBindings {
    /// `document` is a VCAP_SERVICES JSON object: service label -> list of bindings.
    pub fn from_json(document: &str) -> Result<Self, ConfigurationError> {
        let by_label: HashMap<String, Vec<ServiceBinding>> = serde_json::from_str(document)
            .map_err(|e| ConfigurationError::InvalidBinding(e.to_string()))?;
        let mut services: Vec<ServiceBinding> = by_label.into_values().flatten().collect();
        // label iteration order is unspecified; keep lookups deterministic
        services.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(Self {
            services,
            service_name: None,
        })
    }

    /// Reads `VCAP_SERVICES`; an unset variable yields no bindings.
    pub fn from_process_env() -> Result<Self, ConfigurationError> {
        match std::env::var(VCAP_SERVICES) {
            Ok(document) => Self::from_json(&document),
            Err(_) => Ok(Self::default()),
        }
    }

    /// Select the IoT binding by name instead of by tag.
    pub fn with_service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    pub fn find_by_name(&self, name: &str) -> Option<&ServiceBinding> {
        self.services
            .iter()
            .find(|service| service.name.as_deref() == Some(name))
    }

    pub fn find_by_tag(&self, tag: &str) -> Option<&ServiceBinding> {
        self.services
            .iter()
            .find(|service| service.tags.iter().any(|t| t == tag))
    }

    fn iot_binding(&self) -> Result<Option<&ServiceBinding>, ConfigurationError> {
        match &self.service_name {
            Some(name) => self.find_by_name(name).map(Some).ok_or_else(|| {
                ConfigurationError::InvalidBinding(format!("no service binding named '{name}'"))
            }),
            None => Ok(self.find_by_tag(IOT_SERVICE_TAG)),
        }
    }
}

impl ConfigProvider for ServiceBindings {
    fn name(&self) -> &'static str {
        "service binding"
    }

    fn resolve(&self) -> Result<Option<ResolvedConfig>, ConfigurationError> {
        let Some(binding) = self.iot_binding()? else {
            return Ok(None);
        };
        let credentials: UaaCredentials = match binding.credentials.get("uaa") {
            Some(uaa) => serde_json::from_value(uaa.clone())
                .map_err(|e| ConfigurationError::InvalidBinding(e.to_string()))?,
            None => UaaCredentials::default(),
        };
        credentials.validate(self.name())?;

        let destinations: HashMap<String, String> = match binding.credentials.get("endpoints") {
            Some(endpoints) => serde_json::from_value(endpoints.clone())
                .map_err(|e| ConfigurationError::InvalidBinding(e.to_string()))?,
            None => HashMap::new(),
        };
        debug!(
            binding = binding.name.as_deref().unwrap_or("<unnamed>"),
            destinations = destinations.len(),
            "resolved service binding"
        );

        Ok(Some(ResolvedConfig {
            credentials,
            navigator: Navigator::new(destinations),
            exchange_source: self.exchange_source()?,
        }))
    }

    fn exchange_source(&self) -> Result<Option<UaaCredentials>, ConfigurationError> {
        self.find_by_tag(IDENTITY_BROKER_TAG)
            .map(|binding| {
                serde_json::from_value(binding.credentials.clone())
                    .map_err(|e| ConfigurationError::InvalidBinding(e.to_string()))
            })
            .transpose()
    }
}

/// ================================
/// Provider chain
/// ================================
#[derive(Default)]
pub struct ConfigChain {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl ConfigChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider with lower precedence than the ones already added.
    pub fn with(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Explicit configuration, then service bindings, then environment.
    pub fn standard(
        explicit: Option<ExplicitConfig>,
        bindings: ServiceBindings,
        environment: EnvironmentConfig,
    ) -> Self {
        let mut chain = Self::new();
        if let Some(explicit) = explicit {
            chain = chain.with(explicit);
        }
        chain.with(bindings).with(environment)
    }

    pub fn resolve(&self) -> Result<ResolvedConfig, ConfigurationError> {
        for provider in &self.providers {
            let Some(mut config) = provider.resolve()? else {
                debug!(provider = provider.name(), "provider supplied no configuration");
                continue;
            };
            info!(provider = provider.name(), "client configuration resolved");

            if config.exchange_source.is_none() {
                for other in &self.providers {
                    if let Some(source) = other.exchange_source()? {
                        config.exchange_source = Some(source);
                        break;
                    }
                }
            }
            return Ok(config);
        }
        Err(ConfigurationError::MissingCredentials)
    }
}
