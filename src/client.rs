//! Client facade: authenticator, navigator and dispatcher of one tenant.
//!
//! Several clients may coexist (one per tenant); they share nothing.

use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::authenticator::{Authenticator, AuthenticatorConfig};
use crate::config::providers::{
    ConfigChain, EnvironmentConfig, ExplicitConfig, ResolvedConfig, ServiceBindings,
};
use crate::config::settings::ClientSettings;
use crate::error::{ConfigurationError, Error};
use crate::navigator::Navigator;
use crate::request::dispatcher::Dispatcher;
use crate::request::types::{Reply, Request};
use crate::services::{
    AuthorizationService, ColdStoreService, PackageService, PropertySetTypeService,
    RequestContext, ThingService, ThingTypeService, TimeSeriesStoreService,
};

#[derive(Debug)]
pub struct IotClient {
    dispatcher: Dispatcher,
}

impl IotClient {
    pub fn builder() -> IotClientBuilder {
        IotClientBuilder::default()
    }

    pub fn from_config(config: ResolvedConfig, settings: &ClientSettings) -> Result<Self, Error> {
        let http = build_http_client(settings)?;
        let mut auth_config = AuthenticatorConfig::new(config.credentials)
            .with_safety_margin_seconds(settings.safety_margin_seconds);
        auth_config.exchange_source = config.exchange_source;

        let authenticator = Arc::new(Authenticator::new(auth_config, http.clone())?);
        info!(auth_url = %authenticator.auth_url(), "client created");
        Ok(Self {
            dispatcher: Dispatcher::new(http, authenticator, config.navigator),
        })
    }

    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    pub fn navigator(&self) -> &Navigator {
        self.dispatcher.navigator()
    }

    pub fn authenticator(&self) -> &Authenticator {
        self.dispatcher.authenticator()
    }

    pub async fn access_token(&self) -> Result<String, Error> {
        self.dispatcher.authenticator().get_access_token().await
    }

    pub fn set_base_url(&mut self, service: &str) -> Result<&str, Error> {
        self.dispatcher.set_base_url(service)
    }

    pub fn base_url(&self) -> Option<&str> {
        self.dispatcher.base_url()
    }

    pub fn delete_base_url(&mut self) -> Option<String> {
        self.dispatcher.delete_base_url()
    }

    pub async fn request(&self, request: Request) -> Result<Reply, Error> {
        self.dispatcher.request(request).await
    }

    pub async fn get(&self, path: &str) -> Result<Reply, Error> {
        self.request(Request::get(path)).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<Reply, Error> {
        self.request(Request::post(path).json(body)).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<Reply, Error> {
        self.request(Request::put(path).json(body)).await
    }

    pub async fn delete(&self, path: &str) -> Result<Reply, Error> {
        self.request(Request::delete(path)).await
    }

    pub fn context(&self) -> RequestContext<'_> {
        RequestContext::new(&self.dispatcher)
    }

    pub fn packages(&self) -> PackageService<'_> {
        PackageService::new(self.context())
    }

    pub fn property_set_types(&self) -> PropertySetTypeService<'_> {
        PropertySetTypeService::new(self.context())
    }

    pub fn thing_types(&self) -> ThingTypeService<'_> {
        ThingTypeService::new(self.context())
    }

    pub fn authorization(&self) -> AuthorizationService<'_> {
        AuthorizationService::new(self.context())
    }

    pub fn things(&self) -> ThingService<'_> {
        ThingService::new(self.context())
    }

    pub fn time_series(&self) -> TimeSeriesStoreService<'_> {
        TimeSeriesStoreService::new(self.context())
    }

    pub fn cold_store(&self) -> ColdStoreService<'_> {
        ColdStoreService::new(self.context())
    }
}

fn build_http_client(settings: &ClientSettings) -> Result<Client, ConfigurationError> {
    Client::builder()
        .timeout(Duration::from_millis(settings.timeout_ms))
        .build()
        .map_err(|e| ConfigurationError::InvalidSettings(format!("http client: {e}")))
}

#[derive(Default)]
pub struct IotClientBuilder {
    chain: Option<ConfigChain>,
    config: Option<ResolvedConfig>,
    explicit: Option<ExplicitConfig>,
    service_name: Option<String>,
    process_env: bool,
    settings: ClientSettings,
}

impl IotClientBuilder {
    /// Resolve credentials and destinations through `chain`.
    pub fn providers(mut self, chain: ConfigChain) -> Self {
        self.chain = Some(chain);
        self
    }

    /// Already resolved configuration; takes precedence over everything else.
    pub fn config(mut self, config: ResolvedConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Highest precedence entry of the standard chain.
    pub fn explicit(mut self, explicit: ExplicitConfig) -> Self {
        self.explicit = Some(explicit);
        self
    }

    /// Select the IoT service binding by name instead of by tag.
    pub fn service_name(mut self, service_name: impl Into<String>) -> Self {
        self.service_name = Some(service_name.into());
        self
    }

    /// Let the standard chain read `VCAP_SERVICES` and the `AE_*` variables.
    pub fn process_env(mut self) -> Self {
        self.process_env = true;
        self
    }

    pub fn settings(mut self, settings: ClientSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn build(self) -> Result<IotClient, Error> {
        let config = match (self.config, self.chain) {
            (Some(config), _) => config,
            (None, Some(chain)) => chain.resolve()?,
            (None, None) => {
                standard_chain(self.explicit, self.service_name, self.process_env)?.resolve()?
            }
        };
        IotClient::from_config(config, &self.settings)
    }
}

fn standard_chain(
    explicit: Option<ExplicitConfig>,
    service_name: Option<String>,
    process_env: bool,
) -> Result<ConfigChain, ConfigurationError> {
    let (mut bindings, environment) = if process_env {
        (ServiceBindings::from_process_env()?, EnvironmentConfig::from_process_env())
    } else {
        (ServiceBindings::default(), EnvironmentConfig::default())
    };
    if let Some(service_name) = service_name {
        bindings = bindings.with_service_name(service_name);
    }
    Ok(ConfigChain::standard(explicit, bindings, environment))
}
