//! Access token acquisition, caching and refresh.

use reqwest::Client;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::cache::token::Token;
use crate::config::credentials::UaaCredentials;
use crate::error::{ConfigurationError, Error};
use crate::helpers::time::SAFETY_MARGIN_SECONDS_DEFAULT;
use crate::sources::exchange::{mint_token, strip_bearer_prefix, validate_inbound_token};
use crate::sources::oauth2::fetch_client_credentials_token;

#[derive(Debug, Clone)]
pub struct AuthenticatorConfig {
    /// credentials of the IoT service, also the target of token exchange
    pub credentials: UaaCredentials,
    /// identity zone that issues forwarded tokens
    pub exchange_source: Option<UaaCredentials>,
    pub safety_margin_seconds: u64,
}

impl AuthenticatorConfig {
    pub fn new(credentials: UaaCredentials) -> Self {
        Self {
            credentials,
            exchange_source: None,
            safety_margin_seconds: SAFETY_MARGIN_SECONDS_DEFAULT,
        }
    }

    pub fn with_exchange_source(mut self, source: UaaCredentials) -> Self {
        self.exchange_source = Some(source);
        self
    }

    pub fn with_safety_margin_seconds(mut self, seconds: u64) -> Self {
        self.safety_margin_seconds = seconds;
        self
    }
}

/// Holds at most one cached token. Concurrent callers that find it missing
/// or expired wait on the same refresh instead of each fetching their own.
#[derive(Debug)]
pub struct Authenticator {
    config: AuthenticatorConfig,
    client: Client,
    cached: Mutex<Option<Token>>,
}

impl Authenticator {
    pub fn new(config: AuthenticatorConfig, client: Client) -> Result<Self, ConfigurationError> {
        config.credentials.validate("client credentials")?;
        debug!(url = %config.credentials.token_url(), "creating a new authenticator");
        Ok(Self {
            config,
            client,
            cached: Mutex::new(None),
        })
    }

    pub fn auth_url(&self) -> String {
        self.config.credentials.token_url()
    }

    /// Cached token while it is valid, a freshly fetched one otherwise.
    pub async fn get_access_token(&self) -> Result<String, Error> {
        let mut cached = self.cached.lock().await;
        if let Some(token) = cached.as_ref().filter(|t| !t.is_expired()) {
            debug!("using cached access token");
            return Ok(token.access_token().to_owned());
        }

        debug!("no valid cached access token");
        let token = self.get_new_token().await?;
        let access_token = token.access_token().to_owned();
        *cached = Some(token);
        Ok(access_token)
    }

    /// `client_credentials` grant, bypassing the cache.
    pub async fn get_new_token(&self) -> Result<Token, Error> {
        debug!("getting a new token");
        let token = fetch_client_credentials_token(
            &self.client,
            &self.config.credentials,
            self.config.safety_margin_seconds,
        )
        .await?;
        info!(expires_at = token.expires_at(), "authentication was successful");
        Ok(token)
    }

    /// Drop the cached token; the next `get_access_token` fetches a new one.
    pub async fn invalidate(&self) {
        self.cached.lock().await.take();
    }

    /// Trade a token issued by the identity broker for a token of this
    /// service. Never reads or writes the cache.
    pub async fn exchange_token(&self, external_access_token: &str) -> Result<String, Error> {
        let source = self
            .config
            .exchange_source
            .as_ref()
            .ok_or(ConfigurationError::MissingExchangeSource)?;
        source.validate("identity broker")?;

        let token = strip_bearer_prefix(external_access_token);
        let context = validate_inbound_token(&self.client, token, source).await?;
        let minted = mint_token(
            &self.client,
            &context,
            &self.config.credentials,
            context.exchange_grant(),
            self.config.safety_margin_seconds,
        )
        .await?;
        Ok(minted.access_token().to_owned())
    }
}
