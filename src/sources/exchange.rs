//! Exchange of a forwarded token for a token of the IoT service.
//!
//! Two sequential steps: the inbound token is validated against the identity
//! zone that issued it ([`validate_inbound_token`]), then a new token is
//! minted with the target credentials ([`mint_token`]).

use reqwest::Client;
use tracing::{debug, info};

use crate::cache::token::Token;
use crate::config::credentials::UaaCredentials;
use crate::error::AuthenticationError;
use crate::sources::jwt::verify_inbound_token;
use crate::sources::oauth2::GRANT_CLIENT_CREDENTIALS;
use crate::sources::request_token;

pub const GRANT_JWT_BEARER: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeGrant {
    /// Token on behalf of the user the inbound token belongs to.
    UserToken,
    /// Technical token in the zone of the inbound token.
    ClientCredentials,
}

/// Validated inbound token together with the facts the exchange depends on.
#[derive(Debug, Clone)]
pub struct SecurityContext {
    token: String,
    grant_type: Option<String>,
    client_id: Option<String>,
    zone_id: Option<String>,
    subdomain: Option<String>,
    expires_at: i64,
}

impl SecurityContext {
    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn grant_type(&self) -> Option<&str> {
        self.grant_type.as_deref()
    }

    pub fn client_id(&self) -> Option<&str> {
        self.client_id.as_deref()
    }

    pub fn zone_id(&self) -> Option<&str> {
        self.zone_id.as_deref()
    }

    pub fn subdomain(&self) -> Option<&str> {
        self.subdomain.as_deref()
    }

    pub fn expires_at(&self) -> i64 {
        self.expires_at
    }

    /// Tokens obtained with `client_credentials` are exchanged the same way;
    /// everything else is treated as a user token.
    pub fn exchange_grant(&self) -> ExchangeGrant {
        match self.grant_type() {
            Some(GRANT_CLIENT_CREDENTIALS) => ExchangeGrant::ClientCredentials,
            _ => ExchangeGrant::UserToken,
        }
    }
}

/// Remove an optional, case-insensitive `bearer ` prefix.
pub fn strip_bearer_prefix(token: &str) -> &str {
    let trimmed = token.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("bearer ") => trimmed[7..].trim_start(),
        _ => trimmed,
    }
}

pub async fn validate_inbound_token(
    client: &Client,
    token: &str,
    source: &UaaCredentials,
) -> Result<SecurityContext, AuthenticationError> {
    let claims = verify_inbound_token(client, token, source).await?;
    debug!(
        grant_type = claims.grant_type.as_deref().unwrap_or("<none>"),
        zone = claims.zid.as_deref().unwrap_or("<none>"),
        "security context created"
    );
    Ok(SecurityContext {
        token: token.to_owned(),
        grant_type: claims.grant_type.clone(),
        client_id: claims.client().map(str::to_owned),
        zone_id: claims.zid.clone(),
        subdomain: claims.ext_attr.as_ref().and_then(|ext| ext.zdn.clone()),
        expires_at: claims.exp,
    })
}

/// Token endpoint of `target` in the zone the inbound token came from.
pub fn exchange_token_url(context: &SecurityContext, target: &UaaCredentials) -> String {
    match (context.subdomain(), target.uaadomain.as_deref()) {
        (Some(subdomain), Some(domain)) => format!("https://{subdomain}.{domain}/oauth/token"),
        _ => target.token_url(),
    }
}

pub async fn mint_token(
    client: &Client,
    context: &SecurityContext,
    target: &UaaCredentials,
    grant: ExchangeGrant,
    safety_margin_seconds: u64,
) -> Result<Token, AuthenticationError> {
    let url = exchange_token_url(context, target);
    let token = match grant {
        ExchangeGrant::UserToken => {
            request_token(
                client,
                &url,
                target,
                &[
                    ("grant_type", GRANT_JWT_BEARER),
                    ("assertion", context.token()),
                    ("response_type", "token"),
                    ("client_id", target.clientid.as_str()),
                ],
                safety_margin_seconds,
            )
            .await?
        }
        ExchangeGrant::ClientCredentials => {
            request_token(
                client,
                &url,
                target,
                &[
                    ("grant_type", GRANT_CLIENT_CREDENTIALS),
                    ("response_type", "token"),
                ],
                safety_margin_seconds,
            )
            .await?
        }
    };
    info!(?grant, "token successfully exchanged");
    Ok(token)
}
