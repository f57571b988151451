//! Token sources: the identity zone's token endpoint, reached either with the
//! client's own credentials or by exchanging a forwarded token.

pub mod exchange;
pub mod jwt;
pub mod oauth2;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::StatusCode;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cache::token::Token;
use crate::config::credentials::UaaCredentials;
use crate::error::AuthenticationError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: Option<String>,
    expires_in: Option<i64>,
}

/// `Basic base64(clientid:clientsecret)`
pub fn basic_authorization(credentials: &UaaCredentials) -> String {
    let pair = format!("{}:{}", credentials.clientid, credentials.clientsecret);
    format!("Basic {}", STANDARD.encode(pair))
}

/// POST a form to a token endpoint and turn the answer into a [`Token`].
pub(crate) async fn request_token(
    client: &Client,
    token_url: &str,
    credentials: &UaaCredentials,
    form: &[(&str, &str)],
    safety_margin_seconds: u64,
) -> Result<Token, AuthenticationError> {
    debug!(url = token_url, "requesting token");
    let response = client
        .post(token_url)
        .header(AUTHORIZATION, basic_authorization(credentials))
        .header(ACCEPT, "application/json")
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .form(form)
        .send()
        .await
        .map_err(|source| AuthenticationError::Unreachable {
            url: token_url.to_owned(),
            source,
        })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| AuthenticationError::Unreachable {
            url: token_url.to_owned(),
            source,
        })?;

    match status {
        StatusCode::OK => {}
        StatusCode::UNAUTHORIZED => {
            warn!(url = token_url, "bad credentials");
            return Err(AuthenticationError::BadCredentials {
                url: token_url.to_owned(),
            });
        }
        StatusCode::NOT_FOUND => {
            warn!(url = token_url, "token url not found");
            return Err(AuthenticationError::EndpointNotFound {
                url: token_url.to_owned(),
            });
        }
        status => {
            warn!(url = token_url, %status, "token request was not successful");
            return Err(AuthenticationError::Rejected {
                url: token_url.to_owned(),
                status,
                body,
            });
        }
    }

    let parsed: TokenResponse = serde_json::from_str(&body)
        .map_err(|e| AuthenticationError::InvalidTokenResponse(e.to_string()))?;
    let access_token = parsed
        .access_token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthenticationError::InvalidTokenResponse("access_token missing".into()))?;
    let expires_in = parsed
        .expires_in
        .ok_or_else(|| AuthenticationError::InvalidTokenResponse("expires_in missing".into()))?;

    Ok(Token::new(access_token, expires_in, safety_margin_seconds))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn basic_authorization_encodes_id_and_secret() {
        let creds = UaaCredentials::new("https://auth.example", "c1", "s1");
        // base64("c1:s1")
        assert_eq!(basic_authorization(&creds), "Basic YzE6czE=");
    }
}
