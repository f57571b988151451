use reqwest::Client;

use crate::cache::token::Token;
use crate::config::credentials::UaaCredentials;
use crate::error::AuthenticationError;
use crate::sources::request_token;

pub const GRANT_CLIENT_CREDENTIALS: &str = "client_credentials";

/// `client_credentials` grant against the credentials' own token endpoint.
pub async fn fetch_client_credentials_token(
    client: &Client,
    credentials: &UaaCredentials,
    safety_margin_seconds: u64,
) -> Result<Token, AuthenticationError> {
    request_token(
        client,
        &credentials.token_url(),
        credentials,
        &[
            ("grant_type", GRANT_CLIENT_CREDENTIALS),
            ("response_type", "token"),
        ],
        safety_margin_seconds,
    )
    .await
}
