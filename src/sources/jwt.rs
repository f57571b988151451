//! Verification of forwarded tokens issued by the identity broker.

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::credentials::UaaCredentials;
use crate::error::AuthenticationError;

const PEM_LINE_WIDTH: usize = 64;

#[derive(Debug, Clone, Deserialize)]
pub struct ExtAttr {
    /// subdomain of the zone the token was issued in
    pub zdn: Option<String>,
}

/// Claims of a forwarded token that take part in the exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundClaims {
    pub exp: i64,
    pub iss: Option<String>,
    pub grant_type: Option<String>,
    pub cid: Option<String>,
    pub client_id: Option<String>,
    pub zid: Option<String>,
    pub aud: Option<Value>,
    pub ext_attr: Option<ExtAttr>,
}

impl InboundClaims {
    pub fn client(&self) -> Option<&str> {
        self.cid.as_deref().or(self.client_id.as_deref())
    }

    /// `aud` may be a single string or a list.
    pub fn audiences(&self) -> Vec<&str> {
        match &self.aud {
            Some(Value::String(aud)) => vec![aud.as_str()],
            Some(Value::Array(auds)) => auds.iter().filter_map(Value::as_str).collect(),
            _ => Vec::new(),
        }
    }
}

/// Verify signature and expiry of `token` and check it was issued for `source`.
pub async fn verify_inbound_token(
    client: &Client,
    token: &str,
    source: &UaaCredentials,
) -> Result<InboundClaims, AuthenticationError> {
    let header = decode_header(token).map_err(invalid)?;
    if header.alg != Algorithm::RS256 {
        return Err(AuthenticationError::InvalidInboundToken(format!(
            "unsupported signing algorithm {:?}",
            header.alg
        )));
    }
    let key = decoding_key(client, source, header.kid.as_deref()).await?;

    let mut validation = Validation::new(Algorithm::RS256);
    validation.leeway = 0;
    // audience is checked against the client below
    validation.validate_aud = false;

    let claims = decode::<InboundClaims>(token, &key, &validation)
        .map_err(invalid)?
        .claims;

    check_issuer(&claims, source)?;
    check_client(&claims, source)?;
    Ok(claims)
}

fn invalid(err: jsonwebtoken::errors::Error) -> AuthenticationError {
    let reason = match err.kind() {
        ErrorKind::ExpiredSignature => "token expired".to_owned(),
        ErrorKind::InvalidSignature => "invalid signature".to_owned(),
        _ => err.to_string(),
    };
    AuthenticationError::InvalidInboundToken(reason)
}

fn check_issuer(claims: &InboundClaims, source: &UaaCredentials) -> Result<(), AuthenticationError> {
    let (Some(domain), Some(iss)) = (source.uaadomain.as_deref(), claims.iss.as_deref()) else {
        return Ok(());
    };
    let host = url::Url::parse(iss)
        .ok()
        .and_then(|u| u.host_str().map(str::to_owned))
        .unwrap_or_default();
    if host == domain || host.ends_with(&format!(".{domain}")) {
        Ok(())
    } else {
        Err(AuthenticationError::InvalidInboundToken(format!(
            "issuer {iss} does not belong to {domain}"
        )))
    }
}

fn check_client(claims: &InboundClaims, source: &UaaCredentials) -> Result<(), AuthenticationError> {
    if claims.client() == Some(source.clientid.as_str()) {
        return Ok(());
    }
    if let Some(app) = source.xsappname.as_deref() {
        if claims.audiences().contains(&app) {
            return Ok(());
        }
    }
    Err(AuthenticationError::InvalidInboundToken(format!(
        "token was not issued for client {}",
        source.clientid
    )))
}

/// Configured verification key first, the zone's key set otherwise.
async fn decoding_key(
    client: &Client,
    source: &UaaCredentials,
    kid: Option<&str>,
) -> Result<DecodingKey, AuthenticationError> {
    if let Some(pem) = source.verificationkey.as_deref() {
        return DecodingKey::from_rsa_pem(normalize_pem(pem).as_bytes()).map_err(invalid);
    }

    let url = source.token_keys_url();
    debug!(url = %url, "fetching token keys");
    let response = client
        .get(&url)
        .send()
        .await
        .map_err(|source| AuthenticationError::Unreachable {
            url: url.clone(),
            source,
        })?;
    if !response.status().is_success() {
        return Err(AuthenticationError::InvalidInboundToken(format!(
            "cannot fetch token keys from {url}: {}",
            response.status()
        )));
    }
    let keys: JwkSet = response
        .json()
        .await
        .map_err(|e| AuthenticationError::InvalidInboundToken(format!("invalid token keys: {e}")))?;

    let jwk = match kid {
        Some(kid) => keys.find(kid),
        None => keys.keys.first(),
    }
    .ok_or_else(|| {
        AuthenticationError::InvalidInboundToken(format!(
            "no verification key {} at {url}",
            kid.unwrap_or("<none>")
        ))
    })?;
    DecodingKey::from_jwk(jwk).map_err(invalid)
}

/// Bindings often carry the key on a single line; PEM parsers need the
/// body wrapped.
fn normalize_pem(pem: &str) -> String {
    let trimmed = pem.trim();
    let Some(begin_end) = trimmed.find("-----").and_then(|start| {
        trimmed[start + 5..]
            .find("-----")
            .map(|end| start + 5 + end + 5)
    }) else {
        return trimmed.to_owned();
    };
    let Some(footer_start) = trimmed.rfind("-----END") else {
        return trimmed.to_owned();
    };
    if footer_start < begin_end {
        return trimmed.to_owned();
    }

    let header = &trimmed[..begin_end];
    let footer = &trimmed[footer_start..];
    let body: String = trimmed[begin_end..footer_start]
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let lines: Vec<&str> = body
        .as_bytes()
        .chunks(PEM_LINE_WIDTH)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();
    format!("{header}\n{}\n{footer}\n", lines.join("\n"))
}
