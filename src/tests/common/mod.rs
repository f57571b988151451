pub use httpmock::Method::{DELETE, GET, POST, PUT};
pub use httpmock::{Mock, MockServer};
pub use serde_json::json;

use std::collections::HashMap;
use std::time::Duration;

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use reqwest::Client;
use serde_json::Value;

use crate::authenticator::{Authenticator, AuthenticatorConfig};
use crate::client::IotClient;
use crate::config::credentials::UaaCredentials;
use crate::config::providers::ResolvedConfig;
use crate::config::settings::ClientSettings;
use crate::helpers::time::now_i64;
use crate::navigator::{Navigator, ServiceName};

pub const CLIENT_ID: &str = "sb-iot-client";
pub const CLIENT_SECRET: &str = "s3cr3t";
/// base64("sb-iot-client:s3cr3t")
pub const BASIC_AUTH: &str = "Basic c2ItaW90LWNsaWVudDpzM2NyM3Q=";

pub const BROKER_CLIENT_ID: &str = "sb-app!t1";
pub const BROKER_APP: &str = "app!t1";
pub const KEY_ID: &str = "key-1";

pub const SIGNING_KEY: &str = include_str!("../fixtures/signing_key.pem");
pub const VERIFICATION_KEY: &str = include_str!("../fixtures/verification_key.pem");

/// Modulus of the fixture key pair, base64url without padding.
const JWK_N: &str = "oBssvOB2o77QsjetrL-fRrikK88FdgaqQ4jSjQD0_ELzYQ9PYXszbFM4P3Y4Vj1FcXqkp0_PZZwsOHZFk4BDl4Ui88DOKXeLmZM5SIWOCcnSxTd55EP46s5-flWbtf2geQFdxK6DP8y6y9Comk9G-Jm0AsEiyFWE9KD9LAPJbc4aiDzqJ9tHOfLupNRG4cLe5hOb-W0Nszk6spqTKSwwmnA4Urn0Rlv02NlDzq-CFv2betb3_TGIe6_2jxYA16gWcLBknJL4ehYwy_KL7ztOBHJ4xWuEPOuU-4pKxHTBu2iPxI_LtHzSEcwEBsY_hSQTDq60_W5YZhZw_4vLHxJIuw";

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Credentials whose token endpoint is `server`.
pub fn credentials(server: &MockServer) -> UaaCredentials {
    UaaCredentials::new(server.base_url(), CLIENT_ID, CLIENT_SECRET)
}

/// Every known service at `<server>/<service name>`.
pub fn navigator(server: &MockServer) -> Navigator {
    let destinations: HashMap<String, String> = ServiceName::ALL
        .iter()
        .map(|service| {
            (
                service.as_str().to_owned(),
                format!("{}/{}", server.base_url(), service.as_str()),
            )
        })
        .collect();
    Navigator::new(destinations)
}

pub fn authenticator(server: &MockServer) -> Authenticator {
    Authenticator::new(
        AuthenticatorConfig::new(credentials(server)),
        build_reqwest_client(),
    )
    .expect("valid authenticator config")
}

/// Client against `server` with an optional identity broker.
pub fn client(server: &MockServer, exchange_source: Option<UaaCredentials>) -> IotClient {
    let config = ResolvedConfig {
        credentials: credentials(server),
        navigator: navigator(server),
        exchange_source,
    };
    IotClient::from_config(config, &ClientSettings::default()).expect("client")
}

pub async fn mock_token_endpoint<'a>(
    server: &'a MockServer,
    access_token: &str,
    expires_in: i64,
) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(POST).path("/oauth/token");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "access_token": access_token,
                    "token_type": "bearer",
                    "expires_in": expires_in,
                }));
        })
        .await
}

/// Identity broker credentials of a zone served by `server`.
pub fn broker(server: &MockServer, with_verification_key: bool) -> UaaCredentials {
    let mut source = UaaCredentials::new(server.base_url(), BROKER_CLIENT_ID, "broker-secret");
    source.xsappname = Some(BROKER_APP.to_owned());
    if with_verification_key {
        source.verificationkey = Some(VERIFICATION_KEY.to_owned());
    }
    source
}

/// Claims of a forwarded user token issued for the broker's application.
pub fn user_claims() -> Value {
    json!({
        "sub": "user-1",
        "exp": now_i64() + 600,
        "iss": "http://consumer.localhost:8080/uaa/oauth/token",
        "grant_type": "authorization_code",
        "cid": BROKER_CLIENT_ID,
        "zid": "zone-1",
        "aud": [BROKER_APP, "openid"],
    })
}

pub fn sign(claims: &Value) -> String {
    let mut header = Header::new(Algorithm::RS256);
    header.kid = Some(KEY_ID.to_owned());
    let key = EncodingKey::from_rsa_pem(SIGNING_KEY.as_bytes()).expect("fixture key");
    encode(&header, claims, &key).expect("signed token")
}

pub fn jwks() -> Value {
    json!({
        "keys": [{
            "kty": "RSA",
            "use": "sig",
            "alg": "RS256",
            "kid": KEY_ID,
            "n": JWK_N,
            "e": "AQAB",
        }]
    })
}
