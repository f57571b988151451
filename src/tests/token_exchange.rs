#[cfg(test)]
mod test {
    use crate::error::{AuthenticationError, ConfigurationError, Error};
    use crate::helpers::time::now_i64;
    use crate::request::types::Request;
    use crate::tests::common::*;

    async fn mock_jwt_bearer<'a>(server: &'a MockServer) -> Mock<'a> {
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth/token")
                    .header("authorization", BASIC_AUTH)
                    .body_includes("assertion=")
                    .body_includes("response_type=token");
                then.status(200)
                    .json_body(json!({"access_token": "EXCHANGED", "expires_in": 3600}));
            })
            .await
    }

    async fn mock_client_credentials<'a>(server: &'a MockServer, access_token: &str) -> Mock<'a> {
        server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oauth/token")
                    .header("authorization", BASIC_AUTH)
                    .body_includes("grant_type=client_credentials");
                then.status(200)
                    .json_body(json!({"access_token": access_token, "expires_in": 3600}));
            })
            .await
    }

    #[tokio::test]
    async fn exchange_without_identity_broker_is_a_configuration_error() {
        let server = MockServer::start_async().await;
        let client = client(&server, None);

        let err = client
            .authenticator()
            .exchange_token(&sign(&user_claims()))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::MissingExchangeSource)
        ));
    }

    #[tokio::test]
    async fn user_token_is_exchanged_with_jwt_bearer_grant() {
        let server = MockServer::start_async().await;
        let exchange = mock_jwt_bearer(&server).await;
        let technical = mock_client_credentials(&server, "TECHNICAL").await;
        let client = client(&server, Some(broker(&server, true)));

        let token = client
            .authenticator()
            .exchange_token(&format!("Bearer {}", sign(&user_claims())))
            .await
            .unwrap();

        assert_eq!(token, "EXCHANGED");
        exchange.assert_hits_async(1).await;
        technical.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn exchange_leaves_the_cached_token_alone() {
        let server = MockServer::start_async().await;
        let exchange = mock_jwt_bearer(&server).await;
        let technical = mock_client_credentials(&server, "TECHNICAL").await;
        let client = client(&server, Some(broker(&server, true)));
        let inbound = sign(&user_claims());

        assert_eq!(client.access_token().await.unwrap(), "TECHNICAL");
        client.authenticator().exchange_token(&inbound).await.unwrap();
        client.authenticator().exchange_token(&inbound).await.unwrap();
        assert_eq!(client.access_token().await.unwrap(), "TECHNICAL");

        exchange.assert_hits_async(2).await;
        technical.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn technical_inbound_token_is_exchanged_with_client_credentials() {
        let server = MockServer::start_async().await;
        let exchange = mock_jwt_bearer(&server).await;
        let technical = mock_client_credentials(&server, "TECHNICAL").await;
        let client = client(&server, Some(broker(&server, true)));

        let mut claims = user_claims();
        claims["grant_type"] = json!("client_credentials");

        let token = client
            .authenticator()
            .exchange_token(&sign(&claims))
            .await
            .unwrap();

        assert_eq!(token, "TECHNICAL");
        technical.assert_hits_async(1).await;
        exchange.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn verification_key_is_fetched_from_token_keys_without_configured_key() {
        let server = MockServer::start_async().await;
        let keys = server
            .mock_async(|when, then| {
                when.method(GET).path("/token_keys");
                then.status(200).json_body(jwks());
            })
            .await;
        mock_jwt_bearer(&server).await;
        let client = client(&server, Some(broker(&server, false)));

        let token = client
            .authenticator()
            .exchange_token(&sign(&user_claims()))
            .await
            .unwrap();

        assert_eq!(token, "EXCHANGED");
        keys.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn forwarded_token_authorizes_the_request() {
        let server = MockServer::start_async().await;
        mock_jwt_bearer(&server).await;
        let technical = mock_client_credentials(&server, "TECHNICAL").await;
        let things = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/appiot-mds/Things")
                    .header("authorization", "Bearer EXCHANGED");
                then.status(200).json_body(json!({"value": []}));
            })
            .await;

        let client = client(&server, Some(broker(&server, true)));
        client
            .request(
                Request::get(format!("{}/appiot-mds/Things", server.base_url()))
                    .jwt(sign(&user_claims())),
            )
            .await
            .unwrap();

        things.assert_hits_async(1).await;
        technical.assert_hits_async(0).await;
    }

    async fn rejected(server: &MockServer, inbound: &str) -> AuthenticationError {
        let exchange = mock_jwt_bearer(server).await;
        let client = client(server, Some(broker(server, true)));
        let err = client.authenticator().exchange_token(inbound).await.unwrap_err();
        exchange.assert_hits_async(0).await;
        match err {
            Error::Authentication(err) => err,
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn expired_inbound_token_is_rejected() {
        let server = MockServer::start_async().await;
        let mut claims = user_claims();
        claims["exp"] = json!(now_i64() - 10);

        assert!(matches!(
            rejected(&server, &sign(&claims)).await,
            AuthenticationError::InvalidInboundToken(_)
        ));
    }

    #[tokio::test]
    async fn tampered_signature_is_rejected() {
        let server = MockServer::start_async().await;
        let token = sign(&user_claims());
        let (unsigned, signature) = token.rsplit_once('.').unwrap();
        let flipped = if signature.starts_with('A') { 'B' } else { 'A' };
        let tampered = format!("{unsigned}.{flipped}{}", &signature[1..]);

        assert!(matches!(
            rejected(&server, &tampered).await,
            AuthenticationError::InvalidInboundToken(_)
        ));
    }

    #[tokio::test]
    async fn token_of_another_client_is_rejected() {
        let server = MockServer::start_async().await;
        let mut claims = user_claims();
        claims["cid"] = json!("sb-other!t9");
        claims["aud"] = json!(["other!t9"]);

        assert!(matches!(
            rejected(&server, &sign(&claims)).await,
            AuthenticationError::InvalidInboundToken(_)
        ));
    }

    #[tokio::test]
    async fn garbage_is_rejected() {
        let server = MockServer::start_async().await;
        assert!(matches!(
            rejected(&server, "not-a-jwt").await,
            AuthenticationError::InvalidInboundToken(_)
        ));
    }
}
