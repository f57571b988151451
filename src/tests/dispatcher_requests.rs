#[cfg(test)]
mod test {
    use http::StatusCode;

    use crate::error::{ConfigurationError, Error, InvalidRequestError};
    use crate::request::types::{Request, ResponseBody};
    use crate::tests::common::*;

    #[tokio::test]
    async fn relative_path_is_resolved_against_base_url() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "T1", 3600).await;
        let things = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/appiot-mds/Things")
                    .header("authorization", "Bearer T1")
                    .header("accept", "application/json");
                then.status(200).json_body(json!({"value": []}));
            })
            .await;

        let mut client = client(&server, None);
        let base_url = client.set_base_url("appiot-mds").unwrap().to_owned();
        assert_eq!(base_url, format!("{}/appiot-mds", server.base_url()));

        let reply = client.get("/Things").await.unwrap();
        assert_eq!(reply.json(), Some(&json!({"value": []})));
        things.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn absolute_url_ignores_base_url() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "T1", 3600).await;
        let direct = server
            .mock_async(|when, then| {
                when.method(GET).path("/elsewhere");
                then.status(200).json_body(json!({"ok": true}));
            })
            .await;

        let mut client = client(&server, None);
        client.set_base_url("appiot-mds").unwrap();
        client
            .get(&format!("{}/elsewhere", server.base_url()))
            .await
            .unwrap();
        direct.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn unknown_service_keeps_previous_base_url() {
        let server = MockServer::start_async().await;
        let mut client = client(&server, None);
        client.set_base_url("authorization").unwrap();

        let err = client.set_base_url("ysz").unwrap_err();
        assert!(matches!(
            err,
            Error::Configuration(ConfigurationError::UnknownService(_))
        ));
        assert_eq!(
            client.base_url(),
            Some(format!("{}/authorization", server.base_url()).as_str())
        );

        assert!(client.delete_base_url().is_some());
        assert_eq!(client.base_url(), None);
    }

    #[tokio::test]
    async fn invalid_paths_fail_before_any_token_is_fetched() {
        let server = MockServer::start_async().await;
        let token_mock = mock_token_endpoint(&server, "T1", 3600).await;
        let mut client = client(&server, None);

        let err = client.get("/Things").await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRequest(InvalidRequestError::NoBaseUrl { .. })
        ));

        client.set_base_url("appiot-mds").unwrap();
        let err = client.get("Things").await.unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidRequest(InvalidRequestError::NotAResourcePath { .. })
        ));

        let err = client.get("").await.unwrap_err();
        assert!(matches!(err, Error::InvalidRequest(InvalidRequestError::EmptyUrl)));

        token_mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn caller_headers_are_kept_but_authorization_is_overwritten() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "T1", 3600).await;
        let echo = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/appiot-mds/Things")
                    .header("authorization", "Bearer T1")
                    .header("x-correlation-id", "abc")
                    .header("content-type", "application/json")
                    .json_body(json!({"_name": "pump"}));
                then.status(201).json_body(json!({"_id": "1"}));
            })
            .await;

        let client = client(&server, None);
        let request = Request::post(format!("{}/appiot-mds/Things", server.base_url()))
            .json(json!({"_name": "pump"}))
            .header("x-correlation-id", "abc")
            .unwrap()
            .header("authorization", "Bearer forged")
            .unwrap();

        let reply = client.request(request).await.unwrap();
        assert_eq!(reply.json(), Some(&json!({"_id": "1"})));
        echo.assert_hits_async(1).await;
    }

    #[tokio::test]
    async fn non_success_status_becomes_http_error() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "T1", 3600).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/appiot-mds/Things('missing')");
                then.status(404).body("thing not found");
            })
            .await;

        let client = client(&server, None);
        let err = client
            .get(&format!("{}/appiot-mds/Things('missing')", server.base_url()))
            .await
            .unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        match err {
            Error::Http(http) => assert_eq!(http.body(), "thing not found"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn non_json_and_empty_bodies_are_passed_through() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "T1", 3600).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/text");
                then.status(200).body("plain text");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(DELETE).path("/gone");
                then.status(204);
            })
            .await;

        let client = client(&server, None);
        let reply = client
            .get(&format!("{}/text", server.base_url()))
            .await
            .unwrap();
        assert_eq!(reply.body(), &ResponseBody::Raw("plain text".to_owned()));

        let reply = client
            .delete(&format!("{}/gone", server.base_url()))
            .await
            .unwrap();
        assert_eq!(reply.body(), &ResponseBody::Empty);
    }

    #[tokio::test]
    async fn full_response_carries_status_headers_and_etag() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "T1", 3600).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/config-package-sap/Package/v1/Packages('p1')");
                then.status(200)
                    .header("etag", "W/\"42\"")
                    .json_body(json!({"d": {"Name": "p1"}}));
            })
            .await;

        let client = client(&server, None);
        let reply = client
            .request(
                Request::get(format!(
                    "{}/config-package-sap/Package/v1/Packages('p1')",
                    server.base_url()
                ))
                .full_response(),
            )
            .await
            .unwrap();

        let full = reply.full().expect("full response");
        assert_eq!(full.status, StatusCode::OK);
        assert_eq!(reply.etag(), Some("W/\"42\""));
        assert_eq!(reply.json(), Some(&json!({"d": {"Name": "p1"}})));
    }

    #[tokio::test]
    async fn connection_failure_is_a_transport_error() {
        let server = MockServer::start_async().await;
        mock_token_endpoint(&server, "T1", 3600).await;
        let client = client(&server, None);

        let err = client.get("http://127.0.0.1:1/Things").await.unwrap_err();
        match &err {
            Error::Transport(transport) => assert_eq!(transport.url(), "http://127.0.0.1:1/Things"),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn token_is_fetched_once_for_many_requests() {
        let server = MockServer::start_async().await;
        let token_mock = mock_token_endpoint(&server, "T1", 3600).await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/appiot-mds/Things");
                then.status(200).json_body(json!({"value": []}));
            })
            .await;

        let mut client = client(&server, None);
        client.set_base_url("appiot-mds").unwrap();
        for _ in 0..3 {
            client.get("/Things").await.unwrap();
        }
        token_mock.assert_hits_async(1).await;
    }
}
