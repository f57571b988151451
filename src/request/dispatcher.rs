use std::sync::Arc;

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::HeaderValue;
use reqwest::Client;
use tracing::{debug, warn};

use crate::authenticator::Authenticator;
use crate::error::{Error, HttpError, InvalidRequestError, TransportError};
use crate::navigator::{Navigator, ServiceName};
use crate::request::types::{FullResponse, Reply, Request, ResponseBody};

/// Single chokepoint for authenticated calls.
#[derive(Debug)]
pub struct Dispatcher {
    client: Client,
    authenticator: Arc<Authenticator>,
    navigator: Navigator,
    base_url: Option<String>,
}

impl Dispatcher {
    pub fn new(client: Client, authenticator: Arc<Authenticator>, navigator: Navigator) -> Self {
        Self {
            client,
            authenticator,
            navigator,
            base_url: None,
        }
    }

    pub fn authenticator(&self) -> &Authenticator {
        &self.authenticator
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// Use the destination of `service` for relative paths from now on.
    ///
    /// On error the previous base url stays in place.
    pub fn set_base_url(&mut self, service: &str) -> Result<&str, Error> {
        let service: ServiceName = service.parse()?;
        let url = self.navigator.destination(service)?.to_owned();
        debug!(%service, url = %url, "set base url");
        Ok(self.base_url.insert(url).as_str())
    }

    pub fn base_url(&self) -> Option<&str> {
        self.base_url.as_deref()
    }

    /// Returns the removed base url.
    pub fn delete_base_url(&mut self) -> Option<String> {
        self.base_url.take()
    }

    /// Absolute urls are used as they are; anything else must be a
    /// `/`-prefixed path below the base url.
    pub fn resolve_url(&self, path: &str) -> Result<String, InvalidRequestError> {
        if path.is_empty() {
            return Err(InvalidRequestError::EmptyUrl);
        }
        if is_valid_url(path) {
            return Ok(path.to_owned());
        }
        let Some(base_url) = self.base_url.as_deref() else {
            debug!(path, "not a valid url and no base url is set");
            return Err(InvalidRequestError::NoBaseUrl {
                path: path.to_owned(),
            });
        };
        if !path.starts_with('/') {
            debug!(path, "not a valid resource path");
            return Err(InvalidRequestError::NotAResourcePath {
                path: path.to_owned(),
            });
        }
        Ok(format!("{base_url}{path}"))
    }

    pub async fn request(&self, request: Request) -> Result<Reply, Error> {
        let url = self.resolve_url(&request.path)?;
        let access_token = match request.jwt.as_deref() {
            Some(jwt) => {
                debug!("using forwarded access token for authorization");
                self.authenticator.exchange_token(jwt).await?
            }
            None => self.authenticator.get_access_token().await?,
        };

        let mut headers = request.headers;
        headers
            .entry(ACCEPT)
            .or_insert(HeaderValue::from_static("application/json"));
        if request.body.is_some() {
            headers
                .entry(CONTENT_TYPE)
                .or_insert(HeaderValue::from_static("application/json"));
        }
        let bearer = HeaderValue::from_str(&format!("Bearer {access_token}"))
            .map_err(|e| InvalidRequestError::InvalidHeader(format!("authorization: {e}")))?;
        headers.insert(AUTHORIZATION, bearer);

        debug!(method = %request.method, url = %url, "sending request");
        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers);
        if let Some(body) = &request.body {
            builder = builder.body(body.to_string());
        }

        let response = builder
            .send()
            .await
            .map_err(|e| TransportError::new(&url, e))?;
        let status = response.status();
        let response_headers = response.headers().clone();
        let text = response
            .text()
            .await
            .map_err(|e| TransportError::new(&url, e))?;

        if !status.is_success() {
            warn!(method = %request.method, url = %url, %status, "request failed");
            return Err(HttpError::new(status, text).into());
        }

        let body = ResponseBody::parse(text);
        if request.full_response {
            Ok(Reply::Full(FullResponse {
                status,
                headers: response_headers,
                body,
            }))
        } else {
            Ok(Reply::Body(body))
        }
    }
}

/// Absolute http(s) url with a host.
pub fn is_valid_url(candidate: &str) -> bool {
    url::Url::parse(candidate)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
        .unwrap_or(false)
}
