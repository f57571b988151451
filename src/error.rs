//! Error taxonomy shared by the authenticator, the dispatcher and the
//! resource services.
//!
//! Every failure propagates to the caller unchanged: the core never retries
//! and never swallows an error.

use http::StatusCode;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Authentication(#[from] AuthenticationError),

    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequestError),

    #[error(transparent)]
    Http(#[from] HttpError),

    #[error(transparent)]
    Transport(#[from] TransportError),
}

impl Error {
    /// Status code of a non-2xx resource response, if this is one.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http(err) => Some(err.status()),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Http(err) if err.is_not_found())
    }

    /// Transport failures, 5xx and 429 responses may succeed when repeated.
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Transport(_) => true,
            Error::Authentication(AuthenticationError::Unreachable { .. }) => true,
            Error::Http(err) => {
                err.status().is_server_error() || err.status() == StatusCode::TOO_MANY_REQUESTS
            }
            _ => false,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigurationError {
    #[error("no credentials found: provide an explicit configuration, a service binding or the AE_* environment variables")]
    MissingCredentials,

    #[error("incomplete {source_name} configuration, missing: {}", missing.join(", "))]
    Incomplete {
        source_name: &'static str,
        missing: Vec<&'static str>,
    },

    #[error("unknown microservice '{0}'")]
    UnknownService(String),

    #[error("unknown destination for service name '{0}'")]
    UnknownDestination(String),

    #[error("identity broker (source of the forwarded token) credentials are missing")]
    MissingExchangeSource,

    #[error("invalid service binding document: {0}")]
    InvalidBinding(String),

    #[error("invalid settings: {0}")]
    InvalidSettings(String),
}

#[derive(Debug, Error)]
pub enum AuthenticationError {
    #[error("bad credentials for token endpoint {url}")]
    BadCredentials { url: String },

    #[error("token endpoint {url} not found")]
    EndpointNotFound { url: String },

    #[error("token endpoint {url} rejected the request with status {status}: {body}")]
    Rejected {
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("token endpoint {url} unreachable: {source}")]
    Unreachable {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid token response: {0}")]
    InvalidTokenResponse(String),

    #[error("forwarded token rejected: {0}")]
    InvalidInboundToken(String),
}

#[derive(Debug, Error)]
pub enum InvalidRequestError {
    #[error("url argument is empty")]
    EmptyUrl,

    #[error("'{path}' is not a valid url and no base url is set")]
    NoBaseUrl { path: String },

    #[error("'{path}' is not a valid resource path")]
    NotAResourcePath { path: String },

    #[error("invalid header: {0}")]
    InvalidHeader(String),
}

/// Non-2xx answer of a resource endpoint, with the raw body as received.
#[derive(Debug, Error)]
#[error("request failed with status {status}: {body}")]
pub struct HttpError {
    status: StatusCode,
    body: String,
}

impl HttpError {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn is_not_found(&self) -> bool {
        self.status == StatusCode::NOT_FOUND
    }

    pub fn is_conflict(&self) -> bool {
        self.status == StatusCode::CONFLICT
    }
}

#[derive(Debug, Error)]
#[error("request to {url} failed: {source}")]
pub struct TransportError {
    url: String,
    #[source]
    source: reqwest::Error,
}

impl TransportError {
    pub fn new(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self {
            url: url.into(),
            source,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn is_timeout(&self) -> bool {
        self.source.is_timeout()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn http_error_is_inspectable_through_crate_error() {
        let err: Error = HttpError::new(StatusCode::NOT_FOUND, "{\"error\":\"missing\"}").into();
        assert!(err.is_not_found());
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.is_retryable());

        let err: Error = HttpError::new(StatusCode::SERVICE_UNAVAILABLE, "").into();
        assert!(err.is_retryable());
        assert!(!err.is_not_found());
    }

    #[test]
    fn incomplete_configuration_lists_missing_fields() {
        let err = ConfigurationError::Incomplete {
            source_name: "explicit",
            missing: vec!["tenant", "host"],
        };
        assert_eq!(
            err.to_string(),
            "incomplete explicit configuration, missing: tenant, host"
        );
    }
}
