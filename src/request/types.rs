use http::header::{HeaderName, ETAG};
use http::{HeaderMap, HeaderValue, Method, StatusCode};
use serde_json::Value;

use crate::error::InvalidRequestError;

/// Metadata every resource service call accepts.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub headers: HeaderMap,
    pub full_response: bool,
    /// forwarded end-user token, exchanged before use
    pub jwt: Option<String>,
}

impl RequestOptions {
    pub fn full_response() -> Self {
        Self {
            full_response: true,
            ..Default::default()
        }
    }

    pub fn with_jwt(mut self, jwt: impl Into<String>) -> Self {
        self.jwt = Some(jwt.into());
        self
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }
}

/// One authenticated call: a path relative to the base url, or an absolute url.
#[derive(Debug, Clone)]
pub struct Request {
    pub path: String,
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub full_response: bool,
    pub jwt: Option<String>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            method,
            headers: HeaderMap::new(),
            body: None,
            full_response: false,
            jwt: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn header(mut self, name: &str, value: &str) -> Result<Self, InvalidRequestError> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| InvalidRequestError::InvalidHeader(format!("{name}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| InvalidRequestError::InvalidHeader(format!("{name}: {e}")))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn full_response(mut self) -> Self {
        self.full_response = true;
        self
    }

    pub fn jwt(mut self, token: impl Into<String>) -> Self {
        self.jwt = Some(token.into());
        self
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.headers.extend(options.headers);
        self.full_response = options.full_response;
        self.jwt = options.jwt;
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Json(Value),
    /// non-JSON payload, as received
    Raw(String),
    Empty,
}

impl ResponseBody {
    pub fn parse(text: String) -> Self {
        if text.trim().is_empty() {
            return ResponseBody::Empty;
        }
        match serde_json::from_str(&text) {
            Ok(value) => ResponseBody::Json(value),
            Err(_) => ResponseBody::Raw(text),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<Value> {
        match self {
            ResponseBody::Json(value) => Some(value),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FullResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: ResponseBody,
}

impl FullResponse {
    /// Entity version required as `If-Match` by deletes.
    pub fn etag(&self) -> Option<&str> {
        self.headers.get(ETAG).and_then(|v| v.to_str().ok())
    }
}

#[derive(Debug, Clone)]
pub enum Reply {
    Body(ResponseBody),
    Full(FullResponse),
}

impl Reply {
    pub fn body(&self) -> &ResponseBody {
        match self {
            Reply::Body(body) => body,
            Reply::Full(full) => &full.body,
        }
    }

    pub fn into_body(self) -> ResponseBody {
        match self {
            Reply::Body(body) => body,
            Reply::Full(full) => full.body,
        }
    }

    pub fn json(&self) -> Option<&Value> {
        self.body().as_json()
    }

    pub fn full(&self) -> Option<&FullResponse> {
        match self {
            Reply::Full(full) => Some(full),
            Reply::Body(_) => None,
        }
    }

    pub fn etag(&self) -> Option<&str> {
        self.full().and_then(FullResponse::etag)
    }
}
