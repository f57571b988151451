//! # IoT Services Client
//!
//! Client for the multi-tenant IoT platform microservices: acquires and
//! caches an OAuth2 access token, exchanges forwarded user tokens and sends
//! authenticated requests to the services of one tenant.
//!
//! Modules:
//! - `authenticator`: token acquisition, caching, refresh and exchange
//! - `cache`: the token value object
//! - `config`: credentials, settings and configuration providers
//! - `navigator`: logical service name to destination url
//! - `request`: the request dispatcher and its request/response types
//! - `services`: URL templates of the individual resource services
//! - `sources`: token endpoint calls and inbound token verification

pub mod authenticator;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod helpers;
pub mod navigator;
pub mod request;
pub mod resilience;
pub mod services;
pub mod sources;
pub mod utils;

#[cfg(test)]
mod tests;

pub use crate::authenticator::{Authenticator, AuthenticatorConfig};
pub use crate::cache::token::Token;
pub use crate::client::{IotClient, IotClientBuilder};
pub use crate::config::credentials::UaaCredentials;
pub use crate::config::providers::{
    ConfigChain, ConfigProvider, EnvironmentConfig, ExplicitConfig, ResolvedConfig, ServiceBindings,
};
pub use crate::config::settings::ClientSettings;
pub use crate::error::{
    AuthenticationError, ConfigurationError, Error, HttpError, InvalidRequestError, Result,
    TransportError,
};
pub use crate::navigator::{Navigator, ServiceName};
pub use crate::request::{Query, Reply, Request, RequestOptions, ResponseBody};
