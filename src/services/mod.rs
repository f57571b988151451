//! Resource services: URL and body templates over [`RequestContext::request`].
//!
//! Every method forwards errors unchanged.

pub mod authorization;
pub mod cold_store;
pub mod packages;
pub mod property_set_types;
pub mod thing_types;
pub mod things;
pub mod time_series;

use http::header::IF_MATCH;
use http::HeaderValue;

use crate::error::{Error, InvalidRequestError};
use crate::navigator::Navigator;
use crate::request::dispatcher::Dispatcher;
use crate::request::types::{Reply, Request, RequestOptions};

pub use authorization::AuthorizationService;
pub use cold_store::ColdStoreService;
pub use packages::PackageService;
pub use property_set_types::PropertySetTypeService;
pub use thing_types::ThingTypeService;
pub use things::ThingService;
pub use time_series::{TimeSeriesPayload, TimeSeriesStoreService};

/// What a service needs from the client: destinations and the dispatcher.
#[derive(Debug, Clone, Copy)]
pub struct RequestContext<'a> {
    dispatcher: &'a Dispatcher,
}

impl<'a> RequestContext<'a> {
    pub fn new(dispatcher: &'a Dispatcher) -> Self {
        Self { dispatcher }
    }

    pub fn navigator(&self) -> &'a Navigator {
        self.dispatcher.navigator()
    }

    pub async fn request(&self, request: Request, options: RequestOptions) -> Result<Reply, Error> {
        self.dispatcher.request(request.with_options(options)).await
    }
}

/// Adds the `If-Match` header deletes require.
pub(crate) fn with_etag(mut options: RequestOptions, etag: &str) -> Result<RequestOptions, Error> {
    let value = HeaderValue::from_str(etag)
        .map_err(|e| InvalidRequestError::InvalidHeader(format!("if-match: {e}")))?;
    options.headers.insert(IF_MATCH, value);
    Ok(options)
}
