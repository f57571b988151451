use serde_json::Value;

use crate::error::Error;
use crate::request::query::Query;
use crate::request::types::{Reply, Request, RequestOptions};
use crate::services::{with_etag, RequestContext};

const PACKAGES: &str = "/Package/v1/Packages";

/// Packages of the configuration service.
#[derive(Debug, Clone, Copy)]
pub struct PackageService<'a> {
    ctx: RequestContext<'a>,
}

impl<'a> PackageService<'a> {
    pub fn new(ctx: RequestContext<'a>) -> Self {
        Self { ctx }
    }

    fn url(&self, suffix: &str) -> Result<String, Error> {
        Ok(format!("{}{PACKAGES}{suffix}", self.ctx.navigator().config_package()?))
    }

    pub async fn create_package(&self, payload: Value, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url("")?;
        self.ctx.request(Request::post(url).json(payload), options).await
    }

    pub async fn get_package(&self, package_name: &str, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url(&format!("('{package_name}')"))?;
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn get_packages(&self, query: &Query, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url(&query.to_suffix())?;
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn delete_package(
        &self,
        package_name: &str,
        etag: &str,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let url = self.url(&format!("('{package_name}')"))?;
        self.ctx
            .request(Request::delete(url), with_etag(options, etag)?)
            .await
    }
}
