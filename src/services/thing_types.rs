use serde_json::Value;

use crate::error::Error;
use crate::request::query::Query;
use crate::request::types::{Reply, Request, RequestOptions};
use crate::services::{with_etag, RequestContext};

const THING_CONFIGURATION: &str = "/ThingConfiguration/v1";

#[derive(Debug, Clone, Copy)]
pub struct ThingTypeService<'a> {
    ctx: RequestContext<'a>,
}

impl<'a> ThingTypeService<'a> {
    pub fn new(ctx: RequestContext<'a>) -> Self {
        Self { ctx }
    }

    fn url(&self, path: &str) -> Result<String, Error> {
        Ok(format!("{}{THING_CONFIGURATION}{path}", self.ctx.navigator().config_thing()?))
    }

    pub async fn create_thing_type(
        &self,
        package_name: &str,
        payload: Value,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let url = self.url(&format!("/Packages('{package_name}')/ThingTypes"))?;
        self.ctx.request(Request::post(url).json(payload), options).await
    }

    pub async fn get_thing_type(
        &self,
        thing_type_name: &str,
        query: &Query,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let url = self.url(&format!("/ThingTypes('{thing_type_name}'){}", query.to_suffix()))?;
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn get_thing_types(&self, query: &Query, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url(&format!("/ThingTypes{}", query.to_suffix()))?;
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn get_thing_types_by_package(
        &self,
        package_name: &str,
        query: &Query,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let url = self.url(&format!(
            "/Packages('{package_name}')/ThingTypes{}",
            query.to_suffix()
        ))?;
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn delete_thing_type(
        &self,
        thing_type_name: &str,
        etag: &str,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let url = self.url(&format!("/ThingTypes('{thing_type_name}')"))?;
        self.ctx
            .request(Request::delete(url), with_etag(options, etag)?)
            .await
    }
}
