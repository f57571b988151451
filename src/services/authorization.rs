use serde_json::Value;

use crate::error::Error;
use crate::request::query::Query;
use crate::request::types::{Reply, Request, RequestOptions};
use crate::services::{with_etag, RequestContext};

/// Object groups of the authorization service.
#[derive(Debug, Clone, Copy)]
pub struct AuthorizationService<'a> {
    ctx: RequestContext<'a>,
}

impl<'a> AuthorizationService<'a> {
    pub fn new(ctx: RequestContext<'a>) -> Self {
        Self { ctx }
    }

    fn url(&self, path: &str) -> Result<String, Error> {
        Ok(format!("{}/ObjectGroups{path}", self.ctx.navigator().authorization()?))
    }

    pub async fn create_object_group(&self, payload: Value, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url("")?;
        self.ctx.request(Request::post(url).json(payload), options).await
    }

    pub async fn get_object_group(&self, object_group_id: &str, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url(&format!("('{object_group_id}')"))?;
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn get_object_groups(&self, query: &Query, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url(&query.to_suffix())?;
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn get_root_object_group(&self, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url("/TenantRoot")?;
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn delete_object_group(
        &self,
        object_group_id: &str,
        etag: &str,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let url = self.url(&format!("('{object_group_id}')"))?;
        self.ctx
            .request(Request::delete(url), with_etag(options, etag)?)
            .await
    }
}
