use serde_json::Value;

use crate::error::Error;
use crate::request::query::Query;
use crate::request::types::{Reply, Request, RequestOptions};
use crate::services::RequestContext;

#[derive(Debug, Clone, Copy)]
pub struct ThingService<'a> {
    ctx: RequestContext<'a>,
}

impl<'a> ThingService<'a> {
    pub fn new(ctx: RequestContext<'a>) -> Self {
        Self { ctx }
    }

    fn url(&self, path: &str) -> Result<String, Error> {
        Ok(format!("{}{path}", self.ctx.navigator().appiot_mds()?))
    }

    pub async fn create_thing(&self, payload: Value, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url("/Things")?;
        self.ctx.request(Request::post(url).json(payload), options).await
    }

    pub async fn get_thing(&self, thing_id: &str, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url(&format!("/Things('{thing_id}')"))?;
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn get_thing_by_alternate_id(
        &self,
        alternate_id: &str,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let url = self.url(&format!("/ThingsByAlternateId('{alternate_id}')"))?;
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn get_things(&self, query: &Query, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url(&format!("/Things{}", query.to_suffix()))?;
        self.ctx.request(Request::get(url), options).await
    }

    /// Narrows an existing `$filter` to the thing type, or sets one.
    pub async fn get_things_by_thing_type(
        &self,
        thing_type_id: &str,
        query: &Query,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let query = query.clone().filter(thing_type_filter(query, thing_type_id));
        self.get_things(&query, options).await
    }

    pub async fn delete_thing(&self, thing_id: &str, options: RequestOptions) -> Result<Reply, Error> {
        let url = self.url(&format!("/Things('{thing_id}')"))?;
        self.ctx.request(Request::delete(url), options).await
    }
}

fn thing_type_filter(query: &Query, thing_type_id: &str) -> String {
    match query.get("$filter") {
        Some(filter) => format!("{filter} and _thingType eq '{thing_type_id}'"),
        None => format!("_thingType eq '{thing_type_id}'"),
    }
}
