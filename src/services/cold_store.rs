use chrono::{DateTime, Utc};

use crate::error::Error;
use crate::helpers::time::time_range;
use crate::request::query::Query;
use crate::request::types::{Reply, Request, RequestOptions};
use crate::services::{RequestContext, TimeSeriesPayload};

/// Time series beyond the retention period.
#[derive(Debug, Clone, Copy)]
pub struct ColdStoreService<'a> {
    ctx: RequestContext<'a>,
}

impl<'a> ColdStoreService<'a> {
    pub fn new(ctx: RequestContext<'a>) -> Self {
        Self { ctx }
    }

    fn series_url(
        &self,
        thing_id: &str,
        thing_type_name: &str,
        property_set_id: &str,
    ) -> Result<String, Error> {
        Ok(format!(
            "{}/Things('{thing_id}')/{thing_type_name}/{property_set_id}",
            self.ctx.navigator().appiot_coldstore()?
        ))
    }

    pub async fn create_cold_store_time_series_data(
        &self,
        thing_id: &str,
        thing_type_name: &str,
        property_set_id: &str,
        payload: &TimeSeriesPayload,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let url = self.series_url(thing_id, thing_type_name, property_set_id)?;
        self.ctx
            .request(Request::put(url).json(payload.to_json()), options)
            .await
    }

    /// `timerange` overrides a value already present in `query`.
    #[allow(clippy::too_many_arguments)]
    pub async fn get_cold_store_time_series_data(
        &self,
        thing_id: &str,
        thing_type_name: &str,
        property_set_id: &str,
        from: &DateTime<Utc>,
        to: &DateTime<Utc>,
        query: &Query,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let query = query.clone().param("timerange", time_range(from, to));
        let url = format!(
            "{}{}",
            self.series_url(thing_id, thing_type_name, property_set_id)?,
            query.to_suffix()
        );
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn delete_cold_store_time_series_data(
        &self,
        thing_id: &str,
        thing_type_name: &str,
        property_set_id: &str,
        from: &DateTime<Utc>,
        to: &DateTime<Utc>,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let query = Query::new().param("timerange", time_range(from, to));
        let url = format!(
            "{}{}",
            self.series_url(thing_id, thing_type_name, property_set_id)?,
            query.to_suffix()
        );
        self.ctx.request(Request::delete(url), options).await
    }
}
