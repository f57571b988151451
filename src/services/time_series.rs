use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::Error;
use crate::helpers::time::{time_range, to_iso8601};
use crate::request::query::Query;
use crate::request::types::{Reply, Request, RequestOptions};
use crate::services::RequestContext;

/// Body of a time series write: `{"value": [{"_time": ..., <property>: <value>}]}`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TimeSeriesPayload {
    records: Vec<TimeSeriesRecord>,
}

#[derive(Debug, Clone, PartialEq)]
struct TimeSeriesRecord {
    time: DateTime<Utc>,
    values: Map<String, Value>,
}

impl TimeSeriesPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record<K, V, I>(mut self, time: DateTime<Utc>, values: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.records.push(TimeSeriesRecord {
            time,
            values: values
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        });
        self
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn to_json(&self) -> Value {
        // only string keys and json values go in, serialization cannot fail
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl Serialize for TimeSeriesRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("_time", &to_iso8601(&self.time))?;
        for (key, value) in self.values.iter().filter(|(k, _)| k.as_str() != "_time") {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for TimeSeriesPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry("value", &self.records)?;
        map.end()
    }
}

/// Time series within the retention period.
#[derive(Debug, Clone, Copy)]
pub struct TimeSeriesStoreService<'a> {
    ctx: RequestContext<'a>,
}

impl<'a> TimeSeriesStoreService<'a> {
    pub fn new(ctx: RequestContext<'a>) -> Self {
        Self { ctx }
    }

    fn base(&self) -> Result<&'a str, Error> {
        Ok(self.ctx.navigator().appiot_mds()?)
    }

    fn series_url(
        &self,
        thing_id: &str,
        thing_type_name: &str,
        property_set_id: &str,
    ) -> Result<String, Error> {
        Ok(format!(
            "{}/Things('{thing_id}')/{thing_type_name}/{property_set_id}",
            self.base()?
        ))
    }

    pub async fn create_time_series_data(
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

    pub async fn get_time_series_data(
        &self,
        thing_id: &str,
        thing_type_name: &str,
        property_set_id: &str,
        query: &Query,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let url = format!(
            "{}{}",
            self.series_url(thing_id, thing_type_name, property_set_id)?,
            query.to_suffix()
        );
        self.ctx.request(Request::get(url), options).await
    }

    /// Latest values of every property set of the thing; an empty
    /// `data_category` means all categories.
    pub async fn get_thing_snapshot(
        &self,
        thing_id: &str,
        data_category: &str,
        options: RequestOptions,
    ) -> Result<Reply, Error> {
        let url = format!(
            "{}/Snapshot(thingId='{thing_id}',fromTime='',dataCategory='{data_category}')",
            self.base()?
        );
        self.ctx.request(Request::get(url), options).await
    }

    pub async fn delete_time_series_data(
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
