use chrono::{DateTime, SecondsFormat, Utc};

pub const SAFETY_MARGIN_SECONDS_DEFAULT: u64 = 60;

pub fn now_i64() -> i64 {
    Utc::now().timestamp()
}

/// ISO 8601 form expected by the time series endpoints, e.g. `2019-06-17T10:00:00.000Z`.
pub fn to_iso8601(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// `timerange` query value: `<from>-<to>`.
pub fn time_range(from: &DateTime<Utc>, to: &DateTime<Utc>) -> String {
    format!("{}-{}", to_iso8601(from), to_iso8601(to))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn time_range_uses_millisecond_utc_timestamps() {
        let from = Utc.with_ymd_and_hms(2019, 6, 17, 10, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2019, 6, 17, 12, 30, 0).unwrap();
        assert_eq!(
            time_range(&from, &to),
            "2019-06-17T10:00:00.000Z-2019-06-17T12:30:00.000Z"
        );
    }
}
