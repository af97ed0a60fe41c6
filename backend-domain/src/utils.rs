use time::OffsetDateTime;

pub const DAY_MS: i64 = 86_400_000;

pub fn millis_to_utc(ms: i64) -> OffsetDateTime {
    let nanos = i128::from(ms).saturating_mul(1_000_000);
    OffsetDateTime::from_unix_timestamp_nanos(nanos).unwrap_or_else(|_| OffsetDateTime::now_utc())
}

pub fn utc_to_millis(dt: OffsetDateTime) -> i64 {
    (dt.unix_timestamp_nanos() / 1_000_000) as i64
}

pub fn current_millis() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp_nanos() as i64 / 1_000_000
}

pub fn days_between(earlier_ms: i64, later_ms: i64) -> f64 {
    (later_ms - earlier_ms).max(0) as f64 / DAY_MS as f64
}
