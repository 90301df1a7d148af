use chrono::{DateTime, Duration, NaiveTime, Utc};

pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// `[start, end)` of the UTC calendar day containing `at`.
pub fn day_bounds(at: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = at.date_naive().and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn day_bounds_cover_the_whole_utc_day() {
        let at = Utc.with_ymd_and_hms(2026, 10, 16, 17, 45, 3).unwrap();
        let (start, end) = day_bounds(at);
        assert_eq!(start, Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2026, 10, 17, 0, 0, 0).unwrap());
        assert!(start <= at && at < end);
    }
}
