use crate::domain::model::Timestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_WITH_OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%dT%H:%M:%S%.f%:z",
    "%Y-%m-%dT%H:%M%z",
    "%Y-%m-%dT%H:%M%:z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%:z",
];

const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y%m%dT%H%M%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];

/// 寬鬆的日期解析，回傳 epoch 毫秒。
///
/// 沒有時區的時間一律視為 UTC；無法解析時回傳 [`Timestamp::INVALID`]，不會失敗。
pub fn parse_timestamp(input: &str) -> Timestamp {
    let text = input.trim();
    if text.is_empty() {
        return Timestamp::INVALID;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Timestamp::from_millis(dt.timestamp_millis());
    }

    for format in DATETIME_WITH_OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, format) {
            return Timestamp::from_millis(dt.timestamp_millis());
        }
    }

    // 結尾的 Z 等同 UTC，去掉後交給 naive 格式處理
    let naive_text = text
        .strip_suffix('Z')
        .or_else(|| text.strip_suffix('z'))
        .unwrap_or(text);

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(naive_text, format) {
            return Timestamp::from_millis(dt.and_utc().timestamp_millis());
        }
    }

    if let Some(date) = parse_date(naive_text) {
        return date;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Timestamp::from_millis(dt.timestamp_millis());
    }

    Timestamp::INVALID
}

fn parse_date(text: &str) -> Option<Timestamp> {
    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(text, format) {
            return midnight_utc(date);
        }
    }

    // YYYY-MM
    if text.len() == 7 && text.as_bytes()[4] == b'-' {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", text), "%Y-%m-%d") {
            return midnight_utc(date);
        }
    }

    // YYYY
    if text.len() == 4 && text.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = text.parse().ok()?;
        return NaiveDate::from_ymd_opt(year, 1, 1).and_then(midnight_utc);
    }

    None
}

fn midnight_utc(date: NaiveDate) -> Option<Timestamp> {
    date.and_hms_opt(0, 0, 0)
        .map(|dt| Timestamp::from_millis(dt.and_utc().timestamp_millis()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const JAN_1_2020: i64 = 1_577_836_800_000;
    const DAY: i64 = 86_400_000;

    fn millis(input: &str) -> Option<i64> {
        parse_timestamp(input).millis()
    }

    #[test]
    fn test_plain_dates() {
        assert_eq!(millis("2020-01-01"), Some(JAN_1_2020));
        assert_eq!(millis("2020-01-02"), Some(JAN_1_2020 + DAY));
        assert_eq!(millis("2020/01/02"), Some(JAN_1_2020 + DAY));
        assert_eq!(millis("20200102"), Some(JAN_1_2020 + DAY));
        assert_eq!(millis("2020-01"), Some(JAN_1_2020));
        assert_eq!(millis("2020"), Some(JAN_1_2020));
    }

    #[test]
    fn test_iso_datetimes() {
        assert_eq!(millis("2020-01-01T00:00:00Z"), Some(JAN_1_2020));
        assert_eq!(millis("2020-01-01T00:00:00.000Z"), Some(JAN_1_2020));
        assert_eq!(millis("2020-01-01T01:00:00+01:00"), Some(JAN_1_2020));
        assert_eq!(millis("2020-01-01T01:00:00+0100"), Some(JAN_1_2020));
        assert_eq!(millis("2020-01-01T12:00Z"), Some(JAN_1_2020 + DAY / 2));
        assert_eq!(millis("2020-01-01T12:00:00"), Some(JAN_1_2020 + DAY / 2));
        assert_eq!(millis("2020-01-01 12:00:00"), Some(JAN_1_2020 + DAY / 2));
        assert_eq!(millis("2020-01-01T00:00:00.250Z"), Some(JAN_1_2020 + 250));
    }

    #[test]
    fn test_rfc2822() {
        assert_eq!(millis("Wed, 01 Jan 2020 00:00:00 +0000"), Some(JAN_1_2020));
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        assert_eq!(millis("  2020-01-01\n"), Some(JAN_1_2020));
    }

    #[test]
    fn test_unparseable_values_are_invalid_not_errors() {
        assert_eq!(parse_timestamp("not a date"), Timestamp::INVALID);
        assert_eq!(parse_timestamp("2020-13-45"), Timestamp::INVALID);
        assert_eq!(parse_timestamp("2020-01-01/2020-12-31/P1D"), Timestamp::INVALID);
        assert_eq!(parse_timestamp(""), Timestamp::INVALID);
    }
}
