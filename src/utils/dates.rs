use chrono::{DateTime, NaiveDate, NaiveDateTime};

pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
];

pub fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|f| f.to_string()).collect()
}

/// 依序嘗試各格式解析日期；帶時間的格式只取日期部分，最後嘗試 RFC 3339
pub fn parse_date<S: AsRef<str>>(input: &str, formats: &[S]) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    for format in formats {
        let format = format.as_ref();
        if let Ok(date) = NaiveDate::parse_from_str(input, format) {
            return Some(date);
        }
        if let Ok(datetime) = NaiveDateTime::parse_from_str(input, format) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(input)
        .ok()
        .map(|datetime| datetime.date_naive())
}
