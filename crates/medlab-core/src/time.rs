use crate::error::{CoreError, Result};
use time::macros::format_description;
use time::{Date, OffsetDateTime};

pub fn now_utc() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub fn today_utc() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Whole years elapsed from `from` to `to`.
///
/// Counts completed years only, so a birthday later in the year of `to` has
/// not been reached yet. Negative when `to` precedes `from`.
pub fn whole_years_between(from: Date, to: Date) -> i32 {
    let mut years = to.year() - from.year();
    let to_day = (u8::from(to.month()), to.day());
    let from_day = (u8::from(from.month()), from.day());
    if years > 0 && to_day < from_day {
        years -= 1;
    } else if years < 0 && to_day > from_day {
        years += 1;
    }
    years
}

/// Parses a calendar date in `YYYY-MM-DD` form.
pub fn parse_date(s: &str) -> Result<Date> {
    Date::parse(s, format_description!("[year]-[month]-[day]"))
        .map_err(|e| CoreError::invalid_date(format!("Failed to parse date '{s}': {e}")))
}

pub fn format_date(date: Date) -> String {
    // The format has no fallible components for in-range dates.
    date.format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| date.to_string())
}

/// Serde adapters for `Option<Date>` as `YYYY-MM-DD` strings.
pub mod iso_date_option {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::Date;

    pub fn serialize<S>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&super::format_date(*date)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|s| super::parse_date(&s).map_err(serde::de::Error::custom))
            .transpose()
    }
}
