//! Calendar dates with an optional year.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// Placeholder year the remote service stores for dates without a year.
pub const NO_YEAR: i32 = 1604;

/// A calendar date whose year may be unknown (birthdays, anniversaries).
///
/// Serialized as `YYYY-MM-DD`, or `--MM-DD` when the year is unknown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Date {
    pub year: Option<i32>,
    pub month: u32,
    pub day: u32,
}

impl Date {
    pub fn new(year: Option<i32>, month: u32, day: u32) -> Result<Self, Error> {
        // 2000 is a leap year, so Feb 29 without a year stays valid.
        let check_year = year.unwrap_or(2000);
        if NaiveDate::from_ymd_opt(check_year, month, day).is_none() {
            return Err(Error::Validation(format!(
                "invalid date: year={year:?} month={month} day={day}"
            )));
        }
        Ok(Self { year, month, day })
    }

    /// Render in the remote wire format, substituting [`NO_YEAR`].
    pub fn to_remote_string(&self) -> String {
        format!(
            "{:04}-{:02}-{:02}",
            self.year.unwrap_or(NO_YEAR),
            self.month,
            self.day
        )
    }

    /// Parse the remote wire format, mapping [`NO_YEAR`] back to `None`.
    pub fn from_remote_str(value: &str) -> Result<Self, Error> {
        let date = NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
            .map_err(|error| Error::Validation(format!("invalid date '{value}': {error}")))?;
        Ok(Self {
            year: Some(date.year()).filter(|year| *year != NO_YEAR),
            month: date.month(),
            day: date.day(),
        })
    }
}

impl fmt::Display for Date {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.year {
            Some(year) => write!(f, "{year:04}-{:02}-{:02}", self.month, self.day),
            None => write!(f, "--{:02}-{:02}", self.month, self.day),
        }
    }
}

impl FromStr for Date {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let value = value.trim();
        if let Some(month_day) = value.strip_prefix("--") {
            let (month, day) = month_day
                .split_once('-')
                .ok_or_else(|| Error::Validation(format!("invalid date '{value}'")))?;
            let month = month
                .parse()
                .map_err(|_| Error::Validation(format!("invalid month in '{value}'")))?;
            let day = day
                .parse()
                .map_err(|_| Error::Validation(format!("invalid day in '{value}'")))?;
            return Self::new(None, month, day);
        }

        let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map_err(|error| Error::Validation(format!("invalid date '{value}': {error}")))?;
        Ok(Self {
            year: Some(date.year()),
            month: date.month(),
            day: date.day(),
        })
    }
}

impl Serialize for Date {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Date {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = String::deserialize(deserializer)?;
        value.parse().map_err(serde::de::Error::custom)
    }
}

/// A span of time, e.g. how long two contacts dated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DateRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start: Option<Date>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end: Option<Date>,
}

impl DateRange {
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

/// `serde(with = ...)` adapter for remote date fields.
pub mod remote_format {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Date;

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(value: &Option<Date>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(date) => serializer.serialize_str(&date.to_remote_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Date>, D::Error> {
        let value = Option::<String>::deserialize(deserializer)?;
        value
            .filter(|value| !value.trim().is_empty())
            .map(|value| Date::from_remote_str(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}
