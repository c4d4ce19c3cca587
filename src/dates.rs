use chrono::{DateTime, Duration, FixedOffset, Local, Months, NaiveDate, NaiveTime, TimeZone};
use std::fmt::Display;
use thiserror::Error;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%:z";
const TIMESTAMP_LEN: usize = 25;
const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Error)]
pub enum DateError {
    #[error("{0:?} is not formatted as YYYY-MM-DDThh:mm:ss±hh:mm")]
    Malformed(String),

    #[error("{value:?} is not a valid date-time: {source}")]
    OutOfRange {
        value: String,
        source: chrono::ParseError,
    },

    #[error("{value:?} is not a date, expected YYYY-MM-DD")]
    InvalidDate {
        value: String,
        source: chrono::ParseError,
    },

    #[error("the range ends on {last}, before it starts on {first}")]
    InvertedRange { first: NaiveDate, last: NaiveDate },

    #[error("an end date needs a start date")]
    EndWithoutStart,
}

/// Renders `time` as `YYYY-MM-DDThh:mm:ss±hh:mm` in its own offset. UTC is
/// written as `+00:00`, never `Z`.
pub fn format_timestamp<Tz>(time: &DateTime<Tz>) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_timestamp(value: &str) -> Result<DateTime<FixedOffset>, DateError> {
    if !has_timestamp_shape(value) {
        return Err(DateError::Malformed(value.to_string()));
    }
    DateTime::parse_from_str(value, TIMESTAMP_FORMAT).map_err(|source| DateError::OutOfRange {
        value: value.to_string(),
        source,
    })
}

// chrono accepts `+0100` and `+01 00` for `%:z`; only the colon form is valid here.
fn has_timestamp_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != TIMESTAMP_LEN {
        return false;
    }
    bytes.iter().enumerate().all(|(index, byte)| match index {
        4 | 7 => *byte == b'-',
        10 => *byte == b'T',
        13 | 16 | 22 => *byte == b':',
        19 => *byte == b'+' || *byte == b'-',
        _ => byte.is_ascii_digit(),
    })
}

/// Serde adapter for optional record timestamps. Values are written in the
/// service's format and read as any RFC 3339 timestamp, so `Z` and fractional
/// seconds from the service are accepted.
pub mod optional_timestamp {
    use chrono::{DateTime, FixedOffset};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<DateTime<FixedOffset>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&super::format_timestamp(time)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<FixedOffset>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let Some(value) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        DateTime::parse_from_rfc3339(&value).map(Some).map_err(|err| {
            serde::de::Error::custom(format!("{value:?} is not an RFC 3339 timestamp: {err}"))
        })
    }
}

#[derive(Debug, Clone)]
pub struct DateRange {
    start: DateTime<Local>,
    end: DateTime<Local>,
    label: String,
}

impl DateRange {
    pub fn today() -> Self {
        let today = Local::now().date_naive();
        let mut range = Self::from_bounds(today, today);
        range.label = format!("Today ({})", range.label);
        range
    }

    pub fn last_month() -> Self {
        let end = Local::now().date_naive();
        let start = end
            .checked_sub_months(Months::new(1))
            .unwrap_or(end - Duration::days(30));
        let mut range = Self::from_bounds(start, end);
        range.label = format!("Last month ({})", range.label);
        range
    }

    /// Whole days from `first` through `last` in local time.
    pub fn from_bounds(first: NaiveDate, last: NaiveDate) -> Self {
        let label = if first == last {
            first.format(DATE_FORMAT).to_string()
        } else {
            format!("{} → {}", first.format(DATE_FORMAT), last.format(DATE_FORMAT))
        };
        Self {
            start: local_at(first, NaiveTime::MIN),
            end: local_at(last, NaiveTime::MIN + Duration::seconds(86_399)),
            label,
        }
    }

    /// A single `date` wins; an open `start` runs through today; nothing at
    /// all means today.
    pub fn from_options(
        date: Option<NaiveDate>,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Self, DateError> {
        let (first, last) = match (date, start, end) {
            (Some(day), _, _) => (day, day),
            (None, Some(first), last) => (first, last.unwrap_or_else(|| Local::now().date_naive())),
            (None, None, None) => return Ok(Self::today()),
            (None, None, Some(_)) => return Err(DateError::EndWithoutStart),
        };
        if first > last {
            return Err(DateError::InvertedRange { first, last });
        }
        Ok(Self::from_bounds(first, last))
    }

    /// Inclusive bounds of the range as offset-carrying instants.
    pub fn bounds(&self) -> (DateTime<FixedOffset>, DateTime<FixedOffset>) {
        (self.start.fixed_offset(), self.end.fixed_offset())
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }
}

pub fn parse_date(value: &str) -> Result<NaiveDate, DateError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|source| DateError::InvalidDate {
        value: value.to_string(),
        source,
    })
}

// Wall-clock times skipped by a DST change are read as UTC instead.
fn local_at(date: NaiveDate, time: NaiveTime) -> DateTime<Local> {
    let naive = date.and_time(time);
    Local
        .from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}
