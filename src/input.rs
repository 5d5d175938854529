//! Encoder input: a timestamp, or an explicit marker for missing data.

use crate::error::{EncoderError, Result};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde_json::Value;
use std::str::FromStr;

/// Accepted timestamp layouts, tried in order.
const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

/// What the date encoder consumes.
///
/// `Missing` encodes to an all-zero vector and has no bucket indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DateInput {
    Timestamp(NaiveDateTime),
    Missing,
}

impl DateInput {
    pub fn timestamp(&self) -> Option<&NaiveDateTime> {
        match self {
            DateInput::Timestamp(ts) => Some(ts),
            DateInput::Missing => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, DateInput::Missing)
    }
}

impl From<NaiveDateTime> for DateInput {
    fn from(ts: NaiveDateTime) -> Self {
        DateInput::Timestamp(ts)
    }
}

impl From<NaiveDate> for DateInput {
    fn from(date: NaiveDate) -> Self {
        DateInput::Timestamp(date.and_time(NaiveTime::default()))
    }
}

impl From<Option<NaiveDateTime>> for DateInput {
    fn from(ts: Option<NaiveDateTime>) -> Self {
        ts.map_or(DateInput::Missing, DateInput::Timestamp)
    }
}

impl FromStr for DateInput {
    type Err = EncoderError;

    /// Parse `YYYY-MM-DD[( |T)HH:MM[:SS[.fff]]]`. A blank string is missing
    /// data.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.is_empty() {
            return Ok(DateInput::Missing);
        }

        if let Some(ts) = DATETIME_FORMATS
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        {
            return Ok(DateInput::Timestamp(ts));
        }

        NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map(DateInput::from)
            .map_err(|_| EncoderError::InvalidInput(format!("not a timestamp: {:?}", s)))
    }
}

impl TryFrom<&Value> for DateInput {
    type Error = EncoderError;

    /// `null` is missing data, strings are parsed as timestamps, anything
    /// else is rejected.
    fn try_from(value: &Value) -> Result<Self> {
        match value {
            Value::Null => Ok(DateInput::Missing),
            Value::String(s) => s.parse(),
            other => Err(EncoderError::InvalidInput(format!(
                "expected a timestamp string or null, got {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateInput {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
            .into()
    }

    #[test]
    fn test_parse_formats() {
        assert_eq!(
            "2010-11-04 14:55".parse::<DateInput>().unwrap(),
            ts(2010, 11, 4, 14, 55, 0)
        );
        assert_eq!(
            "2010-11-04T14:55:30".parse::<DateInput>().unwrap(),
            ts(2010, 11, 4, 14, 55, 30)
        );
        assert_eq!(
            "2010-11-04".parse::<DateInput>().unwrap(),
            ts(2010, 11, 4, 0, 0, 0)
        );
        assert!("2010-11-04 14:55:30.250"
            .parse::<DateInput>()
            .unwrap()
            .timestamp()
            .is_some());
    }

    #[test]
    fn test_blank_is_missing() {
        assert!("".parse::<DateInput>().unwrap().is_missing());
        assert!("   ".parse::<DateInput>().unwrap().is_missing());
        assert!(DateInput::from(None).is_missing());
    }

    #[test]
    fn test_invalid_strings() {
        for bad in ["yesterday", "2010-13-01", "2010-02-30 10:00", "14:55"] {
            assert!(
                matches!(bad.parse::<DateInput>(), Err(EncoderError::InvalidInput(_))),
                "expected {:?} to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_from_json_value() {
        assert!(DateInput::try_from(&json!(null)).unwrap().is_missing());
        assert_eq!(
            DateInput::try_from(&json!("2010-11-04 14:55")).unwrap(),
            ts(2010, 11, 4, 14, 55, 0)
        );
        assert!(matches!(
            DateInput::try_from(&json!(1288882500)),
            Err(EncoderError::InvalidInput(_))
        ));
        assert!(DateInput::try_from(&json!({"date": "2010-11-04"})).is_err());
    }
}
