//! Calendar arithmetic: weekday parsing, custom day sets and holiday
//! proximity.

use crate::error::{EncoderError, Result};
use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use std::fmt;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Month of the only holiday the encoder knows about.
pub const HOLIDAY_MONTH: u32 = 12;
/// Day of month of the only holiday the encoder knows about.
pub const HOLIDAY_DAY: u32 = 25;

/// Weekdays by index, Monday first.
const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Accepted day spellings, compared case-insensitively.
const WEEKDAY_NAMES: [(&str, Weekday); 14] = [
    ("mon", Weekday::Mon),
    ("monday", Weekday::Mon),
    ("tue", Weekday::Tue),
    ("tuesday", Weekday::Tue),
    ("wed", Weekday::Wed),
    ("wednesday", Weekday::Wed),
    ("thu", Weekday::Thu),
    ("thursday", Weekday::Thu),
    ("fri", Weekday::Fri),
    ("friday", Weekday::Fri),
    ("sat", Weekday::Sat),
    ("saturday", Weekday::Sat),
    ("sun", Weekday::Sun),
    ("sunday", Weekday::Sun),
];

/// Parse an English day name or three-letter abbreviation.
pub fn parse_weekday(name: &str) -> Result<Weekday> {
    let lowered = name.trim().to_ascii_lowercase();
    WEEKDAY_NAMES
        .iter()
        .find(|(spelling, _)| *spelling == lowered)
        .map(|&(_, day)| day)
        .ok_or_else(|| {
            EncoderError::Config(format!("unable to understand {:?} as a day of week", name))
        })
}

/// Weekday index with Monday = 0.
pub fn weekday_index(day: Weekday) -> u32 {
    day.num_days_from_monday()
}

/// A set of weekdays, stored as a 7-bit mask (bit 0 = Monday).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CustomDaySet {
    mask: u8,
}

impl CustomDaySet {
    /// Build a set from day names. Fails on an empty list or any
    /// unrecognised name.
    pub fn parse<S: AsRef<str>>(names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Err(EncoderError::Config(
                "custom days need at least one day name".to_string(),
            ));
        }
        let mut set = Self::default();
        for name in names {
            set.insert(parse_weekday(name.as_ref())?);
        }
        Ok(set)
    }

    pub fn insert(&mut self, day: Weekday) {
        self.mask |= 1 << weekday_index(day);
    }

    pub fn contains(&self, day: Weekday) -> bool {
        self.mask & (1 << weekday_index(day)) != 0
    }

    /// Member weekday indices, ascending.
    pub fn indices(&self) -> Vec<u32> {
        (0..7).filter(|&i| self.mask & (1 << i) != 0).collect()
    }

    pub fn len(&self) -> usize {
        self.mask.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.mask == 0
    }
}

impl fmt::Display for CustomDaySet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<String> = self
            .indices()
            .into_iter()
            .map(|i| WEEKDAYS[i as usize].to_string())
            .collect();
        write!(f, "{}", names.join(" "))
    }
}

/// Fractional hours since midnight, ignoring seconds.
pub fn time_of_day(input: &NaiveDateTime) -> f64 {
    input.hour() as f64 + input.minute() as f64 / 60.0
}

/// Zero-based day of year (0..=365).
pub fn day_of_year(input: &NaiveDateTime) -> f64 {
    input.ordinal0() as f64
}

/// Saturday, Sunday, or Friday after 18:00.
pub fn is_weekend(input: &NaiveDateTime) -> bool {
    match input.weekday() {
        Weekday::Sat | Weekday::Sun => true,
        Weekday::Fri => time_of_day(input) > 18.0,
        _ => false,
    }
}

/// Smoothed closeness of `input` to the holiday `month`/`day` of the same
/// year.
///
/// 1.0 during the holiday, ramping linearly 0 → 1 over the preceding day
/// and 1 → 0 over the following day, 0.0 elsewhere. Dates that do not exist
/// in the input's year (February 29 in a common year) give 0.0.
pub fn holiday_proximity(input: &NaiveDateTime, month: u32, day: u32) -> f64 {
    let Some(hdate) = NaiveDate::from_ymd_opt(input.year(), month, day)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    else {
        return 0.0;
    };

    if *input > hdate {
        let diff = *input - hdate;
        let days = diff.num_days();
        let seconds = (diff.num_seconds() - days * 86_400) as f64;
        match days {
            0 => 1.0,
            1 => 1.0 - seconds / SECONDS_PER_DAY,
            _ => 0.0,
        }
    } else {
        let diff = hdate - *input;
        if diff.num_days() == 0 {
            1.0 - diff.num_seconds() as f64 / SECONDS_PER_DAY
        } else {
            0.0
        }
    }
}
