//! Proleptic-Gregorian calendar dates with a compact integer representation.
//!
//! A [`PDate`] is a day offset from 2000-01-01 (value 0). The supported range
//! runs through 3000-12-31, which keeps every value comfortably below the
//! `999_999` sentinel used when sorting transactions without a date.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Duration, NaiveDate};
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{BudgetError, Result};

/// Sort key used for "no date"; strictly greater than any real day value.
pub const NULL_DATE_SENTINEL: i64 = 999_999;

pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 3000;

fn epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(MIN_YEAR, 1, 1).expect("epoch date is valid")
}

/// A calendar date in the supported range, ordered by its day value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PDate(NaiveDate);

impl PDate {
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self> {
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
            BudgetError::InvalidInput(format!("invalid date {year:04}-{month:02}-{day:02}"))
        })?;
        Self::from_naive(date)
    }

    /// Rebuilds a date from its integer day value.
    pub fn from_value(value: i64) -> Result<Self> {
        // Coarse bound first so absurd inputs never reach date arithmetic.
        if !(0..=400_000).contains(&value) {
            return Err(BudgetError::InvalidInput(format!(
                "day value {value} outside supported range"
            )));
        }
        let date = epoch() + Duration::days(value);
        Self::from_naive(date)
    }

    fn from_naive(date: NaiveDate) -> Result<Self> {
        if date.year() < MIN_YEAR || date.year() > MAX_YEAR {
            return Err(BudgetError::InvalidInput(format!(
                "date {date} outside supported range {MIN_YEAR}..={MAX_YEAR}"
            )));
        }
        Ok(Self(date))
    }

    /// Day offset from 2000-01-01.
    pub fn value(&self) -> i64 {
        (self.0 - epoch()).num_days()
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// Month of year, 1..=12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    /// Day of month, 1..=31.
    pub fn day(&self) -> u32 {
        self.0.day()
    }

    /// The previous calendar day, if still in range.
    pub fn pred(&self) -> Result<Self> {
        Self::from_value(self.value() - 1)
    }

    pub fn is_leap_year(year: i32) -> bool {
        (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
    }

    pub fn days_in_month(year: i32, month: u32) -> u32 {
        match month {
            1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
            4 | 6 | 9 | 11 => 30,
            2 => {
                if Self::is_leap_year(year) {
                    29
                } else {
                    28
                }
            }
            _ => 0,
        }
    }
}

impl fmt::Display for PDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for PDate {
    type Err = BudgetError;

    fn from_str(s: &str) -> Result<Self> {
        let date = NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|err| BudgetError::InvalidInput(format!("invalid ISO date `{s}`: {err}")))?;
        Self::from_naive(date)
    }
}

impl Serialize for PDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.value())
    }
}

impl<'de> Deserialize<'de> for PDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let value = i64::deserialize(deserializer)?;
        PDate::from_value(value).map_err(D::Error::custom)
    }
}
