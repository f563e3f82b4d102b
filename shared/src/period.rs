//! Period bucket keys
//!
//! Quotations, demand and price history are bucketed by a `YYYY-MM-NN` key:
//! year, month and a two-digit bucket inside the month (usually the day the
//! round opened, sometimes a plain sequence number). Keys order
//! lexicographically, so string comparison in SQL matches [`Ord`] here.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::AppError;

/// Default number of months searched for a previous approved period
pub const DEFAULT_LOOKBACK_MONTHS: u32 = 12;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PeriodError {
    #[error("period '{0}' must be formatted as YYYY-MM-NN")]
    Malformed(String),
    #[error("period '{0}' has month outside 01-12")]
    Month(String),
    #[error("period '{0}' has bucket outside 01-99")]
    Bucket(String),
}

impl From<PeriodError> for AppError {
    fn from(e: PeriodError) -> Self {
        let key = match &e {
            PeriodError::Malformed(k) | PeriodError::Month(k) | PeriodError::Bucket(k) => {
                k.clone()
            }
        };
        AppError::invalid_period(&key).with_detail("reason", e.to_string())
    }
}

/// A parsed `YYYY-MM-NN` period key
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PeriodKey {
    year: i32,
    month: u32,
    bucket: u32,
}

impl PeriodKey {
    pub fn new(year: i32, month: u32, bucket: u32) -> Option<Self> {
        if !(1..=12).contains(&month) || !(1..=99).contains(&bucket) || !(1..=9999).contains(&year)
        {
            return None;
        }
        Some(Self {
            year,
            month,
            bucket,
        })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn bucket(&self) -> u32 {
        self.bucket
    }

    /// `true` when both keys fall in the same calendar month
    pub fn same_month(&self, other: &PeriodKey) -> bool {
        self.year == other.year && self.month == other.month
    }

    /// `(year, month)` of the month `back` months before this key's month.
    pub fn month_before(&self, back: u32) -> Option<(i32, u32)> {
        let first = NaiveDate::from_ymd_opt(self.year, self.month, 1)?;
        let shifted = first.checked_sub_months(Months::new(back))?;
        Some((shifted.year(), shifted.month()))
    }

    /// Lowest key string (exclusive) covering `back` months before this one.
    ///
    /// Bucket `00` is never valid, so `period > floor` includes every bucket
    /// of the floor month.
    pub fn lookback_floor(&self, back: u32) -> String {
        let (y, m) = self.month_before(back).unwrap_or((self.year, self.month));
        format!("{y:04}-{m:02}-00")
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month, self.bucket)
    }
}

impl FromStr for PeriodKey {
    type Err = PeriodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || PeriodError::Malformed(s.to_string());
        let bytes = s.as_bytes();
        if bytes.len() != 10 || bytes[4] != b'-' || bytes[7] != b'-' {
            return Err(malformed());
        }
        let digits = |range: std::ops::Range<usize>| -> Result<u32, PeriodError> {
            let part = &s[range];
            if !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse::<u32>().map_err(|_| malformed())
        };
        let year = digits(0..4)? as i32;
        let month = digits(5..7)?;
        let bucket = digits(8..10)?;

        if !(1..=12).contains(&month) {
            return Err(PeriodError::Month(s.to_string()));
        }
        if bucket == 0 {
            return Err(PeriodError::Bucket(s.to_string()));
        }
        if year == 0 {
            return Err(malformed());
        }
        Ok(Self {
            year,
            month,
            bucket,
        })
    }
}

impl Serialize for PeriodKey {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for PeriodKey {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Pick the period that serves as the "previous" baseline for `current`.
///
/// Walks backwards: earlier buckets of the current month first, then each
/// preceding month up to `lookback_months`. Within a month the latest bucket
/// wins. Keys that are not strictly before `current` are ignored.
pub fn resolve_previous(
    current: &PeriodKey,
    candidates: &[PeriodKey],
    lookback_months: u32,
) -> Option<PeriodKey> {
    for back in 0..=lookback_months {
        let Some((year, month)) = current.month_before(back) else {
            break;
        };
        let best = candidates
            .iter()
            .filter(|c| c.year == year && c.month == month && *c < current)
            .max();
        if let Some(found) = best {
            return Some(*found);
        }
    }
    None
}
