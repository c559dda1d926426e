//! Summary time windows
//!
//! All windows are UTC and inclusive at both ends:
//! - `daily`: from 00:00:00 of the current UTC day to now
//! - `weekly`: the last 7×24h
//! - `monthly`: the last 30×24h

use crate::error::{Error, Result};
use chrono::{DateTime, Duration, NaiveTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Daily,
    Weekly,
    Monthly,
}

impl TimeRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }

    /// `(start, end)` of the window ending at `now`
    pub fn window(&self, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let start = match self {
            Self::Daily => now.date_naive().and_time(NaiveTime::MIN).and_utc(),
            Self::Weekly => now - Duration::days(7),
            Self::Monthly => now - Duration::days(30),
        };
        (start, now)
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TimeRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(Error::Validation(format!(
                "Invalid time range '{}'. Must be daily, weekly, or monthly.",
                other
            ))),
        }
    }
}
