use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::common::{shift_month, shift_year, Dated};
use crate::errors::ValidationError;

/// Trailing time window anchored at the reference instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    Week,
    #[default]
    Month,
    Year,
}

impl Period {
    /// Lower bound of the window: seven days back for weeks, one calendar
    /// month or year back otherwise, day-of-month clamped when the target
    /// month is shorter. Time of day is preserved.
    pub fn cutoff(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        match self {
            Period::Week => now - Duration::days(7),
            Period::Month => with_shifted_date(now, shift_month(now.date_naive(), -1)),
            Period::Year => with_shifted_date(now, shift_year(now.date_naive(), -1)),
        }
    }

    /// Window membership: at or after the cutoff, no upper bound.
    /// Future-dated records always pass.
    pub fn contains(&self, instant: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        instant >= self.cutoff(now)
    }

    /// Filters any date-bearing records down to the window.
    pub fn filter<'a, T: Dated>(&self, records: &'a [T], now: DateTime<Utc>) -> Vec<&'a T> {
        let cutoff = self.cutoff(now);
        records
            .iter()
            .filter(|record| record.occurred_at() >= cutoff)
            .collect()
    }

    pub fn label(&self) -> &'static str {
        match self {
            Period::Week => "Last week",
            Period::Month => "Last month",
            Period::Year => "Last year",
        }
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_lowercase().as_str() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "year" => Ok(Period::Year),
            other => Err(ValidationError::UnknownPeriod(other.to_string())),
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

fn with_shifted_date(now: DateTime<Utc>, date: NaiveDate) -> DateTime<Utc> {
    DateTime::from_naive_utc_and_offset(date.and_time(now.time()), Utc)
}
