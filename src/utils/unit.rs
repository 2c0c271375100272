//! Units accepted by the arithmetic helpers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TimeError;

/// A calendar or fixed-length unit of time.
///
/// Years and months are calendar units (their length depends on the date),
/// everything from weeks down has a fixed length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Years,
    Months,
    Weeks,
    Days,
    Hours,
    Minutes,
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    /// Length in milliseconds for fixed-length units, `None` for months and years.
    pub fn fixed_millis(self) -> Option<i64> {
        match self {
            TimeUnit::Years | TimeUnit::Months => None,
            TimeUnit::Weeks => Some(7 * 24 * 60 * 60 * 1000),
            TimeUnit::Days => Some(24 * 60 * 60 * 1000),
            TimeUnit::Hours => Some(60 * 60 * 1000),
            TimeUnit::Minutes => Some(60 * 1000),
            TimeUnit::Seconds => Some(1000),
            TimeUnit::Milliseconds => Some(1),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Years => "years",
            TimeUnit::Months => "months",
            TimeUnit::Weeks => "weeks",
            TimeUnit::Days => "days",
            TimeUnit::Hours => "hours",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Milliseconds => "milliseconds",
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = TimeError;

    /// Accepts long names (singular or plural, any case) and the usual
    /// short aliases. `M` is months and `m` is minutes, so short forms are
    /// matched case-sensitively before the lowercase fallback.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let unit = match s {
            "y" => TimeUnit::Years,
            "M" => TimeUnit::Months,
            "w" => TimeUnit::Weeks,
            "d" => TimeUnit::Days,
            "h" => TimeUnit::Hours,
            "m" => TimeUnit::Minutes,
            "s" => TimeUnit::Seconds,
            "ms" => TimeUnit::Milliseconds,
            other => match other.to_lowercase().as_str() {
                "year" | "years" => TimeUnit::Years,
                "month" | "months" => TimeUnit::Months,
                "week" | "weeks" => TimeUnit::Weeks,
                "day" | "days" => TimeUnit::Days,
                "hour" | "hours" => TimeUnit::Hours,
                "minute" | "minutes" => TimeUnit::Minutes,
                "second" | "seconds" => TimeUnit::Seconds,
                "millisecond" | "milliseconds" => TimeUnit::Milliseconds,
                _ => return Err(TimeError::invalid(s, "unknown time unit")),
            },
        };
        Ok(unit)
    }
}
