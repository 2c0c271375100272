//! Arithmetic and comparison on [`Moment`] values.
//!
//! Every function takes its inputs by reference and returns a fresh value;
//! nothing is adjusted in place. Calendar units (months, years) are applied
//! on the UTC calendar and clamp to the last day of the month, so
//! `2024-01-31 + 1 month == 2024-02-29`.

use chrono::{Datelike, Months, TimeDelta};

use super::datetime::Moment;
use super::unit::TimeUnit;
use crate::error::{Result, TimeError};

/// `moment + amount * unit`
pub fn add(moment: &Moment, amount: i64, unit: TimeUnit) -> Result<Moment> {
    let overflow = || TimeError::invalid(format!("{} {} {}", moment, amount, unit), "arithmetic overflow");

    match unit.fixed_millis() {
        Some(unit_ms) => amount
            .checked_mul(unit_ms)
            .and_then(TimeDelta::try_milliseconds)
            .and_then(|delta| moment.checked_add_signed(delta))
            .ok_or_else(overflow),
        None => {
            let months = match unit {
                TimeUnit::Years => amount.checked_mul(12),
                _ => Some(amount),
            };
            months.and_then(|m| shift_months(moment, m)).ok_or_else(overflow)
        }
    }
}

/// `moment - amount * unit`
pub fn sub(moment: &Moment, amount: i64, unit: TimeUnit) -> Result<Moment> {
    let negated = amount
        .checked_neg()
        .ok_or_else(|| TimeError::invalid(amount.to_string(), "arithmetic overflow"))?;
    add(moment, negated, unit)
}

/// `(a - b)` expressed in `unit`, truncated toward zero.
pub fn diff(a: &Moment, b: &Moment, unit: TimeUnit) -> i64 {
    match unit {
        TimeUnit::Months => month_diff(a, b),
        TimeUnit::Years => month_diff(a, b) / 12,
        fixed => {
            let unit_ms = fixed.fixed_millis().unwrap_or(1);
            a.signed_duration_since(*b).num_milliseconds() / unit_ms
        }
    }
}

/// Same as [`add`] with a unit name such as `"d"` or `"hours"`.
pub fn add_str(moment: &Moment, amount: i64, unit: &str) -> Result<Moment> {
    add(moment, amount, unit.parse()?)
}

pub fn sub_str(moment: &Moment, amount: i64, unit: &str) -> Result<Moment> {
    sub(moment, amount, unit.parse()?)
}

pub fn diff_str(a: &Moment, b: &Moment, unit: &str) -> Result<i64> {
    Ok(diff(a, b, unit.parse()?))
}

/// Strictly before
pub fn lt(a: &Moment, b: &Moment) -> bool {
    a < b
}

/// Strictly after
pub fn gt(a: &Moment, b: &Moment) -> bool {
    a > b
}

/// Strictly between `start` and `end`, both ends excluded.
pub fn between(moment: &Moment, start: &Moment, end: &Moment) -> bool {
    start < moment && moment < end
}

fn shift_months(moment: &Moment, months: i64) -> Option<Moment> {
    let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
    if months >= 0 {
        moment.checked_add_months(magnitude)
    } else {
        moment.checked_sub_months(magnitude)
    }
}

/// Whole calendar months of `a - b`, truncated toward zero.
///
/// Measured from `a`: counts how many months `a` must be shifted to reach
/// `b`, then negates. At a month end this is what decides the result, e.g.
/// `diff(Jan 31, Feb 28) == -1` while `diff(Feb 28, Jan 31) == 0`.
fn month_diff(a: &Moment, b: &Moment) -> i64 {
    -months_from(a, b)
}

/// Whole months to shift `from` by without passing `to`.
///
/// Starts from the difference of the month fields and steps one month back
/// toward zero when shifting `from` by that many months overshoots `to`.
fn months_from(from: &Moment, to: &Moment) -> i64 {
    let mut months = (i64::from(to.year()) - i64::from(from.year())) * 12 + i64::from(to.month())
        - i64::from(from.month());

    if let Some(anchor) = shift_months(from, months) {
        if to >= from && anchor > *to {
            months -= 1;
        } else if to < from && anchor < *to {
            months += 1;
        }
    }
    months
}
