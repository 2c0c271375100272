//! Date and time conversion functions
//!
//! Everything here is a thin layer over chrono: reading timestamps and date
//! strings into a [`Moment`], and rendering a [`Moment`] back out as epoch
//! milliseconds, formatted strings, ISO 8601 strings or a field-decomposed
//! [`TimeObject`]. Format strings use chrono's strftime syntax.
//!
//! Offset-less strings such as `2018-04-26 15:02:01` are wall-clock times and
//! need a zone to become an instant. The plain functions read them in the
//! machine's local zone; the `_in` variants take the zone explicitly.

use std::fmt::{self, Write};

use chrono::format::{ParseError, ParseErrorKind};
use chrono::{
    DateTime, Datelike, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Timelike, Utc,
};
use serde::{Deserialize, Serialize};

use crate::constants::DATE_FORMAT;
use crate::error::{Result, TimeError};

/// An opaque, immutable point in time.
pub type Moment = DateTime<Utc>;

/// Offset-less layouts tried in order after RFC 3339 fails.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Offset layouts RFC 3339 does not cover (`+0800`, no colon).
const OFFSET_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Field-decomposed calendar representation of an instant.
///
/// `months` is zero-based (January is 0), every other field is what it says.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeObject {
    pub years: i32,
    pub months: u32,
    pub date: u32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    pub milliseconds: u32,
}

impl TimeObject {
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self {
            years: dt.year(),
            months: dt.month0(),
            date: dt.day(),
            hours: dt.hour(),
            minutes: dt.minute(),
            seconds: dt.second(),
            milliseconds: dt.timestamp_subsec_millis(),
        }
    }
}

/// Wall-clock fields used to generate a date string.
///
/// `month` is one-based. Unset fields default to January 1st, midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateParts {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
    pub millisecond: u32,
}

impl DateParts {
    pub fn new(year: i32) -> Self {
        Self {
            year,
            month: 1,
            day: 1,
            hour: 0,
            minute: 0,
            second: 0,
            millisecond: 0,
        }
    }

    pub fn month(mut self, month: u32) -> Self {
        self.month = month;
        self
    }

    pub fn day(mut self, day: u32) -> Self {
        self.day = day;
        self
    }

    pub fn hms(mut self, hour: u32, minute: u32, second: u32) -> Self {
        self.hour = hour;
        self.minute = minute;
        self.second = second;
        self
    }

    pub fn millisecond(mut self, millisecond: u32) -> Self {
        self.millisecond = millisecond;
        self
    }

    fn to_naive(self) -> Result<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year, self.month, self.day)
            .and_then(|d| d.and_hms_milli_opt(self.hour, self.minute, self.second, self.millisecond))
            .ok_or_else(|| TimeError::invalid(format!("{:?}", self), "date fields out of range"))
    }
}

/// Current instant
pub fn now() -> Moment {
    Utc::now()
}

/// Parse a date string, reading offset-less input as machine local time.
pub fn parse(input: &str) -> Result<Moment> {
    parse_in(input, &Local)
}

/// Parse a date string, reading offset-less input as UTC.
pub fn parse_utc(input: &str) -> Result<Moment> {
    parse_in(input, &Utc)
}

/// Parse a date string, reading offset-less input in `tz`.
///
/// Strings that carry their own offset (`Z`, `+08:00`, `+0800`) ignore `tz`.
pub fn parse_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<Moment> {
    let trimmed = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(trimmed, fmt) {
            return Ok(dt.with_timezone(&Utc));
        }
    }

    let naive = parse_naive(trimmed)
        .map_err(|err| TimeError::invalid(input, format!("unrecognised date format ({})", err)))?;
    resolve_wall_clock(tz, &naive, input)
}

/// Try every offset-less layout. On failure reports the most telling chrono
/// error: a layout that matched but named an impossible date beats a layout
/// that did not match at all.
fn parse_naive(input: &str) -> std::result::Result<NaiveDateTime, ParseError> {
    let mut telling: Option<ParseError> = None;
    for fmt in NAIVE_FORMATS {
        match NaiveDateTime::parse_from_str(input, fmt) {
            Ok(dt) => return Ok(dt),
            Err(err) if is_telling(&err) => telling = telling.or(Some(err)),
            Err(_) => {}
        }
    }
    match NaiveDate::parse_from_str(input, DATE_FORMAT) {
        Ok(d) => Ok(d.and_time(NaiveTime::MIN)),
        Err(err) => Err(telling.unwrap_or(err)),
    }
}

fn is_telling(err: &ParseError) -> bool {
    matches!(err.kind(), ParseErrorKind::OutOfRange | ParseErrorKind::Impossible)
}

/// Pin a wall-clock time to `tz`. Ambiguous times (DST fold) take the
/// earlier instant; skipped times (DST gap) are rejected.
fn resolve_wall_clock<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime, input: &str) -> Result<Moment> {
    tz.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| TimeError::invalid(input, "wall-clock time does not exist in this time zone"))
}

/// Alias of [`parse`] kept for call sites that deal in ISO strings.
pub fn utc_standard_str_to_moment(input: &str) -> Result<Moment> {
    parse(input)
}

/// Parse a date string straight to epoch milliseconds.
pub fn utc_standard_str_to_timestamp(input: &str) -> Result<i64> {
    parse(input).map(|m| m.timestamp_millis())
}

pub fn from_timestamp(millis: i64) -> Result<Moment> {
    DateTime::from_timestamp_millis(millis)
        .ok_or_else(|| TimeError::invalid(millis.to_string(), "timestamp out of range"))
}

pub fn to_timestamp(moment: &Moment) -> i64 {
    moment.timestamp_millis()
}

/// Render `moment` in `tz` with a strftime format.
///
/// An invalid format specifier is reported as `InvalidInput` instead of
/// panicking inside `to_string`.
pub fn format<Tz>(moment: &Moment, tz: &Tz, fmt: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    let mut out = String::new();
    write!(out, "{}", moment.with_timezone(tz).format(fmt))
        .map_err(|_| TimeError::invalid(fmt, "invalid format string"))?;
    Ok(out)
}

/// Format an epoch-millisecond timestamp in UTC
///
/// # Arguments
/// * `millis` - Milliseconds since the Unix epoch
/// * `fmt` - strftime format, usually [`crate::constants::UTC_MILLIS_FORMAT`]
pub fn to_utc_str(millis: i64, fmt: &str) -> Result<String> {
    format(&from_timestamp(millis)?, &Utc, fmt)
}

/// ISO 8601 string in UTC with millisecond precision and a `Z` suffix.
pub fn to_utc_standard_str(millis: i64) -> Result<String> {
    Ok(to_iso_string(&from_timestamp(millis)?, false))
}

/// ISO 8601 string with millisecond precision.
///
/// `keep_offset` renders the offset as `+00:00`; otherwise the UTC
/// designator `Z` is used.
pub fn to_iso_string(moment: &Moment, keep_offset: bool) -> String {
    moment.to_rfc3339_opts(SecondsFormat::Millis, !keep_offset)
}

/// ISO string for the current instant.
pub fn current_utc_standard_str(keep_offset: bool) -> String {
    to_iso_string(&now(), keep_offset)
}

/// Build a local wall-clock time from `parts` and render it as an ISO
/// string in UTC.
pub fn gene_utc_standard_str(parts: DateParts, keep_offset: bool) -> Result<String> {
    gene_utc_standard_str_in(parts, &Local, keep_offset)
}

pub fn gene_utc_standard_str_in<Tz: TimeZone>(parts: DateParts, tz: &Tz, keep_offset: bool) -> Result<String> {
    let moment = moment_from_parts(parts, tz)?;
    Ok(to_iso_string(&moment, keep_offset))
}

/// Build a local wall-clock time from `parts` and format it in UTC.
pub fn gene_utc_str(parts: DateParts, fmt: &str) -> Result<String> {
    gene_utc_str_in(parts, &Local, fmt)
}

pub fn gene_utc_str_in<Tz: TimeZone>(parts: DateParts, tz: &Tz, fmt: &str) -> Result<String> {
    let moment = moment_from_parts(parts, tz)?;
    format(&moment, &Utc, fmt)
}

fn moment_from_parts<Tz: TimeZone>(parts: DateParts, tz: &Tz) -> Result<Moment> {
    let naive = parts.to_naive()?;
    resolve_wall_clock(tz, &naive, &naive.to_string())
}

/// Decompose a date string into calendar fields in machine local time.
pub fn to_object(input: &str) -> Result<TimeObject> {
    to_object_in(input, &Local)
}

/// Decompose a date string into calendar fields in `tz`. Offset-less input
/// is read in `tz` too, so its fields come back unchanged.
pub fn to_object_in<Tz: TimeZone>(input: &str, tz: &Tz) -> Result<TimeObject> {
    let moment = parse_in(input, tz)?;
    Ok(TimeObject::from_datetime(&moment.with_timezone(tz)))
}

/// Format an epoch-millisecond timestamp in machine local time.
pub fn to_local_str(millis: i64, fmt: &str) -> Result<String> {
    to_local_str_in(millis, &Local, fmt)
}

/// Format an epoch-millisecond timestamp in `tz`.
pub fn to_local_str_in<Tz>(millis: i64, tz: &Tz, fmt: &str) -> Result<String>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
{
    format(&from_timestamp(millis)?, tz, fmt)
}

/// Read a UTC date string (offset-less input is taken as UTC) and format it
/// in machine local time.
pub fn to_local_str_from_utc_str(input: &str, fmt: &str) -> Result<String> {
    format(&parse_utc(input)?, &Local, fmt)
}
