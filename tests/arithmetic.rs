use chrono::FixedOffset;
use timekit::utils::arithmetic::*;
use timekit::utils::datetime::{from_timestamp, parse, parse_in, parse_utc, Moment};
use timekit::{TimeError, TimeUnit};

const FIXED_UNITS: [TimeUnit; 6] = [
    TimeUnit::Weeks,
    TimeUnit::Days,
    TimeUnit::Hours,
    TimeUnit::Minutes,
    TimeUnit::Seconds,
    TimeUnit::Milliseconds,
];

fn samples() -> Vec<Moment> {
    [0, 1526634363000, 1730373167283, -86_400_123, 951_782_400_000]
        .into_iter()
        .map(|ms| from_timestamp(ms).unwrap())
        .collect()
}

#[test]
fn test_diff_minutes_truncates_toward_zero() {
    let a = parse("2018-04-26 15:02:01").unwrap();
    let b = parse("2018-04-26 15:04:00").unwrap();
    assert_eq!(diff(&a, &b, TimeUnit::Minutes), -1);
    assert_eq!(diff(&b, &a, TimeUnit::Minutes), 1);
}

#[test]
fn test_diff_in_zone_independent_of_zone() {
    let tz = FixedOffset::west_opt(5 * 3600).unwrap();
    let a = parse_in("2018-04-26 15:02:01", &tz).unwrap();
    let b = parse_in("2018-04-26 15:04:00", &tz).unwrap();
    assert_eq!(diff(&a, &b, TimeUnit::Seconds), -119);
}

#[test]
fn test_diff_is_antisymmetric_for_fixed_units() {
    let moments = samples();
    for a in &moments {
        for b in &moments {
            for unit in FIXED_UNITS {
                assert_eq!(diff(a, b, unit), -diff(b, a, unit), "{a} vs {b} in {unit}");
            }
        }
    }
}

#[test]
fn test_add_then_sub_round_trips() {
    for moment in samples() {
        for unit in FIXED_UNITS {
            for amount in [1, 7, 365, -42] {
                let shifted = add(&moment, amount, unit).unwrap();
                assert_eq!(sub(&shifted, amount, unit).unwrap(), moment);
            }
        }
    }
}

#[test]
fn test_calendar_round_trip_without_clamping() {
    let mid_month = parse_utc("2021-06-15 08:30:00").unwrap();
    for unit in [TimeUnit::Months, TimeUnit::Years] {
        for amount in [1, 11, 25, -3] {
            let shifted = add(&mid_month, amount, unit).unwrap();
            assert_eq!(sub(&shifted, amount, unit).unwrap(), mid_month);
        }
    }
}

#[test]
fn test_add_leaves_input_untouched() {
    let original = parse_utc("2021-06-15 08:30:00").unwrap();
    let copy = original;
    let later = add(&original, 1, TimeUnit::Days).unwrap();
    assert_eq!(original, copy);
    assert_eq!(later, parse_utc("2021-06-16 08:30:00").unwrap());
}

#[test]
fn test_sub_one_day() {
    let moment = parse_utc("2024-03-01 00:00:00").unwrap();
    assert_eq!(sub(&moment, 1, TimeUnit::Days).unwrap(), parse_utc("2024-02-29 00:00:00").unwrap());
}

#[test]
fn test_diff_months_and_years() {
    let a = parse_utc("2020-02-29 00:00:00").unwrap();
    let b = parse_utc("2018-05-18 00:00:00").unwrap();
    assert_eq!(diff(&a, &b, TimeUnit::Months), 21);
    assert_eq!(diff(&a, &b, TimeUnit::Years), 1);
    assert_eq!(diff(&b, &a, TimeUnit::Years), -1);
}

#[test]
fn test_lt_gt_are_strict() {
    let a = parse_utc("2018-04-26 15:02:01").unwrap();
    let b = parse_utc("2018-04-26 15:04:00").unwrap();

    assert!(lt(&a, &b));
    assert!(!gt(&a, &b));
    assert!(gt(&b, &a));
    assert!(!lt(&b, &a));

    assert!(!lt(&a, &a));
    assert!(!gt(&a, &a));
}

#[test]
fn test_between_excludes_endpoints() {
    let start = parse_utc("2018-01-01 00:00:00").unwrap();
    let end = parse_utc("2018-12-31 00:00:00").unwrap();
    let mid = parse_utc("2018-06-01 00:00:00").unwrap();

    assert!(between(&mid, &start, &end));
    assert!(!between(&start, &start, &end));
    assert!(!between(&end, &start, &end));
    assert!(!between(&mid, &end, &start));
}

#[test]
fn test_string_units() {
    let moment = parse_utc("2018-04-26 15:02:01").unwrap();
    assert_eq!(add_str(&moment, 1, "d").unwrap(), add(&moment, 1, TimeUnit::Days).unwrap());
    assert_eq!(sub_str(&moment, 2, "hours").unwrap(), sub(&moment, 2, TimeUnit::Hours).unwrap());

    let later = add_str(&moment, 90, "s").unwrap();
    assert_eq!(diff_str(&later, &moment, "minutes").unwrap(), 1);
}

#[test]
fn test_unknown_unit_is_invalid_input() {
    let moment = parse_utc("2018-04-26 15:02:01").unwrap();
    assert!(matches!(add_str(&moment, 1, "lightyears"), Err(TimeError::InvalidInput { .. })));
    assert!(matches!(diff_str(&moment, &moment, ""), Err(TimeError::InvalidInput { .. })));
}
