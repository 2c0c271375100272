//! Date/time helpers.
//!
//! # Available Utilities
//!
//! - [`datetime`] - Parsing, formatting and conversion between timestamps, strings and instants
//! - [`arithmetic`] - Adding, subtracting, diffing and comparing instants
//! - [`unit`] - The [`unit::TimeUnit`] enum and its accepted names
//!
//! All of these are pure functions over chrono values; malformed input comes
//! back as [`crate::error::TimeError::InvalidInput`].

pub mod arithmetic;
pub mod datetime;
pub mod unit;

pub use arithmetic::{add, between, diff, gt, lt, sub};
pub use datetime::{now, parse, Moment, TimeObject};
pub use unit::TimeUnit;
