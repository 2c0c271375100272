//! timekit - date/time convenience helpers and async timing primitives
//!
//! Calendar work is delegated to chrono and timers to tokio; this crate adds
//! the small conveniences applications keep rewriting on top of them.
//!
//! # Modules
//!
//! * [`utils`] - Parsing, formatting, arithmetic and comparison of instants
//! * [`timer`] - Sleep, timeouts, polling loops and shutdown signals
//! * [`logger`] - The logger interface the loops report through
//! * [`config`] - Configuration loading and validation
//! * [`error`] - The crate's error type

/// Configuration module for managing settings
pub mod config;

/// Default formats and intervals
pub mod constants;

/// Error taxonomy shared by all helpers
pub mod error;

/// Logging utilities and the injected loop logger
pub mod logger;

/// Async timing primitives
pub mod timer;

/// Date/time conversion, arithmetic and comparison helpers
pub mod utils;

pub use error::{Result, TimeError};
pub use utils::{Moment, TimeObject, TimeUnit};
