//! Constants used throughout the crate
//!
//! Default format strings (chrono strftime syntax) and timer intervals.

use std::time::Duration;

// Format strings
pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
pub const UTC_MILLIS_FORMAT: &str = "%Y-%m-%d %H:%M:%S:%3f";

// Signal gate check intervals
pub const BLOCK_CHECK_INTERVAL_MS: u64 = 3000;
pub const DRAIN_CHECK_INTERVAL_MS: u64 = 2000;
pub const BLOCK_CHECK_INTERVAL: Duration = Duration::from_millis(BLOCK_CHECK_INTERVAL_MS);
pub const DRAIN_CHECK_INTERVAL: Duration = Duration::from_millis(DRAIN_CHECK_INTERVAL_MS);
pub const DEFAULT_BLOCKING_MSG: &str = "blocking...";

// Timeout
pub const DEFAULT_TIMEOUT_MS: u64 = 3000;

// Config
pub const CONFIG_FILE_NAME: &str = "timekit.toml";
pub const CONFIG_DIR_NAME: &str = "timekit";
pub const CONFIG_GENERATED: &str = "✅ Configuration file generated";
