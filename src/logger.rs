use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use log::LevelFilter;

use crate::config::LoggingConfig;

/// Sink for the messages the loops and waits emit.
///
/// Timer helpers never reach for a global logger; callers hand one in.
pub trait LoopLogger: Send + Sync {
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards to the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogFacade;

impl LoopLogger for LogFacade {
    fn info(&self, message: &str) {
        log::info!("{}", message);
    }

    fn error(&self, message: &str) {
        log::error!("{}", message);
    }
}

#[derive(Debug, Clone)]
struct LogEntry {
    level: String,
    line: String,
}

/// Shared in-memory logger, mostly useful to inspect what a loop reported
#[derive(Clone)]
pub struct MemoryLogger {
    logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemoryLogger {
    pub fn new() -> Self {
        Self {
            logs: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Add a log entry
    pub fn log(&self, level: &str, message: &str) {
        let timestamp = Utc::now().format("%H:%M:%S%.3f").to_string();
        let formatted_message = format!("[{}] {} {}", timestamp, level, message);

        if let Ok(mut logs) = self.logs.lock() {
            logs.push(LogEntry {
                level: level.to_string(),
                line: formatted_message,
            });
        }
    }

    /// Get all logs, newest first
    pub fn get_logs(&self) -> Vec<String> {
        if let Ok(logs) = self.logs.lock() {
            logs.iter().rev().map(|entry| entry.line.clone()).collect()
        } else {
            Vec::new()
        }
    }

    /// Number of entries logged at `level`
    pub fn count(&self, level: &str) -> usize {
        self.logs
            .lock()
            .map(|logs| logs.iter().filter(|entry| entry.level == level).count())
            .unwrap_or(0)
    }

    /// Clear all logs
    pub fn clear(&self) {
        if let Ok(mut logs) = self.logs.lock() {
            logs.clear();
        }
    }
}

impl Default for MemoryLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopLogger for MemoryLogger {
    fn info(&self, message: &str) {
        self.log("INFO", message);
    }

    fn error(&self, message: &str) {
        self.log("ERROR", message);
    }
}

/// Install the global `log` backend described by `config`.
///
/// Does nothing when logging is disabled. Lines go to stderr and, when a
/// file is configured, are appended there too.
pub fn init(config: &LoggingConfig) -> Result<()> {
    if !config.enabled {
        return Ok(());
    }

    let level: LevelFilter = config
        .level
        .parse()
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{} {} {}] {}",
                Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stderr());

    if let Some(path) = &config.file {
        let file = fern::log_file(path).with_context(|| format!("Failed to open log file: {}", path.display()))?;
        dispatch = dispatch.chain(file);
    }

    dispatch.apply().context("Failed to install logger")?;
    Ok(())
}
