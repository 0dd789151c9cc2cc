//! Custom logging module.
//!
//! This module provides a custom logger implementation that captures
//! log entries and forwards them over a channel; the UI loop drains
//! the channel into application state for display in the log pane.

use crate::error::{AppError, AppResult};
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::sync::mpsc::Sender;
use std::sync::Mutex;

/// Format a log record into a string for display
///
pub fn format_log(record: &Record) -> String {
    let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3f");
    let level_str = match record.level() {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    };
    format!("{} {} {}", timestamp, level_str, record.args())
}

/// Logger that forwards formatted entries to the UI thread.
///
pub struct CustomLogger {
    sender: Mutex<Sender<String>>,
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        // Our own entries down to debug; dependencies only when they
        // complain.
        if metadata.target().starts_with("dualtab_admin") {
            metadata.level() <= Level::Debug
        } else {
            metadata.level() <= Level::Warn
        }
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(sender) = self.sender.lock() {
                // A full or disconnected channel just drops the entry.
                let _ = sender.send(format_log(record));
            }
        }
    }

    fn flush(&self) {
        // No-op
    }
}

/// Install the logger as the global `log` backend.
///
pub fn init(sender: Sender<String>) -> AppResult<()> {
    log::set_boxed_logger(Box::new(CustomLogger {
        sender: Mutex::new(sender),
    }))
    .map(|()| log::set_max_level(LevelFilter::Debug))
    .map_err(|e| AppError::Logger(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_log_includes_level_and_message() {
        let formatted = format_log(
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Warn)
                .target("dualtab_admin")
                .build(),
        );
        assert!(formatted.contains("WARN"));
        assert!(formatted.contains("hello"));
    }
}
