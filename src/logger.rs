//! Custom logging module.
//!
//! This module provides a small file-backed logger behind the `log` facade.
//! Log lines go to a file in the configuration directory so they never mix
//! with the interactive prompts on stdout.

use crate::error::AppError;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;

/// Format a log record into a single line for the log file
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

/// Logger that appends formatted records to a file
///
pub struct FileLogger {
    file: Mutex<File>,
}

impl FileLogger {
    /// Install a file logger appending to the given path.
    ///
    pub fn init(path: &Path, level: LevelFilter) -> Result<(), AppError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(AppError::Io)?;
        log::set_boxed_logger(Box::new(FileLogger {
            file: Mutex::new(file),
        }))
        .map_err(|e| AppError::Logger(e.to_string()))?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if let Ok(mut file) = self.file.lock() {
                // A failed write is not worth crashing the wizard over
                let _ = writeln!(file, "{}", format_log(record));
            }
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}
