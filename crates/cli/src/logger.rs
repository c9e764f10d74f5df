//! Timestamped, colour-tagged stderr logger for the binaries.

use chrono::Utc;
use clap::ValueEnum;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let (colour, tag) = match record.level() {
            Level::Error => ("\x1b[31m", "[ERROR]"),
            Level::Warn => ("\x1b[35m", "[WARN] "),
            Level::Info => ("\x1b[32m", "[INFO] "),
            Level::Debug => ("\x1b[33m", "[DEBUG]"),
            Level::Trace => ("\x1b[36m", "[TRACE]"),
        };
        eprintln!(
            "{colour}{tag}[{}]\x1b[0m {}",
            Utc::now().format("%H:%M:%S"),
            record.args()
        );
    }

    fn flush(&self) {}
}

/// Verbosity accepted by `--log-level`.
#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

/// Install the logger; fails if another logger is already set.
pub fn init(level: LogLevel) -> Result<(), SetLoggerError> {
    log::set_logger(&LOGGER)?;
    log::set_max_level(level.into());
    Ok(())
}
