// File: ./src/logging.rs
//! Logger bootstrap.
//!
//! The dashboard owns the terminal, so it logs to a file in the data
//! directory. One-shot commands log to stderr. Initialization happens at most
//! once per process; later calls are no-ops.
use crate::config::LogLevel;
use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use simplelog::{ColorChoice, ConfigBuilder, TermLogger, TerminalMode, WriteLogger};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
}

static LOG_TARGET: OnceCell<LogTarget> = OnceCell::new();

fn logger_config() -> simplelog::Config {
    let mut builder = ConfigBuilder::new();
    builder
        .set_target_level(log::LevelFilter::Error)
        .set_thread_level(log::LevelFilter::Off);
    // Local offsets may be unavailable in multithreaded processes; fall back to UTC.
    let _ = builder.set_time_offset_to_local();
    builder.build()
}

/// Starts logging to `target` at `level`. Returns the active target, which is
/// the first one requested if logging was already running.
pub fn init_logging(level: LogLevel, target: LogTarget) -> Result<&'static LogTarget> {
    LOG_TARGET.get_or_try_init(|| {
        let filter = level.to_filter();
        match &target {
            LogTarget::File(path) => {
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(path)
                    .with_context(|| format!("Failed to open log file '{}'", path.display()))?;
                WriteLogger::init(filter, logger_config(), file)
                    .context("Logger already installed")?;
            }
            LogTarget::Stderr => {
                TermLogger::init(
                    filter,
                    logger_config(),
                    TerminalMode::Stderr,
                    ColorChoice::Auto,
                )
                .context("Logger already installed")?;
            }
        }
        log::info!(
            "deadlines v{} logging at {} on {}",
            env!("CARGO_PKG_VERSION"),
            level,
            std::env::consts::OS
        );
        Ok(target)
    })
}

/// Appends panics to the log file before handing over to the default hook,
/// which may be unable to print while the terminal is in raw mode.
pub fn install_panic_hook(log_path: &Path) {
    let log_path = log_path.to_path_buf();
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        use std::io::Write;
        if let Ok(mut file) = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_path)
        {
            let _ = writeln!(file, "PANIC: {}", info);
        }
        default_hook(info);
    }));
}
