// ============================================================================
// rotabatch-cli/src/logging.rs
// ============================================================================
//
// LOGGING SETUP: fern dispatch for console and file logging
//
// Console log lines go to stderr at WARN (DEBUG with --verbose) so they stay
// out of the way of the reporter's output on stdout. With --log-dir, every
// record at DEBUG and above is also written to a timestamped log file with
// ANSI escapes removed.
//
// KEY COMPONENTS:
// - get_timestamp: Timestamp used in log file names
// - init_logging: Installs the global logger

// ---- Internal crate imports ----
use crate::terminal;

// ---- External crate imports ----
use anyhow::{Context, Result};
use log::LevelFilter;

// ---- Standard library imports ----
use std::fs;
use std::path::{Path, PathBuf};

/// Returns the current local timestamp formatted as "YYYYMMDD_HHMMSS".
pub fn get_timestamp() -> String {
    chrono::Local::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Name of the log file for a run started now.
pub fn log_file_name() -> String {
    format!("rotabatch_run_{}.log", get_timestamp())
}

/// Console level for the given verbosity.
pub fn console_level(verbose: bool) -> LevelFilter {
    if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Installs the global logger. Returns the log file path when one was
/// requested.
pub fn init_logging(verbose: bool, log_dir: Option<&Path>) -> Result<Option<PathBuf>> {
    let color = terminal::stderr_color();

    let console = fern::Dispatch::new()
        .level(console_level(verbose))
        .format(move |out, message, record| {
            out.finish(format_args!(
                "{} {}",
                terminal::level_label(record.level(), color),
                message
            ))
        })
        .chain(std::io::stderr());

    let mut root = fern::Dispatch::new().level(LevelFilter::Debug).chain(console);

    let mut log_path = None;
    if let Some(dir) = log_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create log directory {}", dir.display()))?;
        let path = dir.join(log_file_name());
        let file = fern::log_file(&path)
            .with_context(|| format!("Failed to create log file {}", path.display()))?;

        let file_dispatch = fern::Dispatch::new()
            .level(LevelFilter::Debug)
            .format(|out, message, record| {
                let plain = strip_ansi_escapes::strip_str(message.to_string());
                out.finish(format_args!(
                    "{} [{}] {}: {}",
                    chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                    record.level(),
                    record.target(),
                    plain
                ))
            })
            .chain(file);
        root = root.chain(file_dispatch);
        log_path = Some(path);
    }

    root.apply().context("Failed to install logger")?;
    Ok(log_path)
}
