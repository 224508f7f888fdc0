// ============================================================================
// rotabatch-cli/src/terminal.rs
// ============================================================================
//
// TERMINAL OUTPUT: Styling for text the CLI prints itself
//
// Per-file progress is rendered by the core's TerminalReporter. This module
// covers the rest: the run header, aligned label/value rows, log level
// labels and errors raised before a reporter exists.
//
// KEY COMPONENTS:
// - styling: Symbols and indentation shared by the helpers
// - Color control: NO_COLOR and terminal detection, applied to both
//   owo-colors (here) and console (the core reporter)
// - print_section / print_rows / print_error: UI components

// ---- External crate imports ----
use log::Level;
use owo_colors::OwoColorize;
use supports_color::Stream;
use unicode_width::UnicodeWidthStr;

// ---- Standard library imports ----
use std::env;
use std::sync::atomic::{AtomicBool, Ordering};

// ============================================================================
// STYLING CONSTANTS
// ============================================================================

/// Styling constants for terminal output
pub mod styling {
    pub const ERROR_SYMBOL: &str = "✗";
    pub const SECTION_PREFIX: &str = "===== ";
    pub const SECTION_SUFFIX: &str = " =====";
    pub const STATUS_INDENT: &str = "  ";
}

// ============================================================================
// COLOR CONTROL
// ============================================================================

static USE_COLOR: AtomicBool = AtomicBool::new(true);

/// Decides whether to use color, honoring `NO_COLOR`, and applies the choice
/// to every styling crate in use.
pub fn init_color() {
    let stdout = color_allowed() && supports_color::on(Stream::Stdout).is_some();
    let stderr = stderr_color();

    USE_COLOR.store(stdout, Ordering::Relaxed);
    console::set_colors_enabled(stdout);
    console::set_colors_enabled_stderr(stderr);
}

fn should_use_color() -> bool {
    USE_COLOR.load(Ordering::Relaxed)
}

// ============================================================================
// TERMINAL COMPONENTS
// ============================================================================

/// Prints a section header.
pub fn print_section(title: &str) {
    let text = format!(
        "{}{}{}",
        styling::SECTION_PREFIX,
        title.to_uppercase(),
        styling::SECTION_SUFFIX
    );
    if should_use_color() {
        println!("\n{}", text.cyan().bold());
    } else {
        println!("\n{text}");
    }
}

/// Prints label/value rows with the values aligned.
pub fn print_rows(rows: &[(&str, String)]) {
    let width = label_width(rows);
    for (label, value) in rows {
        let padded = pad_label(label, width);
        if should_use_color() {
            println!("{}{} {}", styling::STATUS_INDENT, padded.bold(), value);
        } else {
            println!("{}{} {}", styling::STATUS_INDENT, padded, value);
        }
    }
}

/// Prints an error on stderr. Used only before a reporter is available.
pub fn print_error(message: &str) {
    if should_use_color() {
        eprintln!("{} {}", styling::ERROR_SYMBOL.red().bold(), message.red());
    } else {
        eprintln!("{} {}", styling::ERROR_SYMBOL, message);
    }
}

/// Log level label for console log lines.
pub fn level_label(level: Level, color: bool) -> String {
    let label = format!("[{level}]");
    if !color {
        return label;
    }
    match level {
        Level::Error => label.red().bold().to_string(),
        Level::Warn => label.yellow().to_string(),
        Level::Info => label.cyan().to_string(),
        Level::Debug => label.magenta().to_string(),
        Level::Trace => label.blue().to_string(),
    }
}

/// Whether console log lines should be colored.
pub fn stderr_color() -> bool {
    color_allowed() && supports_color::on(Stream::Stderr).is_some()
}

fn color_allowed() -> bool {
    env::var_os("NO_COLOR").is_none_or(|v| v.is_empty())
}

fn label_width(rows: &[(&str, String)]) -> usize {
    rows.iter()
        .map(|(label, _)| label.width())
        .max()
        .unwrap_or(0)
}

/// Pads `label` to `width` display columns.
fn pad_label(label: &str, width: usize) -> String {
    let padding = width.saturating_sub(label.width());
    format!("{label}{}", " ".repeat(padding))
}
