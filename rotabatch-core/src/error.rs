// ============================================================================
// rotabatch-core/src/error.rs
// ============================================================================
//
// ERROR HANDLING: Custom Error Types for rotabatch-core
//
// This module defines the error types used throughout the rotabatch-core
// library. It uses thiserror for the Display and Error implementations.
//
// KEY COMPONENTS:
// - CoreError: Enum of all errors the library can produce
// - InstallResolution: What happened after the media tool was found missing
// - CoreResult: Type alias for Result<T, CoreError>
//
// Errors fall into two groups. Environment errors (ToolMissing, NotFound,
// InvalidAngle, NoFilesFound, InvalidSelection) end the run before any file
// is touched. Per-file errors (Apply, Preview) are collected into the run
// result and never abort the batch.

// ---- Standard library imports ----
use std::fmt;
use std::io;
use std::path::PathBuf;

// ---- External crate imports ----
use thiserror::Error;

/// Outcome of the interactive install offer for a missing media tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstallResolution {
    /// The user declined to install the tool.
    Declined,
    /// The install command ran successfully; the process must be re-run to
    /// pick up the new executable.
    Installed,
    /// The user accepted but the install command failed.
    InstallFailed,
}

impl fmt::Display for InstallResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            InstallResolution::Declined => "installation declined",
            InstallResolution::Installed => "installed, please re-run",
            InstallResolution::InstallFailed => "installation failed",
        };
        f.write_str(text)
    }
}

/// Errors produced by rotabatch-core.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Required tool '{tool}' is not available ({resolution})")]
    ToolMissing {
        tool: String,
        resolution: InstallResolution,
    },

    #[error("Directory not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Invalid angle {0}: must be one of 90, 180 or 270")]
    InvalidAngle(i64),

    #[error("Failed to rotate {}: {detail}", .file.display())]
    Apply { file: PathBuf, detail: String },

    #[error("Failed to preview {}: {detail}", .file.display())]
    Preview { file: PathBuf, detail: String },

    #[error("No video files found in {}", .0.display())]
    NoFilesFound(PathBuf),

    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    #[error("Required external command '{0}' not found")]
    DependencyNotFound(String),

    #[error("Failed to start '{0}': {1}")]
    CommandStart(String, #[source] io::Error),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("{0}")]
    OperationFailed(String),
}

impl CoreError {
    /// Returns true for errors that are scoped to a single file.
    pub fn is_per_file(&self) -> bool {
        matches!(self, CoreError::Apply { .. } | CoreError::Preview { .. })
    }
}

/// Result type for rotabatch-core operations.
pub type CoreResult<T> = Result<T, CoreError>;
