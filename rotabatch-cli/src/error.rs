// ============================================================================
// rotabatch-cli/src/error.rs
// ============================================================================
//
// CLI ERROR HANDLING: Error types and utilities for the CLI
//
// This module provides error handling utilities for the CLI that integrate
// with the rotabatch-core error types while adding CLI-specific error
// contexts.
//
// KEY COMPONENTS:
// - CliResult: Type alias for CLI operations
// - CliErrorContext: anyhow-style context for CoreError results
// - report_for: User-facing title and suggestion for a CoreError
// - exit_code_for: Process exit code for a run outcome

// ---- Internal crate imports ----
use rotabatch_core::config::VIDEO_EXTENSIONS;
use rotabatch_core::reporting::ReporterError;
use rotabatch_core::{CoreError, CoreResult, InstallResolution};

// ---- Standard library imports ----
use std::fmt;

// ============================================================================
// RESULT TYPE ALIAS
// ============================================================================

/// Type alias for CLI results using CoreError.
pub type CliResult<T> = CoreResult<T>;

// ============================================================================
// ERROR CONVERSION UTILITIES
// ============================================================================

/// Extension trait for adding context to errors in the CLI.
///
/// Similar to anyhow's context methods but keeps the CoreError type.
pub trait CliErrorContext<T> {
    /// Add context to an error.
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display;
}

impl<T, E> CliErrorContext<T> for Result<T, E>
where
    E: Into<CoreError>,
{
    fn cli_context<C>(self, context: C) -> CliResult<T>
    where
        C: fmt::Display,
    {
        self.map_err(|e| {
            let core_error: CoreError = e.into();
            CoreError::OperationFailed(format!("{}: {}", context, core_error))
        })
    }
}

// ============================================================================
// USER-FACING REPORTS
// ============================================================================

/// Builds the message shown to the user when a run ends with `error`.
pub fn report_for(error: &CoreError) -> ReporterError {
    let (title, suggestion) = match error {
        CoreError::InvalidAngle(_) => (
            "Invalid angle",
            Some("Use --angle 90, --angle 180 or --angle 270".to_string()),
        ),
        CoreError::NotFound(_) => (
            "Folder not found",
            Some("Check the --directory path".to_string()),
        ),
        CoreError::NoFilesFound(_) => (
            "No video files found",
            Some(format!(
                "Supported extensions: {}",
                VIDEO_EXTENSIONS.join(", ")
            )),
        ),
        CoreError::InvalidSelection(_) => (
            "Invalid selection",
            Some("Enter one of the listed numbers".to_string()),
        ),
        CoreError::ToolMissing {
            tool, resolution, ..
        } => (
            "Missing dependency",
            match resolution {
                InstallResolution::Installed => Some("Please re-run rotabatch".to_string()),
                _ => Some(format!("Install {tool} and re-run, or point --ffmpeg at it")),
            },
        ),
        CoreError::Settings(_) => ("Settings error", None),
        _ => ("Unexpected error", None),
    };

    ReporterError {
        title: title.to_string(),
        message: error.to_string(),
        context: None,
        suggestion,
    }
}

/// Exit code for a finished run.
///
/// Completed runs exit 0 even when some files failed; so does a run that
/// ended because the user installed a missing tool and has to start again.
pub fn exit_code_for<T>(result: &CliResult<T>) -> u8 {
    match result {
        Ok(_) => 0,
        Err(CoreError::ToolMissing {
            resolution: InstallResolution::Installed,
            ..
        }) => 0,
        Err(_) => 1,
    }
}
