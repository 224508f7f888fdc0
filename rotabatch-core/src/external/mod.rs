// ============================================================================
// rotabatch-core/src/external/mod.rs
// ============================================================================
//
// EXTERNAL TOOLS: Interactions with External CLI Tools
//
// This module encapsulates the two external programs rotabatch drives:
// ffmpeg (probe and preview frames) and exiftool (rotation tag). It provides
// a small command description type and an executor trait so the workflow can
// be exercised with scripted executors in tests.
//
// KEY COMPONENTS:
// - ToolCommand / ToolOutput: A program invocation and its captured result
// - CommandExecutor: Trait for running a ToolCommand
// - SystemExecutor: std::process implementation
// - probe_tool: Version query used by the availability check
// - default_install_command: Package-manager command for ffmpeg
//
// DESIGN PHILOSOPHY:
// Consumers inject the executor. The default implementation blocks until the
// child exits; nothing here runs concurrently.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ---- Standard library imports ----
use std::env;
use std::ffi::{OsStr, OsString};
use std::io;
use std::path::Path;
use std::process::{Command, Stdio};

// ============================================================================
// SUBMODULES
// ============================================================================

/// Argument building for exiftool
pub mod exiftool;

/// Argument building for ffmpeg
pub mod ffmpeg;

// ============================================================================
// COMMAND DESCRIPTION
// ============================================================================

/// A single external program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    /// Program to run, looked up on `PATH` when not a path.
    pub program: OsString,
    /// Arguments, in order.
    pub args: Vec<OsString>,
    /// When true the child writes straight to the terminal instead of having
    /// its output captured.
    pub inherit_output: bool,
}

impl ToolCommand {
    pub fn new(program: impl AsRef<OsStr>) -> Self {
        Self {
            program: program.as_ref().to_os_string(),
            args: Vec::new(),
            inherit_output: false,
        }
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    pub fn inherit_output(mut self) -> Self {
        self.inherit_output = true;
        self
    }

    /// Program name for messages.
    pub fn program_name(&self) -> String {
        self.program.to_string_lossy().into_owned()
    }

    /// Arguments as lossy UTF-8 strings.
    pub fn args_lossy(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    /// The full command line, for logging.
    pub fn display_line(&self) -> String {
        std::iter::once(self.program_name())
            .chain(self.args_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a finished external program.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` if the process was killed by a signal.
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            ..Default::default()
        }
    }

    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stderr: stderr.into(),
            ..Default::default()
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// Short description of a failed run: exit status plus the last line of
    /// stderr, if any.
    pub fn failure_detail(&self, program: &str) -> String {
        let status = match self.exit_code {
            Some(code) => format!("{program} exited with status {code}"),
            None => format!("{program} was terminated by a signal"),
        };
        match self.stderr.lines().rev().find(|line| !line.trim().is_empty()) {
            Some(line) => format!("{status}: {}", line.trim()),
            None => status,
        }
    }
}

// ============================================================================
// EXECUTOR
// ============================================================================

/// Runs external programs.
///
/// Implementations return `Err` only when the program could not be started:
/// `CoreError::DependencyNotFound` when the executable does not exist and
/// `CoreError::CommandStart` for any other start failure. A program that
/// starts and exits non-zero is `Ok` with a failing [`ToolOutput`].
pub trait CommandExecutor {
    fn execute(&self, command: &ToolCommand) -> CoreResult<ToolOutput>;
}

/// Executes commands with `std::process::Command`, blocking until exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemExecutor;

impl CommandExecutor for SystemExecutor {
    fn execute(&self, command: &ToolCommand) -> CoreResult<ToolOutput> {
        log::debug!("Running: {}", command.display_line());

        let mut cmd = Command::new(&command.program);
        cmd.args(&command.args).stdin(Stdio::null());

        let start_error = |e: io::Error| {
            if e.kind() == io::ErrorKind::NotFound {
                CoreError::DependencyNotFound(command.program_name())
            } else {
                CoreError::CommandStart(command.program_name(), e)
            }
        };

        if command.inherit_output {
            let status = cmd.status().map_err(start_error)?;
            return Ok(ToolOutput {
                exit_code: status.code(),
                ..Default::default()
            });
        }

        let output = cmd.output().map_err(start_error)?;
        let result = ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if !result.is_success() {
            log::debug!(
                "{} failed: {}",
                command.program_name(),
                result.failure_detail(&command.program_name())
            );
        }

        Ok(result)
    }
}

// ============================================================================
// DEPENDENCY CHECKING
// ============================================================================

/// Runs `program version_arg` and returns the first line of its output.
///
/// # Returns
///
/// * `Ok(Some(line))` - The tool ran and reported a version
/// * `Ok(None)` - The tool started but exited non-zero
/// * `Err(CoreError::DependencyNotFound)` - The executable does not exist
/// * `Err(CoreError::CommandStart)` - The executable exists but could not start
pub fn probe_tool(
    executor: &dyn CommandExecutor,
    program: &Path,
    version_arg: &str,
) -> CoreResult<Option<String>> {
    let command = ToolCommand::new(program).arg(version_arg);
    let output = executor.execute(&command)?;

    if !output.is_success() {
        log::warn!(
            "{}",
            output.failure_detail(&command.program_name())
        );
        return Ok(None);
    }

    let version = output
        .stdout
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    log::debug!("Found dependency {}: {}", command.program_name(), version);
    Ok(Some(version))
}

// ============================================================================
// PLATFORM DETECTION
// ============================================================================

/// Package-manager command that installs ffmpeg on this platform.
pub fn default_install_command() -> Vec<String> {
    let parts: &[&str] = match env::consts::OS {
        "macos" => &["brew", "install", "ffmpeg"],
        "windows" => &["winget", "install", "ffmpeg"],
        _ => &["sudo", "apt-get", "install", "-y", "ffmpeg"],
    };
    parts.iter().map(|s| s.to_string()).collect()
}
