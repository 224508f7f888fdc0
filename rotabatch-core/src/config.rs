// ============================================================================
// rotabatch-core/src/config.rs
// ============================================================================
//
// CONFIGURATION: Core Configuration Structures and Constants
//
// This module defines the configuration passed into the rotabatch workflow.
// Front ends build a CoreConfig from their own inputs (flags, prompts,
// persisted settings) and hand it to `Workflow::run`.
//
// KEY COMPONENTS:
// - RotationAngle: The closed set of supported rotation tag values
// - RunMode: Preview or apply
// - DirectorySource: Explicit directory or interactive selection
// - ToolPaths: Locations of the external tools
// - CoreConfig: Main configuration structure for the library

// ---- Standard library imports ----
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};

// ============================================================================
// DEFAULT CONSTANTS
// ============================================================================

/// Rotation angle used when neither the command line nor the settings file
/// supplies one.
pub const DEFAULT_ANGLE: u16 = 90;

/// Default media tool executable.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Default metadata-tag editor executable.
pub const DEFAULT_EXIFTOOL: &str = "exiftool";

/// File extensions (lowercase, without the dot) treated as video files.
pub const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "avi", "mkv", "flv", "wmv"];

// ============================================================================
// ROTATION ANGLE
// ============================================================================

/// Absolute rotation tag value written to a video.
///
/// The value is set, not added: tagging a file already at 90 degrees with
/// `Deg180` leaves it at 180, not 270.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RotationAngle {
    Deg90,
    Deg180,
    Deg270,
}

impl RotationAngle {
    /// All supported angles in ascending order.
    pub const ALL: [RotationAngle; 3] = [
        RotationAngle::Deg90,
        RotationAngle::Deg180,
        RotationAngle::Deg270,
    ];

    /// The angle in degrees.
    pub const fn degrees(self) -> u16 {
        match self {
            RotationAngle::Deg90 => 90,
            RotationAngle::Deg180 => 180,
            RotationAngle::Deg270 => 270,
        }
    }

    /// Validates a raw integer angle.
    pub fn from_degrees(value: i64) -> CoreResult<Self> {
        match value {
            90 => Ok(RotationAngle::Deg90),
            180 => Ok(RotationAngle::Deg180),
            270 => Ok(RotationAngle::Deg270),
            other => Err(CoreError::InvalidAngle(other)),
        }
    }
}

impl fmt::Display for RotationAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.degrees())
    }
}

impl FromStr for RotationAngle {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: i64 = s.trim().parse().map_err(|_| {
            CoreError::OperationFailed(format!("Angle '{s}' is not an integer"))
        })?;
        RotationAngle::from_degrees(value)
    }
}

// ============================================================================
// RUN MODE AND DIRECTORY SOURCE
// ============================================================================

/// What a run does with the discovered files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RunMode {
    /// Set the rotation tag on every file.
    #[default]
    Apply,
    /// Render and show one rotated frame per file; nothing is modified.
    Preview,
}

impl RunMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            RunMode::Apply => "apply",
            RunMode::Preview => "preview",
        }
    }
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the directory of videos comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DirectorySource {
    /// Use this directory as is.
    Explicit(PathBuf),
    /// Ask the user to pick one of the subdirectories of `base`.
    Interactive { base: PathBuf },
}

impl DirectorySource {
    /// Resolves a requested directory the way the command line does: `.`
    /// means "let me choose among the subdirectories of the current
    /// directory".
    pub fn from_requested(requested: PathBuf) -> Self {
        if requested.as_os_str() == "." {
            DirectorySource::Interactive { base: requested }
        } else {
            DirectorySource::Explicit(requested)
        }
    }
}

// ============================================================================
// TOOL PATHS
// ============================================================================

/// Locations of the external programs a run drives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// Media tool used for probing and preview frames.
    pub ffmpeg: PathBuf,
    /// Metadata-tag editor used to set the rotation tag.
    pub exiftool: PathBuf,
    /// Program used to show preview frames. `None` uses the host default
    /// viewer.
    pub viewer: Option<PathBuf>,
    /// Command offered when the media tool is missing.
    pub install_command: Vec<String>,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from(DEFAULT_FFMPEG),
            exiftool: PathBuf::from(DEFAULT_EXIFTOOL),
            viewer: None,
            install_command: crate::external::default_install_command(),
        }
    }
}

impl ToolPaths {
    /// Display name of the media tool, used in messages.
    pub fn ffmpeg_name(&self) -> String {
        self.ffmpeg.display().to_string()
    }

    /// Display name of the metadata-tag editor, used in messages.
    pub fn exiftool_name(&self) -> String {
        self.exiftool.display().to_string()
    }
}

// ============================================================================
// CORE CONFIGURATION
// ============================================================================

/// Configuration for one rotabatch run.
///
/// # Examples
///
/// ```rust
/// use rotabatch_core::config::{CoreConfig, DirectorySource, RunMode};
/// use std::path::PathBuf;
///
/// let mut config = CoreConfig::new(DirectorySource::Explicit(PathBuf::from("clips")), 180);
/// config.mode = RunMode::Preview;
/// assert_eq!(config.validate().unwrap().degrees(), 180);
/// ```
#[derive(Debug, Clone)]
pub struct CoreConfig {
    /// Where the videos live
    pub directory: DirectorySource,

    /// Requested angle, validated by `validate` before any work starts
    pub angle: i64,

    /// Preview or apply
    pub mode: RunMode,

    /// Write tagged copies here instead of tagging in place
    pub output_dir: Option<PathBuf>,

    /// External programs
    pub tools: ToolPaths,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            directory: DirectorySource::Interactive {
                base: PathBuf::from("."),
            },
            angle: i64::from(DEFAULT_ANGLE),
            mode: RunMode::Apply,
            output_dir: None,
            tools: ToolPaths::default(),
        }
    }
}

impl CoreConfig {
    /// Creates a config for the given directory and angle. Other fields use
    /// defaults.
    pub fn new(directory: DirectorySource, angle: i64) -> Self {
        Self {
            directory,
            angle,
            ..Default::default()
        }
    }

    /// Validates the requested angle.
    pub fn validate(&self) -> CoreResult<RotationAngle> {
        RotationAngle::from_degrees(self.angle)
    }
}
