// rotabatch-cli/src/cli.rs
//
// Defines the command-line argument structure using clap.

use clap::Parser;
use std::path::PathBuf;

// --- CLI Argument Definition ---

#[derive(Parser, Debug)]
#[command(
    author,
    version, // Reads from Cargo.toml via "cargo" feature in clap
    about = "rotabatch: Set the rotation tag of every video in a folder",
    long_about = "Sets the container rotation tag of every video in a folder using exiftool. \
                  Use --preview to look at a rotated frame of each video (rendered with ffmpeg) \
                  without changing anything."
)]
pub struct Cli {
    /// Folder containing the videos. `.` lists the subfolders of the current
    /// directory and asks which one to use. Defaults to the last folder used.
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Rotation to set: 90, 180 or 270. Defaults to the last angle used, else 90.
    #[arg(short, long, value_name = "DEGREES", allow_negative_numbers = true)]
    pub angle: Option<i64>,

    /// Show one rotated frame per video instead of tagging
    #[arg(short, long)]
    pub preview: bool,

    /// Write tagged copies into this folder instead of tagging in place
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    // --- Tool Overrides ---
    /// ffmpeg executable
    #[arg(long, value_name = "PATH", env = "ROTABATCH_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// exiftool executable
    #[arg(long, value_name = "PATH", env = "ROTABATCH_EXIFTOOL")]
    pub exiftool: Option<PathBuf>,

    /// Program used to show preview frames instead of the system default viewer
    #[arg(long, value_name = "PROGRAM", env = "ROTABATCH_VIEWER")]
    pub viewer: Option<PathBuf>,

    // --- Settings ---
    /// Settings file (default: ~/.rotabatch.toml)
    #[arg(long, value_name = "FILE", env = "ROTABATCH_SETTINGS")]
    pub settings: Option<PathBuf>,

    /// Don't remember this run's folder, angle and output folder
    #[arg(long)]
    pub no_save: bool,

    // --- Output ---
    /// Emit progress as JSON lines on stdout
    #[arg(long)]
    pub progress_json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Also write a log file into this folder
    #[arg(long, value_name = "DIR")]
    pub log_dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::parse_from(["rotabatch"]);
        assert!(cli.directory.is_none());
        assert!(cli.angle.is_none());
        assert!(!cli.preview);
        assert!(cli.output.is_none());
        assert!(!cli.no_save);
    }

    #[test]
    fn test_parse_short_flags() {
        let cli = Cli::parse_from(["rotabatch", "-d", "clips", "-a", "270", "-p", "-o", "out"]);
        assert_eq!(cli.directory, Some(PathBuf::from("clips")));
        assert_eq!(cli.angle, Some(270));
        assert!(cli.preview);
        assert_eq!(cli.output, Some(PathBuf::from("out")));
    }

    #[test]
    fn test_out_of_range_angle_is_left_to_validation() {
        let cli = Cli::parse_from(["rotabatch", "--angle", "-90"]);
        assert_eq!(cli.angle, Some(-90));
        let cli = Cli::parse_from(["rotabatch", "--angle", "45"]);
        assert_eq!(cli.angle, Some(45));
    }
}
