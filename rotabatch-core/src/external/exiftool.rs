//! Argument building for exiftool.
//!
//! The rotation tag is written with `-Rotation=<degrees>`. exiftool either
//! rewrites the file in place (`-overwrite_original`, no `_original` backup
//! left behind) or writes a new file with `-o`.

use crate::config::RotationAngle;
use crate::external::ToolCommand;

use std::path::Path;

/// Argument exiftool uses to query its version.
pub const VERSION_ARG: &str = "-ver";

/// `-Rotation=<degrees>`
pub fn rotation_tag_arg(angle: RotationAngle) -> String {
    format!("-Rotation={}", angle.degrees())
}

/// Sets the rotation tag of `input` in place.
pub fn build_in_place_command(exiftool: &Path, angle: RotationAngle, input: &Path) -> ToolCommand {
    ToolCommand::new(exiftool)
        .arg(rotation_tag_arg(angle))
        .arg("-overwrite_original")
        .arg(input)
}

/// Writes a copy of `input` with the rotation tag set to `output`.
///
/// exiftool refuses to write over an existing `output`.
pub fn build_copy_command(
    exiftool: &Path,
    angle: RotationAngle,
    input: &Path,
    output: &Path,
) -> ToolCommand {
    ToolCommand::new(exiftool)
        .arg(rotation_tag_arg(angle))
        .arg("-o")
        .arg(output)
        .arg(input)
}
