//! Argument building for ffmpeg.
//!
//! ffmpeg is only probed for presence and asked to render a single preview
//! frame. The preview filter rotates by the requested angle and grows the
//! canvas with `rotw`/`roth` so quarter turns are not cropped.

use crate::config::RotationAngle;
use crate::external::ToolCommand;

use std::path::Path;

/// Argument ffmpeg uses to report its version.
pub const VERSION_ARG: &str = "-version";

/// Builds the `rotate` filter expression for `angle`.
///
/// ```rust
/// use rotabatch_core::config::RotationAngle;
/// use rotabatch_core::external::ffmpeg::rotate_filter;
///
/// assert_eq!(
///     rotate_filter(RotationAngle::Deg90),
///     "rotate=90*PI/180:ow=rotw(90*PI/180):oh=roth(90*PI/180)"
/// );
/// ```
pub fn rotate_filter(angle: RotationAngle) -> String {
    let radians = format!("{}*PI/180", angle.degrees());
    format!("rotate={radians}:ow=rotw({radians}):oh=roth({radians})")
}

/// Renders the first frame of `input`, rotated by `angle`, into `frame`.
pub fn build_preview_command(
    ffmpeg: &Path,
    input: &Path,
    angle: RotationAngle,
    frame: &Path,
) -> ToolCommand {
    ToolCommand::new(ffmpeg)
        .args(["-hide_banner", "-v", "error", "-y", "-i"])
        .arg(input)
        .arg("-vf")
        .arg(rotate_filter(angle))
        .args(["-frames:v", "1"])
        // single image; stops the image2 muxer from reading `%d` in the name as a pattern
        .args(["-update", "1"])
        .arg(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_command_renders_one_frame_to_the_last_argument() {
        let cmd = build_preview_command(
            Path::new("ffmpeg"),
            Path::new("/v/a.mp4"),
            RotationAngle::Deg180,
            Path::new("/v/a_preview_x1.jpg"),
        );
        let args = cmd.args_lossy();
        assert_eq!(args.last().map(String::as_str), Some("/v/a_preview_x1.jpg"));
        let vf = args.iter().position(|a| a == "-vf").unwrap();
        assert!(args[vf + 1].starts_with("rotate=180*PI/180"));
        let frames = args.iter().position(|a| a == "-frames:v").unwrap();
        assert_eq!(args[frames + 1], "1");
        assert!(args.contains(&"-y".to_string()));
    }

    #[test]
    fn preview_frame_name_is_not_treated_as_a_sequence_pattern() {
        let cmd = build_preview_command(
            Path::new("ffmpeg"),
            Path::new("/v/clip%d.mp4"),
            RotationAngle::Deg90,
            Path::new("/v/clip%d_preview_x1.jpg"),
        );
        let args = cmd.args_lossy();
        let n = args.len();
        assert_eq!(args[n - 3..], ["-update", "1", "/v/clip%d_preview_x1.jpg"]);
    }
}
