// ============================================================================
// rotabatch-core/src/preview.rs
// ============================================================================
//
// PREVIEW GENERATOR: One rotated still frame per video
//
// For each file a temporary JPEG is created next to the source, ffmpeg
// renders the first frame into it with the candidate rotation, the frame is
// shown, and the user acknowledges before the next file. The frame is a
// tempfile::TempPath and is removed when this function returns, whichever
// way it returns.
//
// A viewer that fails to open is only a warning; the acknowledgment gate is
// still applied so the user can inspect the frame by path.

// ---- Internal crate imports ----
use crate::config::{RotationAngle, ToolPaths};
use crate::discovery::VideoFile;
use crate::error::{CoreError, CoreResult};
use crate::external::{ffmpeg, CommandExecutor};
use crate::prompt::Prompt;
use crate::reporting::{PreviewReady, Reporter};
use crate::temp_files::create_preview_frame;
use crate::viewer::FrameViewer;

// ---- Standard library imports ----
use std::path::PathBuf;

/// Text of the acknowledgment prompt shown after each frame.
pub const ACKNOWLEDGE_MESSAGE: &str = "Press Enter to continue...";

/// What happened while previewing one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewOutcome {
    pub file: PathBuf,
    /// Where the frame was rendered. It no longer exists once the outcome
    /// is returned.
    pub frame: PathBuf,
    pub displayed: bool,
}

/// Collaborators needed to preview a file.
pub struct PreviewContext<'a> {
    pub executor: &'a dyn CommandExecutor,
    pub viewer: &'a dyn FrameViewer,
    pub prompt: &'a dyn Prompt,
    pub reporter: &'a dyn Reporter,
    pub tools: &'a ToolPaths,
}

/// Renders, shows and then discards a rotated frame of `file`.
///
/// # Errors
///
/// `CoreError::Preview` when the frame cannot be created or rendered. Prompt
/// I/O errors are returned as-is.
pub fn preview_file(
    ctx: &PreviewContext<'_>,
    file: &VideoFile,
    angle: RotationAngle,
) -> CoreResult<PreviewOutcome> {
    let fail = |detail: String| CoreError::Preview {
        file: file.path.clone(),
        detail,
    };

    let frame = create_preview_frame(&file.directory, &file.stem())
        .map_err(|e| fail(format!("could not create preview frame: {e}")))?;
    let frame_path = frame.to_path_buf();

    let command = ffmpeg::build_preview_command(&ctx.tools.ffmpeg, &file.path, angle, &frame_path);
    let output = ctx
        .executor
        .execute(&command)
        .map_err(|e| fail(e.to_string()))?;
    if !output.is_success() {
        return Err(fail(output.failure_detail(&command.program_name())));
    }
    log::debug!("Rendered preview frame {}", frame_path.display());

    let displayed = match ctx.viewer.show(&frame_path) {
        Ok(()) => true,
        Err(e) => {
            log::warn!("Could not display {}: {}", frame_path.display(), e);
            ctx.reporter
                .warning(&format!("Could not display preview frame: {e}"));
            false
        }
    };

    ctx.reporter.preview_ready(&PreviewReady {
        file: file.path.clone(),
        frame: frame_path.clone(),
        displayed,
    });
    ctx.prompt.acknowledge(ACKNOWLEDGE_MESSAGE)?;

    drop(frame);
    Ok(PreviewOutcome {
        file: file.path.clone(),
        frame: frame_path,
        displayed,
    })
}
