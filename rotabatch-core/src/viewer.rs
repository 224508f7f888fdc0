//! Displaying preview frames.

use crate::error::{CoreError, CoreResult};
use crate::external::{CommandExecutor, SystemExecutor, ToolCommand};

use std::path::{Path, PathBuf};

/// Shows a rendered preview frame to the user.
pub trait FrameViewer {
    fn show(&self, frame: &Path) -> CoreResult<()>;
}

/// Opens frames with the host's default image viewer. The launcher is
/// detached, so `show` returns without waiting for the viewer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemViewer;

impl FrameViewer for SystemViewer {
    fn show(&self, frame: &Path) -> CoreResult<()> {
        open::that_detached(frame).map_err(|e| {
            CoreError::OperationFailed(format!(
                "Could not open {} with the default viewer: {}",
                frame.display(),
                e
            ))
        })
    }
}

/// Opens frames by running `<program> <frame>`.
#[derive(Debug, Clone)]
pub struct CommandViewer {
    program: PathBuf,
}

impl CommandViewer {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl FrameViewer for CommandViewer {
    fn show(&self, frame: &Path) -> CoreResult<()> {
        let command = ToolCommand::new(&self.program).arg(frame);
        let output = SystemExecutor.execute(&command)?;
        if output.is_success() {
            Ok(())
        } else {
            Err(CoreError::OperationFailed(
                output.failure_detail(&command.program_name()),
            ))
        }
    }
}

/// Picks the viewer for an optional override program.
pub fn viewer_for(program: Option<&Path>) -> Box<dyn FrameViewer> {
    match program {
        Some(program) => Box::new(CommandViewer::new(program)),
        None => Box::new(SystemViewer),
    }
}
