// ============================================================================
// rotabatch-core/src/rotation.rs
// ============================================================================
//
// ROTATION APPLIER: Writing the rotation tag with exiftool
//
// KEY COMPONENTS:
// - RotationRequest: One file, one absolute angle, optional output directory
// - apply_rotation: Runs exiftool for a request and returns the written path
//
// OUTPUT POLICY:
// - No output directory: the source is rewritten in place
// - Output directory: exiftool writes a hidden staging file inside the
//   output directory, which is then renamed onto <output>/<basename>. The
//   source is never touched and an existing target is replaced. An output
//   directory that resolves to the source folder is refused.
//
// Every failure is reported as CoreError::Apply for the file in question so
// the caller can record it and move on to the next file.

// ---- Internal crate imports ----
use crate::config::{RotationAngle, ToolPaths};
use crate::discovery::VideoFile;
use crate::error::{CoreError, CoreResult};
use crate::external::{exiftool, CommandExecutor, ToolCommand};

// ---- Standard library imports ----
use std::fs;
use std::path::{Path, PathBuf};

/// Prefix of the staging file exiftool writes before it is renamed.
const STAGING_PREFIX: &str = ".rotabatch-staging-";

/// A single tagging job.
#[derive(Debug, Clone)]
pub struct RotationRequest<'a> {
    pub file: &'a VideoFile,
    pub angle: RotationAngle,
    pub output_dir: Option<&'a Path>,
}

impl<'a> RotationRequest<'a> {
    pub fn new(file: &'a VideoFile, angle: RotationAngle, output_dir: Option<&'a Path>) -> Self {
        Self {
            file,
            angle,
            output_dir,
        }
    }

    /// Where the tagged file ends up.
    pub fn target_path(&self) -> PathBuf {
        match self.output_dir {
            Some(dir) => dir.join(&self.file.basename),
            None => self.file.path.clone(),
        }
    }
}

/// Staging path used while writing into `output_dir`.
pub fn staging_path(output_dir: &Path, basename: &str) -> PathBuf {
    output_dir.join(format!("{STAGING_PREFIX}{basename}"))
}

/// Sets the rotation tag described by `request`.
///
/// Returns the path of the tagged file: the source itself for in-place runs,
/// `<output>/<basename>` otherwise.
pub fn apply_rotation(
    executor: &dyn CommandExecutor,
    tools: &ToolPaths,
    request: &RotationRequest<'_>,
) -> CoreResult<PathBuf> {
    let source = &request.file.path;
    let fail = |detail: String| CoreError::Apply {
        file: source.clone(),
        detail,
    };

    match request.output_dir {
        None => {
            let command = exiftool::build_in_place_command(&tools.exiftool, request.angle, source);
            run_exiftool(executor, &command).map_err(fail)?;
            log::info!("Set rotation {} on {}", request.angle, source.display());
            Ok(source.clone())
        }
        Some(output_dir) => {
            if is_same_directory(output_dir, &request.file.directory) {
                return Err(fail(format!(
                    "output directory {} is the source folder; leave out the output directory to tag in place",
                    output_dir.display()
                )));
            }

            fs::create_dir_all(output_dir).map_err(|e| {
                fail(format!(
                    "could not create output directory {}: {}",
                    output_dir.display(),
                    e
                ))
            })?;

            let staging = staging_path(output_dir, &request.file.basename);
            if staging.exists() {
                log::debug!("Removing stale staging file {}", staging.display());
                fs::remove_file(&staging)
                    .map_err(|e| fail(format!("could not remove {}: {}", staging.display(), e)))?;
            }

            let command =
                exiftool::build_copy_command(&tools.exiftool, request.angle, source, &staging);
            if let Err(detail) = run_exiftool(executor, &command) {
                // exiftool can leave a partial file behind on failure
                let _ = fs::remove_file(&staging);
                return Err(fail(detail));
            }

            let target = request.target_path();
            fs::rename(&staging, &target).map_err(|e| {
                let _ = fs::remove_file(&staging);
                fail(format!("could not move result to {}: {}", target.display(), e))
            })?;

            log::info!(
                "Wrote {} with rotation {}",
                target.display(),
                request.angle
            );
            Ok(target)
        }
    }
}

/// True when both paths name the same existing directory.
fn is_same_directory(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}

fn run_exiftool(
    executor: &dyn CommandExecutor,
    command: &ToolCommand,
) -> Result<(), String> {
    let output = executor.execute(command).map_err(|e| e.to_string())?;
    if output.is_success() {
        Ok(())
    } else {
        Err(output.failure_detail(&command.program_name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::external::ToolOutput;
    use crate::mocks::MockExecutor;
    use tempfile::tempdir;

    fn video(dir: &Path, name: &str) -> VideoFile {
        let path = dir.join(name);
        fs::write(&path, b"source").unwrap();
        VideoFile::from_path(&path).unwrap()
    }

    #[test]
    fn in_place_returns_source_path() {
        let dir = tempdir().unwrap();
        let file = video(dir.path(), "a.mp4");
        let executor = MockExecutor::new();

        let out = apply_rotation(
            &executor,
            &ToolPaths::default(),
            &RotationRequest::new(&file, RotationAngle::Deg270, None),
        )
        .unwrap();

        assert_eq!(out, file.path);
        let calls = executor.calls_to("exiftool");
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].args_lossy()[0], "-Rotation=270");
        assert!(calls[0].args_lossy().contains(&"-overwrite_original".to_string()));
    }

    #[test]
    fn output_dir_replaces_existing_target_and_keeps_source() {
        let dir = tempdir().unwrap();
        let file = video(dir.path(), "a.mp4");
        let out_dir = dir.path().join("out");
        fs::create_dir(&out_dir).unwrap();
        fs::write(out_dir.join("a.mp4"), b"old").unwrap();
        fs::write(staging_path(&out_dir, "a.mp4"), b"stale").unwrap();

        let executor = MockExecutor::new();
        let out = apply_rotation(
            &executor,
            &ToolPaths::default(),
            &RotationRequest::new(&file, RotationAngle::Deg90, Some(&out_dir)),
        )
        .unwrap();

        assert_eq!(out, out_dir.join("a.mp4"));
        assert_ne!(fs::read(&out).unwrap(), b"old");
        assert_eq!(fs::read(&file.path).unwrap(), b"source");
        assert!(!staging_path(&out_dir, "a.mp4").exists());
    }

    #[test]
    fn output_dir_equal_to_source_folder_is_refused() {
        let dir = tempdir().unwrap();
        let file = video(dir.path(), "a.mp4");
        let executor = MockExecutor::new();
        // same folder spelled differently
        let same = dir.path().join(".");

        let err = apply_rotation(
            &executor,
            &ToolPaths::default(),
            &RotationRequest::new(&file, RotationAngle::Deg90, Some(&same)),
        )
        .unwrap_err();

        assert!(matches!(err, CoreError::Apply { .. }));
        assert!(executor.calls().is_empty());
        assert_eq!(fs::read(&file.path).unwrap(), b"source");
        assert!(!staging_path(dir.path(), "a.mp4").exists());
    }

    #[test]
    fn failing_exiftool_is_an_apply_error() {
        let dir = tempdir().unwrap();
        let file = video(dir.path(), "b.mov");
        let executor = MockExecutor::new()
            .respond_to("exiftool", "b.mov", ToolOutput::failure(1, "Error: bad file"));

        let err = apply_rotation(
            &executor,
            &ToolPaths::default(),
            &RotationRequest::new(&file, RotationAngle::Deg180, None),
        )
        .unwrap_err();

        match err {
            CoreError::Apply { file: failed, detail } => {
                assert_eq!(failed, file.path);
                assert!(detail.contains("Error: bad file"), "{detail}");
            }
            other => panic!("unexpected {other:?}"),
        }
    }
}
