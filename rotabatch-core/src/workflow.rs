// ============================================================================
// rotabatch-core/src/workflow.rs
// ============================================================================
//
// WORKFLOW: Orchestrating a rotabatch run
//
// This module ties the pieces together in a fixed order:
//
//   1. Validate the requested angle (no side effects on failure)
//   2. Check that the media tools can be run
//   3. Resolve the directory, interactively if asked to
//   4. Discover video files; an empty directory ends the run
//   5. Preview or tag every file, collecting per-file failures
//   6. Report the summary
//   7. Remember the directory, angle and output directory
//
// KEY COMPONENTS:
// - Workflow: Borrowed collaborators (executor, prompt, viewer, reporter,
//   optional settings store) plus the run method
//
// Every collaborator is injected, so front ends decide how to talk to the
// user and tests can script the whole run. Files are processed one at a
// time; every external call blocks.

// ---- Internal crate imports ----
use crate::availability::ensure_available;
use crate::config::{CoreConfig, DirectorySource, RotationAngle, RunMode};
use crate::discovery::{find_video_files, list_subdirectories, VideoFile};
use crate::error::{CoreError, CoreResult};
use crate::external::CommandExecutor;
use crate::preview::{preview_file, PreviewContext};
use crate::prompt::Prompt;
use crate::reporting::{
    BatchStartInfo, FileFailure, FileOutcome, FileProgressContext, Reporter, RunResult,
};
use crate::rotation::{apply_rotation, RotationRequest};
use crate::settings::SettingsStore;
use crate::viewer::FrameViewer;

// ---- Standard library imports ----
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Title shown above the numbered directory list.
pub const SELECT_DIRECTORY_TITLE: &str = "Select a folder containing videos:";

/// One rotabatch run with its collaborators.
pub struct Workflow<'a> {
    executor: &'a dyn CommandExecutor,
    prompt: &'a dyn Prompt,
    viewer: &'a dyn FrameViewer,
    reporter: &'a dyn Reporter,
    settings: Option<&'a SettingsStore>,
}

impl<'a> Workflow<'a> {
    pub fn new(
        executor: &'a dyn CommandExecutor,
        prompt: &'a dyn Prompt,
        viewer: &'a dyn FrameViewer,
        reporter: &'a dyn Reporter,
    ) -> Self {
        Self {
            executor,
            prompt,
            viewer,
            reporter,
            settings: None,
        }
    }

    /// Persist the run's choices to `store` once the batch has completed.
    pub fn with_settings(mut self, store: &'a SettingsStore) -> Self {
        self.settings = Some(store);
        self
    }

    /// Runs the batch described by `config`.
    ///
    /// # Errors
    ///
    /// Environment problems end the run before any file is touched:
    /// `InvalidAngle`, `ToolMissing`, `NotFound`, `InvalidSelection` and
    /// `NoFilesFound`. Per-file failures do not; they are listed in the
    /// returned [`RunResult`].
    pub fn run(&self, config: &CoreConfig) -> CoreResult<RunResult> {
        let started = Instant::now();

        let angle = config.validate()?;
        log::info!("Requested rotation: {angle} degrees ({})", config.mode);

        ensure_available(self.executor, self.prompt, self.reporter, &config.tools)?;

        let directory = self.resolve_directory(&config.directory)?;
        self.reporter.directory_selected(&directory);

        let files = find_video_files(&directory)?;
        if files.is_empty() {
            log::warn!("No video files found in {}", directory.display());
            return Err(CoreError::NoFilesFound(directory));
        }

        let output_dir = config.output_dir.as_deref();
        self.reporter.batch_started(&BatchStartInfo {
            mode: config.mode,
            angle,
            directory: directory.clone(),
            total_files: files.len(),
            file_list: files.iter().map(|f| f.basename.clone()).collect(),
            output_dir: output_dir.map(Path::to_path_buf),
        });

        let mut result = RunResult::new(
            config.mode,
            angle,
            directory.clone(),
            output_dir.map(Path::to_path_buf),
        );

        for (idx, file) in files.iter().enumerate() {
            self.reporter.file_started(&FileProgressContext {
                current_file: idx + 1,
                total_files: files.len(),
                file: file.path.clone(),
            });
            result.record_attempt();

            let outcome = match config.mode {
                RunMode::Apply => self.apply_one(config, file, angle, output_dir),
                RunMode::Preview => self.preview_one(config, file, angle),
            };

            match outcome {
                Ok(()) => result.record_success(),
                Err(e) if e.is_per_file() => {
                    log::error!("{}: {}", file.path.display(), e);
                    let failure = FileFailure {
                        file: file.path.clone(),
                        error: e.to_string(),
                    };
                    self.reporter.file_failed(&failure);
                    result.record_failure(failure.file, failure.error);
                }
                Err(e) => return Err(e),
            }
        }

        result.elapsed = started.elapsed();
        debug_assert!(result.succeeded + result.failed <= result.attempted);
        debug_assert!(result.attempted <= files.len());

        log::info!(
            "Run complete: {} of {} succeeded, {} failed",
            result.succeeded,
            result.attempted,
            result.failed
        );
        self.reporter.batch_complete(&result);

        self.save_settings(&directory, angle, output_dir);
        Ok(result)
    }

    fn apply_one(
        &self,
        config: &CoreConfig,
        file: &VideoFile,
        angle: RotationAngle,
        output_dir: Option<&Path>,
    ) -> CoreResult<()> {
        let request = RotationRequest::new(file, angle, output_dir);
        let output = apply_rotation(self.executor, &config.tools, &request)?;
        self.reporter.file_succeeded(&FileOutcome {
            file: file.path.clone(),
            output,
        });
        Ok(())
    }

    fn preview_one(
        &self,
        config: &CoreConfig,
        file: &VideoFile,
        angle: RotationAngle,
    ) -> CoreResult<()> {
        let ctx = PreviewContext {
            executor: self.executor,
            viewer: self.viewer,
            prompt: self.prompt,
            reporter: self.reporter,
            tools: &config.tools,
        };
        preview_file(&ctx, file, angle)?;
        Ok(())
    }

    fn resolve_directory(&self, source: &DirectorySource) -> CoreResult<PathBuf> {
        match source {
            DirectorySource::Explicit(dir) => {
                if !dir.is_dir() {
                    return Err(CoreError::NotFound(dir.clone()));
                }
                Ok(dir.clone())
            }
            DirectorySource::Interactive { base } => {
                let options = list_subdirectories(base)?;
                if options.is_empty() {
                    return Err(CoreError::InvalidSelection(format!(
                        "no folders to choose from in {}",
                        base.display()
                    )));
                }
                let choice = self.prompt.choose(SELECT_DIRECTORY_TITLE, &options)?;
                let name = options.get(choice).ok_or_else(|| {
                    CoreError::InvalidSelection(format!("{} is not a listed folder", choice + 1))
                })?;
                let selected = base.join(name);
                log::info!("Selected folder: {}", selected.display());
                Ok(selected)
            }
        }
    }

    fn save_settings(&self, directory: &Path, angle: RotationAngle, output_dir: Option<&Path>) {
        let Some(store) = self.settings else {
            return;
        };

        let saved = store.load().and_then(|mut settings| {
            let directory = std::path::absolute(directory)?;
            settings.record_run(&directory, angle, output_dir);
            store.save(&settings)
        });
        if let Err(e) = saved {
            log::warn!("Could not save settings: {e}");
            self.reporter
                .warning(&format!("Settings were not saved: {e}"));
        }
    }
}
