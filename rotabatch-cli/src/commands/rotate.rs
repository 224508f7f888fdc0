// ============================================================================
// rotabatch-cli/src/commands/rotate.rs
// ============================================================================
//
// ROTATE COMMAND: Wiring the command line to the core workflow
//
// KEY COMPONENTS:
// - open_settings: Settings store from --settings or the home directory
// - build_config: Merges flags with remembered settings into a CoreConfig
// - run_rotate: Prints the run header and runs the Workflow
//
// Explicit flags win over remembered values. The remembered output folder is
// never applied on its own: leaving out --output always tags in place.

// ---- Internal crate imports ----
use crate::cli::Cli;
use crate::error::{CliErrorContext, CliResult};
use crate::terminal;

// ---- External crate imports ----
use rotabatch_core::config::{CoreConfig, DirectorySource, RunMode, ToolPaths};
use rotabatch_core::external::SystemExecutor;
use rotabatch_core::prompt::Prompt;
use rotabatch_core::reporting::Reporter;
use rotabatch_core::settings::{Settings, SettingsStore};
use rotabatch_core::viewer::viewer_for;
use rotabatch_core::{RunResult, Workflow};

/// Settings store for this run, if a location can be determined.
pub fn open_settings(cli: &Cli) -> Option<SettingsStore> {
    match &cli.settings {
        Some(path) => Some(SettingsStore::new(path)),
        None => match SettingsStore::at_default_location() {
            Ok(store) => Some(store),
            Err(e) => {
                log::warn!("Settings disabled: {e}");
                None
            }
        },
    }
}

/// Remembered settings, or defaults when there are none or they can't be read.
pub fn load_settings(store: Option<&SettingsStore>) -> Settings {
    let Some(store) = store else {
        return Settings::default();
    };
    store
        .load()
        .cli_context(format!("Reading {}", store.path().display()))
        .unwrap_or_else(|e| {
            log::warn!("{e}");
            Settings::default()
        })
}

/// Builds the run configuration from flags and remembered settings.
pub fn build_config(cli: &Cli, settings: &Settings) -> CoreConfig {
    let directory = cli
        .directory
        .clone()
        .unwrap_or_else(|| settings.directory());
    let angle = cli.angle.unwrap_or_else(|| settings.angle());

    let defaults = ToolPaths::default();
    let tools = ToolPaths {
        ffmpeg: cli.ffmpeg.clone().unwrap_or(defaults.ffmpeg),
        exiftool: cli.exiftool.clone().unwrap_or(defaults.exiftool),
        viewer: cli.viewer.clone(),
        install_command: defaults.install_command,
    };

    CoreConfig {
        directory: DirectorySource::from_requested(directory),
        angle,
        mode: if cli.preview {
            RunMode::Preview
        } else {
            RunMode::Apply
        },
        output_dir: cli.output.clone(),
        tools,
    }
}

fn print_header(config: &CoreConfig) {
    terminal::print_section("rotabatch");
    let directory = match &config.directory {
        DirectorySource::Explicit(dir) => dir.display().to_string(),
        DirectorySource::Interactive { base } => format!("choose in {}", base.display()),
    };
    let output = config
        .output_dir
        .as_ref()
        .map(|dir| dir.display().to_string())
        .unwrap_or_else(|| "in place".to_string());
    terminal::print_rows(&[
        ("Folder:", directory),
        ("Angle:", config.angle.to_string()),
        ("Mode:", config.mode.to_string()),
        ("Output:", output),
    ]);
}

/// Runs one batch with the system executor and viewer.
pub fn run_rotate(cli: &Cli, reporter: &dyn Reporter, prompt: &dyn Prompt) -> CliResult<RunResult> {
    let store = open_settings(cli);
    let settings = load_settings(store.as_ref());
    let config = build_config(cli, &settings);
    log::debug!("Run configuration: {config:?}");

    if !cli.progress_json {
        print_header(&config);
    }

    let viewer = viewer_for(config.tools.viewer.as_deref());
    let executor = SystemExecutor;
    let mut workflow = Workflow::new(&executor, prompt, viewer.as_ref(), reporter);
    if let Some(store) = store.as_ref().filter(|_| !cli.no_save) {
        workflow = workflow.with_settings(store);
    }

    workflow.run(&config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use std::path::PathBuf;

    fn remembered() -> Settings {
        Settings {
            default_angle: "270".to_string(),
            default_directory: "/videos/phone".to_string(),
            output_directory: "/videos/out".to_string(),
        }
    }

    #[test]
    fn test_remembered_values_fill_missing_flags() {
        let cli = Cli::parse_from(["rotabatch"]);
        let config = build_config(&cli, &remembered());

        assert_eq!(
            config.directory,
            DirectorySource::Explicit(PathBuf::from("/videos/phone"))
        );
        assert_eq!(config.angle, 270);
        assert_eq!(config.mode, RunMode::Apply);
        // remembered output folder is not applied implicitly
        assert_eq!(config.output_dir, None);
    }

    #[test]
    fn test_flags_override_remembered_values() {
        let cli = Cli::parse_from([
            "rotabatch", "-d", "clips", "-a", "90", "--preview", "-o", "rotated", "--ffmpeg",
            "/opt/ffmpeg",
        ]);
        let config = build_config(&cli, &remembered());

        assert_eq!(config.directory, DirectorySource::Explicit(PathBuf::from("clips")));
        assert_eq!(config.angle, 90);
        assert_eq!(config.mode, RunMode::Preview);
        assert_eq!(config.output_dir, Some(PathBuf::from("rotated")));
        assert_eq!(config.tools.ffmpeg, PathBuf::from("/opt/ffmpeg"));
    }

    #[test]
    fn test_default_directory_means_interactive() {
        let cli = Cli::parse_from(["rotabatch"]);
        let config = build_config(&cli, &Settings::default());
        assert!(matches!(config.directory, DirectorySource::Interactive { .. }));
        assert_eq!(config.angle, 90);
    }

    #[test]
    fn test_unreadable_settings_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        // a directory where the file should be cannot be read as a file
        let store = SettingsStore::new(dir.path());
        assert_eq!(load_settings(Some(&store)), Settings::default());
        assert_eq!(load_settings(None), Settings::default());
    }
}
