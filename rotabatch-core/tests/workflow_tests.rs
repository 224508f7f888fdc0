// rotabatch-core/tests/workflow_tests.rs
//
// End-to-end runs of the Workflow with scripted collaborators.

use rotabatch_core::config::{CoreConfig, DirectorySource, RotationAngle, RunMode, ToolPaths};
use rotabatch_core::error::{CoreError, InstallResolution};
use rotabatch_core::external::ToolOutput;
use rotabatch_core::mocks::{MockExecutor, RecordingReporter, RecordingViewer, ScriptedPrompt};
use rotabatch_core::settings::SettingsStore;
use rotabatch_core::Workflow;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

struct Fixture {
    root: TempDir,
    videos: PathBuf,
    store: SettingsStore,
}

impl Fixture {
    fn new(files: &[&str]) -> Self {
        let root = tempdir().unwrap();
        let videos = root.path().join("videos");
        fs::create_dir(&videos).unwrap();
        for name in files {
            fs::write(videos.join(name), format!("source {name}")).unwrap();
        }
        let store = SettingsStore::new(root.path().join("settings.toml"));
        Self {
            root,
            videos,
            store,
        }
    }

    fn config(&self, angle: i64) -> CoreConfig {
        CoreConfig {
            tools: ToolPaths {
                install_command: vec!["pkg".into(), "install".into(), "ffmpeg".into()],
                ..ToolPaths::default()
            },
            ..CoreConfig::new(DirectorySource::Explicit(self.videos.clone()), angle)
        }
    }

    fn dir_entries(&self, dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }
}

#[test]
fn invalid_angle_has_no_side_effects() {
    let fx = Fixture::new(&["a.mp4"]);
    let executor = MockExecutor::new();
    let prompt = ScriptedPrompt::new();
    let viewer = RecordingViewer::new();
    let reporter = RecordingReporter::new();

    let err = Workflow::new(&executor, &prompt, &viewer, &reporter)
        .with_settings(&fx.store)
        .run(&fx.config(45))
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidAngle(45)));
    assert!(executor.calls().is_empty());
    assert!(!fx.store.path().exists());
    assert!(reporter.events().is_empty());
}

#[test]
fn empty_directory_stops_after_availability_check() {
    let fx = Fixture::new(&[]);
    fs::write(fx.videos.join("notes.txt"), "not a video").unwrap();
    let executor = MockExecutor::new();
    let reporter = RecordingReporter::new();

    let err = Workflow::new(&executor, &ScriptedPrompt::new(), &RecordingViewer::new(), &reporter)
        .with_settings(&fx.store)
        .run(&fx.config(90))
        .unwrap_err();

    assert!(matches!(err, CoreError::NoFilesFound(ref dir) if *dir == fx.videos));
    assert!(executor.calls_to("exiftool").iter().all(|c| c.args_lossy() == vec!["-ver"]));
    assert!(!fx.store.path().exists());
    assert!(reporter.summary().is_none());
}

#[test]
fn missing_directory_is_not_found() {
    let fx = Fixture::new(&[]);
    let mut config = fx.config(90);
    config.directory = DirectorySource::Explicit(fx.root.path().join("nope"));

    let err = Workflow::new(
        &MockExecutor::new(),
        &ScriptedPrompt::new(),
        &RecordingViewer::new(),
        &RecordingReporter::new(),
    )
    .run(&config)
    .unwrap_err();

    assert!(matches!(err, CoreError::NotFound(_)));
}

#[test]
fn apply_in_place_tags_every_file_once() {
    let fx = Fixture::new(&["a.mp4", "b.mov"]);
    let executor = MockExecutor::new();
    let reporter = RecordingReporter::new();

    let result = Workflow::new(&executor, &ScriptedPrompt::new(), &RecordingViewer::new(), &reporter)
        .with_settings(&fx.store)
        .run(&fx.config(180))
        .unwrap();

    assert_eq!(result.mode, RunMode::Apply);
    assert_eq!(result.angle, RotationAngle::Deg180);
    assert_eq!((result.attempted, result.succeeded, result.failed), (2, 2, 0));

    let tag_calls: Vec<_> = executor
        .calls_to("exiftool")
        .into_iter()
        .filter(|c| c.args_lossy().contains(&"-Rotation=180".to_string()))
        .collect();
    assert_eq!(tag_calls.len(), 2);
    let mut targets: Vec<_> = tag_calls
        .iter()
        .map(|c| c.args_lossy().last().cloned().unwrap())
        .collect();
    targets.sort();
    assert!(targets[0].ends_with("a.mp4"));
    assert!(targets[1].ends_with("b.mov"));
    assert!(executor.calls_to("ffmpeg").iter().all(|c| c.args_lossy() == vec!["-version"]));

    let settings = fx.store.load().unwrap();
    assert_eq!(settings.default_angle, "180");
    assert_eq!(settings.output_dir(), None);
    assert!(settings.directory().ends_with("videos"));
    assert_eq!(reporter.summary().unwrap().succeeded, 2);
}

#[test]
fn apply_with_output_dir_leaves_sources_untouched() {
    let fx = Fixture::new(&["a.mp4", "b.mov"]);
    let out_dir = fx.root.path().join("rotated").join("batch1");
    let mut config = fx.config(90);
    config.output_dir = Some(out_dir.clone());
    let executor = MockExecutor::new();

    let result = Workflow::new(
        &executor,
        &ScriptedPrompt::new(),
        &RecordingViewer::new(),
        &RecordingReporter::new(),
    )
    .with_settings(&fx.store)
    .run(&config)
    .unwrap();

    assert_eq!(result.succeeded, 2);
    assert_eq!(fx.dir_entries(&out_dir), vec!["a.mp4", "b.mov"]);
    assert_eq!(fs::read_to_string(fx.videos.join("a.mp4")).unwrap(), "source a.mp4");
    assert_eq!(fs::read_to_string(fx.videos.join("b.mov")).unwrap(), "source b.mov");
    assert_eq!(fx.store.load().unwrap().output_dir(), Some(out_dir));
}

#[test]
fn one_failing_file_does_not_stop_the_batch() {
    let fx = Fixture::new(&["a.mp4", "b.mov", "c.mkv"]);
    let executor = MockExecutor::new().respond_to(
        "exiftool",
        "b.mov",
        ToolOutput::failure(1, "Error: Not a valid MOV"),
    );
    let reporter = RecordingReporter::new();

    let result = Workflow::new(&executor, &ScriptedPrompt::new(), &RecordingViewer::new(), &reporter)
        .run(&fx.config(270))
        .unwrap();

    assert_eq!((result.attempted, result.succeeded, result.failed), (3, 2, 1));
    assert_eq!(result.failures.len(), 1);
    assert!(result.failures[0].file.ends_with("b.mov"));
    assert!(result.failures[0].error.contains("Not a valid MOV"));
    assert!(reporter.events().iter().any(|e| e.starts_with("file_failed:") && e.ends_with("b.mov")));
}

#[test]
fn repeated_runs_give_the_same_result() {
    let fx = Fixture::new(&["a.mp4"]);
    let out_dir = fx.root.path().join("out");
    let mut config = fx.config(90);
    config.output_dir = Some(out_dir.clone());

    for _ in 0..2 {
        let result = Workflow::new(
            &MockExecutor::new(),
            &ScriptedPrompt::new(),
            &RecordingViewer::new(),
            &RecordingReporter::new(),
        )
        .run(&config)
        .unwrap();
        assert!(result.all_succeeded());
    }
    assert_eq!(fx.dir_entries(&out_dir), vec!["a.mp4"]);
}

#[test]
fn repeated_in_place_runs_both_succeed() {
    let fx = Fixture::new(&["a.mp4"]);
    let config = fx.config(90);
    let source = std::path::absolute(fx.videos.join("a.mp4")).unwrap();

    for _ in 0..2 {
        let executor = MockExecutor::new();
        let result = Workflow::new(
            &executor,
            &ScriptedPrompt::new(),
            &RecordingViewer::new(),
            &RecordingReporter::new(),
        )
        .run(&config)
        .unwrap();
        assert!(result.all_succeeded());
        assert_eq!(result.succeeded, 1);

        let tag_calls: Vec<_> = executor
            .calls_to("exiftool")
            .into_iter()
            .map(|c| c.args_lossy())
            .filter(|args| args != &vec!["-ver".to_string()])
            .collect();
        assert_eq!(
            tag_calls,
            vec![vec![
                "-Rotation=90".to_string(),
                "-overwrite_original".to_string(),
                source.to_string_lossy().into_owned(),
            ]]
        );
    }
    assert_eq!(fx.dir_entries(&fx.videos), vec!["a.mp4"]);
}

#[test]
fn output_dir_pointing_at_source_folder_keeps_sources() {
    let fx = Fixture::new(&["a.mp4"]);
    let mut config = fx.config(90);
    config.output_dir = Some(fx.videos.clone());

    let result = Workflow::new(
        &MockExecutor::new(),
        &ScriptedPrompt::new(),
        &RecordingViewer::new(),
        &RecordingReporter::new(),
    )
    .run(&config)
    .unwrap();

    assert_eq!((result.attempted, result.succeeded, result.failed), (1, 0, 1));
    assert!(result.failures[0].error.contains("source folder"));
    assert_eq!(fs::read_to_string(fx.videos.join("a.mp4")).unwrap(), "source a.mp4");
    assert_eq!(fx.dir_entries(&fx.videos), vec!["a.mp4"]);
}

#[test]
fn preview_shows_each_frame_then_removes_it() {
    let fx = Fixture::new(&["a.mp4", "b.mov"]);
    let mut config = fx.config(90);
    config.mode = RunMode::Preview;
    let executor = MockExecutor::new();
    let prompt = ScriptedPrompt::new();
    let viewer = RecordingViewer::new();

    let result = Workflow::new(&executor, &prompt, &viewer, &RecordingReporter::new())
        .run(&config)
        .unwrap();

    assert_eq!(result.mode, RunMode::Preview);
    assert_eq!(result.succeeded, 2);
    assert_eq!(prompt.acknowledgments(), 2);
    let shown = viewer.shown();
    assert_eq!(shown.len(), 2);
    for (frame, existed) in &shown {
        assert!(*existed, "{} missing while shown", frame.display());
        assert!(!frame.exists(), "{} left behind", frame.display());
    }
    assert!(executor
        .calls_to("exiftool")
        .iter()
        .all(|c| c.args_lossy() == vec!["-ver"]));
    assert_eq!(fx.dir_entries(&fx.videos), vec!["a.mp4", "b.mov"]);
}

#[test]
fn preview_with_broken_viewer_still_completes() {
    let fx = Fixture::new(&["a.mp4"]);
    let mut config = fx.config(180);
    config.mode = RunMode::Preview;
    let prompt = ScriptedPrompt::new();
    let reporter = RecordingReporter::new();

    let result = Workflow::new(&MockExecutor::new(), &prompt, &RecordingViewer::failing(), &reporter)
        .run(&config)
        .unwrap();

    assert!(result.all_succeeded());
    assert_eq!(prompt.acknowledgments(), 1);
    assert_eq!(reporter.warnings().len(), 1);
    assert_eq!(fx.dir_entries(&fx.videos), vec!["a.mp4"]);
}

#[test]
fn interactive_selection_picks_a_subdirectory() {
    let fx = Fixture::new(&[]);
    let phone = fx.root.path().join("phone");
    fs::create_dir(&phone).unwrap();
    fs::write(phone.join("clip.mp4"), "source").unwrap();

    let mut config = fx.config(90);
    config.directory = DirectorySource::Interactive {
        base: fx.root.path().to_path_buf(),
    };
    // sorted options: phone, videos
    let prompt = ScriptedPrompt::new().with_choices([0]);

    let result = Workflow::new(&MockExecutor::new(), &prompt, &RecordingViewer::new(), &RecordingReporter::new())
        .run(&config)
        .unwrap();

    assert_eq!(result.directory, phone);
    assert_eq!(result.succeeded, 1);
    assert_eq!(prompt.questions(), vec!["Select a folder containing videos:"]);
}

#[test]
fn interactive_selection_out_of_range_is_invalid() {
    let fx = Fixture::new(&["a.mp4"]);
    let mut config = fx.config(90);
    config.directory = DirectorySource::Interactive {
        base: fx.root.path().to_path_buf(),
    };
    let prompt = ScriptedPrompt::new().with_choices([5]);

    let err = Workflow::new(&MockExecutor::new(), &prompt, &RecordingViewer::new(), &RecordingReporter::new())
        .run(&config)
        .unwrap_err();

    assert!(matches!(err, CoreError::InvalidSelection(_)));
}

#[test]
fn missing_ffmpeg_declined_stops_before_discovery() {
    let fx = Fixture::new(&["a.mp4"]);
    let executor = MockExecutor::new().missing("ffmpeg");
    let prompt = ScriptedPrompt::new().with_confirms([false]);

    let err = Workflow::new(&executor, &prompt, &RecordingViewer::new(), &RecordingReporter::new())
        .with_settings(&fx.store)
        .run(&fx.config(90))
        .unwrap_err();

    assert!(matches!(
        err,
        CoreError::ToolMissing {
            resolution: InstallResolution::Declined,
            ..
        }
    ));
    assert_eq!(prompt.questions().len(), 1);
    assert!(executor.calls_to("exiftool").is_empty());
    assert!(!fx.store.path().exists());
}
