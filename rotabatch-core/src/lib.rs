//! Core library for batch-setting the rotation tag of video files with
//! exiftool, with ffmpeg used for tool checks and preview frames.
//!
//! This crate provides video file discovery, the external tool availability
//! check, rotation tagging in place or into an output directory, rotated
//! preview frames, progress reporting and persisted settings.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use rotabatch_core::config::{CoreConfig, DirectorySource};
//! use rotabatch_core::external::SystemExecutor;
//! use rotabatch_core::prompt::StdioPrompt;
//! use rotabatch_core::reporting::TerminalReporter;
//! use rotabatch_core::settings::SettingsStore;
//! use rotabatch_core::viewer::SystemViewer;
//! use rotabatch_core::Workflow;
//! use std::path::PathBuf;
//!
//! let config = CoreConfig::new(DirectorySource::Explicit(PathBuf::from("/videos/phone")), 90);
//! let store = SettingsStore::at_default_location().unwrap();
//! let prompt = StdioPrompt::stdio();
//! let reporter = TerminalReporter::new();
//!
//! let result = Workflow::new(&SystemExecutor, &prompt, &SystemViewer, &reporter)
//!     .with_settings(&store)
//!     .run(&config)
//!     .unwrap();
//! println!("{} of {} tagged", result.succeeded, result.attempted);
//! ```

pub mod availability;
pub mod config;
pub mod discovery;
pub mod error;
pub mod external;
#[cfg(any(test, feature = "test-mocks"))]
pub mod mocks;
pub mod preview;
pub mod prompt;
pub mod reporting;
pub mod rotation;
pub mod settings;
pub mod temp_files;
pub mod viewer;
pub mod workflow;

// Re-exports for public API
pub use availability::ensure_available;
pub use config::{CoreConfig, DirectorySource, RotationAngle, RunMode, ToolPaths};
pub use discovery::{VideoFile, find_video_files, list_subdirectories};
pub use error::{CoreError, CoreResult, InstallResolution};
pub use preview::{PreviewOutcome, preview_file};
pub use reporting::{Reporter, RunResult};
pub use rotation::{RotationRequest, apply_rotation};
pub use settings::{Settings, SettingsStore};
pub use workflow::Workflow;
