//! Run summary.
//!
//! A [`RunResult`] is built incrementally while the batch runs and emitted
//! once at the end through [`Reporter::batch_complete`](super::Reporter::batch_complete).

use crate::config::{RotationAngle, RunMode};

use serde::Serialize;
use std::path::PathBuf;
use std::time::Duration;

/// One file that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub file: PathBuf,
    pub error: String,
}

/// Aggregate outcome of a run.
///
/// Invariant: `succeeded + failed <= attempted`.
#[derive(Debug, Clone, Serialize)]
pub struct RunResult {
    pub mode: RunMode,
    pub angle: RotationAngle,
    pub directory: PathBuf,
    pub output_dir: Option<PathBuf>,
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FileFailure>,
    #[serde(serialize_with = "serialize_secs")]
    pub elapsed: Duration,
}

impl RunResult {
    pub fn new(
        mode: RunMode,
        angle: RotationAngle,
        directory: PathBuf,
        output_dir: Option<PathBuf>,
    ) -> Self {
        Self {
            mode,
            angle,
            directory,
            output_dir,
            attempted: 0,
            succeeded: 0,
            failed: 0,
            failures: Vec::new(),
            elapsed: Duration::ZERO,
        }
    }

    pub fn record_attempt(&mut self) {
        self.attempted += 1;
    }

    pub fn record_success(&mut self) {
        self.succeeded += 1;
    }

    pub fn record_failure(&mut self, file: PathBuf, error: impl Into<String>) {
        self.failed += 1;
        self.failures.push(FileFailure {
            file,
            error: error.into(),
        });
    }

    /// True when every attempted file succeeded.
    pub fn all_succeeded(&self) -> bool {
        self.failed == 0 && self.succeeded == self.attempted
    }
}

impl Serialize for RunMode {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for RotationAngle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.degrees())
    }
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}
