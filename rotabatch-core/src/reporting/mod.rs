//! Progress and result reporting.
//!
//! The workflow never prints directly. Everything a user might want to see
//! goes through a [`Reporter`]: the terminal reporter renders styled text and
//! a progress bar, the JSON reporter emits one object per line for wrapping
//! tools, and the null reporter discards everything.

pub mod summary;

pub use summary::{FileFailure, RunResult};

use crate::config::{RotationAngle, RunMode};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::json;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// High-level warning/error message.
#[derive(Clone, Debug)]
pub struct ReporterError {
    pub title: String,
    pub message: String,
    pub context: Option<String>,
    pub suggestion: Option<String>,
}

/// Batch start metadata.
#[derive(Clone, Debug)]
pub struct BatchStartInfo {
    pub mode: RunMode,
    pub angle: RotationAngle,
    pub directory: PathBuf,
    pub total_files: usize,
    pub file_list: Vec<String>,
    pub output_dir: Option<PathBuf>,
}

/// Current file index within a batch.
#[derive(Clone, Debug)]
pub struct FileProgressContext {
    pub current_file: usize,
    pub total_files: usize,
    pub file: PathBuf,
}

/// A file whose rotation tag was written.
#[derive(Clone, Debug)]
pub struct FileOutcome {
    pub file: PathBuf,
    pub output: PathBuf,
}

/// A preview frame that is about to be shown.
#[derive(Clone, Debug)]
pub struct PreviewReady {
    pub file: PathBuf,
    pub frame: PathBuf,
    pub displayed: bool,
}

/// Reporter interface implemented by both human-readable and JSON reporters.
pub trait Reporter: Send + Sync {
    fn tool_found(&self, _tool: &str, _version: &str) {}
    fn directory_selected(&self, _directory: &Path) {}
    fn batch_started(&self, _info: &BatchStartInfo) {}
    fn file_started(&self, _context: &FileProgressContext) {}
    fn file_succeeded(&self, _outcome: &FileOutcome) {}
    fn file_failed(&self, _failure: &FileFailure) {}
    fn preview_ready(&self, _preview: &PreviewReady) {}
    fn warning(&self, _message: &str) {}
    fn error(&self, _error: &ReporterError) {}
    fn operation_complete(&self, _message: &str) {}
    fn batch_complete(&self, _summary: &RunResult) {}
}

/// No-op reporter that discards all updates.
pub struct NullReporter;

impl Reporter for NullReporter {}

/// Human-friendly reporter that prints concise text output.
///
/// In apply mode a progress bar tracks the batch; lines printed while it is
/// active go through the bar so they don't tear it. Preview runs skip the bar
/// because they stop for input after every file.
pub struct TerminalReporter {
    progress: Mutex<Option<ProgressBar>>,
}

impl Default for TerminalReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl TerminalReporter {
    pub fn new() -> Self {
        Self {
            progress: Mutex::new(None),
        }
    }

    fn line(&self, message: String) {
        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref().filter(|pb| !pb.is_hidden()) {
                pb.println(message);
                return;
            }
        }
        println!("{message}");
    }

    fn advance(&self) {
        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref() {
                pb.inc(1);
            }
        }
    }

    fn finish_progress(&self) {
        if let Ok(mut guard) = self.progress.lock() {
            if let Some(pb) = guard.take() {
                pb.finish_and_clear();
            }
        }
    }

    fn start_progress(&self, total: usize) {
        self.finish_progress();
        let pb = ProgressBar::new(total as u64);
        if let Ok(bar_style) =
            ProgressStyle::default_bar().template("Tagging [{bar:40}] {pos}/{len} | {msg}")
        {
            pb.set_style(bar_style.progress_chars("=> "));
        }
        if let Ok(mut guard) = self.progress.lock() {
            *guard = Some(pb);
        }
    }
}

impl Reporter for TerminalReporter {
    fn tool_found(&self, tool: &str, version: &str) {
        self.line(format!(
            "  {} {} {}",
            style("›").magenta(),
            style(tool).bold(),
            style(version).dim()
        ));
    }

    fn directory_selected(&self, directory: &Path) {
        self.line(format!(
            "  {:<10} {}",
            style("Folder:").bold(),
            directory.display()
        ));
    }

    fn batch_started(&self, info: &BatchStartInfo) {
        println!("\n{}", style(info.mode.as_str().to_uppercase()).bold().cyan());
        let destination = match &info.output_dir {
            Some(dir) => dir.display().to_string(),
            None => "in place".to_string(),
        };
        println!(
            "  Rotating {} files by {}° -> {}",
            info.total_files,
            info.angle,
            style(destination).bold()
        );
        for (idx, name) in info.file_list.iter().enumerate() {
            println!("  {}. {}", idx + 1, name);
        }
        if info.mode == RunMode::Apply {
            self.start_progress(info.total_files);
        }
    }

    fn file_started(&self, context: &FileProgressContext) {
        let name = display_name(&context.file);
        if let Ok(guard) = self.progress.lock() {
            if let Some(pb) = guard.as_ref().filter(|pb| !pb.is_hidden()) {
                pb.set_message(name);
                return;
            }
        }
        println!(
            "\nFile {} of {}: {}",
            style(context.current_file.to_string()).bold(),
            context.total_files,
            name
        );
    }

    fn file_succeeded(&self, outcome: &FileOutcome) {
        self.line(format!(
            "  {} {}",
            style("✓").green().bold(),
            outcome.output.display()
        ));
        self.advance();
    }

    fn file_failed(&self, failure: &FileFailure) {
        self.line(format!(
            "  {} {}: {}",
            style("✗").red().bold(),
            display_name(&failure.file),
            failure.error
        ));
        self.advance();
    }

    fn preview_ready(&self, preview: &PreviewReady) {
        if preview.displayed {
            println!(
                "  {}{}",
                style("› ").magenta(),
                style(preview.frame.display()).dim()
            );
        } else {
            println!(
                "  {}Frame saved at {} (viewer unavailable)",
                style("› ").magenta(),
                preview.frame.display()
            );
        }
    }

    fn warning(&self, message: &str) {
        self.line(format!(
            "\n{}",
            style(format!("WARN: {}", message)).yellow().bold()
        ));
    }

    fn error(&self, error: &ReporterError) {
        eprintln!(
            "\n{} {}",
            style("ERROR").red().bold(),
            style(&error.title).red().bold()
        );
        eprintln!("  {}", error.message);
        if let Some(ctx) = &error.context {
            eprintln!("  Context: {}", ctx);
        }
        if let Some(suggestion) = &error.suggestion {
            eprintln!("  Suggestion: {}", suggestion);
        }
    }

    fn operation_complete(&self, message: &str) {
        self.line(format!(
            "\n{} {}",
            style("✓").green().bold(),
            style(message).bold()
        ));
    }

    fn batch_complete(&self, summary: &RunResult) {
        self.finish_progress();
        println!("\n{}", style("SUMMARY").bold().cyan());
        let verb = match summary.mode {
            RunMode::Apply => "tagged",
            RunMode::Preview => "previewed",
        };
        let counts = format!(
            "{} of {} {}",
            summary.succeeded, summary.attempted, verb
        );
        if summary.all_succeeded() {
            println!("  {}", style(counts).green().bold());
        } else {
            println!("  {}", style(counts).yellow().bold());
        }
        println!("  Time: {}", format_duration(&summary.elapsed));
        for failure in &summary.failures {
            println!(
                "  - {}: {}",
                style(display_name(&failure.file)).red(),
                failure.error
            );
        }
    }
}

/// Line-delimited JSON reporter for wrapping tools.
pub struct JsonReporter {
    writer: Mutex<Box<dyn Write + Send>>,
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonReporter {
    pub fn new() -> Self {
        Self::with_writer(Box::new(io::stdout()))
    }

    pub fn with_writer(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    fn timestamp() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs()
    }

    fn write_value(&self, value: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", value);
            let _ = writer.flush();
        }
    }
}

impl Reporter for JsonReporter {
    fn tool_found(&self, tool: &str, version: &str) {
        self.write_value(json!({
            "type": "tool_found",
            "tool": tool,
            "version": version,
            "timestamp": Self::timestamp(),
        }));
    }

    fn directory_selected(&self, directory: &Path) {
        self.write_value(json!({
            "type": "directory_selected",
            "directory": directory.display().to_string(),
            "timestamp": Self::timestamp(),
        }));
    }

    fn batch_started(&self, info: &BatchStartInfo) {
        self.write_value(json!({
            "type": "batch_started",
            "mode": info.mode.as_str(),
            "angle": info.angle.degrees(),
            "directory": info.directory.display().to_string(),
            "total_files": info.total_files,
            "files": info.file_list,
            "output_dir": info.output_dir.as_ref().map(|dir| dir.display().to_string()),
            "timestamp": Self::timestamp(),
        }));
    }

    fn file_started(&self, context: &FileProgressContext) {
        self.write_value(json!({
            "type": "file_started",
            "current_file": context.current_file,
            "total_files": context.total_files,
            "file": context.file.display().to_string(),
            "timestamp": Self::timestamp(),
        }));
    }

    fn file_succeeded(&self, outcome: &FileOutcome) {
        self.write_value(json!({
            "type": "file_succeeded",
            "file": outcome.file.display().to_string(),
            "output": outcome.output.display().to_string(),
            "timestamp": Self::timestamp(),
        }));
    }

    fn file_failed(&self, failure: &FileFailure) {
        self.write_value(json!({
            "type": "file_failed",
            "file": failure.file.display().to_string(),
            "error": failure.error,
            "timestamp": Self::timestamp(),
        }));
    }

    fn preview_ready(&self, preview: &PreviewReady) {
        self.write_value(json!({
            "type": "preview_ready",
            "file": preview.file.display().to_string(),
            "frame": preview.frame.display().to_string(),
            "displayed": preview.displayed,
            "timestamp": Self::timestamp(),
        }));
    }

    fn warning(&self, message: &str) {
        self.write_value(json!({
            "type": "warning",
            "message": message,
            "timestamp": Self::timestamp(),
        }));
    }

    fn error(&self, error: &ReporterError) {
        self.write_value(json!({
            "type": "error",
            "title": error.title,
            "message": error.message,
            "context": error.context,
            "suggestion": error.suggestion,
            "timestamp": Self::timestamp(),
        }));
    }

    fn operation_complete(&self, message: &str) {
        self.write_value(json!({
            "type": "operation_complete",
            "message": message,
            "timestamp": Self::timestamp(),
        }));
    }

    fn batch_complete(&self, summary: &RunResult) {
        let mut value = json!({
            "type": "batch_complete",
            "timestamp": Self::timestamp(),
        });
        if let (Some(obj), Ok(serde_json::Value::Object(fields))) =
            (value.as_object_mut(), serde_json::to_value(summary))
        {
            obj.extend(fields);
        }
        self.write_value(value);
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn format_duration(duration: &Duration) -> String {
    let secs = duration.as_secs();
    format!(
        "{:02}:{:02}:{:02}",
        secs / 3600,
        (secs % 3600) / 60,
        secs % 60
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl SharedBuffer {
        fn lines(&self) -> Vec<serde_json::Value> {
            let bytes = self.0.lock().unwrap().clone();
            String::from_utf8(bytes)
                .unwrap()
                .lines()
                .map(|line| serde_json::from_str(line).unwrap())
                .collect()
        }
    }

    #[test]
    fn format_duration_pads_fields() {
        assert_eq!(format_duration(&Duration::from_secs(3725)), "01:02:05");
        assert_eq!(format_duration(&Duration::ZERO), "00:00:00");
    }

    #[test]
    fn json_reporter_emits_one_object_per_event() {
        let buffer = SharedBuffer::default();
        let reporter = JsonReporter::with_writer(Box::new(buffer.clone()));

        reporter.file_failed(&FileFailure {
            file: PathBuf::from("/v/b.mov"),
            error: "exiftool exited with status 1".to_string(),
        });
        reporter.warning("viewer unavailable");

        let lines = buffer.lines();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0]["type"], "file_failed");
        assert_eq!(lines[0]["file"], "/v/b.mov");
        assert_eq!(lines[1]["type"], "warning");
    }

    #[test]
    fn json_batch_complete_flattens_run_result() {
        let buffer = SharedBuffer::default();
        let reporter = JsonReporter::with_writer(Box::new(buffer.clone()));

        let mut result = RunResult::new(
            RunMode::Apply,
            RotationAngle::Deg180,
            PathBuf::from("/v"),
            None,
        );
        result.record_attempt();
        result.record_success();
        reporter.batch_complete(&result);

        let lines = buffer.lines();
        assert_eq!(lines[0]["type"], "batch_complete");
        assert_eq!(lines[0]["angle"], 180);
        assert_eq!(lines[0]["succeeded"], 1);
        assert_eq!(lines[0]["failed"], 0);
    }

    #[test]
    fn display_name_prefers_basename() {
        assert_eq!(display_name(Path::new("/v/a.mp4")), "a.mp4");
    }
}
