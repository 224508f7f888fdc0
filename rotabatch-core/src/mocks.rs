// ============================================================================
// rotabatch-core/src/mocks.rs
// ============================================================================
//
// TEST DOUBLES: Scripted collaborators for driving a Workflow without a
// terminal or real media tools
//
// KEY COMPONENTS:
// - MockExecutor: Answers commands from rules, records every call and fakes
//   the files exiftool and ffmpeg would have written
// - ScriptedPrompt: Pre-recorded answers to prompts
// - RecordingViewer: Remembers which frames were shown
// - RecordingReporter: Captures reporter events as strings
//
// Compiled for unit tests and with the `test-mocks` feature.

// ---- Internal crate imports ----
use crate::error::{CoreError, CoreResult};
use crate::external::{CommandExecutor, ToolCommand, ToolOutput};
use crate::prompt::Prompt;
use crate::reporting::{
    BatchStartInfo, FileFailure, FileOutcome, FileProgressContext, PreviewReady, Reporter,
    ReporterError, RunResult,
};
use crate::viewer::FrameViewer;

// ---- Standard library imports ----
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

// ============================================================================
// EXECUTOR
// ============================================================================

enum MockResponse {
    Output(ToolOutput),
    Missing,
}

struct MockRule {
    program_pattern: String,
    arg_pattern: String,
    response: MockResponse,
}

impl MockRule {
    fn matches(&self, command: &ToolCommand) -> bool {
        command.program_name().contains(&self.program_pattern)
            && (self.arg_pattern.is_empty()
                || command
                    .args_lossy()
                    .iter()
                    .any(|arg| arg.contains(&self.arg_pattern)))
    }
}

/// Executor that never starts a process.
///
/// Without a matching rule every command succeeds, and the files the real
/// tools would write are created: the `-o` target of an exiftool copy and
/// the last argument of an ffmpeg preview render. Version probes answer with
/// `"<program> mock"`. Rules are checked in the order they were added and are
/// not consumed.
#[derive(Default)]
pub struct MockExecutor {
    rules: Vec<MockRule>,
    received_calls: RefCell<Vec<ToolCommand>>,
}

impl MockExecutor {
    pub fn new() -> Self {
        Default::default()
    }

    /// Answers commands whose program contains `program_pattern` and one of
    /// whose arguments contains `arg_pattern` with `output`.
    pub fn respond_to(mut self, program_pattern: &str, arg_pattern: &str, output: ToolOutput) -> Self {
        self.rules.push(MockRule {
            program_pattern: program_pattern.to_string(),
            arg_pattern: arg_pattern.to_string(),
            response: MockResponse::Output(output),
        });
        self
    }

    /// Pretends the program's executable does not exist.
    pub fn missing(mut self, program_pattern: &str) -> Self {
        self.rules.push(MockRule {
            program_pattern: program_pattern.to_string(),
            arg_pattern: String::new(),
            response: MockResponse::Missing,
        });
        self
    }

    /// Every command received, in order.
    pub fn calls(&self) -> Vec<ToolCommand> {
        self.received_calls.borrow().clone()
    }

    /// Commands whose program contains `program_pattern`.
    pub fn calls_to(&self, program_pattern: &str) -> Vec<ToolCommand> {
        self.received_calls
            .borrow()
            .iter()
            .filter(|cmd| cmd.program_name().contains(program_pattern))
            .cloned()
            .collect()
    }

    fn fake_side_effects(command: &ToolCommand) {
        let args = command.args_lossy();
        let target = match args.iter().position(|arg| arg == "-o") {
            Some(idx) => args.get(idx + 1),
            None if args.iter().any(|arg| arg == "-frames:v") => args.last(),
            None => None,
        };
        if let Some(target) = target {
            if let Err(e) = fs::write(target, b"mock output") {
                log::warn!("MockExecutor could not create {target}: {e}");
            }
        }
    }
}

impl CommandExecutor for MockExecutor {
    fn execute(&self, command: &ToolCommand) -> CoreResult<ToolOutput> {
        self.received_calls.borrow_mut().push(command.clone());
        log::debug!("MockExecutor received: {}", command.display_line());

        if let Some(rule) = self.rules.iter().find(|rule| rule.matches(command)) {
            return match &rule.response {
                MockResponse::Missing => Err(CoreError::DependencyNotFound(command.program_name())),
                MockResponse::Output(output) => {
                    if output.is_success() {
                        Self::fake_side_effects(command);
                    }
                    Ok(output.clone())
                }
            };
        }

        let is_probe = matches!(
            command.args_lossy().as_slice(),
            [arg] if arg == "-version" || arg == "-ver"
        );
        if is_probe {
            return Ok(ToolOutput {
                exit_code: Some(0),
                stdout: format!("{} mock\n", command.program_name()),
                stderr: String::new(),
            });
        }

        Self::fake_side_effects(command);
        Ok(ToolOutput::success())
    }
}

// ============================================================================
// PROMPT
// ============================================================================

/// Prompt with pre-recorded answers.
///
/// Running out of confirm answers means "no"; running out of choices is an
/// `InvalidSelection`.
#[derive(Default)]
pub struct ScriptedPrompt {
    confirms: RefCell<VecDeque<bool>>,
    choices: RefCell<VecDeque<usize>>,
    questions: RefCell<Vec<String>>,
    acknowledged: Cell<usize>,
}

impl ScriptedPrompt {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_confirms(self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.confirms.borrow_mut().extend(answers);
        self
    }

    /// Zero-based indices returned by `choose`.
    pub fn with_choices(self, choices: impl IntoIterator<Item = usize>) -> Self {
        self.choices.borrow_mut().extend(choices);
        self
    }

    /// Questions asked so far, including choice titles.
    pub fn questions(&self) -> Vec<String> {
        self.questions.borrow().clone()
    }

    pub fn acknowledgments(&self) -> usize {
        self.acknowledged.get()
    }
}

impl Prompt for ScriptedPrompt {
    fn confirm(&self, question: &str) -> CoreResult<bool> {
        self.questions.borrow_mut().push(question.to_string());
        Ok(self.confirms.borrow_mut().pop_front().unwrap_or(false))
    }

    fn choose(&self, title: &str, options: &[String]) -> CoreResult<usize> {
        self.questions.borrow_mut().push(title.to_string());
        match self.choices.borrow_mut().pop_front() {
            Some(choice) if choice < options.len() => Ok(choice),
            Some(choice) => Err(CoreError::InvalidSelection(format!(
                "{} is not between 1 and {}",
                choice + 1,
                options.len()
            ))),
            None => Err(CoreError::InvalidSelection("no answer scripted".to_string())),
        }
    }

    fn acknowledge(&self, _message: &str) -> CoreResult<()> {
        self.acknowledged.set(self.acknowledged.get() + 1);
        Ok(())
    }
}

// ============================================================================
// VIEWER
// ============================================================================

/// Viewer that records each frame and whether it existed when shown.
#[derive(Default)]
pub struct RecordingViewer {
    fail: bool,
    shown: RefCell<Vec<(PathBuf, bool)>>,
}

impl RecordingViewer {
    pub fn new() -> Self {
        Default::default()
    }

    /// A viewer that records the frame and then reports failure.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn shown(&self) -> Vec<(PathBuf, bool)> {
        self.shown.borrow().clone()
    }
}

impl FrameViewer for RecordingViewer {
    fn show(&self, frame: &Path) -> CoreResult<()> {
        self.shown
            .borrow_mut()
            .push((frame.to_path_buf(), frame.exists()));
        if self.fail {
            Err(CoreError::OperationFailed("no display available".to_string()))
        } else {
            Ok(())
        }
    }
}

// ============================================================================
// REPORTER
// ============================================================================

/// Reporter that keeps a `kind:detail` line per event.
#[derive(Default)]
pub struct RecordingReporter {
    events: Mutex<Vec<String>>,
    summary: Mutex<Option<RunResult>>,
}

impl RecordingReporter {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn events(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| e.strip_prefix("warning:").map(str::to_string))
            .collect()
    }

    /// The summary passed to `batch_complete`, if it was called.
    pub fn summary(&self) -> Option<RunResult> {
        self.summary.lock().ok().and_then(|s| s.clone())
    }

    fn push(&self, event: String) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event);
        }
    }
}

impl Reporter for RecordingReporter {
    fn tool_found(&self, tool: &str, version: &str) {
        self.push(format!("tool_found:{tool} {version}"));
    }

    fn directory_selected(&self, directory: &Path) {
        self.push(format!("directory_selected:{}", directory.display()));
    }

    fn batch_started(&self, info: &BatchStartInfo) {
        self.push(format!("batch_started:{}", info.total_files));
    }

    fn file_started(&self, context: &FileProgressContext) {
        self.push(format!(
            "file_started:{}/{}",
            context.current_file, context.total_files
        ));
    }

    fn file_succeeded(&self, outcome: &FileOutcome) {
        self.push(format!("file_succeeded:{}", outcome.output.display()));
    }

    fn file_failed(&self, failure: &FileFailure) {
        self.push(format!("file_failed:{}", failure.file.display()));
    }

    fn preview_ready(&self, preview: &PreviewReady) {
        self.push(format!("preview_ready:{}", preview.frame.display()));
    }

    fn warning(&self, message: &str) {
        self.push(format!("warning:{message}"));
    }

    fn error(&self, error: &ReporterError) {
        self.push(format!("error:{}", error.title));
    }

    fn operation_complete(&self, message: &str) {
        self.push(format!("operation_complete:{message}"));
    }

    fn batch_complete(&self, summary: &RunResult) {
        self.push(format!(
            "batch_complete:{}/{}",
            summary.succeeded, summary.attempted
        ));
        if let Ok(mut slot) = self.summary.lock() {
            *slot = Some(summary.clone());
        }
    }
}
