// rotabatch-cli/src/main.rs
//
// Entry point for the `rotabatch` binary.
//
// Responsibilities:
// - Parsing command-line arguments.
// - Setting up color handling and logging.
// - Choosing the reporter and prompt for the requested output style.
// - Running the batch and mapping the outcome to an exit code.

use clap::Parser;
use rotabatch_cli::{Cli, exit_code_for, logging, report_for, run_rotate, terminal};
use rotabatch_core::CoreError;
use rotabatch_core::prompt::{Prompt, StdioPrompt};
use rotabatch_core::reporting::{JsonReporter, Reporter, TerminalReporter};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse();
    terminal::init_color();

    match logging::init_logging(cli.verbose, cli.log_dir.as_deref()) {
        Ok(Some(path)) => log::info!("Logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            terminal::print_error(&format!("{e:#}"));
            return ExitCode::FAILURE;
        }
    }

    // JSON mode keeps stdout for events; questions go to stderr
    let reporter: Box<dyn Reporter> = if cli.progress_json {
        Box::new(JsonReporter::new())
    } else {
        Box::new(TerminalReporter::new())
    };
    let prompt: Box<dyn Prompt> = if cli.progress_json {
        Box::new(StdioPrompt::new(io::stdin().lock(), io::stderr()))
    } else {
        Box::new(StdioPrompt::stdio())
    };

    let result = run_rotate(&cli, reporter.as_ref(), prompt.as_ref());
    match &result {
        Ok(summary) => log::info!(
            "Finished: {} of {} succeeded",
            summary.succeeded,
            summary.attempted
        ),
        // The installer already asked the user to re-run
        Err(CoreError::ToolMissing { .. }) if exit_code_for(&result) == 0 => {}
        Err(e) => {
            log::debug!("Run failed: {e:?}");
            reporter.error(&report_for(e));
        }
    }

    ExitCode::from(exit_code_for(&result))
}
