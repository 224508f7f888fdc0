// rotabatch-cli/src/lib.rs
//
// Library portion of the rotabatch CLI application.
// Contains argument definitions and command logic.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod terminal;

// Re-export items needed by the binary or integration tests
pub use cli::Cli;
pub use commands::rotate::run_rotate;
pub use error::{CliResult, exit_code_for, report_for};
