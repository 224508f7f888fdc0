//! Command implementations for the CLI.

/// Module containing the rotation run: settings defaults, collaborator
/// wiring and the call into the core workflow.
pub mod rotate;
