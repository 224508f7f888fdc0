// ============================================================================
// rotabatch-core/src/availability.rs
// ============================================================================
//
// AVAILABILITY CHECK: Making sure the media tools can be run
//
// ffmpeg is probed with `-version`. When its executable cannot be found the
// user is offered the platform install command. Accepting runs it with the
// terminal attached; either way the run then stops, because a freshly
// installed tool is only picked up by a new process.
//
// exiftool is probed with `-ver` but never installed: a missing exiftool
// only produces a warning, and every file will then fail individually.

// ---- Internal crate imports ----
use crate::config::ToolPaths;
use crate::error::{CoreError, CoreResult, InstallResolution};
use crate::external::{exiftool, ffmpeg, probe_tool, CommandExecutor, ToolCommand};
use crate::prompt::Prompt;
use crate::reporting::Reporter;

/// Probes ffmpeg and exiftool, offering to install ffmpeg when it is missing.
///
/// # Errors
///
/// `CoreError::ToolMissing` when ffmpeg's executable does not exist, with the
/// resolution chosen by the user. A tool that exists but fails to report a
/// version is only warned about.
pub fn ensure_available(
    executor: &dyn CommandExecutor,
    prompt: &dyn Prompt,
    reporter: &dyn Reporter,
    tools: &ToolPaths,
) -> CoreResult<()> {
    let ffmpeg_name = tools.ffmpeg_name();
    match probe_tool(executor, &tools.ffmpeg, ffmpeg::VERSION_ARG) {
        Ok(Some(version)) => reporter.tool_found(&ffmpeg_name, &version),
        Ok(None) => reporter.warning(&format!(
            "{ffmpeg_name} is installed but did not report a version; continuing"
        )),
        Err(CoreError::DependencyNotFound(_)) => {
            let resolution = offer_install(executor, prompt, reporter, tools)?;
            return Err(CoreError::ToolMissing {
                tool: ffmpeg_name,
                resolution,
            });
        }
        Err(e) => {
            log::warn!("Probing {ffmpeg_name} failed: {e}");
            reporter.warning(&format!("Could not run {ffmpeg_name}: {e}; continuing"));
        }
    }

    let exiftool_name = tools.exiftool_name();
    match probe_tool(executor, &tools.exiftool, exiftool::VERSION_ARG) {
        Ok(Some(version)) => reporter.tool_found(&exiftool_name, &version),
        Ok(None) => reporter.warning(&format!(
            "{exiftool_name} is installed but did not report a version"
        )),
        Err(e) => {
            log::warn!("Probing {exiftool_name} failed: {e}");
            reporter.warning(&format!(
                "{exiftool_name} is not available; rotation tags cannot be written"
            ));
        }
    }

    Ok(())
}

fn offer_install(
    executor: &dyn CommandExecutor,
    prompt: &dyn Prompt,
    reporter: &dyn Reporter,
    tools: &ToolPaths,
) -> CoreResult<InstallResolution> {
    let Some((program, args)) = tools.install_command.split_first() else {
        log::warn!("No install command configured");
        return Ok(InstallResolution::Declined);
    };
    let install_line = tools.install_command.join(" ");

    let question = format!(
        "{} is not installed. Install it now with '{}'?",
        tools.ffmpeg_name(),
        install_line
    );
    if !prompt.confirm(&question)? {
        log::info!("User declined to install {}", tools.ffmpeg_name());
        return Ok(InstallResolution::Declined);
    }

    log::info!("Running install command: {install_line}");
    let command = ToolCommand::new(program).args(args).inherit_output();
    match executor.execute(&command) {
        Ok(output) if output.is_success() => {
            reporter.operation_complete(&format!(
                "{} installed. Please re-run rotabatch.",
                tools.ffmpeg_name()
            ));
            Ok(InstallResolution::Installed)
        }
        Ok(output) => {
            log::error!("{}", output.failure_detail(&command.program_name()));
            Ok(InstallResolution::InstallFailed)
        }
        Err(e) => {
            log::error!("Could not run '{install_line}': {e}");
            Ok(InstallResolution::InstallFailed)
        }
    }
}
