//! AHATool building blocks

mod ahatool;
mod container;

pub use ahatool::{ahatool, Ahatool};
pub use container::{ahatool_container, AhatoolContainer};

use ahatool_core::{AhatoolResult, Properties};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{info, info_span};

use crate::traits::{ArgumentCheck, BlockRuntime};
use crate::types::{CommandLine, ExecutionTarget, IoPaths, StagedPaths};

/// Shared `launch()` pipeline of both building blocks
///
/// Returns the exit code together with the command that ran, `None` when
/// the restart check skipped execution.
pub(crate) fn launch_pipeline<R, F>(
    name: &'static str,
    runtime: &R,
    io: &IoPaths,
    properties: &Properties,
    target: &ExecutionTarget,
    build_command: F,
) -> AhatoolResult<(i32, Option<CommandLine>)>
where
    R: BlockRuntime,
    F: FnOnce(&StagedPaths) -> CommandLine,
{
    let span = info_span!("launch", block = name);
    let _enter = span.enter();
    let started = Instant::now();
    info!("Executing {}", name);

    if runtime.check_restart(io, properties) {
        return Ok((0, None));
    }
    let staged = runtime.stage_files(io, target)?;
    let mut tmp_files: Vec<PathBuf> = staged.unique_dir.iter().cloned().collect();

    let outcome = execute(runtime, io, target, &staged, &mut tmp_files, build_command);

    // Temporary files go on both the success and the error path
    let cleanup = if properties.remove_tmp {
        runtime.remove_tmp_files(&tmp_files)
    } else {
        info!(count = tmp_files.len(), "Keeping temporary files");
        Ok(())
    };
    let (return_code, cmd) = outcome?;
    cleanup?;

    runtime.validate_arguments(io, ArgumentCheck::OutputsCreated { raise: false })?;

    info!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        return_code, "Finished {}", name
    );
    Ok((return_code, Some(cmd)))
}

/// Temp folder, command, run and copy back; created paths are pushed to `tmp_files`
fn execute<R, F>(
    runtime: &R,
    io: &IoPaths,
    target: &ExecutionTarget,
    staged: &StagedPaths,
    tmp_files: &mut Vec<PathBuf>,
    build_command: F,
) -> AhatoolResult<(i32, CommandLine)>
where
    R: BlockRuntime,
    F: FnOnce(&StagedPaths) -> CommandLine,
{
    let tmp_folder = runtime.create_unique_dir()?;
    info!("Creating {} temporary folder", tmp_folder.display());
    tmp_files.push(tmp_folder);

    let cmd = build_command(staged);
    info!(command = %cmd, "Creating command line with instructions and required arguments");

    let return_code = runtime.run(&cmd, target, staged)?;
    runtime.copy_to_host(staged, io)?;
    Ok((return_code, cmd))
}

/// Constructor checks shared by both building blocks
pub(crate) fn validate_block<R: BlockRuntime>(
    runtime: &R,
    io: &IoPaths,
    properties: &Properties,
) -> AhatoolResult<()> {
    runtime.validate_properties(properties)?;
    runtime.validate_arguments(io, ArgumentCheck::Inputs)
}
