//! Process invocation on the host or through a container runtime

use ahatool_core::{AhatoolError, AhatoolResult};
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use tracing::{debug, info, warn};

use crate::types::{CommandLine, ContainerSettings, Mount};

/// Arguments passed to the container runtime binary
///
/// `staging_dir` is mounted at the settings' volume path so the staged
/// files resolve inside the container.
pub fn container_args(
    settings: &ContainerSettings,
    staging_dir: Option<&Path>,
    cmd: &CommandLine,
) -> Vec<String> {
    let mut mounts: Vec<Mount> = Vec::new();
    if let Some(dir) = staging_dir {
        mounts.push(Mount::new(dir, &settings.volume_path));
    }
    mounts.extend(settings.mounts.iter().cloned());

    let mut args = Vec::new();
    if settings.runtime.is_oci() {
        args.push("run".to_string());
        args.push("--rm".to_string());
        for mount in &mounts {
            args.push("-v".to_string());
            args.push(mount.volume_arg());
        }
        if let Some(dir) = &settings.working_dir {
            args.push("-w".to_string());
            args.push(dir.clone());
        }
        if let Some(uid) = &settings.user_id {
            args.push("--user".to_string());
            args.push(uid.clone());
        }
    } else {
        args.push("exec".to_string());
        for mount in &mounts {
            args.push("--bind".to_string());
            args.push(mount.volume_arg());
        }
        if let Some(dir) = &settings.working_dir {
            args.push("--pwd".to_string());
            args.push(dir.clone());
        }
    }

    args.push(settings.image.clone());
    args.push(settings.shell_path.clone());
    args.push("-c".to_string());
    args.push(cmd.to_shell_string());
    args
}

/// Locate the container runtime on PATH, keeping the configured value if it is not found
pub fn resolve_container_binary(container_path: &str) -> PathBuf {
    match which::which(container_path) {
        Ok(path) => path,
        Err(_) => {
            warn!(container_path = %container_path, "Container runtime not found on PATH");
            PathBuf::from(container_path)
        }
    }
}

/// Run `program` to completion, log its output and return the exit code
pub fn run_logged(program: &Path, args: &[String]) -> AhatoolResult<i32> {
    debug!(program = %program.display(), ?args, "Spawning process");

    let output = Command::new(program).args(args).output().map_err(|e| {
        AhatoolError::Execution(format!("failed to start {}: {}", program.display(), e))
    })?;

    for line in String::from_utf8_lossy(&output.stdout).lines() {
        info!(target: "ahatool::stdout", "{}", line);
    }
    for line in String::from_utf8_lossy(&output.stderr).lines() {
        warn!(target: "ahatool::stderr", "{}", line);
    }

    let code = exit_code(output.status);
    info!("Exit code {}", code);
    Ok(code)
}

/// Run a command line on the host; the binary is spawned directly, no shell involved
pub fn run_on_host(cmd: &CommandLine) -> AhatoolResult<i32> {
    run_logged(Path::new(&cmd.binary_path), &cmd.to_exec_args())
}

/// Run a command line inside a container
pub fn run_in_container(
    settings: &ContainerSettings,
    staging_dir: Option<&Path>,
    cmd: &CommandLine,
) -> AhatoolResult<i32> {
    let program = resolve_container_binary(&settings.container_path);
    run_logged(&program, &container_args(settings, staging_dir, cmd))
}

/// Exit code of a finished process; a process killed by signal `n` reports `-n`
pub fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return -signal;
        }
    }
    -1
}
