use ahatool_core::defaults::{INPUT_FORMATS, OUTPUT_FORMATS};
use ahatool_core::system::{sandbox_root, unique_dir_name};
use ahatool_core::{AhatoolError, AhatoolResult, Properties};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use uuid::Uuid;

use super::process;
use crate::traits::{ArgumentCheck, BlockRuntime};
use crate::types::{CommandLine, ExecutionTarget, IoPaths, StagedPaths};

/// Runtime working on the local file system
///
/// Staging directories and temporary folders are created under the
/// sandbox root.
#[derive(Debug, Clone)]
pub struct LocalRuntime {
    sandbox: PathBuf,
}

impl LocalRuntime {
    /// Runtime rooted at the default sandbox (AHATOOL_SANDBOX_DIR or the current directory)
    pub fn new() -> Self {
        Self {
            sandbox: sandbox_root(None),
        }
    }

    /// Runtime rooted at a custom directory
    pub fn with_sandbox<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            sandbox: sandbox_root(Some(dir.as_ref())),
        }
    }

    /// Runtime honouring the `sandbox_path` property
    pub fn from_properties(properties: &Properties) -> Self {
        Self {
            sandbox: sandbox_root(properties.sandbox_path.as_deref()),
        }
    }

    pub fn sandbox(&self) -> &Path {
        &self.sandbox
    }

    fn file_name(path: &Path, argument: &str) -> AhatoolResult<PathBuf> {
        path.file_name()
            .map(PathBuf::from)
            .ok_or_else(|| AhatoolError::invalid_argument(argument, "path has no file name"))
    }

    fn check_format(path: &Path, argument: &str, formats: &[&str]) -> AhatoolResult<()> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .unwrap_or_default();

        if formats.contains(&extension.as_str()) {
            Ok(())
        } else {
            Err(AhatoolError::invalid_argument(
                argument,
                format!(
                    "{} has format '{}', accepted formats: {}",
                    path.display(),
                    extension,
                    formats.join(", ")
                ),
            ))
        }
    }
}

impl Default for LocalRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockRuntime for LocalRuntime {
    fn validate_arguments(&self, io: &IoPaths, check: ArgumentCheck) -> AhatoolResult<()> {
        match check {
            ArgumentCheck::Inputs => {
                if !io.input_path.is_file() {
                    return Err(AhatoolError::invalid_argument(
                        "input_path",
                        format!("file does not exist: {}", io.input_path.display()),
                    ));
                }
                Self::check_format(&io.input_path, "input_path", INPUT_FORMATS)?;
                Self::check_format(&io.output_path, "output_path", OUTPUT_FORMATS)?;
                Ok(())
            }
            ArgumentCheck::OutputsCreated { raise } => {
                if io.output_path.exists() {
                    return Ok(());
                }
                if raise {
                    Err(AhatoolError::invalid_argument(
                        "output_path",
                        format!("file was not created: {}", io.output_path.display()),
                    ))
                } else {
                    warn!(
                        output_path = %io.output_path.display(),
                        "Output file was not created"
                    );
                    Ok(())
                }
            }
        }
    }

    fn check_restart(&self, io: &IoPaths, properties: &Properties) -> bool {
        if properties.restart && io.output_path.exists() {
            info!("Restart is enabled and outputs exist, skipping execution");
            return true;
        }
        false
    }

    fn stage_files(&self, io: &IoPaths, target: &ExecutionTarget) -> AhatoolResult<StagedPaths> {
        let unique_dir = self.create_unique_dir()?;

        let input_name = Self::file_name(&io.input_path, "input_path")?;
        let output_name = Self::file_name(&io.output_path, "output_path")?;

        let staged_input = unique_dir.join(&input_name);
        fs::copy(&io.input_path, &staged_input)?;
        let host_output_path = unique_dir.join(&output_name);

        let (input_path, output_path) = match target {
            ExecutionTarget::Host => (staged_input, host_output_path.clone()),
            ExecutionTarget::Container(settings) => (
                settings.volume_path.join(&input_name),
                settings.volume_path.join(&output_name),
            ),
        };

        info!(unique_dir = %unique_dir.display(), "Staged input files");
        Ok(StagedPaths {
            unique_dir: Some(unique_dir),
            input_path,
            output_path,
            host_output_path,
        })
    }

    fn create_unique_dir(&self) -> AhatoolResult<PathBuf> {
        let dir = self.sandbox.join(unique_dir_name(&Uuid::new_v4().to_string()));
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    fn run(
        &self,
        cmd: &CommandLine,
        target: &ExecutionTarget,
        staged: &StagedPaths,
    ) -> AhatoolResult<i32> {
        match target {
            ExecutionTarget::Host => process::run_on_host(cmd),
            ExecutionTarget::Container(settings) => {
                process::run_in_container(settings, staged.unique_dir.as_deref(), cmd)
            }
        }
    }

    fn copy_to_host(&self, staged: &StagedPaths, io: &IoPaths) -> AhatoolResult<()> {
        if staged.host_output_path == io.output_path {
            return Ok(());
        }
        if !staged.host_output_path.exists() {
            warn!(
                staged = %staged.host_output_path.display(),
                "Nothing to copy back, staged output is missing"
            );
            return Ok(());
        }
        if let Some(parent) = io.output_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::copy(&staged.host_output_path, &io.output_path)?;
        Ok(())
    }

    fn remove_tmp_files(&self, paths: &[PathBuf]) -> AhatoolResult<()> {
        for path in paths {
            let result = if path.is_dir() {
                fs::remove_dir_all(path)
            } else if path.exists() {
                fs::remove_file(path)
            } else {
                continue;
            };
            match result {
                Ok(()) => info!(path = %path.display(), "Removed temporary path"),
                Err(e) => warn!(path = %path.display(), error = %e, "Could not remove temporary path"),
            }
        }
        Ok(())
    }
}
