//! Capabilities a building block borrows from its runtime

use ahatool_core::{AhatoolResult, Properties};
use std::path::PathBuf;

use crate::types::{CommandLine, ExecutionTarget, IoPaths, StagedPaths};

/// Which side of the execution the paths are checked for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentCheck {
    /// Inputs must exist and every path must carry an accepted extension
    Inputs,
    /// Outputs must exist; when `raise` is false a missing output is only logged
    OutputsCreated { raise: bool },
}

/// Staging, execution and cleanup services used by the adapters
pub trait BlockRuntime {
    /// Reject malformed property values
    fn validate_properties(&self, properties: &Properties) -> AhatoolResult<()> {
        properties.validate()
    }

    /// Check the input/output pair
    fn validate_arguments(&self, io: &IoPaths, check: ArgumentCheck) -> AhatoolResult<()>;

    /// True when execution can be skipped because the outputs already exist
    fn check_restart(&self, io: &IoPaths, properties: &Properties) -> bool;

    /// Copy inputs into a working area and return the paths the command uses
    fn stage_files(&self, io: &IoPaths, target: &ExecutionTarget) -> AhatoolResult<StagedPaths>;

    /// Create a fresh directory that no concurrent caller shares
    fn create_unique_dir(&self) -> AhatoolResult<PathBuf>;

    /// Run the command and return its exit status
    fn run(
        &self,
        cmd: &CommandLine,
        target: &ExecutionTarget,
        staged: &StagedPaths,
    ) -> AhatoolResult<i32>;

    /// Copy produced outputs back to the requested paths
    fn copy_to_host(&self, staged: &StagedPaths, io: &IoPaths) -> AhatoolResult<()>;

    /// Remove temporary files and directories
    fn remove_tmp_files(&self, paths: &[PathBuf]) -> AhatoolResult<()>;
}
