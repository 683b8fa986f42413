//! Recording runtime for adapter tests

use ahatool_core::{AhatoolError, AhatoolResult, Properties};
use std::cell::{Cell, RefCell};
use std::path::PathBuf;

use crate::traits::{ArgumentCheck, BlockRuntime};
use crate::types::{CommandLine, ExecutionTarget, IoPaths, StagedPaths};

/// A call observed by [`MockRuntime`]
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeCall {
    ValidateProperties,
    ValidateArguments(ArgumentCheck),
    CheckRestart,
    StageFiles,
    CreateUniqueDir(PathBuf),
    Run {
        command: CommandLine,
        target: ExecutionTarget,
    },
    CopyToHost,
    RemoveTmpFiles(Vec<PathBuf>),
}

/// Runtime that touches nothing and records every call
///
/// Staging is the identity, so commands reference the requested paths.
#[derive(Debug, Default)]
pub struct MockRuntime {
    outputs_exist: bool,
    exit_code: i32,
    run_error: Option<String>,
    calls: RefCell<Vec<RuntimeCall>>,
    dir_counter: Cell<usize>,
}

impl MockRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend the outputs are already on disk
    pub fn with_existing_outputs(mut self) -> Self {
        self.outputs_exist = true;
        self
    }

    /// Exit code returned by `run`
    pub fn with_exit_code(mut self, code: i32) -> Self {
        self.exit_code = code;
        self
    }

    /// Make `run` fail as if the tool could not be spawned
    pub fn with_run_error(mut self, message: impl Into<String>) -> Self {
        self.run_error = Some(message.into());
        self
    }

    pub fn calls(&self) -> Vec<RuntimeCall> {
        self.calls.borrow().clone()
    }

    /// Commands passed to `run`, in order
    pub fn commands(&self) -> Vec<CommandLine> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                RuntimeCall::Run { command, .. } => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    /// Execution targets passed to `run`, in order
    pub fn targets(&self) -> Vec<ExecutionTarget> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                RuntimeCall::Run { target, .. } => Some(target.clone()),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: RuntimeCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl BlockRuntime for MockRuntime {
    fn validate_properties(&self, properties: &Properties) -> AhatoolResult<()> {
        self.record(RuntimeCall::ValidateProperties);
        properties.validate()
    }

    fn validate_arguments(&self, _io: &IoPaths, check: ArgumentCheck) -> AhatoolResult<()> {
        self.record(RuntimeCall::ValidateArguments(check));
        Ok(())
    }

    fn check_restart(&self, _io: &IoPaths, properties: &Properties) -> bool {
        self.record(RuntimeCall::CheckRestart);
        properties.restart && self.outputs_exist
    }

    fn stage_files(&self, io: &IoPaths, _target: &ExecutionTarget) -> AhatoolResult<StagedPaths> {
        self.record(RuntimeCall::StageFiles);
        let mut staged = StagedPaths::unstaged(io);
        staged.unique_dir = Some(PathBuf::from("/mock/staging"));
        Ok(staged)
    }

    fn create_unique_dir(&self) -> AhatoolResult<PathBuf> {
        let n = self.dir_counter.get() + 1;
        self.dir_counter.set(n);
        let dir = PathBuf::from(format!("/mock/tmp_{}", n));
        self.record(RuntimeCall::CreateUniqueDir(dir.clone()));
        Ok(dir)
    }

    fn run(
        &self,
        cmd: &CommandLine,
        target: &ExecutionTarget,
        _staged: &StagedPaths,
    ) -> AhatoolResult<i32> {
        self.record(RuntimeCall::Run {
            command: cmd.clone(),
            target: target.clone(),
        });
        match &self.run_error {
            Some(message) => Err(AhatoolError::Execution(message.clone())),
            None => Ok(self.exit_code),
        }
    }

    fn copy_to_host(&self, _staged: &StagedPaths, _io: &IoPaths) -> AhatoolResult<()> {
        self.record(RuntimeCall::CopyToHost);
        Ok(())
    }

    fn remove_tmp_files(&self, paths: &[PathBuf]) -> AhatoolResult<()> {
        self.record(RuntimeCall::RemoveTmpFiles(paths.to_vec()));
        Ok(())
    }
}
