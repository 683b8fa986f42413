//! AHATool on the host

use ahatool_core::defaults::DEFAULT_BINARY_PATH;
use ahatool_core::{AhatoolResult, Properties};
use std::path::Path;

use super::{launch_pipeline, validate_block};
use crate::instructions::build_instructions;
use crate::runtime::LocalRuntime;
use crate::traits::{BlockRuntime, BuildingBlock};
use crate::types::{CommandLine, ExecutionTarget, IoPaths, StagedPaths};

/// Wrapper of the AHATool script running directly on the host
///
/// Input: FASTA, HMM or ALN file. Output: zip archive with the produced
/// profiles and search results.
pub struct Ahatool<R: BlockRuntime = LocalRuntime> {
    io: IoPaths,
    properties: Properties,
    binary_path: String,
    runtime: R,
    cmd: Option<CommandLine>,
}

impl Ahatool<LocalRuntime> {
    /// Create the block with a [`LocalRuntime`] honouring `sandbox_path`
    pub fn new<I: AsRef<Path>, O: AsRef<Path>>(
        input_path: I,
        output_path: O,
        properties: Properties,
    ) -> AhatoolResult<Self> {
        let runtime = LocalRuntime::from_properties(&properties);
        Self::with_runtime(input_path, output_path, properties, runtime)
    }
}

impl<R: BlockRuntime> Ahatool<R> {
    /// Create the block on a given runtime; properties and paths are validated here
    pub fn with_runtime<I: AsRef<Path>, O: AsRef<Path>>(
        input_path: I,
        output_path: O,
        properties: Properties,
        runtime: R,
    ) -> AhatoolResult<Self> {
        let io = IoPaths::new(input_path, output_path);
        validate_block(&runtime, &io, &properties)?;

        let binary_path = properties.binary_path_or(DEFAULT_BINARY_PATH).to_string();
        Ok(Self {
            io,
            properties,
            binary_path,
            runtime,
            cmd: None,
        })
    }

    /// Command line for the given staged paths
    pub fn build_command(&self, staged: &StagedPaths) -> CommandLine {
        let instructions = build_instructions(&self.properties, self.properties.database.as_deref());
        CommandLine::new(
            self.binary_path.clone(),
            instructions,
            &staged.output_path,
            &staged.input_path,
        )
    }

    /// Command of the last launch, if it executed
    pub fn command(&self) -> Option<&CommandLine> {
        self.cmd.as_ref()
    }

    pub fn io_paths(&self) -> &IoPaths {
        &self.io
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }
}

impl<R: BlockRuntime> BuildingBlock for Ahatool<R> {
    fn name(&self) -> &'static str {
        "ahatool"
    }

    fn launch(&mut self) -> AhatoolResult<i32> {
        let (code, cmd) = launch_pipeline(
            self.name(),
            &self.runtime,
            &self.io,
            &self.properties,
            &ExecutionTarget::Host,
            |staged| self.build_command(staged),
        )?;
        self.cmd = cmd;
        Ok(code)
    }
}

/// Create an [`Ahatool`] block and launch it
pub fn ahatool<I: AsRef<Path>, O: AsRef<Path>>(
    input_path: I,
    output_path: O,
    properties: Properties,
) -> AhatoolResult<i32> {
    Ahatool::new(input_path, output_path, properties)?.launch()
}
