//! AHATool inside a container

use ahatool_core::defaults::DEFAULT_CONTAINER_BINARY_PATH;
use ahatool_core::{AhatoolResult, Properties};
use std::path::Path;
use tracing::info;

use super::{launch_pipeline, validate_block};
use crate::instructions::{build_instructions, resolve_database, DatabaseSelection};
use crate::runtime::LocalRuntime;
use crate::traits::{BlockRuntime, BuildingBlock};
use crate::types::{CommandLine, ContainerSettings, ExecutionTarget, IoPaths, StagedPaths};

/// Wrapper of the AHATool script running in a container image
///
/// A custom database is mounted into the container at `/home/database`;
/// the bundled `nr.fa` needs no mount and no flag.
pub struct AhatoolContainer<R: BlockRuntime = LocalRuntime> {
    io: IoPaths,
    properties: Properties,
    binary_path: String,
    settings: ContainerSettings,
    runtime: R,
    cmd: Option<CommandLine>,
    target: Option<ExecutionTarget>,
}

impl AhatoolContainer<LocalRuntime> {
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

impl<R: BlockRuntime> AhatoolContainer<R> {
    /// Create the block on a given runtime; properties and paths are validated here
    pub fn with_runtime<I: AsRef<Path>, O: AsRef<Path>>(
        input_path: I,
        output_path: O,
        properties: Properties,
        runtime: R,
    ) -> AhatoolResult<Self> {
        let io = IoPaths::new(input_path, output_path);
        validate_block(&runtime, &io, &properties)?;
        let settings = ContainerSettings::from_properties(&properties)?;

        let binary_path = properties.binary_path_or(DEFAULT_CONTAINER_BINARY_PATH).to_string();
        Ok(Self {
            io,
            properties,
            binary_path,
            settings,
            runtime,
            cmd: None,
            target: None,
        })
    }

    /// Database flag and mount derived from the `database` property
    pub fn database_selection(&self) -> DatabaseSelection {
        match &self.properties.database {
            Some(database) => resolve_database(database),
            None => DatabaseSelection::Bundled,
        }
    }

    /// Execution target, including the database mount when one is needed
    pub fn execution_target(&self, selection: &DatabaseSelection) -> ExecutionTarget {
        let mut settings = self.settings.clone();
        if let Some(mount) = selection.mount() {
            info!(mount = %mount.volume_arg(), "Mounting custom database");
            settings = settings.with_mount(mount.clone());
        }
        ExecutionTarget::Container(settings)
    }

    /// Command line for the given staged paths
    pub fn build_command(&self, selection: &DatabaseSelection, staged: &StagedPaths) -> CommandLine {
        let instructions = build_instructions(&self.properties, selection.flag_value());
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

    /// Execution target of the last launch, if it executed
    pub fn last_target(&self) -> Option<&ExecutionTarget> {
        self.target.as_ref()
    }

    pub fn settings(&self) -> &ContainerSettings {
        &self.settings
    }

    pub fn io_paths(&self) -> &IoPaths {
        &self.io
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }
}

impl<R: BlockRuntime> BuildingBlock for AhatoolContainer<R> {
    fn name(&self) -> &'static str {
        "ahatool_container"
    }

    fn launch(&mut self) -> AhatoolResult<i32> {
        let selection = self.database_selection();
        let target = self.execution_target(&selection);

        let (code, cmd) = launch_pipeline(
            self.name(),
            &self.runtime,
            &self.io,
            &self.properties,
            &target,
            |staged| self.build_command(&selection, staged),
        )?;
        if cmd.is_some() {
            self.target = Some(target);
        }
        self.cmd = cmd;
        Ok(code)
    }
}

/// Create an [`AhatoolContainer`] block and launch it
pub fn ahatool_container<I: AsRef<Path>, O: AsRef<Path>>(
    input_path: I,
    output_path: O,
    properties: Properties,
) -> AhatoolResult<i32> {
    AhatoolContainer::new(input_path, output_path, properties)?.launch()
}
