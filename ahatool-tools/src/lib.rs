//! AHATool building blocks
//!
//! Wraps the external AHATool script (an Automatic HMM and Analysis Tool)
//! behind the biobb building block contract: validate properties and
//! paths, stage files, assemble the command line, run it on the host or in
//! a container, copy the results back and report the exit code.

// Modules
pub mod adapters;
pub mod instructions;
pub mod runtime;
pub mod testing;
pub mod traits;
pub mod types;

// Re-exports for convenience
pub use adapters::{ahatool, ahatool_container, Ahatool, AhatoolContainer};
pub use runtime::LocalRuntime;
pub use testing::MockRuntime;
pub use traits::{ArgumentCheck, BlockRuntime, BuildingBlock};
pub use types::{CommandLine, ContainerRuntime, ContainerSettings, ExecutionTarget, IoPaths, Mount, StagedPaths};
