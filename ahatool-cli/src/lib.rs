//! Command line entry points for the AHATool building blocks

pub mod cli;

pub use cli::{init_logging, main_for, run, BlockArgs, BlockKind};
