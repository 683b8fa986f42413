//! Runtime implementations backing the building blocks

mod local;
pub mod process;

pub use local::LocalRuntime;
