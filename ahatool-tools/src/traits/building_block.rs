//! Trait for building blocks

use ahatool_core::AhatoolResult;

pub trait BuildingBlock {
    /// Name used in logs
    fn name(&self) -> &'static str;

    /// Run the block once and return the tool's exit code
    fn launch(&mut self) -> AhatoolResult<i32>;
}
