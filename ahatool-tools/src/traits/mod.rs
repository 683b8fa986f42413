pub mod building_block;
pub mod runtime;

pub use building_block::BuildingBlock;
pub use runtime::{ArgumentCheck, BlockRuntime};
