//! Test doubles for the building block runtime

mod mock;

pub use mock::{MockRuntime, RuntimeCall};
