//! Core types shared across the AHATool building block crates

pub mod config;
pub mod defaults;
pub mod error;
pub mod system;

// Re-export commonly used types
pub use config::{read_properties, Properties, StartMode};
pub use error::{AhatoolError, AhatoolResult};

// Re-export system utilities
pub use system::{generate_utc_timestamp, sandbox_root};
