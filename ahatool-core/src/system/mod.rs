pub mod paths;

// Re-export commonly used functions
pub use paths::{absolutize, generate_utc_timestamp, sandbox_root, unique_dir_name, SANDBOX_DIR_ENV};
