use std::path::{Path, PathBuf};

/// Environment variable overriding the sandbox root
pub const SANDBOX_DIR_ENV: &str = "AHATOOL_SANDBOX_DIR";

/// Generate a UTC timestamp for unique directory names
/// Returns format: YYYYMMDD_HHMMSS (in UTC timezone)
pub fn generate_utc_timestamp() -> String {
    chrono::Utc::now().format("%Y%m%d_%H%M%S").to_string()
}

/// Name of a per-invocation working directory: `ahatool_<timestamp>_<id>`
pub fn unique_dir_name(id: &str) -> String {
    format!("ahatool_{}_{}", generate_utc_timestamp(), id)
}

/// Make a path absolute against the current directory without touching the file system
pub fn absolutize(path: &Path) -> PathBuf {
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match std::env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
}

/// Get the sandbox root where working directories are created
/// Uses the `sandbox_path` property when given, then AHATOOL_SANDBOX_DIR,
/// falling back to the current directory. Not cached: the property can
/// differ between building blocks in one process.
pub fn sandbox_root(sandbox_path: Option<&Path>) -> PathBuf {
    let root = match sandbox_path {
        Some(path) => path.to_path_buf(),
        None => std::env::var(SANDBOX_DIR_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(".")),
    };
    absolutize(&root)
}
