//! Translation of the property set into AHATool flags

use ahatool_core::config::format_evalue;
use ahatool_core::defaults::{CONTAINER_DATABASE_DIR, DEFAULT_DATABASE_NAME};
use ahatool_core::system::absolutize;
use ahatool_core::Properties;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::types::Mount;

/// Build the optional flags in AHATool's fixed order: prefix, start,
/// database, evalue, threads. Absent properties contribute nothing.
///
/// `database` is passed separately because the container block rewrites it.
pub fn build_instructions(properties: &Properties, database: Option<&str>) -> Vec<String> {
    let mut instructions = Vec::new();

    if let Some(prefix) = &properties.prefix {
        instructions.push(format!("-p {}", prefix));
        debug!("Appending optional prefix");
    }
    if let Some(start) = properties.start {
        instructions.push(format!("-s {}", start));
        debug!("Appending optional start");
    }
    if let Some(database) = database {
        instructions.push(format!("-d {}", database));
        debug!("Appending optional database");
    }
    if let Some(evalue) = properties.evalue {
        instructions.push(format!("-e {}", format_evalue(evalue)));
        debug!("Appending optional evalue");
    }
    if let Some(threads) = properties.threads {
        instructions.push(format!("-t {}", threads));
        debug!("Appending optional threads");
    }

    instructions
}

/// Database choice for the container block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseSelection {
    /// `nr.fa` shipped in the image; no flag, no mount
    Bundled,
    /// Custom file mounted from the host
    Custom { flag_value: String, mount: Mount },
}

impl DatabaseSelection {
    pub fn flag_value(&self) -> Option<&str> {
        match self {
            DatabaseSelection::Bundled => None,
            DatabaseSelection::Custom { flag_value, .. } => Some(flag_value),
        }
    }

    pub fn mount(&self) -> Option<&Mount> {
        match self {
            DatabaseSelection::Bundled => None,
            DatabaseSelection::Custom { mount, .. } => Some(mount),
        }
    }
}

/// Map a host database path to its location inside the container
pub fn resolve_database(database: &str) -> DatabaseSelection {
    let path = Path::new(database);
    let file_name = match path.file_name() {
        Some(name) => name,
        None => return DatabaseSelection::Bundled,
    };
    if file_name == DEFAULT_DATABASE_NAME {
        return DatabaseSelection::Bundled;
    }

    let host_dir = absolutize(path)
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("/"));
    let container_dir = Path::new(CONTAINER_DATABASE_DIR);

    DatabaseSelection::Custom {
        flag_value: container_dir.join(file_name).to_string_lossy().into_owned(),
        mount: Mount::new(host_dir, container_dir),
    }
}
