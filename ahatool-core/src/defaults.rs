//! Default values for the AHATool building block properties
//!
//! `start`, `database`, `evalue` and `threads` defaults are the ones AHATool
//! applies itself when the corresponding flag is absent. They are documented
//! here but never injected into the command line.

/// Default script for direct (host) execution
pub const DEFAULT_BINARY_PATH: &str = "AHATool.sh";

/// Default script location inside the AHATool container image
pub const DEFAULT_CONTAINER_BINARY_PATH: &str = "../AHATools/AHATool.sh";

pub const DEFAULT_START: &str = "build";
pub const DEFAULT_EVALUE: f64 = 1e-10;
pub const DEFAULT_THREADS: u32 = 2;

/// File name of the database bundled with the AHATool image
pub const DEFAULT_DATABASE_NAME: &str = "nr.fa";

/// Mount point for custom databases inside the container
pub const CONTAINER_DATABASE_DIR: &str = "/home/database";

pub const DEFAULT_REMOVE_TMP: bool = true;
pub const DEFAULT_RESTART: bool = false;

pub const DEFAULT_CONTAINER_PATH: &str = "docker";
pub const DEFAULT_CONTAINER_IMAGE: &str = "bsceapm/ahatool:1.8";
pub const DEFAULT_CONTAINER_VOLUME_PATH: &str = "/home/projects";
pub const DEFAULT_CONTAINER_SHELL_PATH: &str = "/bin/bash";

/// Accepted input extensions: FASTA, HMM and ALN
pub const INPUT_FORMATS: &[&str] = &["fasta", "fa", "hmm", "aln"];

/// Accepted output extensions
pub const OUTPUT_FORMATS: &[&str] = &["zip"];
