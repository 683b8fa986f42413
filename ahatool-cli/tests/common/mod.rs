#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Stand-in for AHATool.sh: writes its arguments into the output archive
pub const FAKE_AHATOOL: &str = r#"#!/bin/sh
out=""
prev=""
for arg in "$@"; do
    out="$prev"
    prev="$arg"
done
printf '%s\n' "$*" > "$out"
"#;

/// Isolated directory with an input FASTA and a sandbox
pub struct TestEnvironment {
    pub temp_dir: TempDir,
}

impl TestEnvironment {
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.temp_dir.path().join(name)
    }

    pub fn input_fasta(&self) -> PathBuf {
        let path = self.path("test.fasta");
        fs::write(&path, ">seq1 test protein\nMKVLAAGIVALLLAAGCSS\n").unwrap();
        path
    }

    pub fn script(&self, name: &str, body: &str) -> PathBuf {
        write_executable(&self.path(name), body)
    }

    pub fn config(&self, name: &str, body: &str) -> PathBuf {
        let path = self.path(name);
        fs::write(&path, body).unwrap();
        path
    }
}

pub fn write_executable(path: &Path, body: &str) -> PathBuf {
    fs::write(path, body).unwrap();
    let mut perms = fs::metadata(path).unwrap().permissions();
    perms.set_mode(0o755);
    fs::set_permissions(path, perms).unwrap();
    path.to_path_buf()
}

pub fn ahatool_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ahatool").unwrap();
    cmd.env("AHATOOL_LOG", "warn");
    cmd
}

pub fn ahatool_container_cmd() -> Command {
    let mut cmd = Command::cargo_bin("ahatool_container").unwrap();
    cmd.env("AHATOOL_LOG", "warn");
    cmd
}
