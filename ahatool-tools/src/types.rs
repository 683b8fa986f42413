//! Common types for the AHATool building blocks

use ahatool_core::defaults;
use ahatool_core::{AhatoolError, AhatoolResult, Properties};
use std::fmt;
use std::path::{Path, PathBuf};

/// Input/output file pair of a building block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoPaths {
    /// FASTA, HMM or ALN file
    pub input_path: PathBuf,
    /// Zip archive produced by AHATool
    pub output_path: PathBuf,
}

impl IoPaths {
    pub fn new<I: AsRef<Path>, O: AsRef<Path>>(input_path: I, output_path: O) -> Self {
        Self {
            input_path: input_path.as_ref().to_path_buf(),
            output_path: output_path.as_ref().to_path_buf(),
        }
    }
}

/// Paths after staging
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedPaths {
    /// Working directory holding the staged files, if one was created
    pub unique_dir: Option<PathBuf>,
    /// Input path as the command sees it
    pub input_path: PathBuf,
    /// Output path as the command sees it
    pub output_path: PathBuf,
    /// Where the produced output lands on the host
    pub host_output_path: PathBuf,
}

impl StagedPaths {
    /// No staging: the command works on the requested paths directly
    pub fn unstaged(io: &IoPaths) -> Self {
        Self {
            unique_dir: None,
            input_path: io.input_path.clone(),
            output_path: io.output_path.clone(),
            host_output_path: io.output_path.clone(),
        }
    }
}

/// Command line handed to AHATool
///
/// AHATool reads its arguments positionally: flags, then the output
/// archive, then the input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub binary_path: String,
    pub instructions: Vec<String>,
    pub output_path: PathBuf,
    pub input_path: PathBuf,
}

impl CommandLine {
    pub fn new(
        binary_path: impl Into<String>,
        instructions: Vec<String>,
        output_path: &Path,
        input_path: &Path,
    ) -> Self {
        Self {
            binary_path: binary_path.into(),
            instructions,
            output_path: output_path.to_path_buf(),
            input_path: input_path.to_path_buf(),
        }
    }

    /// The four command elements: binary, joined flags, output, input
    pub fn to_args(&self) -> Vec<String> {
        vec![
            self.binary_path.clone(),
            self.instructions.join(" "),
            self.output_path.to_string_lossy().into_owned(),
            self.input_path.to_string_lossy().into_owned(),
        ]
    }

    /// Arguments after the binary when it is spawned without a shell
    ///
    /// Each instruction is `-x value`; flag and value become separate
    /// arguments so values may contain spaces.
    pub fn to_exec_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        for instruction in &self.instructions {
            match instruction.split_once(' ') {
                Some((flag, value)) => {
                    args.push(flag.to_string());
                    args.push(value.to_string());
                }
                None => args.push(instruction.clone()),
            }
        }
        args.push(self.output_path.to_string_lossy().into_owned());
        args.push(self.input_path.to_string_lossy().into_owned());
        args
    }

    /// Single string for `<shell> -c` inside a container, every word quoted as needed
    pub fn to_shell_string(&self) -> String {
        std::iter::once(self.binary_path.clone())
            .chain(self.to_exec_args())
            .map(|word| shell_quote(&word))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Quote a word for a POSIX shell; words made of safe characters pass through
pub fn shell_quote(word: &str) -> String {
    let safe = !word.is_empty()
        && word
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "_-./:=@,+%".contains(c));
    if safe {
        word.to_string()
    } else {
        format!("'{}'", word.replace('\'', "'\\''"))
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_shell_string())
    }
}

/// Bind mount from the host into the container
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host_path: PathBuf,
    pub container_path: PathBuf,
}

impl Mount {
    pub fn new<H: AsRef<Path>, C: AsRef<Path>>(host_path: H, container_path: C) -> Self {
        Self {
            host_path: host_path.as_ref().to_path_buf(),
            container_path: container_path.as_ref().to_path_buf(),
        }
    }

    /// `host:container`, as both docker `-v` and singularity `--bind` expect
    pub fn volume_arg(&self) -> String {
        format!("{}:{}", self.host_path.display(), self.container_path.display())
    }
}

/// Supported container runtimes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerRuntime {
    Docker,
    Podman,
    Singularity,
    Apptainer,
}

impl ContainerRuntime {
    /// Detect the runtime from `container_path`, which may be a bare name or a full path
    pub fn detect(container_path: &str) -> AhatoolResult<Self> {
        let name = Path::new(container_path)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(container_path);

        match name.to_lowercase().as_str() {
            "docker" => Ok(ContainerRuntime::Docker),
            "podman" => Ok(ContainerRuntime::Podman),
            "singularity" => Ok(ContainerRuntime::Singularity),
            "apptainer" => Ok(ContainerRuntime::Apptainer),
            other => Err(AhatoolError::invalid_property(
                "container_path",
                format!("unsupported container runtime '{}'", other),
            )),
        }
    }

    /// Docker-compatible command line syntax
    pub fn is_oci(&self) -> bool {
        matches!(self, ContainerRuntime::Docker | ContainerRuntime::Podman)
    }
}

/// Container settings resolved from the property set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContainerSettings {
    pub runtime: ContainerRuntime,
    pub container_path: String,
    pub image: String,
    pub volume_path: PathBuf,
    pub working_dir: Option<String>,
    pub shell_path: String,
    pub user_id: Option<String>,
    /// Extra mounts besides the staging volume
    pub mounts: Vec<Mount>,
}

impl ContainerSettings {
    pub fn from_properties(properties: &Properties) -> AhatoolResult<Self> {
        let container_path = properties
            .container_path
            .clone()
            .unwrap_or_else(|| defaults::DEFAULT_CONTAINER_PATH.to_string());
        let runtime = ContainerRuntime::detect(&container_path)?;

        Ok(Self {
            runtime,
            container_path,
            image: properties
                .container_image
                .clone()
                .unwrap_or_else(|| defaults::DEFAULT_CONTAINER_IMAGE.to_string()),
            volume_path: PathBuf::from(
                properties
                    .container_volume_path
                    .as_deref()
                    .unwrap_or(defaults::DEFAULT_CONTAINER_VOLUME_PATH),
            ),
            working_dir: properties.container_working_dir.clone(),
            shell_path: properties
                .container_shell_path
                .clone()
                .unwrap_or_else(|| defaults::DEFAULT_CONTAINER_SHELL_PATH.to_string()),
            user_id: properties.container_user_id.clone(),
            mounts: Vec::new(),
        })
    }

    pub fn with_mount(mut self, mount: Mount) -> Self {
        self.mounts.push(mount);
        self
    }
}

/// Where the command runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionTarget {
    Host,
    Container(ContainerSettings),
}

impl ExecutionTarget {
    pub fn container(&self) -> Option<&ContainerSettings> {
        match self {
            ExecutionTarget::Host => None,
            ExecutionTarget::Container(settings) => Some(settings),
        }
    }
}
