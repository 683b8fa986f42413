use ahatool_core::config::read_properties;
use ahatool_core::AhatoolError;
use ahatool_tools::{Ahatool, AhatoolContainer, BuildingBlock};
use clap::{CommandFactory, FromArgMatches, Parser};
use colored::*;
use std::path::PathBuf;
use std::process;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter
pub const LOG_ENV: &str = "AHATOOL_LOG";

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Wrapper of the AHATool module",
    long_about = "AHATool, an Automatic HMM and Analysis Tool. Builds HMM profiles from \
                  the input sequences or searches existing ones, and packs the results \
                  into a zip archive."
)]
pub struct BlockArgs {
    /// Configuration file (JSON, YAML or TOML) or inline JSON properties
    #[arg(long)]
    pub config: Option<String>,

    /// Path to the input file. Accepted formats: FASTA, HMM, ALN
    #[arg(long = "input_path", value_name = "PATH")]
    pub input_path: PathBuf,

    /// Path to the output file. Accepted formats: zip
    #[arg(long = "output_path", value_name = "PATH")]
    pub output_path: PathBuf,
}

/// Which building block a binary drives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Direct,
    Container,
}

impl BlockKind {
    pub fn binary_name(&self) -> &'static str {
        match self {
            BlockKind::Direct => "ahatool",
            BlockKind::Container => "ahatool_container",
        }
    }
}

/// Parse the process arguments under the binary's own name
pub fn parse_args(kind: BlockKind) -> BlockArgs {
    let matches = BlockArgs::command().name(kind.binary_name()).get_matches();
    BlockArgs::from_arg_matches(&matches).unwrap_or_else(|e| e.exit())
}

/// Initialize logging with AHATOOL_LOG support
pub fn init_logging() {
    let log_level = std::env::var(LOG_ENV).unwrap_or_else(|_| "info".to_string());

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&log_level).unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .try_init();
}

/// Build the block from the arguments and launch it
pub fn run(kind: BlockKind, args: BlockArgs) -> anyhow::Result<i32> {
    let properties = read_properties(args.config.as_deref())?;
    debug!(?properties, "Resolved properties");

    let mut block: Box<dyn BuildingBlock> = match kind {
        BlockKind::Direct => Box::new(Ahatool::new(&args.input_path, &args.output_path, properties)?),
        BlockKind::Container => Box::new(AhatoolContainer::new(
            &args.input_path,
            &args.output_path,
            properties,
        )?),
    };

    Ok(block.launch()?)
}

/// Exit code for an error that stopped the block before or around execution
///
/// These codes share the range of AHATool's own statuses, which are passed
/// through unchanged; the `Error:` line on stderr tells the two apart.
pub fn error_exit_code(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<AhatoolError>() {
        Some(e) if e.is_configuration() => 2,
        Some(AhatoolError::Io(_)) => 3,
        _ => 1,
    }
}

/// Shared `main` of the two binaries; exits with the tool's status
pub fn main_for(kind: BlockKind) -> ! {
    init_logging();
    let args = parse_args(kind);

    match run(kind, args) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            process::exit(error_exit_code(&e));
        }
    }
}
