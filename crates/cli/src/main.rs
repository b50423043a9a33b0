mod cmd;
mod output;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use cmd::{cmd_build, cmd_deploy, cmd_genin, cmd_rsync};
use haga_lib::consts::DEFAULT_HAGA_FILE;
use output::OutputFormat;

/// haga - Compile declarative build descriptions into ninja build files
#[derive(Parser)]
#[command(name = "haga")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose logging (overridden by RUST_LOG)
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Generate a ninja build file from a build description
  Genin {
    /// Path to the build description
    #[arg(default_value = DEFAULT_HAGA_FILE)]
    file: PathBuf,

    /// Write build.ninja into this directory instead of stdout
    #[arg(short, long)]
    out_dir: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    format: OutputFormat,
  },

  /// Generate out/build.ninja if missing, then run ninja
  Build {
    /// Path to the build description
    #[arg(default_value = DEFAULT_HAGA_FILE)]
    file: PathBuf,

    /// Targets to build (default: all)
    targets: Vec<String>,
  },

  /// Build the `deploy` target
  Deploy {
    /// Path to the build description
    #[arg(default_value = DEFAULT_HAGA_FILE)]
    file: PathBuf,
  },

  /// Mirror SRC to DST after checking SRC holds exactly INPUTS
  Rsync {
    /// Directory to mirror
    src: PathBuf,

    /// Destination (local path or rsync remote)
    dst: String,

    /// Every file allowed in SRC, relative to it
    inputs: Vec<String>,
  },
}

fn main() -> Result<()> {
  let cli = Cli::parse();

  // Diagnostics are printed by the commands; logs stay quiet unless asked for.
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(if cli.verbose { "debug" } else { "off" }));
  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .without_time()
    .init();

  match cli.command {
    Commands::Genin { file, out_dir, format } => cmd_genin(&file, out_dir.as_ref(), format),
    Commands::Build { file, targets } => cmd_build(&file, &targets),
    Commands::Deploy { file } => cmd_deploy(&file),
    Commands::Rsync { src, dst, inputs } => cmd_rsync(src, dst, inputs),
  }
}
