//! Implementation of the `haga genin` command.
//!
//! Evaluates a build description and prints the generated ninja file, or
//! writes it into an output directory.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use tracing::info;

use haga_lib::consts::NINJA_FILE_NAME;
use haga_lib::core::ninja::to_ninja_string;
use haga_lib::generate::{generate_file, write_build_file};
use haga_lib::tools::Tools;

use super::{haga_command, invocation_dir};
use crate::output::{OutputFormat, format_summary, print_info, print_json, print_report};

pub fn cmd_genin(file: &Path, out_dir: Option<&PathBuf>, format: OutputFormat) -> Result<()> {
  let cwd = invocation_dir()?;
  let tools = Tools::from_env();

  let generation = generate_file(&cwd, file, &haga_command(), &tools)
    .with_context(|| format!("Failed to generate from {}", file.display()))?;

  print_report(&generation.report);
  if !generation.report.is_success() {
    bail!("generation failed: {}", format_summary(&generation.report));
  }

  if format.is_json() {
    return print_json(&generation.export);
  }

  match out_dir {
    Some(dir) => {
      let path = dir.join(NINJA_FILE_NAME);
      write_build_file(&path, &generation.export)?;
      info!(path = %path.display(), "wrote build file");
      print_info(&format!("Wrote {}", path.display()));
    }
    None => print!("{}", to_ninja_string(&generation.export)),
  }

  Ok(())
}
