//! Implementation of the `haga build` and `haga deploy` commands.
//!
//! Generates `out/build.ninja` on first use, then hands over to ninja. Later
//! runs rely on the graph's own regen edge to stay current.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tracing::{debug, info};

use haga_lib::consts::{BUILD_DIR_NAME, NINJA_FILE_NAME};
use haga_lib::generate::{generate_file, write_build_file};
use haga_lib::tools::Tools;

use super::{haga_command, invocation_dir};
use crate::output::{format_summary, print_report, print_success};

/// Name of the phony alias `haga deploy` builds.
const DEPLOY_TARGET: &str = "deploy";

pub fn cmd_build(file: &Path, targets: &[String]) -> Result<()> {
  let cwd = invocation_dir()?;
  let tools = Tools::from_env();
  let out_dir = cwd.join(BUILD_DIR_NAME);
  let ninja_file = out_dir.join(NINJA_FILE_NAME);

  std::fs::create_dir_all(&out_dir).with_context(|| format!("Failed to create {}", out_dir.display()))?;

  if !ninja_file.exists() {
    let generation = generate_file(&cwd, file, &haga_command(), &tools)
      .with_context(|| format!("Failed to generate from {}", file.display()))?;
    print_report(&generation.report);
    if !generation.report.is_success() {
      bail!("generation failed: {}", format_summary(&generation.report));
    }
    write_build_file(&ninja_file, &generation.export)?;
    info!(path = %ninja_file.display(), "generated build file");
  }

  debug!(ninja = %tools.ninja, ?targets, "running ninja");
  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let status = rt
    .block_on(Command::new(&tools.ninja).args(targets).current_dir(&out_dir).status())
    .with_context(|| format!("Failed to run {}", tools.ninja))?;

  if !status.success() {
    bail!("{} exited with {}", tools.ninja, status);
  }

  print_success("Build complete");
  Ok(())
}

pub fn cmd_deploy(file: &Path) -> Result<()> {
  cmd_build(file, &[DEPLOY_TARGET.to_string()])
}
