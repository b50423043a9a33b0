mod build;
mod genin;
mod rsync;

pub use build::{cmd_build, cmd_deploy};
pub use genin::cmd_genin;
pub use rsync::cmd_rsync;

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Working directory of the invocation. All keyword paths derive from it.
pub(crate) fn invocation_dir() -> Result<PathBuf> {
  let cwd = std::env::current_dir().context("Failed to determine current directory")?;
  Ok(dunce::canonicalize(&cwd).unwrap_or(cwd))
}

/// Path of the running executable, used by regeneration and deployment rules.
pub(crate) fn haga_command() -> PathBuf {
  std::env::current_exe().unwrap_or_else(|_| PathBuf::from(haga_lib::consts::APP_NAME))
}
