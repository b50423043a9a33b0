//! Implementation of the `haga rsync` command.
//!
//! Mirrors a build output directory to its destination, refusing to do so
//! unless the directory holds exactly the whitelisted files.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};

use haga_lib::deploy::{RsyncTransport, SyncError, SyncOptions, run};
use haga_lib::tools::Tools;

use crate::output::{print_error, print_success};

pub fn cmd_rsync(src_dir: PathBuf, dst_dir: String, inputs: Vec<String>) -> Result<()> {
  let tools = Tools::from_env();
  let opts = SyncOptions {
    inputs,
    src_dir,
    dst_dir,
  };
  let transport = RsyncTransport::new(tools.rsync);

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  match rt.block_on(run(&opts, &transport)) {
    Ok(()) => {
      print_success(&format!("Synced {} to {}", opts.src_dir.display(), opts.dst_dir));
      Ok(())
    }
    Err(SyncError::Validation(errors)) => {
      for error in &errors {
        print_error(&error.to_string());
      }
      bail!("refusing to sync {}: {} error(s)", opts.src_dir.display(), errors.len());
    }
    Err(e) => Err(e).context("Sync failed"),
  }
}
