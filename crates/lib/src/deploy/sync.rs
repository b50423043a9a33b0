//! Execution-time synchronization.

use std::future::Future;
use std::path::Path;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use super::validate::{SyncOptions, ValidationError, validate_options};

#[derive(Debug, Error)]
pub enum SyncError {
  #[error("refusing to sync: {} validation error(s)", .0.len())]
  Validation(Vec<ValidationError>),

  #[error("failed to spawn {command}: {source}")]
  Spawn {
    command: String,
    #[source]
    source: std::io::Error,
  },

  #[error("{command} exited with code {code:?}")]
  Failed { command: String, code: Option<i32> },
}

/// Mirrors a local directory onto a destination, deleting extraneous files.
pub trait SyncTransport {
  fn mirror(&self, src_dir: &Path, dst_dir: &str) -> impl Future<Output = Result<(), SyncError>>;
}

/// Runs `rsync -v --archive --delete SRC/ DST`.
#[derive(Debug, Clone)]
pub struct RsyncTransport {
  pub command: String,
}

impl RsyncTransport {
  pub fn new(command: impl Into<String>) -> Self {
    Self { command: command.into() }
  }

  /// Arguments for mirroring the *contents* of `src_dir` into `dst_dir`.
  pub fn args(src_dir: &Path, dst_dir: &str) -> Vec<String> {
    let mut src = src_dir.to_string_lossy().into_owned();
    if !src.ends_with('/') {
      src.push('/');
    }
    vec![
      "-v".to_string(),
      "--archive".to_string(),
      "--delete".to_string(),
      src,
      dst_dir.to_string(),
    ]
  }
}

impl Default for RsyncTransport {
  fn default() -> Self {
    Self::new("rsync")
  }
}

impl SyncTransport for RsyncTransport {
  async fn mirror(&self, src_dir: &Path, dst_dir: &str) -> Result<(), SyncError> {
    let args = Self::args(src_dir, dst_dir);
    debug!(command = %self.command, ?args, "spawning rsync");

    let status = Command::new(&self.command)
      .args(&args)
      .status()
      .await
      .map_err(|source| SyncError::Spawn {
        command: self.command.clone(),
        source,
      })?;

    if !status.success() {
      return Err(SyncError::Failed {
        command: self.command.clone(),
        code: status.code(),
      });
    }
    Ok(())
  }
}

/// Validate `opts` and, only if the tree is exactly the whitelist, mirror it.
pub async fn run(opts: &SyncOptions, transport: &impl SyncTransport) -> Result<(), SyncError> {
  let errors = validate_options(opts);
  if !errors.is_empty() {
    return Err(SyncError::Validation(errors));
  }

  info!(src = %opts.src_dir.display(), dst = %opts.dst_dir, files = opts.inputs.len(), "syncing");
  transport.mirror(&opts.src_dir, &opts.dst_dir).await
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::deploy::DeployErrorCode;
  use std::cell::RefCell;
  use std::path::PathBuf;
  use tempfile::TempDir;

  #[derive(Default)]
  struct RecordingTransport {
    calls: RefCell<Vec<(PathBuf, String)>>,
  }

  impl SyncTransport for RecordingTransport {
    async fn mirror(&self, src_dir: &Path, dst_dir: &str) -> Result<(), SyncError> {
      self.calls.borrow_mut().push((src_dir.to_path_buf(), dst_dir.to_string()));
      Ok(())
    }
  }

  fn site(files: &[&str]) -> TempDir {
    let dir = TempDir::new().unwrap();
    for file in files {
      std::fs::write(dir.path().join(file), "").unwrap();
    }
    dir
  }

  fn opts(dir: &TempDir, inputs: &[&str]) -> SyncOptions {
    SyncOptions {
      inputs: inputs.iter().map(|s| s.to_string()).collect(),
      src_dir: dir.path().to_path_buf(),
      dst_dir: "host:/srv/www".to_string(),
    }
  }

  #[test]
  fn rsync_args_mirror_directory_contents() {
    assert_eq!(
      RsyncTransport::args(Path::new("/out/public"), "host:/srv"),
      vec!["-v", "--archive", "--delete", "/out/public/", "host:/srv"]
    );
    assert_eq!(RsyncTransport::args(Path::new("/out/public/"), "d")[3], "/out/public/");
  }

  #[tokio::test]
  async fn valid_tree_invokes_transport_once() {
    let dir = site(&["x", "y"]);
    let transport = RecordingTransport::default();

    run(&opts(&dir, &["x", "y"]), &transport).await.unwrap();

    let calls = transport.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].1, "host:/srv/www");
  }

  #[tokio::test]
  async fn unexpected_file_blocks_transport() {
    let dir = site(&["x", "y", "z"]);
    let transport = RecordingTransport::default();

    let err = run(&opts(&dir, &["x", "y"]), &transport).await.unwrap_err();

    match err {
      SyncError::Validation(errors) => {
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].code, DeployErrorCode::UnexpectedFile);
        assert!(errors[0].msg.contains("z"));
      }
      other => panic!("unexpected error: {other}"),
    }
    assert!(transport.calls.borrow().is_empty());
  }

  #[tokio::test]
  async fn missing_command_is_spawn_error() {
    let dir = site(&["x"]);
    let transport = RsyncTransport::new("haga-test-no-such-rsync");
    let err = run(&opts(&dir, &["x"]), &transport).await.unwrap_err();
    assert!(matches!(err, SyncError::Spawn { .. }));
  }
}
