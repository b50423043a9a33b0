//! Closed-world validation of a deployment source tree.
//!
//! The declared inputs are the complete list of files allowed in the source
//! directory. Anything else found there would be mirrored (or would cause a
//! remote file to be deleted), so it is an error.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;
use walkdir::WalkDir;

use super::DeployErrorCode;
use crate::path::normalize;

/// Arguments of one sync invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncOptions {
  /// Whitelisted files, relative to `src_dir`.
  pub inputs: Vec<String>,
  pub src_dir: PathBuf,
  /// Passed to the transport untouched; may be a remote `host:path`.
  pub dst_dir: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] {msg}")]
pub struct ValidationError {
  pub code: DeployErrorCode,
  pub msg: String,
}

impl ValidationError {
  fn new(code: DeployErrorCode, msg: impl Into<String>) -> Self {
    Self { code, msg: msg.into() }
  }
}

/// Check `opts` against the filesystem. An empty result means the sync is safe.
///
/// A missing or non-directory source stops validation with a single error.
/// Otherwise every input is checked and all unexpected files are reported
/// together in one [`DeployErrorCode::UnexpectedFile`] error.
pub fn validate_options(opts: &SyncOptions) -> Vec<ValidationError> {
  let src_display = opts.src_dir.display();
  let metadata = match std::fs::metadata(&opts.src_dir) {
    Ok(m) => m,
    Err(_) => {
      return vec![ValidationError::new(
        DeployErrorCode::SrcDirNotFound,
        format!("srcDir does not exist: {src_display}"),
      )];
    }
  };
  if !metadata.is_dir() {
    return vec![ValidationError::new(
      DeployErrorCode::SrcDirNotDirectory,
      format!("srcDir is not a directory: {src_display}"),
    )];
  }

  let root = match dunce::canonicalize(&opts.src_dir) {
    Ok(root) => root,
    Err(e) => {
      return vec![ValidationError::new(
        DeployErrorCode::SrcDirNotFound,
        format!("cannot resolve srcDir {src_display}: {e}"),
      )];
    }
  };

  let mut errors = Vec::new();
  let present = scan_files(&root, &mut errors);

  let mut expected = BTreeSet::new();
  for input in &opts.inputs {
    if let Some(relative) = check_input(&root, input, &mut errors) {
      expected.insert(relative);
    }
  }

  let unexpected: Vec<&PathBuf> = present.iter().filter(|p| !expected.contains(*p)).collect();
  if !unexpected.is_empty() {
    let mut msg = String::from("Unexpected files found in srcDir that would be copied by rsync:");
    for file in &unexpected {
      msg.push_str(&format!("\n  - {}", file.display()));
    }
    errors.push(ValidationError::new(DeployErrorCode::UnexpectedFile, msg));
  }

  debug!(
    src_dir = %root.display(),
    files = present.len(),
    inputs = opts.inputs.len(),
    errors = errors.len(),
    "validated sync options"
  );
  errors
}

/// Every entry under `root` that rsync would transfer, relative to it.
///
/// Anything that is not a directory counts: regular files, symlinks (not
/// followed), FIFOs, sockets and device nodes.
fn scan_files(root: &Path, errors: &mut Vec<ValidationError>) -> BTreeSet<PathBuf> {
  let mut files = BTreeSet::new();
  for entry in WalkDir::new(root).min_depth(1).follow_links(false) {
    match entry {
      Ok(entry) if !entry.file_type().is_dir() => {
        if let Ok(relative) = entry.path().strip_prefix(root) {
          files.insert(relative.to_path_buf());
        }
      }
      Ok(_) => {}
      // An unreadable subtree may hide files that would be mirrored.
      Err(e) => errors.push(ValidationError::new(
        DeployErrorCode::UnexpectedFile,
        format!("cannot scan srcDir: {e}"),
      )),
    }
  }
  files
}

/// Validate one whitelisted input, returning its path relative to `root`.
fn check_input(root: &Path, input: &str, errors: &mut Vec<ValidationError>) -> Option<PathBuf> {
  let resolved = normalize(&root.join(input));
  if !resolved.starts_with(root) {
    errors.push(ValidationError::new(
      DeployErrorCode::InputOutsideSrcDir,
      format!("input is outside srcDir: {input}"),
    ));
    return None;
  }

  match std::fs::metadata(&resolved) {
    Err(_) => {
      errors.push(ValidationError::new(
        DeployErrorCode::InputNotFound,
        format!("input does not exist: {input}"),
      ));
      None
    }
    Ok(m) if m.is_dir() => {
      errors.push(ValidationError::new(
        DeployErrorCode::InputIsDirectory,
        format!("input is a directory: {input}"),
      ));
      None
    }
    Ok(m) if !m.is_file() => {
      errors.push(ValidationError::new(
        DeployErrorCode::InputNotFound,
        format!("input is not a regular file: {input}"),
      ));
      None
    }
    Ok(_) => resolved.strip_prefix(root).ok().map(Path::to_path_buf),
  }
}
