//! Persisted deployment configuration.
//!
//! A deployment config is a JSON5 file with exactly one field:
//!
//! ```json5
//! {
//!   // production mirror
//!   dstDir: "user@host:/srv/www",
//! }
//! ```
//!
//! Comments, unquoted keys and trailing commas are accepted. Anything else
//! (extra keys, a non-string destination, a non-object root) is rejected
//! rather than interpreted. Configs are written as plain JSON.

use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::debug;

use super::DeployErrorCode;

/// The only field a deployment config may contain.
pub const DST_DIR_FIELD: &str = "dstDir";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployConfig {
  #[serde(rename = "dstDir")]
  pub dst_dir: String,
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("failed to read {}: {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("failed to parse {}: {source}", path.display())]
  Parse { path: PathBuf, source: json5::Error },

  #[error("invalid deployment config {}: {reason}", path.display())]
  InvalidSchema { path: PathBuf, reason: String },

  #[error("failed to write {}: {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },
}

impl ConfigError {
  pub fn code(&self) -> DeployErrorCode {
    match self {
      ConfigError::Read { .. } => DeployErrorCode::ConfigReadError,
      ConfigError::Parse { .. } => DeployErrorCode::ConfigParseError,
      ConfigError::InvalidSchema { .. } => DeployErrorCode::ConfigInvalidSchema,
      ConfigError::Write { .. } => DeployErrorCode::ConfigWriteError,
    }
  }

  /// The operation that failed, as a verb.
  pub fn action(&self) -> &'static str {
    match self {
      ConfigError::Write { .. } => "write",
      _ => "read",
    }
  }

  pub fn path(&self) -> &Path {
    match self {
      ConfigError::Read { path, .. }
      | ConfigError::Parse { path, .. }
      | ConfigError::InvalidSchema { path, .. }
      | ConfigError::Write { path, .. } => path,
    }
  }
}

/// Read and strictly validate a deployment config.
pub fn read_config(path: &Path) -> Result<DeployConfig, ConfigError> {
  let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
    path: path.to_path_buf(),
    source,
  })?;

  let value: serde_json::Value = json5::from_str(&raw).map_err(|source| ConfigError::Parse {
    path: path.to_path_buf(),
    source,
  })?;

  let invalid = |reason: &str| ConfigError::InvalidSchema {
    path: path.to_path_buf(),
    reason: reason.to_string(),
  };

  let obj = value.as_object().ok_or_else(|| invalid("root must be an object"))?;
  if obj.len() != 1 || !obj.contains_key(DST_DIR_FIELD) {
    return Err(invalid("expected exactly one field 'dstDir'"));
  }
  let dst_dir = obj[DST_DIR_FIELD]
    .as_str()
    .ok_or_else(|| invalid("'dstDir' must be a string"))?;

  debug!(path = %path.display(), dst_dir, "read deployment config");
  Ok(DeployConfig {
    dst_dir: dst_dir.to_string(),
  })
}

/// Create a config atomically (temp file in the same directory, then a
/// no-clobber rename). An existing file at `path` is never replaced.
pub fn write_config(path: &Path, config: &DeployConfig) -> Result<(), ConfigError> {
  let write_err = |source: std::io::Error| ConfigError::Write {
    path: path.to_path_buf(),
    source,
  };

  let content = serde_json::to_string_pretty(config).map_err(|e| write_err(std::io::Error::other(e)))?;
  let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));

  let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
  tmp.write_all(content.as_bytes()).map_err(write_err)?;
  tmp.persist_noclobber(path).map_err(|e| write_err(e.error))?;

  debug!(path = %path.display(), dst_dir = %config.dst_dir, "wrote deployment config");
  Ok(())
}
