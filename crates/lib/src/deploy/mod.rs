//! Safe deployment of a build output tree.
//!
//! Deployment is a destructive mirror (`rsync --delete`) of a source directory
//! onto a destination. Two gates guard it:
//!
//! - At generation time, [`bootstrap::load_or_bootstrap`] reads the persisted
//!   destination, creating a template config on first use.
//! - At execution time, [`validate::validate_options`] checks the source tree
//!   against a closed whitelist of expected files. [`sync::run`] only invokes
//!   the transport when that check finds nothing.
//!
//! # Submodules
//!
//! - [`config`] - Strict JSON deployment config
//! - [`bootstrap`] - Generation-time config resolution
//! - [`validate`] - Closed-world whitelist check
//! - [`sync`] - Transport abstraction and the rsync implementation

pub mod bootstrap;
pub mod config;
pub mod sync;
pub mod validate;

use thiserror::Error;

pub use bootstrap::{Destination, load_or_bootstrap};
pub use config::{ConfigError, DeployConfig, read_config, write_config};
pub use sync::{RsyncTransport, SyncError, SyncTransport, run};
pub use validate::{SyncOptions, ValidationError, validate_options};

/// Stable identifiers for deployment failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum DeployErrorCode {
  #[error("CONFIG_INVALID_SCHEMA")]
  ConfigInvalidSchema,
  #[error("CONFIG_PARSE_ERROR")]
  ConfigParseError,
  #[error("CONFIG_READ_ERROR")]
  ConfigReadError,
  #[error("CONFIG_WRITE_ERROR")]
  ConfigWriteError,
  #[error("INPUT_IS_DIRECTORY")]
  InputIsDirectory,
  #[error("INPUT_NOT_FOUND")]
  InputNotFound,
  #[error("INPUT_OUTSIDE_SRC_DIR")]
  InputOutsideSrcDir,
  #[error("SRC_DIR_NOT_DIRECTORY")]
  SrcDirNotDirectory,
  #[error("SRC_DIR_NOT_FOUND")]
  SrcDirNotFound,
  #[error("UNEXPECTED_FILE")]
  UnexpectedFile,
}
