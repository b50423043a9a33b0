//! Generation-time resolution of the deployment destination.
//!
//! The first generation writes a config holding the template destination so
//! the user has a file to edit. Later generations read it back strictly.

use std::path::Path;

use tracing::{debug, info};

use super::config::{ConfigError, DeployConfig, read_config, write_config};

/// How the destination was obtained.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Destination {
  /// The config was missing and has just been written from the template.
  Bootstrapped(String),
  /// The config existed and passed validation.
  Configured(String),
}

impl Destination {
  pub fn dst_dir(&self) -> &str {
    match self {
      Destination::Bootstrapped(dst) | Destination::Configured(dst) => dst,
    }
  }
}

/// Read the config at `path`, or write the template destination there if it
/// does not exist. `template` is only evaluated when bootstrapping.
pub fn load_or_bootstrap(path: &Path, template: impl FnOnce() -> String) -> Result<Destination, ConfigError> {
  if !path.exists() {
    let config = DeployConfig { dst_dir: template() };
    write_config(path, &config)?;
    info!(path = %path.display(), dst_dir = %config.dst_dir, "created deployment config");
    return Ok(Destination::Bootstrapped(config.dst_dir));
  }

  let config = read_config(path)?;
  debug!(path = %path.display(), "using existing deployment config");
  Ok(Destination::Configured(config.dst_dir))
}
