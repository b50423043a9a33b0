//! External tool commands.
//!
//! Each tool defaults to its bare command name (resolved through `PATH` by
//! the executor) and can be overridden with an environment variable, e.g.
//! `HAGA_CLANG=/opt/llvm/bin/clang`.

use tracing::debug;

/// Commands used by the built-in rules and the CLI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tools {
  pub bash: String,
  pub clang: String,
  pub copy: String,
  pub magick: String,
  pub rsvg_convert: String,
  pub touch: String,
  pub ninja: String,
  pub rsync: String,
}

impl Tools {
  /// Bare command names, ignoring the environment.
  pub fn defaults() -> Self {
    Self {
      bash: "bash".to_string(),
      clang: "clang".to_string(),
      copy: "cp".to_string(),
      magick: "magick".to_string(),
      rsvg_convert: "rsvg-convert".to_string(),
      touch: "touch".to_string(),
      ninja: "ninja".to_string(),
      rsync: "rsync".to_string(),
    }
  }

  /// Defaults overridden by `HAGA_*` environment variables.
  pub fn from_env() -> Self {
    let defaults = Self::defaults();
    let tools = Self {
      bash: env_or("HAGA_BASH", defaults.bash),
      clang: env_or("HAGA_CLANG", defaults.clang),
      copy: env_or("HAGA_COPY", defaults.copy),
      magick: env_or("HAGA_MAGICK", defaults.magick),
      rsvg_convert: env_or("HAGA_RSVG_CONVERT", defaults.rsvg_convert),
      touch: env_or("HAGA_TOUCH", defaults.touch),
      ninja: env_or("HAGA_NINJA", defaults.ninja),
      rsync: env_or("HAGA_RSYNC", defaults.rsync),
    };
    debug!(?tools, "resolved tool commands");
    tools
  }
}

fn env_or(var: &str, default: String) -> String {
  match std::env::var(var) {
    Ok(value) if !value.is_empty() => value,
    _ => default,
  }
}
