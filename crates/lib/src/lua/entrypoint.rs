use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::lua::runtime;
use crate::sweet::SweetExport;
use crate::sweet::lua::sweet_export_from_lua;

#[derive(Debug, Error)]
pub enum DescriptionError {
  #[error("build description not found: {}", .0.display())]
  NotFound(PathBuf),

  #[error("failed to evaluate {}: {source}", path.display())]
  Lua {
    path: PathBuf,
    #[source]
    source: mlua::Error,
  },
}

/// Evaluate a build description file into sugar targets.
pub fn load_description(path: &Path) -> Result<SweetExport, DescriptionError> {
  if !path.exists() {
    return Err(DescriptionError::NotFound(path.to_path_buf()));
  }

  let lua_err = |source| DescriptionError::Lua {
    path: path.to_path_buf(),
    source,
  };
  let lua = runtime::create_runtime().map_err(lua_err)?;
  let value = runtime::load_file(&lua, path).map_err(lua_err)?;
  let export = sweet_export_from_lua(value).map_err(lua_err)?;

  debug!(
    path = %path.display(),
    rules = export.rules.len(),
    targets = export.targets.len(),
    "loaded build description"
  );
  Ok(export)
}
