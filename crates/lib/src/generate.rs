//! One generation pass: description in, canonical graph and diagnostics out.
//!
//! On top of plain expansion, a pass guarantees that the build file can
//! regenerate itself: if the description declares no `regen` target, a
//! default one is prepended. Every other edge then waits (order-only) on the
//! regenerated build file, and every file marked as a regeneration input is
//! folded into the regen edge's implicit dependencies.

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use thiserror::Error;
use tracing::{debug, info};

use crate::context::{Context, Diagnostic, Report};
use crate::core::{CoreExport, ninja};
use crate::lua::entrypoint::{DescriptionError, load_description};
use crate::sweet::expand::{expand, expand_regen};
use crate::sweet::rules::ensure_rule;
use crate::sweet::{RegenTarget, SweetExport, TargetKind};
use crate::tools::Tools;

#[derive(Debug, Error)]
pub enum GenerateError {
  #[error(transparent)]
  Description(#[from] DescriptionError),

  #[error("failed to write {}: {source}", path.display())]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Result of [`generate_file`].
#[derive(Debug)]
pub struct Generation {
  pub export: CoreExport,
  pub report: Report,
}

/// Expand `sweet` and wire in self-regeneration.
pub fn generate(ctx: &mut Context, sweet: &SweetExport) -> CoreExport {
  let mut export = expand(ctx, sweet);
  let regen_rule = TargetKind::Regen.as_str();

  if !ctx.has_rule(regen_rule) {
    ensure_rule(ctx, TargetKind::Regen);
    let regen = expand_regen(ctx, &RegenTarget::default());
    debug!(outputs = ?regen.outputs, "added default regen target");
    export.targets.insert(0, regen);
    export.rules = ctx.rules().to_vec();
  }

  if let Some(regen_idx) = export.targets.iter().position(|t| t.rule == regen_rule) {
    let regen_implicits: Vec<String> = export
      .targets
      .iter()
      .flat_map(|t| t.regen_implicits.iter().cloned())
      .collect();
    let regen = &mut export.targets[regen_idx];
    for path in regen_implicits {
      if !regen.implicits.contains(&path) {
        regen.implicits.push(path);
      }
    }

    let regen_outputs = export.targets[regen_idx].outputs.clone();
    for target in export.targets.iter_mut().filter(|t| t.rule != regen_rule) {
      target.order_only.extend(regen_outputs.iter().cloned());
    }
  }

  let duplicates: Vec<String> = export.duplicate_outputs().into_iter().map(str::to_string).collect();
  for output in duplicates {
    ctx.report_warning(Diagnostic::DuplicateOutput(output));
  }

  export
}

/// Load `haga_file` and run a generation pass with a context derived from
/// `cwd`. Diagnostics are returned in the report, not as an error.
pub fn generate_file(cwd: &Path, haga_file: &Path, haga_command: &Path, tools: &Tools) -> Result<Generation, GenerateError> {
  let sweet = load_description(&cwd.join(haga_file))?;
  let mut ctx = Context::for_invocation(cwd, haga_file, haga_command, tools);
  let export = generate(&mut ctx, &sweet);
  let report = ctx.flush_report();

  info!(
    rules = export.rules.len(),
    targets = export.targets.len(),
    errors = report.errors.len(),
    warnings = report.warnings.len(),
    "generated build graph"
  );
  Ok(Generation { export, report })
}

/// Write the ninja file atomically.
pub fn write_build_file(path: &Path, export: &CoreExport) -> Result<(), GenerateError> {
  let write_err = |source| GenerateError::Write {
    path: path.to_path_buf(),
    source,
  };
  let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
  std::fs::create_dir_all(dir).map_err(write_err)?;

  let mut tmp = NamedTempFile::new_in(dir).map_err(write_err)?;
  ninja::write_ninja(export, &mut tmp).map_err(write_err)?;
  tmp.flush().map_err(write_err)?;
  tmp.persist(path).map_err(|e| write_err(e.error))?;

  debug!(path = %path.display(), "wrote build file");
  Ok(())
}
