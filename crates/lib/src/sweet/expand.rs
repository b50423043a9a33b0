//! Expansion of sugar targets into canonical build edges.
//!
//! Each sugar kind has one expansion policy deciding where its inputs are
//! read from, where its outputs land, and which variables the rule sees.
//! Recoverable problems are recorded on the [`Context`]; expansion itself
//! never fails.

use std::path::Path;

use tracing::{debug, info};

use crate::compose::{SweetString, compose_args, compose_string, quote_arg};
use crate::consts::{DEPFILE_SUFFIX, DEPLOY_SENTINEL_SUFFIX, NINJA_FILE_NAME, TEMPLATE_SUFFIX};
use crate::context::{Context, Diagnostic};
use crate::core::{CoreExport, CoreTarget, PHONY_RULE};
use crate::deploy::{ConfigError, load_or_bootstrap};
use crate::keyword::Keyword;
use crate::path::{append_suffix, drop_suffix, join_normalized, resolve_path, resolve_paths, to_absolute};

use super::rules::{ensure_rule, minify_script, resolve_rule, zip_script};
use super::types::{
  ConvertTarget, CppTarget, CppsTarget, FilesTarget, RegenTarget, RsyncTarget, SweetExport, SweetTarget, TargetKind,
  ZipTarget,
};

fn kw(keyword: Keyword) -> SweetString {
  SweetString::from(keyword)
}

/// Register user rules, then the built-in rule of every kind in use.
pub fn add_rules(ctx: &mut Context, export: &SweetExport) {
  for rule in &export.rules {
    let rule = resolve_rule(ctx, rule);
    ctx.add_rule(rule);
  }
  for target in &export.targets {
    ensure_rule(ctx, target.kind());
  }
}

/// Expand a whole description.
pub fn expand(ctx: &mut Context, export: &SweetExport) -> CoreExport {
  add_rules(ctx, export);

  let targets: Vec<CoreTarget> = export.targets.iter().flat_map(|t| expand_target(ctx, t)).collect();
  let rules = ctx.rules().to_vec();

  info!(rules = rules.len(), targets = targets.len(), "expanded build description");
  CoreExport { rules, targets }
}

/// Expand one target. Fan-out kinds produce several edges, `rsync` two or none.
pub fn expand_target(ctx: &mut Context, target: &SweetTarget) -> Vec<CoreTarget> {
  match target {
    SweetTarget::Cpp(t) => vec![expand_cpp(ctx, t)],
    SweetTarget::Cpps(t) => expand_cpps(ctx, t),
    SweetTarget::Copy(t) => expand_copy(ctx, t),
    SweetTarget::Magick(t) => vec![expand_convert(ctx, t, TargetKind::Magick)],
    SweetTarget::RsvgConvert(t) => vec![expand_convert(ctx, t, TargetKind::RsvgConvert)],
    SweetTarget::Minify(t) => expand_minify(ctx, t),
    SweetTarget::Zip(t) => vec![expand_zip(ctx, t)],
    SweetTarget::Regen(t) => vec![expand_regen(ctx, t)],
    SweetTarget::Rsync(t) => expand_rsync(ctx, t),
    SweetTarget::Core(t) => vec![t.clone()],
  }
}

fn compose_defines(ctx: &mut Context, defines: &[SweetString]) -> String {
  defines
    .iter()
    .map(|d| quote_arg(&format!("-D{}", compose_string(ctx, d))))
    .collect::<Vec<_>>()
    .join(" ")
}

pub fn expand_cpp(ctx: &mut Context, target: &CppTarget) -> CoreTarget {
  let input = compose_string(ctx, &target.input);
  let output = match &target.output {
    Some(output) => compose_string(ctx, output),
    None => drop_suffix(&input, TEMPLATE_SUFFIX).to_string(),
  };
  let abs_input = to_absolute(ctx, &input, Keyword::CurrentInputDir);
  let abs_output = to_absolute(ctx, &output, Keyword::CurrentOutputDir);
  let depfile = format!("{abs_output}{DEPFILE_SUFFIX}");
  let implicits = resolve_paths(ctx, &kw(Keyword::InputDir), &target.implicits);

  let mut core = CoreTarget::new(
    TargetKind::Cpp.as_str(),
    vec![abs_input],
    vec![abs_output.clone(), depfile.clone()],
  )
  .with_implicits(implicits)
  .with_var("outfile", abs_output)
  .with_var("depfile", depfile);

  if !target.defines.is_empty() {
    let defines = compose_defines(ctx, &target.defines);
    core = core.with_var("defines", defines);
  }
  core
}

pub fn expand_cpps(ctx: &mut Context, target: &CppsTarget) -> Vec<CoreTarget> {
  let input_dir = compose_string(ctx, target.input_dir.as_ref().unwrap_or(&kw(Keyword::CurrentInputDir)));
  let output_dir = compose_string(ctx, target.output_dir.as_ref().unwrap_or(&kw(Keyword::CurrentOutputDir)));

  target
    .inputs
    .iter()
    .map(|input| {
      let name = compose_string(ctx, input);
      let cpp = CppTarget {
        input: join_normalized(&input_dir, &name).into(),
        output: Some(join_normalized(&output_dir, drop_suffix(&name, TEMPLATE_SUFFIX)).into()),
        implicits: target.implicits.clone(),
        defines: target.defines.clone(),
      };
      expand_cpp(ctx, &cpp)
    })
    .collect()
}

/// One edge per input, relative paths mirrored from the input to the output
/// directory.
fn expand_files(ctx: &mut Context, target: &FilesTarget, kind: TargetKind) -> Vec<CoreTarget> {
  let empty = SweetString::default();
  let out_dir = resolve_path(
    ctx,
    &kw(Keyword::CurrentOutputDir),
    target.output_dir.as_ref().unwrap_or(&empty),
  );
  let in_dir = resolve_path(ctx, &kw(Keyword::CurrentInputDir), target.input_dir.as_ref().unwrap_or(&empty));

  target
    .inputs
    .iter()
    .map(|input| {
      let name = compose_string(ctx, input);
      CoreTarget::new(
        kind.as_str(),
        vec![join_normalized(&in_dir, &name)],
        vec![join_normalized(&out_dir, &name)],
      )
    })
    .collect()
}

pub fn expand_copy(ctx: &mut Context, target: &FilesTarget) -> Vec<CoreTarget> {
  expand_files(ctx, target, TargetKind::Copy)
}

pub fn expand_minify(ctx: &mut Context, target: &FilesTarget) -> Vec<CoreTarget> {
  let mut targets = expand_files(ctx, target, TargetKind::Minify);
  let script = compose_string(ctx, &minify_script());
  for t in &mut targets {
    t.implicits.push(script.clone());
  }
  targets
}

/// `magick` and `rsvg-convert`: one input, one output, quoted tool arguments.
pub fn expand_convert(ctx: &mut Context, target: &ConvertTarget, kind: TargetKind) -> CoreTarget {
  let input = resolve_path(ctx, &kw(Keyword::CurrentInputDir), &target.input);
  let output = resolve_path(ctx, &kw(Keyword::CurrentOutputDir), &target.output);
  let args = compose_args(ctx, &target.args);
  CoreTarget::new(kind.as_str(), vec![input], vec![output]).with_var("args", args)
}

pub fn expand_zip(ctx: &mut Context, target: &ZipTarget) -> CoreTarget {
  let empty = SweetString::default();
  let indir = resolve_path(ctx, &kw(Keyword::CurrentInputDir), target.input_dir.as_ref().unwrap_or(&empty));
  let inputs = target
    .inputs
    .iter()
    .map(|input| {
      let name = compose_string(ctx, input);
      join_normalized(&indir, &name)
    })
    .collect();
  let output = resolve_path(ctx, &kw(Keyword::CurrentOutputDir), &target.output);
  let script = compose_string(ctx, &zip_script());

  CoreTarget::new(TargetKind::Zip.as_str(), inputs, vec![output])
    .with_implicits(vec![script])
    .with_var("indir", indir)
}

pub fn expand_regen(ctx: &mut Context, target: &RegenTarget) -> CoreTarget {
  let inputs = match &target.inputs {
    Some(inputs) => resolve_paths(ctx, &kw(Keyword::CurrentInputDir), inputs),
    None => resolve_paths(ctx, &kw(Keyword::CurrentInputDir), &[kw(Keyword::HagaInputHagafile)]),
  };
  let outputs = match &target.outputs {
    Some(outputs) => resolve_paths(ctx, &kw(Keyword::CurrentOutputDir), outputs),
    None => vec![to_absolute(ctx, NINJA_FILE_NAME, Keyword::OutputDir)],
  };
  let implicits = match &target.implicits {
    Some(implicits) => resolve_paths(ctx, &kw(Keyword::CurrentInputDir), implicits),
    None => resolve_paths(ctx, &kw(Keyword::CurrentInputDir), &[kw(Keyword::HagaCommand)]),
  };

  CoreTarget::new(TargetKind::Regen.as_str(), inputs, outputs).with_implicits(implicits)
}

fn has_unsupported_chars(input: &str) -> bool {
  input.contains(' ') || input.contains('\n')
}

fn report_config_error(ctx: &mut Context, err: &ConfigError) {
  debug!(error = %err, "deployment config unusable");
  ctx.report_error(Diagnostic::DeployConfig {
    action: err.action(),
    path: err.path().to_path_buf(),
    code: err.code(),
  });
}

/// Expand a deployment: a sync edge producing a timestamp sentinel plus a
/// phony alias named after the target. Neither is part of `all`.
///
/// The config next to the description is read, or created from the template
/// on first use. An unusable config, or any whitelisted input containing a
/// space or newline, yields no edges.
pub fn expand_rsync(ctx: &mut Context, target: &RsyncTarget) -> Vec<CoreTarget> {
  let config_path = resolve_path(ctx, &kw(Keyword::CurrentInputDir), &target.config);

  let destination = load_or_bootstrap(Path::new(&config_path), || {
    compose_string(ctx, &target.dst_dir_template)
  });

  let mut usable = true;
  for input in target.inputs.iter().filter(|i| has_unsupported_chars(i)) {
    ctx.report_warning(Diagnostic::UnsupportedDeployInput(input.clone()));
    usable = false;
  }

  let dst_dir = match destination {
    Ok(destination) => destination.dst_dir().to_string(),
    Err(err) => {
      report_config_error(ctx, &err);
      return Vec::new();
    }
  };
  if !usable {
    return Vec::new();
  }

  let src_dir = resolve_path(ctx, &kw(Keyword::CurrentOutputDir), &target.src_dir);
  let sentinel = append_suffix(ctx, &SweetString::from(src_dir.as_str()), DEPLOY_SENTINEL_SUFFIX);
  let inputs = target.inputs.iter().map(|i| join_normalized(&src_dir, i)).collect();
  let quoted_inputs = target.inputs.iter().map(|i| quote_arg(i)).collect::<Vec<_>>().join(" ");

  let mut sync = CoreTarget::new(TargetKind::Rsync.as_str(), inputs, vec![sentinel.clone()])
    .with_var("srcDir", quote_arg(&src_dir))
    .with_var("dstDir", quote_arg(&dst_dir))
    .with_var("inputs", quoted_inputs);
  sync.regen_implicits = vec![config_path];
  sync.all = false;

  let mut alias = CoreTarget::new(PHONY_RULE, vec![sentinel], vec![target.name.clone()]);
  alias.all = false;

  vec![sync, alias]
}
