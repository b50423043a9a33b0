//! Built-in rules for the sugar target kinds.

use crate::compose::{SweetString, compose_commands, compose_opt};
use crate::context::Context;
use crate::core::CoreRule;
use crate::keyword::Keyword;

use super::types::{SweetRule, TargetKind};

/// Minifier script, relative to the input root.
pub const MINIFY_SCRIPT: &str = "/toolchain/minify-any.sh";
/// Archiver script, relative to the input root.
pub const ZIP_SCRIPT: &str = "/toolchain/zip-abs.sh";

pub fn minify_script() -> SweetString {
  SweetString::under(Keyword::InputDir, MINIFY_SCRIPT)
}

pub fn zip_script() -> SweetString {
  SweetString::under(Keyword::InputDir, ZIP_SCRIPT)
}

fn args(items: impl IntoIterator<Item = SweetString>) -> Vec<SweetString> {
  items.into_iter().collect()
}

fn lit(s: &str) -> SweetString {
  SweetString::from(s)
}

fn kw(keyword: Keyword) -> SweetString {
  SweetString::from(keyword)
}

/// The built-in rule for `kind`, or `None` for pass-through targets.
pub fn builtin_rule(kind: TargetKind) -> Option<SweetRule> {
  let rule = match kind {
    TargetKind::Copy => SweetRule::new("copy", vec![args([kw(Keyword::CopyCommand), lit("$in"), lit("$out")])])
      .with_description("Copying $in"),

    TargetKind::Cpp | TargetKind::Cpps => SweetRule::new(
      "cpp",
      vec![args(
        [
          kw(Keyword::ClangCommand),
          lit("-x"),
          lit("c"),
          lit("$in"),
          lit("-E"),
          lit("-P"),
          lit("$defines"),
          lit("-MMD"),
          lit("-MF"),
          lit("$depfile"),
          lit("-MT"),
          lit("$outfile"),
          lit("-o"),
          lit("$outfile"),
        ],
      )],
    )
    .with_description("CPP $in"),

    TargetKind::Magick => SweetRule::new(
      "magick",
      vec![args([kw(Keyword::MagickCommand), lit("$in"), lit("$args"), lit("$out")])],
    )
    .with_description("Magicking $out"),

    TargetKind::RsvgConvert => SweetRule::new(
      "rsvg-convert",
      vec![args([kw(Keyword::RsvgConvertCommand), lit("$args"), lit("$in"), lit("-o"), lit("$out")])],
    )
    .with_description("Rasterizing $out"),

    TargetKind::Minify => SweetRule::new(
      "minify",
      vec![args([kw(Keyword::BashCommand), minify_script(), lit("$in"), lit("$out")])],
    )
    .with_description("Minifying $in"),

    TargetKind::Regen => {
      let mut rule = SweetRule::new(
        "regen",
        vec![
          args([lit("cd"), kw(Keyword::InputDir)]),
          args([kw(Keyword::HagaCommand), lit("genin"), lit("$in"), lit(">"), lit("$out")]),
        ],
      )
      .with_description("Regenerate build.ninja");
      rule.generator = true;
      rule.restat = true;
      rule
    }

    TargetKind::Rsync => SweetRule::new(
      "rsync",
      vec![
        args([kw(Keyword::HagaCommand), lit("rsync"), lit("$srcDir"), lit("$dstDir"), lit("$inputs")]),
        args([kw(Keyword::TouchCommand), lit("$out")]),
      ],
    )
    .with_description("Deploying"),

    TargetKind::Zip => SweetRule::new(
      "zip",
      vec![args([kw(Keyword::BashCommand), zip_script(), lit("$out"), lit("$indir"), lit("$in")])],
    )
    .with_description("Zipping $out"),

    TargetKind::Core => return None,
  };
  Some(rule)
}

/// Resolve a sugar rule's strings through the context.
pub fn resolve_rule(ctx: &mut Context, rule: &SweetRule) -> CoreRule {
  CoreRule {
    name: rule.name.clone(),
    commands: compose_commands(ctx, &rule.commands),
    description: compose_opt(ctx, rule.description.as_ref()),
    generator: rule.generator,
    restat: rule.restat,
  }
}

/// Register the built-in rule for `kind` unless a rule of that name exists.
///
/// A user rule with the same name takes precedence silently.
pub fn ensure_rule(ctx: &mut Context, kind: TargetKind) {
  let Some(name) = kind.rule_name() else {
    return;
  };
  if ctx.has_rule(name) {
    return;
  }
  if let Some(rule) = builtin_rule(kind) {
    let rule = resolve_rule(ctx, &rule);
    ctx.add_rule(rule);
  }
}
