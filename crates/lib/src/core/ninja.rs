//! Serialization of a [`CoreExport`] into ninja's build file syntax.
//!
//! Paths on `build` lines are escaped (`$`, space, `:`). Rule commands are
//! written verbatim because they reference ninja variables such as `$in`.
//! Per-edge variable values escape `$` and newlines.

use std::io::{self, Write};

use super::types::{CoreExport, CoreRule, CoreTarget};

/// Name of the alias collecting every default target.
pub const ALL_TARGET: &str = "all";

/// Joins the command lines of a multi-command rule.
const COMMAND_SEPARATOR: &str = " && ";

pub fn escape_path(path: &str) -> String {
  let mut escaped = String::with_capacity(path.len());
  for ch in path.chars() {
    match ch {
      '$' | ' ' | ':' => {
        escaped.push('$');
        escaped.push(ch);
      }
      '\n' => escaped.push_str("$\n"),
      _ => escaped.push(ch),
    }
  }
  escaped
}

pub fn escape_value(value: &str) -> String {
  value.replace('$', "$$").replace('\n', "$\n")
}

fn write_paths(w: &mut impl Write, paths: &[String]) -> io::Result<()> {
  for path in paths {
    write!(w, " {}", escape_path(path))?;
  }
  Ok(())
}

fn write_rule(w: &mut impl Write, rule: &CoreRule) -> io::Result<()> {
  writeln!(w, "rule {}", rule.name)?;
  let command = rule
    .commands
    .iter()
    .map(|args| args.join(" "))
    .collect::<Vec<_>>()
    .join(COMMAND_SEPARATOR);
  writeln!(w, "  command = {}", command)?;
  if let Some(description) = &rule.description {
    writeln!(w, "  description = {}", description)?;
  }
  if rule.generator {
    writeln!(w, "  generator = 1")?;
  }
  if rule.restat {
    writeln!(w, "  restat = 1")?;
  }
  writeln!(w)
}

fn write_target(w: &mut impl Write, target: &CoreTarget) -> io::Result<()> {
  write!(w, "build")?;
  write_paths(w, &target.outputs)?;
  write!(w, ": {}", target.rule)?;
  write_paths(w, &target.inputs)?;

  let implicits: Vec<String> = target
    .implicits
    .iter()
    .chain(target.regen_implicits.iter().filter(|p| !target.implicits.contains(p)))
    .cloned()
    .collect();
  if !implicits.is_empty() {
    write!(w, " |")?;
    write_paths(w, &implicits)?;
  }
  if !target.order_only.is_empty() {
    write!(w, " ||")?;
    write_paths(w, &target.order_only)?;
  }
  writeln!(w)?;

  for (name, value) in &target.vars {
    writeln!(w, "  {} = {}", name, escape_value(value))?;
  }
  writeln!(w)
}

/// Write the whole graph.
///
/// Targets with `all == false` are left out of the `all` alias, so the
/// executor only builds them on request.
pub fn write_ninja(export: &CoreExport, w: &mut impl Write) -> io::Result<()> {
  writeln!(w, "# Generated by haga. Do not edit.")?;
  writeln!(w, "ninja_required_version = 1.7")?;
  writeln!(w)?;

  for rule in &export.rules {
    write_rule(w, rule)?;
  }

  for target in &export.targets {
    write_target(w, target)?;
  }

  let defaults: Vec<String> = export
    .targets
    .iter()
    .filter(|t| t.all)
    .flat_map(|t| t.outputs.iter().cloned())
    .collect();
  write!(w, "build {}: phony", ALL_TARGET)?;
  write_paths(w, &defaults)?;
  writeln!(w)?;
  writeln!(w, "default {}", ALL_TARGET)?;
  Ok(())
}

/// [`write_ninja`] into a string.
pub fn to_ninja_string(export: &CoreExport) -> String {
  let mut buf = Vec::new();
  // Writing to a Vec cannot fail.
  let _ = write_ninja(export, &mut buf);
  String::from_utf8_lossy(&buf).into_owned()
}
