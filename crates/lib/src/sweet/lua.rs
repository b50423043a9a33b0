//! Conversion of a description's Lua result into a [`SweetExport`].
//!
//! ```lua
//! return {
//!   rules = {
//!     { name = "stamp", commands = { { haga.kw.TOUCH_COMMAND, "$out" } } },
//!   },
//!   targets = {
//!     { type = "cpps", inputs = { "index.html.in" }, output_dir = "public" },
//!     { type = "copy", inputs = { "robots.txt" }, output_dir = "public" },
//!     { type = "rsync", name = "deploy", src_dir = "public",
//!       inputs = { "index.html", "robots.txt" }, dst_dir = "user@host:/srv/www" },
//!   },
//! }
//! ```
//!
//! Shape errors (missing required fields, wrong types, unknown `type`) are
//! Lua errors and abort evaluation.

use std::collections::BTreeMap;

use mlua::prelude::*;

use crate::compose::{Fragment, SweetString};
use crate::core::CoreTarget;
use crate::lua::globals::marker_fragment;

use super::types::{
  ConvertTarget, CppTarget, CppsTarget, FilesTarget, RegenTarget, RsyncTarget, SweetExport, SweetRule, SweetTarget,
  TargetKind, ZipTarget,
};

/// Config file name used when an `rsync` target names none.
pub const DEFAULT_DEPLOY_CONFIG: &str = "config";

fn shape_error(context: &str, msg: impl std::fmt::Display) -> LuaError {
  LuaError::external(format!("{context}: {msg}"))
}

fn push_fragment(fragments: &mut Vec<Fragment>, value: LuaValue, context: &str) -> LuaResult<()> {
  match value {
    LuaValue::String(s) => fragments.push(Fragment::Literal(s.to_str()?.to_string())),
    LuaValue::Integer(i) => fragments.push(Fragment::Literal(i.to_string())),
    LuaValue::Number(n) => fragments.push(Fragment::Literal(n.to_string())),
    LuaValue::Table(t) => match marker_fragment(&t)? {
      Some(fragment) => fragments.push(fragment),
      None => {
        for item in t.sequence_values::<LuaValue>() {
          push_fragment(fragments, item?, context)?;
        }
      }
    },
    other => {
      return Err(shape_error(
        context,
        format!("expected a string or keyword, got {}", other.type_name()),
      ));
    }
  }
  Ok(())
}

/// A plain string, a keyword marker, or an array mixing both.
pub fn sweet_string_from_lua(value: LuaValue, context: &str) -> LuaResult<SweetString> {
  match value {
    LuaValue::String(s) => Ok(SweetString::Literal(s.to_str()?.to_string())),
    LuaValue::Table(_) => {
      let mut fragments = Vec::new();
      push_fragment(&mut fragments, value, context)?;
      Ok(SweetString::Composed(fragments))
    }
    LuaValue::Integer(i) => Ok(SweetString::Literal(i.to_string())),
    LuaValue::Number(n) => Ok(SweetString::Literal(n.to_string())),
    other => Err(shape_error(
      context,
      format!("expected a string or keyword, got {}", other.type_name()),
    )),
  }
}

fn sweet_strings_from_lua(value: LuaValue, context: &str) -> LuaResult<Vec<SweetString>> {
  match value {
    LuaValue::Table(t) => t
      .sequence_values::<LuaValue>()
      .map(|item| sweet_string_from_lua(item?, context))
      .collect(),
    other => Err(shape_error(context, format!("expected an array, got {}", other.type_name()))),
  }
}

fn required_string(table: &LuaTable, field: &str, context: &str) -> LuaResult<SweetString> {
  match table.get::<LuaValue>(field)? {
    LuaValue::Nil => Err(shape_error(context, format!("missing field '{field}'"))),
    value => sweet_string_from_lua(value, &format!("{context}.{field}")),
  }
}

fn optional_string(table: &LuaTable, field: &str, context: &str) -> LuaResult<Option<SweetString>> {
  match table.get::<LuaValue>(field)? {
    LuaValue::Nil => Ok(None),
    value => sweet_string_from_lua(value, &format!("{context}.{field}")).map(Some),
  }
}

fn optional_strings(table: &LuaTable, field: &str, context: &str) -> LuaResult<Option<Vec<SweetString>>> {
  match table.get::<LuaValue>(field)? {
    LuaValue::Nil => Ok(None),
    value => sweet_strings_from_lua(value, &format!("{context}.{field}")).map(Some),
  }
}

fn required_strings(table: &LuaTable, field: &str, context: &str) -> LuaResult<Vec<SweetString>> {
  optional_strings(table, field, context)?.ok_or_else(|| shape_error(context, format!("missing field '{field}'")))
}

/// An array of plain strings. Keywords are not allowed.
fn plain_strings(table: &LuaTable, field: &str, context: &str) -> LuaResult<Vec<String>> {
  match table.get::<LuaValue>(field)? {
    LuaValue::Nil => Ok(Vec::new()),
    LuaValue::Table(t) => t
      .sequence_values::<LuaValue>()
      .map(|item| match item? {
        LuaValue::String(s) => Ok(s.to_str()?.to_string()),
        other => Err(shape_error(
          &format!("{context}.{field}"),
          format!("expected a plain string, got {}", other.type_name()),
        )),
      })
      .collect(),
    other => Err(shape_error(
      &format!("{context}.{field}"),
      format!("expected an array, got {}", other.type_name()),
    )),
  }
}

fn plain_string(table: &LuaTable, field: &str, context: &str) -> LuaResult<String> {
  table
    .get::<Option<String>>(field)?
    .ok_or_else(|| shape_error(context, format!("missing field '{field}'")))
}

pub fn sweet_rule_from_lua(table: &LuaTable, context: &str) -> LuaResult<SweetRule> {
  let name = plain_string(table, "name", context)?;
  let context = format!("{context} '{name}'");

  let commands = match table.get::<LuaValue>("commands")? {
    LuaValue::Table(t) => t
      .sequence_values::<LuaValue>()
      .map(|cmd| sweet_strings_from_lua(cmd?, &format!("{context}.commands")))
      .collect::<LuaResult<Vec<_>>>()?,
    _ => return Err(shape_error(&context, "'commands' must be an array of argument arrays")),
  };

  Ok(SweetRule {
    name,
    commands,
    description: optional_string(table, "description", &context)?,
    generator: table.get::<Option<bool>>("generator")?.unwrap_or(false),
    restat: table.get::<Option<bool>>("restat")?.unwrap_or(false),
  })
}

fn core_target_from_lua(table: &LuaTable, context: &str) -> LuaResult<CoreTarget> {
  let mut target = CoreTarget::new(
    plain_string(table, "rule", context)?,
    plain_strings(table, "inputs", context)?,
    plain_strings(table, "outputs", context)?,
  );
  target.implicits = plain_strings(table, "implicits", context)?;
  target.order_only = plain_strings(table, "order_only", context)?;
  target.regen_implicits = plain_strings(table, "regen_implicits", context)?;
  target.vars = table
    .get::<Option<BTreeMap<String, String>>>("vars")?
    .unwrap_or_default();
  target.all = table.get::<Option<bool>>("all")?.unwrap_or(true);
  Ok(target)
}

pub fn sweet_target_from_lua(table: &LuaTable, context: &str) -> LuaResult<SweetTarget> {
  let type_name: String = table
    .get::<Option<String>>("type")?
    .ok_or_else(|| shape_error(context, "missing field 'type'"))?;
  let kind = TargetKind::parse(&type_name)
    .ok_or_else(|| shape_error(context, format!("unknown target type '{type_name}'")))?;
  let context = &format!("{context} ({kind})");

  let files = || -> LuaResult<FilesTarget> {
    Ok(FilesTarget {
      inputs: required_strings(table, "inputs", context)?,
      input_dir: optional_string(table, "input_dir", context)?,
      output_dir: optional_string(table, "output_dir", context)?,
    })
  };
  let convert = || -> LuaResult<ConvertTarget> {
    Ok(ConvertTarget {
      input: required_string(table, "input", context)?,
      output: required_string(table, "output", context)?,
      args: optional_strings(table, "args", context)?.unwrap_or_default(),
    })
  };

  let target = match kind {
    TargetKind::Cpp => SweetTarget::Cpp(CppTarget {
      input: required_string(table, "input", context)?,
      output: optional_string(table, "output", context)?,
      implicits: optional_strings(table, "implicits", context)?.unwrap_or_default(),
      defines: optional_strings(table, "defines", context)?.unwrap_or_default(),
    }),
    TargetKind::Cpps => SweetTarget::Cpps(CppsTarget {
      inputs: required_strings(table, "inputs", context)?,
      input_dir: optional_string(table, "input_dir", context)?,
      output_dir: optional_string(table, "output_dir", context)?,
      implicits: optional_strings(table, "implicits", context)?.unwrap_or_default(),
      defines: optional_strings(table, "defines", context)?.unwrap_or_default(),
    }),
    TargetKind::Copy => SweetTarget::Copy(files()?),
    TargetKind::Minify => SweetTarget::Minify(files()?),
    TargetKind::Magick => SweetTarget::Magick(convert()?),
    TargetKind::RsvgConvert => SweetTarget::RsvgConvert(convert()?),
    TargetKind::Zip => SweetTarget::Zip(ZipTarget {
      inputs: required_strings(table, "inputs", context)?,
      input_dir: optional_string(table, "input_dir", context)?,
      output: required_string(table, "output", context)?,
    }),
    TargetKind::Regen => SweetTarget::Regen(RegenTarget {
      inputs: optional_strings(table, "inputs", context)?,
      outputs: optional_strings(table, "outputs", context)?,
      implicits: optional_strings(table, "implicits", context)?,
    }),
    TargetKind::Rsync => SweetTarget::Rsync(RsyncTarget {
      name: plain_string(table, "name", context)?,
      inputs: plain_strings(table, "inputs", context)?,
      src_dir: required_string(table, "src_dir", context)?,
      config: optional_string(table, "config", context)?.unwrap_or_else(|| DEFAULT_DEPLOY_CONFIG.into()),
      dst_dir_template: required_string(table, "dst_dir", context)?,
    }),
    TargetKind::Core => SweetTarget::Core(core_target_from_lua(table, context)?),
  };
  Ok(target)
}

/// Convert the value returned by a description.
pub fn sweet_export_from_lua(value: LuaValue) -> LuaResult<SweetExport> {
  let LuaValue::Table(root) = value else {
    return Err(LuaError::external("description must return a table"));
  };

  let mut export = SweetExport::default();

  match root.get::<LuaValue>("rules")? {
    LuaValue::Nil => {}
    LuaValue::Table(rules) => {
      for (i, rule) in rules.sequence_values::<LuaTable>().enumerate() {
        export.rules.push(sweet_rule_from_lua(&rule?, &format!("rules[{}]", i + 1))?);
      }
    }
    _ => return Err(LuaError::external("'rules' must be an array")),
  }

  let LuaValue::Table(targets) = root.get::<LuaValue>("targets")? else {
    return Err(LuaError::external("description must have a 'targets' array"));
  };
  for (i, target) in targets.sequence_values::<LuaTable>().enumerate() {
    export
      .targets
      .push(sweet_target_from_lua(&target?, &format!("targets[{}]", i + 1))?);
  }

  Ok(export)
}
