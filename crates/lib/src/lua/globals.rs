//! The `haga` global table.
//!
//! - `haga.kw.<NAME>` - Keyword markers, e.g. `haga.kw.CURRENT_OUTPUT_DIR`
//! - `haga.dir` - Directory of the description being evaluated
//!
//! Markers concatenate with strings and with each other:
//!
//! ```lua
//! local out = haga.kw.CURRENT_OUTPUT_DIR .. "/public"
//! ```
//!
//! The result is a composed-string table, equivalent to writing
//! `{ haga.kw.CURRENT_OUTPUT_DIR, "/public" }`.
//!
//! An unknown name such as `haga.kw.NOPE` still yields a marker. It is
//! reported as a diagnostic when the string is composed, so evaluation goes on
//! and every problem in the description surfaces in one run.

use mlua::prelude::*;

use crate::compose::Fragment;
use crate::keyword::Keyword;

/// Metatable `__type` of a keyword marker.
pub const KEYWORD_TYPE: &str = "HagaKeyword";
/// Metatable `__type` of a composed string built with `..`.
pub const COMPOSED_TYPE: &str = "HagaComposed";

const COMPOSED_MT_KEY: &str = "haga.composed_mt";

/// Register the `haga` global table in the Lua runtime.
pub fn register_globals(lua: &Lua) -> LuaResult<()> {
  let haga = lua.create_table()?;

  let composed_mt = create_composed_metatable(lua)?;
  lua.set_named_registry_value(COMPOSED_MT_KEY, composed_mt)?;

  haga.set("kw", create_keyword_table(lua)?)?;
  haga.set("dir", "")?;

  lua.globals().set("haga", haga)?;
  Ok(())
}

/// Return the fragment a marker table stands for, if `table` is one.
///
/// Names outside the known keyword set become [`Fragment::Unknown`].
pub fn marker_fragment(table: &LuaTable) -> LuaResult<Option<Fragment>> {
  let Some(mt) = table.metatable() else {
    return Ok(None);
  };
  match mt.get::<Option<String>>("__type")?.as_deref() {
    Some(KEYWORD_TYPE) => {
      let name: String = table.get("keyword")?;
      Ok(Some(match name.parse::<Keyword>() {
        Ok(keyword) => Fragment::Keyword(keyword),
        Err(_) => Fragment::Unknown(name),
      }))
    }
    _ => Ok(None),
  }
}

fn create_keyword_table(lua: &Lua) -> LuaResult<LuaTable> {
  let kw = lua.create_table()?;
  for keyword in Keyword::ALL {
    kw.set(keyword.as_str(), create_marker(lua, keyword.as_str())?)?;
  }

  // Unknown names yield a marker too; composition reports them.
  let mt = lua.create_table()?;
  mt.set(
    "__index",
    lua.create_function(|lua, (_, name): (LuaValue, LuaValue)| {
      let name = match name {
        LuaValue::String(s) => s.to_str()?.to_string(),
        other => format!("{other:?}"),
      };
      create_marker(lua, &name)
    })?,
  )?;
  kw.set_metatable(Some(mt))?;
  Ok(kw)
}

fn create_marker(lua: &Lua, name: &str) -> LuaResult<LuaTable> {
  let marker = lua.create_table()?;
  marker.set("keyword", name)?;

  let label = format!("haga.kw.{name}");
  let mt = lua.create_table()?;
  mt.set("__type", KEYWORD_TYPE)?;
  mt.set("__concat", lua.create_function(concat)?)?;
  mt.set("__tostring", lua.create_function(move |_, _: LuaValue| Ok(label.clone()))?)?;
  marker.set_metatable(Some(mt))?;
  Ok(marker)
}

fn create_composed_metatable(lua: &Lua) -> LuaResult<LuaTable> {
  let mt = lua.create_table()?;
  mt.set("__type", COMPOSED_TYPE)?;
  mt.set("__concat", lua.create_function(concat)?)?;
  Ok(mt)
}

/// Append the fragments of `value` to `out`.
fn push_fragments(out: &LuaTable, value: LuaValue) -> LuaResult<()> {
  match value {
    LuaValue::Table(t) => {
      if marker_fragment(&t)?.is_some() {
        return out.push(t);
      }
      for item in t.sequence_values::<LuaValue>() {
        push_fragments(out, item?)?;
      }
      Ok(())
    }
    LuaValue::String(_) | LuaValue::Integer(_) | LuaValue::Number(_) => out.push(value),
    other => Err(LuaError::external(format!(
      "cannot concatenate a {} with a keyword",
      other.type_name()
    ))),
  }
}

fn concat(lua: &Lua, (a, b): (LuaValue, LuaValue)) -> LuaResult<LuaTable> {
  let out = lua.create_table()?;
  push_fragments(&out, a)?;
  push_fragments(&out, b)?;
  let mt: LuaTable = lua.named_registry_value(COMPOSED_MT_KEY)?;
  out.set_metatable(Some(mt))?;
  Ok(out)
}
