//! Path algebra for target expansion.
//!
//! Everything here is lexical: paths are joined and normalized as strings and
//! the filesystem is never consulted, so expansion does not depend on which
//! build outputs already exist.

use std::path::{Component, Path, PathBuf};

use crate::compose::{Resolver, SweetString, compose_string};
use crate::keyword::Keyword;

/// Resolve `.` and `..` components without touching the filesystem.
///
/// `..` never climbs above the root of an absolute path.
pub fn normalize(path: &Path) -> PathBuf {
  let mut normalized = PathBuf::new();
  for component in path.components() {
    match component {
      Component::ParentDir => {
        if !normalized.pop() && !path.has_root() {
          normalized.push("..");
        }
      }
      Component::CurDir => {}
      _ => normalized.push(component),
    }
  }
  normalized
}

/// Join `name` onto `base` and normalize. An absolute `name` replaces `base`.
pub fn join_normalized(base: &str, name: &str) -> String {
  normalize(&Path::new(base).join(name)).to_string_lossy().into_owned()
}

/// Absolute path of `relative` under the directory named by `base`.
pub fn to_absolute(resolver: &mut impl Resolver, relative: &str, base: Keyword) -> String {
  let base = resolver.resolve_keyword(base);
  join_normalized(&base, relative)
}

/// Absolute path of `name` under the composed directory `base`.
pub fn resolve_path(resolver: &mut impl Resolver, base: &SweetString, name: &SweetString) -> String {
  let base = compose_string(resolver, base);
  let name = compose_string(resolver, name);
  join_normalized(&base, &name)
}

/// [`resolve_path`] for many names sharing one base.
pub fn resolve_paths(resolver: &mut impl Resolver, base: &SweetString, names: &[SweetString]) -> Vec<String> {
  let base = compose_string(resolver, base);
  names
    .iter()
    .map(|name| {
      let name = compose_string(resolver, name);
      join_normalized(&base, &name)
    })
    .collect()
}

/// Strip a literal trailing `suffix`. Paths without it pass through.
pub fn drop_suffix<'a>(path: &'a str, suffix: &str) -> &'a str {
  path.strip_suffix(suffix).unwrap_or(path)
}

/// Append `ext` to the basename of `path`, keeping its directory.
pub fn append_suffix(resolver: &mut impl Resolver, path: &SweetString, ext: &str) -> String {
  let path = compose_string(resolver, path);
  let normalized = normalize(Path::new(&path));
  format!("{}{}", normalized.to_string_lossy(), ext)
}
