//! Composed strings: literal text interleaved with keyword references.
//!
//! Build descriptions rarely know absolute paths or tool locations. Instead
//! they write strings such as `[CURRENT_OUTPUT_DIR, "/public"]`, and the
//! composer substitutes every keyword through a [`Resolver`] (normally the
//! [`Context`](crate::context::Context)) when targets are expanded.
//!
//! # Example
//!
//! ```
//! use haga_lib::compose::{SweetString, compose_string};
//! use haga_lib::context::Context;
//! use haga_lib::keyword::Keyword;
//!
//! let mut ctx = Context::new([(Keyword::OutputDir, "/site/out".to_string())].into());
//! let s = SweetString::under(Keyword::OutputDir, "/public");
//! assert_eq!(compose_string(&mut ctx, &s), "/site/out/public");
//! ```

use crate::context::Context;
use crate::keyword::Keyword;

/// A piece of a composed string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fragment {
  Literal(String),
  Keyword(Keyword),
  /// A keyword name outside the known set, kept so composition can report it.
  Unknown(String),
}

impl From<&str> for Fragment {
  fn from(s: &str) -> Self {
    Fragment::Literal(s.to_string())
  }
}

impl From<String> for Fragment {
  fn from(s: String) -> Self {
    Fragment::Literal(s)
  }
}

impl From<Keyword> for Fragment {
  fn from(kw: Keyword) -> Self {
    Fragment::Keyword(kw)
  }
}

/// Either plain text or an ordered list of fragments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweetString {
  Literal(String),
  Composed(Vec<Fragment>),
}

impl SweetString {
  pub fn composed(fragments: impl IntoIterator<Item = Fragment>) -> Self {
    SweetString::Composed(fragments.into_iter().collect())
  }

  /// `keyword` followed by a literal tail, e.g. `INPUT_DIR + "/toolchain"`.
  pub fn under(keyword: Keyword, tail: &str) -> Self {
    SweetString::Composed(vec![Fragment::Keyword(keyword), Fragment::from(tail)])
  }

}

impl Default for SweetString {
  fn default() -> Self {
    SweetString::Literal(String::new())
  }
}

impl From<&str> for SweetString {
  fn from(s: &str) -> Self {
    SweetString::Literal(s.to_string())
  }
}

impl From<String> for SweetString {
  fn from(s: String) -> Self {
    SweetString::Literal(s)
  }
}

impl From<Keyword> for SweetString {
  fn from(kw: Keyword) -> Self {
    SweetString::Composed(vec![Fragment::Keyword(kw)])
  }
}

/// Arguments of one command line, each a composed string.
pub type SweetCommandArgs = Vec<SweetString>;

/// Source of keyword values during composition.
///
/// Resolution is total: a resolver that cannot map a keyword records the
/// problem itself and returns a placeholder.
pub trait Resolver {
  fn resolve_keyword(&mut self, keyword: Keyword) -> String;

  /// Placeholder for a name that is not a keyword at all.
  fn unknown_keyword(&mut self, name: &str) -> String;
}

impl Resolver for Context {
  fn resolve_keyword(&mut self, keyword: Keyword) -> String {
    Context::resolve_keyword(self, keyword)
  }

  fn unknown_keyword(&mut self, name: &str) -> String {
    self.report_unknown_keyword(name)
  }
}

/// Resolve a composed string. Literals pass through unchanged.
pub fn compose_string(resolver: &mut impl Resolver, s: &SweetString) -> String {
  match s {
    SweetString::Literal(s) => s.clone(),
    SweetString::Composed(fragments) => compose_fragments(resolver, fragments),
  }
}

/// Resolve pre-split fragments left to right.
pub fn compose_fragments(resolver: &mut impl Resolver, fragments: &[Fragment]) -> String {
  let mut result = String::new();
  for fragment in fragments {
    match fragment {
      Fragment::Literal(s) => result.push_str(s),
      Fragment::Keyword(kw) => result.push_str(&resolver.resolve_keyword(*kw)),
      Fragment::Unknown(name) => result.push_str(&resolver.unknown_keyword(name)),
    }
  }
  result
}

/// Resolve an optional composed string.
pub fn compose_opt(resolver: &mut impl Resolver, s: Option<&SweetString>) -> Option<String> {
  s.map(|s| compose_string(resolver, s))
}

/// Wrap `arg` in double quotes, backslash-escaping every character the shell
/// still interprets inside them (`"`, `\`, `$` and backtick).
pub fn quote_arg(arg: &str) -> String {
  let mut quoted = String::with_capacity(arg.len() + 2);
  quoted.push('"');
  for ch in arg.chars() {
    if matches!(ch, '"' | '\\' | '$' | '`') {
      quoted.push('\\');
    }
    quoted.push(ch);
  }
  quoted.push('"');
  quoted
}

/// Resolve every argument, quote each one, and join them with single spaces.
///
/// The result is a single shell-safe token list suitable for a rule variable.
pub fn compose_args(resolver: &mut impl Resolver, args: &[SweetString]) -> String {
  args
    .iter()
    .map(|arg| quote_arg(&compose_string(resolver, arg)))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Resolve each argument of each command without quoting.
pub fn compose_commands(resolver: &mut impl Resolver, commands: &[SweetCommandArgs]) -> Vec<Vec<String>> {
  commands
    .iter()
    .map(|args| args.iter().map(|arg| compose_string(resolver, arg)).collect())
    .collect()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::context::Diagnostic;

  fn site_ctx() -> Context {
    Context::new(
      [
        (Keyword::InputDir, "/site".to_string()),
        (Keyword::CurrentOutputDir, "/site/out".to_string()),
        (Keyword::CopyCommand, "cp".to_string()),
      ]
      .into(),
    )
  }

  #[test]
  fn literal_is_identity() {
    let mut ctx = site_ctx();
    for s in ["", "index.html", "$in", "a \"quoted\" word"] {
      assert_eq!(compose_string(&mut ctx, &SweetString::from(s)), s);
    }
    let fragments = SweetString::composed([Fragment::from("a/"), Fragment::from("b")]);
    assert_eq!(compose_string(&mut ctx, &fragments), "a/b");
    assert!(!ctx.has_errors());
  }

  #[test]
  fn keywords_are_substituted_in_order() {
    let mut ctx = site_ctx();
    let s = SweetString::composed([
      Fragment::from(Keyword::CurrentOutputDir),
      Fragment::from("/public/"),
      Fragment::from(Keyword::CopyCommand),
    ]);
    assert_eq!(compose_string(&mut ctx, &s), "/site/out/public/cp");
  }

  #[test]
  fn unknown_keyword_reports_exactly_once() {
    let mut ctx = site_ctx();
    let s = SweetString::composed([Fragment::from("bin/"), Fragment::from(Keyword::MagickCommand)]);
    assert_eq!(compose_string(&mut ctx, &s), "bin/");
    assert_eq!(ctx.errors(), [Diagnostic::UnknownKeyword("MAGICK_COMMAND".to_string())]);
  }

  #[test]
  fn unknown_name_composes_to_placeholder() {
    let mut ctx = site_ctx();
    let s = SweetString::composed([Fragment::Unknown("NOPE".to_string()), Fragment::from("/x")]);
    assert_eq!(compose_string(&mut ctx, &s), "/x");
    assert_eq!(ctx.errors(), [Diagnostic::UnknownKeyword("NOPE".to_string())]);
  }

  #[test]
  fn args_are_quoted_and_escaped() {
    let mut ctx = site_ctx();
    let args = vec![
      SweetString::from("-background"),
      SweetString::from("none"),
      SweetString::from("say \"hi\""),
      SweetString::under(Keyword::InputDir, "/icon.svg"),
    ];
    assert_eq!(
      compose_args(&mut ctx, &args),
      r#""-background" "none" "say \"hi\"" "/site/icon.svg""#
    );
  }

  #[test]
  fn quoting_neutralizes_shell_expansion() {
    assert_eq!(quote_arg("a;id"), r#""a;id""#);
    assert_eq!(quote_arg("$(id)`id`"), r#""\$(id)\`id\`""#);
    assert_eq!(quote_arg(r"C:\dir"), r#""C:\\dir""#);
  }

  #[test]
  fn empty_args_compose_to_empty_string() {
    let mut ctx = site_ctx();
    assert_eq!(compose_args(&mut ctx, &[]), "");
  }

  #[test]
  fn commands_resolve_without_quoting() {
    let mut ctx = site_ctx();
    let commands = vec![vec![
      SweetString::from(Keyword::CopyCommand),
      SweetString::from("$in"),
      SweetString::from("$out"),
    ]];
    assert_eq!(compose_commands(&mut ctx, &commands), vec![vec!["cp", "$in", "$out"]]);
  }
}
