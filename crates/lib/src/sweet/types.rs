//! Sugar target descriptors as read from a build description.
//!
//! Paths and arguments are [`SweetString`]s: they may still reference
//! keywords and are only resolved during expansion.

use std::fmt;

use crate::compose::{SweetCommandArgs, SweetString};
use crate::core::CoreTarget;

/// A rule whose strings are resolved through the context on registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweetRule {
  pub name: String,
  pub commands: Vec<SweetCommandArgs>,
  pub description: Option<SweetString>,
  pub generator: bool,
  pub restat: bool,
}

impl SweetRule {
  pub fn new(name: impl Into<String>, commands: Vec<SweetCommandArgs>) -> Self {
    Self {
      name: name.into(),
      commands,
      description: None,
      generator: false,
      restat: false,
    }
  }

  pub fn with_description(mut self, description: impl Into<SweetString>) -> Self {
    self.description = Some(description.into());
    self
  }
}

/// Preprocess one template with the C preprocessor.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppTarget {
  pub input: SweetString,
  /// Defaults to `input` without its `.in` suffix.
  pub output: Option<SweetString>,
  pub implicits: Vec<SweetString>,
  pub defines: Vec<SweetString>,
}

/// Preprocess many templates sharing input and output directories.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CppsTarget {
  pub inputs: Vec<SweetString>,
  pub input_dir: Option<SweetString>,
  pub output_dir: Option<SweetString>,
  pub implicits: Vec<SweetString>,
  pub defines: Vec<SweetString>,
}

/// One edge per input, mirroring its relative path into the output tree.
///
/// Used by both `copy` and `minify`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilesTarget {
  pub inputs: Vec<SweetString>,
  pub input_dir: Option<SweetString>,
  pub output_dir: Option<SweetString>,
}

/// Convert one image into another with extra tool arguments.
///
/// Used by both `magick` and `rsvg-convert`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertTarget {
  pub input: SweetString,
  pub output: SweetString,
  pub args: SweetCommandArgs,
}

/// Pack many inputs into one archive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ZipTarget {
  pub inputs: Vec<SweetString>,
  pub input_dir: Option<SweetString>,
  pub output: SweetString,
}

/// Rebuild the build file when the description changes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegenTarget {
  pub inputs: Option<Vec<SweetString>>,
  pub outputs: Option<Vec<SweetString>>,
  pub implicits: Option<Vec<SweetString>>,
}

/// Mirror a directory of build outputs to a deployment destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RsyncTarget {
  /// Alias the user builds, e.g. `deploy`.
  pub name: String,
  /// The complete whitelist, relative to `src_dir`.
  pub inputs: Vec<String>,
  pub src_dir: SweetString,
  /// Config file, relative to the current input directory.
  pub config: SweetString,
  /// Destination written into a freshly bootstrapped config.
  pub dst_dir_template: SweetString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweetTarget {
  Cpp(CppTarget),
  Cpps(CppsTarget),
  Copy(FilesTarget),
  Magick(ConvertTarget),
  RsvgConvert(ConvertTarget),
  Minify(FilesTarget),
  Zip(ZipTarget),
  Regen(RegenTarget),
  Rsync(RsyncTarget),
  /// Passed through expansion unchanged.
  Core(CoreTarget),
}

/// The tag of a sugar target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
  Cpp,
  Cpps,
  Copy,
  Magick,
  RsvgConvert,
  Minify,
  Zip,
  Regen,
  Rsync,
  Core,
}

impl TargetKind {
  pub const ALL: [TargetKind; 10] = [
    TargetKind::Cpp,
    TargetKind::Cpps,
    TargetKind::Copy,
    TargetKind::Magick,
    TargetKind::RsvgConvert,
    TargetKind::Minify,
    TargetKind::Zip,
    TargetKind::Regen,
    TargetKind::Rsync,
    TargetKind::Core,
  ];

  /// The `type` field value in a description.
  pub fn as_str(&self) -> &'static str {
    match self {
      TargetKind::Cpp => "cpp",
      TargetKind::Cpps => "cpps",
      TargetKind::Copy => "copy",
      TargetKind::Magick => "magick",
      TargetKind::RsvgConvert => "rsvg-convert",
      TargetKind::Minify => "minify",
      TargetKind::Zip => "zip",
      TargetKind::Regen => "regen",
      TargetKind::Rsync => "rsync",
      TargetKind::Core => "core",
    }
  }

  pub fn parse(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|k| k.as_str() == s)
  }

  /// Name of the built-in rule this kind expands to, if any.
  ///
  /// `cpp` and `cpps` share one rule.
  pub fn rule_name(&self) -> Option<&'static str> {
    match self {
      TargetKind::Cpps => Some("cpp"),
      TargetKind::Core => None,
      other => Some(other.as_str()),
    }
  }
}

impl fmt::Display for TargetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl SweetTarget {
  pub fn kind(&self) -> TargetKind {
    match self {
      SweetTarget::Cpp(_) => TargetKind::Cpp,
      SweetTarget::Cpps(_) => TargetKind::Cpps,
      SweetTarget::Copy(_) => TargetKind::Copy,
      SweetTarget::Magick(_) => TargetKind::Magick,
      SweetTarget::RsvgConvert(_) => TargetKind::RsvgConvert,
      SweetTarget::Minify(_) => TargetKind::Minify,
      SweetTarget::Zip(_) => TargetKind::Zip,
      SweetTarget::Regen(_) => TargetKind::Regen,
      SweetTarget::Rsync(_) => TargetKind::Rsync,
      SweetTarget::Core(_) => TargetKind::Core,
    }
  }
}

/// A whole build description.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweetExport {
  pub rules: Vec<SweetRule>,
  pub targets: Vec<SweetTarget>,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn kind_names_roundtrip() {
    for kind in TargetKind::ALL {
      assert_eq!(TargetKind::parse(kind.as_str()), Some(kind));
    }
    assert_eq!(TargetKind::parse("rsvg_convert"), None);
    assert_eq!(TargetKind::parse(""), None);
  }

  #[test]
  fn cpp_kinds_share_a_rule() {
    assert_eq!(TargetKind::Cpp.rule_name(), Some("cpp"));
    assert_eq!(TargetKind::Cpps.rule_name(), Some("cpp"));
    assert_eq!(TargetKind::RsvgConvert.rule_name(), Some("rsvg-convert"));
    assert_eq!(TargetKind::Core.rule_name(), None);
  }
}
