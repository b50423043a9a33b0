//! Symbolic keywords resolved through a [`Context`](crate::context::Context).
//!
//! A keyword has no value of its own. Build descriptions reference keywords
//! (e.g. "the current output directory") and the hosting CLI decides what
//! they mean for one invocation.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The closed set of keywords a build description may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Keyword {
  /// Root of the source tree (the invocation's working directory).
  InputDir,
  /// Root of the build tree (`<cwd>/out`).
  OutputDir,
  /// Directory containing the build description being generated.
  CurrentInputDir,
  /// Mirror of `CurrentInputDir` under the build tree.
  CurrentOutputDir,
  BashCommand,
  ClangCommand,
  CopyCommand,
  /// The `haga` executable itself.
  HagaCommand,
  /// Path of the build description file.
  HagaInputHagafile,
  MagickCommand,
  RsvgConvertCommand,
  TouchCommand,
}

impl Keyword {
  pub const ALL: [Keyword; 12] = [
    Keyword::InputDir,
    Keyword::OutputDir,
    Keyword::CurrentInputDir,
    Keyword::CurrentOutputDir,
    Keyword::BashCommand,
    Keyword::ClangCommand,
    Keyword::CopyCommand,
    Keyword::HagaCommand,
    Keyword::HagaInputHagafile,
    Keyword::MagickCommand,
    Keyword::RsvgConvertCommand,
    Keyword::TouchCommand,
  ];

  /// The name used in build descriptions (`haga.kw.<NAME>`).
  pub fn as_str(&self) -> &'static str {
    match self {
      Keyword::InputDir => "INPUT_DIR",
      Keyword::OutputDir => "OUTPUT_DIR",
      Keyword::CurrentInputDir => "CURRENT_INPUT_DIR",
      Keyword::CurrentOutputDir => "CURRENT_OUTPUT_DIR",
      Keyword::BashCommand => "BASH_COMMAND",
      Keyword::ClangCommand => "CLANG_COMMAND",
      Keyword::CopyCommand => "COPY_COMMAND",
      Keyword::HagaCommand => "HAGA_COMMAND",
      Keyword::HagaInputHagafile => "HAGA_INPUT_HAGAFILE",
      Keyword::MagickCommand => "MAGICK_COMMAND",
      Keyword::RsvgConvertCommand => "RSVG_CONVERT_COMMAND",
      Keyword::TouchCommand => "TOUCH_COMMAND",
    }
  }
}

impl fmt::Display for Keyword {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown keyword: {0}")]
pub struct UnknownKeyword(pub String);

impl FromStr for Keyword {
  type Err = UnknownKeyword;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Keyword::ALL
      .into_iter()
      .find(|kw| kw.as_str() == s)
      .ok_or_else(|| UnknownKeyword(s.to_string()))
  }
}
