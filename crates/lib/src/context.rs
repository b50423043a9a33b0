//! Per-generation resolution state.
//!
//! A [`Context`] owns the keyword mapping for one invocation, the diagnostics
//! collected while expanding targets, and the rule registry. Every expansion
//! function takes the context explicitly; there is no process-wide instance.
//!
//! Diagnostics never abort expansion. They accumulate until
//! [`Context::flush_report`] so that one run surfaces every problem.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, error, warn};

use crate::consts::BUILD_DIR_NAME;
use crate::core::{CoreRule, Registration, RuleRegistry};
use crate::deploy::DeployErrorCode;
use crate::keyword::Keyword;
use crate::path::normalize;
use crate::tools::Tools;

/// A recoverable problem found during generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Diagnostic {
  #[error("keyword {0} is not defined in this context")]
  UnknownKeyword(String),

  #[error("duplicate rule found: {0}. ignoring")]
  DuplicateRule(String),

  #[error("cannot {action} {} (error-code: {code})", path.display())]
  DeployConfig {
    action: &'static str,
    path: PathBuf,
    code: DeployErrorCode,
  },

  #[error("spaces and EOL in rsync input '{0}' is unsupported")]
  UnsupportedDeployInput(String),

  #[error("output '{0}' is produced by more than one target")]
  DuplicateOutput(String),
}

/// Diagnostics drained from a context by [`Context::flush_report`].
#[derive(Debug, Default)]
pub struct Report {
  pub errors: Vec<Diagnostic>,
  pub warnings: Vec<Diagnostic>,
}

impl Report {
  /// Warnings alone do not fail a generation.
  pub fn is_success(&self) -> bool {
    self.errors.is_empty()
  }
}

pub type KeywordMap = BTreeMap<Keyword, String>;

#[derive(Debug, Default)]
pub struct Context {
  keywords: KeywordMap,
  errors: Vec<Diagnostic>,
  warnings: Vec<Diagnostic>,
  rules: RuleRegistry,
}

impl Context {
  pub fn new(keywords: KeywordMap) -> Self {
    Self {
      keywords,
      ..Default::default()
    }
  }

  /// Context for generating `haga_file` from the working directory `cwd`.
  ///
  /// The current input directory is the description's directory. The current
  /// output directory mirrors it under `<cwd>/out`.
  pub fn for_invocation(cwd: &Path, haga_file: &Path, haga_command: &Path, tools: &Tools) -> Self {
    let haga_file = normalize(&cwd.join(haga_file));
    let current_input_dir = haga_file.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
    let input_sub_dir = current_input_dir.strip_prefix(cwd).unwrap_or(Path::new(""));
    let output_dir = cwd.join(BUILD_DIR_NAME);

    let display = |p: &Path| p.to_string_lossy().into_owned();

    let mut keywords = KeywordMap::new();
    keywords.insert(Keyword::InputDir, display(cwd));
    keywords.insert(Keyword::OutputDir, display(&output_dir));
    keywords.insert(Keyword::CurrentInputDir, display(&current_input_dir));
    keywords.insert(Keyword::CurrentOutputDir, display(&normalize(&output_dir.join(input_sub_dir))));
    keywords.insert(Keyword::HagaCommand, display(haga_command));
    keywords.insert(Keyword::HagaInputHagafile, display(&haga_file));
    keywords.insert(Keyword::BashCommand, tools.bash.clone());
    keywords.insert(Keyword::ClangCommand, tools.clang.clone());
    keywords.insert(Keyword::CopyCommand, tools.copy.clone());
    keywords.insert(Keyword::MagickCommand, tools.magick.clone());
    keywords.insert(Keyword::RsvgConvertCommand, tools.rsvg_convert.clone());
    keywords.insert(Keyword::TouchCommand, tools.touch.clone());

    debug!(?keywords, "created context");
    Self::new(keywords)
  }

  /// Resolve a keyword. An unmapped keyword records one error and yields an
  /// empty string so expansion can continue.
  pub fn resolve_keyword(&mut self, keyword: Keyword) -> String {
    match self.keywords.get(&keyword) {
      Some(value) => value.clone(),
      None => {
        self.report_error(Diagnostic::UnknownKeyword(keyword.to_string()));
        String::new()
      }
    }
  }

  /// Record a keyword name outside the known set. Yields an empty string.
  pub fn report_unknown_keyword(&mut self, name: &str) -> String {
    self.report_error(Diagnostic::UnknownKeyword(name.to_string()));
    String::new()
  }

  pub fn keywords(&self) -> &KeywordMap {
    &self.keywords
  }

  pub fn report_error(&mut self, diagnostic: Diagnostic) {
    self.errors.push(diagnostic);
  }

  pub fn report_warning(&mut self, diagnostic: Diagnostic) {
    self.warnings.push(diagnostic);
  }

  pub fn errors(&self) -> &[Diagnostic] {
    &self.errors
  }

  pub fn warnings(&self) -> &[Diagnostic] {
    &self.warnings
  }

  pub fn has_errors(&self) -> bool {
    !self.errors.is_empty()
  }

  /// Drain every collected diagnostic, logging each one.
  pub fn flush_report(&mut self) -> Report {
    let report = Report {
      errors: std::mem::take(&mut self.errors),
      warnings: std::mem::take(&mut self.warnings),
    };
    for diagnostic in &report.errors {
      error!("{diagnostic}");
    }
    for diagnostic in &report.warnings {
      warn!("{diagnostic}");
    }
    debug!(
      errors = report.errors.len(),
      warnings = report.warnings.len(),
      "flushed diagnostics"
    );
    report
  }

  pub fn rules(&self) -> &RuleRegistry {
    &self.rules
  }

  pub fn has_rule(&self, name: &str) -> bool {
    self.rules.contains(name)
  }

  /// Register a rule, reporting a conflicting body as a duplicate.
  pub fn add_rule(&mut self, rule: CoreRule) {
    let name = rule.name.clone();
    match self.rules.register(rule) {
      Registration::Added => debug!(rule = %name, "registered rule"),
      Registration::AlreadyPresent => {}
      Registration::Conflict => self.report_error(Diagnostic::DuplicateRule(name)),
    }
  }
}
