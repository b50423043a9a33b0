//! Canonical build graph types.
//!
//! These are the post-expansion edges and rules handed to the graph writer.
//! Every path is absolute by the time a target reaches this form.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name of the executor's built-in alias rule. It never appears in the
/// rule registry.
pub const PHONY_RULE: &str = "phony";

/// One command line of a rule, as a list of already-resolved arguments.
pub type CoreCommandArgs = Vec<String>;

/// A named command template referenced by targets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreRule {
  pub name: String,
  /// Commands run in sequence; a failing command stops the rule.
  pub commands: Vec<CoreCommandArgs>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub description: Option<String>,
  /// The rule rebuilds the build graph itself.
  #[serde(default, skip_serializing_if = "is_false")]
  pub generator: bool,
  /// Recheck output timestamps after the rule runs.
  #[serde(default, skip_serializing_if = "is_false")]
  pub restat: bool,
}

impl CoreRule {
  pub fn new(name: impl Into<String>, commands: Vec<CoreCommandArgs>) -> Self {
    Self {
      name: name.into(),
      commands,
      description: None,
      generator: false,
      restat: false,
    }
  }

  pub fn with_description(mut self, description: impl Into<String>) -> Self {
    self.description = Some(description.into());
    self
  }

  /// Two rules are interchangeable when everything but the name matches.
  pub fn same_body(&self, other: &CoreRule) -> bool {
    self.commands == other.commands
      && self.description == other.description
      && self.generator == other.generator
      && self.restat == other.restat
  }
}

/// A single build edge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreTarget {
  pub inputs: Vec<String>,
  pub outputs: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub implicits: Vec<String>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub order_only: Vec<String>,
  /// Files whose change must regenerate the build graph.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub regen_implicits: Vec<String>,
  pub rule: String,
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub vars: BTreeMap<String, String>,
  /// Part of the default `all` alias.
  #[serde(default = "default_true", skip_serializing_if = "is_true")]
  pub all: bool,
}

impl CoreTarget {
  pub fn new(rule: impl Into<String>, inputs: Vec<String>, outputs: Vec<String>) -> Self {
    Self {
      inputs,
      outputs,
      implicits: Vec::new(),
      order_only: Vec::new(),
      regen_implicits: Vec::new(),
      rule: rule.into(),
      vars: BTreeMap::new(),
      all: true,
    }
  }

  pub fn with_implicits(mut self, implicits: Vec<String>) -> Self {
    self.implicits = implicits;
    self
  }

  pub fn with_var(mut self, name: &str, value: impl Into<String>) -> Self {
    self.vars.insert(name.to_string(), value.into());
    self
  }

  pub fn is_phony(&self) -> bool {
    self.rule == PHONY_RULE
  }
}

/// The complete canonical graph: deduplicated rules plus flattened targets.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreExport {
  pub rules: Vec<CoreRule>,
  pub targets: Vec<CoreTarget>,
}

impl CoreExport {
  pub fn rule(&self, name: &str) -> Option<&CoreRule> {
    self.rules.iter().find(|r| r.name == name)
  }

  /// Outputs declared by more than one target.
  ///
  /// The executor rejects such graphs; generation reports them as warnings.
  pub fn duplicate_outputs(&self) -> Vec<&str> {
    let mut seen = std::collections::HashSet::new();
    let mut dups = Vec::new();
    for output in self.targets.iter().flat_map(|t| t.outputs.iter()) {
      if !seen.insert(output.as_str()) && !dups.contains(&output.as_str()) {
        dups.push(output.as_str());
      }
    }
    dups
  }
}

fn default_true() -> bool {
  true
}

fn is_true(b: &bool) -> bool {
  *b
}

fn is_false(b: &bool) -> bool {
  !*b
}
