//! Deduplicating rule table.

use std::collections::HashMap;

use super::types::CoreRule;

/// Outcome of registering a rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Registration {
  /// The name was free; the rule is now registered.
  Added,
  /// The same body was already registered under this name.
  AlreadyPresent,
  /// A different body owns this name. The new body was discarded.
  Conflict,
}

/// Rules keyed by name, kept in registration order.
///
/// The first registration of a name wins. Later registrations never replace
/// it, so a rule's command template is emitted at most once.
#[derive(Debug, Default, Clone)]
pub struct RuleRegistry {
  rules: Vec<CoreRule>,
  by_name: HashMap<String, usize>,
}

impl RuleRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.by_name.contains_key(name)
  }

  pub fn get(&self, name: &str) -> Option<&CoreRule> {
    self.by_name.get(name).map(|&i| &self.rules[i])
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }

  pub fn register(&mut self, rule: CoreRule) -> Registration {
    match self.by_name.get(&rule.name) {
      Some(&i) if self.rules[i].same_body(&rule) => Registration::AlreadyPresent,
      Some(_) => Registration::Conflict,
      None => {
        self.by_name.insert(rule.name.clone(), self.rules.len());
        self.rules.push(rule);
        Registration::Added
      }
    }
  }

  pub fn iter(&self) -> impl Iterator<Item = &CoreRule> {
    self.rules.iter()
  }

  pub fn to_vec(&self) -> Vec<CoreRule> {
    self.rules.clone()
  }
}
