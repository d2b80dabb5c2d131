//! Field resolution engine.
//!
//! Each configuration value is taken from the config store, computed from
//! earlier answers, or asked for, in that order of preference. Domains of
//! related fields are planned, run, override-merged and persisted one after
//! another by the [`orchestrator`].

pub mod cache;
pub mod catalog;
pub mod field;
pub mod orchestrator;
pub mod overrides;
pub mod planner;
pub mod runner;

use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

pub use cache::ExternalDataCache;
pub use orchestrator::Orchestrator;
pub use runner::PromptRunner;

/// Where a resolved value came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Reused from the config store without asking
    Stored,
    /// Question was hidden; the field's default was applied
    Computed,
    /// Operator answered the question
    Answered,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Origin::Stored => write!(f, "stored"),
            Origin::Computed => write!(f, "computed"),
            Origin::Answered => write!(f, "answered"),
        }
    }
}

/// Final value of one field for one resolution pass
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedField {
    pub name: String,
    pub value: Value,
    pub origin: Origin,
}

impl ResolvedField {
    pub fn new(name: impl Into<String>, value: Value, origin: Origin) -> Self {
        Self {
            name: name.into(),
            value,
            origin,
        }
    }
}

/// Answers collected so far, keyed by field name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Answers {
    values: HashMap<String, Value>,
}

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name).filter(|v| !v.is_null())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        self.values.insert(name.into(), value);
    }

    /// String value of a field, if it holds one
    pub fn str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// True when the field holds a non-empty string
    pub fn has_text(&self, name: &str) -> bool {
        self.str(name).is_some_and(|s| !s.is_empty())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Answers {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut answers = Answers::new();
        for (name, value) in iter {
            answers.insert(name, value);
        }
        answers
    }
}

/// Human-readable rendering of a value, as shown in prompts and summaries
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(display_value)
            .collect::<Vec<_>>()
            .join(", "),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_null_answers_count_as_missing() {
        let mut answers = Answers::new();
        answers.insert("awsProfileCustom", Value::Null);
        answers.insert("projectName", json!("svc"));

        assert!(!answers.contains("awsProfileCustom"));
        assert!(answers.get("awsProfileCustom").is_none());
        assert!(answers.has_text("projectName"));
    }

    #[test]
    fn test_display_value() {
        assert_eq!(display_value(&json!(["a", "b"])), "a, b");
        assert_eq!(display_value(&json!(128)), "128");
        assert_eq!(display_value(&json!("x")), "x");
        assert_eq!(display_value(&Value::Null), "");
    }
}
