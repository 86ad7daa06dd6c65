//! Placeholder values and the variable mapping fed to the renderer.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::domain::error::DomainError;

// ── Value ────────────────────────────────────────────────────────────────────

/// A placeholder value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Bool(bool),
    Number(f64),
    String(String),
    List(Vec<String>),
    Null,
}

impl Value {
    /// Truthiness used by `{{#IF}}` blocks.
    ///
    /// Null, `false`, `""`, `"false"` and `0` are falsy. Lists are always
    /// truthy, even when empty.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Bool(b) => *b,
            Self::Number(n) => *n != 0.0,
            Self::String(s) => !s.is_empty() && s != "false",
            Self::List(_) => true,
            Self::Null => false,
        }
    }

    /// The text substituted for a `{{NAME}}` token.
    pub fn to_text(&self) -> String {
        self.to_string()
    }

    pub fn opt_string(value: Option<impl Into<String>>) -> Self {
        value.map_or(Self::Null, |v| Self::String(v.into()))
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => f.write_str(s),
            Self::List(items) => f.write_str(&items.join(", ")),
            Self::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<u16> for Value {
    fn from(n: u16) -> Self {
        Self::Number(f64::from(n))
    }
}

impl From<Vec<String>> for Value {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

// ── Variables ────────────────────────────────────────────────────────────────

/// Placeholder name to value.
///
/// Names are bare identifiers (`[A-Za-z_][A-Za-z0-9_]*`). Setting an existing
/// name overwrites it, so later pipeline stages win over earlier ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Variables(BTreeMap<String, Value>);

impl Variables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `name` is usable as a placeholder.
    pub fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// Set a variable, validating the name.
    pub fn try_set(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Value>,
    ) -> Result<(), DomainError> {
        let name = name.into();
        if !Self::is_valid_name(&name) {
            return Err(DomainError::InvalidVariableName { name });
        }
        self.0.insert(name, value.into());
        Ok(())
    }

    /// Set a variable whose name is a known-good literal.
    pub(crate) fn set(&mut self, name: &'static str, value: impl Into<Value>) {
        debug_assert!(Self::is_valid_name(name), "bad variable name {name}");
        self.0.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    /// Truthiness of a named variable; absent names are falsy.
    pub fn is_truthy(&self, name: &str) -> bool {
        self.get(name).is_some_and(Value::is_truthy)
    }

    /// Copy every entry of `other` over this mapping.
    pub fn extend(&mut self, other: &Variables) {
        for (k, v) in &other.0 {
            self.0.insert(k.clone(), v.clone());
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_table() {
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(Value::from("yes").is_truthy());
        assert!(!Value::from("").is_truthy());
        assert!(!Value::from("false").is_truthy());
        assert!(Value::Number(0.95).is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(Value::List(vec![]).is_truthy());
        assert!(!Value::Null.is_truthy());
    }

    #[test]
    fn text_forms() {
        assert_eq!(Value::Number(0.95).to_text(), "0.95");
        assert_eq!(Value::from(5173u16).to_text(), "5173");
        assert_eq!(Value::Bool(false).to_text(), "false");
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(
            Value::List(vec!["a".into(), "b".into()]).to_text(),
            "a, b"
        );
    }

    #[test]
    fn names_are_validated() {
        let mut vars = Variables::new();
        assert!(vars.try_set("PROJECT_NAME", "x").is_ok());
        assert!(vars.try_set("_private", "x").is_ok());
        assert!(vars.try_set("9LIVES", "x").is_err());
        assert!(vars.try_set("HAS-DASH", "x").is_err());
        assert!(vars.try_set("", "x").is_err());
    }

    #[test]
    fn later_values_overwrite() {
        let mut base = Variables::new();
        base.set("A", "one");
        let mut later = Variables::new();
        later.set("A", "two");
        base.extend(&later);
        assert_eq!(base.get("A"), Some(&Value::from("two")));
    }

    #[test]
    fn absent_is_falsy() {
        assert!(!Variables::new().is_truthy("MISSING"));
    }
}
