//! Typed front matter values
//!
//! Front matter arrives as an untyped YAML tree. The compiler needs to branch
//! on "flag", "suppressed", "one value" and "many values", so values are
//! lifted into [`MetaValue`] once at parse time and every consumer matches on
//! the variant instead of probing a `serde_yaml::Value`.

use log::warn;
use serde_yaml::{Mapping, Number, Value};
use std::fmt;

/// A single scalar that can be rendered as a command-line value
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Number(n) => match n.as_f64() {
                // Integral floats print without a fraction; adding 0.0 folds -0 into 0
                Some(v) if n.is_f64() && v.is_finite() && v.fract() == 0.0 && v.abs() < 1e21 => {
                    write!(f, "{:.0}", v + 0.0)
                }
                _ => write!(f, "{}", n),
            },
        }
    }
}

/// A front matter value
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    Null,
    Bool(bool),
    Scalar(Scalar),
    List(Vec<MetaValue>),
    /// Nested mappings (and tagged values) kept as-is for pass-through keys
    Nested(Value),
}

impl MetaValue {
    /// Create a string value
    pub fn string(s: impl Into<String>) -> Self {
        Self::Scalar(Scalar::String(s.into()))
    }

    /// Create an integer value
    pub fn int(i: i64) -> Self {
        Self::Scalar(Scalar::Number(i.into()))
    }

    /// Create a float value
    pub fn float(f: f64) -> Self {
        Self::Scalar(Scalar::Number(Number::from(f)))
    }

    /// Create a list of string values
    pub fn strings<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::List(items.into_iter().map(Self::string).collect())
    }

    /// Lift a YAML value
    pub fn from_yaml(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => Self::Scalar(Scalar::Number(n)),
            Value::String(s) => Self::Scalar(Scalar::String(s)),
            Value::Sequence(seq) => Self::List(seq.into_iter().map(Self::from_yaml).collect()),
            other @ (Value::Mapping(_) | Value::Tagged(_)) => Self::Nested(other),
        }
    }

    /// Lower back into a YAML value
    pub fn to_yaml(&self) -> Value {
        match self {
            Self::Null => Value::Null,
            Self::Bool(b) => Value::Bool(*b),
            Self::Scalar(Scalar::String(s)) => Value::String(s.clone()),
            Self::Scalar(Scalar::Number(n)) => Value::Number(n.clone()),
            Self::List(items) => Value::Sequence(items.iter().map(Self::to_yaml).collect()),
            Self::Nested(v) => v.clone(),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Render the value as a single command-line value.
    ///
    /// Returns `None` for values that have no flat textual form (null, lists,
    /// nested mappings).
    pub fn to_arg_value(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Scalar(s) => Some(s.to_string()),
            Self::Null | Self::List(_) | Self::Nested(_) => None,
        }
    }

    /// Loose string form used when comparing against a closed set of choices.
    /// Lists join their elements with commas.
    pub fn string_form(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Scalar(s) => s.to_string(),
            Self::List(items) => items
                .iter()
                .map(|item| match item {
                    Self::Null => String::new(),
                    other => other.string_form(),
                })
                .collect::<Vec<_>>()
                .join(","),
            Self::Nested(v) => serde_yaml::to_string(v)
                .map(|s| s.trim().to_string())
                .unwrap_or_default(),
        }
    }

    /// Short type name for log messages
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Scalar(Scalar::String(_)) => "string",
            Self::Scalar(Scalar::Number(_)) => "number",
            Self::List(_) => "list",
            Self::Nested(_) => "mapping",
        }
    }
}

impl From<bool> for MetaValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for MetaValue {
    fn from(s: &str) -> Self {
        Self::string(s)
    }
}

impl From<String> for MetaValue {
    fn from(s: String) -> Self {
        Self::string(s)
    }
}

impl From<i64> for MetaValue {
    fn from(i: i64) -> Self {
        Self::int(i)
    }
}

/// Ordered front matter mapping.
///
/// Insertion order is significant: it becomes the order of the compiled
/// argument list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    entries: Vec<(String, MetaValue)>,
}

impl Metadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a parsed YAML mapping. Scalar keys are stringified; sequence
    /// or mapping keys cannot name anything and are dropped with a warning.
    pub fn from_mapping(mapping: Mapping) -> Self {
        let mut metadata = Self::new();
        for (key, value) in mapping {
            let key = match key {
                Value::String(s) => s,
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                Value::Null => "null".to_string(),
                other => {
                    warn!("Ignoring front matter entry with non-scalar key: {:?}", other);
                    continue;
                }
            };
            metadata.insert(key, MetaValue::from_yaml(value));
        }
        metadata
    }

    /// Insert a value, keeping the original position if the key exists
    pub fn insert(&mut self, key: impl Into<String>, value: MetaValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<MetaValue>) -> Self {
        self.insert(key, value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&MetaValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetaValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Convert to a YAML mapping, preserving order
    pub fn to_mapping(&self) -> Mapping {
        self.entries
            .iter()
            .map(|(k, v)| (Value::String(k.clone()), v.to_yaml()))
            .collect()
    }

    /// Serialize as a YAML document body (no `---` markers)
    pub fn to_yaml_string(&self) -> crate::Result<String> {
        let yaml = serde_yaml::to_string(&Value::Mapping(self.to_mapping()))?;
        Ok(yaml.trim_start_matches("---").trim().to_string())
    }
}

impl IntoIterator for Metadata {
    type Item = (String, MetaValue);
    type IntoIter = std::vec::IntoIter<(String, MetaValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, MetaValue)> for Metadata {
    fn from_iter<T: IntoIterator<Item = (String, MetaValue)>>(iter: T) -> Self {
        let mut metadata = Self::new();
        for (k, v) in iter {
            metadata.insert(k, v);
        }
        metadata
    }
}
