use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};
use uuid::Uuid;

use crate::models::catalog::TaskId;
use crate::parsing::span::Span;

/// Largest integer an `f64` holds exactly; numbers inside this range with no
/// fractional part serialize as integers.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// A typed property value.
///
/// Unquoted values are numbers or `null`; anything quoted is a string.
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    Null,
    Number(f64),
    String(String),
}

impl PropertyValue {
    /// Returns the number as an `i64` when it has no fractional part.
    fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Number(n) if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER => {
                Some(*n as i64)
            }
            _ => None,
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            PropertyValue::Null => serializer.serialize_none(),
            PropertyValue::Number(n) => match self.as_integer() {
                Some(i) => serializer.serialize_i64(i),
                None => serializer.serialize_f64(*n),
            },
            PropertyValue::String(s) => serializer.serialize_str(s),
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::Null => f.write_str("null"),
            PropertyValue::Number(n) => match self.as_integer() {
                Some(i) => write!(f, "{i}"),
                None => write!(f, "{n}"),
            },
            PropertyValue::String(s) => write!(f, "{s:?}"),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<f64> for PropertyValue {
    fn from(n: f64) -> Self {
        PropertyValue::Number(n)
    }
}

/// Directive properties in the order they were written.
///
/// Assigning an existing name replaces its value but keeps its position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(Vec<(String, PropertyValue)>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: PropertyValue) {
        let name = name.into();
        match self.0.iter_mut().find(|(k, _)| *k == name) {
            Some((_, slot)) => *slot = value,
            None => self.0.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.0.iter().find(|(k, _)| k == name).map(|(_, v)| v)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Keeps only the properties whose name satisfies `keep`.
    pub fn retain(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.0.retain(|(k, _)| keep(k));
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyValue)> for Properties {
    fn from_iter<I: IntoIterator<Item = (K, PropertyValue)>>(iter: I) -> Self {
        let mut props = Properties::new();
        for (k, v) in iter {
            props.insert(k, v);
        }
        props
    }
}

impl Serialize for Properties {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// A `/command [action] [name=value ...]` invocation found in text.
///
/// `start` is the offset just after the leading `/`, `end` is exclusive, so
/// `&text[start..end]` is the directive body as written.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct Directive {
    pub id: Uuid,
    pub command: String,
    pub action: Option<String>,
    pub properties: Properties,
    pub task: Option<TaskId>,
    pub start: usize,
    pub end: usize,
}

impl Directive {
    /// Creates a directive with a fresh id and no resolved task.
    pub fn new(command: impl Into<String>, start: usize, end: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            command: command.into(),
            action: None,
            properties: Properties::new(),
            task: None,
            start,
            end,
        }
    }

    #[must_use]
    pub fn with_action(mut self, action: impl Into<String>) -> Self {
        self.action = Some(action.into());
        self
    }

    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, value: PropertyValue) -> Self {
        self.properties.insert(name, value);
        self
    }

    /// The directive body, excluding the leading slash.
    pub fn span(&self) -> Span {
        Span::new(self.start, self.end)
    }

    /// The span to cut out of the text: the body plus its leading slash.
    pub fn removal_span(&self) -> Span {
        Span::new(self.start.saturating_sub(1), self.end)
    }

    /// The directive body as it appears in `text`.
    pub fn source<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.span().slice(text)
    }
}
