//! Path flattening of package config documents
//!
//! A config document is turned into an ordered list of leaves, each leaf
//! carrying the object keys and array indices that lead to it. The list
//! order is the depth-first pre-order of the document, which the variable
//! resolver relies on for declaration scoping.

use std::fmt;

use serde_json::{Map, Number, Value};

/// One step on the way from the document root to a leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Index(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) => f.write_str(key),
            Segment::Index(index) => write!(f, "[{index}]"),
        }
    }
}

/// A JSON leaf value.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    String(String),
    Number(Number),
    Bool(bool),
    Null,
}

impl Scalar {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text inserted when this value is substituted into a string.
    pub fn render(&self) -> String {
        match self {
            Scalar::String(s) => s.clone(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Bool(b) => b.to_string(),
            Scalar::Null => "null".to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        match self {
            Scalar::String(s) => Value::String(s.clone()),
            Scalar::Number(n) => Value::Number(n.clone()),
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Null => Value::Null,
        }
    }
}

impl From<bool> for Scalar {
    fn from(value: bool) -> Self {
        Scalar::Bool(value)
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::String(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::String(value)
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::String(s) => write!(f, "{s:?}"),
            other => f.write_str(&other.render()),
        }
    }
}

/// A leaf of a config document and the path leading to it.
#[derive(Debug, Clone, PartialEq)]
pub struct FlattenedEntry {
    pub path: Vec<Segment>,
    pub value: Scalar,
}

impl FlattenedEntry {
    pub fn new(path: Vec<Segment>, value: impl Into<Scalar>) -> Self {
        Self {
            path,
            value: value.into(),
        }
    }

    /// The key naming this leaf: its last segment, when that is an object key.
    ///
    /// Array elements and bare top-level scalars have no key.
    pub fn key(&self) -> Option<&str> {
        self.path.last().and_then(Segment::as_key)
    }

    /// Whether any segment of the path is the object key `name`.
    pub fn has_key_segment(&self, name: &str) -> bool {
        self.path.iter().any(|segment| segment.as_key() == Some(name))
    }

    /// Whether this entry is the top-level `name` key.
    pub fn is_top_level(&self, name: &str) -> bool {
        matches!(self.path.as_slice(), [Segment::Key(key)] if key == name)
    }
}

impl fmt::Display for FlattenedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path = self
            .path
            .iter()
            .map(Segment::to_string)
            .collect::<Vec<_>>()
            .join(".");
        write!(f, "{path} = {}", self.value)
    }
}

/// Ordered leaves of one config document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlattenedConfig {
    entries: Vec<FlattenedEntry>,
}

impl FlattenedConfig {
    pub fn new(entries: Vec<FlattenedEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[FlattenedEntry] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<FlattenedEntry> {
        self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FlattenedEntry> {
        self.entries.iter()
    }

    /// The value of the top-level `key` entry.
    pub fn top_level(&self, key: &str) -> Option<&Scalar> {
        self.entries
            .iter()
            .find(|entry| entry.is_top_level(key))
            .map(|entry| &entry.value)
    }

    /// Set the top-level `key` entry, inserting it at the front when absent.
    pub fn set_top_level(&mut self, key: &str, value: impl Into<Scalar>) {
        let value = value.into();
        match self.entries.iter_mut().find(|entry| entry.is_top_level(key)) {
            Some(entry) => entry.value = value,
            None => self
                .entries
                .insert(0, FlattenedEntry::new(vec![Segment::Key(key.to_string())], value)),
        }
    }

    /// Rebuild the nested document from the leaves.
    ///
    /// Empty objects and arrays have no leaves and so do not reappear.
    pub fn to_value(&self) -> Value {
        let mut root = Value::Null;
        for entry in &self.entries {
            insert(&mut root, &entry.path, entry.value.to_value());
        }
        root
    }
}

impl<'a> IntoIterator for &'a FlattenedConfig {
    type Item = &'a FlattenedEntry;
    type IntoIter = std::slice::Iter<'a, FlattenedEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Flatten a document into its leaves in depth-first pre-order.
pub fn flatten(value: &Value) -> FlattenedConfig {
    let mut entries = Vec::new();
    let mut prefix = Vec::new();
    walk(value, &mut prefix, &mut entries);
    FlattenedConfig::new(entries)
}

fn walk(value: &Value, prefix: &mut Vec<Segment>, out: &mut Vec<FlattenedEntry>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                prefix.push(Segment::Key(key.clone()));
                walk(child, prefix, out);
                prefix.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                prefix.push(Segment::Index(index));
                walk(child, prefix, out);
                prefix.pop();
            }
        }
        Value::String(s) => out.push(FlattenedEntry::new(prefix.clone(), s.as_str())),
        Value::Number(n) => out.push(FlattenedEntry::new(prefix.clone(), Scalar::Number(n.clone()))),
        Value::Bool(b) => out.push(FlattenedEntry::new(prefix.clone(), *b)),
        Value::Null => out.push(FlattenedEntry::new(prefix.clone(), Scalar::Null)),
    }
}

fn insert(target: &mut Value, path: &[Segment], leaf: Value) {
    let Some((head, rest)) = path.split_first() else {
        *target = leaf;
        return;
    };

    match head {
        Segment::Key(key) => {
            if !target.is_object() {
                *target = Value::Object(Map::new());
            }
            if let Value::Object(map) = target {
                let slot = map.entry(key.clone()).or_insert(Value::Null);
                insert(slot, rest, leaf);
            }
        }
        Segment::Index(index) => {
            if !target.is_array() {
                *target = Value::Array(Vec::new());
            }
            if let Value::Array(items) = target {
                if items.len() <= *index {
                    items.resize(index + 1, Value::Null);
                }
                insert(&mut items[*index], rest, leaf);
            }
        }
    }
}
