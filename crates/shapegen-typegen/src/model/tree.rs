//! Normalized configuration values.
//!
//! Every value-bearing source (flat key-path files, YAML, JSON) parses into a
//! [`PropertyTree`]: an ordered map whose values are scalars, lists or nested
//! trees. Key order is document order and survives all the way to emission.

use indexmap::IndexMap;
use indexmap::map::Entry;
use serde::Serialize;

/// A leaf value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Null,
}

impl Scalar {
    /// Convert raw text: integer, then float, then `true`/`false`
    /// (any case), else string.
    pub fn convert(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Scalar::Integer(i);
        }
        if looks_numeric(trimmed) {
            if let Ok(f) = trimmed.parse::<f64>() {
                return Scalar::Float(f);
            }
        }
        if trimmed.eq_ignore_ascii_case("true") {
            return Scalar::Boolean(true);
        }
        if trimmed.eq_ignore_ascii_case("false") {
            return Scalar::Boolean(false);
        }
        Scalar::String(raw.to_string())
    }
}

// `f64::from_str` also accepts "inf", "NaN" and "infinity", which in a
// property file are words, not numbers.
fn looks_numeric(s: &str) -> bool {
    let digits = s.trim_start_matches(['+', '-']);
    digits.starts_with(|c: char| c.is_ascii_digit() || c == '.')
        && digits.chars().any(|c| c.is_ascii_digit())
}

/// A configuration value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PropertyValue {
    Scalar(Scalar),
    List(Vec<PropertyValue>),
    Nested(PropertyTree),
}

impl PropertyValue {
    pub fn as_tree(&self) -> Option<&PropertyTree> {
        match self {
            PropertyValue::Nested(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, PropertyValue::Nested(_))
    }
}

impl From<Scalar> for PropertyValue {
    fn from(scalar: Scalar) -> Self {
        PropertyValue::Scalar(scalar)
    }
}

/// Outcome of [`PropertyTree::insert_path`].
#[derive(Debug, Clone, PartialEq)]
pub enum PathInsert {
    Inserted,
    /// The leaf already existed and was overwritten in place.
    Replaced(PropertyValue),
    /// A leaf sits where a container is needed (or the reverse); the scalar
    /// side of the conflict was discarded. `path` is the discarded key.
    Conflict { path: String, discarded: PropertyValue },
}

/// Ordered map of keys to values, one level of the configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PropertyTree {
    entries: IndexMap<String, PropertyValue>,
}

impl PropertyTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    /// Follow `path` through nested trees.
    pub fn get_path(&self, path: &[&str]) -> Option<&PropertyValue> {
        let (first, rest) = path.split_first()?;
        let value = self.entries.get(*first)?;
        if rest.is_empty() {
            return Some(value);
        }
        value.as_tree()?.get_path(rest)
    }

    /// Insert at this level. An existing key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) -> Option<PropertyValue> {
        self.entries.insert(key.into(), value)
    }

    pub fn iter(&self) -> indexmap::map::Iter<'_, String, PropertyValue> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Insert `value` under the nested path `segments`, reusing containers
    /// created by earlier paths.
    ///
    /// Containers win over leaves: a scalar found where a container is
    /// needed is replaced, and a scalar assigned to an existing container is
    /// dropped. Either way the discarded side is reported.
    pub fn insert_path(&mut self, segments: &[&str], value: PropertyValue) -> PathInsert {
        let Some((last, parents)) = segments.split_last() else {
            return PathInsert::Inserted;
        };

        let mut node = self;
        let mut conflict = None;
        for (depth, segment) in parents.iter().enumerate() {
            let slot = node
                .entries
                .entry(segment.to_string())
                .or_insert_with(|| PropertyValue::Nested(PropertyTree::new()));
            if !slot.is_nested() {
                let discarded = std::mem::replace(slot, PropertyValue::Nested(PropertyTree::new()));
                conflict = Some(PathInsert::Conflict {
                    path: segments[..=depth].join("."),
                    discarded,
                });
            }
            node = match slot {
                PropertyValue::Nested(tree) => tree,
                _ => unreachable!("slot was just made a container"),
            };
        }

        match node.entries.entry(last.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(value);
                conflict.unwrap_or(PathInsert::Inserted)
            }
            Entry::Occupied(occupied) if occupied.get().is_nested() && !value.is_nested() => {
                PathInsert::Conflict {
                    path: segments.join("."),
                    discarded: value,
                }
            }
            Entry::Occupied(mut occupied) => {
                let previous = occupied.insert(value);
                conflict.unwrap_or(PathInsert::Replaced(previous))
            }
        }
    }

    /// Leaf entries with their joined key paths, in document order.
    ///
    /// Lists are leaves. Empty nested trees produce no entries. Parsing the
    /// result with the same delimiter rebuilds this tree.
    pub fn flatten(&self, delimiter: &str) -> Vec<(String, &PropertyValue)> {
        let mut out = Vec::new();
        self.flatten_into("", delimiter, &mut out);
        out
    }

    fn flatten_into<'a>(
        &'a self,
        prefix: &str,
        delimiter: &str,
        out: &mut Vec<(String, &'a PropertyValue)>,
    ) {
        for (key, value) in &self.entries {
            let path = if prefix.is_empty() {
                key.clone()
            } else {
                format!("{prefix}{delimiter}{key}")
            };
            match value {
                PropertyValue::Nested(tree) => tree.flatten_into(&path, delimiter, out),
                _ => out.push((path, value)),
            }
        }
    }

    /// Nesting depth: 0 for an empty tree, 1 for a tree of leaves.
    /// Maps inside lists count too.
    pub fn depth(&self) -> usize {
        if self.entries.is_empty() {
            return 0;
        }
        1 + self.entries.values().map(value_depth).max().unwrap_or(0)
    }
}

fn value_depth(value: &PropertyValue) -> usize {
    match value {
        PropertyValue::Scalar(_) => 0,
        PropertyValue::Nested(tree) => tree.depth().max(1),
        PropertyValue::List(items) => items.iter().map(value_depth).max().unwrap_or(0),
    }
}

impl<'a> IntoIterator for &'a PropertyTree {
    type Item = (&'a String, &'a PropertyValue);
    type IntoIter = indexmap::map::Iter<'a, String, PropertyValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl FromIterator<(String, PropertyValue)> for PropertyTree {
    fn from_iter<T: IntoIterator<Item = (String, PropertyValue)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
