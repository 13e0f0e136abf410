//! YAML and JSON documents into a property tree.

use super::{JSON, ParsedSource, Parser, YAML, utf8};
use crate::error::ParseError;
use crate::model::{PropertyTree, PropertyValue, Scalar};
use crate::options::ParseOptions;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Syntax {
    Yaml,
    Json,
}

/// Parser for hierarchical documents whose root is a mapping.
pub struct TreeParser {
    syntax: Syntax,
}

impl TreeParser {
    pub fn yaml() -> Self {
        Self {
            syntax: Syntax::Yaml,
        }
    }

    pub fn json() -> Self {
        Self {
            syntax: Syntax::Json,
        }
    }
}

impl Parser for TreeParser {
    fn media_type(&self) -> &'static str {
        match self.syntax {
            Syntax::Yaml => YAML,
            Syntax::Json => JSON,
        }
    }

    fn extensions(&self) -> &'static [&'static str] {
        match self.syntax {
            Syntax::Yaml => &[".yaml", ".yml"],
            Syntax::Json => &[".json"],
        }
    }

    fn parse(&self, input: &[u8], _options: &ParseOptions) -> Result<ParsedSource, ParseError> {
        let tree = match self.syntax {
            Syntax::Yaml => parse_yaml(utf8(input, "yaml")?)?,
            Syntax::Json => parse_json(utf8(input, "json")?)?,
        };
        tracing::debug!(keys = tree.len(), depth = tree.depth(), "parsed document");
        Ok(ParsedSource::Tree(tree))
    }
}

/// Parse a YAML document. An empty or null document is an empty tree.
pub fn parse_yaml(text: &str) -> Result<PropertyTree, ParseError> {
    if text.trim().is_empty() {
        return Ok(PropertyTree::new());
    }
    let value: serde_yaml::Value =
        serde_yaml::from_str(text).map_err(|e| ParseError::format("yaml", e))?;
    match from_yaml(value) {
        PropertyValue::Nested(tree) => Ok(tree),
        PropertyValue::Scalar(Scalar::Null) => Ok(PropertyTree::new()),
        _ => Err(ParseError::format("yaml", "document root is not a mapping")),
    }
}

fn from_yaml(value: serde_yaml::Value) -> PropertyValue {
    use serde_yaml::Value;
    match value {
        Value::Null => Scalar::Null.into(),
        Value::Bool(b) => Scalar::Boolean(b).into(),
        Value::Number(n) => number(n.as_i64(), n.as_u64(), n.as_f64()).into(),
        Value::String(s) => Scalar::String(s).into(),
        Value::Sequence(items) => PropertyValue::List(items.into_iter().map(from_yaml).collect()),
        Value::Mapping(map) => PropertyValue::Nested(
            map.into_iter()
                .map(|(key, value)| (yaml_key(key), from_yaml(value)))
                .collect(),
        ),
        Value::Tagged(tagged) => from_yaml(tagged.value),
    }
}

fn yaml_key(key: serde_yaml::Value) -> String {
    use serde_yaml::Value;
    match key {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Tagged(tagged) => yaml_key(tagged.value),
        other => serde_yaml::to_string(&other)
            .map(|s| s.trim().to_string())
            .unwrap_or_default(),
    }
}

fn number(i: Option<i64>, u: Option<u64>, f: Option<f64>) -> Scalar {
    match (i, u, f) {
        (Some(i), _, _) => Scalar::Integer(i),
        (None, Some(u), _) => Scalar::Float(u as f64),
        (None, None, Some(f)) => Scalar::Float(f),
        (None, None, None) => Scalar::Null,
    }
}

/// Parse a JSON document. An empty document or `null` is an empty tree.
pub fn parse_json(text: &str) -> Result<PropertyTree, ParseError> {
    if text.trim().is_empty() {
        return Ok(PropertyTree::new());
    }
    let value: serde_json::Value =
        serde_json::from_str(text).map_err(|e| ParseError::format("json", e))?;
    match from_json(value) {
        PropertyValue::Nested(tree) => Ok(tree),
        PropertyValue::Scalar(Scalar::Null) => Ok(PropertyTree::new()),
        _ => Err(ParseError::format("json", "document root is not an object")),
    }
}

fn from_json(value: serde_json::Value) -> PropertyValue {
    use serde_json::Value;
    match value {
        Value::Null => Scalar::Null.into(),
        Value::Bool(b) => Scalar::Boolean(b).into(),
        Value::Number(n) => number(n.as_i64(), n.as_u64(), n.as_f64()).into(),
        Value::String(s) => Scalar::String(s).into(),
        Value::Array(items) => PropertyValue::List(items.into_iter().map(from_json).collect()),
        Value::Object(map) => PropertyValue::Nested(
            map.into_iter()
                .map(|(key, value)| (key, from_json(value)))
                .collect(),
        ),
    }
}
