//! Declared shapes from JSON Schema and OpenAPI documents.

use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;

/// The `type` keyword of a schema property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    String,
    Integer,
    Number,
    Boolean,
    Array,
    Object,
    /// No (usable) `type` keyword.
    Any,
}

impl PrimitiveType {
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Some(match keyword {
            "string" => Self::String,
            "integer" => Self::Integer,
            "number" => Self::Number,
            "boolean" => Self::Boolean,
            "array" => Self::Array,
            "object" => Self::Object,
            _ => return None,
        })
    }
}

/// Validation keywords, recorded as metadata.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Constraints {
    pub pattern: Option<String>,
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub exclusive_minimum: bool,
    pub exclusive_maximum: bool,
    pub enum_values: Vec<Value>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

impl Constraints {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn has_length(&self) -> bool {
        self.min_length.is_some() || self.max_length.is_some()
    }

    pub fn has_range(&self) -> bool {
        self.minimum.is_some() || self.maximum.is_some()
    }

    pub fn has_items(&self) -> bool {
        self.min_items.is_some() || self.max_items.is_some()
    }

    /// Enum values when every one of them is a string.
    pub fn string_enum(&self) -> Option<Vec<&str>> {
        if self.enum_values.is_empty() {
            return None;
        }
        self.enum_values.iter().map(Value::as_str).collect()
    }
}

/// One property of a schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyDefinition {
    pub name: String,
    pub ty: PrimitiveType,
    pub format: Option<String>,
    pub description: Option<String>,
    pub default: Option<Value>,
    pub required: bool,
    pub constraints: Constraints,
    /// Item definition, present iff `ty` is [`PrimitiveType::Array`].
    pub items: Option<Box<PropertyDefinition>>,
    /// Key into the owning schema's `nested_schemas` for inline objects.
    pub nested: Option<String>,
    /// Target type name of a `$ref`.
    pub ref_type: Option<String>,
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, ty: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            ty,
            format: None,
            description: None,
            default: None,
            required: false,
            constraints: Constraints::default(),
            items: None,
            nested: None,
            ref_type: None,
        }
    }
}

/// A named object shape.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SchemaDefinition {
    pub name: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub properties: IndexMap<String, PropertyDefinition>,
    pub required: IndexSet<String>,
    pub nested_schemas: IndexMap<String, SchemaDefinition>,
}

impl SchemaDefinition {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn is_required(&self, property: &str) -> bool {
        self.required.contains(property)
    }

    pub fn nested(&self, key: &str) -> Option<&SchemaDefinition> {
        self.nested_schemas.get(key)
    }

    /// Register a nested schema under `base`, suffixing `2`, `3`, ... when
    /// the key is taken. Returns the key used.
    pub fn add_nested(&mut self, base: &str, mut schema: SchemaDefinition) -> String {
        let mut key = base.to_string();
        let mut n = 2;
        while self.nested_schemas.contains_key(&key) {
            key = format!("{base}{n}");
            n += 1;
        }
        schema.name = key.clone();
        self.nested_schemas.insert(key.clone(), schema);
        key
    }

    /// Mark `names` required. Names without a property are returned.
    pub fn apply_required<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        let mut unknown = Vec::new();
        for name in names {
            match self.properties.get_mut(name) {
                Some(property) => {
                    property.required = true;
                    self.required.insert(name.to_string());
                }
                None => unknown.push(name.to_string()),
            }
        }
        unknown
    }
}
