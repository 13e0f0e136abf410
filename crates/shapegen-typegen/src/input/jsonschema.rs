//! JSON Schema documents into a schema definition.
//!
//! Covers the object subset: `properties` in document order, primitive
//! types with `format`, validation keywords, inline objects (lifted into
//! nested schemas), `items`, `enum` and `$ref`.

use super::{JSON_SCHEMA, ParsedSource, Parser, decode_document};
use crate::error::ParseError;
use crate::model::{Constraints, PrimitiveType, PropertyDefinition, SchemaDefinition};
use crate::naming;
use crate::options::ParseOptions;
use serde_json::Value;

/// Parser for standalone JSON Schema documents (JSON or YAML syntax).
pub struct JsonSchemaParser;

impl Parser for JsonSchemaParser {
    fn media_type(&self) -> &'static str {
        JSON_SCHEMA
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".schema.json", ".schema.yaml", ".schema.yml"]
    }

    fn parse(&self, input: &[u8], options: &ParseOptions) -> Result<ParsedSource, ParseError> {
        let document = decode_document(input, "json-schema")?;
        parse_json_schema(&document, options.schema.as_deref()).map(ParsedSource::Schema)
    }
}

/// Parse a JSON Schema document.
///
/// The schema is named `name` if given, else by its `title`, else `Root`.
pub fn parse_json_schema(document: &Value, name: Option<&str>) -> Result<SchemaDefinition, ParseError> {
    if !document.is_object() {
        return Err(ParseError::NotASchemaDocument(
            "root is not a JSON object".to_string(),
        ));
    }
    let name = name
        .or_else(|| document.get("title").and_then(Value::as_str))
        .unwrap_or("Root");

    let schema = SchemaReader::new(document, name).read_object(name, document, "#")?;
    tracing::debug!(
        schema = %schema.name,
        properties = schema.properties.len(),
        nested = schema.nested_schemas.len(),
        "parsed JSON schema"
    );
    Ok(schema)
}

/// Reads object schemas, checking local references against `root`.
pub(crate) struct SchemaReader<'a> {
    root: &'a Value,
    root_name: &'a str,
}

impl<'a> SchemaReader<'a> {
    pub(crate) fn new(root: &'a Value, root_name: &'a str) -> Self {
        Self { root, root_name }
    }

    pub(crate) fn read_object(
        &self,
        name: &str,
        node: &Value,
        path: &str,
    ) -> Result<SchemaDefinition, ParseError> {
        let mut schema = SchemaDefinition::new(name);
        schema.title = string(node, "title");
        schema.description = string(node, "description");

        if let Some(properties) = node.get("properties").and_then(Value::as_object) {
            for (key, property) in properties {
                let path = format!("{path}/properties/{key}");
                let definition = self.read_property(&mut schema, key, property, &path)?;
                schema.properties.insert(key.clone(), definition);
            }
        }

        let required = node
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect::<Vec<_>>())
            .unwrap_or_default();
        for unknown in schema.apply_required(required) {
            tracing::warn!(schema = %schema.name, property = %unknown, "required property is not declared; ignoring");
        }

        Ok(schema)
    }

    fn read_property(
        &self,
        owner: &mut SchemaDefinition,
        name: &str,
        node: &Value,
        path: &str,
    ) -> Result<PropertyDefinition, ParseError> {
        if let Some(reference) = node.get("$ref").and_then(Value::as_str) {
            let mut definition = PropertyDefinition::new(name, PrimitiveType::Object);
            definition.ref_type = Some(self.resolve_ref(reference, path)?);
            definition.description = string(node, "description");
            return Ok(definition);
        }

        let ty = primitive_type(node);
        let mut definition = PropertyDefinition::new(name, ty);
        definition.format = string(node, "format");
        definition.description = string(node, "description");
        definition.default = node.get("default").cloned();
        definition.constraints = constraints(node);

        match ty {
            PrimitiveType::Array => {
                let item_name = format!("{name}_item");
                let items = match node.get("items") {
                    Some(items) if items.is_object() => {
                        self.read_property(owner, &item_name, items, &format!("{path}/items"))?
                    }
                    _ => PropertyDefinition::new(item_name, PrimitiveType::Any),
                };
                definition.items = Some(Box::new(items));
            }
            PrimitiveType::Object => {
                let has_properties = node
                    .get("properties")
                    .and_then(Value::as_object)
                    .is_some_and(|p| !p.is_empty());
                if has_properties {
                    let base = naming::type_name(name);
                    let nested = self.read_object(&base, node, path)?;
                    definition.nested = Some(owner.add_nested(&base, nested));
                }
            }
            _ => {}
        }

        Ok(definition)
    }

    /// Name the target of `reference`, failing if a local target is absent.
    fn resolve_ref(&self, reference: &str, path: &str) -> Result<String, ParseError> {
        if let Some(pointer) = reference.strip_prefix('#') {
            if self.root.pointer(pointer).is_none() {
                return Err(ParseError::UnresolvedReference {
                    reference: reference.to_string(),
                    path: path.to_string(),
                });
            }
            if pointer.is_empty() {
                return Ok(self.root_name.to_string());
            }
        }
        Ok(ref_name(reference))
    }
}

/// Type name of a reference: its last path segment without file extension.
pub fn ref_name(reference: &str) -> String {
    let tail = reference
        .rsplit(['/', '#'])
        .find(|segment| !segment.is_empty())
        .unwrap_or(reference);
    let stem = [".schema.json", ".schema.yaml", ".json", ".yaml", ".yml"]
        .iter()
        .find_map(|ext| tail.strip_suffix(ext))
        .unwrap_or(tail);
    stem.to_string()
}

fn string(node: &Value, key: &str) -> Option<String> {
    node.get(key).and_then(Value::as_str).map(String::from)
}

fn primitive_type(node: &Value) -> PrimitiveType {
    match node.get("type") {
        Some(Value::String(keyword)) => PrimitiveType::from_keyword(keyword).unwrap_or(PrimitiveType::Any),
        Some(Value::Array(keywords)) => {
            let non_null: Vec<&str> = keywords
                .iter()
                .filter_map(Value::as_str)
                .filter(|k| *k != "null")
                .collect();
            match non_null.as_slice() {
                [single] => PrimitiveType::from_keyword(single).unwrap_or(PrimitiveType::Any),
                _ => PrimitiveType::Any,
            }
        }
        _ if node.get("properties").is_some() => PrimitiveType::Object,
        _ if node.get("items").is_some() => PrimitiveType::Array,
        _ => PrimitiveType::Any,
    }
}

fn constraints(node: &Value) -> Constraints {
    let u64_of = |key: &str| node.get(key).and_then(Value::as_u64);
    let f64_of = |key: &str| node.get(key).and_then(Value::as_f64);

    let mut constraints = Constraints {
        pattern: string(node, "pattern"),
        min_length: u64_of("minLength"),
        max_length: u64_of("maxLength"),
        minimum: f64_of("minimum"),
        maximum: f64_of("maximum"),
        enum_values: node
            .get("enum")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default(),
        min_items: u64_of("minItems"),
        max_items: u64_of("maxItems"),
        ..Default::default()
    };

    // Draft 4 flags the bound; later drafts carry the bound itself.
    match node.get("exclusiveMinimum") {
        Some(Value::Bool(flag)) => constraints.exclusive_minimum = *flag,
        Some(bound) if bound.is_number() => {
            constraints.minimum = bound.as_f64();
            constraints.exclusive_minimum = true;
        }
        _ => {}
    }
    match node.get("exclusiveMaximum") {
        Some(Value::Bool(flag)) => constraints.exclusive_maximum = *flag,
        Some(bound) if bound.is_number() => {
            constraints.maximum = bound.as_f64();
            constraints.exclusive_maximum = true;
        }
        _ => {}
    }

    constraints
}
