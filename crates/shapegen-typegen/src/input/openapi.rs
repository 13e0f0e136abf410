//! OpenAPI 3.x component schemas.
//!
//! Selects one schema under `components/schemas` and reads it with the JSON
//! Schema reader. References are checked against the whole document.

use super::jsonschema::SchemaReader;
use super::{OPENAPI, ParsedSource, Parser, decode_document};
use crate::error::ParseError;
use crate::model::SchemaDefinition;
use crate::options::ParseOptions;
use serde_json::Value;

/// Parser for OpenAPI documents in YAML or JSON syntax.
pub struct OpenApiParser;

impl Parser for OpenApiParser {
    fn media_type(&self) -> &'static str {
        OPENAPI
    }

    fn extensions(&self) -> &'static [&'static str] {
        &[".openapi.yaml", ".openapi.yml", ".openapi.json"]
    }

    fn parse(&self, input: &[u8], options: &ParseOptions) -> Result<ParsedSource, ParseError> {
        let document = decode_document(input, "openapi")?;
        parse_openapi(&document, options.schema.as_deref()).map(ParsedSource::Schema)
    }
}

/// Parse the component schema `name`, or the first declared one.
pub fn parse_openapi(document: &Value, name: Option<&str>) -> Result<SchemaDefinition, ParseError> {
    let version = match document.get("openapi") {
        Some(Value::String(v)) => v.clone(),
        // `openapi: 3.0` in YAML is a number.
        Some(Value::Number(n)) => n.to_string(),
        _ => {
            return Err(ParseError::NotASchemaDocument(
                "missing `openapi` version field".to_string(),
            ));
        }
    };
    if !version.starts_with("3.") {
        return Err(ParseError::NotASchemaDocument(format!(
            "OpenAPI version {version} not supported (expected 3.x)"
        )));
    }

    let schemas = document
        .pointer("/components/schemas")
        .and_then(Value::as_object);
    let selected = match name {
        Some(name) => schemas.and_then(|s| s.get_key_value(name)),
        None => schemas.and_then(|s| s.iter().next()),
    };
    let Some((key, node)) = selected else {
        return Err(ParseError::SchemaNotFound(
            name.unwrap_or("(first component schema)").to_string(),
        ));
    };

    let schema = SchemaReader::new(document, key).read_object(
        key,
        node,
        &format!("#/components/schemas/{key}"),
    )?;
    tracing::debug!(
        schema = %schema.name,
        version = %version,
        properties = schema.properties.len(),
        "parsed OpenAPI component"
    );
    Ok(schema)
}
