//! Input format parsers.
//!
//! Each parser turns raw bytes into one of the source models: a
//! [`PropertyTree`] for value-bearing formats, a [`SchemaDefinition`] for
//! schema formats, or ordered message entries for bundles. Parsers are
//! looked up in a [`ParserRegistry`] by media type or by file location.

pub mod jsonschema;
pub mod messages;
pub mod openapi;
pub mod properties;
pub mod tree;

use crate::error::ParseError;
use crate::model::{PropertyTree, SchemaDefinition};
use crate::options::ParseOptions;

pub use jsonschema::{JsonSchemaParser, parse_json_schema};
pub use messages::{MessageBundleParser, MessageEntry};
pub use openapi::{OpenApiParser, parse_openapi};
pub use properties::{PropertiesParser, parse_properties};
pub use tree::TreeParser;

pub const PROPERTIES: &str = "text/x-java-properties";
pub const YAML: &str = "application/yaml";
pub const JSON: &str = "application/json";
pub const JSON_SCHEMA: &str = "application/schema+json";
pub const OPENAPI: &str = "application/vnd.oai.openapi";
pub const MESSAGES: &str = "text/x-message-bundle";

/// A parsed source document.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedSource {
    Tree(PropertyTree),
    Schema(SchemaDefinition),
    Messages(Vec<MessageEntry>),
}

/// A source format.
pub trait Parser: Send + Sync {
    fn media_type(&self) -> &'static str;

    /// File name suffixes, including the dot.
    fn extensions(&self) -> &'static [&'static str];

    fn accepts(&self, media_type: &str) -> bool {
        media_type == self.media_type()
    }

    fn parse(&self, input: &[u8], options: &ParseOptions) -> Result<ParsedSource, ParseError>;
}

pub(crate) fn utf8<'a>(input: &'a [u8], format: &'static str) -> Result<&'a str, ParseError> {
    std::str::from_utf8(input).map_err(|e| ParseError::format(format, e))
}

/// Decode a JSON or YAML document into a JSON value. Text opening with a
/// bracket is tried as JSON first and then as a YAML flow collection.
pub(crate) fn decode_document(
    input: &[u8],
    format: &'static str,
) -> Result<serde_json::Value, ParseError> {
    let text = utf8(input, format)?;
    let trimmed = text.trim_start();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyDocument);
    }
    if trimmed.starts_with(['{', '[']) {
        match serde_json::from_str(text) {
            Ok(value) => Ok(value),
            Err(json_error) => {
                serde_yaml::from_str(text).map_err(|_| ParseError::format(format, json_error))
            }
        }
    } else {
        serde_yaml::from_str(text).map_err(|e| ParseError::format(format, e))
    }
}

/// Parsers in lookup order.
///
/// Later registrations take precedence over earlier ones for the same media
/// type, so a custom parser can replace a built-in one.
pub struct ParserRegistry {
    parsers: Vec<Box<dyn Parser>>,
}

impl ParserRegistry {
    pub fn new() -> Self {
        Self {
            parsers: Vec::new(),
        }
    }

    /// Registry with every built-in format.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(PropertiesParser);
        registry.register(TreeParser::yaml());
        registry.register(TreeParser::json());
        registry.register(JsonSchemaParser);
        registry.register(OpenApiParser);
        registry.register(MessageBundleParser);
        registry
    }

    pub fn register(&mut self, parser: impl Parser + 'static) {
        self.parsers.push(Box::new(parser));
    }

    pub fn for_media_type(&self, media_type: &str) -> Option<&dyn Parser> {
        self.parsers
            .iter()
            .rev()
            .find(|p| p.accepts(media_type))
            .map(|p| p.as_ref())
    }

    pub fn media_types(&self) -> Vec<&'static str> {
        let mut types: Vec<_> = self.parsers.iter().map(|p| p.media_type()).collect();
        types.dedup();
        types
    }

    /// Media type for a location, by longest matching suffix. Generic JSON
    /// and YAML documents are sniffed for OpenAPI and JSON Schema markers.
    pub fn detect(&self, location: &str, content: &[u8]) -> Option<&'static str> {
        let lower = location.to_ascii_lowercase();
        let media_type = self
            .parsers
            .iter()
            .flat_map(|p| p.extensions().iter().map(move |ext| (*ext, p.media_type())))
            .filter(|(ext, _)| lower.ends_with(ext))
            .max_by_key(|(ext, _)| ext.len())
            .map(|(_, media_type)| media_type)?;

        if media_type == JSON || media_type == YAML {
            if let Some(sniffed) = sniff(content) {
                tracing::debug!(location, media_type = sniffed, "detected schema document");
                return Some(sniffed);
            }
        }
        Some(media_type)
    }

    pub fn for_location(&self, location: &str, content: &[u8]) -> Option<&dyn Parser> {
        self.detect(location, content)
            .and_then(|media_type| self.for_media_type(media_type))
    }
}

impl Default for ParserRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn sniff(content: &[u8]) -> Option<&'static str> {
    let document = decode_document(content, "json").ok()?;
    let root = document.as_object()?;
    if root.contains_key("openapi") {
        return Some(OPENAPI);
    }
    let object_schema = root.get("type").and_then(|t| t.as_str()) == Some("object")
        && root.get("properties").is_some_and(|p| p.is_object());
    if root.contains_key("$schema") || object_schema {
        return Some(JSON_SCHEMA);
    }
    None
}
