//! The per-unit generation pipeline.
//!
//! A [`Unit`] names one input and the type to generate from it. The pipeline
//! loads, parses, lowers and emits entirely in memory; nothing is written
//! until [`generate_unit`] has returned the complete source.

use crate::loader::ResourceLoader;
use shapegen_typegen::input::{self, ParserRegistry};
use shapegen_typegen::{BackendRegistry, GenerationOptions, ParseError, ParseOptions, lower_source};
use std::path::Path;

/// One generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct Unit {
    /// Location handed to the resource loader.
    pub input: String,
    /// Name of the generated top-level type or contract.
    pub type_name: String,
    /// Explicit media type; detected from the location when `None`.
    pub media_type: Option<String>,
    pub backend: String,
    pub parse: ParseOptions,
    pub generation: GenerationOptions,
}

impl Unit {
    pub fn new(input: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            input: input.into(),
            type_name: type_name.into(),
            media_type: None,
            backend: DEFAULT_BACKEND.to_string(),
            parse: ParseOptions::default(),
            generation: GenerationOptions::default(),
        }
    }
}

pub const DEFAULT_BACKEND: &str = "rust";

/// The result of a successful unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    pub type_name: String,
    pub backend: &'static str,
    /// Conventional file name for the source, e.g. `AppConfig.java`.
    pub file_name: String,
    pub source: String,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error("{location}: resource not found")]
    ResourceNotFound { location: String },

    #[error("{location}: format error: {source}")]
    Format {
        location: String,
        #[source]
        source: ParseError,
    },

    #[error("{location}: schema reference error: {source}")]
    SchemaReference {
        location: String,
        #[source]
        source: ParseError,
    },

    #[error("{location}: unsupported media type {media_type}")]
    UnsupportedMediaType { location: String, media_type: String },

    #[error("unknown backend `{name}` (available: {available})")]
    UnknownBackend { name: String, available: String },

    #[error("{location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
}

impl GenerateError {
    fn parse(location: &str, source: ParseError) -> Self {
        let location = location.to_string();
        match source {
            ParseError::SchemaNotFound(_) | ParseError::UnresolvedReference { .. } => {
                Self::SchemaReference { location, source }
            }
            source => Self::Format { location, source },
        }
    }
}

/// Media type for a `--format` name. `auto` and unknown names give `None`.
pub fn media_type_for_format(format: &str) -> Option<&'static str> {
    Some(match format {
        "properties" => input::PROPERTIES,
        "yaml" => input::YAML,
        "json" => input::JSON,
        "json-schema" => input::JSON_SCHEMA,
        "openapi" => input::OPENAPI,
        "messages" => input::MESSAGES,
        _ => return None,
    })
}

/// Bundle base name for a message source: the file name without extension.
fn bundle_name(location: &str) -> String {
    let file = Path::new(location)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(location);
    file.split('.').next().unwrap_or(file).to_string()
}

/// Generate one unit.
#[tracing::instrument(skip_all, fields(input = %unit.input, type_name = %unit.type_name, backend = %unit.backend))]
pub fn generate_unit(
    unit: &Unit,
    loader: &dyn ResourceLoader,
    parsers: &ParserRegistry,
    backends: &BackendRegistry,
) -> Result<Generated, GenerateError> {
    let location = unit.input.as_str();
    let backend = backends
        .get(&unit.backend)
        .ok_or_else(|| GenerateError::UnknownBackend {
            name: unit.backend.clone(),
            available: backends.names().join(", "),
        })?;

    let content = loader
        .load(location)
        .map_err(|source| GenerateError::Io {
            location: location.to_string(),
            source,
        })?
        .ok_or_else(|| GenerateError::ResourceNotFound {
            location: location.to_string(),
        })?;

    let parser = match &unit.media_type {
        Some(media_type) => parsers.for_media_type(media_type).ok_or_else(|| {
            GenerateError::UnsupportedMediaType {
                location: location.to_string(),
                media_type: media_type.clone(),
            }
        })?,
        None => parsers.for_location(location, &content).ok_or_else(|| {
            GenerateError::UnsupportedMediaType {
                location: location.to_string(),
                media_type: "(unknown extension)".to_string(),
            }
        })?,
    };
    tracing::debug!(media_type = parser.media_type(), "parsing");

    let source = parser
        .parse(&content, &unit.parse)
        .map_err(|e| GenerateError::parse(location, e))?;
    let declarations = lower_source(
        &unit.type_name,
        &bundle_name(location),
        &source,
        &unit.generation,
    )
    .map_err(|e| GenerateError::parse(location, e))?;

    let code = backend.generate(&declarations, &unit.generation);
    let file_name = output_file_name(&unit.type_name, backend.extension());
    tracing::debug!(file = %file_name, bytes = code.len(), "generated");

    Ok(Generated {
        type_name: unit.type_name.clone(),
        backend: backend.name(),
        file_name,
        source: code,
    })
}

/// `AppConfig.java`, `app_config.rs`.
pub fn output_file_name(type_name: &str, extension: &str) -> String {
    if extension == "rs" {
        format!("{}.rs", shapegen_typegen::naming::snake_case(type_name))
    } else {
        format!("{type_name}.{extension}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::MemoryLoader;

    fn run(unit: &Unit, loader: &MemoryLoader) -> Result<Generated, GenerateError> {
        generate_unit(unit, loader, &ParserRegistry::builtin(), &BackendRegistry::builtin())
    }

    #[test]
    fn detects_format_from_location() {
        let loader = MemoryLoader::new().with("app.properties", "app.name=Demo\n");
        let mut unit = Unit::new("app.properties", "AppConfig");
        unit.backend = "java".into();
        let generated = run(&unit, &loader).unwrap();
        assert_eq!(generated.file_name, "AppConfig.java");
        assert_eq!(generated.backend, "java");
        assert!(generated.source.contains("private final String name = \"Demo\";"));
    }

    #[test]
    fn rust_file_names_are_snake_case() {
        assert_eq!(output_file_name("AppConfig", "rs"), "app_config.rs");
        assert_eq!(output_file_name("AppConfig", "java"), "AppConfig.java");
    }

    #[test]
    fn missing_resource() {
        let err = run(&Unit::new("nope.yaml", "Cfg"), &MemoryLoader::new()).unwrap_err();
        assert!(matches!(err, GenerateError::ResourceNotFound { ref location } if location == "nope.yaml"));
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let loader = MemoryLoader::new().with("app.ini", "a=1");
        let err = run(&Unit::new("app.ini", "Cfg"), &loader).unwrap_err();
        assert!(matches!(err, GenerateError::UnsupportedMediaType { .. }));
    }

    #[test]
    fn unknown_backend_fails_before_loading() {
        let mut unit = Unit::new("missing.yaml", "Cfg");
        unit.backend = "cobol".into();
        let err = run(&unit, &MemoryLoader::new()).unwrap_err();
        assert!(matches!(err, GenerateError::UnknownBackend { ref name, .. } if name == "cobol"));
        assert!(err.to_string().contains("java, rust"));
    }

    #[test]
    fn malformed_input_is_a_format_error() {
        let loader = MemoryLoader::new().with("bad.yaml", "a: [1, 2");
        let err = run(&Unit::new("bad.yaml", "Cfg"), &loader).unwrap_err();
        assert!(matches!(err, GenerateError::Format { .. }));
        assert!(err.to_string().starts_with("bad.yaml: format error:"));
    }

    #[test]
    fn message_bundles_need_an_explicit_format() {
        let loader = MemoryLoader::new().with("i18n/messages.properties", "title=Shop\n");
        let mut unit = Unit::new("i18n/messages.properties", "Messages");
        unit.media_type = media_type_for_format("messages").map(String::from);
        let generated = run(&unit, &loader).unwrap();
        assert!(generated.source.contains("const BASE_NAME: &'static str = \"messages\";"));
    }

    #[test]
    fn bundle_names() {
        assert_eq!(bundle_name("i18n/messages.properties"), "messages");
        assert_eq!(bundle_name("labels"), "labels");
    }
}
