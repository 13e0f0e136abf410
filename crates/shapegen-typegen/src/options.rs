//! Parse and generation options.

use serde::{Deserialize, Serialize};

/// Options for value-bearing parsers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Convert flat-file values to integers, floats and booleans.
    pub auto_convert: bool,
    /// Split flat-file values on this character into lists.
    pub list_delimiter: Option<char>,
    /// Schema to select from a multi-schema document.
    pub schema: Option<String>,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            auto_convert: true,
            list_delimiter: None,
            schema: None,
        }
    }
}

/// How property-tree fields are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmissionMode {
    /// Read-only fields initialized with the source values.
    #[default]
    Embed,
    /// Empty, optional fields with builders and structural methods.
    Shape,
}

impl std::str::FromStr for EmissionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "embed" => Ok(Self::Embed),
            "shape" => Ok(Self::Shape),
            other => Err(format!("unknown emission mode `{other}` (expected embed or shape)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Applies to property trees. Schemas always emit shapes.
    pub mode: EmissionMode,
    /// Equality, hash and string rendering for shapes.
    pub structural_methods: bool,
    /// Validation annotations/attributes from schema constraints.
    pub validation: bool,
    /// Serialization annotations/derives.
    pub serialization: bool,
    /// Promote string enums to generated enumeration types.
    pub enum_types: bool,
    /// Java package, or Rust module doc line.
    pub package: Option<String>,
    /// Locale recorded in generated message contracts.
    pub default_locale: String,
    /// Bundle base name for message contracts; defaults to the input stem.
    pub bundle_name: Option<String>,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            mode: EmissionMode::Embed,
            structural_methods: true,
            validation: true,
            serialization: true,
            enum_types: false,
            package: None,
            default_locale: "en".to_string(),
            bundle_name: None,
        }
    }
}
