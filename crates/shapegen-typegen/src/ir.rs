//! Language-neutral declarations handed to backends.
//!
//! Lowering (see [`crate::lower`]) produces one [`TypeDecl`] tree per
//! source. Backends walk it without looking back at the source models.

use crate::model::{Constraints, PropertyValue};
use crate::naming::AccessorKind;
use crate::options::EmissionMode;
use crate::resolve::TargetType;
use shapegen_messages::Argument;

/// A generated type with its fields and the types nested inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct TypeDecl {
    /// Final type name, unique among siblings and enclosing types.
    pub name: String,
    /// Key or schema name the type came from.
    pub source_name: String,
    pub docs: Option<String>,
    pub mode: EmissionMode,
    pub fields: Vec<FieldDecl>,
    /// Nested types in order of first use.
    pub nested: Vec<TypeDecl>,
    pub enums: Vec<EnumDecl>,
}

impl TypeDecl {
    pub fn nested_decl(&self, name: &str) -> Option<&TypeDecl> {
        self.nested.iter().find(|n| n.name == name)
    }

    /// Number of type levels including this one.
    pub fn depth(&self) -> usize {
        1 + self.nested.iter().map(TypeDecl::depth).max().unwrap_or(0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    /// Source key, also the serialized name.
    pub key: String,
    pub ty: TargetType,
    pub accessor: AccessorKind,
    pub required: bool,
    pub docs: Option<String>,
    pub format: Option<String>,
    pub constraints: Constraints,
    pub default: Option<serde_json::Value>,
    /// Source value for embedded fields. `None` for nested types, which are
    /// built by their own constructor.
    pub value: Option<PropertyValue>,
}

impl FieldDecl {
    pub fn new(key: impl Into<String>, ty: TargetType) -> Self {
        let accessor = crate::naming::accessor_kind(&ty);
        Self {
            key: key.into(),
            ty,
            accessor,
            required: false,
            docs: None,
            format: None,
            constraints: Constraints::default(),
            default: None,
            value: None,
        }
    }
}

/// A string enumeration promoted from enum metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumDecl {
    pub name: String,
    pub values: Vec<String>,
}

/// Accessors over one message bundle.
#[derive(Debug, Clone, PartialEq)]
pub struct MessageContract {
    pub name: String,
    pub bundle: String,
    pub default_locale: String,
    pub methods: Vec<MessageMethodDecl>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MessageMethodDecl {
    pub key: String,
    pub template: String,
    pub arguments: Vec<Argument>,
}
