//! Lowering from source models to declarations.
//!
//! Walks a property tree or schema in document order, resolves every field
//! and lowers each nested type before the field that references it. Type
//! names are allocated per scope so a nested type never shares its name
//! with a sibling, with any enclosing type or with a type the backends
//! refer to by its simple name (`Option`, `String`, `List`, ...).

use crate::error::ParseError;
use crate::input::{MessageEntry, ParsedSource};
use crate::ir::{EnumDecl, FieldDecl, MessageContract, MessageMethodDecl, TypeDecl};
use crate::model::{PrimitiveType, PropertyDefinition, PropertyTree, PropertyValue, SchemaDefinition};
use crate::naming::{BUILTIN_TYPE_NAMES, NameAllocator};
use crate::options::{EmissionMode, GenerationOptions};
use crate::resolve::{TargetType, resolve_property, resolve_value};
use std::collections::HashMap;

/// What a source lowers to.
#[derive(Debug, Clone, PartialEq)]
pub enum Declarations {
    Type(TypeDecl),
    Messages(MessageContract),
}

/// Lower any parsed source. `name` is the requested type name; `bundle` the
/// default bundle base name for message sources.
pub fn lower_source(
    name: &str,
    bundle: &str,
    source: &ParsedSource,
    options: &GenerationOptions,
) -> Result<Declarations, ParseError> {
    Ok(match source {
        ParsedSource::Tree(tree) => Declarations::Type(lower_tree(name, tree, options)),
        ParsedSource::Schema(schema) => Declarations::Type(lower_schema(name, schema, options)),
        ParsedSource::Messages(entries) => {
            Declarations::Messages(lower_messages(name, bundle, entries, options)?)
        }
    })
}

pub fn lower_tree(name: &str, tree: &PropertyTree, options: &GenerationOptions) -> TypeDecl {
    let mut enclosing = Vec::new();
    lower_tree_at(name.to_string(), name, tree, options.mode, &mut enclosing)
}

fn scope(enclosing: &[String]) -> NameAllocator {
    let mut names = NameAllocator::new();
    for name in BUILTIN_TYPE_NAMES {
        names.reserve(*name);
    }
    for name in enclosing {
        names.reserve(name.clone());
    }
    names
}

fn lower_tree_at(
    name: String,
    source_name: &str,
    tree: &PropertyTree,
    mode: EmissionMode,
    enclosing: &mut Vec<String>,
) -> TypeDecl {
    enclosing.push(name.clone());
    let mut names = scope(enclosing);
    let mut decl = TypeDecl {
        name,
        source_name: source_name.to_string(),
        docs: None,
        mode,
        fields: Vec::new(),
        nested: Vec::new(),
        enums: Vec::new(),
    };

    for (key, value) in tree {
        let mut ty = resolve_value(key, value);
        let mut literal = (mode == EmissionMode::Embed).then(|| value.clone());

        if let (TargetType::Nested(base), PropertyValue::Nested(subtree)) = (&ty, value) {
            let allocated = names.allocate(base);
            let child = lower_tree_at(allocated.clone(), key, subtree, mode, enclosing);
            decl.nested.push(child);
            ty = TargetType::Nested(allocated);
            literal = None;
        }

        let mut field = FieldDecl::new(key.clone(), ty);
        field.required = mode == EmissionMode::Embed;
        field.value = literal;
        decl.fields.push(field);
    }

    enclosing.pop();
    decl
}

/// Lower a schema. Schemas always lower to shapes.
pub fn lower_schema(name: &str, schema: &SchemaDefinition, options: &GenerationOptions) -> TypeDecl {
    let mut enclosing = Vec::new();
    lower_schema_at(name.to_string(), schema, options, &mut enclosing)
}

fn lower_schema_at(
    name: String,
    schema: &SchemaDefinition,
    options: &GenerationOptions,
    enclosing: &mut Vec<String>,
) -> TypeDecl {
    enclosing.push(name.clone());
    let mut names = scope(enclosing);
    let mut lowered: HashMap<String, String> = HashMap::new();
    let mut decl = TypeDecl {
        name,
        source_name: schema.name.clone(),
        docs: schema.description.clone().or_else(|| schema.title.clone()),
        mode: EmissionMode::Shape,
        fields: Vec::new(),
        nested: Vec::new(),
        enums: Vec::new(),
    };

    for (key, property) in &schema.properties {
        let ty = resolve_property(property, options.enum_types).rename(&mut |ty| match ty {
            TargetType::Nested(nested_key) => {
                if let Some(done) = lowered.get(nested_key) {
                    return Some(done.clone());
                }
                let Some(child_schema) = schema.nested(nested_key) else {
                    tracing::warn!(schema = %schema.name, nested = %nested_key, "nested schema missing");
                    return None;
                };
                let allocated = names.allocate(nested_key);
                let child = lower_schema_at(allocated.clone(), child_schema, options, enclosing);
                decl.nested.push(child);
                lowered.insert(nested_key.clone(), allocated.clone());
                Some(allocated)
            }
            TargetType::Enum(base) => {
                let values = enum_values(property)?;
                let allocated = names.allocate(base);
                decl.enums.push(EnumDecl {
                    name: allocated.clone(),
                    values,
                });
                Some(allocated)
            }
            _ => None,
        });

        let mut field = FieldDecl::new(key.clone(), ty);
        field.required = property.required || schema.is_required(key);
        field.docs = property.description.clone();
        field.format = property.format.clone();
        field.constraints = property.constraints.clone();
        field.default = property.default.clone();
        decl.fields.push(field);
    }

    enclosing.pop();
    decl
}

/// String enum values of `property` or of its (nested) item definition.
fn enum_values(property: &PropertyDefinition) -> Option<Vec<String>> {
    let mut current = Some(property);
    while let Some(p) = current {
        if p.ty == PrimitiveType::String {
            if let Some(values) = p.constraints.string_enum() {
                return Some(values.into_iter().map(String::from).collect());
            }
        }
        current = p.items.as_deref();
    }
    None
}

/// Lower a message bundle. Every template is analyzed; a malformed one
/// fails the whole contract.
pub fn lower_messages(
    name: &str,
    bundle: &str,
    entries: &[MessageEntry],
    options: &GenerationOptions,
) -> Result<MessageContract, ParseError> {
    let methods = entries
        .iter()
        .map(|entry| {
            let arguments = shapegen_messages::analyze(&entry.template).map_err(|source| {
                ParseError::Template {
                    key: entry.key.clone(),
                    source,
                }
            })?;
            Ok(MessageMethodDecl {
                key: entry.key.clone(),
                template: entry.template.clone(),
                arguments,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(MessageContract {
        name: name.to_string(),
        bundle: options
            .bundle_name
            .clone()
            .unwrap_or_else(|| bundle.to_string()),
        default_locale: options.default_locale.clone(),
        methods,
    })
}
