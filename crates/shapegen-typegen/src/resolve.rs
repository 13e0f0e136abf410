//! Type resolution.
//!
//! Maps each schema property or raw configuration value to exactly one
//! [`TargetType`]. Resolution is pure: the same input always resolves to
//! the same type, and nothing here consults previously resolved fields.

use crate::model::{PrimitiveType, PropertyDefinition, PropertyValue, Scalar};
use crate::naming;

/// Language-neutral field type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TargetType {
    String,
    Integer { bits: u8 },
    Float { bits: u8 },
    Boolean,
    DateTime,
    Date,
    Time,
    Uuid,
    Array(Box<TargetType>),
    /// A generated nested type.
    Nested(String),
    /// A generated enumeration.
    Enum(String),
    /// A type generated elsewhere, named by a reference.
    Ref(String),
    /// Anything: generic JSON-like value.
    Any,
}

impl TargetType {
    pub const I32: TargetType = TargetType::Integer { bits: 32 };
    pub const I64: TargetType = TargetType::Integer { bits: 64 };
    pub const F32: TargetType = TargetType::Float { bits: 32 };
    pub const F64: TargetType = TargetType::Float { bits: 64 };

    /// True when this type or any element type is a float.
    pub fn contains_float(&self) -> bool {
        match self {
            TargetType::Float { .. } => true,
            TargetType::Array(inner) => inner.contains_float(),
            _ => false,
        }
    }

    pub fn contains_any(&self) -> bool {
        match self {
            TargetType::Any => true,
            TargetType::Array(inner) => inner.contains_any(),
            _ => false,
        }
    }

    /// Innermost element type of nested arrays.
    pub fn element(&self) -> &TargetType {
        match self {
            TargetType::Array(inner) => inner.element(),
            other => other,
        }
    }

    /// Rewrite the names of nested and enum types.
    pub fn rename(self, f: &mut impl FnMut(&TargetType) -> Option<String>) -> TargetType {
        match self {
            TargetType::Array(inner) => TargetType::Array(Box::new(inner.rename(f))),
            ty @ (TargetType::Nested(_) | TargetType::Enum(_)) => match (f(&ty), ty) {
                (Some(name), TargetType::Nested(_)) => TargetType::Nested(name),
                (Some(name), TargetType::Enum(_)) => TargetType::Enum(name),
                (_, ty) => ty,
            },
            other => other,
        }
    }
}

/// Resolve a schema property.
///
/// Priority: reference, inline object, array, format-refined primitive,
/// bare primitive. Enum values stay metadata unless `enum_types` promotes a
/// string enum to its own type.
pub fn resolve_property(property: &PropertyDefinition, enum_types: bool) -> TargetType {
    if let Some(reference) = &property.ref_type {
        return TargetType::Ref(reference.clone());
    }
    if let Some(nested) = &property.nested {
        return TargetType::Nested(nested.clone());
    }

    let format = property.format.as_deref();
    match property.ty {
        PrimitiveType::Array => TargetType::Array(Box::new(
            property
                .items
                .as_deref()
                .map(|items| resolve_property(items, enum_types))
                .unwrap_or(TargetType::Any),
        )),
        PrimitiveType::String
            if enum_types && property.constraints.string_enum().is_some() =>
        {
            TargetType::Enum(naming::type_name(&property.name))
        }
        PrimitiveType::String => match format {
            Some("date-time") => TargetType::DateTime,
            Some("date") => TargetType::Date,
            Some("time") => TargetType::Time,
            Some("uuid") => TargetType::Uuid,
            _ => TargetType::String,
        },
        PrimitiveType::Integer => match format {
            Some("int64") => TargetType::I64,
            _ => TargetType::I32,
        },
        PrimitiveType::Number => match format {
            Some("float") => TargetType::F32,
            _ => TargetType::F64,
        },
        PrimitiveType::Boolean => TargetType::Boolean,
        PrimitiveType::Object | PrimitiveType::Any => TargetType::Any,
    }
}

/// Resolve a raw configuration value found under `key`.
pub fn resolve_value(key: &str, value: &PropertyValue) -> TargetType {
    match value {
        PropertyValue::Nested(_) => TargetType::Nested(naming::type_name(key)),
        other => element_type(other),
    }
}

fn element_type(value: &PropertyValue) -> TargetType {
    match value {
        PropertyValue::Scalar(scalar) => resolve_scalar(scalar),
        PropertyValue::List(items) => {
            TargetType::Array(Box::new(common_type(items.iter().map(element_type))))
        }
        PropertyValue::Nested(_) => TargetType::Any,
    }
}

pub fn resolve_scalar(scalar: &Scalar) -> TargetType {
    match scalar {
        Scalar::String(_) => TargetType::String,
        Scalar::Integer(i) if i32::try_from(*i).is_ok() => TargetType::I32,
        Scalar::Integer(_) => TargetType::I64,
        Scalar::Float(_) => TargetType::F64,
        Scalar::Boolean(_) => TargetType::Boolean,
        Scalar::Null => TargetType::Any,
    }
}

/// Smallest type covering every element; `Any` for an empty sequence.
pub fn common_type(types: impl IntoIterator<Item = TargetType>) -> TargetType {
    types.into_iter().reduce(unify).unwrap_or(TargetType::Any)
}

fn unify(a: TargetType, b: TargetType) -> TargetType {
    use TargetType::*;
    match (a, b) {
        (a, b) if a == b => a,
        (Integer { bits: x }, Integer { bits: y }) => Integer { bits: x.max(y) },
        (Float { bits: x }, Float { bits: y }) => Float { bits: x.max(y) },
        (Integer { .. }, Float { .. }) | (Float { .. }, Integer { .. }) => TargetType::F64,
        (Array(x), Array(y)) => Array(Box::new(unify(*x, *y))),
        _ => Any,
    }
}
