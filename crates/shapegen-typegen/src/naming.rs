//! Identifier derivation from source keys.
//!
//! Keys split into words on non-alphanumeric characters and case changes
//! (`server.max-threads`, `maxThreads`, `HTTPServer`), then rejoin in the
//! target convention. Backends add their own reserved words.

use crate::resolve::TargetType;
use std::collections::HashSet;

/// Split `s` into words.
pub fn words(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if !c.is_alphanumeric() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() && c.is_uppercase() {
            let prev = chars[i - 1];
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev.is_lowercase() || prev.is_ascii_digit() || (prev.is_uppercase() && next_lower) {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

pub fn pascal_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

pub fn camel_case(s: &str) -> String {
    let mut out = String::new();
    for (i, word) in words(s).iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

pub fn snake_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("_")
}

pub fn upper_snake_case(s: &str) -> String {
    words(s)
        .iter()
        .map(|w| w.to_uppercase())
        .collect::<Vec<_>>()
        .join("_")
}

/// Make `ident` usable: `fallback` when empty, `_` before a leading digit,
/// `_` after a reserved word.
pub fn sanitize(ident: String, reserved: &[&str], fallback: &str) -> String {
    if ident.is_empty() {
        return fallback.to_string();
    }
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        return format!("_{ident}");
    }
    if reserved.contains(&ident.as_str()) {
        return format!("{ident}_");
    }
    ident
}

/// Names the emitted code uses unqualified: Rust prelude and keyword types,
/// `java.lang` types and everything the Java backend imports. A nested type
/// with one of these names would shadow it.
pub const BUILTIN_TYPE_NAMES: &[&str] = &[
    // Rust
    "Self", "Option", "Result", "Vec", "String", "Box", "Default", "Eq",
    // Java
    "Object", "Boolean", "Integer", "Long", "Double", "Float", "Number", "Override",
    "IllegalArgumentException", "List", "Map", "LinkedHashMap", "Collections", "Arrays",
    "Objects", "UUID", "Date", "OffsetDateTime", "LocalDate", "LocalTime", "ElementType",
    "Retention", "RetentionPolicy", "Target", "Message", "JsonCreator", "JsonInclude",
    "JsonProperty", "JsonPropertyOrder", "JsonValue", "NotNull", "Pattern", "Size",
    "DecimalMin", "DecimalMax", "Email", "Valid",
];

/// Type name for a key: PascalCase, `Value` when nothing is left.
pub fn type_name(key: &str) -> String {
    sanitize(pascal_case(key), &[], "Value")
}

/// Hands out unique names within one scope by appending `2`, `3`, ...
#[derive(Debug, Clone, Default)]
pub struct NameAllocator {
    taken: HashSet<String>,
}

impl NameAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Block `name` without handing it out.
    pub fn reserve(&mut self, name: impl Into<String>) {
        self.taken.insert(name.into());
    }

    pub fn allocate(&mut self, base: &str) -> String {
        let mut name = base.to_string();
        let mut n = 2;
        while self.taken.contains(&name) {
            name = format!("{base}{n}");
            n += 1;
        }
        self.taken.insert(name.clone());
        name
    }
}

/// Accessor prefix family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    /// `isActive` / `is_active`
    Is,
    /// `getId` / `get_id`
    Get,
}

impl AccessorKind {
    pub fn prefix(self) -> &'static str {
        match self {
            AccessorKind::Is => "is",
            AccessorKind::Get => "get",
        }
    }
}

/// The prefix depends only on the resolved type, never on the key.
pub fn accessor_kind(ty: &TargetType) -> AccessorKind {
    match ty {
        TargetType::Boolean => AccessorKind::Is,
        _ => AccessorKind::Get,
    }
}
