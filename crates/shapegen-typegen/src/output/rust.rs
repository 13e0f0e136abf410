//! Rust backend.
//!
//! Nested declarations and enums of a type go into a `pub mod` named after
//! it, written before the type itself. Embedded types get private fields
//! filled in by `new()`. Shapes get `Option` fields, accessors, a builder
//! and, depending on options, serde, `validator` and structural impls.
//! Message contracts implement `shapegen_messages::MessageContract` and add
//! an accessor trait on `BoundMessages`.

use super::{CodeWriter, HEADER, plain_number};
use crate::ir::{EnumDecl, FieldDecl, MessageContract, TypeDecl};
use crate::model::{PropertyValue, Scalar};
use crate::naming::{self, NameAllocator};
use crate::options::{EmissionMode, GenerationOptions};
use crate::resolve::TargetType;
use crate::traits::Backend;
use shapegen_messages::ArgumentType;

/// Static instance of the Rust backend.
pub static RUST_BACKEND: RustBackend = RustBackend;

/// Rust backend implementing the Backend trait.
pub struct RustBackend;

impl Backend for RustBackend {
    fn name(&self) -> &'static str {
        "rust"
    }

    fn language(&self) -> &'static str {
        "rust"
    }

    fn extension(&self) -> &'static str {
        "rs"
    }

    fn generate_type(&self, decl: &TypeDecl, options: &GenerationOptions) -> String {
        generate_rust_type(decl, options)
    }

    fn generate_messages(&self, contract: &MessageContract, options: &GenerationOptions) -> String {
        generate_rust_messages(contract, options)
    }
}

const RESERVED: &[&str] = &[
    "as", "async", "await", "break", "const", "continue", "crate", "dyn", "else", "enum", "extern",
    "false", "fn", "for", "gen", "if", "impl", "in", "let", "loop", "match", "mod", "move", "mut",
    "pub", "ref", "return", "self", "Self", "static", "struct", "super", "trait", "true", "try",
    "type", "unsafe", "use", "where", "while", "yield", "abstract", "become", "box", "do",
    "final", "macro", "override", "priv", "typeof", "unsized", "virtual",
];

/// Generate a Rust module for a type declaration tree.
pub fn generate_rust_type(decl: &TypeDecl, options: &GenerationOptions) -> String {
    let mut writer = RustWriter::new(options);
    let module = module_name(&mut NameAllocator::new(), &decl.name);
    if decl.mode == EmissionMode::Shape {
        writer.import_validate();
    }
    writer.write_decl(decl, 0, &module, &format!("{}Builder", decl.name));
    writer.finish()
}

/// Generate a Rust message contract and its accessor trait.
pub fn generate_rust_messages(contract: &MessageContract, options: &GenerationOptions) -> String {
    let mut writer = RustWriter::new(options);
    writer.write_contract(contract);
    writer.finish()
}

fn module_name(names: &mut NameAllocator, type_name: &str) -> String {
    names.allocate(&naming::sanitize(naming::snake_case(type_name), RESERVED, "types"))
}

fn field_idents(fields: &[FieldDecl]) -> Vec<String> {
    let mut names = NameAllocator::new();
    fields
        .iter()
        .map(|f| names.allocate(&naming::sanitize(naming::snake_case(&f.key), RESERVED, "value")))
        .collect()
}

fn rust_string(s: &str) -> String {
    format!("{s:?}")
}

fn float_literal(value: f64, bits: u8) -> String {
    let ty = if bits == 32 { "f32" } else { "f64" };
    if value.is_nan() {
        format!("{ty}::NAN")
    } else if value.is_infinite() {
        if value > 0.0 {
            format!("{ty}::INFINITY")
        } else {
            format!("{ty}::NEG_INFINITY")
        }
    } else if bits == 32 {
        format!("{:?}", value as f32)
    } else {
        format!("{value:?}")
    }
}

/// `serde_json::json!` tokens for a value. Non-finite floats become `null`.
fn json_tokens(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Scalar(Scalar::String(s)) => rust_string(s),
        PropertyValue::Scalar(Scalar::Integer(i)) => i.to_string(),
        PropertyValue::Scalar(Scalar::Float(f)) if f.is_finite() => format!("{f:?}"),
        PropertyValue::Scalar(Scalar::Float(_)) | PropertyValue::Scalar(Scalar::Null) => {
            "null".to_string()
        }
        PropertyValue::Scalar(Scalar::Boolean(b)) => b.to_string(),
        PropertyValue::List(items) => {
            let parts: Vec<String> = items.iter().map(json_tokens).collect();
            format!("[{}]", parts.join(", "))
        }
        PropertyValue::Nested(tree) => {
            let parts: Vec<String> = tree
                .iter()
                .map(|(key, value)| format!("{}: {}", rust_string(key), json_tokens(value)))
                .collect();
            format!("{{{}}}", parts.join(", "))
        }
    }
}

fn json_literal(value: &PropertyValue) -> String {
    match value {
        PropertyValue::Scalar(Scalar::Null) => "serde_json::Value::Null".to_string(),
        other => format!("serde_json::json!({})", json_tokens(other)),
    }
}

/// Expression over `expr` that implements `Hash`, or `None` when `expr`
/// already does. Floats hash by bit pattern, JSON values by their text.
fn hash_view(ty: &TargetType, expr: &str, level: usize) -> Option<String> {
    match ty {
        TargetType::Float { .. } => Some(format!("{expr}.to_bits()")),
        TargetType::Any => Some(format!("{expr}.to_string()")),
        TargetType::Array(inner) => {
            let item = format!("x{level}");
            hash_view(inner, &item, level + 1).map(|view| {
                format!("{expr}.iter().map(|{item}| {view}).collect::<Vec<_>>()")
            })
        }
        _ => None,
    }
}

/// Whether a field of type `ty` in `decl` can reach a float, which rules out
/// `Eq`. References to other generated types are assumed to.
fn may_hold_float(decl: &TypeDecl, ty: &TargetType) -> bool {
    match ty.element() {
        TargetType::Float { .. } | TargetType::Ref(_) => true,
        TargetType::Nested(name) => decl
            .nested
            .iter()
            .find(|nested| nested.name == *name)
            .is_some_and(|nested| nested.fields.iter().any(|f| may_hold_float(nested, &f.ty))),
        _ => false,
    }
}

fn is_copy(ty: &TargetType) -> bool {
    matches!(
        ty,
        TargetType::Integer { .. }
            | TargetType::Float { .. }
            | TargetType::Boolean
            | TargetType::DateTime
            | TargetType::Date
            | TargetType::Time
            | TargetType::Uuid
            | TargetType::Enum(_)
    )
}

/// Bound literal for a `validator` range on a field of type `ty`.
fn bound_literal(ty: &TargetType, bound: f64, lower: bool) -> String {
    match ty {
        TargetType::Integer { .. } => {
            let rounded = if lower { bound.ceil() } else { bound.floor() };
            plain_number(rounded)
        }
        _ => format!("{bound:?}"),
    }
}

struct RustWriter<'a> {
    out: CodeWriter,
    options: &'a GenerationOptions,
    module_doc: Option<String>,
}

impl<'a> RustWriter<'a> {
    fn new(options: &'a GenerationOptions) -> Self {
        Self {
            out: CodeWriter::new("    "),
            options,
            module_doc: options
                .package
                .as_ref()
                .map(|package| format!("//! Generated for `{package}`.")),
        }
    }

    fn finish(self) -> String {
        let mut file = String::new();
        file.push_str(HEADER);
        file.push('\n');
        if let Some(doc) = &self.module_doc {
            file.push_str(doc);
            file.push('\n');
        }
        file.push('\n');
        file.push_str(&self.out.finish());
        file
    }

    /// `#[validate(nested)]` expands to calls on `Validate` that need the
    /// trait in scope.
    fn import_validate(&mut self) {
        if self.options.validation {
            self.out.line("use validator::Validate;");
            self.out.blank();
        }
    }

    fn docs(&mut self, lines: &[String]) {
        for line in lines {
            for part in line.lines() {
                if part.trim().is_empty() {
                    self.out.line("///");
                } else {
                    self.out.line(format!("/// {part}"));
                }
            }
        }
    }

    fn rust_type(&self, ty: &TargetType, module: &str, depth: usize) -> String {
        match ty {
            TargetType::String => "String".to_string(),
            TargetType::Integer { bits: 64 } => "i64".to_string(),
            TargetType::Integer { .. } => "i32".to_string(),
            TargetType::Float { bits: 32 } => "f32".to_string(),
            TargetType::Float { .. } => "f64".to_string(),
            TargetType::Boolean => "bool".to_string(),
            TargetType::DateTime => "chrono::DateTime<chrono::FixedOffset>".to_string(),
            TargetType::Date => "chrono::NaiveDate".to_string(),
            TargetType::Time => "chrono::NaiveTime".to_string(),
            TargetType::Uuid => "uuid::Uuid".to_string(),
            TargetType::Array(inner) => format!("Vec<{}>", self.rust_type(inner, module, depth)),
            TargetType::Nested(name) | TargetType::Enum(name) => format!("{module}::{name}"),
            TargetType::Ref(name) => {
                format!("{}{}", "super::".repeat(depth), naming::type_name(name))
            }
            TargetType::Any => "serde_json::Value".to_string(),
        }
    }

    fn write_decl(&mut self, decl: &TypeDecl, depth: usize, module: &str, builder: &str) {
        if !decl.nested.is_empty() || !decl.enums.is_empty() {
            self.write_children(decl, depth, module);
        }
        match decl.mode {
            EmissionMode::Embed => self.write_embedded(decl, depth, module),
            EmissionMode::Shape => self.write_shape(decl, depth, module, builder),
        }
    }

    fn write_children(&mut self, decl: &TypeDecl, depth: usize, module: &str) {
        let mut modules = NameAllocator::new();
        let mut types = NameAllocator::new();
        for nested in &decl.nested {
            types.reserve(nested.name.clone());
        }
        for decl_enum in &decl.enums {
            types.reserve(decl_enum.name.clone());
        }

        self.out.open(format!("pub mod {module} {{"));
        if self.options.validation && decl.nested.iter().any(|n| n.mode == EmissionMode::Shape) {
            self.out.line("use validator::Validate;");
        }
        for nested in &decl.nested {
            let child_module = module_name(&mut modules, &nested.name);
            let builder = types.allocate(&format!("{}Builder", nested.name));
            self.out.blank();
            self.write_decl(nested, depth + 1, &child_module, &builder);
        }
        for decl_enum in &decl.enums {
            self.out.blank();
            self.write_enum(decl_enum);
        }
        self.out.close("}");
        self.out.blank();
    }

    // ---- embedded values ----

    fn literal(&self, value: &PropertyValue, ty: &TargetType) -> String {
        match (value, ty) {
            (_, TargetType::Any) => json_literal(value),
            (PropertyValue::Scalar(scalar), ty) => match (scalar, ty) {
                (Scalar::String(s), _) => format!("{}.to_string()", rust_string(s)),
                (Scalar::Integer(i), TargetType::Integer { .. }) => i.to_string(),
                (Scalar::Integer(i), TargetType::Float { bits }) => float_literal(*i as f64, *bits),
                (Scalar::Float(f), TargetType::Float { bits }) => float_literal(*f, *bits),
                (Scalar::Boolean(b), _) => b.to_string(),
                _ => "Default::default()".to_string(),
            },
            (PropertyValue::List(items), TargetType::Array(inner)) => {
                let parts: Vec<String> = items.iter().map(|item| self.literal(item, inner)).collect();
                format!("vec![{}]", parts.join(", "))
            }
            _ => "Default::default()".to_string(),
        }
    }

    fn write_embedded(&mut self, decl: &TypeDecl, depth: usize, module: &str) {
        let idents = field_idents(&decl.fields);
        let types: Vec<String> = decl
            .fields
            .iter()
            .map(|f| self.rust_type(&f.ty, module, depth))
            .collect();
        let name = &decl.name;

        self.docs(&decl.docs.iter().cloned().collect::<Vec<_>>());
        if self.options.serialization {
            self.out.line("#[derive(Debug, Clone, PartialEq, serde::Serialize)]");
        } else {
            self.out.line("#[derive(Debug, Clone, PartialEq)]");
        }
        self.out.open(format!("pub struct {name} {{"));
        for ((field, ident), ty) in decl.fields.iter().zip(&idents).zip(&types) {
            if self.options.serialization && field.key != *ident {
                self.out.line(format!("#[serde(rename = {})]", rust_string(&field.key)));
            }
            self.out.line(format!("{ident}: {ty},"));
        }
        self.out.close("}");

        self.out.blank();
        self.out.open(format!("impl {name} {{"));
        self.out.open("pub fn new() -> Self {");
        self.out.open("Self {");
        for ((field, ident), ty) in decl.fields.iter().zip(&idents).zip(&types) {
            let init = match (&field.ty, &field.value) {
                (TargetType::Nested(_), _) => format!("{ty}::new()"),
                (ty, Some(value)) => self.literal(value, ty),
                (_, None) => "Default::default()".to_string(),
            };
            self.out.line(format!("{ident}: {init},"));
        }
        self.out.close("}");
        self.out.close("}");

        for ((field, ident), ty) in decl.fields.iter().zip(&idents).zip(&types) {
            let (returns, expr) = match &field.ty {
                t if is_copy(t) => (ty.clone(), format!("self.{ident}")),
                TargetType::String => ("&str".to_string(), format!("&self.{ident}")),
                TargetType::Array(inner) => (
                    format!("&[{}]", self.rust_type(inner, module, depth)),
                    format!("&self.{ident}"),
                ),
                _ => (format!("&{ty}"), format!("&self.{ident}")),
            };
            self.out.blank();
            self.out.open(format!(
                "pub fn {}_{ident}(&self) -> {returns} {{",
                field.accessor.prefix()
            ));
            self.out.line(expr);
            self.out.close("}");
        }
        self.out.close("}");

        self.out.blank();
        self.out.open(format!("impl Default for {name} {{"));
        self.out.open("fn default() -> Self {");
        self.out.line("Self::new()");
        self.out.close("}");
        self.out.close("}");
    }

    // ---- shapes ----

    fn write_shape(&mut self, decl: &TypeDecl, depth: usize, module: &str, builder: &str) {
        let idents = field_idents(&decl.fields);
        // References may point back at this type, so they are stored boxed.
        let types: Vec<String> = decl
            .fields
            .iter()
            .map(|f| match &f.ty {
                TargetType::Ref(_) => format!("Box<{}>", self.rust_type(&f.ty, module, depth)),
                ty => self.rust_type(ty, module, depth),
            })
            .collect();
        let name = &decl.name;
        let structural = self.options.structural_methods;
        let serialization = self.options.serialization;
        let validation = self.options.validation;

        let mut derives = vec!["Debug", "Clone", "Default"];
        if structural {
            derives.push("PartialEq");
        }
        if serialization {
            derives.extend(["serde::Serialize", "serde::Deserialize"]);
        }
        if validation {
            derives.push("validator::Validate");
        }

        self.docs(&decl.docs.iter().cloned().collect::<Vec<_>>());
        self.out.line(format!("#[derive({})]", derives.join(", ")));
        self.out.open(format!("pub struct {name} {{"));
        for ((field, ident), ty) in decl.fields.iter().zip(&idents).zip(&types) {
            self.docs(&field_docs(field));
            if serialization {
                if field.key == *ident {
                    self.out.line("#[serde(skip_serializing_if = \"Option::is_none\")]");
                } else {
                    self.out.line(format!(
                        "#[serde(rename = {}, skip_serializing_if = \"Option::is_none\")]",
                        rust_string(&field.key)
                    ));
                }
            }
            if validation {
                let rules = validation_rules(field);
                if !rules.is_empty() {
                    self.out.line(format!("#[validate({})]", rules.join(", ")));
                }
            }
            self.out.line(format!("{ident}: Option<{ty}>,"));
        }
        self.out.close("}");

        self.out.blank();
        self.out.open(format!("impl {name} {{"));
        self.out.open("pub fn new() -> Self {");
        self.out.line("Self::default()");
        self.out.close("}");
        self.out.blank();
        self.out.open(format!("pub fn builder() -> {builder} {{"));
        self.out.line(format!("{builder}::default()"));
        self.out.close("}");

        for ((field, ident), ty) in decl.fields.iter().zip(&idents).zip(&types) {
            let (returns, expr) = match &field.ty {
                t if is_copy(t) => (ty.clone(), format!("self.{ident}")),
                TargetType::String => ("&str".to_string(), format!("self.{ident}.as_deref()")),
                TargetType::Array(inner) => (
                    format!("&[{}]", self.rust_type(inner, module, depth)),
                    format!("self.{ident}.as_deref()"),
                ),
                TargetType::Ref(_) => (
                    format!("&{}", self.rust_type(&field.ty, module, depth)),
                    format!("self.{ident}.as_deref()"),
                ),
                _ => (format!("&{ty}"), format!("self.{ident}.as_ref()")),
            };
            self.out.blank();
            self.out.open(format!(
                "pub fn {}_{ident}(&self) -> Option<{returns}> {{",
                field.accessor.prefix()
            ));
            self.out.line(expr);
            self.out.close("}");
            self.out.blank();
            self.out.open(format!("pub fn set_{ident}(&mut self, {ident}: Option<{ty}>) {{"));
            self.out.line(format!("self.{ident} = {ident};"));
            self.out.close("}");
        }
        self.out.close("}");

        if structural {
            self.write_structural_impls(decl, &idents);
        }
        self.write_builder(decl, builder, &idents, &types, module, depth);
    }

    fn write_structural_impls(&mut self, decl: &TypeDecl, idents: &[String]) {
        let name = &decl.name;

        if !decl.fields.iter().any(|f| may_hold_float(decl, &f.ty)) {
            self.out.blank();
            self.out.line(format!("impl Eq for {name} {{}}"));
        }

        self.out.blank();
        self.out.open(format!("impl std::hash::Hash for {name} {{"));
        self.out.open("fn hash<H: std::hash::Hasher>(&self, state: &mut H) {");
        for (field, ident) in decl.fields.iter().zip(idents) {
            match hash_view(&field.ty, "v", 0) {
                Some(view) => self.out.line(format!(
                    "std::hash::Hash::hash(&self.{ident}.as_ref().map(|v| {view}), state);"
                )),
                None => self.out.line(format!("std::hash::Hash::hash(&self.{ident}, state);")),
            }
        }
        self.out.close("}");
        self.out.close("}");

        self.out.blank();
        self.out.open(format!("impl std::fmt::Display for {name} {{"));
        self.out.open("fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {");
        if idents.is_empty() {
            self.out.line(format!("write!(f, \"{name}{{{{}}}}\")"));
        } else {
            let template: Vec<String> = idents.iter().map(|i| format!("{i}={{:?}}")).collect();
            let args: Vec<String> = idents.iter().map(|i| format!("self.{i}")).collect();
            self.out.line(format!(
                "write!(f, \"{name}{{{{{}}}}}\", {})",
                template.join(", "),
                args.join(", ")
            ));
        }
        self.out.close("}");
        self.out.close("}");
    }

    fn write_builder(
        &mut self,
        decl: &TypeDecl,
        builder: &str,
        idents: &[String],
        types: &[String],
        module: &str,
        depth: usize,
    ) {
        let mut methods = NameAllocator::new();
        methods.reserve("build");
        let method_names: Vec<String> = idents.iter().map(|i| methods.allocate(i)).collect();

        self.out.blank();
        self.out.line(format!("/// Builder for [`{}`].", decl.name));
        self.out.line("#[derive(Debug, Clone, Default)]");
        self.out.open(format!("pub struct {builder} {{"));
        for (ident, ty) in idents.iter().zip(types) {
            self.out.line(format!("{ident}: Option<{ty}>,"));
        }
        self.out.close("}");

        self.out.blank();
        self.out.open(format!("impl {builder} {{"));
        let entries = decl.fields.iter().zip(idents).zip(types).zip(&method_names);
        for (((field, ident), ty), method) in entries {
            if let TargetType::Ref(_) = field.ty {
                let target = self.rust_type(&field.ty, module, depth);
                self.out.open(format!("pub fn {method}(mut self, {ident}: {target}) -> Self {{"));
                self.out.line(format!("self.{ident} = Some(Box::new({ident}));"));
            } else {
                self.out.open(format!("pub fn {method}(mut self, {ident}: {ty}) -> Self {{"));
                self.out.line(format!("self.{ident} = Some({ident});"));
            }
            self.out.line("self");
            self.out.close("}");
            self.out.blank();
        }
        self.out.open(format!("pub fn build(self) -> {} {{", decl.name));
        if idents.is_empty() {
            self.out.line(format!("{} {{}}", decl.name));
        } else {
            self.out.open(format!("{} {{", decl.name));
            for ident in idents {
                self.out.line(format!("{ident}: self.{ident},"));
            }
            self.out.close("}");
        }
        self.out.close("}");
        self.out.close("}");
    }

    fn write_enum(&mut self, decl: &EnumDecl) {
        let mut names = NameAllocator::new();
        let variants: Vec<String> = decl
            .values
            .iter()
            .map(|v| names.allocate(&naming::sanitize(naming::pascal_case(v), RESERVED, "Value")))
            .collect();
        let name = &decl.name;

        if self.options.serialization {
            self.out.line(
                "#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]",
            );
        } else {
            self.out.line("#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]");
        }
        self.out.open(format!("pub enum {name} {{"));
        for (variant, value) in variants.iter().zip(&decl.values) {
            if self.options.serialization {
                self.out.line(format!("#[serde(rename = {})]", rust_string(value)));
            }
            self.out.line(format!("{variant},"));
        }
        self.out.close("}");

        self.out.blank();
        self.out.open(format!("impl {name} {{"));
        self.out.open("pub fn value(&self) -> &'static str {");
        self.out.open("match *self {");
        for (variant, value) in variants.iter().zip(&decl.values) {
            self.out.line(format!("Self::{variant} => {},", rust_string(value)));
        }
        self.out.close("}");
        self.out.close("}");
        self.out.blank();
        self.out.open("pub fn from_value(value: &str) -> Option<Self> {");
        self.out.open("match value {");
        for (variant, value) in variants.iter().zip(&decl.values) {
            self.out.line(format!("{} => Some(Self::{variant}),", rust_string(value)));
        }
        self.out.line("_ => None,");
        self.out.close("}");
        self.out.close("}");
        self.out.close("}");

        self.out.blank();
        self.out.open(format!("impl std::fmt::Display for {name} {{"));
        self.out.open("fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {");
        self.out.line("f.write_str(self.value())");
        self.out.close("}");
        self.out.close("}");
    }

    // ---- message contracts ----

    fn write_contract(&mut self, contract: &MessageContract) {
        let name = &contract.name;
        let has_args = contract.methods.iter().any(|m| !m.arguments.is_empty());

        let mut methods = NameAllocator::new();
        let method_names: Vec<String> = contract
            .methods
            .iter()
            .map(|m| methods.allocate(&naming::sanitize(naming::snake_case(&m.key), RESERVED, "message")))
            .collect();

        if has_args {
            self.out.line(
                "use shapegen_messages::{BoundMessages, MessageArg, MessageContract, MessageMethod};",
            );
        } else {
            self.out.line("use shapegen_messages::{BoundMessages, MessageContract, MessageMethod};");
        }

        self.out.blank();
        self.out.line(format!(
            "/// Messages of bundle `{}`, default locale `{}`.",
            contract.bundle, contract.default_locale
        ));
        self.out.line(format!("pub struct {name};"));
        self.out.blank();
        self.out.open(format!("impl {name} {{"));
        self.out.line(format!(
            "pub const DEFAULT_LOCALE: &'static str = {};",
            rust_string(&contract.default_locale)
        ));
        self.out.close("}");

        self.out.blank();
        self.out.open(format!("impl MessageContract for {name} {{"));
        self.out.line(format!(
            "const BASE_NAME: &'static str = {};",
            rust_string(&contract.bundle)
        ));
        self.out.blank();
        self.out.open("fn methods() -> &'static [MessageMethod] {");
        self.out.open("const METHODS: &[MessageMethod] = &[");
        for (method, method_name) in contract.methods.iter().zip(&method_names) {
            let args: Vec<String> = method.arguments.iter().map(|a| rust_string(&a.name)).collect();
            self.out.open("MessageMethod {");
            self.out.line(format!("name: {},", rust_string(method_name)));
            self.out.line(format!("key: {},", rust_string(&method.key)));
            self.out.line(format!("args: &[{}],", args.join(", ")));
            self.out.close("},");
        }
        self.out.close("];");
        self.out.line("METHODS");
        self.out.close("}");
        self.out.close("}");

        let signatures: Vec<(String, Vec<String>)> = contract
            .methods
            .iter()
            .zip(&method_names)
            .map(|(method, method_name)| {
                let mut params = NameAllocator::new();
                let mut declared = vec!["&self".to_string()];
                let mut passed = Vec::new();
                for argument in &method.arguments {
                    let ident = params.allocate(&argument_ident(&argument.name));
                    declared.push(format!("{ident}: {}", argument_type(argument.ty)));
                    passed.push(format!("{ident}.into()"));
                }
                (
                    format!("fn {method_name}({}) -> String", declared.join(", ")),
                    passed,
                )
            })
            .collect();

        let accessors = format!("{name}Accessors");
        self.out.blank();
        self.out.line(format!("/// Accessors for [`{name}`] bound to a locale."));
        self.out.open(format!("pub trait {accessors} {{"));
        for (n, (method, (signature, _))) in contract.methods.iter().zip(&signatures).enumerate() {
            if n > 0 {
                self.out.blank();
            }
            self.docs(&[method.template.clone()]);
            self.out.line(format!("{signature};"));
        }
        self.out.close("}");

        self.out.blank();
        self.out.open(format!("impl {accessors} for BoundMessages<{name}> {{"));
        for (n, ((signature, passed), method_name)) in signatures.iter().zip(&method_names).enumerate() {
            if n > 0 {
                self.out.blank();
            }
            self.out.open(format!("{signature} {{"));
            self.out.line(format!(
                "self.format({}, vec![{}])",
                rust_string(method_name),
                passed.join(", ")
            ));
            self.out.close("}");
        }
        self.out.close("}");
    }
}

fn argument_ident(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_digit()) {
        format!("arg{name}")
    } else {
        naming::sanitize(naming::snake_case(name), RESERVED, "arg")
    }
}

fn argument_type(ty: ArgumentType) -> &'static str {
    match ty {
        ArgumentType::Text => "&str",
        ArgumentType::Numeric => "f64",
        ArgumentType::Temporal => "chrono::NaiveDateTime",
        ArgumentType::Untyped | ArgumentType::Generic => "impl Into<MessageArg>",
    }
}

fn field_docs(field: &FieldDecl) -> Vec<String> {
    let mut docs: Vec<String> = field.docs.iter().cloned().collect();
    if let Some(pattern) = &field.constraints.pattern {
        docs.push(format!("Pattern: `{pattern}`"));
    }
    let promoted = matches!(field.ty.element(), TargetType::Enum(_));
    if !field.constraints.enum_values.is_empty() && !promoted {
        let values: Vec<String> = field
            .constraints
            .enum_values
            .iter()
            .map(|v| v.to_string())
            .collect();
        docs.push(format!("Allowed values: {}", values.join(", ")));
    }
    if let Some(default) = &field.default {
        docs.push(format!("Default: `{default}`"));
    }
    docs
}

fn validation_rules(field: &FieldDecl) -> Vec<String> {
    let c = &field.constraints;
    let mut rules = Vec::new();
    if field.required {
        rules.push("required".to_string());
    }

    let length = |min: Option<u64>, max: Option<u64>| {
        let mut parts = Vec::new();
        if let Some(min) = min {
            parts.push(format!("min = {min}"));
        }
        if let Some(max) = max {
            parts.push(format!("max = {max}"));
        }
        format!("length({})", parts.join(", "))
    };

    match &field.ty {
        TargetType::String => {
            if c.has_length() {
                rules.push(length(c.min_length, c.max_length));
            }
            if field.format.as_deref() == Some("email") {
                rules.push("email".to_string());
            }
        }
        TargetType::Array(_) if c.has_items() => rules.push(length(c.min_items, c.max_items)),
        ty @ (TargetType::Integer { .. } | TargetType::Float { .. }) if c.has_range() => {
            let mut parts = Vec::new();
            if let Some(min) = c.minimum {
                let key = if c.exclusive_minimum { "exclusive_min" } else { "min" };
                parts.push(format!("{key} = {}", bound_literal(ty, min, true)));
            }
            if let Some(max) = c.maximum {
                let key = if c.exclusive_maximum { "exclusive_max" } else { "max" };
                parts.push(format!("{key} = {}", bound_literal(ty, max, false)));
            }
            rules.push(format!("range({})", parts.join(", ")));
        }
        _ => {}
    }

    if matches!(field.ty.element(), TargetType::Nested(_) | TargetType::Ref(_)) {
        rules.push("nested".to_string());
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{parse_json_schema, parse_properties};
    use crate::ir::MessageMethodDecl;
    use crate::lower::{lower_schema, lower_tree};
    use crate::options::ParseOptions;
    use serde_json::json;
    use shapegen_messages::analyze;

    fn embed(text: &str) -> String {
        let tree = parse_properties(text, &ParseOptions::default()).unwrap();
        let options = GenerationOptions::default();
        generate_rust_type(&lower_tree("AppConfig", &tree, &options), &options)
    }

    #[test]
    fn embeds_nested_config_in_a_module() {
        let out = embed("app.name=Demo\napp.port=8080\napp.debug=true\n");
        let module = out.find("pub mod app_config {").unwrap();
        let parent = out.find("pub struct AppConfig {").unwrap();
        assert!(module < parent);
        assert!(out.contains("    pub struct App {\n        name: String,\n        port: i32,\n        debug: bool,\n    }"));
        assert!(out.contains("name: \"Demo\".to_string(),"));
        assert!(out.contains("port: 8080,"));
        assert!(out.contains("pub fn is_debug(&self) -> bool {\n            self.debug\n"));
        assert!(out.contains("pub fn get_name(&self) -> &str {\n            &self.name\n"));
        assert!(out.contains("app: app_config::App,"));
        assert!(out.contains("app: app_config::App::new(),"));
        assert!(out.contains("pub fn get_app(&self) -> &app_config::App {"));
        assert!(out.contains("impl Default for AppConfig {"));
    }

    #[test]
    fn embedded_literals() {
        let tree = crate::input::tree::parse_yaml(
            "max-size: 5000000000\nratio: .nan\nports: [80, 443]\nweights: [1, 2.5]\nextra: {a: [1, \"x\"]}\nnothing: ~\ntype: t\n",
        )
        .unwrap();
        let options = GenerationOptions::default();
        let out = generate_rust_type(&lower_tree("Cfg", &tree, &options), &options);
        assert!(out.contains("#[serde(rename = \"max-size\")]\n    max_size: i64,"));
        assert!(out.contains("max_size: 5000000000,"));
        assert!(out.contains("ratio: f64::NAN,"));
        assert!(out.contains("ports: vec![80, 443],"));
        assert!(out.contains("weights: vec![1.0, 2.5],"));
        assert!(out.contains("pub fn get_weights(&self) -> &[f64] {"));
        assert!(out.contains("nothing: serde_json::Value::Null,"));
        assert!(out.contains("type_: \"t\".to_string(),"));
    }

    #[test]
    fn mixed_maps_in_lists_become_json() {
        let tree = crate::input::tree::parse_yaml("items: [{a: 1}, {b: \"x\"}]\n").unwrap();
        let options = GenerationOptions::default();
        let out = generate_rust_type(&lower_tree("Cfg", &tree, &options), &options);
        assert!(out.contains("items: Vec<serde_json::Value>,"));
        assert!(out.contains(r#"items: vec![serde_json::json!({"a": 1}), serde_json::json!({"b": "x"})],"#));
    }

    fn pet_schema() -> crate::model::SchemaDefinition {
        parse_json_schema(
            &json!({
                "title": "Pet",
                "type": "object",
                "required": ["name"],
                "properties": {
                    "id": { "type": "integer", "format": "int64", "minimum": 1 },
                    "name": { "type": "string", "minLength": 1, "pattern": "^[a-z]+$" },
                    "weight": { "type": "number", "exclusiveMaximum": 100 },
                    "status": { "type": "string", "enum": ["available", "on-hold"] },
                    "owner": { "$ref": "#/definitions/Owner" },
                    "address": {
                        "type": "object",
                        "properties": { "city": { "type": "string" } }
                    }
                },
                "definitions": { "Owner": { "type": "object" } }
            }),
            None,
        )
        .unwrap()
    }

    #[test]
    fn shapes_have_optional_fields_and_metadata() {
        let options = GenerationOptions {
            enum_types: true,
            ..Default::default()
        };
        let out = generate_rust_type(&lower_schema("Pet", &pet_schema(), &options), &options);

        assert!(out.contains(
            "#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize, validator::Validate)]\npub struct Pet {"
        ));
        assert!(out.contains("#[validate(range(min = 1))]\n    id: Option<i64>,"));
        assert!(out.contains("/// Pattern: `^[a-z]+$`"));
        assert!(out.contains("#[validate(required, length(min = 1))]\n    name: Option<String>,"));
        assert!(out.contains("#[validate(range(exclusive_max = 100.0))]\n    weight: Option<f64>,"));
        assert!(out.contains("status: Option<pet::Status>,"));
        assert!(out.contains("#[validate(nested)]\n    owner: Option<Box<Owner>>,"));
        assert!(out.contains("address: Option<pet::Address>,"));
        assert!(out.contains("    pub struct Address {"));
        assert!(out.contains("    pub enum Status {"));
        assert!(out.contains("#[serde(rename = \"on-hold\")]\n        OnHold,"));
        assert!(out.contains("\"on-hold\" => Some(Self::OnHold),"));
        assert!(out.contains("pub fn get_name(&self) -> Option<&str> {\n        self.name.as_deref()\n"));
        assert!(out.contains("pub fn get_id(&self) -> Option<i64> {\n        self.id\n"));
        assert!(out.contains("pub fn get_owner(&self) -> Option<&Owner> {"));
        assert!(out.contains("pub fn set_weight(&mut self, weight: Option<f64>) {"));
        assert!(out.contains("pub fn builder() -> PetBuilder {"));
        assert!(out.contains("pub fn weight(mut self, weight: f64) -> Self {"));
        assert!(out.contains("pub fn build(self) -> Pet {"));
    }

    #[test]
    fn structural_impls_handle_floats() {
        let options = GenerationOptions::default();
        let out = generate_rust_type(&lower_schema("Pet", &pet_schema(), &options), &options);
        assert!(!out.contains("impl Eq for Pet {}"));
        assert!(out.contains("impl Eq for Address {}"));
        assert!(out.contains("std::hash::Hash::hash(&self.weight.as_ref().map(|v| v.to_bits()), state);"));
        assert!(out.contains("std::hash::Hash::hash(&self.id, state);"));
        assert!(out.contains("write!(f, \"Pet{{id={:?}, name={:?}, weight={:?}, status={:?}, owner={:?}, address={:?}}}\""));
        assert!(out.contains("/// Allowed values: \"available\", \"on-hold\""));
    }

    #[test]
    fn options_turn_metadata_off() {
        let options = GenerationOptions {
            structural_methods: false,
            validation: false,
            serialization: false,
            ..Default::default()
        };
        let out = generate_rust_type(&lower_schema("Pet", &pet_schema(), &options), &options);
        assert!(out.contains("#[derive(Debug, Clone, Default)]\npub struct Pet {"));
        assert!(!out.contains("#[validate"));
        assert!(!out.contains("serde"));
        assert!(!out.contains("std::hash::Hash"));
        assert!(!out.contains("use validator"));
    }

    #[test]
    fn validate_trait_is_imported_where_shapes_live() {
        let options = GenerationOptions::default();
        let out = generate_rust_type(&lower_schema("Pet", &pet_schema(), &options), &options);
        assert!(out.contains("\nuse validator::Validate;\n\npub mod pet {\n    use validator::Validate;\n"));
        assert_eq!(out.matches("use validator::Validate;").count(), 2);

        let embedded = embed("app.name=Demo\n");
        assert!(!embedded.contains("use validator"));
    }

    #[test]
    fn self_references_are_boxed() {
        let schema = parse_json_schema(
            &json!({
                "title": "Node",
                "type": "object",
                "properties": {
                    "label": { "type": "string" },
                    "parent": { "$ref": "#/definitions/Node" }
                }
            }),
            None,
        )
        .unwrap();
        let options = GenerationOptions::default();
        let out = generate_rust_type(&lower_schema("Node", &schema, &options), &options);
        assert!(out.contains("#[validate(nested)]\n    parent: Option<Box<Node>>,"));
        assert!(out.contains("pub fn get_parent(&self) -> Option<&Node> {\n        self.parent.as_deref()\n"));
        assert!(out.contains("pub fn set_parent(&mut self, parent: Option<Box<Node>>) {"));
        assert!(out.contains("pub fn parent(mut self, parent: Node) -> Self {\n        self.parent = Some(Box::new(parent));"));
        assert!(out.contains("std::hash::Hash::hash(&self.parent, state);"));
        assert!(!out.contains("impl Eq for Node {}"));
    }

    #[test]
    fn eq_follows_floats_through_nested_types() {
        let schema = parse_json_schema(
            &json!({
                "title": "Place",
                "type": "object",
                "properties": {
                    "name": { "type": "string" },
                    "geo": {
                        "type": "object",
                        "properties": {
                            "pos": {
                                "type": "object",
                                "properties": { "lat": { "type": "number" } }
                            }
                        }
                    },
                    "owner": {
                        "type": "object",
                        "properties": { "email": { "type": "string" } }
                    }
                }
            }),
            None,
        )
        .unwrap();
        let options = GenerationOptions::default();
        let out = generate_rust_type(&lower_schema("Place", &schema, &options), &options);
        assert!(!out.contains("impl Eq for Place {}"));
        assert!(!out.contains("impl Eq for Geo {}"));
        assert!(!out.contains("impl Eq for Pos {}"));
        assert!(out.contains("impl Eq for Owner {}"));
    }

    #[test]
    fn nested_types_do_not_shadow_builtins() {
        let out = embed("option.a=1\nstring.b=x\nself.type=2\nname=x\n");
        assert!(out.contains("pub struct Option2 {"));
        assert!(out.contains("pub struct String2 {"));
        assert!(out.contains("pub struct Self2 {"));
        assert!(out.contains("option: app_config::Option2,"));
        assert!(out.contains("name: String,"));
    }

    #[test]
    fn hash_views_nest() {
        let ty = TargetType::Array(Box::new(TargetType::Array(Box::new(TargetType::F64))));
        assert_eq!(
            hash_view(&ty, "v", 0).unwrap(),
            "v.iter().map(|x0| x0.iter().map(|x1| x1.to_bits()).collect::<Vec<_>>()).collect::<Vec<_>>()"
        );
        assert_eq!(hash_view(&TargetType::String, "v", 0), None);
    }

    #[test]
    fn refs_climb_out_of_modules() {
        let schema = parse_json_schema(
            &json!({
                "title": "Order",
                "type": "object",
                "properties": {
                    "line": {
                        "type": "object",
                        "properties": { "pet": { "$ref": "Pet.schema.json" } }
                    }
                }
            }),
            None,
        )
        .unwrap();
        let options = GenerationOptions::default();
        let out = generate_rust_type(&lower_schema("Order", &schema, &options), &options);
        assert!(out.contains("pet: Option<Box<super::Pet>>,"));
    }

    #[test]
    fn message_contract() {
        let template = "Hello {name}, you have {count, plural, one{# item} other{# items}}";
        let contract = MessageContract {
            name: "Messages".into(),
            bundle: "messages".into(),
            default_locale: "en".into(),
            methods: vec![
                MessageMethodDecl {
                    key: "cart.summary".into(),
                    template: template.into(),
                    arguments: analyze(template).unwrap(),
                },
                MessageMethodDecl {
                    key: "app.title".into(),
                    template: "Shop".into(),
                    arguments: vec![],
                },
            ],
        };
        let out = generate_rust_messages(&contract, &GenerationOptions::default());
        assert!(out.contains("pub struct Messages;"));
        assert!(out.contains("pub const DEFAULT_LOCALE: &'static str = \"en\";"));
        assert!(out.contains("const BASE_NAME: &'static str = \"messages\";"));
        assert!(out.contains("name: \"cart_summary\",\n                key: \"cart.summary\",\n                args: &[\"name\", \"count\"],"));
        assert!(out.contains("fn cart_summary(&self, name: impl Into<MessageArg>, count: f64) -> String;"));
        assert!(out.contains("self.format(\"cart_summary\", vec![name.into(), count.into()])"));
        assert!(out.contains("fn app_title(&self) -> String {\n        self.format(\"app_title\", vec![])"));
        assert!(out.contains("impl MessagesAccessors for BoundMessages<Messages> {"));
    }

    #[test]
    fn output_is_deterministic() {
        let options = GenerationOptions::default();
        let decl = lower_schema("Pet", &pet_schema(), &options);
        assert_eq!(generate_rust_type(&decl, &options), generate_rust_type(&decl, &options));
    }
}
