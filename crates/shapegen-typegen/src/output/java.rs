//! Java backend.
//!
//! Nested declarations become static member classes of their parent.
//! Embedded types hold `private final` fields initialized with the source
//! values. Shapes get mutable fields, getters and setters, a `Builder`,
//! and optionally `equals`/`hashCode`/`toString`, Jakarta validation
//! annotations and Jackson annotations. Message contracts become an
//! interface whose methods carry a self-contained `@Message` annotation.

use super::{CodeWriter, HEADER, plain_number};
use crate::ir::{EnumDecl, FieldDecl, MessageContract, TypeDecl};
use crate::model::{PropertyTree, PropertyValue, Scalar};
use crate::naming::{self, NameAllocator};
use crate::options::{EmissionMode, GenerationOptions};
use crate::resolve::TargetType;
use crate::traits::Backend;
use shapegen_messages::ArgumentType;
use std::collections::BTreeSet;

/// Static instance of the Java backend.
pub static JAVA_BACKEND: JavaBackend = JavaBackend;

/// Java backend implementing the Backend trait.
pub struct JavaBackend;

impl Backend for JavaBackend {
    fn name(&self) -> &'static str {
        "java"
    }

    fn language(&self) -> &'static str {
        "java"
    }

    fn extension(&self) -> &'static str {
        "java"
    }

    fn generate_type(&self, decl: &TypeDecl, options: &GenerationOptions) -> String {
        generate_java_type(decl, options)
    }

    fn generate_messages(&self, contract: &MessageContract, options: &GenerationOptions) -> String {
        generate_java_messages(contract, options)
    }
}

const RESERVED: &[&str] = &[
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char", "class", "const",
    "continue", "default", "do", "double", "else", "enum", "extends", "final", "finally", "float",
    "for", "goto", "if", "implements", "import", "instanceof", "int", "interface", "long",
    "native", "new", "package", "private", "protected", "public", "return", "short", "static",
    "strictfp", "super", "switch", "synchronized", "this", "throw", "throws", "transient", "try",
    "void", "volatile", "while", "true", "false", "null", "var", "record", "yield", "_",
];

/// Generate a Java compilation unit for a type declaration tree.
pub fn generate_java_type(decl: &TypeDecl, options: &GenerationOptions) -> String {
    let mut writer = JavaWriter::new(options);
    writer.write_type(decl, true);
    writer.finish()
}

/// Generate a Java interface for a message contract.
pub fn generate_java_messages(contract: &MessageContract, options: &GenerationOptions) -> String {
    let mut writer = JavaWriter::new(options);
    writer.write_contract(contract);
    writer.finish()
}

/// `camelCase` field identifiers for `fields`, unique within the type.
fn field_idents(fields: &[FieldDecl]) -> Vec<String> {
    let mut names = NameAllocator::new();
    fields
        .iter()
        .map(|f| names.allocate(&naming::sanitize(naming::camel_case(&f.key), RESERVED, "value")))
        .collect()
}

fn accessor_name(prefix: &str, ident: &str) -> String {
    let mut chars = ident.chars();
    match chars.next() {
        Some(first) => format!("{prefix}{}{}", first.to_uppercase(), chars.as_str()),
        None => prefix.to_string(),
    }
}

/// Java string literal.
pub(crate) fn java_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            // Octal, not `\u`: javac decodes `\u000a` before lexing.
            c if (c as u32) < 0x20 => out.push_str(&format!("\\{:03o}", c as u32)),
            c if !c.is_ascii() => push_unicode_escape(&mut out, c),
            c => out.push(c),
        }
    }
    out.push('"');
    out
}

/// `\uXXXX` escapes for `c` (a surrogate pair outside the BMP), so literals
/// and docs stay ASCII whatever source encoding javac assumes.
fn push_unicode_escape(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units) {
        out.push_str(&format!("\\u{unit:04x}"));
    }
}

fn java_double(f: f64) -> String {
    if f.is_nan() {
        "Double.NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "Double.POSITIVE_INFINITY".to_string()
        } else {
            "Double.NEGATIVE_INFINITY".to_string()
        }
    } else {
        format!("{f:?}")
    }
}

fn java_float(f: f64) -> String {
    let f = f as f32;
    if f.is_nan() {
        "Float.NaN".to_string()
    } else if f.is_infinite() {
        if f > 0.0 {
            "Float.POSITIVE_INFINITY".to_string()
        } else {
            "Float.NEGATIVE_INFINITY".to_string()
        }
    } else {
        format!("{f:?}f")
    }
}

/// Javadoc-safe text.
fn doc_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.replace("*/", "*&#47;").chars() {
        if c.is_ascii() {
            out.push(c);
        } else {
            push_unicode_escape(&mut out, c);
        }
    }
    out
}

struct JavaWriter<'a> {
    out: CodeWriter,
    imports: BTreeSet<&'static str>,
    options: &'a GenerationOptions,
}

impl<'a> JavaWriter<'a> {
    fn new(options: &'a GenerationOptions) -> Self {
        Self {
            out: CodeWriter::new("    "),
            imports: BTreeSet::new(),
            options,
        }
    }

    fn finish(self) -> String {
        let mut file = String::new();
        file.push_str(HEADER);
        file.push('\n');
        if let Some(package) = &self.options.package {
            file.push('\n');
            file.push_str(&format!("package {package};\n"));
        }
        if !self.imports.is_empty() {
            file.push('\n');
            for import in &self.imports {
                file.push_str(&format!("import {import};\n"));
            }
        }
        file.push('\n');
        file.push_str(&self.out.finish());
        file
    }

    fn import(&mut self, path: &'static str) {
        self.imports.insert(path);
    }

    fn javadoc(&mut self, lines: &[String]) {
        if lines.is_empty() {
            return;
        }
        self.out.line("/**");
        for line in lines {
            for part in line.lines() {
                if part.trim().is_empty() {
                    self.out.line(" *");
                } else {
                    self.out.line(format!(" * {}", doc_text(part)));
                }
            }
        }
        self.out.line(" */");
    }

    fn java_type(&mut self, ty: &TargetType, boxed: bool) -> String {
        let pick = |primitive: &str, object: &str| {
            if boxed { object } else { primitive }.to_string()
        };
        match ty {
            TargetType::String => "String".to_string(),
            TargetType::Integer { bits: 64 } => pick("long", "Long"),
            TargetType::Integer { .. } => pick("int", "Integer"),
            TargetType::Float { bits: 32 } => pick("float", "Float"),
            TargetType::Float { .. } => pick("double", "Double"),
            TargetType::Boolean => pick("boolean", "Boolean"),
            TargetType::DateTime => {
                self.import("java.time.OffsetDateTime");
                "OffsetDateTime".to_string()
            }
            TargetType::Date => {
                self.import("java.time.LocalDate");
                "LocalDate".to_string()
            }
            TargetType::Time => {
                self.import("java.time.LocalTime");
                "LocalTime".to_string()
            }
            TargetType::Uuid => {
                self.import("java.util.UUID");
                "UUID".to_string()
            }
            TargetType::Array(inner) => {
                self.import("java.util.List");
                format!("List<{}>", self.java_type(inner, true))
            }
            TargetType::Nested(name) | TargetType::Enum(name) => name.clone(),
            TargetType::Ref(name) => naming::type_name(name),
            TargetType::Any => "Object".to_string(),
        }
    }

    // ---- literals ----

    fn literal(&mut self, value: &PropertyValue, ty: &TargetType) -> String {
        match (value, ty) {
            (_, TargetType::Any) => self.generic_literal(value),
            (PropertyValue::Scalar(scalar), ty) => self.scalar_literal(scalar, ty),
            (PropertyValue::List(items), TargetType::Array(inner)) => {
                let parts: Vec<String> = items.iter().map(|item| self.literal(item, inner)).collect();
                self.list_literal(items, parts)
            }
            _ => self.generic_literal(value),
        }
    }

    fn scalar_literal(&mut self, scalar: &Scalar, ty: &TargetType) -> String {
        match (scalar, ty) {
            (Scalar::String(s), _) => java_string(s),
            (Scalar::Integer(i), TargetType::Integer { bits: 64 }) => format!("{i}L"),
            (Scalar::Integer(i), TargetType::Integer { .. }) => i.to_string(),
            (Scalar::Integer(i), TargetType::Float { bits: 32 }) => java_float(*i as f64),
            (Scalar::Integer(i), TargetType::Float { .. }) => java_double(*i as f64),
            (Scalar::Float(f), TargetType::Float { bits: 32 }) => java_float(*f),
            (Scalar::Float(f), _) => java_double(*f),
            (Scalar::Boolean(b), _) => b.to_string(),
            (Scalar::Null, _) => "null".to_string(),
            (Scalar::Integer(i), _) => i.to_string(),
        }
    }

    fn list_literal(&mut self, items: &[PropertyValue], parts: Vec<String>) -> String {
        let has_null = items
            .iter()
            .any(|item| matches!(item, PropertyValue::Scalar(Scalar::Null)));
        if has_null {
            self.import("java.util.Arrays");
            self.import("java.util.Collections");
            format!("Collections.unmodifiableList(Arrays.asList({}))", parts.join(", "))
        } else {
            self.import("java.util.List");
            format!("List.of({})", parts.join(", "))
        }
    }

    fn generic_literal(&mut self, value: &PropertyValue) -> String {
        match value {
            PropertyValue::Scalar(Scalar::Integer(i)) if i32::try_from(*i).is_ok() => i.to_string(),
            PropertyValue::Scalar(Scalar::Integer(i)) => format!("{i}L"),
            PropertyValue::Scalar(scalar) => self.scalar_literal(scalar, &TargetType::Any),
            PropertyValue::List(items) => {
                let parts: Vec<String> = items.iter().map(|item| self.generic_literal(item)).collect();
                self.list_literal(items, parts)
            }
            PropertyValue::Nested(tree) => self.map_literal(tree),
        }
    }

    fn map_literal(&mut self, tree: &PropertyTree) -> String {
        self.import("java.util.Collections");
        self.import("java.util.LinkedHashMap");
        let puts: Vec<String> = tree
            .iter()
            .map(|(key, value)| format!("put({}, {});", java_string(key), self.generic_literal(value)))
            .collect();
        format!(
            "Collections.unmodifiableMap(new LinkedHashMap<String, Object>() {{{{ {} }}}})",
            puts.join(" ")
        )
    }

    // ---- types ----

    fn write_type(&mut self, decl: &TypeDecl, top_level: bool) {
        match decl.mode {
            EmissionMode::Embed => self.write_embedded(decl, top_level),
            EmissionMode::Shape => self.write_shape(decl, top_level),
        }
    }

    fn write_embedded(&mut self, decl: &TypeDecl, top_level: bool) {
        let idents = field_idents(&decl.fields);
        self.javadoc(&decl.docs.iter().cloned().collect::<Vec<_>>());
        let modifiers = if top_level { "public final class" } else { "public static final class" };
        self.out.open(format!("{modifiers} {} {{", decl.name));

        for nested in &decl.nested {
            self.out.blank();
            self.write_type(nested, false);
        }

        if !decl.fields.is_empty() {
            self.out.blank();
        }
        for (field, ident) in decl.fields.iter().zip(&idents) {
            let ty = self.java_type(&field.ty, false);
            let init = match (&field.ty, &field.value) {
                (TargetType::Nested(name), _) => format!("new {name}()"),
                (ty, Some(value)) => self.literal(value, ty),
                (_, None) => "null".to_string(),
            };
            self.out.line(format!("private final {ty} {ident} = {init};"));
        }

        for (field, ident) in decl.fields.iter().zip(&idents) {
            let ty = self.java_type(&field.ty, false);
            self.out.blank();
            self.out.open(format!(
                "public {ty} {}() {{",
                accessor_name(field.accessor.prefix(), ident)
            ));
            self.out.line(format!("return {ident};"));
            self.out.close("}");
        }

        self.out.close("}");
    }

    fn write_shape(&mut self, decl: &TypeDecl, top_level: bool) {
        let idents = field_idents(&decl.fields);
        let builder = builder_name(decl);
        let serialization = self.options.serialization;

        self.javadoc(&decl.docs.iter().cloned().collect::<Vec<_>>());
        if serialization {
            self.import("com.fasterxml.jackson.annotation.JsonInclude");
            self.out.line("@JsonInclude(JsonInclude.Include.NON_NULL)");
            if !decl.fields.is_empty() {
                self.import("com.fasterxml.jackson.annotation.JsonPropertyOrder");
                let keys: Vec<String> = decl.fields.iter().map(|f| java_string(&f.key)).collect();
                self.out.line(format!("@JsonPropertyOrder({{{}}})", keys.join(", ")));
            }
        }
        let modifiers = if top_level { "public class" } else { "public static class" };
        self.out.open(format!("{modifiers} {} {{", decl.name));

        for nested in &decl.nested {
            self.out.blank();
            self.write_type(nested, false);
        }
        for decl_enum in &decl.enums {
            self.out.blank();
            self.write_enum(decl_enum);
        }

        // Fields
        for (field, ident) in decl.fields.iter().zip(&idents) {
            self.out.blank();
            self.javadoc(&field_docs(field));
            if serialization {
                self.import("com.fasterxml.jackson.annotation.JsonProperty");
                self.out.line(format!("@JsonProperty({})", java_string(&field.key)));
            }
            if self.options.validation {
                for annotation in self.validation_annotations(field) {
                    self.out.line(annotation);
                }
            }
            let ty = self.java_type(&field.ty, true);
            self.out.line(format!("private {ty} {ident};"));
        }

        // Constructors
        self.out.blank();
        self.out.open(format!("public {}() {{", decl.name));
        self.out.close("}");
        self.out.blank();
        self.out.open(format!("private {}({builder} builder) {{", decl.name));
        for ident in &idents {
            self.out.line(format!("this.{ident} = builder.{ident};"));
        }
        self.out.close("}");

        // Accessors
        for (field, ident) in decl.fields.iter().zip(&idents) {
            let ty = self.java_type(&field.ty, true);
            self.out.blank();
            self.out.open(format!(
                "public {ty} {}() {{",
                accessor_name(field.accessor.prefix(), ident)
            ));
            self.out.line(format!("return {ident};"));
            self.out.close("}");
            self.out.blank();
            self.out.open(format!("public void {}({ty} {ident}) {{", accessor_name("set", ident)));
            self.out.line(format!("this.{ident} = {ident};"));
            self.out.close("}");
        }

        self.out.blank();
        self.out.open(format!("public static {builder} builder() {{"));
        self.out.line(format!("return new {builder}();"));
        self.out.close("}");

        if self.options.structural_methods {
            self.write_structural_methods(decl, &idents);
        }

        self.write_builder(decl, &builder, &idents);
        self.out.close("}");
    }

    fn write_structural_methods(&mut self, decl: &TypeDecl, idents: &[String]) {
        self.import("java.util.Objects");
        let name = &decl.name;

        self.out.blank();
        self.out.line("@Override");
        self.out.open("public boolean equals(Object o) {");
        self.out.open("if (this == o) {");
        self.out.line("return true;");
        self.out.close("}");
        self.out.open("if (o == null || getClass() != o.getClass()) {");
        self.out.line("return false;");
        self.out.close("}");
        if idents.is_empty() {
            self.out.line("return true;");
        } else {
            self.out.line(format!("{name} other = ({name}) o;"));
            let comparisons: Vec<String> = idents
                .iter()
                .map(|i| format!("Objects.equals({i}, other.{i})"))
                .collect();
            self.out.line(format!("return {};", comparisons.join(" && ")));
        }
        self.out.close("}");

        self.out.blank();
        self.out.line("@Override");
        self.out.open("public int hashCode() {");
        self.out.line(format!("return Objects.hash({});", idents.join(", ")));
        self.out.close("}");

        self.out.blank();
        self.out.line("@Override");
        self.out.open("public String toString() {");
        let parts: Vec<String> = idents
            .iter()
            .enumerate()
            .map(|(n, i)| {
                let separator = if n == 0 { "" } else { ", " };
                format!("\"{separator}{i}=\" + {i}")
            })
            .collect();
        if parts.is_empty() {
            self.out.line(format!("return \"{name}{{}}\";"));
        } else {
            self.out.line(format!("return \"{name}{{\" + {} + \"}}\";", parts.join(" + ")));
        }
        self.out.close("}");
    }

    fn write_builder(&mut self, decl: &TypeDecl, builder: &str, idents: &[String]) {
        self.out.blank();
        self.out.open(format!("public static final class {builder} {{"));
        for (field, ident) in decl.fields.iter().zip(idents) {
            let ty = self.java_type(&field.ty, true);
            self.out.line(format!("private {ty} {ident};"));
        }
        self.out.blank();
        self.out.open(format!("private {builder}() {{"));
        self.out.close("}");
        for (field, ident) in decl.fields.iter().zip(idents) {
            let ty = self.java_type(&field.ty, true);
            self.out.blank();
            self.out.open(format!("public {builder} {ident}({ty} {ident}) {{"));
            self.out.line(format!("this.{ident} = {ident};"));
            self.out.line("return this;");
            self.out.close("}");
        }
        self.out.blank();
        self.out.open(format!("public {} build() {{", decl.name));
        self.out.line(format!("return new {}(this);", decl.name));
        self.out.close("}");
        self.out.close("}");
    }

    fn write_enum(&mut self, decl: &EnumDecl) {
        let mut names = NameAllocator::new();
        let constants: Vec<String> = decl
            .values
            .iter()
            .map(|v| names.allocate(&naming::sanitize(naming::upper_snake_case(v), RESERVED, "VALUE")))
            .collect();
        let serialization = self.options.serialization;

        self.out.open(format!("public enum {} {{", decl.name));
        for (n, (constant, value)) in constants.iter().zip(&decl.values).enumerate() {
            let end = if n + 1 == constants.len() { ";" } else { "," };
            self.out.line(format!("{constant}({}){end}", java_string(value)));
        }
        self.out.blank();
        self.out.line("private final String value;");
        self.out.blank();
        self.out.open(format!("{}(String value) {{", decl.name));
        self.out.line("this.value = value;");
        self.out.close("}");
        self.out.blank();
        if serialization {
            self.import("com.fasterxml.jackson.annotation.JsonValue");
            self.out.line("@JsonValue");
        }
        self.out.open("public String value() {");
        self.out.line("return value;");
        self.out.close("}");
        self.out.blank();
        if serialization {
            self.import("com.fasterxml.jackson.annotation.JsonCreator");
            self.out.line("@JsonCreator");
        }
        self.out.open(format!("public static {} fromValue(String value) {{", decl.name));
        self.out.open(format!("for ({} candidate : values()) {{", decl.name));
        self.out.open("if (candidate.value.equals(value)) {");
        self.out.line("return candidate;");
        self.out.close("}");
        self.out.close("}");
        self.out
            .line("throw new IllegalArgumentException(\"Unexpected value '\" + value + \"'\");");
        self.out.close("}");
        self.out.close("}");
    }

    fn validation_annotations(&mut self, field: &FieldDecl) -> Vec<String> {
        let mut out = Vec::new();
        let c = &field.constraints;

        if field.required {
            self.import("jakarta.validation.constraints.NotNull");
            out.push("@NotNull".to_string());
        }
        match &field.ty {
            TargetType::String => {
                if let Some(pattern) = &c.pattern {
                    self.import("jakarta.validation.constraints.Pattern");
                    out.push(format!("@Pattern(regexp = {})", java_string(pattern)));
                }
                if c.has_length() {
                    self.import("jakarta.validation.constraints.Size");
                    out.push(size_annotation(c.min_length, c.max_length));
                }
                if field.format.as_deref() == Some("email") {
                    self.import("jakarta.validation.constraints.Email");
                    out.push("@Email".to_string());
                }
            }
            TargetType::Array(_) if c.has_items() => {
                self.import("jakarta.validation.constraints.Size");
                out.push(size_annotation(c.min_items, c.max_items));
            }
            TargetType::Integer { .. } | TargetType::Float { .. } => {
                if let Some(min) = c.minimum {
                    self.import("jakarta.validation.constraints.DecimalMin");
                    out.push(decimal_annotation("DecimalMin", min, c.exclusive_minimum));
                }
                if let Some(max) = c.maximum {
                    self.import("jakarta.validation.constraints.DecimalMax");
                    out.push(decimal_annotation("DecimalMax", max, c.exclusive_maximum));
                }
            }
            _ => {}
        }
        if matches!(field.ty.element(), TargetType::Nested(_) | TargetType::Ref(_)) {
            self.import("jakarta.validation.Valid");
            out.push("@Valid".to_string());
        }
        out
    }

    // ---- message contracts ----

    fn write_contract(&mut self, contract: &MessageContract) {
        self.import("java.lang.annotation.ElementType");
        self.import("java.lang.annotation.Retention");
        self.import("java.lang.annotation.RetentionPolicy");
        self.import("java.lang.annotation.Target");

        self.javadoc(&[format!(
            "Messages of bundle {{@code {}}}, default locale {{@code {}}}.",
            contract.bundle, contract.default_locale
        )]);
        self.out.open(format!("public interface {} {{", contract.name));
        self.out.line(format!("String BUNDLE = {};", java_string(&contract.bundle)));
        self.out.blank();
        self.out.line(format!(
            "String DEFAULT_LOCALE = {};",
            java_string(&contract.default_locale)
        ));
        self.out.blank();
        self.out.line("@Retention(RetentionPolicy.RUNTIME)");
        self.out.line("@Target(ElementType.METHOD)");
        self.out.open("@interface Message {");
        self.out.line("String key();");
        self.out.blank();
        self.out.line("String[] args() default {};");
        self.out.close("}");

        let mut methods = NameAllocator::new();
        for method in &contract.methods {
            let name = methods.allocate(&naming::sanitize(naming::camel_case(&method.key), RESERVED, "message"));
            let mut params = NameAllocator::new();
            let mut declared = Vec::new();
            let mut names = Vec::new();
            for argument in &method.arguments {
                let ty = self.argument_type(argument.ty);
                let ident = params.allocate(&argument_ident(&argument.name));
                declared.push(format!("{ty} {ident}"));
                names.push(java_string(&argument.name));
            }

            self.out.blank();
            self.javadoc(&[method.template.clone()]);
            if names.is_empty() {
                self.out.line(format!("@Message(key = {})", java_string(&method.key)));
            } else {
                self.out.line(format!(
                    "@Message(key = {}, args = {{{}}})",
                    java_string(&method.key),
                    names.join(", ")
                ));
            }
            self.out.line(format!("String {name}({});", declared.join(", ")));
        }
        self.out.close("}");
    }

    fn argument_type(&mut self, ty: ArgumentType) -> &'static str {
        match ty {
            ArgumentType::Text => "String",
            ArgumentType::Numeric => "Number",
            ArgumentType::Temporal => {
                self.import("java.util.Date");
                "Date"
            }
            ArgumentType::Untyped | ArgumentType::Generic => "Object",
        }
    }
}

fn argument_ident(name: &str) -> String {
    if name.chars().all(|c| c.is_ascii_digit()) {
        format!("arg{name}")
    } else {
        naming::sanitize(naming::camel_case(name), RESERVED, "arg")
    }
}

fn builder_name(decl: &TypeDecl) -> String {
    let mut names = NameAllocator::new();
    names.reserve(decl.name.clone());
    for nested in &decl.nested {
        names.reserve(nested.name.clone());
    }
    for decl_enum in &decl.enums {
        names.reserve(decl_enum.name.clone());
    }
    names.allocate("Builder")
}

fn field_docs(field: &FieldDecl) -> Vec<String> {
    let mut docs: Vec<String> = field.docs.iter().cloned().collect();
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
        docs.push(format!("Default: {default}"));
    }
    docs
}

fn size_annotation(min: Option<u64>, max: Option<u64>) -> String {
    let mut parts = Vec::new();
    if let Some(min) = min {
        parts.push(format!("min = {min}"));
    }
    if let Some(max) = max {
        parts.push(format!("max = {max}"));
    }
    format!("@Size({})", parts.join(", "))
}

fn decimal_annotation(name: &str, bound: f64, exclusive: bool) -> String {
    if exclusive {
        format!("@{name}(value = \"{}\", inclusive = false)", plain_number(bound))
    } else {
        format!("@{name}(\"{}\")", plain_number(bound))
    }
}
