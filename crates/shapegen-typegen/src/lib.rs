//! Typed source generation from configuration files and schemas.
//!
//! `shapegen-typegen` reads value-bearing formats (`.properties`, YAML, JSON),
//! schema formats (JSON Schema, OpenAPI 3) and message bundles, lowers them
//! into language-neutral declarations and renders those with a backend.
//!
//! # Architecture
//!
//! ```text
//! Input Formats          Models / IR                Output Backends
//! ──────────────     ──────────────────────     ─────────────────
//! .properties   ─┐
//! YAML / JSON   ─┼─> PropertyTree ─┐         ┌─> Java classes / interfaces
//! JSON Schema   ─┤                 ├─> TypeDecl ┤
//! OpenAPI       ─┴─> SchemaDefinition          └─> Rust structs / traits
//! Message bundle ──> MessageEntry ──> MessageContract
//! ```
//!
//! # Example
//!
//! ```
//! use shapegen_typegen::{GenerationOptions, ParseOptions, input, lower};
//!
//! let tree = input::parse_properties(
//!     "app.name=Demo\napp.port=8080\n",
//!     &ParseOptions::default(),
//! )
//! .unwrap();
//!
//! let options = GenerationOptions::default();
//! let decl = lower::lower_tree("AppConfig", &tree, &options);
//! let java = shapegen_typegen::generate_java_type(&decl, &options);
//! assert!(java.contains("public static final class App {"));
//! assert!(java.contains("private final int port = 8080;"));
//! ```
//!
//! # Feature Flags
//!
//! - `backend-java` - Java classes with Jackson and Jakarta validation
//! - `backend-rust` - Rust structs with serde and validator

pub mod error;
pub mod input;
pub mod ir;
pub mod lower;
pub mod model;
pub mod naming;
pub mod options;
pub mod output;
pub mod registry;
pub mod resolve;
pub mod traits;

// Re-export commonly used items
pub use error::ParseError;
pub use input::{
    MessageEntry, ParsedSource, Parser, ParserRegistry, parse_json_schema, parse_openapi,
    parse_properties,
};
pub use lower::{Declarations, lower_source};
pub use options::{EmissionMode, GenerationOptions, ParseOptions};
pub use registry::BackendRegistry;
pub use resolve::TargetType;
pub use traits::Backend;

#[cfg(feature = "backend-java")]
pub use output::{JavaBackend, generate_java_messages, generate_java_type};

#[cfg(feature = "backend-rust")]
pub use output::{RustBackend, generate_rust_messages, generate_rust_type};
