//! Generate typed accessors from configuration files, schemas and message
//! bundles.
//!
//! This crate ties the pipeline together: a [`loader::ResourceLoader`]
//! supplies bytes, [`generate::generate_unit`] parses, lowers and emits one
//! unit, and [`config`] describes units and shared options in
//! `shapegen.toml`. The same entry point serves the `shapegen` binary and
//! `build.rs` scripts:
//!
//! ```no_run
//! use shapegen::generate::{Unit, generate_unit};
//! use shapegen::loader::FileLoader;
//! use shapegen_typegen::{BackendRegistry, ParserRegistry};
//!
//! let unit = Unit::new("config/app.properties", "AppConfig");
//! let generated = generate_unit(
//!     &unit,
//!     &FileLoader::new("."),
//!     &ParserRegistry::builtin(),
//!     &BackendRegistry::builtin(),
//! )
//! .unwrap();
//! std::fs::write(generated.file_name, generated.source).unwrap();
//! ```

pub mod cli;
pub mod config;
pub mod generate;
pub mod loader;
pub mod logging;

pub use config::ShapegenConfig;
pub use generate::{GenerateError, Generated, Unit, generate_unit};
pub use loader::{FileLoader, MemoryLoader, ResourceLoader};
