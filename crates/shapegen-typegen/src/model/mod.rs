//! In-memory models produced by the parsers.

pub mod schema;
pub mod tree;

pub use schema::{Constraints, PrimitiveType, PropertyDefinition, SchemaDefinition};
pub use tree::{PathInsert, PropertyTree, PropertyValue, Scalar};
