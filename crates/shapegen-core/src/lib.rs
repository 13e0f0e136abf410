//! Core traits and types shared across the shapegen crates.
//!
//! - [`Merge`] layers configuration values (global file, project file, CLI).
//! - [`properties`] reads flat `key=value` files into ordered entries. Both the
//!   generator (config-style sources, message bundles) and the message runtime
//!   (resource bundles) sit on top of it.

pub mod merge;
pub mod properties;

pub use merge::Merge;
pub use properties::{Entry, LexError, read_entries};
