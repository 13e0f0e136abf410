//! Message templates: argument analysis at generation time, locale-bound
//! accessors at use time.
//!
//! # Generation time
//!
//! [`analyze`] parses a template and returns one [`Argument`] per placeholder
//! name, with a type class inferred from the formatting keyword and unified
//! across repeated occurrences:
//!
//! ```
//! use shapegen_messages::{ArgumentType, analyze};
//!
//! let args = analyze("You have {count, plural, one{1 item} other{{count} items}}").unwrap();
//! assert_eq!(args.len(), 1);
//! assert_eq!(args[0].ty, ArgumentType::Numeric);
//! ```
//!
//! # Use time
//!
//! Generated contracts implement [`MessageContract`]; [`MessageBundles`] binds
//! them to a [`Locale`] and caches the result.

pub mod analyze;
pub mod bundle;
pub mod format;
pub mod runtime;
pub mod template;

pub use analyze::{Argument, ArgumentType, analyze};
pub use bundle::{BundleError, BundleSource, DirectorySource, Locale, ResourceBundle, StaticSource};
pub use format::{IcuFormatter, MessageArg, MessageFormatter, NamedArgs};
pub use runtime::{BoundMessages, MessageBundles, MessageContract, MessageMethod};
pub use template::{Template, TemplateError};
