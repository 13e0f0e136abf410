//! Traits for code generation backends.

use crate::ir::{MessageContract, TypeDecl};
use crate::lower::Declarations;
use crate::options::GenerationOptions;

/// A code generation backend.
///
/// Backends turn declarations into the source text of one file. Output is a
/// pure function of the declarations and options.
///
/// # Implementing Custom Backends
///
/// ```ignore
/// use shapegen_typegen::{Backend, BackendRegistry, GenerationOptions};
/// use shapegen_typegen::ir::{MessageContract, TypeDecl};
///
/// struct KotlinBackend;
///
/// impl Backend for KotlinBackend {
///     fn name(&self) -> &'static str { "kotlin" }
///     fn language(&self) -> &'static str { "kotlin" }
///     fn extension(&self) -> &'static str { "kt" }
///     fn generate_type(&self, decl: &TypeDecl, options: &GenerationOptions) -> String { /* ... */ }
///     fn generate_messages(&self, contract: &MessageContract, options: &GenerationOptions) -> String { /* ... */ }
/// }
///
/// let mut registry = BackendRegistry::builtin();
/// registry.register(KotlinBackend);
/// ```
pub trait Backend: Send + Sync {
    /// Unique backend identifier (e.g., "java", "rust").
    fn name(&self) -> &'static str;

    /// Target language.
    fn language(&self) -> &'static str;

    /// File extension for generated code, without the dot.
    fn extension(&self) -> &'static str;

    /// Source for a type declaration tree.
    fn generate_type(&self, decl: &TypeDecl, options: &GenerationOptions) -> String;

    /// Source for a message accessor contract.
    fn generate_messages(&self, contract: &MessageContract, options: &GenerationOptions) -> String;

    fn generate(&self, declarations: &Declarations, options: &GenerationOptions) -> String {
        match declarations {
            Declarations::Type(decl) => self.generate_type(decl, options),
            Declarations::Messages(contract) => self.generate_messages(contract, options),
        }
    }
}
