//! Registry for code generation backends.

use crate::traits::Backend;

/// Backends available to a generation run.
///
/// Built explicitly and passed to callers; lookups go through the instance.
/// A backend registered later shadows an earlier one with the same name.
pub struct BackendRegistry {
    backends: Vec<Box<dyn Backend>>,
}

impl BackendRegistry {
    pub fn new() -> Self {
        Self {
            backends: Vec::new(),
        }
    }

    /// Registry with the backends enabled by crate features.
    pub fn builtin() -> Self {
        #[allow(unused_mut)]
        let mut registry = Self::new();

        #[cfg(feature = "backend-java")]
        {
            registry.register(crate::output::java::JavaBackend);
        }

        #[cfg(feature = "backend-rust")]
        {
            registry.register(crate::output::rust::RustBackend);
        }

        registry
    }

    pub fn register(&mut self, backend: impl Backend + 'static) {
        self.backends.push(Box::new(backend));
    }

    /// Get a backend by name.
    pub fn get(&self, name: &str) -> Option<&dyn Backend> {
        self.backends
            .iter()
            .rev()
            .find(|b| b.name() == name)
            .map(|b| b.as_ref())
    }

    /// All backends for a language.
    pub fn for_language(&self, language: &str) -> Vec<&dyn Backend> {
        self.backends
            .iter()
            .filter(|b| b.language() == language)
            .map(|b| b.as_ref())
            .collect()
    }

    /// Registered backend names, without shadowed duplicates.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = Vec::new();
        for backend in &self.backends {
            if !names.contains(&backend.name()) {
                names.push(backend.name());
            }
        }
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn Backend> {
        self.backends.iter().map(|b| b.as_ref())
    }
}

impl Default for BackendRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}
