//! Resource acquisition.
//!
//! The pipeline never touches the file system directly; it asks a
//! [`ResourceLoader`] for the bytes behind a location string.

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};

/// Source of raw input bytes.
pub trait ResourceLoader: Send + Sync {
    /// Bytes at `location`, or `None` when nothing exists there.
    fn load(&self, location: &str) -> io::Result<Option<Vec<u8>>>;
}

/// Loads files relative to a root directory. Absolute locations are used
/// as they are.
#[derive(Debug, Clone)]
pub struct FileLoader {
    root: PathBuf,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resolve(&self, location: &str) -> PathBuf {
        self.root.join(location)
    }
}

impl ResourceLoader for FileLoader {
    fn load(&self, location: &str) -> io::Result<Option<Vec<u8>>> {
        let path = self.resolve(location);
        match std::fs::read(&path) {
            Ok(bytes) => {
                tracing::trace!(path = %path.display(), bytes = bytes.len(), "loaded resource");
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-memory resources, keyed by location.
#[derive(Debug, Clone, Default)]
pub struct MemoryLoader {
    files: HashMap<String, Vec<u8>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, location: impl Into<String>, content: impl Into<Vec<u8>>) {
        self.files.insert(location.into(), content.into());
    }

    pub fn with(mut self, location: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        self.insert(location, content);
        self
    }
}

impl ResourceLoader for MemoryLoader {
    fn load(&self, location: &str) -> io::Result<Option<Vec<u8>>> {
        Ok(self.files.get(location).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_loader_reads_relative_to_root() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("config")).unwrap();
        std::fs::write(dir.path().join("config/app.properties"), "a=1\n").unwrap();

        let loader = FileLoader::new(dir.path());
        assert_eq!(
            loader.load("config/app.properties").unwrap(),
            Some(b"a=1\n".to_vec())
        );
        assert_eq!(loader.load("config/missing.properties").unwrap(), None);
    }

    #[test]
    fn memory_loader() {
        let loader = MemoryLoader::new().with("app.yaml", "a: 1");
        assert_eq!(loader.load("app.yaml").unwrap(), Some(b"a: 1".to_vec()));
        assert_eq!(loader.load("other.yaml").unwrap(), None);
    }
}
