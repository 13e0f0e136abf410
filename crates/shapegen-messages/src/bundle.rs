//! Locale-specific resource bundles.

use shapegen_core::properties::{LexError, read_entries};
use std::collections::HashMap;
use std::fmt;
use std::io;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// A language with an optional region, e.g. `en` or `en_US`.
///
/// The empty language is the root locale, whose bundle is the base file
/// without a suffix.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Locale {
    language: String,
    region: Option<String>,
}

impl Locale {
    pub fn new(language: &str, region: Option<&str>) -> Self {
        Self {
            language: language.to_ascii_lowercase(),
            region: region
                .filter(|r| !r.is_empty())
                .map(|r| r.to_ascii_uppercase()),
        }
    }

    pub fn root() -> Self {
        Self::default()
    }

    /// Parse `en`, `en_US`, `en-US` or `en-us`. Extra subtags are ignored.
    pub fn parse(tag: &str) -> Self {
        let mut parts = tag.trim().split(['_', '-']);
        let language = parts.next().unwrap_or("");
        let region = parts.next();
        Self::new(language, region)
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn region(&self) -> Option<&str> {
        self.region.as_deref()
    }

    /// Underscore form used in bundle file names (`en_US`), empty for root.
    pub fn tag(&self) -> String {
        match &self.region {
            Some(region) if !self.language.is_empty() => format!("{}_{}", self.language, region),
            _ => self.language.clone(),
        }
    }

    /// Lookup chain from most to least specific, ending with the root.
    pub fn candidates(&self) -> Vec<Locale> {
        let mut chain = Vec::new();
        if self.region.is_some() && !self.language.is_empty() {
            chain.push(self.clone());
        }
        if !self.language.is_empty() {
            chain.push(Self::new(&self.language, None));
        }
        chain.push(Self::root());
        chain
    }
}

impl FromStr for Locale {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.language.is_empty() {
            f.write_str("root")
        } else {
            f.write_str(&self.tag())
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum BundleError {
    #[error("no bundle `{base_name}` for locale {locale}")]
    NotFound { base_name: String, locale: Locale },

    #[error("cannot read bundle `{name}`: {source}")]
    Read {
        name: String,
        #[source]
        source: Arc<io::Error>,
    },

    #[error("bundle `{name}` is malformed: {source}")]
    Malformed {
        name: String,
        #[source]
        source: LexError,
    },
}

/// Supplies the raw text of one bundle file.
///
/// `locale_tag` is empty for the root bundle. `Ok(None)` means the file does
/// not exist; any other failure is an error.
pub trait BundleSource: Send + Sync {
    fn load(&self, base_name: &str, locale_tag: &str) -> io::Result<Option<String>>;
}

/// Bundle file name: `messages.properties`, `messages_en_US.properties`.
pub fn bundle_file_name(base_name: &str, locale_tag: &str) -> String {
    if locale_tag.is_empty() {
        format!("{base_name}.properties")
    } else {
        format!("{base_name}_{locale_tag}.properties")
    }
}

/// Reads bundle files from a directory.
#[derive(Debug, Clone)]
pub struct DirectorySource {
    root: PathBuf,
}

impl DirectorySource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl BundleSource for DirectorySource {
    fn load(&self, base_name: &str, locale_tag: &str) -> io::Result<Option<String>> {
        let path = self.root.join(bundle_file_name(base_name, locale_tag));
        match std::fs::read_to_string(path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }
}

/// In-memory bundle files keyed by file name.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    files: HashMap<String, String>,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the bundle text for `base_name` in `locale_tag` (empty for root).
    pub fn with(mut self, base_name: &str, locale_tag: &str, text: impl Into<String>) -> Self {
        self.files
            .insert(bundle_file_name(base_name, locale_tag), text.into());
        self
    }
}

impl BundleSource for StaticSource {
    fn load(&self, base_name: &str, locale_tag: &str) -> io::Result<Option<String>> {
        Ok(self
            .files
            .get(&bundle_file_name(base_name, locale_tag))
            .cloned())
    }
}

/// Messages of one base name resolved for one locale.
///
/// Keys missing from the most specific file fall back along the locale's
/// candidate chain down to the root file.
#[derive(Debug, Clone)]
pub struct ResourceBundle {
    locale: Locale,
    messages: HashMap<String, String>,
}

impl ResourceBundle {
    pub fn load(
        source: &dyn BundleSource,
        base_name: &str,
        locale: &Locale,
    ) -> Result<Self, BundleError> {
        let mut messages = HashMap::new();
        let mut found = false;

        // Least specific first so more specific files override.
        for candidate in locale.candidates().iter().rev() {
            let tag = candidate.tag();
            let loaded = source
                .load(base_name, &tag)
                .map_err(|e| BundleError::Read {
                    name: bundle_file_name(base_name, &tag),
                    source: Arc::new(e),
                })?;
            let Some(text) = loaded else {
                continue;
            };
            found = true;
            let entries = read_entries(&text).map_err(|source| BundleError::Malformed {
                name: bundle_file_name(base_name, &tag),
                source,
            })?;
            for entry in entries {
                messages.insert(entry.key, entry.value);
            }
        }

        if !found {
            return Err(BundleError::NotFound {
                base_name: base_name.to_string(),
                locale: locale.clone(),
            });
        }
        tracing::debug!(base_name, %locale, messages = messages.len(), "loaded resource bundle");
        Ok(Self {
            locale: locale.clone(),
            messages,
        })
    }

    pub fn locale(&self) -> &Locale {
        &self.locale
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.messages.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
