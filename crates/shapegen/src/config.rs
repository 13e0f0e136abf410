//! Configuration system for shapegen.
//!
//! Loads config from:
//! 1. Global: ~/.config/shapegen/config.toml
//! 2. Per-project: shapegen.toml (overrides global)
//!
//! Command-line flags override both.
//!
//! Example shapegen.toml:
//! ```toml
//! [generation]
//! validation = false
//! package = "com.example.config"
//!
//! [output]
//! backend = "java"
//! dir = "generated"
//!
//! [[unit]]
//! input = "config/app.properties"
//! type = "AppConfig"
//!
//! [[unit]]
//! input = "api/petstore.openapi.yaml"
//! type = "Pet"
//! schema = "Pet"
//!
//! [unit.generation]
//! enum_types = true
//! ```

use crate::generate::{DEFAULT_BACKEND, Unit, media_type_for_format};
use serde::Deserialize;
use shapegen_core::Merge;
use shapegen_typegen::{EmissionMode, GenerationOptions, ParseOptions};
use std::path::{Path, PathBuf};

/// File name of the per-project configuration.
pub const PROJECT_CONFIG: &str = "shapegen.toml";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("unit `{input}`: unknown format `{format}`")]
    UnknownFormat { input: String, format: String },
}

/// Generation and parse settings. Unset fields fall through to the layer
/// below and finally to the built-in defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    pub mode: Option<EmissionMode>,
    pub structural_methods: Option<bool>,
    pub validation: Option<bool>,
    pub serialization: Option<bool>,
    pub enum_types: Option<bool>,
    pub package: Option<String>,
    pub default_locale: Option<String>,
    pub bundle_name: Option<String>,
    pub auto_convert: Option<bool>,
    pub list_delimiter: Option<char>,
}

impl Merge for GenerationConfig {
    fn merge(self, other: Self) -> Self {
        Self {
            mode: self.mode.merge(other.mode),
            structural_methods: self.structural_methods.merge(other.structural_methods),
            validation: self.validation.merge(other.validation),
            serialization: self.serialization.merge(other.serialization),
            enum_types: self.enum_types.merge(other.enum_types),
            package: self.package.merge(other.package),
            default_locale: self.default_locale.merge(other.default_locale),
            bundle_name: self.bundle_name.merge(other.bundle_name),
            auto_convert: self.auto_convert.merge(other.auto_convert),
            list_delimiter: self.list_delimiter.merge(other.list_delimiter),
        }
    }
}

impl GenerationConfig {
    /// Options with every set field applied over the defaults.
    pub fn generation_options(&self) -> GenerationOptions {
        let defaults = GenerationOptions::default();
        GenerationOptions {
            mode: self.mode.unwrap_or(defaults.mode),
            structural_methods: self.structural_methods.unwrap_or(defaults.structural_methods),
            validation: self.validation.unwrap_or(defaults.validation),
            serialization: self.serialization.unwrap_or(defaults.serialization),
            enum_types: self.enum_types.unwrap_or(defaults.enum_types),
            package: self.package.clone().or(defaults.package),
            default_locale: self.default_locale.clone().unwrap_or(defaults.default_locale),
            bundle_name: self.bundle_name.clone().or(defaults.bundle_name),
        }
    }

    pub fn parse_options(&self) -> ParseOptions {
        let defaults = ParseOptions::default();
        ParseOptions {
            auto_convert: self.auto_convert.unwrap_or(defaults.auto_convert),
            list_delimiter: self.list_delimiter.or(defaults.list_delimiter),
            schema: defaults.schema,
        }
    }
}

/// Where generated files go.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Backend for units that do not name one.
    pub backend: Option<String>,
    /// Directory for units without an explicit `out`, relative to the
    /// project root.
    pub dir: Option<PathBuf>,
}

impl Merge for OutputConfig {
    fn merge(self, other: Self) -> Self {
        Self {
            backend: self.backend.merge(other.backend),
            dir: self.dir.merge(other.dir),
        }
    }
}

/// One `[[unit]]` entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct UnitConfig {
    pub input: String,
    #[serde(rename = "type")]
    pub type_name: String,
    /// `properties`, `yaml`, `json`, `json-schema`, `openapi`, `messages`
    /// or `auto`.
    pub format: Option<String>,
    pub schema: Option<String>,
    pub backend: Option<String>,
    pub out: Option<PathBuf>,
    /// Per-unit overrides of `[generation]`.
    pub generation: GenerationConfig,
}

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ShapegenConfig {
    pub generation: GenerationConfig,
    pub output: OutputConfig,
    #[serde(rename = "unit")]
    pub units: Vec<UnitConfig>,
}

impl Merge for ShapegenConfig {
    fn merge(self, other: Self) -> Self {
        Self {
            generation: self.generation.merge(other.generation),
            output: self.output.merge(other.output),
            units: self.units.merge(other.units),
        }
    }
}

/// A configured unit with its output destination.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedUnit {
    pub unit: Unit,
    /// Explicit output file; otherwise the generated file name inside
    /// `dir`.
    pub out: Option<PathBuf>,
    pub dir: PathBuf,
}

impl PlannedUnit {
    pub fn destination(&self, file_name: &str) -> PathBuf {
        self.out.clone().unwrap_or_else(|| self.dir.join(file_name))
    }
}

impl ShapegenConfig {
    /// Load configuration for a project.
    ///
    /// Loads global config from ~/.config/shapegen/config.toml, then merges
    /// the project's shapegen.toml over it. Missing files are skipped.
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_file(&global_path)? {
                config = config.merge(global);
            }
        }

        if let Some(project) = Self::load_file(&root.join(PROJECT_CONFIG))? {
            config = config.merge(project);
        }

        Ok(config)
    }

    /// Load global config, then `path` over it.
    pub fn load_explicit(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::load_file(&global_path)? {
                config = config.merge(global);
            }
        }
        match Self::load_file(path)? {
            Some(explicit) => Ok(config.merge(explicit)),
            None => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "file not found"),
            }),
        }
    }

    /// Get the global config path.
    pub fn global_config_path() -> Option<PathBuf> {
        let config_home = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .ok()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))?;
        Some(config_home.join("shapegen").join("config.toml"))
    }

    /// Load config from a file path. `Ok(None)` when the file does not exist.
    pub fn load_file(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(Some(config))
    }

    /// Backend for units that do not name one.
    pub fn default_backend(&self) -> &str {
        self.output.backend.as_deref().unwrap_or(DEFAULT_BACKEND)
    }

    /// Resolve every `[[unit]]` against the shared sections. Output paths
    /// are relative to `root`.
    pub fn plan(&self, root: &Path) -> Result<Vec<PlannedUnit>, ConfigError> {
        let dir = root.join(self.output.dir.clone().unwrap_or_default());
        self.units
            .iter()
            .map(|entry| {
                let layered = self.generation.clone().merge(entry.generation.clone());
                let mut unit = Unit::new(entry.input.clone(), entry.type_name.clone());
                unit.media_type = match entry.format.as_deref() {
                    None | Some("auto") => None,
                    Some(format) => Some(
                        media_type_for_format(format)
                            .ok_or_else(|| ConfigError::UnknownFormat {
                                input: entry.input.clone(),
                                format: format.to_string(),
                            })?
                            .to_string(),
                    ),
                };
                unit.backend = entry
                    .backend
                    .clone()
                    .unwrap_or_else(|| self.default_backend().to_string());
                unit.parse = layered.parse_options();
                unit.parse.schema = entry.schema.clone();
                unit.generation = layered.generation_options();
                Ok(PlannedUnit {
                    unit,
                    out: entry.out.as_ref().map(|out| root.join(out)),
                    dir: dir.clone(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = ShapegenConfig::default();
        assert_eq!(config.default_backend(), "rust");
        assert_eq!(config.generation.generation_options(), GenerationOptions::default());
        assert!(config.units.is_empty());
    }

    #[test]
    fn test_load_project_config() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(PROJECT_CONFIG),
            r#"
[generation]
validation = false
mode = "shape"

[output]
backend = "java"
dir = "gen"

[[unit]]
input = "app.properties"
type = "AppConfig"

[[unit]]
input = "petstore.yaml"
type = "Pet"
format = "openapi"
schema = "Pet"
out = "src/Pet.java"

[unit.generation]
enum_types = true
validation = true
"#,
        )
        .unwrap();

        let config = ShapegenConfig::load_file(&dir.path().join(PROJECT_CONFIG))
            .unwrap()
            .unwrap();
        let plan = config.plan(dir.path()).unwrap();
        assert_eq!(plan.len(), 2);

        let app = &plan[0];
        assert_eq!(app.unit.backend, "java");
        assert_eq!(app.unit.generation.mode, EmissionMode::Shape);
        assert!(!app.unit.generation.validation);
        assert!(!app.unit.generation.enum_types);
        assert_eq!(app.destination("AppConfig.java"), dir.path().join("gen/AppConfig.java"));

        let pet = &plan[1];
        assert_eq!(pet.unit.media_type.as_deref(), Some("application/vnd.oai.openapi"));
        assert_eq!(pet.unit.parse.schema.as_deref(), Some("Pet"));
        assert!(pet.unit.generation.validation);
        assert!(pet.unit.generation.enum_types);
        assert_eq!(pet.destination("Pet.java"), dir.path().join("src/Pet.java"));
    }

    #[test]
    fn test_layers_merge_field_by_field() {
        let global: ShapegenConfig = toml::from_str(
            r#"
[generation]
package = "com.example"
serialization = false

[output]
backend = "java"
"#,
        )
        .unwrap();
        let project: ShapegenConfig = toml::from_str(
            r#"
[generation]
serialization = true
"#,
        )
        .unwrap();

        let merged = global.merge(project);
        assert_eq!(merged.generation.package.as_deref(), Some("com.example"));
        assert_eq!(merged.generation.serialization, Some(true));
        assert_eq!(merged.default_backend(), "java");
    }

    #[test]
    fn test_missing_file_is_not_an_error() {
        let dir = TempDir::new().unwrap();
        assert!(ShapegenConfig::load_file(&dir.path().join("nope.toml")).unwrap().is_none());
        assert!(ShapegenConfig::load_explicit(&dir.path().join("nope.toml")).is_err());
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(PROJECT_CONFIG);
        std::fs::write(&path, "[generation\n").unwrap();
        let err = ShapegenConfig::load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("shapegen.toml"));
    }

    #[test]
    fn test_unknown_format() {
        let config: ShapegenConfig = toml::from_str(
            r#"
[[unit]]
input = "a.txt"
type = "A"
format = "ini"
"#,
        )
        .unwrap();
        assert!(matches!(
            config.plan(Path::new(".")),
            Err(ConfigError::UnknownFormat { .. })
        ));
    }
}
