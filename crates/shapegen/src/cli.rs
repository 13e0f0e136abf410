//! Command-line interface.
//!
//! Commands:
//! - `shapegen generate` - Generate one type from one input
//! - `shapegen run` - Generate every `[[unit]]` of the configuration
//! - `shapegen analyze` - Show the arguments of a message template
//! - `shapegen backends` - List code generation backends

use crate::config::{GenerationConfig, PlannedUnit, ShapegenConfig};
use crate::generate::{Unit, generate_unit, media_type_for_format};
use crate::loader::FileLoader;
use anyhow::{Context, bail};
use clap::{ArgAction, Args, Parser, Subcommand};
use rayon::prelude::*;
use shapegen_core::Merge;
use shapegen_typegen::{BackendRegistry, EmissionMode, ParserRegistry};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "shapegen")]
#[command(author, version, about = "Generate typed accessors from configuration files, schemas and message bundles", long_about = None)]
pub struct Cli {
    /// Configuration file (default: ./shapegen.toml over the global config)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More diagnostics (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only report errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate one type from one input
    Generate(GenerateArgs),

    /// Generate every [[unit]] of the configuration file, in parallel
    Run,

    /// Print the unified arguments of a message template
    Analyze {
        /// Template text, e.g. "{count, plural, one{# item} other{# items}}"
        template: String,
    },

    /// List code generation backends
    Backends,
}

#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Input file
    pub input: String,

    /// Name of the generated type
    #[arg(short = 't', long = "type")]
    pub type_name: String,

    /// Backend (java, rust); default from [output] backend
    #[arg(short, long)]
    pub backend: Option<String>,

    /// Input format: auto, properties, yaml, json, json-schema, openapi, messages
    #[arg(short, long, default_value = "auto")]
    pub format: String,

    /// Schema to select from an OpenAPI document
    #[arg(long)]
    pub schema: Option<String>,

    /// Emission mode for configuration values: embed or shape
    #[arg(long)]
    pub mode: Option<EmissionMode>,

    /// Output file (stdout if omitted)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Java package / Rust module doc
    #[arg(long)]
    pub package: Option<String>,

    /// Keep every flat-file value as a string
    #[arg(long)]
    pub no_auto_convert: bool,

    /// Split flat-file values on this character
    #[arg(long)]
    pub list_delimiter: Option<char>,

    /// Generate enumeration types for string enums
    #[arg(long)]
    pub enum_types: bool,

    /// Skip equality, hash and string methods
    #[arg(long)]
    pub no_structural_methods: bool,

    /// Skip validation annotations
    #[arg(long)]
    pub no_validation: bool,

    /// Skip serialization annotations
    #[arg(long)]
    pub no_serialization: bool,
}

impl GenerateArgs {
    /// The flags as the topmost configuration layer.
    pub fn overrides(&self) -> GenerationConfig {
        let off = |flag: bool| flag.then_some(false);
        GenerationConfig {
            mode: self.mode,
            structural_methods: off(self.no_structural_methods),
            validation: off(self.no_validation),
            serialization: off(self.no_serialization),
            enum_types: self.enum_types.then_some(true),
            package: self.package.clone(),
            default_locale: None,
            bundle_name: None,
            auto_convert: off(self.no_auto_convert),
            list_delimiter: self.list_delimiter,
        }
    }

    pub fn unit(&self, config: &ShapegenConfig) -> anyhow::Result<Unit> {
        let layered = config.generation.clone().merge(self.overrides());
        let mut unit = Unit::new(self.input.clone(), self.type_name.clone());
        unit.media_type = match self.format.as_str() {
            "auto" => None,
            format => match media_type_for_format(format) {
                Some(media_type) => Some(media_type.to_string()),
                None => bail!("unknown format `{format}`"),
            },
        };
        unit.backend = self
            .backend
            .clone()
            .unwrap_or_else(|| config.default_backend().to_string());
        unit.parse = layered.parse_options();
        unit.parse.schema = self.schema.clone();
        unit.generation = layered.generation_options();
        Ok(unit)
    }
}

/// Run a parsed command line. Returns the process exit status.
pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let root = std::env::current_dir().context("cannot determine the working directory")?;
    let config = match &cli.config {
        Some(path) => ShapegenConfig::load_explicit(path)?,
        None => ShapegenConfig::load(&root)?,
    };
    let parsers = ParserRegistry::builtin();
    let backends = BackendRegistry::builtin();

    match cli.command {
        Command::Generate(args) => {
            let unit = args.unit(&config)?;
            let loader = FileLoader::new(&root);
            let generated = generate_unit(&unit, &loader, &parsers, &backends)?;
            match &args.out {
                Some(out) => {
                    write_output(out, &generated.source)?;
                    tracing::info!(path = %out.display(), "wrote {}", generated.type_name);
                }
                None => print!("{}", generated.source),
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Run => {
            let base = cli
                .config
                .as_deref()
                .and_then(Path::parent)
                .map(Path::to_path_buf)
                .unwrap_or(root);
            run_units(&config, &base, &parsers, &backends)
        }
        Command::Analyze { template } => {
            let arguments = shapegen_messages::analyze(&template)?;
            for argument in arguments {
                println!("{}: {:?}", argument.name, argument.ty);
            }
            Ok(ExitCode::SUCCESS)
        }
        Command::Backends => {
            for backend in backends.iter() {
                println!("{}\t{}\t.{}", backend.name(), backend.language(), backend.extension());
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Generate all configured units relative to `base`. One failed unit does
/// not stop the others.
pub fn run_units(
    config: &ShapegenConfig,
    base: &Path,
    parsers: &ParserRegistry,
    backends: &BackendRegistry,
) -> anyhow::Result<ExitCode> {
    let plan = config.plan(base)?;
    if plan.is_empty() {
        bail!("no [[unit]] entries configured");
    }
    let loader = FileLoader::new(base);

    let results: Vec<anyhow::Result<PathBuf>> = plan
        .par_iter()
        .map(|planned| run_unit(planned, &loader, parsers, backends))
        .collect();

    let mut failed = 0;
    for result in results {
        match result {
            Ok(path) => tracing::info!(path = %path.display(), "generated"),
            Err(e) => {
                failed += 1;
                eprintln!("error: {e:#}");
            }
        }
    }

    if failed > 0 {
        tracing::warn!(failed, total = plan.len(), "some units failed");
        Ok(ExitCode::FAILURE)
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn run_unit(
    planned: &PlannedUnit,
    loader: &FileLoader,
    parsers: &ParserRegistry,
    backends: &BackendRegistry,
) -> anyhow::Result<PathBuf> {
    let generated = generate_unit(&planned.unit, loader, parsers, backends)?;
    let path = planned.destination(&generated.file_name);
    write_output(&path, &generated.source)?;
    Ok(path)
}

fn write_output(path: &Path, source: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("cannot create {}", parent.display()))?;
    }
    std::fs::write(path, source).with_context(|| format!("cannot write {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn generate_flags_override_config() {
        let cli = parse(&[
            "shapegen",
            "generate",
            "app.properties",
            "--type",
            "AppConfig",
            "--mode",
            "shape",
            "--no-validation",
            "--list-delimiter",
            ",",
            "-vv",
        ]);
        assert_eq!(cli.verbose, 2);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };

        let config: ShapegenConfig = toml::from_str(
            r#"
[generation]
validation = true
serialization = false

[output]
backend = "java"
"#,
        )
        .unwrap();
        let unit = args.unit(&config).unwrap();
        assert_eq!(unit.backend, "java");
        assert_eq!(unit.generation.mode, EmissionMode::Shape);
        assert!(!unit.generation.validation);
        assert!(!unit.generation.serialization);
        assert_eq!(unit.parse.list_delimiter, Some(','));
        assert_eq!(unit.media_type, None);
    }

    #[test]
    fn unknown_format_is_rejected() {
        let cli = parse(&["shapegen", "generate", "a.txt", "-t", "A", "--format", "ini"]);
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert!(args.unit(&ShapegenConfig::default()).is_err());
    }

    #[test]
    fn run_units_writes_successes_and_reports_failures() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("app.properties"), "app.port=8080\n").unwrap();
        let config: ShapegenConfig = toml::from_str(
            r#"
[output]
dir = "gen"

[[unit]]
input = "app.properties"
type = "AppConfig"
backend = "java"

[[unit]]
input = "missing.yaml"
type = "Missing"
"#,
        )
        .unwrap();

        let code = run_units(
            &config,
            dir.path(),
            &ParserRegistry::builtin(),
            &BackendRegistry::builtin(),
        )
        .unwrap();
        assert_eq!(code, ExitCode::FAILURE);
        let written = std::fs::read_to_string(dir.path().join("gen/AppConfig.java")).unwrap();
        assert!(written.contains("private final int port = 8080;"));
        assert!(!dir.path().join("gen/missing.rs").exists());
    }
}
