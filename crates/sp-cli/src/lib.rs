//! # sp-cli
//!
//! Library half of the `sp-validate` binary, kept separate so subcommands
//! can be driven from tests.
//!
//! ## Subcommands
//!
//! - `sp-validate check`: validate a values file against a schema file
//! - `sp-validate seed`: print the value tree a fresh form starts from
//!
//! ```bash
//! sp-validate check --schema http.yaml --values node.json --name fetch-status
//! sp-validate seed --schema http.yaml
//! ```

#![warn(missing_docs)]

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use sp_schema::{load_schema, load_values, seed_values, ValueMap};
use sp_validate::{ConfigurationValidator, ValidatorConfig};

/// Arguments for `sp-validate check`
#[derive(Args, Debug, Clone)]
pub struct CheckArgs {
    /// Schema file (JSON or YAML)
    #[arg(long)]
    pub schema: PathBuf,

    /// Values file (JSON or YAML)
    #[arg(long)]
    pub values: PathBuf,

    /// Node name; when given it must be non-blank
    #[arg(long)]
    pub name: Option<String>,

    /// Validator configuration (TOML)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print errors as a JSON array
    #[arg(long)]
    pub json: bool,
}

/// Arguments for `sp-validate seed`
#[derive(Args, Debug, Clone)]
pub struct SeedArgs {
    /// Schema file (JSON or YAML)
    #[arg(long)]
    pub schema: PathBuf,

    /// Existing values to merge over the defaults
    #[arg(long)]
    pub values: Option<PathBuf>,
}

/// Load validator configuration, falling back to defaults
///
/// # Errors
///
/// Fails if the file cannot be read or is not valid TOML.
pub fn load_config(path: Option<&PathBuf>) -> anyhow::Result<ValidatorConfig> {
    let Some(path) = path else {
        return Ok(ValidatorConfig::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    ValidatorConfig::from_toml(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Run `check`, writing findings to `out`
///
/// Returns the process exit code: 0 when valid, 1 otherwise.
///
/// # Errors
///
/// Fails on unreadable or malformed input files.
pub fn run_check(args: &CheckArgs, out: &mut impl Write) -> anyhow::Result<u8> {
    let config = load_config(args.config.as_ref())?;
    let schema = load_schema(&args.schema)
        .with_context(|| format!("loading schema {}", args.schema.display()))?;
    let values = load_values(&args.values)
        .with_context(|| format!("loading values {}", args.values.display()))?;

    tracing::debug!(fields = schema.len(), "schema loaded");

    let validator = ConfigurationValidator::with_config(config);
    let errors = match &args.name {
        Some(name) => validator.validate_named(Some(name.as_str()), &schema, &values),
        None => validator.validate(&schema, &values),
    };

    if args.json {
        serde_json::to_writer_pretty(&mut *out, &errors)?;
        writeln!(out)?;
    } else if errors.is_empty() {
        writeln!(out, "ok")?;
    } else {
        for error in &errors {
            writeln!(out, "{error}")?;
        }
    }

    tracing::info!(errors = errors.len(), "check finished");
    Ok(u8::from(!errors.is_empty()))
}

/// Run `seed`, writing the seeded value tree to `out` as JSON
///
/// # Errors
///
/// Fails on unreadable or malformed input files.
pub fn run_seed(args: &SeedArgs, out: &mut impl Write) -> anyhow::Result<u8> {
    let schema = load_schema(&args.schema)
        .with_context(|| format!("loading schema {}", args.schema.display()))?;
    let existing = match &args.values {
        Some(path) => {
            load_values(path).with_context(|| format!("loading values {}", path.display()))?
        },
        None => ValueMap::new(),
    };

    let seeded = seed_values(&schema, &existing);
    serde_json::to_writer_pretty(&mut *out, &seeded)?;
    writeln!(out)?;
    Ok(0)
}
