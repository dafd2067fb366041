use anyhow::{Context, Result};
use clap::Parser;
use lca_bundler::schema::{bundle_schema, schema_violations};
use serde_json::Value;
use std::{fs, path::PathBuf};

/// Validate a single-score bundle against the bundle v1 schema.
#[derive(Parser, Debug)]
#[command(name = "validate-bundle", version, about = "Validate bundle JSON against schema")]
struct Cli {
    /// Path to the bundle JSON file to validate
    path: PathBuf,

    /// Optional path to a schema file (defaults to the built-in bundle schema)
    #[arg(long)]
    schema: Option<PathBuf>,
}

fn load_json(path: &PathBuf) -> Result<Value> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let json: Value = serde_json::from_str(&data)
        .with_context(|| format!("Failed to parse JSON in {}", path.display()))?;
    Ok(json)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    let schema = match &args.schema {
        Some(path) => load_json(path)?,
        None => bundle_schema()?,
    };
    let instance = load_json(&args.path)?;

    let violations = schema_violations(&schema, &instance)?;
    if violations.is_empty() {
        println!("valid");
        return Ok(());
    }

    eprintln!("invalid:");
    for violation in violations {
        eprintln!("- {}", violation);
    }
    std::process::exit(1)
}
