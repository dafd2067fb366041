use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{error, info};

use lca_bundler::app::ports::RecordSourcePort;
use lca_bundler::app::{BundleReport, BundleUseCase};
use lca_bundler::config::Config;
use lca_bundler::infra::{
    CharacterisationSource, JsonFileBundleOutput, JsonRecordFilesOutput, SingleScoreDirSource,
};
use lca_bundler::logging;

#[derive(Parser)]
#[command(name = "lca_bundler")]
#[command(about = "Consolidates single-score LCA results into one display bundle")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration (defaults to $LCA_BUNDLER_CONFIG, then config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Combine singlescore_*.json files into one bundle
    Bundle {
        /// Directory holding the single-score files
        #[arg(long)]
        input: Option<PathBuf>,
        /// Bundle file to write
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Rebuild single scores from characterisation results, then bundle them
    Weight {
        /// Characterisation bundle (JSON array)
        #[arg(long)]
        characterisation: Option<PathBuf>,
        /// Conversion sheet with the Fₖ factor column
        #[arg(long)]
        conversion: Option<PathBuf>,
        /// Bundle file to write
        #[arg(long)]
        output: Option<PathBuf>,
        /// Also write each ungrouped product to DIR/singlescore_<N>.json
        #[arg(long, value_name = "DIR")]
        write_singles: Option<PathBuf>,
    },
    /// Print the effective grouping table
    Groups,
}

async fn run_bundle(
    config: &Config,
    source: Box<dyn RecordSourcePort>,
    output: PathBuf,
    singles_dir: Option<PathBuf>,
) -> anyhow::Result<BundleReport> {
    let mut use_case = BundleUseCase::new(
        source,
        Box::new(JsonFileBundleOutput::new(&output)),
        config.groups.clone(),
    );
    if let Some(dir) = &singles_dir {
        use_case = use_case.with_passthrough_output(Box::new(JsonRecordFilesOutput::new(dir)));
    }
    let report = use_case.run().await?;
    println!(
        "Wrote {} records to {} ({} loaded, merged: [{}], passthrough: {})",
        report.records_written,
        output.display(),
        report.records_loaded,
        report.merged_groups.join(", "),
        report.passthrough
    );
    if let Some(dir) = singles_dir {
        println!("Wrote {} product files to {}", report.singles_written, dir.display());
    }
    Ok(report)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    let _log_guard = logging::init_logging();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    let result = match cli.command {
        Commands::Bundle { input, output } => {
            let input = input.unwrap_or_else(|| config.paths.singlescore_dir.clone());
            let output = output.unwrap_or_else(|| config.paths.output.clone());
            info!(input = %input.display(), "bundling single-score files");
            run_bundle(&config, Box::new(SingleScoreDirSource::new(input)), output, None)
                .await
                .map(|_| ())
        }
        Commands::Weight {
            characterisation,
            conversion,
            output,
            write_singles,
        } => {
            let characterisation =
                characterisation.unwrap_or_else(|| config.paths.characterisation.clone());
            let conversion = conversion.unwrap_or_else(|| config.paths.conversion.clone());
            let output = output.unwrap_or_else(|| config.paths.output.clone());
            info!(
                characterisation = %characterisation.display(),
                conversion = %conversion.display(),
                "rebuilding single scores from characterisation"
            );
            run_bundle(
                &config,
                Box::new(CharacterisationSource::new(characterisation, conversion)),
                output,
                write_singles,
            )
            .await
            .map(|_| ())
        }
        Commands::Groups => {
            for group in config.groups.iter() {
                let ids: Vec<&str> = group.product_ids.iter().map(String::as_str).collect();
                println!("{}: {}", group.label, ids.join(", "));
            }
            Ok(())
        }
    };

    if let Err(e) = &result {
        error!("bundle run failed: {:#}", e);
    }
    result
}
