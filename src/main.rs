use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use listings_cleaner::config::CleanerConfig;
use listings_cleaner::error::CleanerError;
use listings_cleaner::types::ListingTable;
use listings_cleaner::{logging, pipeline, storage};

#[derive(Parser)]
#[command(name = "listings-cleaner")]
#[command(about = "Consolidates and cleans scraped job listing CSVs")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Merge raw CSVs and run the full cleaning pipeline
    Clean {
        /// Directory of raw scraped CSV files
        #[arg(long)]
        input_dir: Option<PathBuf>,
        /// A single pre-merged CSV file, instead of --input-dir
        #[arg(long)]
        input_file: Option<PathBuf>,
        /// Path of the cleaned master CSV
        #[arg(long)]
        output: Option<PathBuf>,
        /// TOML file overriding keyword/country lists and paths
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Merge and tag raw CSVs without cleaning them
    Merge {
        /// Directory of raw scraped CSV files
        #[arg(long)]
        input_dir: Option<PathBuf>,
        /// A single pre-merged CSV file, instead of --input-dir
        #[arg(long)]
        input_file: Option<PathBuf>,
        /// Path of the merged CSV
        #[arg(long)]
        output: Option<PathBuf>,
        /// TOML file overriding keyword/country lists and paths
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables
    dotenv::dotenv().ok();

    // Initialize logging
    logging::init_logging();

    match cli.command {
        Commands::Clean {
            input_dir,
            input_file,
            output,
            config,
        } => {
            let config = resolve_config(config, input_dir, input_file, output)?;
            println!(
                "🧹 Cleaning job listings into '{}'",
                config.output_path.display()
            );

            let table = load_input(&config)?;
            let source_headers = table.headers.clone();
            let (cleaned, report) = pipeline::clean_listings(table, &config)?;

            storage::write_cleaned(&config.output_path, &source_headers, &cleaned)
                .with_context(|| {
                    format!(
                        "Could not save the cleaned data to '{}'",
                        config.output_path.display()
                    )
                })?;

            info!(
                "run report: {}",
                serde_json::to_string(&report).unwrap_or_default()
            );
            println!(
                "✅ Saved {} cleaned listings to '{}'",
                report.final_rows,
                config.output_path.display()
            );
        }
        Commands::Merge {
            input_dir,
            input_file,
            output,
            config,
        } => {
            let config = resolve_config(config, input_dir, input_file, output)?;
            println!(
                "🗂️  Merging job listings into '{}'",
                config.output_path.display()
            );

            let table = load_input(&config)?;
            storage::write_merged(&config.output_path, &table).with_context(|| {
                format!(
                    "Could not save the merged data to '{}'",
                    config.output_path.display()
                )
            })?;

            println!(
                "✅ Saved {} merged rows to '{}'",
                table.len(),
                config.output_path.display()
            );
        }
    }

    Ok(())
}

/// Builds the run configuration: TOML file if given, defaults otherwise,
/// with CLI flags overriding either.
fn resolve_config(
    config_path: Option<PathBuf>,
    input_dir: Option<PathBuf>,
    input_file: Option<PathBuf>,
    output: Option<PathBuf>,
) -> anyhow::Result<CleanerConfig> {
    let mut config = match config_path {
        Some(path) => CleanerConfig::load(&path)?,
        None => CleanerConfig::default(),
    };
    if input_dir.is_some() {
        config.input_dir = input_dir;
    }
    if input_file.is_some() {
        config.input_file = input_file;
    }
    if let Some(output) = output {
        config.output_path = output;
    }
    Ok(config)
}

fn load_input(config: &CleanerConfig) -> anyhow::Result<ListingTable> {
    if let Some(file) = &config.input_file {
        Ok(storage::load_file(file)?)
    } else if let Some(dir) = &config.input_dir {
        Ok(storage::load_directory(dir)?)
    } else {
        Err(CleanerError::Config(
            "no input given; set --input-dir or --input-file".to_string(),
        )
        .into())
    }
}
