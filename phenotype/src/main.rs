//! Phenotype CLI - move BIDS phenotype tables around the tree
//!
//! ```bash
//! phenotype convert   -i sheets/ -o bids/phenotype/          # CSV/Excel → TSV
//! phenotype segregate -i bids/ -o bids/ subject|session      # top → per subject/session
//! phenotype aggregate -i bids/ -o bids/ subject|session      # per subject/session → top
//! ```
//!
//! Diagnostics go to stdout (`PHENOTYPE_LOG=info|warning|error|quiet`);
//! progress and the summary go to stderr.

use clap::{Parser, Subcommand};
use phenotype::config::{parse_input_dir, parse_output_dir};
use phenotype::{aggregate, convert, segregate, Diagnostics, Level, Settings};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "phenotype")]
#[command(about = "BIDS phenotype data utility", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Write a JSON report of what was done
    #[arg(long, global = true)]
    report: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert CSV or Excel files to BIDS TSV files
    Convert {
        /// Input directory of CSVs and/or Excel files
        #[arg(short, long = "input-dir", value_name = "INDIR", value_parser = parse_input_dir)]
        input: PathBuf,

        /// Output directory for converted files (may be the input directory)
        #[arg(short, long = "output-dir", value_name = "OUTDIR", value_parser = parse_output_dir)]
        output: PathBuf,
    },

    /// Segregate phenotype files from the top of the tree
    Segregate {
        /// BIDS root directory containing the phenotype folder
        #[arg(short, long = "input-dir", value_name = "INDIR", value_parser = parse_input_dir)]
        input: PathBuf,

        /// Output directory for segregated files (may be the input directory)
        #[arg(short, long = "output-dir", value_name = "OUTDIR", value_parser = parse_output_dir)]
        output: PathBuf,

        /// Segregate to either the subject or session level
        #[arg(value_enum)]
        level: Level,
    },

    /// Aggregate phenotype files to the top of the tree
    Aggregate {
        /// BIDS root directory containing the subject/session phenotype folders
        #[arg(short, long = "input-dir", value_name = "INDIR", value_parser = parse_input_dir)]
        input: PathBuf,

        /// Output directory for aggregated files (may be the input directory)
        #[arg(short, long = "output-dir", value_name = "OUTDIR", value_parser = parse_output_dir)]
        output: PathBuf,

        /// Aggregate from either the subject or session level
        #[arg(value_enum)]
        level: Level,
    },
}

fn main() {
    // Load .env file (if present)
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;
    let mut diag = Diagnostics::new(settings.verbosity);
    let report = cli.report.as_deref();

    match cli.command {
        Commands::Convert { input, output } => {
            eprintln!("📄 Converting: {} → {}", input.display(), output.display());
            let result = convert(&input, &output, &mut diag)?;
            eprintln!(
                "✅ Converted {} files, skipped {}",
                result.converted.len(),
                result.skipped.len()
            );
            write_report(&result, report)
        }

        Commands::Segregate { input, output, level } => {
            eprintln!("📦 Segregating to {} level: {} → {}", level, input.display(), output.display());
            let result = segregate(&input, &output, level, &mut diag)?;
            eprintln!(
                "✅ Wrote {} files, skipped {}",
                result.written.len(),
                result.skipped.len()
            );
            write_report(&result, report)
        }

        Commands::Aggregate { input, output, level } => {
            eprintln!("📦 Aggregating from {} level: {} → {}", level, input.display(), output.display());
            let result = aggregate(&input, &output, level, &mut diag)?;
            eprintln!("✅ Wrote {} aggregate files", result.merged.len());
            write_report(&result, report)
        }
    }
}

fn write_report<T: Serialize>(
    value: &T,
    path: Option<&Path>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(p) = path {
        let json = serde_json::to_string_pretty(value)?;
        fs::write(p, json)?;
        eprintln!("💾 Report written to: {}", p.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_segregate() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let cli = Cli::try_parse_from(["phenotype", "segregate", "-i", dir, "--output-dir", dir, "session"])
            .unwrap();
        match cli.command {
            Commands::Segregate { level, input, .. } => {
                assert_eq!(level, Level::Session);
                assert!(input.is_absolute());
            }
            _ => panic!("expected segregate"),
        }
    }

    #[test]
    fn test_rejects_missing_input_and_bad_level() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().to_str().unwrap();
        let missing = tmp.path().join("missing");
        let missing = missing.to_str().unwrap();

        assert!(Cli::try_parse_from(["phenotype", "convert", "-i", missing, "-o", dir]).is_err());
        assert!(Cli::try_parse_from(["phenotype", "aggregate", "-i", dir, "-o", dir, "site"]).is_err());
    }
}
