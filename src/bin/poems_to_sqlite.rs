//! poems-to-sqlite: Build the bundled poem database from poems_bundle.json
//!
//! Usage:
//!   # Convert using the project's default asset paths
//!   poems-to-sqlite
//!
//!   # Run from somewhere else in the tree
//!   poems-to-sqlite --project-root ../poetica
//!
//!   # Explicit paths, keep the last poem when ids repeat
//!   poems-to-sqlite --input poems.json --output poems.db --on-duplicate replace

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anyhow::{Context, Result};
use clap::Parser;
use poetica_bundle::config::DEFAULT_INPUT;
use poetica_bundle::{
    ConversionReport, ConvertConfig, ConvertError, Converter, DefaultPaths, DuplicatePolicy,
    LogFormat, LoggingConfig,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "poems-to-sqlite")]
#[command(about = "Convert the poem bundle JSON into a pre-populated SQLite database", long_about = None)]
struct Args {
    /// Project root the default asset paths are resolved against
    #[arg(long, value_name = "DIR", default_value = ".")]
    project_root: PathBuf,

    /// Input bundle (default: <root>/app/src/main/assets/poems_bundle.json)
    #[arg(long, short = 'i', value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output database (default: <root>/app/src/main/assets/databases/poetica_poems.db)
    #[arg(long, short = 'o', value_name = "FILE")]
    output: Option<PathBuf>,

    /// How to handle poems that share an id
    #[arg(long, value_enum, default_value_t = DuplicatePolicy::Reject)]
    on_duplicate: DuplicatePolicy,

    /// Log progress every N poems (0 disables)
    #[arg(long, default_value_t = 1000)]
    progress_interval: usize,

    /// Print the report as JSON instead of text
    #[arg(long)]
    json: bool,

    /// Log level filter (e.g. "info", "debug", "poetica_bundle=trace")
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let args = Args::parse();

    LoggingConfig {
        level: args.log_level.clone(),
        format: args.log_format,
    }
    .init();

    let defaults = DefaultPaths::under(&args.project_root);
    let input = args.input.clone().unwrap_or(defaults.input);
    let output = args.output.clone().unwrap_or(defaults.output);

    if !args.json {
        println!("Poetica Poems Database Converter");
        println!("{}", "=".repeat(50));
        println!("Input JSON: {}", input.display());
        println!("Output DB: {}", output.display());
        println!();
    }

    match run(&args, input, output) {
        Ok(report) => match print_report(&report, args.json) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                eprintln!("Error: {err:#}");
                ExitCode::from(1)
            }
        },
        Err(err) => {
            report_failure(&err);
            ExitCode::from(1)
        }
    }
}

fn run(args: &Args, input: PathBuf, output: PathBuf) -> Result<ConversionReport> {
    // The converter creates the output directory only after the input parsed
    let config = ConvertConfig {
        on_duplicate: args.on_duplicate,
        progress_interval: args.progress_interval,
    };

    let report = Converter::new(config).convert(&input, &output)?;
    Ok(report)
}

fn print_report(report: &ConversionReport, json: bool) -> Result<()> {
    if json {
        let output = serde_json::to_string_pretty(report).context("Failed to serialize report")?;
        println!("{}", output);
    } else {
        println!();
        println!("Conversion completed successfully!");
        println!("{report}");
    }
    Ok(())
}

/// Print a diagnostic naming the phase that failed
fn report_failure(err: &anyhow::Error) {
    match err.downcast_ref::<ConvertError>() {
        Some(convert_err) if convert_err.is_missing_input() => {
            if let ConvertError::InputRead { path, .. } = convert_err {
                eprintln!("Error: JSON file not found at {}", path.display());
            }
            let assets_dir = DEFAULT_INPUT.rsplit_once('/').map_or("", |(dir, _)| dir);
            eprintln!("Please ensure poems_bundle.json exists in {assets_dir}/");
        }
        Some(convert_err) if convert_err.is_input() => {
            eprintln!("Error reading JSON file: {convert_err}");
        }
        Some(convert_err) => {
            eprintln!("Error creating database: {convert_err}");
        }
        None => {
            eprintln!("Error: {err:#}");
        }
    }
    eprintln!("Conversion failed. Please check error messages above.");
}
