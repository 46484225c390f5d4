//! CLI binary for oscem-reader.
//!
//! A thin shim over the library crate: maps flags to a `PipelineConfig` and
//! an `InstallLayout`, prints stage banners, then the converter's summary.

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use oscem_reader::{
    InstallLayout, Pipeline, PipelineConfig, PipelineError, PipelineProgress, ProcessConverter,
    ProcessExtractor, Stage,
};
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

// ── Console progress ─────────────────────────────────────────────────────────

/// Prints a plain banner line on stdout when extraction and conversion start.
struct ConsoleProgress;

impl PipelineProgress for ConsoleProgress {
    fn on_stage_start(&self, stage: Stage) {
        match stage {
            Stage::Extract => println!("=== Running extractor ==="),
            Stage::Convert => println!("=== Running converter ==="),
            _ => {}
        }
    }

    fn on_stage_error(&self, stage: Stage, error: &str) {
        tracing::debug!("stage {stage} failed: {error}");
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert the file in ./session-42 and write the result to out/session-42.json
  oscem-reader -i ./session-42 -o out/session-42.json

  # Machine-readable run report
  oscem-reader -i ./session-42 -o out/session-42.json --json

INSTALL LAYOUT (relative to the directory holding this executable):
  dist/extractor_bin               Extraction program, called with the input directory
  dist/converter_bin               Conversion program, metadata on stdin
  csv/ms_conversions_<type>.csv    Rule table per file type (see fetch-rule-tables)

ENVIRONMENT VARIABLES:
  OSCEM_READER_INPUT       Input directory
  OSCEM_READER_OUTPUT      Output file
  OSCEM_READER_HOME        Use this directory instead of the executable's
  OSCEM_READER_EXTRACTOR   Override the extraction program
  OSCEM_READER_CONVERTER   Override the conversion program
  RUST_LOG                 Tracing filter (overrides -v / -q)
"#;

/// Detect, extract and convert instrument metadata.
#[derive(Parser, Debug)]
#[command(
    name = "oscem-reader",
    version,
    about = "Detect, extract and convert instrument metadata",
    long_about = "Detects the file type in the input directory, runs the co-installed \
extractor on it, and converts the extracted metadata with the rule table for that type.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    // Kept as raw strings: an empty value must reach the usage check below
    // instead of being rejected by clap's path parser.
    /// Input directory containing the file to process (required).
    #[arg(short = 'i', long = "input", env = "OSCEM_READER_INPUT", value_name = "DIR")]
    input: Option<OsString>,

    /// Output file for results (required).
    #[arg(short = 'o', long = "output", env = "OSCEM_READER_OUTPUT", value_name = "FILE")]
    output: Option<OsString>,

    /// Directory to resolve dist/ and csv/ against instead of the executable's.
    #[arg(long, env = "OSCEM_READER_HOME", value_name = "DIR")]
    install_dir: Option<PathBuf>,

    /// Extraction program to run instead of dist/extractor_bin.
    #[arg(long, env = "OSCEM_READER_EXTRACTOR", value_name = "PATH")]
    extractor: Option<PathBuf>,

    /// Conversion program to run instead of dist/converter_bin.
    #[arg(long, env = "OSCEM_READER_CONVERTER", value_name = "PATH")]
    converter: Option<PathBuf>,

    /// Print the run report as JSON instead of the summary banner.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress stage banners; only results and errors are printed.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::FAILURE,
            };
        }
    };

    // ── Required inputs ──────────────────────────────────────────────────
    // Checked before logging or any file-system access.
    let (Some(input), Some(output)) = (non_empty(cli.input.clone()), non_empty(cli.output.clone()))
    else {
        print_usage();
        return ExitCode::FAILURE;
    };

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, input, output).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Pipeline errors already carry their stage prefix and cause.
            match e.downcast_ref::<PipelineError>() {
                Some(pe) => eprintln!("{pe}"),
                None => eprintln!("{e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, input: PathBuf, output: PathBuf) -> Result<()> {
    let layout = match cli.install_dir {
        Some(ref dir) => InstallLayout::at(dir),
        None => InstallLayout::from_current_exe()?,
    };

    let extractor = match cli.extractor {
        Some(ref p) => ProcessExtractor::new(p),
        None => ProcessExtractor::from_layout(&layout),
    };
    let converter = match cli.converter {
        Some(ref p) => ProcessConverter::new(p),
        None => ProcessConverter::from_layout(&layout),
    };
    let pipeline = Pipeline::new(layout, Arc::new(extractor), Arc::new(converter));

    let mut builder = PipelineConfig::builder().input_dir(input).output_path(output);
    if !cli.quiet && !cli.json {
        builder = builder.progress(Arc::new(ConsoleProgress));
    }
    let config = builder.build()?;

    let report = pipeline.run(&config).await?;

    if cli.json {
        let json = serde_json::to_string_pretty(&report).context("Failed to serialise report")?;
        println!("{json}");
    } else {
        println!("\n=== MS Reader results ===");
        println!("{}", report.summary);
    }

    Ok(())
}

fn non_empty(value: Option<OsString>) -> Option<PathBuf> {
    value.filter(|v| !v.is_empty()).map(PathBuf::from)
}

fn print_usage() {
    let mut cmd = Cli::command();
    eprintln!("Usage: {} -i <input_directory> -o <output_file>", cmd.get_name());
    eprintln!();
    eprintln!("{}", cmd.render_help());
}
