//! Provision the CSV rule tables the converter needs.
//!
//! Downloads `ms_conversions_<type>.csv` for each requested type into the
//! install's `csv/` directory. Run once at packaging time; the reader itself
//! never touches the network.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use oscem_reader::InstallLayout;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Download conversion rule tables next to the reader.
#[derive(Parser, Debug)]
#[command(name = "fetch-rule-tables", version)]
struct Cli {
    /// Destination directory [default: <exe-dir>/csv].
    #[arg(long, env = "OSCEM_READER_RULES_DIR", value_name = "DIR")]
    dest: Option<PathBuf>,

    /// File type to fetch; repeat for several [default: all known types].
    #[arg(long = "type", value_name = "TYPE")]
    types: Vec<String>,

    /// Re-download tables that are already present.
    #[arg(long)]
    force: bool,

    /// Suppress the progress bar.
    #[arg(short, long)]
    quiet: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(if cli.verbose { "debug" } else { "warn" })
        }))
        .with_writer(io::stderr)
        .init();

    let dest = match cli.dest {
        Some(ref d) => d.clone(),
        None => InstallLayout::from_current_exe()?.rules_dir(),
    };

    let types: Vec<&str> = if cli.types.is_empty() {
        rule_tables::KNOWN_TYPES.to_vec()
    } else {
        cli.types.iter().map(String::as_str).collect()
    };
    tracing::debug!("Fetching {:?} into {}", types, dest.display());

    let fetched = if cli.quiet {
        rule_tables::ensure_rule_tables(&dest, &types, cli.force, None)
    } else {
        let bar = ProgressBar::new(0);
        bar.set_style(
            ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  [{bar:32.green/238}] {bytes}/{total_bytes}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
        );
        bar.enable_steady_tick(Duration::from_millis(80));

        let b = bar.clone();
        let result = rule_tables::ensure_rule_tables(
            &dest,
            &types,
            cli.force,
            Some(&move |file_type: &str, done: u64, total: Option<u64>| {
                b.set_prefix(file_type.to_string());
                if let Some(t) = total {
                    b.set_length(t);
                }
                b.set_position(done);
            }),
        );
        bar.finish_and_clear();
        result
    };
    let paths = fetched
        .with_context(|| format!("Failed to fetch rule tables into {}", dest.display()))?;

    for p in paths {
        println!("{}", p.display());
    }
    Ok(())
}
