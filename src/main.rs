mod engine;
mod error;
mod fingerprint;
mod grouping;
mod hasher;
mod logging;
mod output;
mod progress;
mod scanner;
mod util;

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, ValueEnum};

use engine::ScanOptions;
use fingerprint::FingerprintConfig;
use output::DuplicateReport;
use scanner::{DEFAULT_MAX_DEPTH, WalkOptions};

#[derive(Parser, Debug)]
#[command(name = "dupscan")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Directory to scan for duplicates
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Include the modification time in the duplicate key
    #[arg(short = 'm', long = "mtime")]
    mtime: bool,

    /// Include the content digest in the duplicate key (content only without -m)
    #[arg(short = 'd', long = "digest")]
    digest: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Human)]
    format: OutputFormat,

    /// Skip files and directories whose name matches this glob (repeatable)
    #[arg(short, long, value_name = "GLOB")]
    exclude: Vec<String>,

    /// Do not descend below this many directory levels
    #[arg(long, default_value_t = DEFAULT_MAX_DEPTH as u32, value_parser = clap::value_parser!(u32).range(1..))]
    max_depth: u32,

    /// Disable progress display
    #[arg(long)]
    no_progress: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

/// Output format options
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripting
    Json,
}

impl Cli {
    fn scan_options(&self) -> ScanOptions {
        ScanOptions {
            fingerprint: FingerprintConfig {
                use_mod_time: self.mtime,
                use_content_hash: self.digest,
            },
            walk: WalkOptions {
                max_depth: self.max_depth as usize,
                exclude: self.exclude.clone(),
            },
            progress: !self.no_progress && !self.quiet,
        }
    }
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => e.exit(),
            _ => {
                let _ = e.print();
                process::exit(1);
            }
        },
    };

    logging::init_logging(cli.verbose, cli.quiet);

    if let Err(e) = run(&cli) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let outcome = engine::scan(&cli.path, &cli.scan_options())
        .with_context(|| format!("failed to scan {}", cli.path.display()))?;

    let report = DuplicateReport::from_outcome(&outcome, &cli.path);
    match cli.format {
        OutputFormat::Human => report.print_human(),
        OutputFormat::Json => report
            .print_json()
            .context("failed to serialize report as JSON")?,
    }
    Ok(())
}
