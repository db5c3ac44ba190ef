use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};

use expr_delta::report::{render_json, render_text};
use expr_delta::{compare_files, BandList};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "expr-delta",
    version,
    about = "Count how absolute differences between two expression matrices fall into bands",
    long_about = "Each delta value establishes an additional band of possible expression \
differences such that each difference satisfies one of X = 0, 0 < X <= delta1, \
delta1 < X <= delta2, and so on, or falls in the remainder. The size of each band's \
membership is reported in absolute as well as percentage terms.\n\n\
The two files must have equal dimensions (same number of probes, same number of \
chips) and be tab separated as produced by libaffy, with a header row first."
)]
struct Args {
    /// Comma-separated, strictly ascending band limits (e.g. 0.1,0.5,1).
    #[arg(value_name = "DELTA1[,DELTA2,...]", allow_hyphen_values = true)]
    deltas: String,

    /// First expression file.
    exprfile1: PathBuf,

    /// Second expression file.
    exprfile2: PathBuf,

    /// Report format.
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
}

fn run(args: &Args) -> Result<()> {
    let bands = BandList::parse(&args.deltas)?;
    log::info!(
        "Comparing {} and {} with {} bands",
        args.exprfile1.display(),
        args.exprfile2.display(),
        bands.len()
    );

    let tally = compare_files(&args.exprfile1, &args.exprfile2, bands)?;

    match args.format {
        OutputFormat::Text => print!("{}", render_text(&tally)),
        OutputFormat::Json => {
            let json = render_json(&tally).context("serializing report")?;
            println!("{json}");
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();

    let args = Args::parse();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            println!("ERROR: {e:#}");
            ExitCode::FAILURE
        }
    }
}
