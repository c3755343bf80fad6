use std::{
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use log::{info, LevelFilter};

use expenses::{
    csv::{self, LoadOptions},
    report, CategorySummary, DateRange, SortOrder,
};

/// Summarize spending by category from a CSV file of transactions
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// The path to the transactions CSV file; prompted for when omitted
    file: Option<PathBuf>,

    /// Only count transactions on or after this date (YYYY-MM-DD)
    #[arg(long = "from")]
    date_from: Option<NaiveDate>,

    /// Only count transactions on or before this date (YYYY-MM-DD)
    #[arg(long = "to")]
    date_to: Option<NaiveDate>,

    /// Order of summary lines: `category` or `amount`
    #[arg(long, default_value = "category")]
    sort: SortOrder,

    /// Also write the summary as CSV to this path
    #[arg(long)]
    export: Option<PathBuf>,

    /// Fail on rows with an empty category instead of warning
    #[arg(long)]
    reject_uncategorized: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        })
        .init();

    let range = DateRange::new(args.date_from, args.date_to)?;
    let path = match args.file {
        Some(path) => path,
        None => prompt_path()?,
    };
    let options = LoadOptions {
        reject_uncategorized: args.reject_uncategorized,
    };

    let txns = csv::open(&path, options)?;
    let summary = CategorySummary::from_transactions(txns, &range)
        .with_context(|| format!("could not summarize {}", path.display()))?;

    report::render(&summary, args.sort, io::stdout().lock())?;

    if let Some(export) = args.export {
        let file = std::fs::File::create(&export)
            .with_context(|| format!("could not create {}", export.display()))?;
        csv::write(&summary, args.sort, file)?;
        info!("exported summary to {}", export.display());
    }

    Ok(())
}

fn prompt_path() -> Result<PathBuf> {
    let mut stderr = io::stderr();
    write!(stderr, "Path to transactions CSV: ")?;
    stderr.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    let line = line.trim();
    if line.is_empty() {
        bail!("no transactions file given");
    }

    Ok(PathBuf::from(line))
}
