//! Payments Report CLI
//!
//! Reads a JSON array of transactions and writes the summary report as JSON.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- --input transactions.json --output report.json
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use clap::Parser;
use payments_report::{process, read_records, write_report, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::PathBuf;
use std::process;

/// Payment transaction processor
#[derive(Parser, Debug)]
#[command(name = "payments-report", version, about)]
struct Cli {
    /// Input JSON file containing transactions
    #[arg(long, value_name = "FILE")]
    input: PathBuf,

    /// Output JSON file for the report
    #[arg(long, value_name = "FILE")]
    output: PathBuf,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let file = File::open(&cli.input)?;
    let records = read_records(BufReader::new(file))?;

    let report = process(&records);

    let output = File::create(&cli.output)?;
    write_report(&report, BufWriter::new(output))?;

    println!("Report generated at {}", cli.output.display());
    Ok(())
}
