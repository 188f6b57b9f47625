// src/bin/generate-history.rs

use anyhow::{Context, Result};
use clap::Parser;
use langstats_history::cli::RecordArgs;
use langstats_history::{logging, recorder};
use std::process;
use std::time::Instant;

fn main() {
    let args = RecordArgs::parse();
    logging::init(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &RecordArgs) -> Result<()> {
    let start_time = Instant::now();
    let config = args.config();

    let summary = recorder::run(&config, &args.classifier())
        .with_context(|| format!("Failed to record history of {}", config.source))?;

    println!(
        "Recorded {} of {} sampled commits into {} in {:.2?}.",
        summary.recorded,
        summary.sampled,
        config.output_file.display(),
        start_time.elapsed()
    );
    Ok(())
}
