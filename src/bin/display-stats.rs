// src/bin/display-stats.rs

use anyhow::{Context, Result};
use clap::Parser;
use langstats_history::cli::PlotArgs;
use langstats_history::store::HistoryStore;
use langstats_history::{logging, reconciler, renderer};
use std::process;

fn main() {
    let args = PlotArgs::parse();
    logging::init(args.verbose);

    if let Err(e) = run(&args) {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn run(args: &PlotArgs) -> Result<()> {
    let records = HistoryStore::new(&args.filename)
        .read_all()
        .with_context(|| format!("Failed to read {}", args.filename.display()))?;

    let series = reconciler::reconcile(&records);
    println!(
        "{} snapshots, {} languages.",
        series.len(),
        series.series.len()
    );

    let legend = renderer::save_chart(&series, &args.chart_options(), &args.output)
        .with_context(|| format!("Failed to render {}", args.output.display()))?;

    for entry in legend {
        println!("  {} {}", entry.hex(), entry.language);
    }
    println!("Chart written to {}", args.output.display());
    Ok(())
}
