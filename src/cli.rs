// src/cli.rs

use crate::analyzer::{CommandClassifier, DEFAULT_CLASSIFIER};
use crate::recorder::{RecorderConfig, DEFAULT_OUTPUT_FILE, DEFAULT_SKIP_INTERVAL};
use crate::renderer::{ChartOptions, DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::workspace::DEFAULT_EXCLUSION;
use clap::Parser;
use std::path::PathBuf;

/// Generate the history of the number of lines of code for each language in a repository
#[derive(Parser, Debug)]
#[command(name = "generate-history", author, version, about, long_about = None)]
pub struct RecordArgs {
    /// Path or URL of the git repository to analyze
    #[arg(value_name = "REPO")]
    pub repo: String,

    /// Keep one commit out of every SKIP_INTERVAL
    #[arg(short, long, default_value_t = DEFAULT_SKIP_INTERVAL)]
    pub skip_interval: usize,

    /// File to append records to
    #[arg(short, long, default_value = DEFAULT_OUTPUT_FILE)]
    pub output_file: PathBuf,

    /// Classifier program run in each checkout
    #[arg(long, env = "LANGSTATS_CLASSIFIER", default_value = DEFAULT_CLASSIFIER)]
    pub classifier: String,

    /// Extra argument passed to the classifier (repeatable)
    #[arg(long = "classifier-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub classifier_args: Vec<String>,

    /// .gitattributes rule applied while classifying (repeatable)
    #[arg(long = "exclude", value_name = "RULE", default_values_t = vec![DEFAULT_EXCLUSION.to_string()])]
    pub exclusions: Vec<String>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl RecordArgs {
    pub fn config(&self) -> RecorderConfig {
        RecorderConfig {
            source: self.repo.clone(),
            skip_interval: self.skip_interval,
            output_file: self.output_file.clone(),
            exclusions: self.exclusions.clone(),
            show_progress: true,
        }
    }

    pub fn classifier(&self) -> CommandClassifier {
        CommandClassifier::new(self.classifier.clone(), self.classifier_args.clone())
    }
}

/// Plot language statistics from a history file
#[derive(Parser, Debug)]
#[command(name = "display-stats", author, version, about, long_about = None)]
pub struct PlotArgs {
    /// History file written by generate-history
    #[arg(value_name = "FILENAME")]
    pub filename: PathBuf,

    /// PNG file to write the chart to
    #[arg(short, long, default_value = "langstats.png")]
    pub output: PathBuf,

    /// Width of the chart in pixels
    #[arg(long, default_value_t = DEFAULT_WIDTH)]
    pub width: u32,

    /// Height of the chart in pixels
    #[arg(long, default_value_t = DEFAULT_HEIGHT)]
    pub height: u32,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl PlotArgs {
    pub fn chart_options(&self) -> ChartOptions {
        ChartOptions {
            width: self.width,
            height: self.height,
            show_progress: true,
        }
    }
}
