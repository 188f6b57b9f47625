// src/recorder.rs

use crate::analyzer::{parse_languages, Classifier};
use crate::error::{HistoryError, HistoryResult};
use crate::model::CommitRecord;
use crate::sampler::sample;
use crate::store::HistoryStore;
use crate::workspace::{WorkingCopy, DEFAULT_EXCLUSION};
use indicatif::ProgressBar;
use log::{debug, info, warn};
use std::path::PathBuf;

pub const DEFAULT_SKIP_INTERVAL: usize = 5;
pub const DEFAULT_OUTPUT_FILE: &str = "langstats.csv";

/// Everything a recording run needs besides the classifier
#[derive(Debug, Clone)]
pub struct RecorderConfig {
    /// Local path or URL of the repository to sample
    pub source: String,
    pub skip_interval: usize,
    pub output_file: PathBuf,
    /// Attribute rules applied around every classifier run
    pub exclusions: Vec<String>,
    pub show_progress: bool,
}

impl RecorderConfig {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            skip_interval: DEFAULT_SKIP_INTERVAL,
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            exclusions: vec![DEFAULT_EXCLUSION.to_string()],
            show_progress: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RecordSummary {
    pub sampled: usize,
    pub recorded: usize,
}

/// Clones the source, samples what the store does not have yet, and appends
/// one record per sampled commit.
pub fn run<C: Classifier>(config: &RecorderConfig, classifier: &C) -> HistoryResult<RecordSummary> {
    if config.skip_interval == 0 {
        return Err(HistoryError::configuration(
            "skip interval must be a positive integer",
        ));
    }

    let store = HistoryStore::new(&config.output_file);
    let resume_after = store.resume_anchor()?;

    let mut working_copy = WorkingCopy::from_source(&config.source)?;
    let history = working_copy.history()?;
    let sampled = sample(&history, config.skip_interval, resume_after)?;
    info!(
        "Sampling {} of {} commits (every {})",
        sampled.len(),
        history.len(),
        config.skip_interval
    );

    let progress = if config.show_progress {
        ProgressBar::new(sampled.len() as u64)
    } else {
        ProgressBar::hidden()
    };

    let summary = record(
        &mut working_copy,
        &sampled,
        classifier,
        &config.exclusions,
        &store,
        &progress,
    )?;
    progress.finish_with_message("Recording complete");
    Ok(summary)
}

/// Visits `commit_ids` in order, measuring each checkout and appending its record.
///
/// The store is only opened once there is something to write, so an empty
/// sample leaves it untouched.
pub fn record<C: Classifier>(
    working_copy: &mut WorkingCopy,
    commit_ids: &[String],
    classifier: &C,
    exclusions: &[String],
    store: &HistoryStore,
    progress: &ProgressBar,
) -> HistoryResult<RecordSummary> {
    let mut summary = RecordSummary {
        sampled: commit_ids.len(),
        recorded: 0,
    };
    if commit_ids.is_empty() {
        info!("Nothing new to record in {}", store.path().display());
        return Ok(summary);
    }

    let mut writer = store.writer()?;
    for commit_id in commit_ids {
        let record = snapshot(working_copy, commit_id, classifier, exclusions)?;
        writer.append(&record)?;
        summary.recorded += 1;
        progress.inc(1);
    }

    info!(
        "Recorded {} commits into {}",
        summary.recorded,
        store.path().display()
    );
    Ok(summary)
}

fn snapshot<C: Classifier>(
    working_copy: &mut WorkingCopy,
    commit_id: &str,
    classifier: &C,
    exclusions: &[String],
) -> HistoryResult<CommitRecord> {
    working_copy.checkout(commit_id)?;
    working_copy.apply_exclusions(exclusions)?;

    let rows = classifier.analyze(working_copy.workdir());

    match working_copy.restore_exclusions() {
        Ok(()) => {}
        Err(e @ HistoryError::ExclusionRestore(_)) => warn!("{} (commit {})", e, commit_id),
        Err(e) => return Err(e),
    }

    let languages = parse_languages(&rows?)?;
    let timestamp = working_copy.head_timestamp()?;
    debug!("{} at {}: {} languages", commit_id, timestamp, languages.len());

    Ok(CommitRecord {
        commit_id: commit_id.to_string(),
        timestamp,
        languages,
    })
}
