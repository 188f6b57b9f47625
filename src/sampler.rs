// src/sampler.rs

use crate::error::{HistoryError, HistoryResult};
use crate::model::HistoryCommit;
use chrono::{DateTime, FixedOffset};

/// Picks the commits to visit from an oldest-first history.
///
/// With `resume_after`, commits committed before that instant are dropped first;
/// the recorder passes the last stored timestamp plus one second, so the commit
/// already on record is never visited again. Of what remains, every
/// `interval`-th commit is kept starting at the first one.
pub fn sample(
    history: &[HistoryCommit],
    interval: usize,
    resume_after: Option<DateTime<FixedOffset>>,
) -> HistoryResult<Vec<String>> {
    if interval == 0 {
        return Err(HistoryError::configuration(
            "skip interval must be a positive integer",
        ));
    }

    Ok(history
        .iter()
        .filter(|commit| resume_after.map_or(true, |after| commit.committed_at >= after))
        .step_by(interval)
        .map(|commit| commit.id.clone())
        .collect())
}
