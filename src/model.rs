// src/model.rs

use chrono::{DateTime, FixedOffset};
use std::fmt;

/// Timestamp layout used in the persistent store, e.g. `2023-01-01 00:00:00 +0000`
pub const STORE_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S %z";

/// A commit as seen while walking history, oldest first
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryCommit {
    pub id: String,
    pub committed_at: DateTime<FixedOffset>,
}

/// Language name -> line count, in the order the classifier reported them.
///
/// A language missing from the mapping had zero lines at that commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LanguageCounts {
    entries: Vec<(String, u64)>,
}

impl LanguageCounts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the count for `language`. A repeated language keeps its first position.
    pub fn insert(&mut self, language: impl Into<String>, count: u64) {
        let language = language.into();
        match self.entries.iter_mut().find(|(name, _)| *name == language) {
            Some(entry) => entry.1 = count,
            None => self.entries.push((language, count)),
        }
    }

    pub fn get(&self, language: &str) -> Option<u64> {
        self.entries
            .iter()
            .find(|(name, _)| name == language)
            .map(|&(_, count)| count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(name, count)| (name.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.entries.iter().map(|&(_, count)| count).sum()
    }
}

impl<S: Into<String>> FromIterator<(S, u64)> for LanguageCounts {
    fn from_iter<I: IntoIterator<Item = (S, u64)>>(iter: I) -> Self {
        let mut counts = LanguageCounts::new();
        for (language, count) in iter {
            counts.insert(language, count);
        }
        counts
    }
}

/// One sampled snapshot of the repository, as stored on disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitRecord {
    pub commit_id: String,
    pub timestamp: DateTime<FixedOffset>,
    pub languages: LanguageCounts,
}

/// Serializes to a single store line (without the newline):
/// `<id>;<timestamp>;<share>% <count> <name>;...;`
impl fmt::Display for CommitRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};{};",
            self.commit_id,
            self.timestamp.format(STORE_DATE_FORMAT)
        )?;
        let total = self.languages.total();
        for (language, count) in self.languages.iter() {
            let share = if total == 0 {
                0.0
            } else {
                count as f64 * 100.0 / total as f64
            };
            write!(f, "{:.2}% {} {};", share, count, language)?;
        }
        Ok(())
    }
}

/// Counts for one language, positionally aligned with `AlignedSeries::timestamps`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageSeries {
    pub language: String,
    pub counts: Vec<u64>,
}

/// Time-indexed dataset where every language has a value at every timestamp
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlignedSeries {
    pub timestamps: Vec<DateTime<FixedOffset>>,
    /// Ordered by first appearance across the records
    pub series: Vec<LanguageSeries>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn languages(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.language.as_str())
    }

    pub fn get(&self, language: &str) -> Option<&[u64]> {
        self.series
            .iter()
            .find(|s| s.language == language)
            .map(|s| s.counts.as_slice())
    }

    /// Sum of all languages at each timestamp
    pub fn totals(&self) -> Vec<u64> {
        (0..self.len())
            .map(|i| self.series.iter().map(|s| s.counts[i]).sum())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_keeps_first_position_on_repeat() {
        let mut counts = LanguageCounts::new();
        counts.insert("Rust", 10);
        counts.insert("Go", 3);
        counts.insert("Rust", 12);

        let entries: Vec<_> = counts.iter().collect();
        assert_eq!(entries, vec![("Rust", 12), ("Go", 3)]);
        assert_eq!(counts.total(), 15);
        assert_eq!(counts.get("Python"), None);
    }

    #[test]
    fn test_record_serializes_with_share_column_and_trailing_delimiter() {
        let record = CommitRecord {
            commit_id: "abc".to_string(),
            timestamp: DateTime::parse_from_str("2023-01-01 00:00:00 +0100", STORE_DATE_FORMAT)
                .unwrap(),
            languages: [("Python", 75u64), ("Go", 25u64)].into_iter().collect(),
        };

        assert_eq!(
            record.to_string(),
            "abc;2023-01-01 00:00:00 +0100;75.00% 75 Python;25.00% 25 Go;"
        );
    }

    #[test]
    fn test_record_without_languages_serializes_header_only() {
        let record = CommitRecord {
            commit_id: "abc".to_string(),
            timestamp: DateTime::parse_from_str("2023-01-01 00:00:00 +0000", STORE_DATE_FORMAT)
                .unwrap(),
            languages: LanguageCounts::new(),
        };

        assert_eq!(record.to_string(), "abc;2023-01-01 00:00:00 +0000;");
    }

    #[test]
    fn test_aligned_series_totals() {
        let ts = DateTime::parse_from_str("2023-01-01 00:00:00 +0000", STORE_DATE_FORMAT).unwrap();
        let series = AlignedSeries {
            timestamps: vec![ts, ts],
            series: vec![
                LanguageSeries { language: "Python".into(), counts: vec![10, 7] },
                LanguageSeries { language: "Go".into(), counts: vec![5, 0] },
            ],
        };

        assert_eq!(series.totals(), vec![15, 7]);
        assert_eq!(series.get("Go"), Some(&[5u64, 0][..]));
        assert_eq!(series.languages().collect::<Vec<_>>(), vec!["Python", "Go"]);
    }
}
