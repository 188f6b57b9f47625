// src/analyzer.rs

use crate::error::{HistoryError, HistoryResult};
use crate::model::LanguageCounts;
use log::debug;
use std::path::Path;
use std::process::Command;

pub const DEFAULT_CLASSIFIER: &str = "github-linguist";

/// Measures per-language line counts of a checked-out tree.
///
/// Each call is an independent measurement of the tree as it is right now.
pub trait Classifier {
    /// Returns the classifier's non-blank output rows, unaltered.
    fn analyze(&self, workdir: &Path) -> HistoryResult<Vec<String>>;
}

/// Runs an external program inside the working tree and captures its stdout
#[derive(Debug, Clone)]
pub struct CommandClassifier {
    program: String,
    args: Vec<String>,
}

impl CommandClassifier {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }
}

impl Default for CommandClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_CLASSIFIER, Vec::new())
    }
}

impl Classifier for CommandClassifier {
    fn analyze(&self, workdir: &Path) -> HistoryResult<Vec<String>> {
        debug!("Running {} in {}", self.program, workdir.display());
        let output = Command::new(&self.program)
            .args(&self.args)
            .current_dir(workdir)
            .output()
            .map_err(|e| HistoryError::Classifier(format!("failed to run {}: {}", self.program, e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(HistoryError::Classifier(format!(
                "{} exited with {}: {}",
                self.program,
                output.status,
                stderr.trim()
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(String::from)
            .collect())
    }
}

/// One `<count> <name>` row, optionally preceded by a category column
/// such as linguist's `42.17%` share.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifierRow {
    pub count: u64,
    pub language: String,
}

impl ClassifierRow {
    /// Splits a row on whitespace. A leading token that is not a plain integer is
    /// taken as the category column, so the count sits at index 1 and the name
    /// starts at index 2. Names may contain spaces (`Jupyter Notebook`).
    pub fn parse(row: &str) -> Result<Self, String> {
        let fields: Vec<&str> = row.split_whitespace().collect();

        let (count_field, name_fields) = match fields.first() {
            Some(first) if first.parse::<u64>().is_ok() => (fields[0], &fields[1..]),
            Some(_) if fields.len() >= 3 => (fields[1], &fields[2..]),
            _ => return Err(format!("expected `[category] <count> <name>`, got {:?}", row)),
        };

        if name_fields.is_empty() {
            return Err(format!("missing language name in {:?}", row));
        }

        let count = count_field
            .parse::<u64>()
            .map_err(|_| format!("invalid line count {:?} in {:?}", count_field, row))?;

        Ok(Self {
            count,
            language: name_fields.join(" "),
        })
    }
}

/// Interprets raw classifier output as a language mapping, keeping row order.
pub fn parse_languages(rows: &[String]) -> HistoryResult<LanguageCounts> {
    rows.iter()
        .map(|row| {
            ClassifierRow::parse(row)
                .map(|r| (r.language, r.count))
                .map_err(HistoryError::Classifier)
        })
        .collect()
}
