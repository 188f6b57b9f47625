// src/parser.rs

use crate::analyzer::ClassifierRow;
use crate::error::{HistoryError, HistoryResult};
use crate::model::{CommitRecord, LanguageCounts, STORE_DATE_FORMAT};
use chrono::DateTime;
use std::str::FromStr;

/// Decodes one store line: `<commit_id>;<timestamp>;<language field>;...;`
pub fn parse_record(line: &str) -> HistoryResult<CommitRecord> {
    let line = line.trim_end_matches(['\n', '\r']);
    let mut fields: Vec<&str> = line.split(';').collect();

    // The trailing delimiter leaves one empty field behind
    if fields.len() > 1 && fields.last().map_or(false, |f| f.is_empty()) {
        fields.pop();
    }

    let commit_id = fields
        .first()
        .map(|f| f.trim())
        .filter(|f| !f.is_empty())
        .ok_or_else(|| HistoryError::malformed("missing commit id"))?;

    let raw_timestamp = fields
        .get(1)
        .ok_or_else(|| HistoryError::malformed(format!("missing timestamp for {}", commit_id)))?;
    let timestamp = DateTime::parse_from_str(raw_timestamp.trim(), STORE_DATE_FORMAT).map_err(|e| {
        HistoryError::malformed(format!("invalid timestamp {:?}: {}", raw_timestamp, e))
    })?;

    let mut languages = LanguageCounts::new();
    for field in &fields[2..] {
        let row = ClassifierRow::parse(field).map_err(HistoryError::malformed)?;
        languages.insert(row.language, row.count);
    }

    Ok(CommitRecord {
        commit_id: commit_id.to_string(),
        timestamp,
        languages,
    })
}

impl FromStr for CommitRecord {
    type Err = HistoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_record(s)
    }
}
