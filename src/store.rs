// src/store.rs

use crate::error::{HistoryError, HistoryResult};
use crate::model::CommitRecord;
use crate::parser::parse_record;
use chrono::{DateTime, Duration, FixedOffset};
use log::{debug, info};
use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Append-only file of serialized `CommitRecord`s, one per line
#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Replays every record in the order it was appended. A missing file reads as empty.
    /// Any undecodable line aborts the read.
    pub fn read_all(&self) -> HistoryResult<Vec<CommitRecord>> {
        let reader = match self.open()? {
            Some(reader) => reader,
            None => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = decode_line(index, line)?;
            records.push(parse_record(&line).map_err(|e| e.at_line(index + 1))?);
        }
        debug!("Read {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Timestamp of the last record, if any. The last line is decoded as
    /// strictly as `read_all` would, so a store that cannot be replayed is
    /// never appended to.
    pub fn last_timestamp(&self) -> HistoryResult<Option<DateTime<FixedOffset>>> {
        let reader = match self.open()? {
            Some(reader) => reader,
            None => return Ok(None),
        };

        let mut last = None;
        for (index, line) in reader.lines().enumerate() {
            last = Some((index, decode_line(index, line)?));
        }

        match last {
            Some((index, line)) => Ok(Some(
                parse_record(&line).map_err(|e| e.at_line(index + 1))?.timestamp,
            )),
            None => Ok(None),
        }
    }

    /// Instant from which a new recording run resumes: one second past the
    /// last recorded commit. `None` starts from the beginning of history.
    pub fn resume_anchor(&self) -> HistoryResult<Option<DateTime<FixedOffset>>> {
        let anchor = self.last_timestamp()?.map(|ts| ts + Duration::seconds(1));
        match anchor {
            Some(ts) => info!("Resuming from {}", ts),
            None => info!("No existing history in {}, starting from scratch", self.path.display()),
        }
        Ok(anchor)
    }

    fn open(&self) -> HistoryResult<Option<BufReader<File>>> {
        match File::open(&self.path) {
            Ok(file) => Ok(Some(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Opens the store for appending, creating it if needed
    pub fn writer(&self) -> HistoryResult<StoreWriter> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        Ok(StoreWriter { file })
    }
}

fn decode_line(index: usize, line: io::Result<String>) -> HistoryResult<String> {
    line.map_err(|e| match e.kind() {
        ErrorKind::InvalidData => HistoryError::malformed("line is not valid UTF-8").at_line(index + 1),
        _ => e.into(),
    })
}

/// Appends whole lines and flushes after each one, so an interrupted run
/// leaves only complete records behind.
#[derive(Debug)]
pub struct StoreWriter {
    file: File,
}

impl StoreWriter {
    pub fn append(&mut self, record: &CommitRecord) -> HistoryResult<()> {
        let line = format!("{}\n", record);
        self.file.write_all(line.as_bytes())?;
        self.file.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn record(id: &str, day: u32, languages: &[(&str, u64)]) -> CommitRecord {
        CommitRecord {
            commit_id: id.to_string(),
            timestamp: Utc.with_ymd_and_hms(2023, 1, day, 12, 0, 0).unwrap().fixed_offset(),
            languages: languages.iter().map(|&(l, c)| (l, c)).collect(),
        }
    }

    #[test]
    fn test_missing_store_reads_empty() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("langstats.csv"));

        assert!(store.read_all().unwrap().is_empty());
        assert_eq!(store.resume_anchor().unwrap(), None);
    }

    #[test]
    fn test_empty_store_has_no_anchor() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("langstats.csv");
        std::fs::write(&path, "").unwrap();

        assert_eq!(HistoryStore::new(path).resume_anchor().unwrap(), None);
    }

    #[test]
    fn test_append_then_read_back_in_order() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("langstats.csv"));
        let first = record("a1", 1, &[("Rust", 30), ("Shell", 10)]);
        let second = record("b2", 2, &[("Rust", 45)]);

        let mut writer = store.writer().unwrap();
        writer.append(&first).unwrap();
        writer.append(&second).unwrap();

        assert_eq!(store.read_all().unwrap(), vec![first, second]);
    }

    #[test]
    fn test_reopening_appends_instead_of_truncating() {
        let dir = TempDir::new().unwrap();
        let store = HistoryStore::new(dir.path().join("langstats.csv"));

        store.writer().unwrap().append(&record("a1", 1, &[("Go", 1)])).unwrap();
        store.writer().unwrap().append(&record("b2", 2, &[("Go", 2)])).unwrap();

        let ids: Vec<_> = store.read_all().unwrap().into_iter().map(|r| r.commit_id).collect();
        assert_eq!(ids, vec!["a1", "b2"]);
    }

    #[test]
    fn test_resume_anchor_is_one_second_after_last_record() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("langstats.csv");
        std::fs::write(
            &path,
            "abc;2023-01-01 00:00:00 +0000;10 Python;\ndef;2023-01-02 10:20:30 +0200;7 Python;\n",
        )
        .unwrap();

        let anchor = HistoryStore::new(path).resume_anchor().unwrap().unwrap();
        assert_eq!(anchor, Utc.with_ymd_and_hms(2023, 1, 2, 8, 20, 31).unwrap());
    }

    #[test]
    fn test_corrupt_line_aborts_read_with_line_number() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("langstats.csv");
        std::fs::write(
            &path,
            "abc;2023-01-01 00:00:00 +0000;10 Python;\ngarbage\ndef;2023-01-02 00:00:00 +0000;7 Python;\n",
        )
        .unwrap();

        match HistoryStore::new(path).read_all() {
            Err(HistoryError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed record, got {:?}", other),
        }
    }

    #[test]
    fn test_invalid_utf8_line_is_malformed() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("langstats.csv");
        let mut bytes = b"abc;2023-01-01 00:00:00 +0000;10 Python;\n".to_vec();
        bytes.extend_from_slice(b"def;2023-01-02 00:00:00 +0000;10 Pyth\xffon;\n");
        std::fs::write(&path, bytes).unwrap();
        let store = HistoryStore::new(path);

        match store.read_all() {
            Err(HistoryError::MalformedRecord { line, .. }) => assert_eq!(line, 2),
            other => panic!("expected malformed record, got {:?}", other),
        }
        assert!(matches!(
            store.resume_anchor(),
            Err(HistoryError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn test_blank_line_blocks_both_replay_and_resume() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("langstats.csv");
        std::fs::write(&path, "abc;2023-01-01 00:00:00 +0000;10 Python;\n\n").unwrap();
        let store = HistoryStore::new(path);

        assert!(matches!(
            store.read_all(),
            Err(HistoryError::MalformedRecord { line: 2, .. })
        ));
        assert!(matches!(
            store.last_timestamp(),
            Err(HistoryError::MalformedRecord { line: 2, .. })
        ));
    }
}
