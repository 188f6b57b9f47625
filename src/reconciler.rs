// src/reconciler.rs

use crate::model::{AlignedSeries, CommitRecord, LanguageSeries};
use std::collections::HashSet;

/// Aligns every language across every record.
///
/// Languages are ordered by first appearance, scanning records in the order given.
/// A record that does not mention a language contributes `0` for it.
pub fn reconcile(records: &[CommitRecord]) -> AlignedSeries {
    let mut universe: Vec<&str> = Vec::new();
    let mut seen: HashSet<&str> = HashSet::new();
    for record in records {
        for (language, _) in record.languages.iter() {
            if seen.insert(language) {
                universe.push(language);
            }
        }
    }

    let mut series: Vec<LanguageSeries> = universe
        .iter()
        .map(|language| LanguageSeries {
            language: language.to_string(),
            counts: Vec::with_capacity(records.len()),
        })
        .collect();

    for record in records {
        for (slot, language) in series.iter_mut().zip(&universe) {
            slot.counts.push(record.languages.get(language).unwrap_or(0));
        }
    }

    AlignedSeries {
        timestamps: records.iter().map(|r| r.timestamp).collect(),
        series,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_record;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_reconcile_zero_fills_missing_languages() {
        let records = vec![
            parse_record("abc;2023-01-01 00:00:00 +0000;10 Python;5 Go;").unwrap(),
            parse_record("def;2023-01-02 00:00:00 +0000;7 Python;").unwrap(),
        ];

        let aligned = reconcile(&records);

        assert_eq!(
            aligned.timestamps,
            vec![
                Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap(),
                Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0).unwrap(),
            ]
        );
        assert_eq!(aligned.languages().collect::<Vec<_>>(), vec!["Python", "Go"]);
        assert_eq!(aligned.get("Python"), Some(&[10u64, 7][..]));
        assert_eq!(aligned.get("Go"), Some(&[5u64, 0][..]));
    }

    #[test]
    fn test_reconcile_orders_languages_by_first_appearance() {
        let records = vec![
            parse_record("a;2023-01-01 00:00:00 +0000;1 Shell;").unwrap(),
            parse_record("b;2023-01-02 00:00:00 +0000;4 Rust;2 Shell;").unwrap(),
            parse_record("c;2023-01-03 00:00:00 +0000;3 C;4 Rust;").unwrap(),
        ];

        let aligned = reconcile(&records);

        assert_eq!(aligned.languages().collect::<Vec<_>>(), vec!["Shell", "Rust", "C"]);
        assert_eq!(aligned.get("Shell"), Some(&[1u64, 2, 0][..]));
        assert_eq!(aligned.get("Rust"), Some(&[0u64, 4, 4][..]));
        assert_eq!(aligned.get("C"), Some(&[0u64, 0, 3][..]));
    }

    #[test]
    fn test_reconcile_ignores_column_order_within_later_lines() {
        let a = vec![
            parse_record("a;2023-01-01 00:00:00 +0000;1 Go;2 Rust;").unwrap(),
            parse_record("b;2023-01-02 00:00:00 +0000;3 Go;4 Rust;").unwrap(),
        ];
        let b = vec![
            parse_record("a;2023-01-01 00:00:00 +0000;1 Go;2 Rust;").unwrap(),
            parse_record("b;2023-01-02 00:00:00 +0000;4 Rust;3 Go;").unwrap(),
        ];

        assert_eq!(reconcile(&a), reconcile(&b));
    }

    #[test]
    fn test_reconcile_empty_input() {
        let aligned = reconcile(&[]);
        assert!(aligned.is_empty());
        assert!(aligned.series.is_empty());
    }
}
