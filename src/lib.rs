// src/lib.rs

//! Samples a repository's history, records per-language line counts for each
//! sampled commit in an append-only store, and turns that store back into
//! aligned time series for charting.

pub mod analyzer;
pub mod cli;
pub mod error;
pub mod logging;
pub mod model;
pub mod parser;
pub mod reconciler;
pub mod recorder;
pub mod renderer;
pub mod sampler;
pub mod store;
pub mod workspace;

pub use error::{HistoryError, HistoryResult};
pub use model::{AlignedSeries, CommitRecord, HistoryCommit, LanguageCounts, LanguageSeries};
