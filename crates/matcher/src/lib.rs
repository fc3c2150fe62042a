//! # Pasim Matcher
//!
//! ## Purpose
//!
//! `matcher` sits on top of the lexing, fingerprinting, and index layers and
//! turns shared fingerprints into results people can act on: contiguous
//! mapped fragments with source coordinates and snippets, per-fragment
//! confidence and class, an overall verdict with an adaptive threshold, and
//! batch analysis over any number of files.
//!
//! In a typical deployment you will:
//! - Use `ingest` to load source files, then construct a [`Detector`].
//! - Call [`Detector::detect`] for one pair or [`Detector::detect_batch`]
//!   for everything-against-everything, and serialize the results straight
//!   to the consumer.
//!
//! ## Core Types
//!
//! - [`DetectorConfig`]: construction-time tuning (`kgram_size`,
//!   `window_size`, `syntactic_weight`, fragment knobs, optional fixed
//!   threshold). Invalid parameters are fatal at construction.
//! - [`Fragment`]: a cluster of shared k-grams tracking each other on both
//!   sides.
//! - [`MappedFragment`]: a fragment lifted to line/token ranges with
//!   snippets, confidence, and an `EXACT`/`SIMILAR`/`STRUCTURAL` class.
//! - [`PlagiarismResult`] / [`BatchResult`]: the serialisable output schema.
//! - [`Detector`]: the engine.
//!
//! ## Example
//!
//! ```no_run
//! use ingest::{ingest_text, IngestConfig};
//! use matcher::{Detector, DetectorConfig};
//!
//! let ingest_cfg = IngestConfig::default();
//! let a = ingest_text("a.pas", "program A; begin end.", &ingest_cfg).unwrap();
//! let b = ingest_text("b.pas", "program B; begin end.", &ingest_cfg).unwrap();
//!
//! let detector = Detector::new(DetectorConfig::default()).unwrap();
//! let result = detector.detect(&a, &b).unwrap();
//! println!(
//!     "{} vs {}: similarity {:.2}, plagiarism: {}",
//!     result.file1, result.file2, result.overall_similarity, result.is_plagiarism
//! );
//! ```
//!
//! ## Observability
//!
//! Install a [`DetectMetrics`] implementation via [`set_detect_metrics`] to
//! record per-pair latency and fragment counts. This is typically done once
//! during service startup so all [`Detector`] instances share the same
//! metrics backend.

pub mod engine;
pub mod fragments;
pub mod metrics;
pub mod score;
pub mod types;

pub use crate::engine::Detector;
pub use crate::fragments::build_fragments;
pub use crate::metrics::{set_detect_metrics, DetectMetrics};
pub use crate::score::{
    adaptive_threshold, batch_threshold, classify, confidence_level, fragment_confidence,
    local_similarity,
};
pub use crate::types::{
    BatchResult, ConfidenceLevel, DetectorConfig, Fragment, FragmentClass, LineRange,
    MappedFragment, MatchError, PlagiarismResult, TokenRange,
};
