//! Configuration, result, and error types for the detection engine.
//!
//! The serde shapes here are the external contract: the HTTP façade and the
//! desktop shell consume these structures as JSON verbatim, so field names
//! serialize in camelCase and the enums serialize to fixed uppercase strings.

use index::IndexError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a mapped fragment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FragmentClass {
    Exact,
    Similar,
    Structural,
}

/// Four-level confidence label on an overall verdict.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
    VeryHigh,
}

/// Engine configuration.
///
/// `kgram_size`, `window_size`, and `syntactic_weight` are the construction
/// inputs from the external contract; the remaining knobs tune fragment
/// reconstruction. Validation failures are fatal at construction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DetectorConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Tokens per k-gram.
    pub kgram_size: usize,
    /// Winnowing window size in k-grams.
    pub window_size: usize,
    /// Weight of the syntactic similarity in the overall score.
    pub syntactic_weight: f64,
    /// Maximum k-gram gap when extending a fragment; `None` uses
    /// `window_size`, the largest gap winnowing can leave between consecutive
    /// selected fingerprints of an unbroken shared region.
    pub gap_tolerance: Option<usize>,
    /// Allowed left/right offset drift within a fragment, relative to the
    /// fragment's first shared k-gram.
    pub drift_tolerance: usize,
    /// Minimum shared k-grams a fragment needs to survive.
    pub min_occurrences: usize,
    /// Fixed decision threshold; `None` selects the adaptive table.
    pub threshold: Option<f64>,
    /// Hash seed forwarded to the fingerprint stage.
    pub seed: u64,
}

impl DetectorConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_kgram_size(mut self, k: usize) -> Self {
        self.kgram_size = k;
        self
    }

    pub fn with_window_size(mut self, w: usize) -> Self {
        self.window_size = w;
        self
    }

    pub fn with_syntactic_weight(mut self, weight: f64) -> Self {
        self.syntactic_weight = weight;
        self
    }

    pub fn with_gap_tolerance(mut self, gap: Option<usize>) -> Self {
        self.gap_tolerance = gap;
        self
    }

    pub fn with_drift_tolerance(mut self, drift: usize) -> Self {
        self.drift_tolerance = drift;
        self
    }

    pub fn with_min_occurrences(mut self, min: usize) -> Self {
        self.min_occurrences = min;
        self
    }

    pub fn with_threshold(mut self, threshold: Option<f64>) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Effective fragment gap tolerance.
    pub fn effective_gap_tolerance(&self) -> usize {
        self.gap_tolerance.unwrap_or(self.window_size)
    }

    /// Validate the configuration. Fatal at engine construction.
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.version < 1 {
            return Err(MatchError::InvalidConfig(format!(
                "version must be >= 1 (got {})",
                self.version
            )));
        }
        if self.kgram_size < 2 {
            return Err(MatchError::InvalidConfig(format!(
                "kgram_size must be >= 2 (got {})",
                self.kgram_size
            )));
        }
        if self.window_size < 1 {
            return Err(MatchError::InvalidConfig(format!(
                "window_size must be >= 1 (got {})",
                self.window_size
            )));
        }
        if !(0.0..=1.0).contains(&self.syntactic_weight) {
            return Err(MatchError::InvalidConfig(format!(
                "syntactic_weight must be within [0, 1] (got {})",
                self.syntactic_weight
            )));
        }
        if self.min_occurrences < 1 {
            return Err(MatchError::InvalidConfig(
                "min_occurrences must be >= 1".to_string(),
            ));
        }
        if let Some(t) = self.threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(MatchError::InvalidConfig(format!(
                    "threshold must be within [0, 1] (got {t})"
                )));
            }
        }
        Ok(())
    }
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            version: 1,
            kgram_size: 8,
            window_size: 15,
            syntactic_weight: 1.0,
            gap_tolerance: None,
            drift_tolerance: 1,
            min_occurrences: 1,
            threshold: None,
            seed: 0xCBF2_9CE4_8422_2325,
        }
    }
}

/// A cluster of shared k-grams tracking each other on both sides.
///
/// Ranges are inclusive k-gram indices. Monotonic on both sides by
/// construction: left positions never decrease, right positions never
/// decrease, and every member's offset stays within the drift band of the
/// first member's offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
    pub left_from: usize,
    pub left_to: usize,
    pub right_from: usize,
    pub right_to: usize,
    pub pairs: Vec<index::SharedKGram>,
}

/// Inclusive 1-based line range on one side of a fragment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
    pub count: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        let end = end.max(start);
        Self {
            start,
            end,
            count: end - start + 1,
        }
    }
}

/// Inclusive token index range on one side of a fragment.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenRange {
    pub start: usize,
    pub end: usize,
    pub tokens: usize,
}

impl TokenRange {
    pub fn new(start: usize, end: usize) -> Self {
        let end = end.max(start);
        Self {
            start,
            end,
            tokens: end - start + 1,
        }
    }
}

/// A fragment lifted to source coordinates, ready for serialization.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MappedFragment {
    pub fragment_id: u32,
    pub confidence: f64,
    pub fragment_type: FragmentClass,
    pub file1_lines: LineRange,
    pub file2_lines: LineRange,
    pub file1_token_range: TokenRange,
    pub file2_token_range: TokenRange,
    pub shared_tokens: Vec<String>,
    pub token_pattern: String,
    pub file1_code_snippet: String,
    pub file2_code_snippet: String,
    pub file1_code_with_line_numbers: String,
    pub file2_code_with_line_numbers: String,
    pub local_similarity: f64,
    pub shared_fingerprints: usize,
}

/// Detection result for one file pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismResult {
    pub syntactic_similarity: f64,
    pub overall_similarity: f64,
    /// Number of shared fingerprints between the two files.
    pub shared_fragments: usize,
    /// Longest co-running region, in tokens.
    pub longest_fragment: usize,
    pub coverage1: f64,
    pub coverage2: f64,
    pub mapped_fragments: Vec<MappedFragment>,
    pub total_mapped_fragments: usize,
    pub significant_mapped_fragments: usize,
    pub total_shared_lines: u32,
    pub total_shared_tokens: usize,
    pub is_plagiarism: bool,
    pub confidence: ConfidenceLevel,
    pub file1: String,
    pub file2: String,
    /// Wall-clock processing time in milliseconds.
    pub processing_time: u64,
}

/// Batch detection result over every unordered file pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    /// Pair results sorted by descending overall similarity.
    pub results: Vec<PlagiarismResult>,
    /// Decision threshold used for `suspicious_pairs`.
    pub threshold: f64,
    pub total_comparisons: usize,
    pub suspicious_pairs: usize,
    /// Wall-clock processing time in milliseconds.
    pub processing_time: u64,
}

/// Errors produced by the detection engine.
#[derive(Debug, Error, Clone)]
pub enum MatchError {
    /// Invalid engine configuration; fatal at construction.
    #[error("invalid detector config: {0}")]
    InvalidConfig(String),
    /// Lexing failed in a context where it cannot degrade to a zero result.
    #[error("lex error: {0}")]
    Lex(String),
    /// Fingerprinting failed.
    #[error("fingerprint error: {0}")]
    Fingerprint(String),
    /// Index lookup or pairing failed.
    #[error("index error: {0}")]
    Index(#[from] IndexError),
    /// The batch was cancelled between pair evaluations.
    #[error("batch detection cancelled")]
    Cancelled,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = DetectorConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.kgram_size, 8);
        assert_eq!(cfg.window_size, 15);
        assert_eq!(cfg.effective_gap_tolerance(), 15);
    }

    #[test]
    fn kgram_size_below_two_rejected() {
        let cfg = DetectorConfig::new().with_kgram_size(1);
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(matches!(err, MatchError::InvalidConfig(msg) if msg.contains("kgram_size")));
    }

    #[test]
    fn window_zero_rejected() {
        let cfg = DetectorConfig::new().with_window_size(0);
        let err = cfg.validate().expect_err("config should be invalid");
        assert!(matches!(err, MatchError::InvalidConfig(msg) if msg.contains("window_size")));
    }

    #[test]
    fn weight_outside_unit_interval_rejected() {
        let cfg = DetectorConfig::new().with_syntactic_weight(1.5);
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn threshold_outside_unit_interval_rejected() {
        let cfg = DetectorConfig::new().with_threshold(Some(1.2));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn explicit_gap_tolerance_overrides_window() {
        let cfg = DetectorConfig::new().with_gap_tolerance(Some(3));
        assert_eq!(cfg.effective_gap_tolerance(), 3);
    }

    #[test]
    fn fragment_class_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&FragmentClass::Exact).unwrap(), "\"EXACT\"");
        assert_eq!(
            serde_json::to_string(&FragmentClass::Structural).unwrap(),
            "\"STRUCTURAL\""
        );
    }

    #[test]
    fn confidence_level_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&ConfidenceLevel::Low).unwrap(), "\"LOW\"");
        assert_eq!(
            serde_json::to_string(&ConfidenceLevel::VeryHigh).unwrap(),
            "\"VERY_HIGH\""
        );
    }

    #[test]
    fn confidence_levels_are_ordered() {
        assert!(ConfidenceLevel::Low < ConfidenceLevel::Medium);
        assert!(ConfidenceLevel::High < ConfidenceLevel::VeryHigh);
    }

    #[test]
    fn line_range_counts_inclusively() {
        let r = LineRange::new(3, 5);
        assert_eq!(r.count, 3);
        let single = LineRange::new(7, 7);
        assert_eq!(single.count, 1);
    }

    #[test]
    fn degenerate_line_range_clamps_end() {
        let r = LineRange::new(9, 4);
        assert_eq!(r.end, 9);
        assert_eq!(r.count, 1);
    }

    #[test]
    fn token_range_counts_inclusively() {
        let r = TokenRange::new(10, 17);
        assert_eq!(r.tokens, 8);
    }
}
