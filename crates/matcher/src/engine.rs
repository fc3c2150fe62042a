//! The detection engine: single-pair and batch analysis.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use fingerprint::{fingerprint_tokens, FileFingerprint, FingerprintConfig};
use index::{FileId, FingerprintIndex, PairAnalysis};
use ingest::SourceFile;
use lexer::{lex, LexConfig, TokenizedFile};
use rayon::prelude::*;

use crate::fragments::{build_fragments, map_fragment};
use crate::metrics::metrics_recorder;
use crate::score::{adaptive_threshold, batch_threshold, confidence_level};
use crate::types::{
    BatchResult, ConfidenceLevel, DetectorConfig, MappedFragment, MatchError, PlagiarismResult,
};


/// A file lexed and fingerprinted, ready for pairing.
struct Prepared {
    tokens: TokenizedFile,
    fp: FileFingerprint,
}

/// Plagiarism detector over Pascal source files.
///
/// The engine is pure and side-effect free: every detection is a function of
/// the input files and the construction-time configuration. A single
/// `Detector` may be shared freely across threads.
#[derive(Debug)]
pub struct Detector {
    cfg: DetectorConfig,
    lex_cfg: LexConfig,
}

impl Detector {
    /// Construct a detector. Invalid parameters are fatal here, never at
    /// detection time.
    pub fn new(cfg: DetectorConfig) -> Result<Self, MatchError> {
        cfg.validate()?;
        Ok(Self {
            cfg,
            lex_cfg: LexConfig::default(),
        })
    }

    /// Replace the lexer configuration.
    pub fn with_lex_config(mut self, lex_cfg: LexConfig) -> Self {
        self.lex_cfg = lex_cfg;
        self
    }

    /// The engine configuration.
    pub fn config(&self) -> &DetectorConfig {
        &self.cfg
    }

    fn fingerprint_config(&self) -> FingerprintConfig {
        FingerprintConfig::new()
            .with_k(self.cfg.kgram_size)
            .with_window(self.cfg.window_size)
            .with_seed(self.cfg.seed)
    }

    /// Lex and fingerprint one file. `None` means the file is unanalyzable
    /// (malformed source or no tokens); its pairs degrade to zero results.
    fn prepare(&self, source: &SourceFile) -> Result<Option<Prepared>, MatchError> {
        let tokens = match lex(&source.name, &source.text, &self.lex_cfg) {
            Ok(t) => t,
            Err(_) => return Ok(None),
        };
        if tokens.is_empty() {
            return Ok(None);
        }
        let texts: Vec<&str> = tokens.texts().collect();
        let fp = fingerprint_tokens(&texts, &self.fingerprint_config())
            .map_err(|e| MatchError::Fingerprint(e.to_string()))?;
        Ok(Some(Prepared { tokens, fp }))
    }

    /// Compare two source files.
    ///
    /// Lex failures and empty files do not fail the call: the pair is
    /// reported with zero similarity and no fragments.
    pub fn detect(
        &self,
        left: &SourceFile,
        right: &SourceFile,
    ) -> Result<PlagiarismResult, MatchError> {
        self.detect_with(left, right, None, None)
    }

    /// [`detect`](Self::detect) with per-call `threshold` and
    /// `min_occurrences` overrides; `None` falls back to the construction
    /// config (and, for the threshold, to the adaptive table).
    pub fn detect_with(
        &self,
        left: &SourceFile,
        right: &SourceFile,
        threshold: Option<f64>,
        min_occurrences: Option<usize>,
    ) -> Result<PlagiarismResult, MatchError> {
        let started = Instant::now();
        let threshold = threshold.or(self.cfg.threshold);
        let min_occurrences = min_occurrences.unwrap_or(self.cfg.min_occurrences);
        let result = match (self.prepare(left)?, self.prepare(right)?) {
            (Some(l), Some(r)) => {
                let mut index = FingerprintIndex::new();
                let a = index.add_file(&l.fp);
                let b = index.add_file(&r.fp);
                self.compare(
                    &index,
                    a,
                    b,
                    &l,
                    &r,
                    left,
                    right,
                    threshold,
                    min_occurrences,
                    started,
                )?
            }
            _ => zero_result(&left.name, &right.name, started),
        };

        if let Some(recorder) = metrics_recorder() {
            recorder.record_detection(
                &left.name,
                &right.name,
                started.elapsed(),
                result.mapped_fragments.len(),
            );
        }
        Ok(result)
    }

    /// Compare every unordered pair in a batch.
    pub fn detect_batch(&self, files: &[SourceFile]) -> Result<BatchResult, MatchError> {
        self.detect_batch_with(files, None, None, None)
    }

    /// Batch detection with per-call `threshold` / `min_occurrences`
    /// overrides and cooperative cancellation.
    ///
    /// The ingest phase (lex + fingerprint + index build) runs first; the
    /// query phase evaluates pairs in parallel against the then-immutable
    /// index. The cancel flag is consulted between pair evaluations only, so
    /// an abandoned batch leaks no state.
    pub fn detect_batch_with(
        &self,
        files: &[SourceFile],
        threshold: Option<f64>,
        min_occurrences: Option<usize>,
        cancel: Option<&AtomicBool>,
    ) -> Result<BatchResult, MatchError> {
        let started = Instant::now();

        let prepared: Vec<Option<Prepared>> = files
            .par_iter()
            .map(|f| self.prepare(f))
            .collect::<Result<_, _>>()?;

        let mut index = FingerprintIndex::new();
        let ids: Vec<Option<FileId>> = prepared
            .iter()
            .map(|p| p.as_ref().map(|p| index.add_file(&p.fp)))
            .collect();

        let pair_indices: Vec<(usize, usize)> = (0..files.len())
            .flat_map(|i| ((i + 1)..files.len()).map(move |j| (i, j)))
            .collect();

        let override_threshold = threshold.or(self.cfg.threshold);
        let min_occurrences = min_occurrences.unwrap_or(self.cfg.min_occurrences);
        let mut results: Vec<PlagiarismResult> = pair_indices
            .par_iter()
            .map(|&(i, j)| -> Result<Option<PlagiarismResult>, MatchError> {
                if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                    return Ok(None);
                }
                let pair_started = Instant::now();
                match (&prepared[i], &prepared[j], ids[i], ids[j]) {
                    (Some(l), Some(r), Some(a), Some(b)) => Ok(Some(self.compare(
                        &index,
                        a,
                        b,
                        l,
                        r,
                        &files[i],
                        &files[j],
                        override_threshold,
                        min_occurrences,
                        pair_started,
                    )?)),
                    _ => Ok(Some(zero_result(
                        &files[i].name,
                        &files[j].name,
                        pair_started,
                    ))),
                }
            })
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .flatten()
            .collect();

        if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
            return Err(MatchError::Cancelled);
        }

        results.sort_by(|a, b| {
            b.overall_similarity
                .partial_cmp(&a.overall_similarity)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| (&a.file1, &a.file2).cmp(&(&b.file1, &b.file2)))
        });

        let similarities: Vec<f64> = results.iter().map(|r| r.overall_similarity).collect();
        let threshold = override_threshold.unwrap_or_else(|| batch_threshold(&similarities));
        let suspicious_pairs = results
            .iter()
            .filter(|r| r.overall_similarity >= threshold)
            .count();

        Ok(BatchResult {
            total_comparisons: results.len(),
            results,
            threshold,
            suspicious_pairs,
            processing_time: started.elapsed().as_millis() as u64,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn compare(
        &self,
        index: &FingerprintIndex,
        a: FileId,
        b: FileId,
        left: &Prepared,
        right: &Prepared,
        left_source: &SourceFile,
        right_source: &SourceFile,
        threshold_override: Option<f64>,
        min_occurrences: usize,
        started: Instant,
    ) -> Result<PlagiarismResult, MatchError> {
        let pair = index.pair(a, b)?;
        let k = self.cfg.kgram_size;

        let fragments = build_fragments(
            &pair.shared,
            self.cfg.effective_gap_tolerance(),
            self.cfg.drift_tolerance,
            min_occurrences,
        );

        let mapped: Vec<MappedFragment> = fragments
            .iter()
            .enumerate()
            .map(|(i, f)| {
                map_fragment(
                    i as u32 + 1,
                    f,
                    k,
                    &left.tokens,
                    &right.tokens,
                    left_source,
                    right_source,
                )
            })
            .collect();

        let significant: Vec<&MappedFragment> = mapped
            .iter()
            .filter(|m| m.confidence >= 0.3 && m.shared_tokens.len() >= k)
            .collect();

        let longest_fragment = fragments
            .iter()
            .map(|f| f.left_to - f.left_from + k)
            .max()
            .unwrap_or(0);

        let syntactic_similarity = pair.similarity;
        let overall_similarity = (self.cfg.syntactic_weight * syntactic_similarity).clamp(0.0, 1.0);

        let significant_count = significant.len();
        let total_shared_lines: u32 = significant.iter().map(|m| m.file1_lines.count).sum();
        let total_shared_tokens: usize = significant.iter().map(|m| m.shared_tokens.len()).sum();

        let threshold = threshold_override
            .unwrap_or_else(|| adaptive_threshold(overall_similarity, significant_count));
        let coverage1 = pair.left_coverage();
        let coverage2 = pair.right_coverage();

        let confidence = confidence_level(
            overall_similarity,
            syntactic_similarity,
            longest_fragment,
            coverage1,
            coverage2,
            significant_count,
            total_shared_lines,
        );

        Ok(PlagiarismResult {
            syntactic_similarity,
            overall_similarity,
            shared_fragments: pair.overlap,
            longest_fragment,
            coverage1,
            coverage2,
            total_mapped_fragments: mapped.len(),
            significant_mapped_fragments: significant_count,
            mapped_fragments: mapped,
            total_shared_lines,
            total_shared_tokens,
            is_plagiarism: overall_similarity >= threshold,
            confidence,
            file1: left_source.name.clone(),
            file2: right_source.name.clone(),
            processing_time: started.elapsed().as_millis() as u64,
        })
    }

    /// Shared-fingerprint metrics for two files without fragment lifting.
    pub fn pair_analysis(
        &self,
        left: &SourceFile,
        right: &SourceFile,
    ) -> Result<Option<PairAnalysis>, MatchError> {
        match (self.prepare(left)?, self.prepare(right)?) {
            (Some(l), Some(r)) => {
                let mut index = FingerprintIndex::new();
                let a = index.add_file(&l.fp);
                let b = index.add_file(&r.fp);
                Ok(Some(index.pair(a, b)?))
            }
            _ => Ok(None),
        }
    }
}

/// The degraded result for unanalyzable pairs.
fn zero_result(file1: &str, file2: &str, started: Instant) -> PlagiarismResult {
    PlagiarismResult {
        syntactic_similarity: 0.0,
        overall_similarity: 0.0,
        shared_fragments: 0,
        longest_fragment: 0,
        coverage1: 0.0,
        coverage2: 0.0,
        mapped_fragments: Vec::new(),
        total_mapped_fragments: 0,
        significant_mapped_fragments: 0,
        total_shared_lines: 0,
        total_shared_tokens: 0,
        is_plagiarism: false,
        confidence: ConfidenceLevel::Low,
        file1: file1.to_string(),
        file2: file2.to_string(),
        processing_time: started.elapsed().as_millis() as u64,
    }
}
