//! Fragment scoring, classification, and verdict thresholds.

use crate::types::{ConfidenceLevel, FragmentClass};

/// Per-fragment confidence in [0, 1].
///
/// Three summands reward absolute size, pair density, and coherence:
/// `0.4·min(1, T/50) + 0.3·min(1, 0.1·P) + 0.3·min(1, P/max(1, R))` where
/// `T` is the shared token count, `P` the shared fingerprint count, and `R`
/// the covered k-gram range.
pub fn fragment_confidence(shared_tokens: usize, shared_fingerprints: usize, kgram_span: usize) -> f64 {
    let size = (shared_tokens as f64 / 50.0).min(1.0);
    let density = (0.1 * shared_fingerprints as f64).min(1.0);
    let coherence = (shared_fingerprints as f64 / kgram_span.max(1) as f64).min(1.0);
    (0.4 * size + 0.3 * density + 0.3 * coherence).min(1.0)
}

/// Classify a fragment by its confidence.
pub fn classify(confidence: f64) -> FragmentClass {
    if confidence >= 0.8 {
        FragmentClass::Exact
    } else if confidence >= 0.6 {
        FragmentClass::Similar
    } else {
        FragmentClass::Structural
    }
}

/// Local similarity of a fragment: fingerprints per expected k-gram.
pub fn local_similarity(shared_fingerprints: usize, shared_tokens: usize, k: usize) -> f64 {
    let expected = (shared_tokens as f64 / k.max(1) as f64).max(1.0);
    (shared_fingerprints as f64 / expected).min(1.0)
}

/// Adaptive decision threshold on the overall similarity.
///
/// Stronger evidence (higher similarity with more surviving fragments) earns
/// a stricter threshold; weak evidence falls back to 0.3. Rows are checked
/// most-specific first.
pub fn adaptive_threshold(similarity: f64, significant_fragments: usize) -> f64 {
    if similarity > 0.8 && significant_fragments > 5 {
        0.7
    } else if similarity > 0.6 && significant_fragments > 3 {
        0.5
    } else if similarity > 0.4 && significant_fragments > 1 {
        0.35
    } else {
        0.3
    }
}

/// Batch-adaptive threshold: `clamp(mean + 1.5·stddev, 0.25, 0.8)` over the
/// batch's overall similarities.
pub fn batch_threshold(similarities: &[f64]) -> f64 {
    if similarities.is_empty() {
        return 0.25;
    }
    let n = similarities.len() as f64;
    let mean = similarities.iter().sum::<f64>() / n;
    let variance = similarities
        .iter()
        .map(|s| {
            let d = s - mean;
            d * d
        })
        .sum::<f64>()
        / n;
    (mean + 1.5 * variance.sqrt()).clamp(0.25, 0.8)
}

/// Derive the four-level confidence label from an additive evidence score.
#[allow(clippy::too_many_arguments)]
pub fn confidence_level(
    overall_similarity: f64,
    syntactic_similarity: f64,
    longest_fragment_tokens: usize,
    coverage1: f64,
    coverage2: f64,
    significant_fragments: usize,
    total_shared_lines: u32,
) -> ConfidenceLevel {
    let mut score = similarity_bucket(overall_similarity);
    if syntactic_similarity >= 0.7 {
        score += 1;
    }
    if longest_fragment_tokens > 10 {
        score += 1;
    }
    if coverage1 > 0.5 || coverage2 > 0.5 {
        score += 1;
    }
    if significant_fragments > 5 {
        score += 1;
    }
    if total_shared_lines > 20 {
        score += 1;
    }

    if score >= 8 {
        ConfidenceLevel::VeryHigh
    } else if score >= 6 {
        ConfidenceLevel::High
    } else if score >= 4 {
        ConfidenceLevel::Medium
    } else {
        ConfidenceLevel::Low
    }
}

fn similarity_bucket(similarity: f64) -> u32 {
    if similarity >= 0.9 {
        4
    } else if similarity >= 0.7 {
        3
    } else if similarity >= 0.5 {
        2
    } else if similarity >= 0.3 {
        1
    } else {
        0
    }
}
