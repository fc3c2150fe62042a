//! Fragment reconstruction and source-coordinate lifting.
//!
//! Winnowing leaves sparse matches; this module collapses a sorted
//! shared-k-gram list into contiguous fragments and lifts each surviving
//! fragment back to token ranges, line ranges, and source snippets.

use index::SharedKGram;
use ingest::SourceFile;
use lexer::TokenizedFile;

use crate::score::{classify, fragment_confidence, local_similarity};
use crate::types::{Fragment, LineRange, MappedFragment, TokenRange};

/// Greedily cluster shared k-grams into fragments.
///
/// Input must be sorted by `(left, right)`. A shared k-gram extends the
/// current fragment when both sides advance by at most `gap_tolerance`
/// without going backwards, and its offset stays within `drift_tolerance` of
/// the fragment's first pair. The drift band rejects coincidental
/// interleavings of common boilerplate while tolerating small edits.
/// Fragments with fewer than `min_occurrences` pairs are discarded.
pub fn build_fragments(
    shared: &[SharedKGram],
    gap_tolerance: usize,
    drift_tolerance: usize,
    min_occurrences: usize,
) -> Vec<Fragment> {
    let mut fragments = Vec::new();
    let mut iter = shared.iter().copied();
    let Some(first) = iter.next() else {
        return fragments;
    };

    let mut current = seed(first);
    let mut base_offset = first.offset();

    for s in iter {
        let left_gap = s.left.saturating_sub(current.left_to);
        let right_ok = s.right >= current.right_to
            && s.right - current.right_to <= gap_tolerance;
        let drift_ok = (s.offset() - base_offset).unsigned_abs() <= drift_tolerance;

        if left_gap <= gap_tolerance && right_ok && drift_ok {
            current.left_to = s.left;
            current.right_to = s.right;
            current.pairs.push(s);
        } else {
            fragments.push(current);
            current = seed(s);
            base_offset = s.offset();
        }
    }
    fragments.push(current);

    fragments.retain(|f| f.pairs.len() >= min_occurrences);
    fragments
}

fn seed(s: SharedKGram) -> Fragment {
    Fragment {
        left_from: s.left,
        left_to: s.left,
        right_from: s.right,
        right_to: s.right,
        pairs: vec![s],
    }
}

/// Lift a fragment to source coordinates on both sides.
pub(crate) fn map_fragment(
    fragment_id: u32,
    fragment: &Fragment,
    k: usize,
    left_tokens: &TokenizedFile,
    right_tokens: &TokenizedFile,
    left_source: &SourceFile,
    right_source: &SourceFile,
) -> MappedFragment {
    let file1_token_range = token_range(fragment.left_from, fragment.left_to, k, left_tokens);
    let file2_token_range = token_range(fragment.right_from, fragment.right_to, k, right_tokens);

    let file1_lines = line_range(&file1_token_range, left_tokens);
    let file2_lines = line_range(&file2_token_range, right_tokens);

    let shared_tokens: Vec<String> = left_tokens.tokens
        [file1_token_range.start..=file1_token_range.end]
        .iter()
        .map(|t| t.text.clone())
        .collect();

    let shared_fingerprints = fragment.pairs.len();
    let kgram_span = fragment.left_to - fragment.left_from + 1;
    let confidence = fragment_confidence(shared_tokens.len(), shared_fingerprints, kgram_span);

    let (file1_code_snippet, file1_code_with_line_numbers) =
        render_snippets(left_source, &file1_lines);
    let (file2_code_snippet, file2_code_with_line_numbers) =
        render_snippets(right_source, &file2_lines);

    MappedFragment {
        fragment_id,
        confidence,
        fragment_type: classify(confidence),
        file1_lines,
        file2_lines,
        file1_token_range,
        file2_token_range,
        token_pattern: token_pattern(&shared_tokens),
        local_similarity: local_similarity(shared_fingerprints, shared_tokens.len(), k),
        shared_tokens,
        file1_code_snippet,
        file2_code_snippet,
        file1_code_with_line_numbers,
        file2_code_with_line_numbers,
        shared_fingerprints,
    }
}

/// Extend a k-gram range to the inclusive token range it covers.
fn token_range(from: usize, to: usize, k: usize, tokens: &TokenizedFile) -> TokenRange {
    let last_token = tokens.len().saturating_sub(1);
    let start = from.min(last_token);
    let end = (to + k - 1).min(last_token);
    TokenRange::new(start, end)
}

/// Lift a token range to 1-based source lines, clamped to the file.
fn line_range(range: &TokenRange, tokens: &TokenizedFile) -> LineRange {
    let max_line = tokens.line_count.max(1);
    let start = tokens.line_of(range.start).clamp(1, max_line);
    let end = tokens.line_of(range.end).clamp(1, max_line);
    LineRange::new(start, end)
}

fn render_snippets(source: &SourceFile, lines: &LineRange) -> (String, String) {
    let slice = source.lines_in(lines.start, lines.end);
    let plain = slice.join("\n");
    let numbered = slice
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{:<3}: {line}", lines.start + i as u32))
        .collect::<Vec<_>>()
        .join("\n");
    (plain, numbered)
}

/// Render the shared token stream; long streams elide the middle.
pub(crate) fn token_pattern(tokens: &[String]) -> String {
    if tokens.len() <= 20 {
        return tokens.join(" ");
    }
    let head = tokens[..10].join(" ");
    let tail = tokens[tokens.len() - 10..].join(" ");
    format!("{head} ... {tail}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kg(left: usize, right: usize) -> SharedKGram {
        SharedKGram {
            hash: (left * 1000 + right) as u64,
            left,
            right,
        }
    }

    #[test]
    fn empty_input_builds_nothing() {
        assert!(build_fragments(&[], 15, 1, 1).is_empty());
    }

    #[test]
    fn single_pair_builds_single_fragment() {
        let frags = build_fragments(&[kg(4, 4)], 15, 1, 1);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].left_from, 4);
        assert_eq!(frags[0].left_to, 4);
        assert_eq!(frags[0].pairs.len(), 1);
    }

    #[test]
    fn co_running_pairs_merge() {
        // Constant offset, gaps within tolerance.
        let shared = [kg(0, 5), kg(7, 12), kg(15, 20), kg(22, 27)];
        let frags = build_fragments(&shared, 15, 1, 1);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].left_from, 0);
        assert_eq!(frags[0].left_to, 22);
        assert_eq!(frags[0].right_from, 5);
        assert_eq!(frags[0].right_to, 27);
        assert_eq!(frags[0].pairs.len(), 4);
    }

    #[test]
    fn large_gap_splits_fragments() {
        let shared = [kg(0, 0), kg(5, 5), kg(50, 50), kg(55, 55)];
        let frags = build_fragments(&shared, 15, 1, 1);
        assert_eq!(frags.len(), 2);
        assert_eq!(frags[0].left_to, 5);
        assert_eq!(frags[1].left_from, 50);
    }

    #[test]
    fn offset_drift_splits_fragments() {
        // Second run has drifted by 30 positions: a reordered copy, not a
        // continuation.
        let shared = [kg(0, 0), kg(7, 7), kg(14, 44)];
        let frags = build_fragments(&shared, 50, 1, 1);
        assert_eq!(frags.len(), 2);
    }

    #[test]
    fn small_drift_tolerated() {
        // One token inserted on the right between the fingerprints.
        let shared = [kg(0, 0), kg(7, 8)];
        let frags = build_fragments(&shared, 15, 1, 1);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].pairs.len(), 2);
    }

    #[test]
    fn right_side_going_backwards_splits() {
        let shared = [kg(0, 20), kg(7, 3)];
        let frags = build_fragments(&shared, 15, 1, 1);
        assert_eq!(frags.len(), 2);
    }

    #[test]
    fn min_occurrences_filters_small_fragments() {
        let shared = [kg(0, 0), kg(7, 7), kg(60, 60)];
        let frags = build_fragments(&shared, 15, 1, 2);
        assert_eq!(frags.len(), 1);
        assert_eq!(frags[0].pairs.len(), 2);
    }

    #[test]
    fn drift_measured_against_first_pair() {
        // Offsets 0, +1, +2: each step is small but the third pair is outside
        // the ±1 band of the fragment's first pair.
        let shared = [kg(0, 0), kg(5, 6), kg(10, 12)];
        let frags = build_fragments(&shared, 15, 1, 1);
        assert_eq!(frags.len(), 2);
    }

    #[test]
    fn token_pattern_short_streams_join() {
        let tokens: Vec<String> = ["begin", "ident", ":=", "num"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(token_pattern(&tokens), "begin ident := num");
    }

    #[test]
    fn token_pattern_long_streams_elide() {
        let tokens: Vec<String> = (0..30).map(|i| format!("t{i}")).collect();
        let pattern = token_pattern(&tokens);
        assert!(pattern.starts_with("t0 t1"));
        assert!(pattern.contains(" ... "));
        assert!(pattern.ends_with("t28 t29"));
    }
}
