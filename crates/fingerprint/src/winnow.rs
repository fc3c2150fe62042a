//! Winnowing fingerprint selection via monotonic deque, O(n).
//!
//! Implements the Schleimer–Wilkerson–Aiken rule: in every window of `w`
//! consecutive k-gram hashes, select the minimum; on ties, the rightmost
//! minimum in the window; a position already selected from the previous
//! window is not emitted again. The guarantee this buys: if two files share
//! any run of at least `k + w - 1` matching tokens, at least one common
//! fingerprint is selected from that region.

use std::collections::VecDeque;

use crate::fingerprint::SelectedFingerprint;

/// Select fingerprints from a k-gram hash sequence.
///
/// Deterministic for a given hash sequence and window size; output is in
/// position order. A window larger than the sequence degenerates to the
/// single global (rightmost) minimum.
pub fn winnow(hashes: &[u64], w: usize) -> Vec<SelectedFingerprint> {
    let n = hashes.len();
    if n == 0 {
        return Vec::new();
    }

    let window = w.max(1);
    if window >= n {
        let mut min_idx = 0;
        let mut min_val = hashes[0];
        for (idx, &val) in hashes.iter().enumerate().skip(1) {
            if val <= min_val {
                min_val = val;
                min_idx = idx;
            }
        }
        return vec![SelectedFingerprint {
            hash: min_val,
            position: min_idx,
        }];
    }

    let mut out = Vec::with_capacity(n - window + 1);
    // Indices in the current window, hashes strictly increasing front to back.
    let mut dq: VecDeque<usize> = VecDeque::with_capacity(window);
    let mut last_picked: Option<usize> = None;

    // Popping `>=` from the back makes the rightmost of equal minima win.
    let push = |dq: &mut VecDeque<usize>, i: usize, vals: &[u64]| {
        while let Some(&j) = dq.back() {
            if vals[i] <= vals[j] {
                dq.pop_back();
            } else {
                break;
            }
        }
        dq.push_back(i);
    };

    let emit = |dq: &VecDeque<usize>,
                out: &mut Vec<SelectedFingerprint>,
                last: &mut Option<usize>,
                vals: &[u64]| {
        if let Some(&idx) = dq.front() {
            if *last != Some(idx) {
                out.push(SelectedFingerprint {
                    hash: vals[idx],
                    position: idx,
                });
                *last = Some(idx);
            }
        }
    };

    for i in 0..window {
        push(&mut dq, i, hashes);
    }
    emit(&dq, &mut out, &mut last_picked, hashes);

    for i in window..n {
        let left = i - window + 1;
        while let Some(&j) = dq.front() {
            if j < left {
                dq.pop_front();
            } else {
                break;
            }
        }
        push(&mut dq, i, hashes);
        emit(&dq, &mut out, &mut last_picked, hashes);
    }

    out
}
