//! Rolling-hash k-grams over a normalised token stream.
//!
//! Each token is hashed individually with seeded xxh3, then a rolling
//! polynomial hash combines every window of `k` token hashes in O(n) total.
//! The result is deterministic and platform-independent: all arithmetic is
//! wrapping 64-bit.

use xxhash_rust::xxh3::xxh3_64_with_seed;

/// Fixed odd multiplier for the polynomial hash.
const BASE: u64 = 0x0000_0100_0000_01B3;

/// Compute the `n - k + 1` k-gram hashes of a token stream.
///
/// The caller must provide **normalised tokens in order**; this function does
/// no tokenisation of its own. Returns an empty vector when `k == 0` or the
/// stream is shorter than `k`.
pub fn kgram_hashes<S: AsRef<str>>(tokens: &[S], k: usize, seed: u64) -> Vec<u64> {
    let n = tokens.len();
    if k == 0 || n < k {
        return Vec::new();
    }

    // Hash each token individually first.
    let mut th: Vec<u64> = Vec::with_capacity(n);
    th.extend(
        tokens
            .iter()
            .map(|t| xxh3_64_with_seed(t.as_ref().as_bytes(), seed)),
    );

    // Precompute base^(k-1) for removal of the oldest element in the window.
    let mut base_km1 = 1u64;
    for _ in 1..k {
        base_km1 = base_km1.wrapping_mul(BASE);
    }

    let mut out = Vec::with_capacity(n - k + 1);
    let mut h = 0u64;
    for &val in th.iter().take(k) {
        h = h.wrapping_mul(BASE).wrapping_add(val);
    }
    out.push(h);

    // Slide the window over the rest of the tokens, updating in O(1) per step.
    for (&old, &new) in th.iter().zip(th.iter().skip(k)) {
        h = h.wrapping_sub(old.wrapping_mul(base_km1));
        h = h.wrapping_mul(BASE).wrapping_add(new);
        out.push(h);
    }
    out
}
