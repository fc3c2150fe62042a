//! Pasim Fingerprinting
//!
//! Given a normalised token stream, this crate produces the sparse,
//! noise-resistant fingerprint set the similarity engine compares. Two files
//! that share a run of tokens are guaranteed to share selected fingerprints
//! from that run.
//!
//! ## What you need to know
//!
//! - We only take normalised tokens. Don't send raw source here.
//! - Pure function: same input = same output. No I/O, no randomness.
//!
//! ## The pipeline (two stages)
//!
//! 1. **K-gram hashing** - Slide a window of k tokens over the stream and
//!    hash each window to a 64-bit value. Captures local structure while a
//!    single coincidental token stays invisible.
//!
//! 2. **Winnowing** - Pick the minimum hash from each sliding window of w
//!    k-gram hashes (rightmost on ties, no repeats). Keeps an expected
//!    2/(w+1) of the hashes while guaranteeing every shared run of
//!    `k + w - 1` tokens leaves at least one common fingerprint.
//!
//! ## Quick example
//!
//! ```
//! use fingerprint::{fingerprint_tokens, FingerprintConfig};
//!
//! let tokens = vec![
//!     "program", "ident", ";", "begin", "ident", ":=", "num", ";",
//!     "ident", "(", "ident", ")", ";", "end", ".",
//! ];
//! let config = FingerprintConfig::default();
//!
//! let fp = fingerprint_tokens(&tokens, &config).unwrap();
//!
//! assert!(!fp.is_empty());
//! assert_eq!(fp.meta.k, 8);
//! ```

mod config;
mod fingerprint;
mod kgram;
mod winnow;

pub use crate::config::{FingerprintConfig, FingerprintError};
pub use crate::fingerprint::{FileFingerprint, FingerprintMeta, SelectedFingerprint};
pub use crate::kgram::kgram_hashes;
pub use crate::winnow::winnow;

/// Current fingerprint algorithm version for this crate.
pub const FINGERPRINT_VERSION: u16 = 1;

/// Human-readable algorithm identifier.
pub const FINGERPRINT_ALGORITHM: &str = "xxh3+rollpoly+minwin_v1";

/// Compute a file fingerprint (k-gram hash → winnow).
///
/// The `tokens` slice must contain normalised tokens in their original order.
/// A stream shorter than `k` is not an error: it simply yields an empty
/// selection, and the engine reports such files as sharing nothing.
///
/// The returned selection is sorted by `(hash, position)`; the winnowing
/// guarantee and all pair metrics are order-independent, and the sorted form
/// makes output stable for storage and comparison.
pub fn fingerprint_tokens<S>(
    tokens: &[S],
    cfg: &FingerprintConfig,
) -> Result<FileFingerprint, FingerprintError>
where
    S: AsRef<str>,
{
    cfg.validate()?;

    let hashes = kgram_hashes(tokens, cfg.k, cfg.seed);
    let mut selected = winnow(&hashes, cfg.window);
    selected.sort_unstable_by_key(|s| (s.hash, s.position));

    Ok(FileFingerprint {
        selected,
        meta: FingerprintMeta {
            algorithm_version: FINGERPRINT_VERSION,
            algorithm: FINGERPRINT_ALGORITHM.to_string(),
            k: cfg.k,
            window: cfg.window,
            seed: cfg.seed,
            kgram_count: hashes.len(),
            config_version: cfg.version,
        },
    })
}
