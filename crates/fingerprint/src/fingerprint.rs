//! Fingerprint and metadata types for the fingerprint layer.
//!
//! The fingerprint schema and metadata are part of the public contract: any
//! incompatible change must result in a new `algorithm_version`.

use serde::{Deserialize, Serialize};

/// A winnowing-selected fingerprint: a k-gram hash and its k-gram position.
///
/// The position is always a k-gram index into the hash sequence, never a
/// token index; token ranges are derived later by extending with `k - 1`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SelectedFingerprint {
    /// K-gram hash value.
    pub hash: u64,
    /// Index of the k-gram in the file's hash sequence.
    pub position: usize,
}

/// Final fingerprint artifact for one file.
///
/// Produced **only** from a normalised token stream and a
/// [`crate::config::FingerprintConfig`]; no source text or metadata is
/// consulted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileFingerprint {
    /// Selected fingerprints, sorted by `(hash, position)`.
    pub selected: Vec<SelectedFingerprint>,
    /// Metadata describing how the fingerprint was produced.
    pub meta: FingerprintMeta,
}

impl FileFingerprint {
    /// Number of selected fingerprints.
    pub fn len(&self) -> usize {
        self.selected.len()
    }

    /// True when nothing was selected (token stream shorter than k).
    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }
}

/// Metadata for traceability and determinism.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FingerprintMeta {
    /// Fingerprint algorithm version; bumped whenever the effective algorithm
    /// (k-gram hashing or winnowing) changes in a way that can affect output.
    pub algorithm_version: u16,
    /// Human-readable algorithm identifier.
    pub algorithm: String,
    /// K-gram length in tokens.
    pub k: usize,
    /// Winnowing window size.
    pub window: usize,
    /// Hash seed used for token hashing.
    pub seed: u64,
    /// Number of k-gram hashes the file produced before selection.
    pub kgram_count: usize,
    /// Configuration schema version supplied when fingerprinting.
    pub config_version: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_fingerprint_serde_roundtrip() {
        let fp = SelectedFingerprint {
            hash: 987654321,
            position: 100,
        };
        let json = serde_json::to_string(&fp).unwrap();
        let back: SelectedFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }

    #[test]
    fn file_fingerprint_len_and_empty() {
        let fp = FileFingerprint {
            selected: vec![SelectedFingerprint { hash: 1, position: 0 }],
            meta: FingerprintMeta {
                algorithm_version: 1,
                algorithm: "test".to_string(),
                k: 8,
                window: 15,
                seed: 42,
                kgram_count: 10,
                config_version: 1,
            },
        };
        assert_eq!(fp.len(), 1);
        assert!(!fp.is_empty());
    }

    #[test]
    fn file_fingerprint_serde_roundtrip() {
        let fp = FileFingerprint {
            selected: vec![
                SelectedFingerprint { hash: 2, position: 1 },
                SelectedFingerprint { hash: 5, position: 9 },
            ],
            meta: FingerprintMeta {
                algorithm_version: 1,
                algorithm: "xxh3+rollpoly+minwin_v1".to_string(),
                k: 8,
                window: 15,
                seed: 0xCBF2_9CE4_8422_2325,
                kgram_count: 40,
                config_version: 1,
            },
        };
        let json = serde_json::to_string(&fp).unwrap();
        let back: FileFingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(fp, back);
    }
}
