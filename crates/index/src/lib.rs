//! # Pasim Fingerprint Index
//!
//! An inverted index from k-gram hash to the files and positions where that
//! hash was selected by winnowing, plus the pairwise shared-fingerprint
//! extraction the similarity engine is built on.
//!
//! ## Usage pattern
//!
//! The index has two phases. During the **ingest phase** files are registered
//! one by one with [`FingerprintIndex::add_file`]; each call returns the
//! [`FileId`] later queries refer to. During the **query phase** the index is
//! read-only: [`shared`](FingerprintIndex::shared) and
//! [`pair`](FingerprintIndex::pair) take `&self` and may be called freely
//! from parallel workers.
//!
//! Build cost is linear in the total number of selected fingerprints; pair
//! extraction is output-sensitive, proportional to the shared-hash count.
//!
//! ## Example
//!
//! ```
//! use fingerprint::{fingerprint_tokens, FingerprintConfig};
//! use index::FingerprintIndex;
//!
//! let cfg = FingerprintConfig::default().with_k(2).with_window(2);
//! let tokens = ["begin", "ident", ":=", "num", ";", "end"];
//!
//! let fp_a = fingerprint_tokens(&tokens, &cfg).unwrap();
//! let fp_b = fingerprint_tokens(&tokens, &cfg).unwrap();
//!
//! let mut index = FingerprintIndex::new();
//! let a = index.add_file(&fp_a);
//! let b = index.add_file(&fp_b);
//!
//! let pair = index.pair(a, b).unwrap();
//! assert!(pair.similarity > 0.99); // identical files fully overlap
//! assert!(index.pair(a, a).is_err()); // self-pairing is rejected
//! ```

mod pair;

pub use crate::pair::{PairAnalysis, SharedKGram};

use fingerprint::FileFingerprint;
use hashbrown::HashMap;
use thiserror::Error;

/// Identifier assigned to a file when it is added to the index.
pub type FileId = usize;

/// One selected fingerprint occurrence inside the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurrence {
    pub file: FileId,
    pub position: usize,
}

/// Errors produced by the index layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IndexError {
    /// A file cannot be paired with itself; batch callers must deduplicate.
    #[error("file {file} cannot be paired with itself")]
    SelfPair { file: FileId },

    /// The file id was never returned by `add_file`.
    #[error("unknown file id {file}")]
    UnknownFile { file: FileId },
}

#[derive(Debug, Default, Clone)]
struct FileEntry {
    /// Selected fingerprints as `(hash, position)`, in the fingerprint's
    /// stored `(hash, position)` order.
    selected: Vec<(u64, usize)>,
}

/// Inverted fingerprint index over a batch of files.
///
/// Write-exclusive while files are added, read-shared afterwards. The index
/// never pairs a file with itself and holds no references into the
/// fingerprints it was built from.
#[derive(Debug, Default, Clone)]
pub struct FingerprintIndex {
    inverted: HashMap<u64, Vec<Occurrence>>,
    files: Vec<FileEntry>,
}

impl FingerprintIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file's selected fingerprints and return its id.
    pub fn add_file(&mut self, fp: &FileFingerprint) -> FileId {
        let file = self.files.len();
        let mut entry = FileEntry {
            selected: Vec::with_capacity(fp.selected.len()),
        };
        for s in &fp.selected {
            entry.selected.push((s.hash, s.position));
            self.inverted
                .entry(s.hash)
                .or_default()
                .push(Occurrence {
                    file,
                    position: s.position,
                });
        }
        self.files.push(entry);
        file
    }

    /// Number of registered files.
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of distinct hashes in the index.
    pub fn hash_count(&self) -> usize {
        self.inverted.len()
    }

    /// Number of selected fingerprints registered for a file.
    pub fn selected_count(&self, file: FileId) -> Result<usize, IndexError> {
        self.files
            .get(file)
            .map(|f| f.selected.len())
            .ok_or(IndexError::UnknownFile { file })
    }

    /// All shared k-grams between two files, sorted by `(left, right)`.
    ///
    /// For every hash selected in both files the full cross product of
    /// positions is enumerated, so repeated code inside one file yields one
    /// entry per position pairing.
    pub fn shared(&self, left: FileId, right: FileId) -> Result<Vec<SharedKGram>, IndexError> {
        if left == right {
            return Err(IndexError::SelfPair { file: left });
        }
        let left_entry = self.files.get(left).ok_or(IndexError::UnknownFile { file: left })?;
        if right >= self.files.len() {
            return Err(IndexError::UnknownFile { file: right });
        }

        let mut shared = Vec::new();
        for &(hash, left_pos) in &left_entry.selected {
            let bucket = self.inverted.get(&hash);
            debug_assert!(
                bucket.is_some(),
                "hash {hash:#x} registered for file {left} is missing from the inverted index"
            );
            let Some(bucket) = bucket else { continue };
            for occ in bucket {
                if occ.file == right {
                    shared.push(SharedKGram {
                        hash,
                        left: left_pos,
                        right: occ.position,
                    });
                }
            }
        }

        shared.sort_unstable_by_key(|s| (s.left, s.right));
        Ok(shared)
    }

    /// Full pair analysis for `(left, right)`.
    pub fn pair(&self, left: FileId, right: FileId) -> Result<PairAnalysis, IndexError> {
        let shared = self.shared(left, right)?;
        let left_total = self.files[left].selected.len();
        let right_total = self.files[right].selected.len();
        Ok(PairAnalysis::from_shared(
            left, right, shared, left_total, right_total,
        ))
    }
}
