//! Configuration and error types for fingerprint selection.
//!
//! This module defines the public configuration surface for the fingerprint
//! layer. It is intentionally free of any I/O or environment-dependent
//! behavior so that fingerprinting is a pure function of
//! `(normalised_tokens, config)`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for k-gram hashing and winnowing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FingerprintConfig {
    /// Configuration schema version.
    ///
    /// Any algorithmic change that can affect selected fingerprints must bump
    /// this version so stored results stay comparable.
    pub version: u32,
    /// Number of tokens per k-gram.
    ///
    /// Controls local context sensitivity: larger k suppresses coincidental
    /// matches but tolerates fewer edits inside a match.
    pub k: usize,
    /// Winnowing window size in k-grams.
    ///
    /// Larger windows keep fewer fingerprints. Any shared token run of at
    /// least `k + window - 1` tokens is guaranteed at least one common
    /// selected fingerprint.
    pub window: usize,
    /// Seed for per-token hashing.
    ///
    /// Two runs with the same seed, parameters, and token stream produce
    /// bit-identical fingerprints on every platform.
    pub seed: u64,
}

impl FingerprintConfig {
    /// Create a configuration with the default parameters (k=8, window=15).
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the k-gram size. Must be at least 2.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the winnowing window size. Must be at least 1.
    pub fn with_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the hash seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), FingerprintError> {
        if self.version < 1 {
            return Err(FingerprintError::InvalidConfigVersion {
                version: self.version,
            });
        }
        if self.k < 2 {
            return Err(FingerprintError::InvalidConfigK { k: self.k });
        }
        if self.window < 1 {
            return Err(FingerprintError::InvalidConfigWindow {
                window: self.window,
            });
        }
        Ok(())
    }
}

impl Default for FingerprintConfig {
    fn default() -> Self {
        Self {
            version: 1,
            k: 8,
            window: 15,
            seed: 0xCBF2_9CE4_8422_2325,
        }
    }
}

/// Errors returned by the fingerprinting layer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FingerprintError {
    #[error("invalid config: k must be >= 2 (got {k})")]
    InvalidConfigK { k: usize },

    #[error("invalid config: window must be >= 1 (got {window})")]
    InvalidConfigWindow { window: usize },

    #[error("invalid config version {version}; expected >= 1")]
    InvalidConfigVersion { version: u32 },
}
