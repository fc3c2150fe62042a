//! YAML Configuration File Support
//!
//! This module provides support for loading pasim pipeline configurations
//! from YAML files. It allows users to define all stage configurations
//! (ingest, lexer, fingerprint, detector) in a single file and load them at
//! runtime.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! # pasim pipeline configuration
//! version: "1.0"
//!
//! ingest:
//!   version: 1
//!   max_source_bytes: 10485760
//!
//! lexer:
//!   version: 1
//!   collapse_identifiers: true
//!   collapse_literals: true
//!
//! fingerprint:
//!   version: 1
//!   k: 8
//!   window: 15
//!
//! detector:
//!   version: 1
//!   syntactic_weight: 1.0
//!   drift_tolerance: 1
//!   min_occurrences: 1
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{DetectorConfig, FingerprintConfig, IngestConfig, LexConfig};

/// Errors that can occur when loading YAML configuration files.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("unsupported config version: {0}")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration for the whole pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PasimConfig {
    /// Configuration format version.
    pub version: String,

    /// Optional configuration name/description.
    #[serde(default)]
    pub name: Option<String>,

    /// Ingest stage configuration.
    #[serde(default)]
    pub ingest: IngestYamlConfig,

    /// Lexer stage configuration.
    #[serde(default)]
    pub lexer: LexerYamlConfig,

    /// Fingerprint stage configuration.
    #[serde(default)]
    pub fingerprint: FingerprintYamlConfig,

    /// Detection engine configuration.
    #[serde(default)]
    pub detector: DetectorYamlConfig,
}

impl PasimConfig {
    /// Load a YAML configuration file from the given path.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse YAML configuration from a string.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: PasimConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.ingest.validate()?;
        self.lexer.validate()?;
        self.fingerprint.validate()?;
        self.detector.validate()?;

        Ok(())
    }

    /// Build the ingest stage config.
    pub fn to_ingest_config(&self) -> IngestConfig {
        IngestConfig {
            version: self.ingest.version,
            max_source_bytes: self.ingest.max_source_bytes,
            stamp_loaded_at: self.ingest.stamp_loaded_at,
        }
    }

    /// Build the lexer stage config.
    pub fn to_lex_config(&self) -> LexConfig {
        LexConfig {
            version: self.lexer.version,
            collapse_identifiers: self.lexer.collapse_identifiers,
            collapse_literals: self.lexer.collapse_literals,
        }
    }

    /// Build the fingerprint stage config.
    pub fn to_fingerprint_config(&self) -> FingerprintConfig {
        FingerprintConfig {
            version: self.fingerprint.version,
            k: self.fingerprint.k,
            window: self.fingerprint.window,
            seed: self.fingerprint.seed,
        }
    }

    /// Build the engine config; k-gram parameters come from the fingerprint
    /// section so they are specified once.
    pub fn to_detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            version: self.detector.version,
            kgram_size: self.fingerprint.k,
            window_size: self.fingerprint.window,
            syntactic_weight: self.detector.syntactic_weight,
            gap_tolerance: self.detector.gap_tolerance,
            drift_tolerance: self.detector.drift_tolerance,
            min_occurrences: self.detector.min_occurrences,
            threshold: self.detector.threshold,
            seed: self.fingerprint.seed,
        }
    }
}

impl Default for PasimConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            ingest: IngestYamlConfig::default(),
            lexer: LexerYamlConfig::default(),
            fingerprint: FingerprintYamlConfig::default(),
            detector: DetectorYamlConfig::default(),
        }
    }
}

/// Ingest stage YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_max_source_bytes")]
    pub max_source_bytes: Option<usize>,

    #[serde(default)]
    pub stamp_loaded_at: bool,
}

impl IngestYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "ingest.version must be >= 1".to_string(),
            ));
        }
        if self.max_source_bytes == Some(0) {
            return Err(ConfigLoadError::Validation(
                "ingest.max_source_bytes must be non-zero when set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for IngestYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            max_source_bytes: Some(10 * 1024 * 1024), // 10 MiB
            stamp_loaded_at: false,
        }
    }
}

/// Lexer stage YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexerYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "true_value")]
    pub collapse_identifiers: bool,

    #[serde(default = "true_value")]
    pub collapse_literals: bool,
}

impl LexerYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "lexer.version must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for LexerYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            collapse_identifiers: true,
            collapse_literals: true,
        }
    }
}

/// Fingerprint stage YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FingerprintYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_k")]
    pub k: usize,

    #[serde(default = "default_window")]
    pub window: usize,

    #[serde(default = "default_seed")]
    pub seed: u64,
}

impl FingerprintYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "fingerprint.version must be >= 1".to_string(),
            ));
        }
        if self.k < 2 {
            return Err(ConfigLoadError::Validation(
                "fingerprint.k must be >= 2".to_string(),
            ));
        }
        if self.window == 0 {
            return Err(ConfigLoadError::Validation(
                "fingerprint.window must be >= 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for FingerprintYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            k: 8,
            window: 15,
            seed: 0xCBF2_9CE4_8422_2325,
        }
    }
}

/// Detection engine YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorYamlConfig {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default = "default_weight")]
    pub syntactic_weight: f64,

    #[serde(default)]
    pub gap_tolerance: Option<usize>,

    #[serde(default = "default_drift")]
    pub drift_tolerance: usize,

    #[serde(default = "default_min_occurrences")]
    pub min_occurrences: usize,

    #[serde(default)]
    pub threshold: Option<f64>,
}

impl DetectorYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if self.version == 0 {
            return Err(ConfigLoadError::Validation(
                "detector.version must be >= 1".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.syntactic_weight) {
            return Err(ConfigLoadError::Validation(
                "detector.syntactic_weight must be within [0, 1]".to_string(),
            ));
        }
        if self.min_occurrences == 0 {
            return Err(ConfigLoadError::Validation(
                "detector.min_occurrences must be >= 1".to_string(),
            ));
        }
        if let Some(t) = self.threshold {
            if !(0.0..=1.0).contains(&t) {
                return Err(ConfigLoadError::Validation(
                    "detector.threshold must be within [0, 1]".to_string(),
                ));
            }
        }
        Ok(())
    }
}

impl Default for DetectorYamlConfig {
    fn default() -> Self {
        Self {
            version: 1,
            syntactic_weight: 1.0,
            gap_tolerance: None,
            drift_tolerance: 1,
            min_occurrences: 1,
            threshold: None,
        }
    }
}

// Helper functions for serde defaults
fn default_version() -> u32 {
    1
}
fn true_value() -> bool {
    true
}
fn default_max_source_bytes() -> Option<usize> {
    Some(10 * 1024 * 1024)
}
fn default_k() -> usize {
    8
}
fn default_window() -> usize {
    15
}
fn default_seed() -> u64 {
    0xCBF2_9CE4_8422_2325
}
fn default_weight() -> f64 {
    1.0
}
fn default_drift() -> usize {
    1
}
fn default_min_occurrences() -> usize {
    1
}
