//! Configuration for the ingest stage.

use serde::{Deserialize, Serialize};

use crate::error::IngestError;

/// Configuration for source-file ingestion.
///
/// Like every stage config in the pipeline, this is versioned so that stored
/// results remain traceable to the exact behaviour that produced them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IngestConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Maximum accepted raw source size in bytes; `None` disables the cap.
    pub max_source_bytes: Option<usize>,
    /// Record a `loaded_at` timestamp on ingested files.
    ///
    /// Off by default so that ingest stays a pure function of its input.
    pub stamp_loaded_at: bool,
}

impl IngestConfig {
    /// Create a configuration with the default 10 MiB cap.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set or disable the raw size cap.
    pub fn with_max_source_bytes(mut self, limit: Option<usize>) -> Self {
        self.max_source_bytes = limit;
        self
    }

    /// Toggle `loaded_at` stamping.
    pub fn with_stamp_loaded_at(mut self, stamp: bool) -> Self {
        self.stamp_loaded_at = stamp;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), IngestError> {
        if self.version < 1 {
            return Err(IngestError::InvalidConfig(format!(
                "version must be >= 1 (got {})",
                self.version
            )));
        }
        if self.max_source_bytes == Some(0) {
            return Err(IngestError::InvalidConfig(
                "max_source_bytes must be non-zero when set".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            version: 1,
            max_source_bytes: Some(10 * 1024 * 1024),
            stamp_loaded_at: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let cfg = IngestConfig::default();
        assert_eq!(cfg.version, 1);
        assert_eq!(cfg.max_source_bytes, Some(10 * 1024 * 1024));
        assert!(!cfg.stamp_loaded_at);
    }

    #[test]
    fn builder_chain() {
        let cfg = IngestConfig::new()
            .with_max_source_bytes(None)
            .with_stamp_loaded_at(true);
        assert_eq!(cfg.max_source_bytes, None);
        assert!(cfg.stamp_loaded_at);
    }

    #[test]
    fn zero_cap_rejected() {
        let cfg = IngestConfig::new().with_max_source_bytes(Some(0));
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn serde_roundtrip() {
        let cfg = IngestConfig::new().with_max_source_bytes(Some(1024));
        let json = serde_json::to_string(&cfg).unwrap();
        let back: IngestConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg, back);
    }
}
