//! Configuration for the lexer stage.

use serde::{Deserialize, Serialize};

use crate::error::LexError;

/// Configuration for Pascal tokenisation.
///
/// The defaults implement the normalisation policy the similarity engine
/// depends on: identifier and literal spellings are collapsed so that trivial
/// renames and constant tweaks do not perturb the token stream. The collapse
/// switches exist for debugging views that want the real spellings; detection
/// runs should leave them on.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LexConfig {
    /// Configuration schema version.
    pub version: u32,
    /// Collapse identifiers to the `ident` marker.
    pub collapse_identifiers: bool,
    /// Collapse numeric and string literals to `num` / `str`.
    pub collapse_literals: bool,
}

impl LexConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_collapse_identifiers(mut self, collapse: bool) -> Self {
        self.collapse_identifiers = collapse;
        self
    }

    pub fn with_collapse_literals(mut self, collapse: bool) -> Self {
        self.collapse_literals = collapse;
        self
    }

    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), LexError> {
        if self.version < 1 {
            return Err(LexError::InvalidConfig(format!(
                "version must be >= 1 (got {})",
                self.version
            )));
        }
        Ok(())
    }
}

impl Default for LexConfig {
    fn default() -> Self {
        Self {
            version: 1,
            collapse_identifiers: true,
            collapse_literals: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_collapse_everything() {
        let cfg = LexConfig::default();
        assert!(cfg.collapse_identifiers);
        assert!(cfg.collapse_literals);
        assert!(cfg.validate().is_ok());
    }

    #[test]
    fn version_zero_rejected() {
        let cfg = LexConfig {
            version: 0,
            ..Default::default()
        };
        assert!(matches!(cfg.validate(), Err(LexError::InvalidConfig(_))));
    }

    #[test]
    fn builder_chain() {
        let cfg = LexConfig::new()
            .with_collapse_identifiers(false)
            .with_collapse_literals(false);
        assert!(!cfg.collapse_identifiers);
        assert!(!cfg.collapse_literals);
    }
}
