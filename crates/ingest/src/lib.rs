//! Pasim Ingest Layer - Source File Loading and Validation
//!
//! This crate provides the entry point to the pasim detection pipeline,
//! turning raw Pascal source into clean, immutable [`SourceFile`] values
//! suitable for lexing and fingerprinting.
//!
//! # Overview
//!
//! The ingest crate is responsible for:
//! - **Validation**: Enforcing the configurable size cap before any work is done
//! - **Normalization**: Folding CRLF and lone CR line endings to LF so that line
//!   counting and snippet rendering agree across platforms
//! - **Line indexing**: Precomputing line start offsets so downstream report
//!   rendering can slice source lines in O(1)
//!
//! # Pipeline Position
//!
//! ```text
//! Raw source ──▶ Ingest ──▶ Lexer ──▶ Fingerprint ──▶ Index ──▶ Match
//!                  ↑
//!               (this crate)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use ingest::{ingest_text, IngestConfig};
//!
//! let config = IngestConfig::default();
//! let file = ingest_text("hello.pas", "program P;\r\nbegin\r\nend.\r\n", &config).unwrap();
//!
//! assert_eq!(file.line_count, 3);
//! assert_eq!(file.line(2), "begin");
//! assert!(!file.text.contains('\r'));
//! ```
//!
//! # Design Notes
//!
//! Ingest accepts empty and whitespace-only input; "no tokens after
//! normalisation" is an engine-level condition that the detection layer reports
//! as a zero-similarity result. Only structural problems (oversized input,
//! non-UTF-8 bytes, I/O failures) are errors here.

mod config;
mod error;
mod source;

pub use crate::config::IngestConfig;
pub use crate::error::IngestError;
pub use crate::source::SourceFile;

use std::path::Path;

use chrono::Utc;

/// Build a [`SourceFile`] from in-memory text.
///
/// Line endings are normalised to LF and the line-offset table is computed
/// eagerly. The size cap is checked against the raw input before
/// normalisation.
pub fn ingest_text(
    name: &str,
    text: &str,
    cfg: &IngestConfig,
) -> Result<SourceFile, IngestError> {
    cfg.validate()?;

    if let Some(limit) = cfg.max_source_bytes {
        if text.len() > limit {
            return Err(IngestError::SourceTooLarge {
                bytes: text.len(),
                limit,
            });
        }
    }

    let loaded_at = if cfg.stamp_loaded_at {
        Some(Utc::now())
    } else {
        None
    };

    Ok(SourceFile::new(name.to_string(), text, loaded_at))
}

/// Read and ingest a source file from disk.
///
/// The file name recorded on the [`SourceFile`] is the final path component,
/// falling back to the full path display when there is none.
pub fn ingest_path(path: &Path, cfg: &IngestConfig) -> Result<SourceFile, IngestError> {
    cfg.validate()?;

    let bytes = std::fs::read(path)?;
    if let Some(limit) = cfg.max_source_bytes {
        if bytes.len() > limit {
            return Err(IngestError::SourceTooLarge {
                bytes: bytes.len(),
                limit,
            });
        }
    }

    let text = String::from_utf8(bytes)
        .map_err(|e| IngestError::InvalidUtf8(format!("{}: {e}", path.display())))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    ingest_text(&name, &text, cfg)
}
