use thiserror::Error;

/// Errors that can occur while lexing Pascal source.
///
/// The lexer does not attempt recovery; a malformed file is unanalyzable and
/// the detection layer reports the pair accordingly.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LexError {
    #[error("invalid lexer config: {0}")]
    InvalidConfig(String),

    #[error("unterminated string literal starting on line {line}")]
    UnterminatedString { line: u32 },

    #[error("unterminated comment starting on line {line}")]
    UnterminatedComment { line: u32 },
}
