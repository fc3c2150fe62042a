//! Pasim Lexer - Deterministic Pascal Tokenization
//!
//! This crate is the second stage of the pasim pipeline. It turns Pascal
//! source text into a normalised token stream with a parallel position map,
//! which is the only representation later stages ever look at.
//!
//! # Core Guarantee
//!
//! > **Same input text + same [`LexConfig`] → identical [`TokenizedFile`], forever.**
//!
//! The lexer is pure and side-effect free: no I/O, no locale dependence, no
//! wall-clock input.
//!
//! # Normalisation policy
//!
//! Pascal is case-insensitive, so everything is folded to lowercase before
//! classification. Reserved words keep their lexeme, identifiers collapse to
//! `ident`, numeric literals to `num`, string/char literals to `str`, and
//! operators/punctuation stay literal (`:=`, `<>`, `;`, ...). Comments
//! (`{ }`, `(* *)`, `// ...`) and whitespace vanish. Renaming every variable
//! in a file therefore leaves the token stream byte-identical.
//!
//! # Pipeline Position
//!
//! ```text
//! Raw source ──▶ Ingest ──▶ Lexer ──▶ Fingerprint ──▶ Index ──▶ Match
//!                             ↑
//!                          (this crate)
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use lexer::{lex, LexConfig};
//!
//! let file = lex("p.pas", "program P;\nbegin\n  WriteLn('hi');\nend.\n", &LexConfig::default()).unwrap();
//!
//! let stream: Vec<&str> = file.texts().collect();
//! assert_eq!(stream[0], "program");
//! assert_eq!(stream[1], "ident");
//! assert_eq!(file.line_of(0), 1);
//! assert_eq!(file.line_of(9999), 1); // out-of-range degrades, never panics
//! ```
//!
//! # Errors
//!
//! Unterminated strings and comments surface as [`LexError`]; the lexer makes
//! no recovery attempt, and the caller treats the file as unanalyzable.

mod config;
mod error;
mod keywords;
mod scanner;
mod token;

pub use crate::config::LexConfig;
pub use crate::error::LexError;
pub use crate::token::{Region, Token, TokenKind};

use serde::{Deserialize, Serialize};

/// A lexed source file: the normalised token stream plus its position map.
///
/// Tokens and their regions live in a single vector, so the token count and
/// the mapping length cannot disagree. Start positions are monotonically
/// non-decreasing in source order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenizedFile {
    /// Display name of the originating source file.
    pub name: String,
    /// Normalised tokens in source order.
    pub tokens: Vec<Token>,
    /// Line count of the source text the tokens came from.
    pub line_count: u32,
}

impl TokenizedFile {
    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the file produced no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The 1-based source line a token starts on.
    ///
    /// Out-of-range indices degrade to line 1; report rendering must never
    /// panic on a stale token index.
    pub fn line_of(&self, token_index: usize) -> u32 {
        self.tokens
            .get(token_index)
            .map(|t| t.region.start_row)
            .unwrap_or(1)
    }

    /// Iterator over the normalised token texts.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(|t| t.text.as_str())
    }
}

/// Tokenize Pascal source into a [`TokenizedFile`].
///
/// Deterministic: identical `(text, cfg)` inputs produce identical outputs on
/// every platform.
pub fn lex(name: &str, text: &str, cfg: &LexConfig) -> Result<TokenizedFile, LexError> {
    cfg.validate()?;
    let tokens = scanner::scan(text, cfg)?;
    Ok(TokenizedFile {
        name: name.to_string(),
        tokens,
        line_count: count_lines(text),
    })
}

fn count_lines(text: &str) -> u32 {
    if text.is_empty() {
        return 0;
    }
    let newlines = text.bytes().filter(|&b| b == b'\n').count() as u32;
    if text.ends_with('\n') {
        newlines
    } else {
        newlines + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "program Sample;\nvar x: integer;\nbegin\n  x := 1 + 2;\n  writeln(x);\nend.\n";

    #[test]
    fn lex_is_deterministic() {
        let cfg = LexConfig::default();
        let a = lex("s.pas", SAMPLE, &cfg).unwrap();
        let b = lex("s.pas", SAMPLE, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rename_leaves_stream_unchanged() {
        let cfg = LexConfig::default();
        let renamed = SAMPLE.replace('x', "counter");
        let a = lex("a.pas", SAMPLE, &cfg).unwrap();
        let b = lex("b.pas", &renamed, &cfg).unwrap();
        let at: Vec<&str> = a.texts().collect();
        let bt: Vec<&str> = b.texts().collect();
        assert_eq!(at, bt);
    }

    #[test]
    fn comments_do_not_change_stream() {
        let cfg = LexConfig::default();
        let commented = SAMPLE.replace("begin\n", "begin { entry point }\n");
        let a = lex("a.pas", SAMPLE, &cfg).unwrap();
        let b = lex("b.pas", &commented, &cfg).unwrap();
        let at: Vec<&str> = a.texts().collect();
        let bt: Vec<&str> = b.texts().collect();
        assert_eq!(at, bt);
    }

    #[test]
    fn start_positions_are_monotonic() {
        let file = lex("s.pas", SAMPLE, &LexConfig::default()).unwrap();
        for pair in file.tokens.windows(2) {
            let a = (pair[0].region.start_row, pair[0].region.start_col);
            let b = (pair[1].region.start_row, pair[1].region.start_col);
            assert!(a <= b, "token positions must not go backwards: {a:?} -> {b:?}");
        }
    }

    #[test]
    fn regions_end_after_start() {
        let file = lex("s.pas", SAMPLE, &LexConfig::default()).unwrap();
        for tok in &file.tokens {
            let start = (tok.region.start_row, tok.region.start_col);
            let end = (tok.region.end_row, tok.region.end_col);
            assert!(end >= start);
        }
    }

    #[test]
    fn line_of_tracks_source_lines() {
        let file = lex("s.pas", SAMPLE, &LexConfig::default()).unwrap();
        assert_eq!(file.line_of(0), 1); // program
        let last = file.len() - 1;
        assert_eq!(file.line_of(last), 6); // end.
    }

    #[test]
    fn line_of_out_of_range_degrades_to_one() {
        let file = lex("s.pas", SAMPLE, &LexConfig::default()).unwrap();
        assert_eq!(file.line_of(file.len() + 100), 1);
    }

    #[test]
    fn empty_source_produces_no_tokens() {
        let file = lex("e.pas", "", &LexConfig::default()).unwrap();
        assert!(file.is_empty());
        assert_eq!(file.line_count, 0);
    }

    #[test]
    fn comment_only_source_produces_no_tokens() {
        let file = lex("c.pas", "{ nothing here }\n", &LexConfig::default()).unwrap();
        assert!(file.is_empty());
        assert_eq!(file.line_count, 1);
    }

    #[test]
    fn line_count_matches_source() {
        let file = lex("s.pas", SAMPLE, &LexConfig::default()).unwrap();
        assert_eq!(file.line_count, 6);
    }
}
