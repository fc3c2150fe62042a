//! Token and source-region types produced by the lexer.

use serde::{Deserialize, Serialize};

/// Classification of a normalised token.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// A reserved word, kept as its lowercased lexeme.
    Keyword,
    /// Any identifier, collapsed to the marker `ident`.
    Ident,
    /// Numeric literal, collapsed to `num`.
    Number,
    /// String or character literal, collapsed to `str`.
    Str,
    /// Operator or punctuation, kept literally.
    Symbol,
}

/// Source region of a token, 1-based rows and columns, inclusive on both ends.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Region {
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl Region {
    pub(crate) fn point(row: u32, col: u32) -> Self {
        Self {
            start_row: row,
            start_col: col,
            end_row: row,
            end_col: col,
        }
    }
}

/// A normalised Pascal token.
///
/// `text` is the canonical form used for fingerprinting: keywords keep their
/// lowercased lexeme, identifiers become `ident`, numeric literals `num`,
/// string literals `str`, and symbols stay literal. The original spelling is
/// deliberately not retained; trivial renames must not change the token
/// stream.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub region: Region,
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        self.text.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_point_is_degenerate() {
        let r = Region::point(3, 7);
        assert_eq!(r.start_row, r.end_row);
        assert_eq!(r.start_col, r.end_col);
    }

    #[test]
    fn token_serde_roundtrip() {
        let tok = Token {
            text: ":=".to_string(),
            kind: TokenKind::Symbol,
            region: Region {
                start_row: 2,
                start_col: 5,
                end_row: 2,
                end_col: 6,
            },
        };
        let json = serde_json::to_string(&tok).unwrap();
        let back: Token = serde_json::from_str(&json).unwrap();
        assert_eq!(tok, back);
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_string(&TokenKind::Keyword).unwrap();
        assert_eq!(json, "\"keyword\"");
    }
}
