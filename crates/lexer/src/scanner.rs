//! The Pascal scanner state machine.
//!
//! Operates over a decoded char buffer with 1-based row/column tracking.
//! Comments and whitespace produce no tokens; everything else is normalised
//! according to the [`LexConfig`] collapse switches.

use crate::config::LexConfig;
use crate::error::LexError;
use crate::keywords::is_keyword;
use crate::token::{Region, Token, TokenKind};

pub(crate) fn scan(text: &str, cfg: &LexConfig) -> Result<Vec<Token>, LexError> {
    Scanner::new(text).run(cfg)
}

struct Scanner {
    chars: Vec<char>,
    i: usize,
    row: u32,
    col: u32,
    last_row: u32,
    last_col: u32,
}

impl Scanner {
    fn new(text: &str) -> Self {
        Self {
            chars: text.chars().collect(),
            i: 0,
            row: 1,
            col: 1,
            last_row: 1,
            last_col: 1,
        }
    }

    fn peek(&self, ahead: usize) -> Option<char> {
        self.chars.get(self.i + ahead).copied()
    }

    fn bump(&mut self) -> char {
        let c = self.chars[self.i];
        self.last_row = self.row;
        self.last_col = self.col;
        self.i += 1;
        if c == '\n' {
            self.row += 1;
            self.col = 1;
        } else {
            self.col += 1;
        }
        c
    }

    fn at_end(&self) -> bool {
        self.i >= self.chars.len()
    }

    fn run(mut self, cfg: &LexConfig) -> Result<Vec<Token>, LexError> {
        let mut tokens = Vec::new();

        while let Some(c) = self.peek(0) {
            if c.is_whitespace() {
                self.bump();
                continue;
            }
            if c == '{' {
                self.skip_brace_comment()?;
                continue;
            }
            if c == '(' && self.peek(1) == Some('*') {
                self.skip_paren_comment()?;
                continue;
            }
            if c == '/' && self.peek(1) == Some('/') {
                while let Some(next) = self.peek(0) {
                    if next == '\n' {
                        break;
                    }
                    self.bump();
                }
                continue;
            }

            let start_row = self.row;
            let start_col = self.col;

            if c == '\'' {
                tokens.push(self.scan_string(cfg, start_row, start_col)?);
                continue;
            }
            if c == '#' && self.peek(1).is_some_and(|d| d.is_ascii_digit()) {
                let mut raw = String::new();
                raw.push(self.bump());
                while self.peek(0).is_some_and(|d| d.is_ascii_digit()) {
                    raw.push(self.bump());
                }
                tokens.push(self.finish(cfg.collapse_literals, "str", TokenKind::Str, start_row, start_col, Some(raw)));
                continue;
            }
            if c.is_ascii_alphabetic() || c == '_' {
                tokens.push(self.scan_word(cfg, start_row, start_col));
                continue;
            }
            if c.is_ascii_digit() {
                tokens.push(self.scan_number(cfg, start_row, start_col));
                continue;
            }
            if c == '$' && self.peek(1).is_some_and(|d| d.is_ascii_hexdigit()) {
                let mut raw = String::new();
                raw.push(self.bump());
                while self.peek(0).is_some_and(|d| d.is_ascii_hexdigit()) {
                    raw.push(self.bump().to_ascii_lowercase());
                }
                tokens.push(self.finish(cfg.collapse_literals, "num", TokenKind::Number, start_row, start_col, Some(raw)));
                continue;
            }

            tokens.push(self.scan_symbol(start_row, start_col));
        }

        Ok(tokens)
    }

    fn skip_brace_comment(&mut self) -> Result<(), LexError> {
        let line = self.row;
        self.bump();
        loop {
            if self.at_end() {
                return Err(LexError::UnterminatedComment { line });
            }
            if self.bump() == '}' {
                return Ok(());
            }
        }
    }

    fn skip_paren_comment(&mut self) -> Result<(), LexError> {
        let line = self.row;
        self.bump();
        self.bump();
        loop {
            if self.at_end() {
                return Err(LexError::UnterminatedComment { line });
            }
            if self.bump() == '*' && self.peek(0) == Some(')') {
                self.bump();
                return Ok(());
            }
        }
    }

    fn scan_string(
        &mut self,
        cfg: &LexConfig,
        start_row: u32,
        start_col: u32,
    ) -> Result<Token, LexError> {
        let line = self.row;
        let mut raw = String::new();
        raw.push(self.bump());
        loop {
            match self.peek(0) {
                None | Some('\n') => return Err(LexError::UnterminatedString { line }),
                Some('\'') => {
                    raw.push(self.bump());
                    if self.peek(0) == Some('\'') {
                        raw.push(self.bump());
                    } else {
                        break;
                    }
                }
                Some(_) => raw.push(self.bump()),
            }
        }
        Ok(self.finish(cfg.collapse_literals, "str", TokenKind::Str, start_row, start_col, Some(raw)))
    }

    fn scan_word(&mut self, cfg: &LexConfig, start_row: u32, start_col: u32) -> Token {
        let mut word = String::new();
        while self
            .peek(0)
            .is_some_and(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            word.push(self.bump().to_ascii_lowercase());
        }
        if is_keyword(&word) {
            return self.token(word, TokenKind::Keyword, start_row, start_col);
        }
        self.finish(cfg.collapse_identifiers, "ident", TokenKind::Ident, start_row, start_col, Some(word))
    }

    fn scan_number(&mut self, cfg: &LexConfig, start_row: u32, start_col: u32) -> Token {
        let mut raw = String::new();
        while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
            raw.push(self.bump());
        }
        // A '.' only belongs to the number when a digit follows; `1..10` is a
        // num, the `..` range symbol, and another num.
        if self.peek(0) == Some('.') && self.peek(1).is_some_and(|c| c.is_ascii_digit()) {
            raw.push(self.bump());
            while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                raw.push(self.bump());
            }
        }
        if matches!(self.peek(0), Some('e') | Some('E')) {
            let exponent_digit = |c: Option<char>| c.is_some_and(|d| d.is_ascii_digit());
            let signed = matches!(self.peek(1), Some('+') | Some('-')) && exponent_digit(self.peek(2));
            if signed || exponent_digit(self.peek(1)) {
                raw.push(self.bump().to_ascii_lowercase());
                if matches!(self.peek(0), Some('+') | Some('-')) {
                    raw.push(self.bump());
                }
                while self.peek(0).is_some_and(|c| c.is_ascii_digit()) {
                    raw.push(self.bump());
                }
            }
        }
        self.finish(cfg.collapse_literals, "num", TokenKind::Number, start_row, start_col, Some(raw))
    }

    fn scan_symbol(&mut self, start_row: u32, start_col: u32) -> Token {
        let first = self.bump();
        let two = self
            .peek(0)
            .map(|second| [first, second].iter().collect::<String>());
        if let Some(pair) = two {
            if matches!(pair.as_str(), ":=" | "<=" | ">=" | "<>" | "..") {
                self.bump();
                return self.token(pair, TokenKind::Symbol, start_row, start_col);
            }
        }
        self.token(first.to_string(), TokenKind::Symbol, start_row, start_col)
    }

    fn finish(
        &self,
        collapse: bool,
        marker: &str,
        kind: TokenKind,
        start_row: u32,
        start_col: u32,
        raw: Option<String>,
    ) -> Token {
        let text = if collapse {
            marker.to_string()
        } else {
            raw.unwrap_or_else(|| marker.to_string())
        };
        self.token(text, kind, start_row, start_col)
    }

    fn token(&self, text: String, kind: TokenKind, start_row: u32, start_col: u32) -> Token {
        Token {
            text,
            kind,
            region: Region {
                start_row,
                start_col,
                end_row: self.last_row,
                end_col: self.last_col,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(src: &str) -> Vec<String> {
        scan(src, &LexConfig::default())
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect()
    }

    #[test]
    fn scans_simple_program() {
        assert_eq!(
            texts("program P; begin writeln('hi'); end."),
            vec![
                "program", "ident", ";", "begin", "ident", "(", "str", ")", ";", "end", "."
            ]
        );
    }

    #[test]
    fn folds_case_before_classifying() {
        assert_eq!(texts("BEGIN End BeGiN"), vec!["begin", "end", "begin"]);
    }

    #[test]
    fn collapses_identifier_spellings() {
        assert_eq!(texts("alpha beta_2 GAMMA"), vec!["ident", "ident", "ident"]);
    }

    #[test]
    fn keeps_identifier_spelling_when_configured() {
        let cfg = LexConfig::default().with_collapse_identifiers(false);
        let out: Vec<String> = scan("Alpha BETA", &cfg)
            .unwrap()
            .into_iter()
            .map(|t| t.text)
            .collect();
        assert_eq!(out, vec!["alpha", "beta"]);
    }

    #[test]
    fn numbers_and_ranges() {
        assert_eq!(texts("1..10"), vec!["num", "..", "num"]);
        assert_eq!(texts("3.14 2e10 5e-3 $FF"), vec!["num", "num", "num", "num"]);
    }

    #[test]
    fn multi_char_operators() {
        assert_eq!(
            texts("a := b <= c >= d <> e"),
            vec!["ident", ":=", "ident", "<=", "ident", ">=", "ident", "<>", "ident"]
        );
    }

    #[test]
    fn string_escapes_and_char_codes() {
        assert_eq!(texts("'it''s' #13 #10"), vec!["str", "str", "str"]);
    }

    #[test]
    fn comments_are_dropped() {
        assert_eq!(
            texts("begin { brace } (* paren *) // line\nend"),
            vec!["begin", "end"]
        );
    }

    #[test]
    fn block_comment_tracks_lines() {
        let tokens = scan("{ one\ntwo\nthree }\nbegin", &LexConfig::default()).unwrap();
        assert_eq!(tokens[0].region.start_row, 4);
    }

    #[test]
    fn unterminated_string_reports_line() {
        let err = scan("x := 'oops\n", &LexConfig::default()).unwrap_err();
        assert_eq!(err, LexError::UnterminatedString { line: 1 });
    }

    #[test]
    fn unterminated_comment_reports_line() {
        let err = scan("begin\n{ never closed", &LexConfig::default()).unwrap_err();
        assert_eq!(err, LexError::UnterminatedComment { line: 2 });
    }

    #[test]
    fn regions_are_one_based_inclusive() {
        let tokens = scan("x := 1;", &LexConfig::default()).unwrap();
        let assign = &tokens[1];
        assert_eq!(assign.text, ":=");
        assert_eq!(assign.region.start_row, 1);
        assert_eq!(assign.region.start_col, 3);
        assert_eq!(assign.region.end_col, 4);
    }

    #[test]
    fn rows_advance_per_line() {
        let tokens = scan("begin\n  x := 1;\nend.", &LexConfig::default()).unwrap();
        assert_eq!(tokens[0].region.start_row, 1);
        assert_eq!(tokens[1].region.start_row, 2);
        assert_eq!(tokens.last().unwrap().region.start_row, 3);
    }
}
