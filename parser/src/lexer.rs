//! FILENAME: parser/src/lexer.rs
//! PURPOSE: Scans a raw formula string and produces a stream of Tokens
//! using longest-match lookahead.
//! CONTEXT: This is the first stage of the parsing pipeline. At each
//! position it tries every candidate token shape (bracket, whitespace run,
//! operand, operator symbol), keeps the longest one that validates, and
//! advances by that length. This is what lets `sin` win over `s`,`i`,`n`
//! and `A12` win over `A`,`12`.

use crate::error::ParseError;
use crate::operator::OperatorCatalog;
use crate::token::{BracketKind, Token};

pub struct Lexer<'a> {
    chars: Vec<char>,
    catalog: &'a OperatorCatalog,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, catalog: &'a OperatorCatalog) -> Self {
        Lexer {
            chars: input.chars().collect(),
            catalog,
        }
    }

    /// Scans the whole input into a token stream. Whitespace runs are
    /// recognized but dropped; the returned stream has whitespace already
    /// removed, matching what the reducer expects.
    pub fn tokenize(&self) -> Result<Vec<Token>, ParseError> {
        let mut tokens = Vec::new();
        let mut i = 0;
        while i < self.chars.len() {
            let (len, token) = self.longest_match(i)?;
            if let Some(token) = token {
                tokens.push(token);
            }
            i += len;
        }
        Ok(tokens)
    }

    /// Finds the longest prefix starting at `start` that validates as a
    /// bracket, a whitespace run, an operand, or an operator symbol.
    /// Returns its length and the token to emit (`None` for whitespace).
    fn longest_match(&self, start: usize) -> Result<(usize, Option<Token>), ParseError> {
        if let Some(kind) = BracketKind::from_open(self.chars[start]) {
            return Ok((1, Some(Token::Open(kind))));
        }
        if let Some(kind) = BracketKind::from_close(self.chars[start]) {
            return Ok((1, Some(Token::Close(kind))));
        }
        if self.chars[start].is_whitespace() {
            let mut end = start;
            while end < self.chars.len() && self.chars[end].is_whitespace() {
                end += 1;
            }
            return Ok((end - start, None));
        }

        let mut best: Option<(usize, Token)> = None;
        let max_len = self.chars.len() - start;
        for len in 1..=max_len {
            let candidate: String = self.chars[start..start + len].iter().collect();
            if let Some(token) = classify_operand(&candidate) {
                best = Some((len, token));
                continue;
            }
            if self.catalog.is_operator_symbol(&candidate) {
                best = Some((len, Token::Operator(candidate)));
            }
        }

        best.map(|(len, tok)| (len, Some(tok)))
            .ok_or(ParseError::InvalidToken(start))
    }
}

/// Validates `candidate` as a numeric literal, a cell name, or a range
/// name, in that order, returning the matching token if any.
fn classify_operand(candidate: &str) -> Option<Token> {
    if let Some(n) = parse_plain_number(candidate) {
        return Some(Token::Number(n));
    }
    if is_cell_name(candidate) {
        return Some(Token::CellName(candidate.to_string()));
    }
    if is_range_name(candidate) {
        return Some(Token::RangeName(candidate.to_string()));
    }
    None
}

/// A numeric literal has no leading sign and no surrounding whitespace;
/// unary minus is handled by the grammar, not the tokenizer.
fn parse_plain_number(s: &str) -> Option<f64> {
    if s.is_empty() {
        return None;
    }
    let first = s.chars().next().unwrap();
    if first == '+' || first == '-' || first.is_whitespace() {
        return None;
    }
    if s.chars().last().map(|c| c.is_whitespace()).unwrap_or(false) {
        return None;
    }
    let value: f64 = s.parse().ok()?;
    value.is_finite().then_some(value)
}

/// `^[A-Z]+[0-9]+$`, hand-written rather than via a regex dependency.
fn is_cell_name(s: &str) -> bool {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() && bytes[i].is_ascii_uppercase() {
        i += 1;
    }
    if i == 0 || i == bytes.len() {
        return false;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    i == bytes.len() && i > digits_start
}

/// `^[A-Z]+[0-9]+:[A-Z]+[0-9]+$`.
fn is_range_name(s: &str) -> bool {
    match s.split_once(':') {
        Some((left, right)) => is_cell_name(left) && is_cell_name(right),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<Token> {
        let catalog = OperatorCatalog::standard();
        Lexer::new(input, &catalog).tokenize().unwrap()
    }

    #[test]
    fn longest_match_prefers_sin_over_fragments() {
        let toks = tokens("sin(0)");
        assert_eq!(
            toks,
            vec![
                Token::Operator("sin".into()),
                Token::Open(BracketKind::Paren),
                Token::Number(0.0),
                Token::Close(BracketKind::Paren),
            ]
        );
    }

    #[test]
    fn longest_match_prefers_full_cell_name() {
        let toks = tokens("A12+B3");
        assert_eq!(
            toks,
            vec![
                Token::CellName("A12".into()),
                Token::Operator("+".into()),
                Token::CellName("B3".into()),
            ]
        );
    }

    #[test]
    fn whitespace_is_dropped() {
        let toks = tokens("1 + 2");
        assert_eq!(
            toks,
            vec![
                Token::Number(1.0),
                Token::Operator("+".into()),
                Token::Number(2.0),
            ]
        );
    }

    #[test]
    fn recognizes_range_name() {
        let toks = tokens("max(A1:A4)");
        assert_eq!(
            toks,
            vec![
                Token::Operator("max".into()),
                Token::Open(BracketKind::Paren),
                Token::RangeName("A1:A4".into()),
                Token::Close(BracketKind::Paren),
            ]
        );
    }

    #[test]
    fn rejects_unrecognizable_prefix() {
        let catalog = OperatorCatalog::standard();
        let err = Lexer::new("@@@", &catalog).tokenize().unwrap_err();
        assert_eq!(err, ParseError::InvalidToken(0));
    }

    #[test]
    fn bracket_kinds_are_distinguished() {
        let toks = tokens("[1]");
        assert_eq!(
            toks,
            vec![
                Token::Open(BracketKind::Square),
                Token::Number(1.0),
                Token::Close(BracketKind::Square),
            ]
        );
    }
}
