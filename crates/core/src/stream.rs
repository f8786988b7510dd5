//! Cursor over a lexed token sequence.
//!
//! The sequence itself is borrowed and never changes; the cursor is the only
//! mutable state. Backtracking is explicit: callers [`TokenStream::save`] a
//! position and [`TokenStream::restore`] it when an attempt fails.

use std::sync::OnceLock;

use crate::error::ParseError;
use crate::lexer::{Spanned, Token, TokenKind};

/// Stands in for the `Eof` of a sequence that lacks one.
fn implicit_eof() -> &'static Spanned {
    static EOF: OnceLock<Spanned> = OnceLock::new();
    EOF.get_or_init(|| Spanned {
        token: Token::eof(),
        line: 1,
    })
}

/// Saved cursor position, only obtainable from [`TokenStream::save`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

impl Checkpoint {
    pub fn position(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct TokenStream<'a> {
    tokens: &'a [Spanned],
    pos: usize,
}

impl<'a> TokenStream<'a> {
    /// Wrap a token sequence produced by [`crate::lexer::lex`].
    ///
    /// A sequence without a trailing `Eof` (including an empty one) reads as
    /// if one were appended.
    pub fn new(tokens: &'a [Spanned]) -> Self {
        TokenStream { tokens, pos: 0 }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    /// True while the cursor has not reached the `Eof` sentinel.
    pub fn has_next(&self) -> bool {
        !self.peek().is_eof()
    }

    fn cur(&self) -> &'a Spanned {
        match self.tokens.get(self.pos) {
            Some(s) => s,
            None => implicit_eof(),
        }
    }

    pub fn peek_spanned(&self) -> &'a Spanned {
        self.cur()
    }

    pub fn peek(&self) -> &'a Token {
        &self.cur().token
    }

    pub fn line(&self) -> u32 {
        self.cur().line
    }

    /// Return the current token and advance. At `Eof` the cursor stays put
    /// and `Eof` is returned again.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> &'a Token {
        let t = self.cur();
        if !t.token.is_eof() {
            self.pos += 1;
        }
        &t.token
    }

    pub fn skip(&mut self) {
        self.next();
    }

    pub fn skip_n(&mut self, n: usize) {
        for _ in 0..n {
            self.skip();
        }
    }

    pub fn save(&self) -> Checkpoint {
        Checkpoint(self.pos)
    }

    pub fn restore(&mut self, checkpoint: Checkpoint) {
        self.pos = checkpoint.0;
    }

    /// Rewind to the start of the sequence.
    pub fn reset(&mut self) {
        self.pos = 0;
    }

    pub fn test_kind(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn test_text(&self, text: &str) -> bool {
        self.peek().text == text
    }

    pub fn skip_if_kind(&mut self, kind: TokenKind) -> bool {
        if self.test_kind(kind) {
            self.skip();
            return true;
        }
        false
    }

    pub fn skip_if_text(&mut self, text: &str) -> bool {
        if self.test_text(text) {
            self.skip();
            return true;
        }
        false
    }

    pub fn expect_kind(&mut self, kind: TokenKind) -> Result<&'a Token, ParseError> {
        if self.test_kind(kind) {
            return Ok(self.next());
        }
        Err(self.expected(kind.to_string()))
    }

    pub fn expect_text(&mut self, text: &str) -> Result<&'a Token, ParseError> {
        if self.test_text(text) {
            return Ok(self.next());
        }
        Err(self.expected(format!("'{}'", text)))
    }

    fn expected(&self, expected: String) -> ParseError {
        ParseError::Expected {
            expected,
            found: self.peek().clone(),
            position: self.pos,
            line: self.line(),
        }
    }

    /// Tokens from the cursor to the end of the sequence.
    pub fn remaining(&self) -> &'a [Spanned] {
        self.tokens.get(self.pos..).unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;

    #[test]
    fn next_never_moves_past_eof() {
        let lexed = lex("a");
        let mut s = TokenStream::new(&lexed.tokens);
        assert_eq!(s.next().text, "a");
        assert!(s.next().is_eof());
        assert!(s.next().is_eof());
        assert_eq!(s.position(), 1);
        assert!(!s.has_next());
    }

    #[test]
    fn sequence_without_eof_ends_implicitly() {
        let mut s = TokenStream::new(&[]);
        assert!(!s.has_next());
        assert!(s.next().is_eof());
        assert_eq!(s.position(), 0);
        assert!(s.remaining().is_empty());

        let word = Spanned {
            token: Token::new(TokenKind::Word, "a"),
            line: 3,
        };
        let tokens = [word];
        let mut s = TokenStream::new(&tokens);
        assert_eq!(s.next().text, "a");
        assert!(!s.has_next());
        assert!(s.next().is_eof());
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn save_and_restore_rewinds_cursor() {
        let lexed = lex("send a to b");
        let mut s = TokenStream::new(&lexed.tokens);
        s.skip();
        let cp = s.save();
        s.skip_n(2);
        assert_eq!(s.peek().text, "b");
        s.restore(cp);
        assert_eq!(s.position(), 1);
        assert_eq!(s.peek().text, "a");
        s.reset();
        assert_eq!(s.position(), 0);
    }

    #[test]
    fn conditional_skips_only_move_on_match() {
        let lexed = lex("if x");
        let mut s = TokenStream::new(&lexed.tokens);
        assert!(!s.skip_if_text("while"));
        assert!(!s.skip_if_kind(TokenKind::Word));
        assert_eq!(s.position(), 0);
        assert!(s.skip_if_kind(TokenKind::If));
        assert!(s.skip_if_text("x"));
        assert!(s.test_kind(TokenKind::Eof));
    }

    #[test]
    fn expect_reports_expected_and_actual() {
        let lexed = lex("apply 2");
        let mut s = TokenStream::new(&lexed.tokens);
        assert_eq!(s.expect_text("apply").unwrap().kind, TokenKind::Word);
        let err = s.expect_kind(TokenKind::Str).unwrap_err();
        match err {
            ParseError::Expected {
                expected,
                found,
                position,
                line,
            } => {
                assert_eq!(expected, "STRING");
                assert_eq!(found, Token::new(TokenKind::Number, "2"));
                assert_eq!(position, 1);
                assert_eq!(line, 1);
            }
            other => panic!("expected Expected error, got {:?}", other),
        }
        // a failed expect does not consume
        assert_eq!(s.position(), 1);
    }

    #[test]
    fn remaining_includes_eof() {
        let lexed = lex("a b");
        let mut s = TokenStream::new(&lexed.tokens);
        s.skip();
        let rest: Vec<_> = s.remaining().iter().map(|t| t.token.text.as_str()).collect();
        assert_eq!(rest, vec!["b", "<EOF>"]);
    }
}
