//! Backtracking matcher.
//!
//! Each action is recognized by trying the grammar's rules in order at the
//! current position. A rule that fails part-way restores the cursor before
//! the next rule is tried, so no partial consumption leaks between attempts.
//! When no rule matches, [`parse`] aborts with a [`ParseError::Syntax`];
//! [`parse_recovering`] records the error and skips exactly one token.

use crate::ast::{ActionNode, Arguments, Block};
use crate::error::ParseError;
use crate::grammar::{Element, Grammar, Rule};
use crate::lexer::{self, Spanned};
use crate::stream::TokenStream;

mod expressions;

/// Default maximum number of errors collected by [`parse_recovering`].
pub const DEFAULT_MAX_ERRORS: usize = 10;

// ──────────────────────────────────────────────
// Parser
// ──────────────────────────────────────────────

pub struct Parser<'a> {
    stream: TokenStream<'a>,
    grammar: &'a Grammar,
    /// Furthest partial match of the current attempt: (elements matched, rule name)
    closest: Option<(usize, &'a str)>,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Spanned], grammar: &'a Grammar) -> Self {
        Parser {
            stream: TokenStream::new(tokens),
            grammar,
            closest: None,
        }
    }

    pub fn position(&self) -> usize {
        self.stream.position()
    }

    pub fn stream(&self) -> &TokenStream<'a> {
        &self.stream
    }

    pub fn is_at_end(&self) -> bool {
        !self.stream.has_next()
    }

    /// Parse actions until `Eof`, aborting on the first position no rule
    /// matches.
    pub fn parse_block(&mut self) -> Result<Block, ParseError> {
        let mut actions = Vec::new();
        while self.stream.has_next() {
            match self.parse_action()? {
                Some(action) => actions.push(action),
                None => return Err(self.no_match_error()),
            }
        }
        Ok(Block::new(actions))
    }

    /// Try every rule in order at the current position.
    ///
    /// Returns `Ok(None)` with the cursor unmoved when no rule matches.
    pub fn parse_action(&mut self) -> Result<Option<ActionNode>, ParseError> {
        self.closest = None;
        let grammar = self.grammar;
        for rule in grammar.rules() {
            if let Some(action) = self.match_rule(rule)? {
                log::debug!(
                    "matched rule '{}' at line {}",
                    action.action,
                    action.line
                );
                return Ok(Some(action));
            }
        }
        Ok(None)
    }

    /// Match one rule's elements in order. On mismatch the cursor is
    /// restored to where it was before the call.
    pub fn match_rule(&mut self, rule: &'a Rule) -> Result<Option<ActionNode>, ParseError> {
        // An empty rule would match without consuming anything.
        if rule.elements.is_empty() {
            return Ok(None);
        }

        let start = self.stream.save();
        let line = self.stream.line();
        let mut arguments = Arguments::new();

        for (matched, element) in rule.elements.iter().enumerate() {
            let ok = match element {
                Element::Keyword(text) => self.stream.skip_if_text(text),
                Element::Argument(name) => match self.parse_expr()? {
                    Some(expr) => {
                        arguments.insert(name.as_str(), expr);
                        true
                    }
                    None => false,
                },
            };
            if !ok {
                log::trace!(
                    "rule '{}' failed at element {} ({}), found {}",
                    rule.name,
                    matched,
                    element,
                    self.stream.peek()
                );
                self.note_progress(matched, &rule.name);
                self.stream.restore(start);
                return Ok(None);
            }
        }

        Ok(Some(ActionNode {
            action: rule.name.clone(),
            arguments,
            line,
        }))
    }

    fn note_progress(&mut self, matched: usize, rule: &'a str) {
        if matched == 0 {
            return;
        }
        match self.closest {
            Some((best, _)) if best >= matched => {}
            _ => self.closest = Some((matched, rule)),
        }
    }

    fn no_match_error(&self) -> ParseError {
        let cur = self.stream.peek_spanned();
        ParseError::Syntax {
            found: cur.token.clone(),
            position: self.stream.position(),
            line: cur.line,
            closest_rule: self.closest.map(|(_, name)| name.to_owned()),
        }
    }

    /// Like [`Parser::parse_block`], but on a position no rule matches the
    /// error is recorded and one token skipped. Collection stops after
    /// `max_errors` errors or the first fatal error.
    pub fn parse_block_recovering(&mut self, max_errors: usize) -> (Block, Vec<ParseError>) {
        let mut actions = Vec::new();
        let mut errors = Vec::new();

        while self.stream.has_next() {
            match self.parse_action() {
                Ok(Some(action)) => actions.push(action),
                Ok(None) => {
                    let err = self.no_match_error();
                    log::debug!("recovering: {}", err);
                    errors.push(err);
                    if errors.len() >= max_errors {
                        break;
                    }
                    self.stream.skip();
                }
                Err(e) => {
                    errors.push(e);
                    break;
                }
            }
        }

        (Block::new(actions), errors)
    }
}

// ──────────────────────────────────────────────
// Entry points
// ──────────────────────────────────────────────

pub fn parse(tokens: &[Spanned], grammar: &Grammar) -> Result<Block, ParseError> {
    let mut p = Parser::new(tokens, grammar);
    p.parse_block()
}

/// Parse in multi-error recovery mode.
///
/// Returns successfully-parsed actions plus accumulated errors. Recovery
/// skips exactly the one token at which no rule matched, then resumes.
pub fn parse_recovering(
    tokens: &[Spanned],
    grammar: &Grammar,
    max_errors: usize,
) -> (Block, Vec<ParseError>) {
    let mut p = Parser::new(tokens, grammar);
    p.parse_block_recovering(max_errors)
}

/// Lex and parse `src` in one step. Lexical diagnostics are logged, not
/// returned.
pub fn parse_source(src: &str, grammar: &Grammar) -> Result<Block, ParseError> {
    let lexed = lexer::lex(src);
    parse(&lexed.tokens, grammar)
}

// ──────────────────────────────────────────────
// Tests
// ──────────────────────────────────────────────
