//! dsltk-core: tokenizer and rule-driven backtracking parser for small
//! command-style languages.
//!
//! A caller supplies a [`Grammar`]: an ordered list of [`Rule`]s, each a
//! sequence of keyword literals and named argument slots. Source text is
//! lexed into tokens, then matched against the rules to produce a [`Block`]
//! of [`ActionNode`]s.
//!
//! # Public API
//!
//! - [`lex()`] -- source text to an `Eof`-terminated token sequence
//! - [`parse()`] / [`parse_source()`] -- tokens (or text) to a [`Block`]
//! - [`parse_recovering()`] -- multi-error mode that skips unmatched tokens
//! - [`TokenStream`] -- cursor with explicit save/restore
//! - [`ParseError`] -- structured parse failure

pub mod ast;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod parser;
pub mod stream;

// ── Convenience re-exports: key types ────────────────────────────────

pub use ast::{ActionNode, Arguments, Block, Expr};
pub use error::ParseError;
pub use grammar::{Element, Grammar, GrammarWarning, PatternError, Rule, RuleBuilder};
pub use lexer::{LexDiagnostic, Lexed, Spanned, Token, TokenKind};
pub use stream::{Checkpoint, TokenStream};

// ── Convenience re-exports: pipeline entry points ────────────────────

pub use lexer::lex;
pub use parser::{parse, parse_recovering, parse_source, Parser, DEFAULT_MAX_ERRORS};
