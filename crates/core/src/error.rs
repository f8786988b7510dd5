use serde::Serialize;

use crate::lexer::Token;

/// A parse failure surfaced to the caller.
///
/// Individual rule mismatches never show up here; they are resolved by
/// backtracking inside the matcher.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParseError {
    /// No rule in the grammar matches at `position`.
    #[error("line {line}: no rule matches at token {position} {found}{}", closest_suffix(.closest_rule))]
    Syntax {
        found: Token,
        position: usize,
        line: u32,
        /// Rule that consumed the most tokens before failing, if any got past
        /// its first element.
        #[serde(skip_serializing_if = "Option::is_none")]
        closest_rule: Option<String>,
    },

    /// An explicit expectation on the stream failed.
    #[error("line {line}: expected {expected}, got {found}")]
    Expected {
        expected: String,
        found: Token,
        position: usize,
        line: u32,
    },

    /// A number token whose text is not a valid `f64`.
    #[error("line {line}: invalid number literal '{text}'")]
    InvalidNumber {
        text: String,
        position: usize,
        line: u32,
    },
}

fn closest_suffix(rule: &Option<String>) -> String {
    match rule {
        Some(r) => format!(" (closest rule: {})", r),
        None => String::new(),
    }
}

impl ParseError {
    pub fn line(&self) -> u32 {
        match self {
            ParseError::Syntax { line, .. }
            | ParseError::Expected { line, .. }
            | ParseError::InvalidNumber { line, .. } => *line,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            ParseError::Syntax { position, .. }
            | ParseError::Expected { position, .. }
            | ParseError::InvalidNumber { position, .. } => *position,
        }
    }

    /// Fatal errors end a recovering parse immediately.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ParseError::InvalidNumber { .. })
    }

    /// JSON form used by the CLI for `--output json`. Always includes
    /// `message` next to the structured fields.
    pub fn to_json_value(&self) -> serde_json::Value {
        let mut value = serde_json::to_value(self).unwrap_or_else(|_| serde_json::json!({}));
        if let serde_json::Value::Object(map) = &mut value {
            map.insert(
                "message".to_owned(),
                serde_json::Value::String(self.to_string()),
            );
        }
        value
    }
}
