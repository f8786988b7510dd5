//! Grammar files: the configuration surface of the CLI.
//!
//! A grammar file lists rules in priority order, in TOML or JSON (picked by
//! extension). Each rule has a `name` and exactly one of `pattern` (pattern
//! text such as `"send <message> to <target>"`) or `elements` (explicit
//! `{ keyword = "..." }` / `{ argument = "..." }` list).

use std::path::{Path, PathBuf};

use dsltk_core::{Element, Grammar, PatternError, Rule};
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum GrammarFileError {
    #[error("error reading grammar '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("error parsing TOML in '{}': {source}", path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("error parsing JSON in '{}': {source}", path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("'{}': unsupported grammar file extension (expected .toml or .json)", path.display())]
    UnknownFormat { path: PathBuf },

    #[error("'{}': rule '{rule}' must have exactly one of 'pattern' or 'elements'", path.display())]
    RuleShape { path: PathBuf, rule: String },

    #[error("'{}': rule '{rule}': {source}", path.display())]
    Pattern {
        path: PathBuf,
        rule: String,
        source: PatternError,
    },
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct GrammarDoc {
    #[serde(default, alias = "rules")]
    rule: Vec<RuleDoc>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RuleDoc {
    name: String,
    pattern: Option<String>,
    elements: Option<Vec<Element>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

fn format_for(path: &Path) -> Option<Format> {
    match path.extension().and_then(|e| e.to_str()) {
        Some("toml") => Some(Format::Toml),
        Some("json") => Some(Format::Json),
        _ => None,
    }
}

pub fn load(path: &Path) -> Result<Grammar, GrammarFileError> {
    let format = format_for(path).ok_or_else(|| GrammarFileError::UnknownFormat {
        path: path.to_owned(),
    })?;
    let text = std::fs::read_to_string(path).map_err(|source| GrammarFileError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_str(&text, format, path)
}

fn parse_str(text: &str, format: Format, path: &Path) -> Result<Grammar, GrammarFileError> {
    let doc: GrammarDoc = match format {
        Format::Toml => toml::from_str(text).map_err(|source| GrammarFileError::Toml {
            path: path.to_owned(),
            source,
        })?,
        Format::Json => serde_json::from_str(text).map_err(|source| GrammarFileError::Json {
            path: path.to_owned(),
            source,
        })?,
    };

    let mut grammar = Grammar::default();
    for rule in doc.rule {
        let built = match (rule.pattern, rule.elements) {
            (Some(pattern), None) => {
                Rule::from_pattern(rule.name.as_str(), &pattern).map_err(|source| {
                    GrammarFileError::Pattern {
                        path: path.to_owned(),
                        rule: rule.name.clone(),
                        source,
                    }
                })?
            }
            (None, Some(elements)) => Rule::new(rule.name, elements),
            _ => {
                return Err(GrammarFileError::RuleShape {
                    path: path.to_owned(),
                    rule: rule.name,
                })
            }
        };
        grammar.push(built);
    }
    log::debug!("loaded {} rule(s) from {}", grammar.len(), path.display());
    Ok(grammar)
}
