//! Grammar model: an ordered list of named rules, each an ordered list of
//! keyword literals and named argument slots.
//!
//! Rules are built once by the caller and only read by the parser. Order is
//! priority: the first rule whose elements all match wins.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::lexer;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Element {
    /// Matches a token whose text equals the literal, whatever its kind.
    Keyword(String),
    /// Parses one expression and binds it under this name.
    Argument(String),
}

impl Element {
    pub fn keyword(text: impl Into<String>) -> Self {
        Element::Keyword(text.into())
    }

    pub fn argument(name: impl Into<String>) -> Self {
        Element::Argument(name.into())
    }

    pub fn text(&self) -> &str {
        match self {
            Element::Keyword(t) | Element::Argument(t) => t,
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::Keyword(k) => f.write_str(k),
            Element::Argument(a) => write!(f, "<{}>", a),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub name: String,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern is empty")]
    Empty,
    #[error("argument '{0}' is missing its closing '>'")]
    UnclosedArgument(String),
    #[error("'{0}': argument names may not contain '<' or '>'")]
    InvalidArgument(String),
}

impl Rule {
    pub fn new(name: impl Into<String>, elements: Vec<Element>) -> Self {
        Rule {
            name: name.into(),
            elements,
        }
    }

    pub fn builder(name: impl Into<String>) -> RuleBuilder {
        RuleBuilder::new(name)
    }

    /// Build a rule from whitespace-separated pattern text. `<name>` is an
    /// argument slot; any other word is a keyword, so operators such as `<`
    /// and `<=` are written as-is.
    ///
    /// `Rule::from_pattern("send", "send <message> to <target>")`
    pub fn from_pattern(name: impl Into<String>, pattern: &str) -> Result<Self, PatternError> {
        let mut elements = Vec::new();
        for word in pattern.split_whitespace() {
            match argument_slot(word)? {
                Some(arg) => elements.push(Element::argument(arg)),
                None => elements.push(Element::keyword(word)),
            }
        }
        if elements.is_empty() {
            return Err(PatternError::Empty);
        }
        Ok(Rule::new(name, elements))
    }

    /// Pattern text equivalent to this rule's elements.
    pub fn pattern(&self) -> String {
        self.elements
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Argument names in declaration order, repeats included.
    pub fn arguments(&self) -> impl Iterator<Item = &str> {
        self.elements.iter().filter_map(|e| match e {
            Element::Argument(a) => Some(a.as_str()),
            Element::Keyword(_) => None,
        })
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} := {}", self.name, self.pattern())
    }
}

/// Incremental rule construction: `keyword`/`argument` calls append elements
/// in order.
#[derive(Debug, Clone)]
pub struct RuleBuilder {
    name: String,
    elements: Vec<Element>,
}

impl RuleBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        RuleBuilder {
            name: name.into(),
            elements: Vec::new(),
        }
    }

    pub fn keyword(mut self, text: impl Into<String>) -> Self {
        self.elements.push(Element::keyword(text));
        self
    }

    pub fn argument(mut self, name: impl Into<String>) -> Self {
        self.elements.push(Element::argument(name));
        self
    }

    pub fn build(self) -> Rule {
        Rule::new(self.name, self.elements)
    }
}

// ──────────────────────────────────────────────
// Grammar
// ──────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Grammar {
    rules: Vec<Rule>,
}

/// Non-fatal grammar authoring problems reported by [`Grammar::lint`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum GrammarWarning {
    /// A rule with no elements never matches.
    EmptyRule { rule: String },
    /// The later binding overwrites the earlier one.
    DuplicateArgument { rule: String, argument: String },
    DuplicateRuleName { rule: String },
    /// The keyword text is not a single bare token; only a quoted string
    /// with the same text matches it.
    QuotedOnlyKeyword { rule: String, keyword: String },
    /// The keyword holds both quote characters, so no token carries its text.
    UnmatchableKeyword { rule: String, keyword: String },
    /// An earlier rule's elements are a prefix of this rule's, so the earlier
    /// rule always wins.
    Shadowed { rule: String, by: String },
}

impl fmt::Display for GrammarWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarWarning::EmptyRule { rule } => {
                write!(f, "rule '{}' has no elements and never matches", rule)
            }
            GrammarWarning::DuplicateArgument { rule, argument } => write!(
                f,
                "rule '{}' declares argument '{}' more than once; the last value wins",
                rule, argument
            ),
            GrammarWarning::DuplicateRuleName { rule } => {
                write!(f, "rule name '{}' is used more than once", rule)
            }
            GrammarWarning::QuotedOnlyKeyword { rule, keyword } => write!(
                f,
                "rule '{}': keyword '{}' is not a single token and matches only as a quoted string",
                rule, keyword
            ),
            GrammarWarning::UnmatchableKeyword { rule, keyword } => write!(
                f,
                "rule '{}': keyword '{}' contains both quote characters and never matches",
                rule, keyword
            ),
            GrammarWarning::Shadowed { rule, by } => write!(
                f,
                "rule '{}' is unreachable: earlier rule '{}' matches a prefix of it",
                rule, by
            ),
        }
    }
}

impl Grammar {
    pub fn new(rules: Vec<Rule>) -> Self {
        Grammar { rules }
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Check for authoring mistakes. Parsing never depends on this.
    pub fn lint(&self) -> Vec<GrammarWarning> {
        let mut warnings = Vec::new();
        let mut names = HashSet::new();

        for (idx, rule) in self.rules.iter().enumerate() {
            if !names.insert(rule.name.as_str()) {
                warnings.push(GrammarWarning::DuplicateRuleName {
                    rule: rule.name.clone(),
                });
            }

            if rule.elements.is_empty() {
                warnings.push(GrammarWarning::EmptyRule {
                    rule: rule.name.clone(),
                });
                continue;
            }

            let mut seen = HashSet::new();
            let mut reported = HashSet::new();
            for arg in rule.arguments() {
                if !seen.insert(arg) && reported.insert(arg) {
                    warnings.push(GrammarWarning::DuplicateArgument {
                        rule: rule.name.clone(),
                        argument: arg.to_owned(),
                    });
                }
            }

            for element in &rule.elements {
                if let Element::Keyword(k) = element {
                    if is_bare_token(k) {
                        continue;
                    }
                    let rule = rule.name.clone();
                    let keyword = k.clone();
                    warnings.push(if k.contains('\'') && k.contains('"') {
                        GrammarWarning::UnmatchableKeyword { rule, keyword }
                    } else {
                        GrammarWarning::QuotedOnlyKeyword { rule, keyword }
                    });
                }
            }

            let shadow = self.rules[..idx]
                .iter()
                .find(|earlier| !earlier.elements.is_empty() && rule.elements.starts_with(&earlier.elements));
            if let Some(earlier) = shadow {
                warnings.push(GrammarWarning::Shadowed {
                    rule: rule.name.clone(),
                    by: earlier.name.clone(),
                });
            }
        }

        warnings
    }
}

impl From<Vec<Rule>> for Grammar {
    fn from(rules: Vec<Rule>) -> Self {
        Grammar::new(rules)
    }
}

impl FromIterator<Rule> for Grammar {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Grammar::new(iter.into_iter().collect())
    }
}

/// `Some(name)` for a `<name>` word. A word opening with `<` followed by a
/// name character must be a well-formed slot; anything else is a keyword.
fn argument_slot(word: &str) -> Result<Option<&str>, PatternError> {
    let Some(rest) = word.strip_prefix('<') else {
        return Ok(None);
    };
    match rest.chars().next() {
        Some(c) if c.is_alphanumeric() || c == '_' => {}
        _ => return Ok(None),
    }
    let arg = rest
        .strip_suffix('>')
        .ok_or_else(|| PatternError::UnclosedArgument(word.to_owned()))?;
    if arg.contains(['<', '>']) {
        return Err(PatternError::InvalidArgument(word.to_owned()));
    }
    Ok(Some(arg))
}

fn is_bare_token(text: &str) -> bool {
    let lexed = lexer::scan(text);
    lexed.is_clean() && lexed.tokens.len() == 2 && lexed.tokens[0].token.text == text
}
