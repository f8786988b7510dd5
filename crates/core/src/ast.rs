//! Nodes produced by the parser.
//!
//! The tree is two levels deep: a [`Block`] of [`ActionNode`]s, each holding
//! atomic [`Expr`] values keyed by argument name. Nodes are immutable once
//! built and are handed to whatever renders or executes them.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ──────────────────────────────────────────────
// Expressions
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Expr {
    Number(f64),
    Str(String),
    Bool(bool),
    /// Reference to a variable by name (`$name` in source)
    Var(String),
    /// Ordered sub-expressions. Reserved for a richer expression grammar;
    /// the current parser never produces it.
    Sequence(Vec<Expr>),
}

impl Expr {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Expr::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Expr::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Expr::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_var(&self) -> Option<&str> {
        match self {
            Expr::Var(v) => Some(v),
            _ => None,
        }
    }
}

// ──────────────────────────────────────────────
// Arguments
// ──────────────────────────────────────────────

/// Argument values of one action, in the order the rule declares them.
///
/// Binding a name that is already present replaces its value in place, so
/// a rule that repeats an argument name keeps the last value at the first
/// position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    entries: Vec<(String, Expr)>,
}

impl Arguments {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to `value`, returning the previous value if the name was
    /// already bound.
    pub fn insert(&mut self, name: impl Into<String>, value: Expr) -> Option<Expr> {
        let name = name.into();
        if let Some(slot) = self.entries.iter_mut().find(|(n, _)| *n == name) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        self.entries.push((name, value));
        None
    }

    pub fn get(&self, name: &str) -> Option<&Expr> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}

impl FromIterator<(String, Expr)> for Arguments {
    fn from_iter<I: IntoIterator<Item = (String, Expr)>>(iter: I) -> Self {
        let mut args = Arguments::new();
        for (name, value) in iter {
            args.insert(name, value);
        }
        args
    }
}

impl Serialize for Arguments {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

// ──────────────────────────────────────────────
// Actions and blocks
// ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionNode {
    /// Name of the rule that matched
    pub action: String,
    pub arguments: Arguments,
    /// Line of the first token of the match
    pub line: u32,
}

impl ActionNode {
    pub fn arg(&self, name: &str) -> Option<&Expr> {
        self.arguments.get(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Block {
    pub actions: Vec<ActionNode>,
}

impl Block {
    pub fn new(actions: Vec<ActionNode>) -> Self {
        Block { actions }
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ActionNode> {
        self.actions.iter()
    }
}

impl<'a> IntoIterator for &'a Block {
    type Item = &'a ActionNode;
    type IntoIter = std::slice::Iter<'a, ActionNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.actions.iter()
    }
}
