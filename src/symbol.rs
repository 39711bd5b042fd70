//! Knowledge graph symbols.
//!
//! A [`Symbol`] is an opaque node identifier of the form `root/namespace`,
//! e.g. `cambridge/uk.1`. The root is the lemma the symbol is registered
//! under; the namespace distinguishes senses that share a root. Roots use
//! `_` in place of spaces, so `new_york/1` renders as the text `new york`.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Separator between a symbol's root and its namespace.
pub const NAMESPACE_SEPARATOR: char = '/';

/// Opaque identifier for a graph node.
///
/// Ordering is by the full string, which gives candidate enumeration a
/// deterministic order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Wrap a raw symbol string.
    pub fn new(raw: impl Into<String>) -> Self {
        Symbol(raw.into())
    }

    /// Build a symbol from a root and a namespace.
    pub fn from_parts(root: &str, namespace: &str) -> Self {
        if namespace.is_empty() {
            Symbol(root.to_string())
        } else {
            Symbol(format!("{root}{NAMESPACE_SEPARATOR}{namespace}"))
        }
    }

    /// The raw symbol string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The root part (everything before the first `/`).
    pub fn root(&self) -> &str {
        match self.0.split_once(NAMESPACE_SEPARATOR) {
            Some((root, _)) => root,
            None => &self.0,
        }
    }

    /// The namespace part (the segment between the first and second `/`),
    /// empty if absent. Any further segments are not part of the namespace.
    pub fn namespace(&self) -> &str {
        self.0.split(NAMESPACE_SEPARATOR).nth(1).unwrap_or("")
    }

    /// Printable text of the symbol: its root with `_` replaced by spaces.
    pub fn to_text(&self) -> String {
        root_to_text(self.root())
    }

    /// Whitespace-separated tokens of the printable text.
    pub fn tokens(&self) -> Vec<String> {
        self.to_text()
            .split_whitespace()
            .map(str::to_string)
            .collect()
    }
}

/// Render a root lemma the way symbols render: `_` becomes a space.
pub fn root_to_text(root: &str) -> String {
    root.replace('_', " ")
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Symbol {
    fn from(raw: &str) -> Self {
        Symbol::new(raw)
    }
}

impl From<String> for Symbol {
    fn from(raw: String) -> Self {
        Symbol(raw)
    }
}
