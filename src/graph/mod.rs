//! Knowledge graph contract consumed by the disambiguator.
//!
//! The graph stores hyperedges: ordered lists of entities, where each entity
//! is either a [`Symbol`] or a nested [`Edge`]. The disambiguator only needs
//! three things from a graph backend, captured by the [`GraphStore`] trait:
//!
//! - the bounded neighborhood ("star") of a symbol,
//! - the set of symbols registered under a root lemma,
//! - a connectivity weight ("degree") per symbol.
//!
//! [`mem::MemGraph`] is an in-memory implementation backed by `petgraph`.

pub mod mem;

use std::collections::BTreeSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::symbol::Symbol;

/// Result type for graph operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// One element of a hyperedge.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Entity {
    /// A leaf symbol.
    Symbol(Symbol),
    /// A nested hyperedge.
    Edge(Edge),
}

impl From<Symbol> for Entity {
    fn from(s: Symbol) -> Self {
        Entity::Symbol(s)
    }
}

impl From<&str> for Entity {
    fn from(s: &str) -> Self {
        Entity::Symbol(Symbol::new(s))
    }
}

impl From<Edge> for Entity {
    fn from(e: Edge) -> Self {
        Entity::Edge(e)
    }
}

/// A hyperedge: an ordered list of entities.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Edge(pub Vec<Entity>);

impl Edge {
    /// Build an edge from anything convertible to entities.
    pub fn new<I, E>(entities: I) -> Self
    where
        I: IntoIterator<Item = E>,
        E: Into<Entity>,
    {
        Edge(entities.into_iter().map(Into::into).collect())
    }

    /// The top-level entities of this edge.
    pub fn entities(&self) -> &[Entity] {
        &self.0
    }

    /// Whether the edge has no entities.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// All symbols in the edge, flattened depth-first.
    pub fn symbols(&self) -> Vec<&Symbol> {
        let mut out = Vec::new();
        collect_symbols(&self.0, &mut out);
        out
    }
}

fn collect_symbols<'a>(entities: &'a [Entity], out: &mut Vec<&'a Symbol>) {
    for entity in entities {
        match entity {
            Entity::Symbol(s) => out.push(s),
            Entity::Edge(e) => collect_symbols(&e.0, out),
        }
    }
}

/// Graph backend consumed by the disambiguator.
pub trait GraphStore: Send + Sync {
    /// Up to `limit` edges incident to `symbol`.
    fn star(&self, symbol: &Symbol, limit: usize) -> GraphResult<Vec<Edge>>;

    /// All symbols registered under `root`.
    fn symbols_with_root(&self, root: &str) -> GraphResult<BTreeSet<Symbol>>;

    /// Connectivity weight of `symbol`; 0 for unknown symbols.
    fn degree(&self, symbol: &Symbol) -> GraphResult<f64>;
}

impl<T: GraphStore + ?Sized> GraphStore for &T {
    fn star(&self, symbol: &Symbol, limit: usize) -> GraphResult<Vec<Edge>> {
        (**self).star(symbol, limit)
    }

    fn symbols_with_root(&self, root: &str) -> GraphResult<BTreeSet<Symbol>> {
        (**self).symbols_with_root(root)
    }

    fn degree(&self, symbol: &Symbol) -> GraphResult<f64> {
        (**self).degree(symbol)
    }
}

impl<T: GraphStore + ?Sized> GraphStore for Arc<T> {
    fn star(&self, symbol: &Symbol, limit: usize) -> GraphResult<Vec<Edge>> {
        (**self).star(symbol, limit)
    }

    fn symbols_with_root(&self, root: &str) -> GraphResult<BTreeSet<Symbol>> {
        (**self).symbols_with_root(root)
    }

    fn degree(&self, symbol: &Symbol) -> GraphResult<f64> {
        (**self).degree(symbol)
    }
}
