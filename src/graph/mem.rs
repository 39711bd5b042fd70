//! In-memory hypergraph store.
//!
//! Uses `petgraph` for the symbol adjacency structure and `DashMap` for
//! lookups by symbol and by root. Each hyperedge is stored once; the petgraph
//! edges link the hyperedge's first symbol (its connector) to every other
//! symbol it contains and carry the hyperedge's index as their weight.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;
use std::sync::RwLock;

use dashmap::DashMap;
use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Deserialize;

use crate::error::GraphError;
use crate::symbol::Symbol;

use super::{Edge, GraphResult, GraphStore};

/// On-disk JSON layout accepted by [`MemGraph::from_json_str`].
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GraphFile {
    #[serde(default)]
    edges: Vec<Edge>,
    #[serde(default)]
    degrees: HashMap<String, f64>,
}

/// In-memory [`GraphStore`].
pub struct MemGraph {
    /// Symbol adjacency: edge weights are indices into `edges`.
    graph: RwLock<DiGraph<Symbol, usize>>,
    /// Hyperedges in insertion order.
    edges: RwLock<Vec<Edge>>,
    /// Symbol → NodeIndex mapping for O(1) node lookups.
    node_index: DashMap<Symbol, NodeIndex>,
    /// Root lemma → symbols registered under it.
    root_index: DashMap<String, BTreeSet<Symbol>>,
    /// Explicit degree overrides.
    degrees: DashMap<Symbol, f64>,
}

fn poisoned() -> GraphError {
    GraphError::Backend {
        message: "graph lock poisoned".into(),
    }
}

impl MemGraph {
    /// Create a new empty graph.
    pub fn new() -> Self {
        Self {
            graph: RwLock::new(DiGraph::new()),
            edges: RwLock::new(Vec::new()),
            node_index: DashMap::new(),
            root_index: DashMap::new(),
            degrees: DashMap::new(),
        }
    }

    /// Parse a graph from its JSON representation.
    pub fn from_json_str(json: &str) -> GraphResult<Self> {
        let file: GraphFile = serde_json::from_str(json).map_err(|e| GraphError::Malformed {
            message: e.to_string(),
        })?;
        let graph = Self::new();
        for edge in file.edges {
            graph.add_edge(edge)?;
        }
        for (symbol, degree) in file.degrees {
            graph.set_degree(Symbol::new(symbol), degree);
        }
        Ok(graph)
    }

    /// Load a graph from a JSON file.
    pub fn load_json(path: &Path) -> GraphResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| GraphError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Register a symbol under its root without attaching any edge.
    pub fn add_symbol(&self, symbol: Symbol) -> GraphResult<()> {
        let mut graph = self.graph.write().map_err(|_| poisoned())?;
        self.ensure_node(&mut graph, &symbol);
        Ok(())
    }

    fn ensure_node(&self, graph: &mut DiGraph<Symbol, usize>, symbol: &Symbol) -> NodeIndex {
        if let Some(idx) = self.node_index.get(symbol) {
            return *idx.value();
        }
        let idx = graph.add_node(symbol.clone());
        self.node_index.insert(symbol.clone(), idx);
        self.root_index
            .entry(symbol.root().to_string())
            .or_default()
            .insert(symbol.clone());
        idx
    }

    /// Insert a hyperedge. Every symbol it contains becomes a node.
    pub fn add_edge(&self, edge: Edge) -> GraphResult<()> {
        let symbols: Vec<Symbol> = edge.symbols().into_iter().cloned().collect();
        let Some((connector, rest)) = symbols.split_first() else {
            return Err(GraphError::Malformed {
                message: "edges must contain at least one symbol".into(),
            });
        };

        let mut graph = self.graph.write().map_err(|_| poisoned())?;
        let mut edges = self.edges.write().map_err(|_| poisoned())?;
        let edge_id = edges.len();

        let from = self.ensure_node(&mut graph, connector);
        if rest.is_empty() {
            graph.add_edge(from, from, edge_id);
        }
        for symbol in rest {
            let to = self.ensure_node(&mut graph, symbol);
            graph.add_edge(from, to, edge_id);
        }
        edges.push(edge);
        Ok(())
    }

    /// Override the degree reported for `symbol`.
    pub fn set_degree(&self, symbol: Symbol, degree: f64) {
        self.degrees.insert(symbol, degree);
    }

    /// Indices of the hyperedges `symbol` occurs in, ascending.
    fn incident_edge_ids(&self, symbol: &Symbol) -> GraphResult<BTreeSet<usize>> {
        let Some(idx) = self.node_index.get(symbol).map(|r| *r.value()) else {
            return Ok(BTreeSet::new());
        };
        let graph = self.graph.read().map_err(|_| poisoned())?;
        let ids = graph
            .edges_directed(idx, Direction::Outgoing)
            .chain(graph.edges_directed(idx, Direction::Incoming))
            .map(|e| *e.weight())
            .collect();
        Ok(ids)
    }

    /// Number of symbols.
    pub fn symbol_count(&self) -> usize {
        self.node_index.len()
    }

    /// Number of hyperedges.
    pub fn edge_count(&self) -> usize {
        self.edges.read().map(|e| e.len()).unwrap_or(0)
    }
}

impl GraphStore for MemGraph {
    fn star(&self, symbol: &Symbol, limit: usize) -> GraphResult<Vec<Edge>> {
        let ids = self.incident_edge_ids(symbol)?;
        let edges = self.edges.read().map_err(|_| poisoned())?;
        Ok(ids
            .into_iter()
            .take(limit)
            .filter_map(|id| edges.get(id).cloned())
            .collect())
    }

    fn symbols_with_root(&self, root: &str) -> GraphResult<BTreeSet<Symbol>> {
        Ok(self
            .root_index
            .get(root)
            .map(|r| r.value().clone())
            .unwrap_or_default())
    }

    fn degree(&self, symbol: &Symbol) -> GraphResult<f64> {
        if let Some(d) = self.degrees.get(symbol) {
            return Ok(*d.value());
        }
        Ok(self.incident_edge_ids(symbol)?.len() as f64)
    }
}

impl Default for MemGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemGraph {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemGraph")
            .field("symbols", &self.symbol_count())
            .field("edges", &self.edge_count())
            .finish()
    }
}
