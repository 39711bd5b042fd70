// thiserror's #[error("...{field}...")] format strings reference struct fields,
// but the compiler doesn't see through the derive macro and reports false positives.
#![allow(unused_assignments)]

//! # sense-graph
//!
//! Word-sense disambiguation over a symbolic knowledge graph.
//!
//! Given the root lemmas of an ambiguous word and a short context text,
//! sense-graph picks the graph symbol whose neighborhood is semantically
//! closest to the context.
//!
//! ## Architecture
//!
//! - **Symbols** (`symbol`): `root/namespace` node identifiers
//! - **Graph contract** (`graph`): hyperedges, the [`graph::GraphStore`] trait and an in-memory store
//! - **Words** (`words`): the [`words::WordModel`] trait, an in-memory lexicon and word bag extraction
//! - **Sense selection** (`sense`): pair cache, bag similarity, candidate metrics, disambiguator
//!
//! ## Library usage
//!
//! ```no_run
//! use sense_graph::graph::Edge;
//! use sense_graph::graph::mem::MemGraph;
//! use sense_graph::sense::Disambiguator;
//! use sense_graph::words::lexicon::Lexicon;
//!
//! let graph = MemGraph::new();
//! graph.add_edge(Edge::new(["in/1", "cambridge/uk.1", "england/1"])).unwrap();
//! graph.add_edge(Edge::new(["in/1", "cambridge/us.1", "massachusetts/1"])).unwrap();
//!
//! let lexicon = Lexicon::load_json("vectors.json".as_ref()).unwrap();
//! let d = Disambiguator::with_defaults(graph, lexicon);
//! let no_filter: [&str; 0] = [];
//! let sense = d.best_sense(&["cambridge"], "Cambridge near London in England.", &no_filter).unwrap();
//! println!("{:?} ({})", sense.symbol, sense.metrics);
//! ```

pub mod config;
pub mod error;
pub mod graph;
pub mod sense;
pub mod symbol;
pub mod words;
