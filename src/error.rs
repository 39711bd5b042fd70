//! Rich diagnostic error types for sense-graph.
//!
//! Each subsystem defines its own error type with miette `#[diagnostic]` derives,
//! providing error codes, help text, and source chains. Note that disambiguation
//! itself never fails for lack of a sense: "no sense found" is an `Ok` result.

use miette::Diagnostic;
use thiserror::Error;

/// Top-level error type for sense-graph.
///
/// Each variant wraps a subsystem-specific error, preserving the full diagnostic
/// chain through to the caller.
#[derive(Debug, Error, Diagnostic)]
pub enum SenseError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Graph(#[from] GraphError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    WordModel(#[from] WordModelError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Input(#[from] InputError),
}

// ---------------------------------------------------------------------------
// Graph errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum GraphError {
    #[error("graph backend error: {message}")]
    #[diagnostic(
        code(sense::graph::backend),
        help(
            "The graph store failed to answer a neighborhood, root or degree lookup. \
             Check that the backend is reachable and its data is intact."
        )
    )]
    Backend { message: String },

    #[error("malformed graph data: {message}")]
    #[diagnostic(
        code(sense::graph::malformed),
        help(
            "Graph JSON must look like {{\"edges\": [[\"a/1\", \"b/2\"], ...], \"degrees\": {{}}}}. \
             Strings are symbols, nested arrays are nested edges, and edges may not be empty."
        )
    )]
    Malformed { message: String },

    #[error("failed to read graph file {path}")]
    #[diagnostic(
        code(sense::graph::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Word model errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum WordModelError {
    #[error("vector dimension mismatch for \"{text}\": expected {expected}, got {actual}")]
    #[diagnostic(
        code(sense::words::dim_mismatch),
        help(
            "Every embedding in a lexicon must share the lexicon's dimension. \
             Re-export the vectors with a consistent size."
        )
    )]
    DimensionMismatch {
        text: String,
        expected: usize,
        actual: usize,
    },

    #[error("malformed lexicon data: {message}")]
    #[diagnostic(
        code(sense::words::malformed),
        help(
            "Lexicon JSON must look like {{\"dimension\": n, \"entries\": \
             [{{\"text\": \"..\", \"prob\": -9.5, \"vector\": [..]}}]}}."
        )
    )]
    Malformed { message: String },

    #[error("failed to read lexicon file {path}")]
    #[diagnostic(
        code(sense::words::io),
        help("Check that the file exists and is readable.")
    )]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("invalid configuration value for `{field}`: {message}")]
    #[diagnostic(
        code(sense::config::invalid),
        help("Check the DisambiguationConfig fields. {message}")
    )]
    InvalidValue { field: String, message: String },

    #[error("failed to read config file {path}")]
    #[diagnostic(
        code(sense::config::read),
        help("Check that the file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write config file {path}")]
    #[diagnostic(
        code(sense::config::write),
        help("Check that the parent directory is writable.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {message}")]
    #[diagnostic(
        code(sense::config::parse),
        help("The config file must be valid TOML. Unknown keys are rejected.")
    )]
    Parse { path: String, message: String },

    #[error("failed to serialize config for {path}: {message}")]
    #[diagnostic(
        code(sense::config::serialize),
        help("Every config value must be representable in TOML.")
    )]
    Serialize { path: String, message: String },
}

// ---------------------------------------------------------------------------
// Input errors
// ---------------------------------------------------------------------------

#[derive(Debug, Error, Diagnostic)]
pub enum InputError {
    #[error("no roots given for disambiguation")]
    #[diagnostic(
        code(sense::input::no_roots),
        help("Pass at least one lemma, e.g. [\"stocks\", \"stock\"].")
    )]
    NoRoots,

    #[error("root at position {index} is blank")]
    #[diagnostic(
        code(sense::input::blank_root),
        help("Roots must contain at least one non-whitespace character.")
    )]
    BlankRoot { index: usize },
}

/// Convenience alias for functions returning sense-graph results.
pub type SenseResult<T> = std::result::Result<T, SenseError>;
