//! Lexicon: an in-memory word model.
//!
//! Maps lowercase tokens to a log-probability and an embedding vector,
//! with cosine similarity between vectors. Tokens the lexicon has never
//! seen get `oov_prob` and an all-zero vector, which makes them
//! uninformative to the word bag extractor.

use std::path::Path;

use dashmap::DashMap;
use serde::{Deserialize, Serialize};

use crate::error::WordModelError;

use super::{Word, WordModel};

/// Result type for lexicon operations.
pub type LexiconResult<T> = std::result::Result<T, WordModelError>;

/// One lexicon row, as stored in lexicon JSON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LexiconEntry {
    pub text: String,
    pub prob: f64,
    pub vector: Vec<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct LexiconFile {
    dimension: usize,
    #[serde(default)]
    oov_prob: Option<f64>,
    #[serde(default)]
    entries: Vec<LexiconEntry>,
}

/// In-memory [`WordModel`] backed by a concurrent token table.
pub struct Lexicon {
    entries: DashMap<String, (f64, Vec<f32>)>,
    dimension: usize,
    oov_prob: f64,
}

impl Lexicon {
    /// Log-probability given to unknown tokens.
    pub const DEFAULT_OOV_PROB: f64 = 0.0;

    /// Create an empty lexicon for vectors of the given dimension.
    pub fn new(dimension: usize) -> Self {
        Self {
            entries: DashMap::new(),
            dimension,
            oov_prob: Self::DEFAULT_OOV_PROB,
        }
    }

    /// Set the log-probability reported for unknown tokens.
    pub fn with_oov_prob(mut self, oov_prob: f64) -> Self {
        self.oov_prob = oov_prob;
        self
    }

    /// Insert or replace a token.
    pub fn insert(&self, text: &str, prob: f64, vector: Vec<f32>) -> LexiconResult<()> {
        if vector.len() != self.dimension {
            return Err(WordModelError::DimensionMismatch {
                text: text.to_string(),
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        self.entries.insert(text.to_lowercase(), (prob, vector));
        Ok(())
    }

    /// Parse a lexicon from JSON.
    pub fn from_json_str(json: &str) -> LexiconResult<Self> {
        let file: LexiconFile =
            serde_json::from_str(json).map_err(|e| WordModelError::Malformed {
                message: e.to_string(),
            })?;
        let mut lexicon = Self::new(file.dimension);
        if let Some(oov) = file.oov_prob {
            lexicon.oov_prob = oov;
        }
        for entry in file.entries {
            lexicon.insert(&entry.text, entry.prob, entry.vector)?;
        }
        Ok(lexicon)
    }

    /// Load a lexicon from a JSON file.
    pub fn load_json(path: &Path) -> LexiconResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| WordModelError::Io {
            path: path.display().to_string(),
            source: e,
        })?;
        Self::from_json_str(&content)
    }

    /// Embedding dimension.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether the token is known (case-insensitive).
    pub fn contains(&self, token: &str) -> bool {
        self.entries.contains_key(&token.to_lowercase())
    }

    /// Number of known tokens.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the lexicon is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl WordModel for Lexicon {
    fn make_word(&self, token: &str) -> Word {
        let text = token.to_lowercase();
        match self.entries.get(&text) {
            Some(entry) => {
                let (prob, vector) = entry.value();
                Word::new(text.clone(), *prob, vector.clone())
            }
            None => Word::new(text, self.oov_prob, vec![0.0; self.dimension]),
        }
    }

    fn similarity(&self, a: &Word, b: &Word) -> f64 {
        cosine(&a.vector, &b.vector)
    }
}

/// Cosine similarity; 0 when either vector has zero norm or lengths differ.
pub fn cosine(a: &[f32], b: &[f32]) -> f64 {
    if a.len() != b.len() {
        return 0.0;
    }
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (&x, &y) in a.iter().zip(b) {
        let (x, y) = (f64::from(x), f64::from(y));
        dot += x * y;
        na += x * x;
        nb += y * y;
    }
    if na == 0.0 || nb == 0.0 {
        return 0.0;
    }
    dot / (na.sqrt() * nb.sqrt())
}

impl std::fmt::Debug for Lexicon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Lexicon")
            .field("dimension", &self.dimension)
            .field("oov_prob", &self.oov_prob)
            .field("len", &self.entries.len())
            .finish()
    }
}
