//! Words, word bags, and the word model contract.
//!
//! A [`Word`] is produced by a [`WordModel`] from a single token and carries
//! the model's log-probability for that token plus its embedding vector.
//! Words compare, hash and order by their text alone, so a [`WordBag`]
//! collapses duplicates and iterates in a stable order.

pub mod extract;
pub mod lexicon;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A token as seen by the word model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Surface text (as normalized by the model).
    pub text: String,
    /// Log-probability of the token; more negative means rarer.
    pub prob: f64,
    /// Dense embedding. All zeros means the model has no vector for it.
    pub vector: Vec<f32>,
}

impl Word {
    /// Create a word.
    pub fn new(text: impl Into<String>, prob: f64, vector: Vec<f32>) -> Self {
        Self {
            text: text.into(),
            prob,
            vector,
        }
    }

    /// Whether the embedding has at least one non-zero component.
    pub fn has_vector(&self) -> bool {
        self.vector.iter().any(|&x| x != 0.0)
    }
}

impl PartialEq for Word {
    fn eq(&self, other: &Self) -> bool {
        self.text == other.text
    }
}

impl Eq for Word {}

impl Hash for Word {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.text.hash(state);
    }
}

impl PartialOrd for Word {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Word {
    fn cmp(&self, other: &Self) -> Ordering {
        self.text.cmp(&other.text)
    }
}

/// A set of informative words, unique by text.
pub type WordBag = BTreeSet<Word>;

/// Word model consumed by the disambiguator.
pub trait WordModel: Send + Sync {
    /// Turn a token into a word. Never fails: unknown tokens get a zero vector.
    fn make_word(&self, token: &str) -> Word;

    /// Symmetric similarity between two words.
    fn similarity(&self, a: &Word, b: &Word) -> f64;
}

impl<T: WordModel + ?Sized> WordModel for &T {
    fn make_word(&self, token: &str) -> Word {
        (**self).make_word(token)
    }

    fn similarity(&self, a: &Word, b: &Word) -> f64 {
        (**self).similarity(a, b)
    }
}

impl<T: WordModel + ?Sized> WordModel for Arc<T> {
    fn make_word(&self, token: &str) -> Word {
        (**self).make_word(token)
    }

    fn similarity(&self, a: &Word, b: &Word) -> f64 {
        (**self).similarity(a, b)
    }
}
