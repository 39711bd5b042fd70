//! Word bag similarity.
//!
//! Two bags are compared by summing a contribution over every pair in their
//! Cartesian product. A pair contributes only if the model rates it more
//! similar than the threshold; the contribution then grows with the rarity of
//! both words:
//!
//! ```text
//! contribution = 1 / (exp(p1) * exp(p2) * sim)     if sim > threshold
//!              = 0                                  otherwise
//! ```
//!
//! Contributions are memoized in a shared [`SimilarityCache`].

use std::collections::HashSet;

use crate::config::DisambiguationConfig;
use crate::words::{Word, WordBag, WordModel};

use super::cache::SimilarityCache;

/// Whether a word pair is left out of scoring.
///
/// A pair is skipped only when *both* words are excluded; a pair with a
/// single excluded word is still scored.
pub fn is_excluded_pair(a: &str, b: &str, exclude: &HashSet<String>) -> bool {
    exclude.contains(a) && exclude.contains(b)
}

/// Contribution of a word pair with the given model similarity.
///
/// Only positive similarities above `threshold` contribute.
pub fn pair_contribution(a: &Word, b: &Word, sim: f64, threshold: f64) -> f64 {
    if sim > threshold && sim > 0.0 {
        1.0 / (a.prob.exp() * b.prob.exp() * sim)
    } else {
        0.0
    }
}

/// Detailed result of a bag comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimilarityOutcome {
    /// Sum of pair contributions.
    pub score: f64,
    /// Number of pairs scored (skipped pairs excluded).
    pub pairs: usize,
    /// Whether scoring stopped at the max-pair limit.
    pub interrupted: bool,
}

/// Scores word bags against each other through a shared cache.
pub struct WordBagSimilarity<'a, M> {
    model: &'a M,
    cache: &'a SimilarityCache,
    threshold: f64,
    max_pairs: Option<usize>,
}

impl<'a, M: WordModel> WordBagSimilarity<'a, M> {
    /// Create a scorer using the thresholds in `config`.
    pub fn new(model: &'a M, cache: &'a SimilarityCache, config: &DisambiguationConfig) -> Self {
        Self {
            model,
            cache,
            threshold: config.similarity_threshold,
            max_pairs: config.pair_limit(),
        }
    }

    /// Cached contribution of a single pair, computing it on a miss.
    pub fn pair_score(&self, a: &Word, b: &Word) -> f64 {
        self.cache.get_or_insert_with(&a.text, &b.text, || {
            let sim = self.model.similarity(a, b);
            pair_contribution(a, b, sim, self.threshold)
        })
    }

    /// Similarity of two bags, ignoring pairs whose words are both in `exclude`.
    pub fn words_similarity(
        &self,
        words1: &WordBag,
        words2: &WordBag,
        exclude: &HashSet<String>,
    ) -> f64 {
        self.compare(words1, words2, exclude).score
    }

    /// Like [`words_similarity`](Self::words_similarity), with pair counts.
    pub fn compare(
        &self,
        words1: &WordBag,
        words2: &WordBag,
        exclude: &HashSet<String>,
    ) -> SimilarityOutcome {
        tracing::debug!(
            left = words1.len(),
            right = words2.len(),
            "starting to compute words similarity"
        );
        let mut score = 0.0;
        let mut pairs = 0;

        for w1 in words1 {
            for w2 in words2 {
                if is_excluded_pair(&w1.text, &w2.text, exclude) {
                    continue;
                }
                score += self.pair_score(w1, w2);
                pairs += 1;
                if self.max_pairs.is_some_and(|max| pairs >= max) {
                    tracing::debug!(pairs, "words similarity computed [interrupted: max pairs]");
                    return SimilarityOutcome {
                        score,
                        pairs,
                        interrupted: true,
                    };
                }
            }
        }

        tracing::debug!(pairs, score, "words similarity computed");
        SimilarityOutcome {
            score,
            pairs,
            interrupted: false,
        }
    }
}
