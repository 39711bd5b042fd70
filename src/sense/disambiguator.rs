//! Sense selection.
//!
//! [`Disambiguator::best_sense`] gathers every symbol registered under the
//! query roots, drops those outside the allowed namespaces, scores each
//! remaining candidate's neighborhood against the context text and keeps the
//! best one by [`CandidateMetrics::better_than`].
//!
//! Candidates are visited in ascending [`Symbol`] order. A candidate replaces
//! the current best only when strictly better, so on a full tie the lowest
//! symbol wins.

use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::DisambiguationConfig;
use crate::error::{InputError, SenseResult};
use crate::graph::GraphStore;
use crate::symbol::{Symbol, root_to_text};
use crate::words::extract::{TextWords, WordBagExtractor};
use crate::words::{WordBag, WordModel};

use super::cache::SimilarityCache;
use super::metrics::CandidateMetrics;
use super::similarity::WordBagSimilarity;

/// Whether a namespace passes the filter.
///
/// An empty filter accepts everything; otherwise the namespace must start
/// with one of the given prefixes.
pub fn check_namespace<S: AsRef<str>>(namespace: &str, namespaces: &[S]) -> bool {
    namespaces.is_empty() || namespaces.iter().any(|ns| namespace.starts_with(ns.as_ref()))
}

/// Outcome of [`Disambiguator::best_sense`].
///
/// `symbol` is `None` with zero metrics when no candidate beat the zero
/// baseline: no candidates, all filtered out, or all scored zero with zero
/// degree. These cases are deliberately not distinguished.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Sense {
    pub symbol: Option<Symbol>,
    pub metrics: CandidateMetrics,
}

impl Sense {
    /// Whether a sense was selected.
    pub fn is_found(&self) -> bool {
        self.symbol.is_some()
    }
}

/// One scored candidate, as returned by [`Disambiguator::rank_senses`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedSense {
    pub symbol: Symbol,
    pub metrics: CandidateMetrics,
}

/// Chooses the sense of a word from its graph context.
pub struct Disambiguator<G, M> {
    graph: G,
    model: M,
    cache: Arc<SimilarityCache>,
    config: DisambiguationConfig,
}

impl<G: GraphStore, M: WordModel> Disambiguator<G, M> {
    /// Create a disambiguator sharing `cache` for pair contributions.
    pub fn new(
        graph: G,
        model: M,
        cache: Arc<SimilarityCache>,
        config: DisambiguationConfig,
    ) -> SenseResult<Self> {
        config.validate()?;
        Ok(Self {
            graph,
            model,
            cache,
            config,
        })
    }

    /// Create a disambiguator with the default config and a fresh cache.
    pub fn with_defaults(graph: G, model: M) -> Self {
        let config = DisambiguationConfig::default();
        let cache = Arc::new(SimilarityCache::new(config.cache_capacity));
        Self {
            graph,
            model,
            cache,
            config,
        }
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn cache(&self) -> &Arc<SimilarityCache> {
        &self.cache
    }

    pub fn config(&self) -> &DisambiguationConfig {
        &self.config
    }

    /// Word bag extractor bound to this disambiguator's model and config.
    pub fn extractor(&self) -> WordBagExtractor<'_, M> {
        WordBagExtractor::new(&self.model, &self.config)
    }

    /// Bag scorer bound to this disambiguator's model, cache and config.
    pub fn scorer(&self) -> WordBagSimilarity<'_, M> {
        WordBagSimilarity::new(&self.model, &self.cache, &self.config)
    }

    /// Informative words around `symbol`.
    pub fn words_around_symbol(&self, symbol: &Symbol) -> SenseResult<WordBag> {
        Ok(self.extractor().words_around_symbol(&self.graph, symbol)?)
    }

    /// Words of a free text; see [`WordBagExtractor::words_from_text`].
    pub fn words_from_text(&self, text: &str) -> TextWords {
        self.extractor().words_from_text(text)
    }

    /// Similarity of two word bags.
    pub fn words_similarity(
        &self,
        words1: &WordBag,
        words2: &WordBag,
        exclude: &HashSet<String>,
    ) -> f64 {
        self.scorer().words_similarity(words1, words2, exclude)
    }

    /// Pick the candidate sense of `roots` closest to `aux_text`.
    ///
    /// Fails only on invalid roots or a graph backend error.
    pub fn best_sense<R, N>(&self, roots: &[R], aux_text: &str, namespaces: &[N]) -> SenseResult<Sense>
    where
        R: AsRef<str>,
        N: AsRef<str>,
    {
        let mut best = Sense::default();
        for ranked in self.score_candidates(roots, aux_text, namespaces)? {
            if ranked.metrics.better_than(&best.metrics) {
                best = Sense {
                    symbol: Some(ranked.symbol),
                    metrics: ranked.metrics,
                };
            }
        }
        Ok(best)
    }

    /// All eligible candidates with their metrics, best first.
    ///
    /// Equally ranked candidates keep ascending symbol order, so the first
    /// element (if it beats zero metrics) is what [`best_sense`](Self::best_sense)
    /// returns.
    pub fn rank_senses<R, N>(
        &self,
        roots: &[R],
        aux_text: &str,
        namespaces: &[N],
    ) -> SenseResult<Vec<RankedSense>>
    where
        R: AsRef<str>,
        N: AsRef<str>,
    {
        let mut ranked = self.score_candidates(roots, aux_text, namespaces)?;
        // Stable sort: ties stay in symbol order.
        ranked.sort_by(|a, b| a.metrics.rank_cmp(&b.metrics));
        Ok(ranked)
    }

    /// Score every eligible candidate, in ascending symbol order.
    fn score_candidates<R, N>(
        &self,
        roots: &[R],
        aux_text: &str,
        namespaces: &[N],
    ) -> SenseResult<Vec<RankedSense>>
    where
        R: AsRef<str>,
        N: AsRef<str>,
    {
        if roots.is_empty() {
            return Err(InputError::NoRoots.into());
        }
        if let Some(index) = roots.iter().position(|r| r.as_ref().trim().is_empty()) {
            return Err(InputError::BlankRoot { index }.into());
        }

        let mut candidates = BTreeSet::new();
        for root in roots {
            candidates.extend(self.graph.symbols_with_root(root.as_ref())?);
        }
        let exclude = self.exclude_tokens(roots);

        let extractor = self.extractor();
        let words1 = extractor.words_from_text(aux_text).into_bag(&extractor);

        let eligible: Vec<Symbol> = candidates
            .into_iter()
            .filter(|c| check_namespace(c.namespace(), namespaces))
            .collect();
        tracing::debug!(
            candidates = eligible.len(),
            context_words = words1.len(),
            parallel = self.config.parallel,
            "scoring candidates"
        );

        if self.config.parallel {
            eligible
                .into_par_iter()
                .map(|c| self.score_candidate(c, &words1, &exclude))
                .collect()
        } else {
            eligible
                .into_iter()
                .map(|c| self.score_candidate(c, &words1, &exclude))
                .collect()
        }
    }

    fn score_candidate(
        &self,
        candidate: Symbol,
        words1: &WordBag,
        exclude: &HashSet<String>,
    ) -> SenseResult<RankedSense> {
        let words2 = self.words_around_symbol(&candidate)?;
        let metrics = CandidateMetrics {
            score: self.scorer().words_similarity(words1, &words2, exclude),
            degree: self.graph.degree(&candidate)?,
        };
        tracing::info!(
            candidate = %candidate,
            score = metrics.score,
            degree = metrics.degree,
            "candidate scored"
        );
        Ok(RankedSense {
            symbol: candidate,
            metrics,
        })
    }

    /// Tokens of the roots' printable text, normalized the way the word
    /// model normalizes word texts so they compare against bag entries.
    fn exclude_tokens<R: AsRef<str>>(&self, roots: &[R]) -> HashSet<String> {
        roots
            .iter()
            .flat_map(|r| {
                root_to_text(r.as_ref())
                    .split_whitespace()
                    .map(|t| self.model.make_word(t).text)
                    .collect::<Vec<_>>()
            })
            .collect()
    }
}

impl<G, M> std::fmt::Debug for Disambiguator<G, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Disambiguator")
            .field("config", &self.config)
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SenseError;
    use crate::graph::Edge;
    use crate::graph::mem::MemGraph;
    use crate::words::lexicon::Lexicon;

    const NO_NAMESPACES: [&str; 0] = [];

    fn lexicon() -> Lexicon {
        let lex = Lexicon::new(3);
        lex.insert("cambridge", -12.0, vec![0.5, 0.5, 0.5]).unwrap();
        lex.insert("london", -10.0, vec![1.0, 0.0, 0.0]).unwrap();
        lex.insert("england", -10.5, vec![0.95, 0.1, 0.0]).unwrap();
        lex.insert("thames", -13.0, vec![0.9, 0.05, 0.1]).unwrap();
        lex.insert("boston", -10.0, vec![0.0, 1.0, 0.0]).unwrap();
        lex.insert("massachusetts", -12.5, vec![0.05, 0.95, 0.0]).unwrap();
        lex.insert("stock", -9.0, vec![0.0, 0.0, 1.0]).unwrap();
        lex
    }

    fn graph() -> MemGraph {
        let g = MemGraph::new();
        g.add_edge(Edge::new(["in/1", "cambridge/uk.1", "england/1"])).unwrap();
        g.add_edge(Edge::new(["near/1", "cambridge/uk.1", "london/1"])).unwrap();
        g.add_edge(Edge::new(["on/1", "cambridge/uk.1", "thames/1"])).unwrap();
        g.add_edge(Edge::new(["in/1", "cambridge/us.1", "massachusetts/1"])).unwrap();
        g.add_edge(Edge::new(["near/1", "cambridge/us.1", "boston/1"])).unwrap();
        g
    }

    fn disambiguator(config: DisambiguationConfig) -> Disambiguator<MemGraph, Lexicon> {
        let cache = Arc::new(SimilarityCache::new(10_000));
        Disambiguator::new(graph(), lexicon(), cache, config).unwrap()
    }

    #[test]
    fn namespace_filter() {
        assert!(check_namespace("en/word.1", &["en"]));
        assert!(!check_namespace("fr/mot.1", &["en"]));
        assert!(check_namespace("x/y", &NO_NAMESPACES));
        assert!(check_namespace("fr/mot.1", &["en", "fr"]));
        assert!(!check_namespace("", &["en"]));
    }

    #[test]
    fn picks_sense_matching_context() {
        let d = disambiguator(DisambiguationConfig::default());
        let uk = d
            .best_sense(&["cambridge"], "Cambridge near London in England.", &NO_NAMESPACES)
            .unwrap();
        assert_eq!(uk.symbol, Some(Symbol::new("cambridge/uk.1")));
        assert!(uk.metrics.score > 0.0);

        let us = d
            .best_sense(&["cambridge"], "Cambridge near Boston, Massachusetts.", &NO_NAMESPACES)
            .unwrap();
        assert_eq!(us.symbol, Some(Symbol::new("cambridge/us.1")));
    }

    #[test]
    fn namespace_filter_restricts_candidates() {
        let d = disambiguator(DisambiguationConfig::default());
        let sense = d
            .best_sense(&["cambridge"], "Cambridge near London in England.", &["us"])
            .unwrap();
        assert_eq!(sense.symbol, Some(Symbol::new("cambridge/us.1")));

        let none = d
            .best_sense(&["cambridge"], "Cambridge near London.", &["fr"])
            .unwrap();
        assert!(!none.is_found());
        assert_eq!(none.metrics, CandidateMetrics::default());
    }

    #[test]
    fn unknown_root_yields_no_sense() {
        let d = disambiguator(DisambiguationConfig::default());
        let sense = d.best_sense(&["oxford"], "Oxford in England", &NO_NAMESPACES).unwrap();
        assert_eq!(sense, Sense::default());
    }

    #[test]
    fn empty_roots_fail_fast() {
        let d = disambiguator(DisambiguationConfig::default());
        let roots: [&str; 0] = [];
        let err = d.best_sense(&roots, "text", &NO_NAMESPACES).unwrap_err();
        assert!(matches!(err, SenseError::Input(InputError::NoRoots)));

        let err = d.best_sense(&["cambridge", "  "], "text", &NO_NAMESPACES).unwrap_err();
        assert!(matches!(err, SenseError::Input(InputError::BlankRoot { index: 1 })));
    }

    #[test]
    fn empty_text_falls_back_to_degree() {
        let d = disambiguator(DisambiguationConfig::default());
        d.graph().set_degree(Symbol::new("cambridge/us.1"), 10.0);
        let sense = d.best_sense(&["cambridge"], "", &NO_NAMESPACES).unwrap();
        assert_eq!(sense.symbol, Some(Symbol::new("cambridge/us.1")));
        assert_eq!(sense.metrics, CandidateMetrics::new(0.0, 10.0));
    }

    #[test]
    fn full_tie_keeps_lowest_symbol() {
        let d = disambiguator(DisambiguationConfig::default());
        d.graph().set_degree(Symbol::new("cambridge/uk.1"), 4.0);
        d.graph().set_degree(Symbol::new("cambridge/us.1"), 4.0);
        let sense = d.best_sense(&["cambridge"], "", &NO_NAMESPACES).unwrap();
        assert_eq!(sense.symbol, Some(Symbol::new("cambridge/uk.1")));
    }

    #[test]
    fn root_tokens_do_not_score_against_themselves() {
        let d = disambiguator(DisambiguationConfig::default());
        let g = d.graph();
        g.add_edge(Edge::new(["about/1", "cambridge/x.1", "cambridge/other.1"])).unwrap();
        let words1 = d.extractor().bag_from_tokens(["cambridge"]);
        let words2 = d.words_around_symbol(&Symbol::new("cambridge/x.1")).unwrap();
        let exclude: HashSet<String> = ["cambridge".to_string()].into();
        assert_eq!(d.words_similarity(&words1, &words2, &exclude), 0.0);
        assert!(d.words_similarity(&words1, &words2, &HashSet::new()) > 0.0);
    }

    #[test]
    fn root_exclusion_is_case_normalized() {
        let d = disambiguator(DisambiguationConfig::default());
        let exclude = d.exclude_tokens(&["Cambridge", "new_york"]);
        let expected: HashSet<String> =
            ["cambridge", "new", "york"].iter().map(|s| s.to_string()).collect();
        assert_eq!(exclude, expected);
    }

    #[test]
    fn multiple_roots_union_candidates() {
        let d = disambiguator(DisambiguationConfig::default());
        d.graph().add_edge(Edge::new(["is/1", "stock/fin.1", "london/1"])).unwrap();
        let ranked = d
            .rank_senses(&["cambridge", "stock"], "London and England", &NO_NAMESPACES)
            .unwrap();
        let names: BTreeSet<&str> = ranked.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(
            names,
            ["cambridge/uk.1", "cambridge/us.1", "stock/fin.1"]
                .into_iter()
                .collect::<BTreeSet<_>>()
        );
    }

    #[test]
    fn ranking_agrees_with_best_sense() {
        let d = disambiguator(DisambiguationConfig::default());
        let text = "Cambridge near London in England.";
        let ranked = d.rank_senses(&["cambridge"], text, &NO_NAMESPACES).unwrap();
        let best = d.best_sense(&["cambridge"], text, &NO_NAMESPACES).unwrap();
        assert_eq!(ranked.len(), 2);
        assert_eq!(Some(ranked[0].symbol.clone()), best.symbol);
        assert_eq!(ranked[0].metrics, best.metrics);
        assert!(!ranked[1].metrics.better_than(&ranked[0].metrics));
    }

    #[test]
    fn parallel_scoring_matches_sequential() {
        let seq = disambiguator(DisambiguationConfig::default());
        let par = disambiguator(DisambiguationConfig {
            parallel: true,
            ..Default::default()
        });
        for text in ["Cambridge near London in England.", "Boston, Massachusetts", ""] {
            assert_eq!(
                seq.best_sense(&["cambridge"], text, &NO_NAMESPACES).unwrap(),
                par.best_sense(&["cambridge"], text, &NO_NAMESPACES).unwrap()
            );
        }
    }

    #[test]
    fn long_context_is_scored_on_truncated_tokens() {
        let d = disambiguator(DisambiguationConfig {
            max_words: 4,
            ..Default::default()
        });
        assert!(matches!(
            d.words_from_text("london england thames boston boston boston"),
            TextWords::Truncated(_)
        ));
        let sense = d
            .best_sense(
                &["cambridge"],
                "london england thames boston boston boston",
                &NO_NAMESPACES,
            )
            .unwrap();
        assert_eq!(sense.symbol, Some(Symbol::new("cambridge/uk.1")));
    }

    #[test]
    fn cache_is_shared_across_calls() {
        let d = disambiguator(DisambiguationConfig::default());
        let text = "Cambridge near London in England.";
        let first = d.best_sense(&["cambridge"], text, &NO_NAMESPACES).unwrap();
        let cached = d.cache().len();
        assert!(cached > 0);
        let second = d.best_sense(&["cambridge"], text, &NO_NAMESPACES).unwrap();
        assert_eq!(first, second);
        assert_eq!(d.cache().len(), cached);
        assert!(d.cache().stats().hits > 0);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let cache = Arc::new(SimilarityCache::new(10));
        let config = DisambiguationConfig {
            star_limit: 0,
            ..Default::default()
        };
        assert!(Disambiguator::new(graph(), lexicon(), cache, config).is_err());
    }
}
