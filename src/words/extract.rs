//! Word bag extraction from free text and from graph neighborhoods.
//!
//! Both sources keep only *informative* words: tokens the model considers
//! rare (`prob < max_prob`) and for which it has a non-zero embedding.

use crate::config::DisambiguationConfig;
use crate::graph::{GraphResult, GraphStore};
use crate::symbol::Symbol;

use super::{Word, WordBag, WordModel};

/// Punctuation replaced by spaces before splitting free text.
pub const TEXT_PUNCTUATION: [char; 6] = [':', ';', ',', '.', '?', '!'];

/// Words extracted from free text.
#[derive(Debug, Clone, PartialEq)]
pub enum TextWords {
    /// The informative words of a short text.
    Filtered(WordBag),
    /// The first `max_words` raw tokens of a long text, unfiltered.
    Truncated(Vec<String>),
}

impl TextWords {
    /// Convert either variant into a filtered bag.
    pub fn into_bag<M: WordModel>(self, extractor: &WordBagExtractor<'_, M>) -> WordBag {
        match self {
            TextWords::Filtered(bag) => bag,
            TextWords::Truncated(tokens) => extractor.bag_from_tokens(tokens.iter()),
        }
    }
}

/// Split text into tokens after blanking out [`TEXT_PUNCTUATION`].
pub fn tokenize(text: &str) -> Vec<String> {
    text.replace(TEXT_PUNCTUATION, " ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Builds word bags using a word model.
#[derive(Debug, Clone, Copy)]
pub struct WordBagExtractor<'a, M> {
    model: &'a M,
    max_prob: f64,
    max_words: Option<usize>,
    star_limit: usize,
}

impl<'a, M: WordModel> WordBagExtractor<'a, M> {
    /// Create an extractor using the thresholds in `config`.
    pub fn new(model: &'a M, config: &DisambiguationConfig) -> Self {
        Self {
            model,
            max_prob: config.max_prob,
            max_words: config.word_limit(),
            star_limit: config.star_limit,
        }
    }

    /// Whether a word is rare enough and has an embedding.
    pub fn is_informative(&self, word: &Word) -> bool {
        word.prob < self.max_prob && word.has_vector()
    }

    /// Model every token and keep the informative words.
    pub fn bag_from_tokens<I, S>(&self, tokens: I) -> WordBag
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        tokens
            .into_iter()
            .map(|t| self.model.make_word(t.as_ref()))
            .filter(|w| self.is_informative(w))
            .collect()
    }

    /// Informative words found in the neighborhood of `symbol`.
    ///
    /// Fetches up to `star_limit` edges and tokenizes the printable text of
    /// every symbol they contain, nested edges included.
    pub fn words_around_symbol<G: GraphStore + ?Sized>(
        &self,
        graph: &G,
        symbol: &Symbol,
    ) -> GraphResult<WordBag> {
        let edges = graph.star(symbol, self.star_limit)?;
        let mut words = WordBag::new();
        for edge in &edges {
            for sub in edge.symbols() {
                let text = sub.to_text();
                words.extend(self.bag_from_tokens(text.split_whitespace()));
            }
        }
        Ok(words)
    }

    /// Words of a free text.
    ///
    /// When the text has at least `max_words` tokens the first `max_words`
    /// raw tokens are returned as [`TextWords::Truncated`] without modeling.
    pub fn words_from_text(&self, text: &str) -> TextWords {
        let mut tokens = tokenize(text);
        if let Some(max) = self.max_words {
            if tokens.len() >= max {
                tracing::debug!(tokens = tokens.len(), max, "text truncated to raw tokens");
                tokens.truncate(max);
                return TextWords::Truncated(tokens);
            }
        }
        TextWords::Filtered(self.bag_from_tokens(tokens))
    }
}
