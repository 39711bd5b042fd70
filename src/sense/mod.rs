//! Word-sense disambiguation: pair cache, bag similarity, candidate metrics
//! and the [`Disambiguator`] that ties them together.

pub mod cache;
pub mod disambiguator;
pub mod metrics;
pub mod similarity;

pub use cache::{CacheStats, SimilarityCache};
pub use disambiguator::{Disambiguator, RankedSense, Sense, check_namespace};
pub use metrics::CandidateMetrics;
pub use similarity::{SimilarityOutcome, WordBagSimilarity, is_excluded_pair};
