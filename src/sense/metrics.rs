//! Candidate metrics and their ordering.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Score record of one candidate sense.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateMetrics {
    /// Word bag similarity between the context and the candidate's neighborhood.
    pub score: f64,
    /// Connectivity weight of the candidate in the graph.
    pub degree: f64,
}

impl CandidateMetrics {
    pub fn new(score: f64, degree: f64) -> Self {
        Self { score, degree }
    }

    /// Strictly better: higher score, or equal score and higher degree.
    pub fn better_than(&self, other: &CandidateMetrics) -> bool {
        if self.score != other.score {
            self.score > other.score
        } else {
            self.degree > other.degree
        }
    }

    /// Best-first ordering derived from [`better_than`](Self::better_than).
    ///
    /// Returns `Less` when `self` is better, so sorting ascending puts the
    /// best candidate first. Values neither better nor worse compare `Equal`.
    pub fn rank_cmp(&self, other: &CandidateMetrics) -> Ordering {
        if self.better_than(other) {
            Ordering::Less
        } else if other.better_than(self) {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    }
}

impl fmt::Display for CandidateMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "score: {}; degree: {}", self.score, self.degree)
    }
}
