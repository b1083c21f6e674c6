//! `PageRank` estimators
//!
//! - [`transition`]: next-page distribution of the random surfer
//! - [`sample_rank`]: Monte Carlo estimate from a long random walk
//! - [`iterate_rank`]: fixed-point iteration of the `PageRank` recurrence
//!
//! Dangling pages (no outgoing links) spread their damping mass uniformly
//! over every page in both the transition model and the recurrence, so every
//! distribution and every rank mapping sums to 1.

pub mod iteration;
pub mod sampling;
pub mod transition;

pub use iteration::{apply_recurrence, iterate_rank, iterate_rank_from, iterate_rank_with, IterationParams};
pub use sampling::{sample_rank, sample_rank_with_rng};
pub use transition::{transition, transition_probabilities};

use crate::error::{RankError, Result};
use crate::storage::LinkGraph;

pub(crate) fn ensure_non_empty(graph: &LinkGraph) -> Result<()> {
    if graph.is_empty() {
        return Err(RankError::invalid("graph has no pages"));
    }
    Ok(())
}
