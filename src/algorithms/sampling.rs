//! Random-surfer sampling estimator
//!
//! Walks the graph for a fixed number of steps, moving according to the
//! transition model, and ranks each page by how often the walk visited it.
//! Cost is bounded by the step count; the value depends on the random source.

use super::ensure_non_empty;
use super::transition::transition_probabilities;
use crate::config::{check_damping, check_samples};
use crate::error::{RankError, Result};
use crate::ranks::PageRanks;
use crate::storage::{LinkGraph, PageId};
use rand::distributions::{Distribution as _, WeightedIndex};
use rand::Rng;
use tracing::debug;

/// Estimate `PageRank` by sampling with the thread-local generator
///
/// # Errors
///
/// Returns `InvalidInput` if the graph is empty, `sample_count` is zero, or
/// `damping` is outside `[0, 1]`
pub fn sample_rank(graph: &LinkGraph, damping: f64, sample_count: usize) -> Result<PageRanks> {
    sample_rank_with_rng(graph, damping, sample_count, &mut rand::thread_rng())
}

/// Estimate `PageRank` by sampling with an explicit random source
///
/// # Algorithm
///
/// 1. Start on a page chosen uniformly at random
/// 2. `sample_count` times: count a visit to the current page, then draw the
///    next page from its transition distribution
/// 3. Rank = visits / `sample_count`
///
/// # Errors
///
/// Returns `InvalidInput` if the graph is empty, `sample_count` is zero, or
/// `damping` is outside `[0, 1]`
///
/// # Example
///
/// ```
/// use corpus_pagerank::{sample_rank_with_rng, LinkGraph};
/// use rand::rngs::StdRng;
/// use rand::SeedableRng;
///
/// let graph = LinkGraph::from_adjacency([("a", vec!["b"]), ("b", vec!["a"])]).unwrap();
///
/// let first = sample_rank_with_rng(&graph, 0.85, 1_000, &mut StdRng::seed_from_u64(42)).unwrap();
/// let again = sample_rank_with_rng(&graph, 0.85, 1_000, &mut StdRng::seed_from_u64(42)).unwrap();
/// assert_eq!(first, again);
/// assert!((first.sum() - 1.0).abs() < 1e-9);
/// ```
#[allow(clippy::cast_precision_loss)] // Sample counts >2^52 unlikely
#[allow(clippy::cast_possible_truncation)] // Corpora >4B pages not supported
pub fn sample_rank_with_rng<R: Rng>(
    graph: &LinkGraph,
    damping: f64,
    sample_count: usize,
    rng: &mut R,
) -> Result<PageRanks> {
    ensure_non_empty(graph)?;
    check_damping(damping)?;
    check_samples(sample_count)?;

    let n = graph.len();
    let mut visits = vec![0_usize; n];
    let mut probs = Vec::with_capacity(n);
    let mut current = rng.gen_range(0..n);

    for _ in 0..sample_count {
        visits[current] += 1;

        transition_probabilities(graph, PageId(current as u32), damping, &mut probs)?;
        let next = WeightedIndex::new(&probs)
            .map_err(|e| RankError::invalid(format!("bad transition weights: {e}")))?;
        current = next.sample(rng);
    }

    let total = sample_count as f64;
    let values: Vec<f64> = visits.iter().map(|&v| v as f64 / total).collect();

    debug!(pages = n, samples = sample_count, "Sampled PageRank");

    Ok(PageRanks::from_values(graph, &values))
}
