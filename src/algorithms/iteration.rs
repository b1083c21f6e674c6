//! Iterative `PageRank` solver
//!
//! Based on Page et al. (1999) "The `PageRank` Citation Ranking: Bringing Order to the Web".
//! Applies the `PageRank` recurrence until no rank moves by more than the
//! threshold, with an iteration cap turning non-convergence into an error.

use super::ensure_non_empty;
use crate::config::{check_damping, DEFAULT_DAMPING, DEFAULT_MAX_ITERATIONS, DEFAULT_TOLERANCE};
use crate::error::{RankError, Result};
use crate::ranks::PageRanks;
use crate::storage::LinkGraph;
use tracing::debug;

/// Solver parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IterationParams {
    /// Damping factor, in `[0, 1]`
    pub damping: f64,
    /// Stop once the largest per-page change is below this value
    pub tolerance: f64,
    /// Give up with [`RankError::NonConvergence`] after this many iterations
    pub max_iterations: usize,
}

impl Default for IterationParams {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl IterationParams {
    /// Check the parameters
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a damping factor outside `[0, 1]`, a
    /// threshold that is not positive and finite, or a zero iteration cap
    pub fn validate(&self) -> Result<()> {
        check_damping(self.damping)?;
        if !(self.tolerance.is_finite() && self.tolerance > 0.0) {
            return Err(RankError::invalid(format!(
                "convergence threshold must be positive and finite, got {}",
                self.tolerance
            )));
        }
        if self.max_iterations == 0 {
            return Err(RankError::invalid("iteration cap must be positive"));
        }
        Ok(())
    }
}

/// Compute `PageRank` with the default threshold (0.001) and iteration cap (1000)
///
/// # Errors
///
/// Returns `InvalidInput` if the graph is empty or `damping` is outside
/// `[0, 1]`, and `NonConvergence` if the cap is reached
///
/// # Example
///
/// ```
/// use corpus_pagerank::{iterate_rank, LinkGraph};
///
/// let graph = LinkGraph::from_adjacency([
///     ("1.html", vec!["2.html", "3.html"]),
///     ("2.html", vec!["3.html"]),
///     ("3.html", vec!["2.html"]),
/// ])
/// .unwrap();
///
/// let ranks = iterate_rank(&graph, 0.85).unwrap();
/// assert!((ranks.get("1.html").unwrap() - 0.05).abs() < 1e-9);
/// assert!((ranks.sum() - 1.0).abs() < 1e-9);
/// ```
pub fn iterate_rank(graph: &LinkGraph, damping: f64) -> Result<PageRanks> {
    iterate_rank_with(
        graph,
        &IterationParams {
            damping,
            ..IterationParams::default()
        },
    )
}

/// Compute `PageRank` starting from the uniform distribution `1/N`
///
/// # Algorithm
///
/// ```text
/// PR(p) = (1-d)/N + d * (Σ PR(q)/outdegree(q) + Σ PR(s)/N)
/// ```
///
/// Where `q` ranges over pages linking to `p` and `s` over dangling pages.
///
/// # Errors
///
/// Returns `InvalidInput` if the graph is empty or the parameters are
/// invalid, and `NonConvergence` if the cap is reached
#[allow(clippy::cast_precision_loss)] // Corpora >2^52 pages unlikely
pub fn iterate_rank_with(graph: &LinkGraph, params: &IterationParams) -> Result<PageRanks> {
    ensure_non_empty(graph)?;
    params.validate()?;

    let n = graph.len();
    solve(graph, params, vec![1.0 / n as f64; n])
}

/// Compute `PageRank` starting from existing ranks
///
/// Restarting from a converged result returns ranks within the threshold of
/// the starting point.
///
/// # Errors
///
/// Returns `InvalidInput` if the graph is empty, the parameters are invalid,
/// or `initial` does not rank exactly the pages of `graph`; `NonConvergence`
/// if the cap is reached
pub fn iterate_rank_from(
    graph: &LinkGraph,
    params: &IterationParams,
    initial: &PageRanks,
) -> Result<PageRanks> {
    ensure_non_empty(graph)?;
    params.validate()?;

    solve(graph, params, initial.values_for(graph)?)
}

/// Apply the recurrence once to `ranks`
///
/// At a fixed point the result is within the convergence threshold of the
/// input.
///
/// # Errors
///
/// Returns `InvalidInput` if the graph is empty, `damping` is outside
/// `[0, 1]`, or `ranks` does not rank exactly the pages of `graph`
pub fn apply_recurrence(graph: &LinkGraph, damping: f64, ranks: &PageRanks) -> Result<PageRanks> {
    ensure_non_empty(graph)?;
    check_damping(damping)?;

    let old = ranks.values_for(graph)?;
    let mut new = vec![0.0; old.len()];
    step(graph, damping, &old, &mut new);
    Ok(PageRanks::from_values(graph, &new))
}

fn solve(graph: &LinkGraph, params: &IterationParams, mut ranks: Vec<f64>) -> Result<PageRanks> {
    let mut new_ranks = vec![0.0; ranks.len()];
    let mut max_change = f64::INFINITY;

    for iteration in 0..params.max_iterations {
        max_change = step(graph, params.damping, &ranks, &mut new_ranks);

        // Swap buffers
        std::mem::swap(&mut ranks, &mut new_ranks);

        if max_change < params.tolerance {
            debug!(
                iterations = iteration + 1,
                max_change, "PageRank converged"
            );
            return Ok(PageRanks::from_values(graph, &ranks));
        }
    }

    Err(RankError::NonConvergence {
        iterations: params.max_iterations,
        max_change,
    })
}

/// One application of the recurrence; returns the largest per-page change
#[allow(clippy::cast_precision_loss)]
fn step(graph: &LinkGraph, damping: f64, ranks: &[f64], new_ranks: &mut [f64]) -> f64 {
    let n = ranks.len();
    let (row_offsets, _) = graph.csr_components();
    let (rev_row_offsets, rev_col_indices) = graph.reverse_csr_components();

    let out_degree = |page: usize| row_offsets[page + 1] - row_offsets[page];

    // Dangling pages spread their rank over every page
    let dangling: f64 = (0..n)
        .filter(|&page| out_degree(page) == 0)
        .map(|page| ranks[page])
        .sum();
    let base = (1.0 - damping) / n as f64 + damping * dangling / n as f64;

    let mut max_change = 0.0_f64;
    for page in 0..n {
        let start = rev_row_offsets[page] as usize;
        let end = rev_row_offsets[page + 1] as usize;

        let inbound: f64 = rev_col_indices[start..end]
            .iter()
            .map(|&src| {
                let src = src as usize;
                ranks[src] / f64::from(out_degree(src))
            })
            .sum();

        let rank = base + damping * inbound;
        max_change = max_change.max((rank - ranks[page]).abs());
        new_ranks[page] = rank;
    }

    max_change
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle_graph() -> LinkGraph {
        LinkGraph::from_adjacency([("A", vec!["B", "C"]), ("B", vec!["C"]), ("C", vec!["B"])])
            .unwrap()
    }

    #[test]
    fn test_iterate_rank_cycle() {
        let graph = cycle_graph();
        let ranks = iterate_rank(&graph, 0.85).unwrap();

        assert!((ranks.get("A").unwrap() - 0.05).abs() < 1e-9);
        assert!((ranks.get("B").unwrap() - 0.475).abs() < 1e-9);
        assert!((ranks.get("C").unwrap() - 0.475).abs() < 1e-9);
        assert!((ranks.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_iterate_rank_is_fixed_point() {
        let graph = cycle_graph();
        let ranks = iterate_rank(&graph, 0.85).unwrap();
        let again = apply_recurrence(&graph, 0.85, &ranks).unwrap();

        assert!(ranks.max_abs_diff(&again) < DEFAULT_TOLERANCE);
    }

    #[test]
    fn test_iterate_rank_chain() {
        // 0 → 1 → 2, page 2 dangling: later pages rank higher
        let graph =
            LinkGraph::from_adjacency([("p0", vec!["p1"]), ("p1", vec!["p2"]), ("p2", vec![])])
                .unwrap();
        let ranks = iterate_rank(&graph, 0.85).unwrap();

        assert!(ranks.get("p2").unwrap() > ranks.get("p1").unwrap());
        assert!(ranks.get("p1").unwrap() > ranks.get("p0").unwrap());
        assert!((ranks.sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_iterate_rank_star() {
        // Every leaf points at the hub
        let graph = LinkGraph::from_adjacency([
            ("hub", vec![]),
            ("l1", vec!["hub"]),
            ("l2", vec!["hub"]),
            ("l3", vec!["hub"]),
        ])
        .unwrap();
        let ranks = iterate_rank(&graph, 0.85).unwrap();

        let hub = ranks.get("hub").unwrap();
        for leaf in ["l1", "l2", "l3"] {
            assert!(hub > ranks.get(leaf).unwrap());
        }
        assert!((ranks.get("l1").unwrap() - ranks.get("l3").unwrap()).abs() < 1e-12);
    }

    #[test]
    fn test_iterate_rank_single_page() {
        let graph = LinkGraph::from_adjacency([("A", Vec::<&str>::new())]).unwrap();
        let ranks = iterate_rank(&graph, 0.85).unwrap();
        assert!((ranks.get("A").unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_iterate_rank_deterministic() {
        let graph = cycle_graph();
        let first = iterate_rank(&graph, 0.85).unwrap();
        let second = iterate_rank(&graph, 0.85).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_non_convergence_at_cap() {
        let graph = LinkGraph::from_adjacency([("A", vec!["B"]), ("B", vec![])]).unwrap();
        let params = IterationParams {
            max_iterations: 1,
            ..IterationParams::default()
        };

        let err = iterate_rank_with(&graph, &params).unwrap_err();
        match err {
            RankError::NonConvergence {
                iterations,
                max_change,
            } => {
                assert_eq!(iterations, 1);
                assert!((max_change - 0.2125).abs() < 1e-9);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_periodic_walk_never_converges() {
        // Without random jumps all rank bounces between the two pages
        let graph = LinkGraph::from_adjacency([("A", vec!["B"]), ("B", vec!["A"])]).unwrap();
        let params = IterationParams {
            damping: 1.0,
            ..IterationParams::default()
        };
        let start: PageRanks = [("A", 1.0), ("B", 0.0)].into_iter().collect();

        let err = iterate_rank_from(&graph, &params, &start).unwrap_err();
        assert!(matches!(
            err,
            RankError::NonConvergence {
                iterations: 1000,
                ..
            }
        ));
    }

    #[test]
    fn test_iterate_rank_from_own_output() {
        let graph = cycle_graph();
        let params = IterationParams::default();
        let ranks = iterate_rank_with(&graph, &params).unwrap();
        let again = iterate_rank_from(&graph, &params, &ranks).unwrap();

        assert!(ranks.max_abs_diff(&again) <= params.tolerance);
    }

    #[test]
    fn test_invalid_inputs() {
        let graph = cycle_graph();
        assert!(matches!(
            iterate_rank(&LinkGraph::default(), 0.85),
            Err(RankError::InvalidInput(_))
        ));
        assert!(matches!(
            iterate_rank(&graph, 1.2),
            Err(RankError::InvalidInput(_))
        ));

        let bad_tolerance = IterationParams {
            tolerance: -1.0,
            ..IterationParams::default()
        };
        assert!(iterate_rank_with(&graph, &bad_tolerance).is_err());

        let partial: PageRanks = [("A", 1.0)].into_iter().collect();
        assert!(iterate_rank_from(&graph, &IterationParams::default(), &partial).is_err());
        assert!(apply_recurrence(&graph, 0.85, &partial).is_err());
    }
}
