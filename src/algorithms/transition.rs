//! Random-surfer transition model
//!
//! With probability `damping` the surfer follows one of the current page's
//! links, chosen uniformly; otherwise it jumps to any page of the graph,
//! chosen uniformly. A dangling page has no link to follow, so its damping
//! mass is spread over every page as well.

use super::ensure_non_empty;
use crate::config::check_damping;
use crate::error::{RankError, Result};
use crate::ranks::Distribution;
use crate::storage::{LinkGraph, PageId};

/// Probability distribution over the page visited after `page`
///
/// # Formula
///
/// ```text
/// P(p) = (1-d)/N + d/|L|   if p ∈ L
/// P(p) = (1-d)/N           otherwise
/// P(p) = 1/N               for every p, if L is empty
/// ```
///
/// Where `N` is the number of pages and `L` the links of `page`.
///
/// # Errors
///
/// Returns `InvalidInput` if the graph is empty, `page` is not a page of the
/// graph, or `damping` is outside `[0, 1]`
///
/// # Example
///
/// ```
/// use corpus_pagerank::{transition, LinkGraph};
///
/// let graph = LinkGraph::from_adjacency([
///     ("1.html", vec!["2.html", "3.html"]),
///     ("2.html", vec!["3.html"]),
///     ("3.html", vec!["2.html"]),
/// ])
/// .unwrap();
///
/// let dist = transition(&graph, "1.html", 0.85).unwrap();
/// assert!((dist.get("1.html").unwrap() - 0.05).abs() < 1e-12);
/// assert!((dist.get("2.html").unwrap() - 0.475).abs() < 1e-12);
/// assert!((dist.sum() - 1.0).abs() < 1e-12);
/// ```
pub fn transition<'g>(graph: &'g LinkGraph, page: &str, damping: f64) -> Result<Distribution<'g>> {
    ensure_non_empty(graph)?;
    let id = graph
        .page_id(page)
        .ok_or_else(|| RankError::invalid(format!("page {page:?} is not in the graph")))?;

    let mut probs = Vec::with_capacity(graph.len());
    transition_probabilities(graph, id, damping, &mut probs)?;
    Ok(Distribution::new(graph, probs))
}

/// Fill `out` with the transition distribution from `page`, indexed by
/// [`PageId`]
///
/// Reuses the buffer, for callers that query many pages in a row.
///
/// # Errors
///
/// Returns `InvalidInput` if `page` is out of bounds or `damping` is outside
/// `[0, 1]`
#[allow(clippy::cast_precision_loss)] // Corpora >2^52 pages unlikely
pub fn transition_probabilities(
    graph: &LinkGraph,
    page: PageId,
    damping: f64,
    out: &mut Vec<f64>,
) -> Result<()> {
    check_damping(damping)?;
    let links = graph.outgoing(page)?;
    let n = graph.len();

    out.clear();
    if links.is_empty() {
        out.resize(n, 1.0 / n as f64);
        return Ok(());
    }

    out.resize(n, (1.0 - damping) / n as f64);
    let link_share = damping / links.len() as f64;
    for &target in links {
        out[target as usize] += link_share;
    }

    Ok(())
}
