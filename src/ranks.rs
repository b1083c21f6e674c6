//! Probability distributions and rank mappings over the pages of a graph

use crate::error::{RankError, Result};
use crate::storage::{LinkGraph, PageId};
use std::collections::BTreeMap;

/// Probability of moving to each page of a graph next
///
/// Borrows the graph it was computed for; values are indexed by [`PageId`].
#[derive(Debug, Clone)]
pub struct Distribution<'g> {
    graph: &'g LinkGraph,
    probs: Vec<f64>,
}

impl<'g> Distribution<'g> {
    pub(crate) fn new(graph: &'g LinkGraph, probs: Vec<f64>) -> Self {
        debug_assert_eq!(graph.len(), probs.len());
        Self { graph, probs }
    }

    /// Probability of moving to the page called `page`
    #[must_use]
    pub fn get(&self, page: &str) -> Option<f64> {
        self.graph.page_id(page).map(|id| self.probs[id.index()])
    }

    /// Probability of moving to `page`
    #[must_use]
    pub fn probability(&self, page: PageId) -> Option<f64> {
        self.probs.get(page.index()).copied()
    }

    /// Probabilities in page-id order
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.probs
    }

    /// `(page, probability)` pairs in page order
    pub fn iter(&self) -> impl Iterator<Item = (&'g str, f64)> + '_ {
        self.graph
            .pages()
            .map(move |(id, name)| (name, self.probs[id.index()]))
    }

    /// Number of pages covered
    #[must_use]
    pub fn len(&self) -> usize {
        self.probs.len()
    }

    /// `true` for a distribution over no pages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.probs.is_empty()
    }

    /// Total probability mass
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.probs.iter().sum()
    }
}

/// Rank of every page, ordered by page name
///
/// # Example
///
/// ```
/// use corpus_pagerank::PageRanks;
///
/// let ranks: PageRanks = [("a.html", 0.25), ("b.html", 0.75)].into_iter().collect();
/// assert_eq!(ranks.get("b.html"), Some(0.75));
/// assert!((ranks.sum() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageRanks {
    ranks: BTreeMap<String, f64>,
}

impl PageRanks {
    /// `values` is indexed by [`PageId`]
    pub(crate) fn from_values(graph: &LinkGraph, values: &[f64]) -> Self {
        debug_assert_eq!(graph.len(), values.len());
        let ranks = graph
            .pages()
            .map(|(id, name)| (name.to_string(), values[id.index()]))
            .collect();
        Self { ranks }
    }

    /// Values in page-id order of `graph`
    pub(crate) fn values_for(&self, graph: &LinkGraph) -> Result<Vec<f64>> {
        if self.ranks.len() != graph.len() {
            return Err(RankError::invalid(format!(
                "rank mapping covers {} pages, graph has {}",
                self.ranks.len(),
                graph.len()
            )));
        }
        graph
            .pages()
            .map(|(_, name)| {
                self.get(name)
                    .ok_or_else(|| RankError::invalid(format!("no rank for page {name:?}")))
            })
            .collect()
    }

    /// Rank of `page`
    #[must_use]
    pub fn get(&self, page: &str) -> Option<f64> {
        self.ranks.get(page).copied()
    }

    /// `(page, rank)` pairs sorted by page name
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.ranks.iter().map(|(name, &rank)| (name.as_str(), rank))
    }

    /// Number of ranked pages
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranks.len()
    }

    /// `true` if no page is ranked
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranks.is_empty()
    }

    /// Sum of all ranks
    #[must_use]
    pub fn sum(&self) -> f64 {
        self.ranks.values().sum()
    }

    /// Largest absolute per-page difference; a page missing on one side
    /// counts as rank 0
    #[must_use]
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        let ours = self
            .iter()
            .map(|(name, rank)| (rank - other.get(name).unwrap_or(0.0)).abs());
        let theirs_only = other
            .iter()
            .filter(|(name, _)| !self.ranks.contains_key(*name))
            .map(|(_, rank)| rank.abs());
        ours.chain(theirs_only).fold(0.0, f64::max)
    }

    /// Unwrap into the underlying ordered map
    #[must_use]
    pub fn into_inner(self) -> BTreeMap<String, f64> {
        self.ranks
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for PageRanks {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self {
            ranks: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn graph() -> LinkGraph {
        LinkGraph::from_adjacency([("A", vec!["B"]), ("B", vec!["A"]), ("C", vec!["A"])]).unwrap()
    }

    #[test]
    fn test_distribution_lookup() {
        let graph = graph();
        let dist = Distribution::new(&graph, vec![0.5, 0.3, 0.2]);

        assert_eq!(dist.get("B"), Some(0.3));
        assert_eq!(dist.get("Z"), None);
        assert_eq!(dist.probability(PageId(2)), Some(0.2));
        assert_eq!(dist.probability(PageId(3)), None);
        assert!((dist.sum() - 1.0).abs() < 1e-12);

        let pairs: Vec<(&str, f64)> = dist.iter().collect();
        assert_eq!(pairs, vec![("A", 0.5), ("B", 0.3), ("C", 0.2)]);
    }

    #[test]
    fn test_ranks_roundtrip_values() {
        let graph = graph();
        let ranks = PageRanks::from_values(&graph, &[0.1, 0.2, 0.7]);

        assert_eq!(ranks.get("C"), Some(0.7));
        assert_eq!(ranks.values_for(&graph).unwrap(), vec![0.1, 0.2, 0.7]);
    }

    #[test]
    fn test_values_for_rejects_mismatch() {
        let graph = graph();
        let ranks: PageRanks = [("A", 0.5), ("B", 0.5)].into_iter().collect();
        assert!(ranks.values_for(&graph).is_err());

        let ranks: PageRanks = [("A", 0.5), ("B", 0.25), ("D", 0.25)].into_iter().collect();
        assert!(matches!(
            ranks.values_for(&graph),
            Err(RankError::InvalidInput(ref msg)) if msg.contains("\"C\"")
        ));
    }

    #[test]
    fn test_max_abs_diff() {
        let a: PageRanks = [("A", 0.5), ("B", 0.5)].into_iter().collect();
        let b: PageRanks = [("A", 0.4), ("B", 0.45), ("C", 0.15)].into_iter().collect();

        assert!((a.max_abs_diff(&b) - 0.15).abs() < 1e-12);
        assert!((b.max_abs_diff(&a) - 0.15).abs() < 1e-12);
        assert!(a.max_abs_diff(&a).abs() < f64::EPSILON);
    }
}
