//! Immutable page link graph in CSR (Compressed Sparse Row) form
//!
//! Pages get dense ids in lexicographic order of their names, so walking ids
//! `0..N` visits pages in the same order a report prints them.
//!
//! ```text
//! Corpus: a.html → {b.html, c.html}, b.html → {c.html}, c.html → {}
//!
//! ids:             a=0, b=1, c=2
//! row_offsets:     [0, 2, 3, 3]
//! col_indices:     [1, 2, 2]
//! rev_row_offsets: [0, 0, 1, 3]
//! rev_col_indices: [0, 0, 1]
//! ```

use crate::error::{RankError, Result};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::debug;

/// Page identifier (dense, zero-indexed)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PageId(pub u32);

impl PageId {
    /// Position of the page in per-page vectors
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Directed link graph over the pages of a corpus
///
/// Invariants, enforced when the graph is built:
/// - every link target is a page of the graph
/// - no page links to itself
/// - a page links to another page at most once
///
/// A page may have no outgoing links (a dangling page).
///
/// # Example
///
/// ```
/// use corpus_pagerank::LinkGraph;
///
/// let graph = LinkGraph::from_adjacency([
///     ("1.html", vec!["2.html", "3.html"]),
///     ("2.html", vec!["3.html"]),
///     ("3.html", vec!["2.html"]),
/// ])
/// .unwrap();
///
/// let one = graph.page_id("1.html").unwrap();
/// assert_eq!(graph.out_degree(one).unwrap(), 2);
/// assert_eq!(graph.num_links(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct LinkGraph {
    /// Forward CSR: page i's outgoing links are `col_indices[row_offsets[i]..row_offsets[i + 1]]`
    row_offsets: Vec<u32>,
    col_indices: Vec<u32>,

    /// Reverse CSR: pages linking to page i
    rev_row_offsets: Vec<u32>,
    rev_col_indices: Vec<u32>,

    /// Page names, indexed by `PageId`
    page_names: Vec<String>,
    page_index: HashMap<String, PageId>,
}

impl LinkGraph {
    /// Build a graph from a page → links mapping, rejecting anything that
    /// breaks the graph invariants
    ///
    /// Repeated pages are merged and repeated links collapse into one.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if a link points to a page that is not a key
    /// of the mapping, or a page links to itself.
    pub fn from_adjacency<I, K, L, T>(adjacency: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, L)>,
        K: Into<String>,
        L: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let mut links: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for (page, targets) in adjacency {
            links
                .entry(page.into())
                .or_default()
                .extend(targets.into_iter().map(Into::into));
        }

        for (page, targets) in &links {
            if targets.contains(page) {
                return Err(RankError::invalid(format!("page {page:?} links to itself")));
            }
            if let Some(missing) = targets.iter().find(|t| !links.contains_key(*t)) {
                return Err(RankError::invalid(format!(
                    "page {page:?} links to {missing:?}, which is not a page of the graph"
                )));
            }
        }

        Ok(Self::from_normalized(&links))
    }

    /// Assumes `links` already satisfies the graph invariants.
    #[allow(clippy::cast_possible_truncation)] // Corpora >4B pages not supported
    fn from_normalized(links: &BTreeMap<String, BTreeSet<String>>) -> Self {
        let num_pages = links.len();

        let page_names: Vec<String> = links.keys().cloned().collect();
        let page_index: HashMap<String, PageId> = page_names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), PageId(i as u32)))
            .collect();

        // Temporary adjacency lists for both directions
        let mut adj_list: Vec<Vec<u32>> = vec![Vec::new(); num_pages];
        let mut rev_adj_list: Vec<Vec<u32>> = vec![Vec::new(); num_pages];

        for (src, targets) in links.values().enumerate() {
            for target in targets {
                let dst = page_index[target].0;
                adj_list[src].push(dst);
                rev_adj_list[dst as usize].push(src as u32);
            }
        }

        let (row_offsets, col_indices) = compress(&adj_list);
        let (rev_row_offsets, rev_col_indices) = compress(&rev_adj_list);

        Self {
            row_offsets,
            col_indices,
            rev_row_offsets,
            rev_col_indices,
            page_names,
            page_index,
        }
    }

    /// Number of pages
    #[must_use]
    pub fn len(&self) -> usize {
        self.page_names.len()
    }

    /// `true` if the graph has no pages
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.page_names.is_empty()
    }

    /// Number of links
    #[must_use]
    pub fn num_links(&self) -> usize {
        self.col_indices.len()
    }

    /// Look up a page by name
    #[must_use]
    pub fn page_id(&self, name: &str) -> Option<PageId> {
        self.page_index.get(name).copied()
    }

    /// Name of a page
    #[must_use]
    pub fn page_name(&self, page: PageId) -> Option<&str> {
        self.page_names.get(page.index()).map(String::as_str)
    }

    /// Iterate over pages in id (= name) order
    #[allow(clippy::cast_possible_truncation)]
    pub fn pages(&self) -> impl Iterator<Item = (PageId, &str)> + '_ {
        self.page_names
            .iter()
            .enumerate()
            .map(|(i, name)| (PageId(i as u32), name.as_str()))
    }

    /// Pages linked to by `page`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the page id is out of bounds
    pub fn outgoing(&self, page: PageId) -> Result<&[u32]> {
        let idx = self.check(page)?;
        let start = self.row_offsets[idx] as usize;
        let end = self.row_offsets[idx + 1] as usize;
        Ok(&self.col_indices[start..end])
    }

    /// Pages linking to `page`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the page id is out of bounds
    pub fn incoming(&self, page: PageId) -> Result<&[u32]> {
        let idx = self.check(page)?;
        let start = self.rev_row_offsets[idx] as usize;
        let end = self.rev_row_offsets[idx + 1] as usize;
        Ok(&self.rev_col_indices[start..end])
    }

    /// Number of outgoing links of `page`
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the page id is out of bounds
    pub fn out_degree(&self, page: PageId) -> Result<usize> {
        self.outgoing(page).map(<[u32]>::len)
    }

    /// `true` if `page` has no outgoing links
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the page id is out of bounds
    pub fn is_dangling(&self, page: PageId) -> Result<bool> {
        self.outgoing(page).map(<[u32]>::is_empty)
    }

    /// Forward CSR components `(row_offsets, col_indices)`
    #[must_use]
    pub fn csr_components(&self) -> (&[u32], &[u32]) {
        (&self.row_offsets, &self.col_indices)
    }

    /// Reverse CSR components `(rev_row_offsets, rev_col_indices)`
    #[must_use]
    pub fn reverse_csr_components(&self) -> (&[u32], &[u32]) {
        (&self.rev_row_offsets, &self.rev_col_indices)
    }

    /// Page → links mapping by name
    #[must_use]
    pub fn to_adjacency(&self) -> BTreeMap<String, BTreeSet<String>> {
        self.pages()
            .map(|(id, name)| {
                let start = self.row_offsets[id.index()] as usize;
                let end = self.row_offsets[id.index() + 1] as usize;
                let targets = self.col_indices[start..end]
                    .iter()
                    .map(|&t| self.page_names[t as usize].clone())
                    .collect();
                (name.to_string(), targets)
            })
            .collect()
    }

    fn check(&self, page: PageId) -> Result<usize> {
        let idx = page.index();
        if idx >= self.len() {
            return Err(RankError::invalid(format!(
                "page id {} out of bounds ({} pages)",
                page.0,
                self.len()
            )));
        }
        Ok(idx)
    }
}

impl Default for LinkGraph {
    fn default() -> Self {
        Self::from_normalized(&BTreeMap::new())
    }
}

#[allow(clippy::cast_possible_truncation)]
fn compress(adj_list: &[Vec<u32>]) -> (Vec<u32>, Vec<u32>) {
    let mut row_offsets = Vec::with_capacity(adj_list.len() + 1);
    let mut col_indices = Vec::with_capacity(adj_list.iter().map(Vec::len).sum());

    let mut offset = 0_u32;
    row_offsets.push(offset);
    for neighbors in adj_list {
        offset += neighbors.len() as u32;
        row_offsets.push(offset);
        col_indices.extend_from_slice(neighbors);
    }

    (row_offsets, col_indices)
}

/// Lenient graph construction
///
/// Collects pages and raw links as they are discovered, then [`build`](Self::build)
/// drops every link that would break the graph invariants: links to pages
/// that were never added and self-links.
///
/// # Example
///
/// ```
/// use corpus_pagerank::GraphBuilder;
///
/// let mut builder = GraphBuilder::new();
/// builder
///     .add_link("index.html", "about.html")
///     .add_link("index.html", "index.html") // self-link, dropped
///     .add_link("index.html", "https://example.com") // not a page, dropped
///     .add_page("about.html");
///
/// let graph = builder.build();
/// assert_eq!(graph.len(), 2);
/// assert_eq!(graph.num_links(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    links: BTreeMap<String, BTreeSet<String>>,
}

impl GraphBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a page (no-op if already present)
    pub fn add_page(&mut self, page: impl Into<String>) -> &mut Self {
        self.links.entry(page.into()).or_default();
        self
    }

    /// Register a link, adding `from` as a page if needed
    ///
    /// `to` only becomes a page through [`add_page`](Self::add_page) or as
    /// the source of another link.
    pub fn add_link(&mut self, from: impl Into<String>, to: impl Into<String>) -> &mut Self {
        self.links.entry(from.into()).or_default().insert(to.into());
        self
    }

    /// Number of pages registered so far
    #[must_use]
    pub fn num_pages(&self) -> usize {
        self.links.len()
    }

    /// Finalize into an immutable [`LinkGraph`]
    #[must_use]
    pub fn build(self) -> LinkGraph {
        let pages: BTreeSet<String> = self.links.keys().cloned().collect();
        let mut dropped = 0_usize;

        let links: BTreeMap<String, BTreeSet<String>> = self
            .links
            .into_iter()
            .map(|(page, targets)| {
                let before = targets.len();
                let kept: BTreeSet<String> = targets
                    .into_iter()
                    .filter(|t| *t != page && pages.contains(t))
                    .collect();
                dropped += before - kept.len();
                (page, kept)
            })
            .collect();

        debug!(
            pages = links.len(),
            dropped_links = dropped,
            "Built link graph"
        );

        LinkGraph::from_normalized(&links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cycle_graph() -> LinkGraph {
        LinkGraph::from_adjacency([("A", vec!["B", "C"]), ("B", vec!["C"]), ("C", vec!["B"])])
            .unwrap()
    }

    #[test]
    fn test_empty_graph() {
        let graph = LinkGraph::default();
        assert!(graph.is_empty());
        assert_eq!(graph.len(), 0);
        assert_eq!(graph.num_links(), 0);
        assert_eq!(graph.csr_components().0, &[0]);
    }

    #[test]
    fn test_csr_structure() {
        let graph = LinkGraph::from_adjacency([
            ("a.html", vec!["b.html", "c.html"]),
            ("b.html", vec!["c.html"]),
            ("c.html", vec![]),
        ])
        .unwrap();

        let (row_offsets, col_indices) = graph.csr_components();
        assert_eq!(row_offsets, &[0, 2, 3, 3]);
        assert_eq!(col_indices, &[1, 2, 2]);

        let (rev_row_offsets, rev_col_indices) = graph.reverse_csr_components();
        assert_eq!(rev_row_offsets, &[0, 0, 1, 3]);
        assert_eq!(rev_col_indices, &[0, 0, 1]);
    }

    #[test]
    fn test_ids_follow_name_order() {
        let graph = LinkGraph::from_adjacency([
            ("zeta", vec!["alpha"]),
            ("alpha", vec![]),
            ("mid", vec!["zeta"]),
        ])
        .unwrap();

        let names: Vec<&str> = graph.pages().map(|(_, name)| name).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
        assert_eq!(graph.page_id("alpha"), Some(PageId(0)));
        assert_eq!(graph.page_name(PageId(2)), Some("zeta"));
        assert_eq!(graph.page_id("missing"), None);
    }

    #[test]
    fn test_outgoing_and_incoming() {
        let graph = cycle_graph();
        let a = graph.page_id("A").unwrap();
        let b = graph.page_id("B").unwrap();
        let c = graph.page_id("C").unwrap();

        assert_eq!(graph.outgoing(a).unwrap(), &[b.0, c.0]);
        assert_eq!(graph.outgoing(b).unwrap(), &[c.0]);

        let empty: &[u32] = &[];
        assert_eq!(graph.incoming(a).unwrap(), empty);
        assert_eq!(graph.incoming(c).unwrap(), &[a.0, b.0]);
    }

    #[test]
    fn test_out_of_bounds_page() {
        let graph = cycle_graph();
        assert!(matches!(
            graph.outgoing(PageId(3)),
            Err(RankError::InvalidInput(_))
        ));
        assert!(graph.incoming(PageId(99)).is_err());
    }

    #[test]
    fn test_dangling_pages() {
        let graph = LinkGraph::from_adjacency([("A", vec!["B"]), ("B", vec![])]).unwrap();
        assert!(!graph.is_dangling(PageId(0)).unwrap());
        assert!(graph.is_dangling(PageId(1)).unwrap());
        assert_eq!(graph.out_degree(PageId(1)).unwrap(), 0);
    }

    #[test]
    fn test_from_adjacency_rejects_unknown_target() {
        let err = LinkGraph::from_adjacency([("A", vec!["B"])]).unwrap_err();
        assert!(matches!(err, RankError::InvalidInput(ref msg) if msg.contains("\"B\"")));
    }

    #[test]
    fn test_from_adjacency_rejects_self_link() {
        let err = LinkGraph::from_adjacency([("A", vec!["A"])]).unwrap_err();
        assert!(matches!(err, RankError::InvalidInput(_)));
    }

    #[test]
    fn test_from_adjacency_merges_duplicates() {
        let graph = LinkGraph::from_adjacency([
            ("A", vec!["B", "B"]),
            ("A", vec!["B"]),
            ("B", vec![]),
        ])
        .unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.num_links(), 1);
    }

    #[test]
    fn test_builder_drops_invalid_links() {
        let mut builder = GraphBuilder::new();
        builder
            .add_link("1.html", "2.html")
            .add_link("1.html", "1.html")
            .add_link("1.html", "missing.html")
            .add_link("2.html", "1.html")
            .add_page("3.html");
        assert_eq!(builder.num_pages(), 3);

        let graph = builder.build();
        assert_eq!(graph.len(), 3);
        assert_eq!(graph.num_links(), 2);

        let adjacency = graph.to_adjacency();
        assert_eq!(
            adjacency["1.html"],
            BTreeSet::from(["2.html".to_string()])
        );
        assert!(adjacency["3.html"].is_empty());
    }

    #[test]
    fn test_to_adjacency_roundtrip() {
        let graph = cycle_graph();
        let rebuilt = LinkGraph::from_adjacency(graph.to_adjacency()).unwrap();
        assert_eq!(rebuilt.csr_components(), graph.csr_components());
        assert_eq!(rebuilt.reverse_csr_components(), graph.reverse_csr_components());
    }
}
