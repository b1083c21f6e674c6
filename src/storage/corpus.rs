//! Corpus crawler: builds a [`LinkGraph`] from a directory of HTML pages
//!
//! Every file with the configured extension becomes a page named after its
//! file name. Anchor `href` targets are kept only when they name another page
//! of the same directory.

use super::{GraphBuilder, LinkGraph};
use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::path::Path;
use std::sync::OnceLock;
use tokio::fs;
use tracing::{debug, info, warn};

/// Anchor pattern: `<a ... href="target"`
const ANCHOR_PATTERN: &str = r#"<a\s+(?:[^>]*?)href="([^"]*)""#;

/// Default page extension
pub const DEFAULT_EXTENSION: &str = ".html";

#[allow(clippy::expect_used)] // constant pattern
fn anchor_regex() -> &'static Regex {
    static ANCHOR: OnceLock<Regex> = OnceLock::new();
    ANCHOR.get_or_init(|| Regex::new(ANCHOR_PATTERN).expect("valid anchor pattern"))
}

/// Crawler settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlOptions {
    /// File name suffix that marks a page (e.g. `.html`)
    pub extension: String,
}

impl Default for CrawlOptions {
    fn default() -> Self {
        Self {
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

/// Extract all anchor `href` targets from a page
///
/// # Example
///
/// ```
/// use corpus_pagerank::storage::extract_links;
///
/// let links = extract_links(r#"<p><a class="x" href="2.html">two</a> <a href="3.html">3</a></p>"#);
/// assert_eq!(links.len(), 2);
/// assert!(links.contains("2.html"));
/// ```
#[must_use]
pub fn extract_links(html: &str) -> BTreeSet<String> {
    anchor_regex()
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Crawl `dir` for `.html` pages
///
/// # Errors
///
/// Returns error if the directory cannot be listed
pub async fn crawl<P: AsRef<Path>>(dir: P) -> Result<LinkGraph> {
    crawl_with(dir, &CrawlOptions::default()).await
}

/// Crawl `dir` with explicit options
///
/// The scan is not recursive. Files that cannot be read are skipped with a
/// warning; non-UTF-8 content is decoded lossily.
///
/// # Errors
///
/// Returns error if the directory cannot be listed
pub async fn crawl_with<P: AsRef<Path>>(dir: P, options: &CrawlOptions) -> Result<LinkGraph> {
    let dir = dir.as_ref();
    let mut entries = fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read corpus directory {}", dir.display()))?;

    let mut builder = GraphBuilder::new();
    let mut raw_links = 0_usize;

    while let Some(entry) = entries
        .next_entry()
        .await
        .with_context(|| format!("Failed to list corpus directory {}", dir.display()))?
    {
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            debug!(file = ?file_name, "Skipping non-UTF-8 file name");
            continue;
        };
        if !name.ends_with(&options.extension) {
            debug!(file = name, "Skipping file without page extension");
            continue;
        }

        let path = entry.path();
        if !fs::metadata(&path).await.map(|m| m.is_file()).unwrap_or(false) {
            debug!(file = name, "Skipping non-file entry");
            continue;
        }

        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) => {
                warn!(file = %path.display(), error = %err, "Skipping unreadable page");
                continue;
            }
        };

        let contents = String::from_utf8_lossy(&bytes);
        builder.add_page(name);
        for link in extract_links(&contents) {
            raw_links += 1;
            builder.add_link(name, link);
        }
    }

    let graph = builder.build();
    info!(
        dir = %dir.display(),
        pages = graph.len(),
        links = graph.num_links(),
        raw_links,
        "Crawled corpus"
    );

    Ok(graph)
}
