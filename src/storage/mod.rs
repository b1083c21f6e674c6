//! Graph storage layer
//!
//! Provides the CSR link graph and the corpus crawler that populates it.

pub mod corpus;
pub mod graph;

pub use corpus::{crawl, crawl_with, extract_links, CrawlOptions, DEFAULT_EXTENSION};
pub use graph::{GraphBuilder, LinkGraph, PageId};
