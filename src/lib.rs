//! corpus-pagerank: `PageRank` for small hyperlinked corpora
//!
//! # Overview
//!
//! Ranks the pages of a directory of HTML documents with two independent
//! estimators: a random surfer that walks the link graph and counts visits,
//! and a fixed-point iteration of the `PageRank` recurrence.
//!
//! # Quick Start
//!
//! ```no_run
//! use corpus_pagerank::{crawl, iterate_rank, sample_rank, Method, RankReport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! // Build the link graph from a corpus directory
//! let graph = crawl("corpus/").await?;
//!
//! // Estimate by sampling, then solve by iteration
//! let sampled = sample_rank(&graph, 0.85, 10_000)?;
//! let iterated = iterate_rank(&graph, 0.85)?;
//!
//! print!("{}", RankReport::new(Method::Sampling { samples: 10_000 }, &sampled));
//! print!("{}", RankReport::new(Method::Iteration, &iterated));
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - **Storage**: immutable CSR link graph, populated by an async corpus crawler
//! - **Algorithms**: transition model, sampling estimator, iterative solver
//! - **Dangling pages**: their damping mass is spread over all pages, so every
//!   distribution and rank mapping sums to 1

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod algorithms;
pub mod config;
pub mod error;
pub mod ranks;
pub mod report;
pub mod storage;

// Re-export core types
pub use algorithms::{
    apply_recurrence, iterate_rank, iterate_rank_from, iterate_rank_with, sample_rank,
    sample_rank_with_rng, transition, transition_probabilities, IterationParams,
};
pub use config::RankConfig;
pub use error::{RankError, Result};
pub use ranks::{Distribution, PageRanks};
pub use report::{Method, RankReport};
pub use storage::{crawl, crawl_with, CrawlOptions, GraphBuilder, LinkGraph, PageId};
