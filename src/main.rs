//! `pagerank` command-line entry point
//!
//! Crawls a corpus directory and prints the ranks from both estimators.

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use corpus_pagerank::config::{
    DEFAULT_DAMPING, DEFAULT_MAX_ITERATIONS, DEFAULT_SAMPLES, DEFAULT_TOLERANCE,
};
use corpus_pagerank::storage::DEFAULT_EXTENSION;
use corpus_pagerank::{
    crawl_with, iterate_rank_with, sample_rank, sample_rank_with_rng, CrawlOptions, LinkGraph,
    Method, PageRanks, RankConfig, RankReport,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pagerank")]
#[command(author, version, about = "Rank the pages of an HTML corpus with PageRank")]
struct Cli {
    /// Directory containing the corpus pages
    corpus: PathBuf,

    /// Probability of following a link instead of jumping to a random page
    #[arg(short, long, env = "PAGERANK_DAMPING", default_value_t = DEFAULT_DAMPING)]
    damping: f64,

    /// Random-surfer steps for the sampling estimator
    #[arg(short = 'n', long, env = "PAGERANK_SAMPLES", default_value_t = DEFAULT_SAMPLES)]
    samples: usize,

    /// Convergence threshold for the iterative solver
    #[arg(long, env = "PAGERANK_TOLERANCE", default_value_t = DEFAULT_TOLERANCE)]
    tolerance: f64,

    /// Iteration cap for the iterative solver
    #[arg(long, env = "PAGERANK_MAX_ITERATIONS", default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Seed for the sampling estimator (random if omitted)
    #[arg(long, env = "PAGERANK_SEED")]
    seed: Option<u64>,

    /// Estimators to run
    #[arg(long, value_enum, default_value = "both")]
    method: MethodArg,

    /// File name suffix of corpus pages
    #[arg(long, default_value = DEFAULT_EXTENSION)]
    extension: String,

    /// Print the rank total after each report
    #[arg(long)]
    show_total: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum MethodArg {
    /// Random-surfer sampling only
    Sample,
    /// Iterative solver only
    Iterate,
    /// Sampling, then iteration
    Both,
}

impl Cli {
    fn rank_config(&self) -> RankConfig {
        RankConfig {
            damping: self.damping,
            samples: self.samples,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
            seed: self.seed,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = cli.rank_config();
    config.validate().context("Invalid ranking parameters")?;

    let options = CrawlOptions {
        extension: cli.extension.clone(),
    };
    let graph = crawl_with(&cli.corpus, &options).await?;

    if matches!(cli.method, MethodArg::Sample | MethodArg::Both) {
        let ranks = run_sampling(&graph, &config).context("Sampling estimator failed")?;
        let method = Method::Sampling {
            samples: config.samples,
        };
        print!("{}", RankReport::new(method, &ranks).with_total(cli.show_total));
    }

    if matches!(cli.method, MethodArg::Iterate | MethodArg::Both) {
        let ranks = iterate_rank_with(&graph, &config.iteration_params())
            .context("Iterative solver failed")?;
        print!(
            "{}",
            RankReport::new(Method::Iteration, &ranks).with_total(cli.show_total)
        );
    }

    Ok(())
}

fn run_sampling(graph: &LinkGraph, config: &RankConfig) -> corpus_pagerank::Result<PageRanks> {
    match config.seed {
        Some(seed) => {
            info!(seed, "Sampling with fixed seed");
            let mut rng = StdRng::seed_from_u64(seed);
            sample_rank_with_rng(graph, config.damping, config.samples, &mut rng)
        }
        None => sample_rank(graph, config.damping, config.samples),
    }
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    // Logs go to stderr; stdout carries the reports
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();
}
