//! Plain-text rank reports
//!
//! ```text
//! PageRank Results from Sampling (n = 10000)
//!   1.html: 0.2202
//!   2.html: 0.4300
//! ```

use crate::ranks::PageRanks;
use std::fmt;

/// Distance from 1.0 within which a rank total counts as normalized
pub const SUM_TOLERANCE: f64 = 0.0001;

/// Estimator that produced a rank mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Random-surfer sampling with the given step count
    Sampling {
        /// Steps taken
        samples: usize,
    },
    /// Fixed-point iteration
    Iteration,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sampling { samples } => write!(f, "Sampling (n = {samples})"),
            Self::Iteration => f.write_str("Iteration"),
        }
    }
}

/// Printable report: a header naming the method, then one line per page
///
/// # Example
///
/// ```
/// use corpus_pagerank::{Method, PageRanks, RankReport};
///
/// let ranks: PageRanks = [("b.html", 0.6), ("a.html", 0.4)].into_iter().collect();
/// let report = RankReport::new(Method::Iteration, &ranks);
///
/// assert_eq!(
///     report.to_string(),
///     "PageRank Results from Iteration\n  a.html: 0.4000\n  b.html: 0.6000\n"
/// );
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RankReport<'a> {
    method: Method,
    ranks: &'a PageRanks,
    show_total: bool,
}

impl<'a> RankReport<'a> {
    /// Report for `ranks`
    #[must_use]
    pub const fn new(method: Method, ranks: &'a PageRanks) -> Self {
        Self {
            method,
            ranks,
            show_total: false,
        }
    }

    /// Append the rank total and whether it is within [`SUM_TOLERANCE`] of 1
    #[must_use]
    pub const fn with_total(self, show_total: bool) -> Self {
        Self { show_total, ..self }
    }
}

impl fmt::Display for RankReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PageRank Results from {}", self.method)?;
        for (page, rank) in self.ranks.iter() {
            writeln!(f, "  {page}: {rank:.4}")?;
        }

        if self.show_total {
            let total = self.ranks.sum();
            writeln!(f, "Total Rank: {total:.4}")?;
            if (total - 1.0).abs() < SUM_TOLERANCE {
                writeln!(f, "Rank sum is within {SUM_TOLERANCE} of 1.0")?;
            } else {
                writeln!(f, "Rank sum differs from 1.0")?;
            }
        }

        Ok(())
    }
}
