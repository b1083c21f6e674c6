//! Error types for ranking operations

use thiserror::Error;

/// Result type alias using [`RankError`]
pub type Result<T> = std::result::Result<T, RankError>;

/// Ranking errors
///
/// All of these are deterministic given the same input. Sampling never fails
/// on valid input, whatever the random draw.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RankError {
    /// Empty graph, unknown page, zero sample count, out-of-range damping
    /// factor, bad solver parameters or a malformed adjacency mapping
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Iterative solver hit its iteration cap before the largest per-page
    /// change dropped below the threshold
    #[error("PageRank did not converge after {iterations} iterations (max change {max_change:.3e})")]
    NonConvergence {
        /// Iterations performed
        iterations: usize,
        /// Largest per-page change seen in the last iteration
        max_change: f64,
    },
}

impl RankError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// `true` for [`RankError::NonConvergence`], which a caller may retry
    /// with a looser threshold or a higher cap
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NonConvergence { .. })
    }
}
