//! Ranking configuration

use crate::algorithms::IterationParams;
use crate::error::{RankError, Result};

/// Damping factor (Google standard)
pub const DEFAULT_DAMPING: f64 = 0.85;

/// Random-surfer steps taken by the sampling estimator
pub const DEFAULT_SAMPLES: usize = 10_000;

/// Largest per-page change at which the iterative solver stops
pub const DEFAULT_TOLERANCE: f64 = 0.001;

/// Safety cap on solver iterations
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000;

/// Parameters shared by both estimators
///
/// # Example
///
/// ```
/// use corpus_pagerank::RankConfig;
///
/// let config = RankConfig {
///     seed: Some(7),
///     ..RankConfig::default()
/// };
/// assert!(config.validate().is_ok());
/// assert_eq!(config.samples, 10_000);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankConfig {
    /// Probability of following a link rather than jumping to a random page
    pub damping: f64,
    /// Sampling estimator step count
    pub samples: usize,
    /// Solver convergence threshold
    pub tolerance: f64,
    /// Solver iteration cap
    pub max_iterations: usize,
    /// Seed for the sampling estimator; `None` uses the thread-local generator
    pub seed: Option<u64>,
}

impl Default for RankConfig {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            samples: DEFAULT_SAMPLES,
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            seed: None,
        }
    }
}

impl RankConfig {
    /// Check every parameter
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for a damping factor outside `[0, 1]`, a zero
    /// sample count, a non-positive threshold or a zero iteration cap
    pub fn validate(&self) -> Result<()> {
        check_damping(self.damping)?;
        check_samples(self.samples)?;
        self.iteration_params().validate()
    }

    /// Solver parameters
    #[must_use]
    pub const fn iteration_params(&self) -> IterationParams {
        IterationParams {
            damping: self.damping,
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

pub(crate) fn check_damping(damping: f64) -> Result<()> {
    if (0.0..=1.0).contains(&damping) {
        Ok(())
    } else {
        Err(RankError::invalid(format!(
            "damping factor must be in [0, 1], got {damping}"
        )))
    }
}

pub(crate) fn check_samples(samples: usize) -> Result<()> {
    if samples == 0 {
        return Err(RankError::invalid("sample count must be positive"));
    }
    Ok(())
}
