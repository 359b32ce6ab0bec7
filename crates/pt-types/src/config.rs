//! Tunable constants for an optimization run.

use serde::{Deserialize, Serialize};

use crate::errors::{PtError, PtResult};

/// The five knobs that bound total oracle cost.
///
/// Every knob trades solution quality against oracle calls; the defaults are
/// sized for N ≈ 5–15 variables and a budget of a few dozen points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TunerConfig {
    /// Points distributed per greedy round before utilities are re-measured.
    /// Larger batches amortize the O(N) measurement cost but track shifting
    /// marginal utilities less closely.
    pub batch_size: u32,

    /// Maximum number of variables funded per greedy round, and the number of
    /// lowest-utility donors considered by zero-injection.
    pub top_vars: usize,

    /// Hard cap on swap-optimization rounds.
    pub max_iterations: usize,

    /// How many top-ranked transfer candidates are scored per swap round.
    pub max_candidates: usize,

    /// Minimum score gain over the baseline for a transfer to be accepted.
    pub threshold: f64,
}

impl Default for TunerConfig {
    fn default() -> Self {
        Self {
            batch_size: 10,
            top_vars: 5,
            max_iterations: 25,
            max_candidates: 8,
            threshold: 1e-6,
        }
    }
}

impl TunerConfig {
    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_top_vars(mut self, top_vars: usize) -> Self {
        self.top_vars = top_vars;
        self
    }

    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_max_candidates(mut self, max_candidates: usize) -> Self {
        self.max_candidates = max_candidates;
        self
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Reject configurations that would make a run degenerate.
    pub fn validate(&self) -> PtResult<()> {
        if self.batch_size == 0 {
            return Err(PtError::config("batch_size must be at least 1"));
        }
        if self.top_vars == 0 {
            return Err(PtError::config("top_vars must be at least 1"));
        }
        if self.max_candidates == 0 {
            return Err(PtError::config("max_candidates must be at least 1"));
        }
        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(PtError::config(format!(
                "threshold must be finite and non-negative, got {}",
                self.threshold
            )));
        }
        Ok(())
    }
}
