//! End-of-run reporting.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::allocation::Allocation;

/// Unique optimization run identifier.
pub type RunId = Uuid;

/// Immutable record of a completed optimization run.
///
/// Produced once by the coordinator and never mutated afterward. Scores are
/// captured at the three phase boundaries: before any allocation, after the
/// greedy warm start, and after local search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationReport {
    pub id: RunId,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Total counted oracle calls (one per scored hypothetical state).
    pub oracle_calls: u64,

    /// Score of the all-zero allocation.
    pub initial_score: f64,
    /// Score after the greedy warm start.
    pub rough_score: f64,
    /// Score after local-search rebalancing.
    pub final_score: f64,

    /// Accepted local-search improvements (swaps plus zero-injections).
    pub improvements: usize,

    /// The final committed allocation.
    pub allocation: Allocation,
}

impl OptimizationReport {
    /// Overall gain as a percentage of the initial score.
    ///
    /// The coordinator guarantees a positive initial score, so the ratio is
    /// well defined for any report it produces.
    pub fn improvement_pct(&self) -> f64 {
        (self.final_score - self.initial_score) / self.initial_score * 100.0
    }

    /// Absolute score gain attributable to local search.
    pub fn phase2_gain(&self) -> f64 {
        self.final_score - self.rough_score
    }
}
