//! Run coordination: init → greedy warm start → local search → report.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use pt_oracle::{Oracle, OracleSession};
use pt_types::{Allocation, OptimizationReport, PtError, PtResult, TunerConfig};

use crate::greedy::allocate_greedy;
use crate::rebalance::{optimize_by_swap, try_zero_vars};

/// Sequences the optimization phases and assembles the final report.
pub struct Optimizer {
    config: TunerConfig,
}

impl Optimizer {
    pub fn new(config: TunerConfig) -> PtResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn with_defaults() -> Self {
        Self {
            config: TunerConfig::default(),
        }
    }

    pub fn config(&self) -> &TunerConfig {
        &self.config
    }

    /// Run one full optimization: distribute `total_points` across
    /// `variable_count` variables to maximize the oracle's score.
    ///
    /// The all-zero allocation must score strictly positive — the
    /// percentage-improvement framing and the positive-utility filtering both
    /// assume a positive baseline, so a non-positive initial score aborts the
    /// run before any points are placed.
    pub fn run<O: Oracle + ?Sized>(
        &self,
        oracle: &mut O,
        variable_count: usize,
        total_points: u32,
    ) -> PtResult<OptimizationReport> {
        if variable_count == 0 {
            return Err(PtError::config("variable_count must be at least 1"));
        }
        if total_points == 0 {
            return Err(PtError::config("total_points must be at least 1"));
        }

        let started_at = Utc::now();
        let mut session = OracleSession::new(oracle);

        let allocation = Allocation::zeros(variable_count);
        session.commit(&allocation)?;
        let initial_score = session.current_score()?;
        if initial_score <= 0.0 {
            return Err(PtError::NonPositiveBaseline {
                score: initial_score,
            });
        }
        info!(
            variable_count,
            total_points, initial_score, "starting optimization run"
        );

        // Phase 1: greedy warm start.
        let (mut allocation, utilities) =
            allocate_greedy(&mut session, allocation, total_points, &self.config)?;
        let rough_score = session.current_score()?;
        info!(
            rough_score,
            calls = session.calls(),
            allocation = %allocation,
            "greedy warm start complete"
        );

        // Phase 2: swap optimization, then one zero-injection pass against
        // the already locally-optimized baseline.
        let mut improvements =
            optimize_by_swap(&mut session, &mut allocation, &utilities, &self.config)?;
        if try_zero_vars(&mut session, &mut allocation, &utilities, &self.config)? {
            improvements += 1;
        }

        let final_score = session.current_score()?;
        let oracle_calls = session.calls();
        info!(
            final_score,
            improvements,
            calls = oracle_calls,
            allocation = %allocation,
            "optimization run complete"
        );

        Ok(OptimizationReport {
            id: Uuid::new_v4(),
            started_at,
            finished_at: Utc::now(),
            oracle_calls,
            initial_score,
            rough_score,
            final_score,
            improvements,
            allocation,
        })
    }
}
