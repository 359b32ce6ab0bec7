//! Per-run oracle session with call accounting.

use tracing::trace;

use pt_types::{Allocation, PtResult};

use crate::oracle::Oracle;

/// Exclusive borrow of the oracle for the duration of one optimization run.
///
/// The session is the run state of the algorithm: it owns the oracle-call
/// counter and is handed from phase to phase by `&mut` borrow — exactly one
/// writer at a time. A *counted* call is one write-recompute-read round trip
/// for a hypothetical state ([`probe`](Self::probe)); committing an accepted
/// state or re-reading the already-committed state is the restoring traffic
/// the cost model folds into the next probe and is not counted.
pub struct OracleSession<'a, O: Oracle + ?Sized> {
    oracle: &'a mut O,
    calls: u64,
}

impl<'a, O: Oracle + ?Sized> OracleSession<'a, O> {
    pub fn new(oracle: &'a mut O) -> Self {
        Self { oracle, calls: 0 }
    }

    /// Counted oracle calls made so far in this run.
    pub fn calls(&self) -> u64 {
        self.calls
    }

    /// Score a hypothetical allocation. Counts as one oracle call.
    ///
    /// Leaves the oracle holding `allocation`; the caller must either accept
    /// it or restore the prior state via [`commit`](Self::commit) before the
    /// next decision.
    pub fn probe(&mut self, allocation: &Allocation) -> PtResult<f64> {
        self.oracle.set_allocation(allocation.as_slice())?;
        let score = self.oracle.read_score()?;
        self.calls += 1;
        trace!(calls = self.calls, score, "probed {allocation}");
        Ok(score)
    }

    /// Write an accepted (or restored) allocation without counting a call.
    pub fn commit(&mut self, allocation: &Allocation) -> PtResult<()> {
        self.oracle.set_allocation(allocation.as_slice())
    }

    /// Read the score of whatever allocation was last written. Not counted.
    pub fn current_score(&mut self) -> PtResult<f64> {
        self.oracle.read_score()
    }
}
