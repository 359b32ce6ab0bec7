//! The oracle capability trait and a deterministic in-memory implementation.

use pt_types::PtResult;

/// The scoring oracle as the optimizer sees it.
///
/// Implemented by the host environment (whatever owns the real variables and
/// the score computation). Exactly two operations, both synchronous:
///
/// - [`set_allocation`](Oracle::set_allocation) writes the full vector and
///   forces a recompute before returning — no partial-write states are ever
///   observable.
/// - [`read_score`](Oracle::read_score) returns the scalar for whatever
///   allocation was last set.
///
/// The oracle is an external mutable resource: probing writes made during a
/// run are visible to anything else reading it, so hosts must not read the
/// live state mid-run.
pub trait Oracle {
    fn set_allocation(&mut self, points: &[u32]) -> PtResult<()>;

    fn read_score(&mut self) -> PtResult<f64>;
}

/// Deterministic in-memory oracle backed by a scoring function.
///
/// Recomputes eagerly on every write, matching the synchronous recompute
/// contract of the trait. Used by tests and the demo binary; a real host
/// adapter replaces this in production.
pub struct FnOracle<F>
where
    F: Fn(&[u32]) -> f64,
{
    score_fn: F,
    current: Vec<u32>,
    score: f64,
}

impl<F> FnOracle<F>
where
    F: Fn(&[u32]) -> f64,
{
    /// The score is only computed on writes, so the closure is free to index
    /// into the vector; a read before the first write returns zero.
    pub fn new(score_fn: F) -> Self {
        Self {
            score_fn,
            current: Vec::new(),
            score: 0.0,
        }
    }

    /// The allocation the oracle currently holds, for test inspection.
    pub fn current(&self) -> &[u32] {
        &self.current
    }
}

impl<F> Oracle for FnOracle<F>
where
    F: Fn(&[u32]) -> f64,
{
    fn set_allocation(&mut self, points: &[u32]) -> PtResult<()> {
        self.current = points.to_vec();
        self.score = (self.score_fn)(&self.current);
        Ok(())
    }

    fn read_score(&mut self) -> PtResult<f64> {
        Ok(self.score)
    }
}
