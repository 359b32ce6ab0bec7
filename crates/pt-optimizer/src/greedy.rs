//! Phase 1: greedy batched warm start.

use tracing::{debug, warn};

use pt_oracle::{Oracle, OracleSession};
use pt_types::{Allocation, PtResult, TunerConfig, UtilitySnapshot};

use crate::estimator::measure_utilities;

/// Distribute points until the allocation total reaches `total_points`.
///
/// Each round measures fresh marginal utilities, funds up to
/// `config.top_vars` positive-utility variables proportionally to their
/// utility share, and commits the result so the next measurement sees it.
/// Re-measuring after every batch lets utilities self-correct as the
/// allocation shifts; the strategy is deliberately myopic, and the local
/// search phase exists to clean up what it misses.
///
/// Returns the final allocation together with the last utility snapshot,
/// which Phase 2 reuses as its ranking heuristic.
pub fn allocate_greedy<O: Oracle + ?Sized>(
    session: &mut OracleSession<'_, O>,
    mut allocation: Allocation,
    total_points: u32,
    config: &TunerConfig,
) -> PtResult<(Allocation, UtilitySnapshot)> {
    let mut last_utilities: Option<UtilitySnapshot> = None;
    let mut round = 0usize;

    while allocation.total() < total_points {
        let remaining = total_points - allocation.total();
        let batch = config.batch_size.min(remaining);

        let utilities = measure_utilities(session, &allocation)?;
        let selected: Vec<(usize, f64)> = utilities
            .ranked_positive()
            .into_iter()
            .take(config.top_vars)
            .collect();

        if selected.is_empty() {
            // Degenerate fallback: nothing looks useful, park the batch on the
            // first variable rather than failing the run.
            warn!(
                round,
                batch, "no variable shows positive utility; assigning batch to variable 0"
            );
            allocation.add(0, batch);
        } else {
            distribute_batch(&mut allocation, &selected, batch);
            debug!(
                round,
                batch,
                selected = selected.len(),
                "distributed batch proportionally to utility share"
            );
        }

        session.commit(&allocation)?;
        last_utilities = Some(utilities);
        round += 1;
    }

    // The loop never ran (budget already met); measure once so the returned
    // snapshot is valid for Phase 2.
    let utilities = match last_utilities {
        Some(u) => u,
        None => measure_utilities(session, &allocation)?,
    };

    Ok((allocation, utilities))
}

/// Split `batch` points across `selected` proportionally to utility share.
///
/// Per-variable shares are rounded, capped so the running total never exceeds
/// `batch`; any remainder left by rounding goes entirely to the
/// highest-utility selected variable.
fn distribute_batch(allocation: &mut Allocation, selected: &[(usize, f64)], batch: u32) {
    let utility_sum: f64 = selected.iter().map(|(_, u)| u).sum();
    let mut assigned = 0u32;

    for (index, utility) in selected {
        if assigned == batch {
            break;
        }
        let share = (batch as f64 * utility / utility_sum).round() as u32;
        let granted = share.min(batch - assigned);
        allocation.add(*index, granted);
        assigned += granted;
    }

    if assigned < batch {
        let (best_index, _) = selected[0];
        allocation.add(best_index, batch - assigned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_oracle::FnOracle;

    fn config() -> TunerConfig {
        TunerConfig::default()
    }

    #[test]
    fn sum_reaches_total_points_exactly() {
        let mut oracle =
            FnOracle::new(|p: &[u32]| 1.0 + p.iter().enumerate().map(|(i, &v)| (i + 1) as f64 * v as f64).sum::<f64>());
        let mut session = OracleSession::new(&mut oracle);
        let zeros = Allocation::zeros(4);
        session.commit(&zeros).unwrap();

        let (alloc, _) = allocate_greedy(&mut session, zeros, 23, &config()).unwrap();
        assert_eq!(alloc.total(), 23);
    }

    #[test]
    fn budget_smaller_than_batch_uses_single_batch() {
        let mut oracle = FnOracle::new(|p: &[u32]| 1.0 + p.iter().sum::<u32>() as f64);
        let mut session = OracleSession::new(&mut oracle);
        let zeros = Allocation::zeros(3);
        session.commit(&zeros).unwrap();

        let cfg = config().with_batch_size(10);
        let (alloc, _) = allocate_greedy(&mut session, zeros, 4, &cfg).unwrap();
        assert_eq!(alloc.total(), 4);
        // One measurement round (3 probes), nothing more.
        assert_eq!(session.calls(), 3);
    }

    #[test]
    fn constant_oracle_falls_back_to_first_variable() {
        let mut oracle = FnOracle::new(|_: &[u32]| 1.0);
        let mut session = OracleSession::new(&mut oracle);
        let zeros = Allocation::zeros(3);
        session.commit(&zeros).unwrap();

        let cfg = config().with_batch_size(5);
        let (alloc, _) = allocate_greedy(&mut session, zeros, 5, &cfg).unwrap();
        assert_eq!(alloc.as_slice(), &[5, 0, 0]);
    }

    #[test]
    fn distribution_is_proportional_to_utility() {
        // Utilities 3:1 over two variables; a batch of 8 should split 6/2.
        let mut oracle = FnOracle::new(|p: &[u32]| 1.0 + 3.0 * p[0] as f64 + p[1] as f64);
        let mut session = OracleSession::new(&mut oracle);
        let zeros = Allocation::zeros(2);
        session.commit(&zeros).unwrap();

        let cfg = config().with_batch_size(8);
        let (alloc, _) = allocate_greedy(&mut session, zeros, 8, &cfg).unwrap();
        assert_eq!(alloc.as_slice(), &[6, 2]);
    }

    #[test]
    fn rounding_remainder_goes_to_highest_utility() {
        // Equal utilities: round(3 * 0.5) = 2 each, capped at 3 total. The
        // first (highest-ranked) variable absorbs the cap.
        let mut alloc = Allocation::zeros(2);
        distribute_batch(&mut alloc, &[(0, 1.0), (1, 1.0)], 3);
        assert_eq!(alloc.total(), 3);
        assert_eq!(alloc.get(0), 2);
        assert_eq!(alloc.get(1), 1);
    }

    #[test]
    fn remainder_fallback_tops_up_best_variable() {
        // Three equal shares of a single point all round to zero; the whole
        // batch falls through to the highest-utility variable.
        let mut alloc = Allocation::zeros(3);
        distribute_batch(&mut alloc, &[(2, 1.0), (0, 1.0), (1, 1.0)], 1);
        assert_eq!(alloc.total(), 1);
        assert_eq!(alloc.get(2), 1);
    }

    #[test]
    fn top_vars_limits_funded_variables() {
        let mut oracle = FnOracle::new(|p: &[u32]| {
            1.0 + p
                .iter()
                .enumerate()
                .map(|(i, &v)| (10 - i) as f64 * v as f64)
                .sum::<f64>()
        });
        let mut session = OracleSession::new(&mut oracle);
        let zeros = Allocation::zeros(6);
        session.commit(&zeros).unwrap();

        let cfg = config().with_batch_size(12).with_top_vars(2);
        let (alloc, _) = allocate_greedy(&mut session, zeros, 12, &cfg).unwrap();
        assert_eq!(alloc.total(), 12);
        assert!(alloc.active().len() <= 2);
    }

    #[test]
    fn utilities_rebalance_across_batches() {
        // v1 only becomes valuable once v0 holds at least 3 points. With small
        // batches the second measurement should notice and start funding v1.
        let mut oracle = FnOracle::new(|p: &[u32]| {
            1.0 + 2.0 * p[0] as f64 + if p[0] >= 3 { 5.0 * p[1] as f64 } else { 0.0 }
        });
        let mut session = OracleSession::new(&mut oracle);
        let zeros = Allocation::zeros(2);
        session.commit(&zeros).unwrap();

        let cfg = config().with_batch_size(4);
        let (alloc, _) = allocate_greedy(&mut session, zeros, 8, &cfg).unwrap();
        assert_eq!(alloc.total(), 8);
        assert!(alloc.get(1) > 0, "coupled variable never funded: {alloc}");
    }
}
