//! Marginal-utility measurement.

use tracing::debug;

use pt_oracle::{Oracle, OracleSession};
use pt_types::{Allocation, PtResult, UtilitySnapshot};

/// Measure the marginal score gain from adding one point to each variable.
///
/// The baseline is read once before the loop, not re-read per probe, so every
/// utility is measured against the same reference score. Under a strongly
/// non-additive oracle this can bias later-measured variables; the bias is an
/// accepted approximation in exchange for one fewer read per variable.
///
/// Costs exactly N counted oracle calls and restores the allocation
/// bit-for-bit before returning. Negative marginal values clamp to zero —
/// "not useful" rather than a candidate for removal.
pub fn measure_utilities<O: Oracle + ?Sized>(
    session: &mut OracleSession<'_, O>,
    allocation: &Allocation,
) -> PtResult<UtilitySnapshot> {
    let baseline = session.current_score()?;
    let mut gains = Vec::with_capacity(allocation.len());

    for index in 0..allocation.len() {
        let score = session.probe(&allocation.with_probe(index))?;
        gains.push((score - baseline).max(0.0));
    }

    // Put the committed state back before the next decision is made.
    session.commit(allocation)?;

    debug!(baseline, ?gains, "measured marginal utilities");
    Ok(UtilitySnapshot::new(gains))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pt_oracle::FnOracle;

    #[test]
    fn utilities_match_linear_oracle_weights() {
        let mut oracle =
            FnOracle::new(|p: &[u32]| 1.0 + 3.0 * p[0] as f64 + 1.0 * p[1] as f64 + 0.0 * p[2] as f64);
        let mut session = OracleSession::new(&mut oracle);

        let alloc = Allocation::zeros(3);
        session.commit(&alloc).unwrap();

        let utils = measure_utilities(&mut session, &alloc).unwrap();
        assert_eq!(utils.get(0), 3.0);
        assert_eq!(utils.get(1), 1.0);
        assert_eq!(utils.get(2), 0.0);
    }

    #[test]
    fn negative_marginal_value_clamps_to_zero() {
        let mut oracle = FnOracle::new(|p: &[u32]| 10.0 - p[0] as f64 + p[1] as f64);
        let mut session = OracleSession::new(&mut oracle);

        let alloc = Allocation::zeros(2);
        session.commit(&alloc).unwrap();

        let utils = measure_utilities(&mut session, &alloc).unwrap();
        assert_eq!(utils.get(0), 0.0);
        assert_eq!(utils.get(1), 1.0);
    }

    #[test]
    fn measurement_restores_state_after_exactly_n_calls() {
        let mut oracle = FnOracle::new(|p: &[u32]| 1.0 + p.iter().sum::<u32>() as f64);
        let mut session = OracleSession::new(&mut oracle);

        let alloc = Allocation::from_points(vec![2, 0, 1, 4]);
        session.commit(&alloc).unwrap();

        measure_utilities(&mut session, &alloc).unwrap();
        assert_eq!(session.calls(), 4);
        drop(session);
        assert_eq!(oracle.current(), &[2, 0, 1, 4]);
    }

    #[test]
    fn shared_baseline_is_read_before_probing() {
        // A threshold oracle: score jumps only once v0 reaches 2. Probing v0
        // from 1 sees the jump; the baseline used for v1 is still the
        // pre-probe score.
        let mut oracle =
            FnOracle::new(|p: &[u32]| 1.0 + if p[0] >= 2 { 10.0 } else { 0.0 } + p[1] as f64);
        let mut session = OracleSession::new(&mut oracle);

        let alloc = Allocation::from_points(vec![1, 0]);
        session.commit(&alloc).unwrap();

        let utils = measure_utilities(&mut session, &alloc).unwrap();
        assert_eq!(utils.get(0), 10.0);
        assert_eq!(utils.get(1), 1.0);
    }
}
