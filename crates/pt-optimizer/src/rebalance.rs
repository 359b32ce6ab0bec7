//! Phase 2: local-search rebalancing.
//!
//! Two sub-procedures, run in sequence by the coordinator: pairwise swap
//! optimization among funded variables, then a single zero-injection pass for
//! variables the greedy phase left unfunded. Both rank candidate moves with
//! the Phase-1 utility snapshot — a heuristic, not ground truth — and test
//! acceptance against the real oracle score.

use tracing::{debug, info};

use pt_oracle::{Oracle, OracleSession};
use pt_types::{Allocation, PtResult, TunerConfig, UtilitySnapshot};

/// A candidate one-point transfer between two funded variables.
#[derive(Debug, Clone, Copy)]
struct SwapCandidate {
    from: usize,
    to: usize,
    /// `utility[to] - utility[from]`: prefer draining low-marginal variables
    /// into high-marginal ones.
    priority: f64,
}

/// Pairwise swap optimization among funded variables.
///
/// Runs up to `config.max_iterations` rounds. Each round ranks every ordered
/// pair of distinct funded variables by utility difference, reads the baseline
/// once, and scores up to `config.max_candidates` top-ranked transfers in
/// order, accepting the first that beats `baseline + threshold`. A round with
/// no acceptance is a local optimum for its candidate set and ends the
/// procedure; untried lower-priority candidates are not explored.
///
/// Returns the number of accepted transfers.
pub fn optimize_by_swap<O: Oracle + ?Sized>(
    session: &mut OracleSession<'_, O>,
    allocation: &mut Allocation,
    utilities: &UtilitySnapshot,
    config: &TunerConfig,
) -> PtResult<usize> {
    let mut improvements = 0usize;

    for round in 0..config.max_iterations {
        let active = allocation.active();
        if active.len() < 2 {
            break;
        }

        let mut candidates = Vec::with_capacity(active.len() * (active.len() - 1));
        for &from in &active {
            for &to in &active {
                if from != to {
                    candidates.push(SwapCandidate {
                        from,
                        to,
                        priority: utilities.get(to) - utilities.get(from),
                    });
                }
            }
        }
        candidates.sort_by(|a, b| {
            b.priority
                .partial_cmp(&a.priority)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.from.cmp(&b.from))
                .then(a.to.cmp(&b.to))
        });

        // No pair looks promising under the snapshot: stop before spending
        // any oracle calls this round.
        if candidates.first().map_or(true, |c| c.priority <= 0.0) {
            break;
        }

        let baseline = session.current_score()?;
        let mut accepted = false;

        for candidate in candidates.iter().take(config.max_candidates) {
            let Some(tentative) = allocation.with_transfer(candidate.from, candidate.to) else {
                continue;
            };
            let score = session.probe(&tentative)?;
            if score > baseline + config.threshold {
                debug!(
                    round,
                    from = candidate.from,
                    to = candidate.to,
                    gain = score - baseline,
                    "accepted point transfer"
                );
                *allocation = tentative;
                improvements += 1;
                accepted = true;
                break;
            }
        }

        if !accepted {
            // Every tried candidate left the score flat or worse; put the
            // committed state back and stop.
            session.commit(allocation)?;
            break;
        }
    }

    Ok(improvements)
}

/// Single zero-injection pass: try funding currently unallocated variables.
///
/// Pairs every zero variable with the `config.top_vars` lowest-utility funded
/// donors (removing a point from a low-marginal variable is the cheapest
/// expected loss), scores every pairing against one baseline read, and tracks
/// the single best gain across the whole cross product — unlike swap
/// optimization, which takes the first improving candidate. Commits the best
/// pairing only if its gain exceeds the threshold; otherwise the pre-injection
/// allocation is restored untouched.
///
/// Runs at most once per optimization run.
pub fn try_zero_vars<O: Oracle + ?Sized>(
    session: &mut OracleSession<'_, O>,
    allocation: &mut Allocation,
    utilities: &UtilitySnapshot,
    config: &TunerConfig,
) -> PtResult<bool> {
    let zeros = allocation.unfunded();
    if zeros.is_empty() {
        return Ok(false);
    }

    let mut donors: Vec<usize> = utilities
        .ranked_ascending()
        .into_iter()
        .map(|(index, _)| index)
        .filter(|&index| allocation.get(index) > 0)
        .collect();
    donors.truncate(config.top_vars);
    if donors.is_empty() {
        return Ok(false);
    }

    let baseline = session.current_score()?;
    let mut best: Option<(Allocation, f64)> = None;

    for &zero in &zeros {
        for &donor in &donors {
            let Some(tentative) = allocation.with_transfer(donor, zero) else {
                continue;
            };
            let score = session.probe(&tentative)?;
            let gain = score - baseline;
            if best.as_ref().map_or(true, |(_, g)| gain > *g) {
                best = Some((tentative, gain));
            }
        }
    }

    match best {
        Some((tentative, gain)) if gain > config.threshold => {
            info!(gain, allocation = %tentative, "zero-injection accepted");
            *allocation = tentative;
            session.commit(allocation)?;
            Ok(true)
        }
        _ => {
            session.commit(allocation)?;
            Ok(false)
        }
    }
}
