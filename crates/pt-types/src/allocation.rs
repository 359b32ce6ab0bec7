//! Allocation vectors and marginal-utility snapshots.

use serde::{Deserialize, Serialize};

use crate::errors::{PtError, PtResult};

/// An ordered assignment of non-negative point counts, one per variable.
///
/// Index identifies the variable; the order is fixed for a run's lifetime and
/// is the same order the oracle sees. Probing helpers return copies so a
/// hypothetical state can be scored without touching the committed vector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    points: Vec<u32>,
}

impl Allocation {
    /// All-zero allocation over `n` variables.
    pub fn zeros(n: usize) -> Self {
        Self {
            points: vec![0; n],
        }
    }

    pub fn from_points(points: Vec<u32>) -> Self {
        Self { points }
    }

    /// Number of variables.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total points currently assigned.
    pub fn total(&self) -> u32 {
        self.points.iter().sum()
    }

    pub fn get(&self, index: usize) -> u32 {
        self.points[index]
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.points
    }

    /// Add `amount` points to the variable at `index`.
    pub fn add(&mut self, index: usize, amount: u32) {
        self.points[index] += amount;
    }

    /// Indices with a strictly positive assignment ("funded" variables).
    pub fn active(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, &p)| p > 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Indices with a zero assignment.
    pub fn unfunded(&self) -> Vec<usize> {
        self.points
            .iter()
            .enumerate()
            .filter(|(_, &p)| p == 0)
            .map(|(i, _)| i)
            .collect()
    }

    /// Copy with one extra point on `index`, for marginal-utility probes.
    pub fn with_probe(&self, index: usize) -> Self {
        let mut probe = self.clone();
        probe.points[index] += 1;
        probe
    }

    /// Copy with one point moved from `from` to `to`, or `None` when `from`
    /// has nothing to give.
    pub fn with_transfer(&self, from: usize, to: usize) -> Option<Self> {
        if from == to || self.points[from] == 0 {
            return None;
        }
        let mut moved = self.clone();
        moved.points[from] -= 1;
        moved.points[to] += 1;
        Some(moved)
    }

    /// Move one point from `from` to `to` in place.
    pub fn transfer(&mut self, from: usize, to: usize) -> PtResult<()> {
        if from == to {
            return Err(PtError::allocation(format!(
                "cannot transfer a point from variable {from} to itself"
            )));
        }
        if self.points[from] == 0 {
            return Err(PtError::allocation(format!(
                "variable {from} has no points to transfer"
            )));
        }
        self.points[from] -= 1;
        self.points[to] += 1;
        Ok(())
    }
}

impl std::fmt::Display for Allocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, p) in self.points.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{p}")?;
        }
        write!(f, "]")
    }
}

// ---------------------------------------------------------------------------
// Utility snapshot
// ---------------------------------------------------------------------------

/// Most recently measured marginal score gains, one per variable.
///
/// A stale snapshot taken at some allocation — it is not recomputed when the
/// allocation changes; invalidation is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UtilitySnapshot {
    gains: Vec<f64>,
}

impl UtilitySnapshot {
    pub fn new(gains: Vec<f64>) -> Self {
        Self { gains }
    }

    pub fn len(&self) -> usize {
        self.gains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gains.is_empty()
    }

    pub fn get(&self, index: usize) -> f64 {
        self.gains[index]
    }

    /// Variables with strictly positive utility, descending by utility.
    /// Ties break toward the lower index so selection stays deterministic.
    pub fn ranked_positive(&self) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self
            .gains
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, g)| *g > 0.0)
            .collect();
        ranked.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ranked
    }

    /// All variables ascending by utility, ties toward the lower index.
    pub fn ranked_ascending(&self) -> Vec<(usize, f64)> {
        let mut ranked: Vec<(usize, f64)> = self.gains.iter().copied().enumerate().collect();
        ranked.sort_by(|a, b| {
            a.1.partial_cmp(&b.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_no_active_variables() {
        let alloc = Allocation::zeros(4);
        assert_eq!(alloc.len(), 4);
        assert_eq!(alloc.total(), 0);
        assert!(alloc.active().is_empty());
        assert_eq!(alloc.unfunded(), vec![0, 1, 2, 3]);
    }

    #[test]
    fn probe_copies_do_not_mutate() {
        let alloc = Allocation::from_points(vec![3, 0, 1]);
        let probe = alloc.with_probe(1);
        assert_eq!(probe.as_slice(), &[3, 1, 1]);
        assert_eq!(alloc.as_slice(), &[3, 0, 1]);
    }

    #[test]
    fn transfer_moves_exactly_one_point() {
        let mut alloc = Allocation::from_points(vec![2, 0, 5]);
        alloc.transfer(2, 1).unwrap();
        assert_eq!(alloc.as_slice(), &[2, 1, 4]);
        assert_eq!(alloc.total(), 7);
    }

    #[test]
    fn transfer_from_empty_variable_fails() {
        let mut alloc = Allocation::from_points(vec![2, 0]);
        assert!(alloc.transfer(1, 0).is_err());
        assert_eq!(alloc.as_slice(), &[2, 0]);
    }

    #[test]
    fn with_transfer_rejects_self_and_empty() {
        let alloc = Allocation::from_points(vec![1, 0]);
        assert!(alloc.with_transfer(0, 0).is_none());
        assert!(alloc.with_transfer(1, 0).is_none());
        assert_eq!(
            alloc.with_transfer(0, 1).unwrap().as_slice(),
            &[0, 1]
        );
    }

    #[test]
    fn ranked_positive_filters_and_breaks_ties_by_index() {
        let utils = UtilitySnapshot::new(vec![0.5, 0.0, 2.0, 0.5, -1.0]);
        let ranked = utils.ranked_positive();
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].0, 2);
        // Equal utilities keep index order
        assert_eq!(ranked[1].0, 0);
        assert_eq!(ranked[2].0, 3);
    }

    #[test]
    fn ranked_ascending_orders_lowest_first() {
        let utils = UtilitySnapshot::new(vec![3.0, 1.0, 2.0]);
        let ranked = utils.ranked_ascending();
        assert_eq!(
            ranked.iter().map(|(i, _)| *i).collect::<Vec<_>>(),
            vec![1, 2, 0]
        );
    }

    #[test]
    fn display_renders_bracketed_list() {
        let alloc = Allocation::from_points(vec![4, 0, 6]);
        assert_eq!(alloc.to_string(), "[4, 0, 6]");
    }

    #[test]
    fn allocation_serde_round_trip() {
        let alloc = Allocation::from_points(vec![1, 2, 3]);
        let json = serde_json::to_string(&alloc).unwrap();
        let back: Allocation = serde_json::from_str(&json).unwrap();
        assert_eq!(alloc, back);
    }
}
