//! # pt-optimizer
//!
//! Allocation optimization against an opaque, expensive scoring oracle.
//!
//! A run distributes a fixed integer point budget across N variables in two
//! phases: a greedy batched warm start driven by measured marginal utilities
//! (Phase 1), then local-search rebalancing via pairwise one-point transfers
//! (Phase 2). Every oracle call is treated as the dominant cost.

pub mod coordinator;
pub mod estimator;
pub mod greedy;
pub mod rebalance;

pub use coordinator::Optimizer;
pub use estimator::measure_utilities;
pub use greedy::allocate_greedy;
pub use rebalance::{optimize_by_swap, try_zero_vars};
