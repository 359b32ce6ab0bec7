//! # pt-oracle
//!
//! The scoring-oracle capability for PointTuner.
//!
//! The optimizer never talks to the host environment directly: it sees an
//! [`Oracle`] (two operations, write an allocation and read a score) through
//! an [`OracleSession`] that owns the run's call accounting. [`FnOracle`]
//! provides a deterministic in-memory implementation for tests and demos.

pub mod oracle;
pub mod session;

pub use oracle::*;
pub use session::*;
