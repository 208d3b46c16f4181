//! Census analysis.
//!
//! Pairwise interaction counting, per-wasp summaries and the rankings
//! printed after a run. Every function here is a pure computation over a
//! borrowed [`CensusTable`](crate::models::CensusTable).

pub mod aggregator;
pub mod interactions;
pub mod summary;

pub use aggregator::*;
pub use interactions::*;
pub use summary::*;
