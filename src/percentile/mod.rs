//! Growth percentile estimation.
//!
//! The three core operations are small, pure functions:
//!
//! - `math::standard_normal_cdf` (re-exported here)
//! - `reference_curve` / `ReferenceTable::curve`
//! - `estimate_percentile`
//!
//! `PercentileEstimator` composes them against an explicit reference table.

pub mod estimator;

pub use crate::math::standard_normal_cdf;
pub use crate::reference::reference_curve;
pub use estimator::*;
