//! Domain types used throughout the crate.
//!
//! This module defines:
//!
//! - input categories (`Sex`, `Metric`)
//! - reference model pieces (`LinearCoef`, `CurveCoefficients`, `ReferenceCurve`)
//! - measurements and their assessments (`Measurement`, `Assessment`, `PercentileBand`)
//! - age arithmetic from calendar dates (`age_in_months`)

pub mod age;
pub mod types;

pub use age::*;
pub use types::*;
