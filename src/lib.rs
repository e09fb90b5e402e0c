//! `growth-curves` library crate.
//!
//! The binary (`growth`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the estimator can be embedded by other front-ends
//!
//! The core is `percentile`: an approximate growth-percentile estimator built
//! from a linear reference model and the standard normal CDF. Its results are
//! demonstrative, not clinical.

pub mod app;
pub mod cli;
pub mod data;
pub mod domain;
pub mod error;
pub mod fit;
pub mod forecast;
pub mod io;
pub mod logging;
pub mod math;
pub mod percentile;
pub mod plot;
pub mod reference;
pub mod report;
pub mod sentiment;
