//! Reference table calibration.

pub mod calibrate;

pub use calibrate::*;
