//! Simple trend forecasts over logged activity.

pub mod sleep;

pub use sleep::*;
