//! Mathematical utilities: normal distribution approximations and least squares.

pub mod normal;
pub mod ols;

pub use normal::*;
pub use ols::*;
