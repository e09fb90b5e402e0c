//! Mood note sentiment scoring.

pub mod analyzer;

pub use analyzer::*;
