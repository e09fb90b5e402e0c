//! Reference curve configuration.

pub mod table;

pub use table::*;
