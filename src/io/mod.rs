//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - assessment exports (CSV) (`export`)
//! - reference table / lexicon JSON read/write (`config`)

pub mod config;
pub mod export;
pub mod ingest;

pub use config::*;
pub use export::*;
pub use ingest::*;
