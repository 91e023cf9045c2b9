//! Input/output helpers.
//!
//! - raw CSV ingest (`ingest`)
//! - cleaned-table CSV export (`export`)
//! - model artifact JSON read/write (`artifact`)

pub mod artifact;
pub mod export;
pub mod ingest;

pub use artifact::*;
pub use export::*;
pub use ingest::*;
