//! `propfit` library crate.
//!
//! A batch pipeline for real-estate listings: clean a raw CSV extract,
//! engineer numeric features, freeze a one-hot feature space, fit a price
//! regressor, and serve predictions against the frozen feature space.
//!
//! The binary (`propfit`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the cleaning/encoding code is reusable by a future service layer
//! - training and serving share one feature-space definition

pub mod app;
pub mod clean;
pub mod cli;
pub mod domain;
pub mod error;
pub mod features;
pub mod fit;
pub mod io;
pub mod math;
pub mod report;
pub mod serve;
