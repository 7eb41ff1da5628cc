//! # accel_core
//!
//! Domain types for the blackasian launcher: the pricing parameters
//! handed to the accelerator kernel, the scalar result pair it produces,
//! and the reporting of that result against optional reference values.
//!
//! This crate knows nothing about devices or binaries; those live in
//! `accel_runtime`.

pub mod report;
pub mod types;

pub use report::{deviation_pct, PricingReport, ReportFormat};
pub use types::{PricingParameters, PricingResult, ReferenceValues};
