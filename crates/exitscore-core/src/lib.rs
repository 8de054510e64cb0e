//! exitscore-core — Assessment model, weighted scoring, and report types.
//!
//! This crate defines the question schema, the scoring engine that turns a
//! set of yes / no / don't-know answers into a sale-readiness score, and the
//! report and narrative types the rest of exitscore builds on.

pub mod engine;
pub mod error;
pub mod model;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod readiness;
pub mod report;
pub mod submission;
pub mod traits;
