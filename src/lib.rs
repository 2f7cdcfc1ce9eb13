//! absentee - absence-record statistics and hypothesis report
//!
//! Loads an absence table (work days missed, age, sex), derives descriptive
//! statistics and runs two pooled two-sample t-tests over the employees who
//! exceed a work-day threshold: men vs women, and old vs young.

pub mod cache;
pub mod charts;
pub mod cli;
pub mod config;
pub mod error;
pub mod html_output;
pub mod hypothesis;
pub mod json_output;
pub mod loader;
pub mod record;
pub mod report;
pub mod transform;

pub use error::{AnalysisError, Result};
