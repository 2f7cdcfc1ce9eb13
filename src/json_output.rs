//! JSON output format for absence reports
//!
//! One document per run, holding a report per input file and the failures
//! of files whose analysis pass was aborted.

use crate::error::AnalysisError;
use crate::report::Analysis;
use serde::Serialize;

/// Analysis of one input file
#[derive(Debug, Clone, Serialize)]
pub struct JsonReport {
    /// Input path as given on the command line
    pub source: String,
    /// Content hash of the input (encoding + bytes)
    pub cache_key: String,
    pub analysis: Analysis,
}

/// An input whose analysis pass failed
#[derive(Debug, Clone, Serialize)]
pub struct JsonFailure {
    pub source: String,
    /// Error taxonomy name (e.g. "ParseError")
    pub kind: String,
    pub message: String,
}

/// Root JSON output structure
#[derive(Debug, Clone, Serialize)]
pub struct JsonOutput {
    /// Format version identifier
    pub version: String,
    /// Format name
    pub format: String,
    pub reports: Vec<JsonReport>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<JsonFailure>,
}

impl JsonOutput {
    /// Create a new JSON output structure
    pub fn new() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            format: "absentee-json-v1".to_string(),
            reports: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub fn add_report(&mut self, source: &str, cache_key: String, analysis: Analysis) {
        self.reports.push(JsonReport {
            source: source.to_string(),
            cache_key,
            analysis,
        });
    }

    pub fn add_failure(&mut self, source: &str, error: &AnalysisError) {
        self.failures.push(JsonFailure {
            source: source.to_string(),
            kind: error.kind().to_string(),
            message: error.to_string(),
        });
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}
