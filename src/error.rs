//! Error taxonomy for the analysis pipeline
//!
//! Every variant is terminal for the current analysis pass: the caller gets
//! the message, no partial result is produced.

use thiserror::Error;

/// Errors raised while loading, transforming or testing a dataset
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Input bytes are not valid under the declared encoding
    #[error("Input is not valid {encoding} text (first malformed byte at offset {offset})")]
    Decode { encoding: String, offset: usize },

    /// Row shape or field value does not match the fixed three-column layout
    #[error("Parse error on line {line}: {reason}")]
    Parse { line: u64, reason: String },

    /// A compared group has fewer than two observations
    #[error("Insufficient sample: group '{group}' has {size} observation(s), need at least 2")]
    InsufficientSample { group: String, size: usize },

    /// Invalid analysis configuration (thresholds, encoding label, config file)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The statistics backend could not compute a result
    #[error("Statistics error: {0}")]
    Statistics(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for analysis operations
pub type Result<T> = std::result::Result<T, AnalysisError>;

impl AnalysisError {
    /// Short taxonomy name, used by reports when a comparison could not run
    pub fn kind(&self) -> &'static str {
        match self {
            AnalysisError::Decode { .. } => "DecodeError",
            AnalysisError::Parse { .. } => "ParseError",
            AnalysisError::InsufficientSample { .. } => "InsufficientSampleError",
            AnalysisError::Config(_) => "ConfigError",
            AnalysisError::Statistics(_) => "StatisticsError",
            AnalysisError::Io(_) => "IoError",
        }
    }

    pub(crate) fn parse(line: u64, reason: impl Into<String>) -> Self {
        AnalysisError::Parse {
            line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_names() {
        let err = AnalysisError::InsufficientSample {
            group: "female".to_string(),
            size: 0,
        };
        assert_eq!(err.kind(), "InsufficientSampleError");
        assert_eq!(AnalysisError::Config("x".into()).kind(), "ConfigError");
        assert_eq!(AnalysisError::parse(3, "bad").kind(), "ParseError");
    }

    #[test]
    fn test_parse_message_includes_line() {
        let err = AnalysisError::parse(7, "expected 3 fields, found 2");
        assert_eq!(
            err.to_string(),
            "Parse error on line 7: expected 3 fields, found 2"
        );
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: AnalysisError = io.into();
        assert!(matches!(err, AnalysisError::Io(_)));
    }
}
