// Analysis configuration: the explicit context object every pipeline stage
// receives instead of reading ambient state.

use crate::error::{AnalysisError, Result};
use crate::hypothesis::SIGNIFICANCE_LEVEL;
use crate::loader::{TextEncoding, DEFAULT_ENCODING};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Parameters of one analysis pass
///
/// # Example
/// ```
/// use absentee::config::AnalysisConfig;
///
/// let config = AnalysisConfig::default();
/// assert_eq!(config.work_days_threshold, 2);
/// assert_eq!(config.age_threshold, 35);
/// assert_eq!(config.significance_level, 0.05);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Records with work_days strictly above this value are exceeders
    pub work_days_threshold: i64,

    /// Exceeders older than this are "old", the rest (threshold included) "young"
    pub age_threshold: i64,

    /// Alpha for the hypothesis decision (p >= alpha fails to reject H0)
    pub significance_level: f64,

    /// WHATWG label of the input file encoding
    pub encoding: String,

    /// Number of leading rows echoed in the report
    pub head_rows: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            work_days_threshold: 2,
            age_threshold: 35,
            significance_level: SIGNIFICANCE_LEVEL,
            encoding: DEFAULT_ENCODING.to_string(),
            head_rows: 5,
        }
    }
}

impl AnalysisConfig {
    /// Parse a TOML document; missing keys take their defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(text)
            .map_err(|e| AnalysisError::Config(format!("Invalid config file: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Parse a threshold typed in by the user
    pub fn parse_threshold(name: &str, raw: &str) -> Result<i64> {
        raw.trim().parse::<i64>().map_err(|_| {
            AnalysisError::Config(format!("{} must be an integer, got '{}'", name, raw))
        })
    }

    /// Apply textual overrides (as given on the command line) on top of this config
    pub fn with_overrides(
        mut self,
        work_days: Option<&str>,
        age: Option<&str>,
        encoding: Option<&str>,
    ) -> Result<Self> {
        if let Some(raw) = work_days {
            self.work_days_threshold = Self::parse_threshold("work_days threshold", raw)?;
        }
        if let Some(raw) = age {
            self.age_threshold = Self::parse_threshold("age threshold", raw)?;
        }
        if let Some(label) = encoding {
            self.encoding = label.to_string();
        }
        self.validate()?;
        Ok(self)
    }

    /// Resolve the configured encoding label
    pub fn text_encoding(&self) -> Result<TextEncoding> {
        TextEncoding::from_label(&self.encoding)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if !(self.significance_level > 0.0 && self.significance_level < 1.0) {
            return Err(AnalysisError::Config(format!(
                "significance_level must be in (0, 1), got {}",
                self.significance_level
            )));
        }
        self.text_encoding()?;
        Ok(())
    }
}
