//! CLI argument parsing for absentee

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for the report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text format (default)
    Text,
    /// JSON format for machine parsing (includes chart payloads)
    Json,
    /// Self-contained HTML page
    Html,
}

#[derive(Parser, Debug)]
#[command(name = "absentee")]
#[command(version)]
#[command(about = "Absence statistics and hypothesis tests by sex and age group", long_about = None)]
pub struct Cli {
    /// Work days threshold: employees missing more days than this are tested (default: 2)
    #[arg(short = 'w', long = "work-days", value_name = "N")]
    pub work_days: Option<String>,

    /// Age threshold: employees older than this form the "old" group (default: 35)
    #[arg(short = 'a', long = "age", value_name = "N")]
    pub age: Option<String>,

    /// Input text encoding (default: windows-1251)
    #[arg(short = 'e', long = "encoding", value_name = "LABEL")]
    pub encoding: Option<String>,

    /// TOML configuration file; command-line flags override its values
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Write the report to a file instead of stdout
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,

    /// Absence CSV files (work_days, age, sex)
    #[arg(required = true, value_name = "FILES")]
    pub files: Vec<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_file() {
        let cli = Cli::parse_from(["absentee", "data.csv"]);
        assert_eq!(cli.files, vec![PathBuf::from("data.csv")]);
        assert!(cli.work_days.is_none());
        assert!(cli.age.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_requires_file() {
        assert!(Cli::try_parse_from(["absentee"]).is_err());
    }

    #[test]
    fn test_cli_thresholds_kept_as_text() {
        let cli = Cli::parse_from(["absentee", "-w", "4", "--age", "forty", "data.csv"]);
        assert_eq!(cli.work_days.as_deref(), Some("4"));
        // validated later as a configuration error
        assert_eq!(cli.age.as_deref(), Some("forty"));
    }

    #[test]
    fn test_cli_format_and_output() {
        let cli = Cli::parse_from([
            "absentee",
            "--format",
            "json",
            "-o",
            "report.json",
            "a.csv",
            "b.csv",
        ]);
        assert_eq!(cli.format, OutputFormat::Json);
        assert_eq!(cli.output, Some(PathBuf::from("report.json")));
        assert_eq!(cli.files.len(), 2);
    }

    #[test]
    fn test_cli_encoding_and_config() {
        let cli = Cli::parse_from([
            "absentee",
            "-e",
            "utf-8",
            "--config",
            "analysis.toml",
            "--debug",
            "a.csv",
        ]);
        assert_eq!(cli.encoding.as_deref(), Some("utf-8"));
        assert_eq!(cli.config, Some(PathBuf::from("analysis.toml")));
        assert!(cli.debug);
    }
}
