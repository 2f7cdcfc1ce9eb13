//! Single-pass absence analysis and its text rendering
//!
//! `analyze` runs the whole pipeline over one loaded dataset: descriptive
//! statistics, the two hypothesis tests and the chart payloads. Any error is
//! terminal for the pass; no partial `Analysis` is produced.

use crate::charts::{build_charts, ChartSpec};
use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::hypothesis::{evaluate_age, evaluate_sex, HypothesisOutcome};
use crate::record::{Dataset, Field, Record};
use crate::transform::{
    correlation, describe, filter_exceeders, variance, ColumnSummary, Description,
};
use serde::Serialize;
use tracing::info;

/// Complete result of one analysis pass
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub config: AnalysisConfig,
    pub row_count: usize,
    /// Leading rows, as loaded
    pub head: Vec<Record>,
    pub description: Description,
    pub work_days_variance: Option<f64>,
    pub age_variance: Option<f64>,
    /// Pearson correlation of work_days and age
    pub correlation: Option<f64>,
    pub exceeder_count: usize,
    pub sex_hypothesis: HypothesisOutcome,
    pub age_hypothesis: HypothesisOutcome,
    pub charts: Vec<ChartSpec>,
}

/// Run the full analysis over a dataset
pub fn analyze(dataset: &Dataset, config: &AnalysisConfig) -> Result<Analysis> {
    config.validate()?;

    let description = describe(dataset)?;
    let exceeder_count = filter_exceeders(dataset, config.work_days_threshold).len();
    info!(
        "Analyzing {} records ({} exceed {} work days)",
        dataset.len(),
        exceeder_count,
        config.work_days_threshold
    );

    let sex_hypothesis = evaluate_sex(dataset, config)?;
    let age_hypothesis = evaluate_age(dataset, config)?;

    Ok(Analysis {
        config: config.clone(),
        row_count: dataset.len(),
        head: dataset.head(config.head_rows).to_vec(),
        description,
        work_days_variance: variance(dataset, Field::WorkDays),
        age_variance: variance(dataset, Field::Age),
        correlation: correlation(dataset, Field::WorkDays, Field::Age),
        exceeder_count,
        sex_hypothesis,
        age_hypothesis,
        charts: build_charts(dataset, config),
    })
}

fn rounded(value: Option<f64>) -> String {
    match value {
        Some(v) => format!("{:.2}", v),
        None => "n/a".to_string(),
    }
}

fn cell(value: f64) -> String {
    if value.is_nan() {
        "NaN".to_string()
    } else {
        format!("{:.6}", value)
    }
}

fn render_outcome(report: &mut String, outcome: &HypothesisOutcome, alpha: f64) {
    let result = &outcome.result;
    report.push_str(&format!("\n== {} ==\n", outcome.hypothesis.title));
    report.push_str(&format!("{}\n", outcome.hypothesis.null_hypothesis));
    report.push_str(&format!("{}\n", outcome.hypothesis.alternative_hypothesis));
    report.push_str(&format!(
        "Groups: {} (n={}, mean={:.2}) vs {} (n={}, mean={:.2})\n",
        outcome.group_a, result.n_a, result.mean_a, outcome.group_b, result.n_b, result.mean_b
    ));
    report.push_str(&format!("p-value={:.5}\n", result.p_value));
    report.push_str(&format!("t-test: statistic={:.4}\n", result.statistic));
    report.push_str(&format!(
        "Decision: {} - {}\n",
        result.decision,
        result.decision.explanation(alpha)
    ));
}

impl Analysis {
    /// Human-readable report
    pub fn to_report_string(&self) -> String {
        let mut report = String::new();

        report.push_str("Selected values:\n");
        report.push_str(&format!(
            "  Work days threshold: {}\n",
            self.config.work_days_threshold
        ));
        report.push_str(&format!("  Age threshold: {}\n", self.config.age_threshold));

        report.push_str(&format!(
            "\n* Loaded data ({} rows, first {} shown):\n",
            self.row_count,
            self.head.len()
        ));
        report.push_str(&format!(
            "  {:>9} {:>5} {:>4}\n",
            Field::WorkDays.name(),
            Field::Age.name(),
            Field::Sex.name()
        ));
        for record in &self.head {
            report.push_str(&format!(
                "  {:>9} {:>5} {:>4}\n",
                record.work_days,
                record.age,
                record.sex.label()
            ));
        }

        report.push_str("\n* Data description:\n");
        report.push_str(&format!("  {:<6}", ""));
        for column in &self.description.columns {
            report.push_str(&format!(" {:>12}", column.field.name()));
        }
        report.push('\n');
        let rows: [(&str, fn(&ColumnSummary) -> f64); 8] = [
            ("count", |c| c.count as f64),
            ("mean", |c| c.mean),
            ("std", |c| c.std),
            ("min", |c| c.min),
            ("25%", |c| c.q25),
            ("50%", |c| c.median),
            ("75%", |c| c.q75),
            ("max", |c| c.max),
        ];
        for (name, stat) in rows {
            report.push_str(&format!("  {:<6}", name));
            for column in &self.description.columns {
                report.push_str(&format!(" {:>12}", cell(stat(column))));
            }
            report.push('\n');
        }

        report.push('\n');
        report.push_str(&format!(
            "Variance of work days: {}\n",
            rounded(self.work_days_variance)
        ));
        report.push_str(&format!("Variance of age: {}\n", rounded(self.age_variance)));
        report.push_str(&format!(
            "Correlation of work days and age: {}\n",
            rounded(self.correlation)
        ));
        report.push_str(&format!(
            "Significance level: {}\n",
            self.config.significance_level
        ));
        report.push_str(&format!(
            "Employees missing more than {} work days: {}\n",
            self.config.work_days_threshold, self.exceeder_count
        ));

        let alpha = self.config.significance_level;
        render_outcome(&mut report, &self.sex_hypothesis, alpha);
        render_outcome(&mut report, &self.age_hypothesis, alpha);

        report.push_str(&format!("\nCharts: {}\n", self.charts.len()));
        for chart in &self.charts {
            report.push_str(&format!("  - [{}] {}\n", chart.kind(), chart.title()));
        }

        report
    }
}
