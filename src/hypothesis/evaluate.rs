// The two fixed comparisons over exceeders, with their hypothesis wording

use crate::config::AnalysisConfig;
use crate::error::Result;
use crate::hypothesis::statistics::{t_test, Sample, TestResult};
use crate::record::{Dataset, Field};
use crate::transform::{filter_exceeders, partition_by_age, partition_by_sex};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Which grouping a hypothesis compares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Male-coded vs female-coded exceeders
    Sex,
    /// Old (age > threshold) vs young (age <= threshold) exceeders
    Age,
}

impl Comparison {
    /// Labels of the (a, b) samples fed to the t-test
    pub fn group_labels(self) -> (&'static str, &'static str) {
        match self {
            Comparison::Sex => ("male", "female"),
            Comparison::Age => ("old", "young"),
        }
    }
}

/// Wording of a hypothesis, parameterised by the thresholds
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hypothesis {
    pub comparison: Comparison,
    pub title: String,
    pub null_hypothesis: String,
    pub alternative_hypothesis: String,
}

impl Hypothesis {
    pub fn new(comparison: Comparison, config: &AnalysisConfig) -> Self {
        let days = config.work_days_threshold;
        let age = config.age_threshold;
        match comparison {
            Comparison::Sex => Self {
                comparison,
                title: format!(
                    "Hypothesis 1: men miss more than {} work days a year due to illness significantly more often than women",
                    days
                ),
                null_hypothesis: format!(
                    "H0: men miss more than {} work days a year due to illness as often as or less often than women",
                    days
                ),
                alternative_hypothesis: format!(
                    "H1: men miss more than {} work days a year due to illness significantly more often than women",
                    days
                ),
            },
            // "young" includes the threshold age itself
            Comparison::Age => Self {
                comparison,
                title: format!(
                    "Hypothesis 2: employees older than {} miss more than {} work days a year due to illness significantly more often than their younger colleagues",
                    age, days
                ),
                null_hypothesis: format!(
                    "H0: employees older than {} miss more than {} work days a year due to illness as often as or less often than employees aged {} or younger",
                    age, days, age
                ),
                alternative_hypothesis: format!(
                    "H1: employees older than {} miss more than {} work days a year due to illness significantly more often than employees aged {} or younger",
                    age, days, age
                ),
            },
        }
    }
}

/// A hypothesis together with its t-test result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HypothesisOutcome {
    pub hypothesis: Hypothesis,
    pub group_a: String,
    pub group_b: String,
    pub result: TestResult,
}

fn run(
    comparison: Comparison,
    a: &Dataset,
    b: &Dataset,
    config: &AnalysisConfig,
) -> Result<HypothesisOutcome> {
    let (label_a, label_b) = comparison.group_labels();
    let values_a = a.column(Field::WorkDays);
    let values_b = b.column(Field::WorkDays);
    let result = t_test(
        Sample::new(label_a, &values_a),
        Sample::new(label_b, &values_b),
        config.significance_level,
    )?;
    info!(
        "{:?} comparison: t={:.4}, p={:.5}, {}",
        comparison, result.statistic, result.p_value, result.decision
    );
    Ok(HypothesisOutcome {
        hypothesis: Hypothesis::new(comparison, config),
        group_a: label_a.to_string(),
        group_b: label_b.to_string(),
        result,
    })
}

/// Test whether male exceeders miss more days than female exceeders
pub fn evaluate_sex(dataset: &Dataset, config: &AnalysisConfig) -> Result<HypothesisOutcome> {
    let exceeders = filter_exceeders(dataset, config.work_days_threshold);
    let groups = partition_by_sex(&exceeders);
    run(Comparison::Sex, &groups.male, &groups.female, config)
}

/// Test whether old exceeders miss more days than young exceeders
pub fn evaluate_age(dataset: &Dataset, config: &AnalysisConfig) -> Result<HypothesisOutcome> {
    let exceeders = filter_exceeders(dataset, config.work_days_threshold);
    let groups = partition_by_age(&exceeders, config.age_threshold);
    run(Comparison::Age, &groups.old, &groups.young, config)
}
