// Hypothesis evaluation for absence data
//
// Two fixed comparisons run over the exceeders (records with work_days above
// the configured threshold):
// - by sex: male-coded vs female-coded work_days
// - by age: old (age > threshold) vs young (age <= threshold) work_days
//
// Each comparison is a pooled (equal-variance) two-sample t-test from
// aprender, classified against a fixed significance level.

mod decision;
mod evaluate;
mod statistics;

pub use decision::{Decision, SIGNIFICANCE_LEVEL};
pub use evaluate::{evaluate_age, evaluate_sex, Comparison, Hypothesis, HypothesisOutcome};
pub use statistics::{t_test, Sample, TestResult};
