// Two-sample t-test using aprender and statrs
//
// Pooled (equal-variance) independent t-test, two-tailed. aprender supplies
// the statistic and degrees of freedom; the p-value is taken in f64 from the
// exact Student-t distribution. Group means come from trueno::Vector.

use crate::error::{AnalysisError, Result};
use crate::hypothesis::decision::Decision;
use serde::{Deserialize, Serialize};
use statrs::distribution::{ContinuousCDF, StudentsT};
use tracing::debug;
use trueno::Vector;

/// A labelled group of observations
#[derive(Debug, Clone, Copy)]
pub struct Sample<'a> {
    pub label: &'a str,
    pub values: &'a [f32],
}

impl<'a> Sample<'a> {
    pub fn new(label: &'a str, values: &'a [f32]) -> Self {
        Self { label, values }
    }

    fn require_two(&self) -> Result<()> {
        if self.values.len() < 2 {
            return Err(AnalysisError::InsufficientSample {
                group: self.label.to_string(),
                size: self.values.len(),
            });
        }
        Ok(())
    }

    fn mean(&self) -> f64 {
        Vector::from_slice(self.values)
            .mean()
            .map(f64::from)
            .unwrap_or(f64::NAN)
    }
}

/// Result of a two-sample t-test with its decision
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResult {
    /// t-statistic (positive when sample a has the larger mean)
    pub statistic: f64,

    /// Two-tailed p-value under H0 of equal means
    pub p_value: f64,

    /// Degrees of freedom (n_a + n_b - 2)
    pub df: f64,

    pub decision: Decision,

    pub mean_a: f64,
    pub mean_b: f64,
    pub n_a: usize,
    pub n_b: usize,
}

/// Compare the means of two independent samples
///
/// Uses aprender's `ttest_ind()` with the equal-variance assumption for the
/// statistic, and the Student-t survival function for the p-value. Either
/// sample having fewer than two observations is an `InsufficientSample`
/// error; a test the backend cannot compute (both samples constant) is a
/// `Statistics` error.
///
/// # Example
/// ```ignore
/// use absentee::hypothesis::{t_test, Sample, SIGNIFICANCE_LEVEL};
///
/// let low = [3.0, 4.0, 3.0, 5.0, 4.0];
/// let high = [9.0, 11.0, 10.0, 12.0, 9.0];
/// let result = t_test(Sample::new("low", &low), Sample::new("high", &high), SIGNIFICANCE_LEVEL).unwrap();
/// assert!(result.decision.rejects_null());
/// ```
pub fn t_test(sample_a: Sample<'_>, sample_b: Sample<'_>, alpha: f64) -> Result<TestResult> {
    sample_a.require_two()?;
    sample_b.require_two()?;

    let ttest = aprender::stats::hypothesis::ttest_ind(sample_a.values, sample_b.values, true)
        .map_err(|e| AnalysisError::Statistics(format!("Failed to compute t-test: {}", e)))?;

    let statistic = f64::from(ttest.statistic);
    let df = f64::from(ttest.df);
    if !statistic.is_finite() {
        return Err(AnalysisError::Statistics(format!(
            "t-test undefined for '{}' vs '{}' (zero variance in both groups)",
            sample_a.label, sample_b.label
        )));
    }
    let p_value = two_sided_p_value(statistic, df)?;

    let decision = Decision::from_p_value(p_value, alpha);
    debug!(
        "t-test {} (n={}) vs {} (n={}): t={:.4}, p={:.5} -> {}",
        sample_a.label,
        sample_a.values.len(),
        sample_b.label,
        sample_b.values.len(),
        statistic,
        p_value,
        decision
    );

    Ok(TestResult {
        statistic,
        p_value,
        df,
        decision,
        mean_a: sample_a.mean(),
        mean_b: sample_b.mean(),
        n_a: sample_a.values.len(),
        n_b: sample_b.values.len(),
    })
}

/// Two-tailed p-value of `statistic` under Student's t with `df` degrees of freedom
fn two_sided_p_value(statistic: f64, df: f64) -> Result<f64> {
    let dist = StudentsT::new(0.0, 1.0, df).map_err(|e| {
        AnalysisError::Statistics(format!("Invalid t distribution (df = {}): {}", df, e))
    })?;
    let p_value = (2.0 * dist.sf(statistic.abs())).min(1.0);
    if !p_value.is_finite() {
        return Err(AnalysisError::Statistics(format!(
            "p-value undefined for t = {}, df = {}",
            statistic, df
        )));
    }
    Ok(p_value)
}
