//! Transformer: recoding, descriptive statistics and subgroup partitions
//!
//! All functions are pure over an immutable `Dataset`. Subgroups are fresh
//! datasets computed on demand.
//!
//! - Uses trueno::Vector for SIMD mean/variance/min/max and Pearson correlation
//! - Uses aprender's DescriptiveStats for quartiles (R-7 interpolation)

use crate::error::{AnalysisError, Result};
use crate::record::{Dataset, Field, Record, Sex};
use aprender::stats::DescriptiveStats;
use serde::{Deserialize, Serialize};
use std::fmt;
use trueno::Vector;

/// Integer code of a record's sex (female = 0, male = 1)
pub fn recode_sex(record: &Record) -> u8 {
    record.sex.code()
}

/// Sex codes for every record, in order (length always equals `dataset.len()`)
pub fn sex_codes(dataset: &Dataset) -> Vec<u8> {
    dataset.iter().map(recode_sex).collect()
}

/// Summary statistics of one column, as printed by a dataframe `describe()`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSummary {
    pub field: Field,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (n - 1)
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

impl ColumnSummary {
    fn undefined(field: Field, count: usize) -> Self {
        Self {
            field,
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            median: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        }
    }
}

/// Descriptive statistics for work_days, age and sex (in that order)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Description {
    pub columns: Vec<ColumnSummary>,
}

impl Description {
    pub fn column(&self, field: Field) -> Option<&ColumnSummary> {
        self.columns.iter().find(|c| c.field == field)
    }
}

/// Compute count, mean, std, min, quartiles and max for every field
pub fn describe(dataset: &Dataset) -> Result<Description> {
    let columns = Field::ALL
        .iter()
        .map(|&field| summarize(field, &dataset.column(field)))
        .collect::<Result<Vec<_>>>()?;
    Ok(Description { columns })
}

fn summarize(field: Field, values: &[f32]) -> Result<ColumnSummary> {
    if values.is_empty() {
        return Ok(ColumnSummary::undefined(field, 0));
    }

    let v = Vector::from_slice(values);
    let mean = v.mean().map_err(stats_error)?;
    let min = v.min().map_err(stats_error)?;
    let max = v.max().map_err(stats_error)?;
    let std = sample_variance(values)?.map_or(f64::NAN, f64::sqrt);

    let stats = DescriptiveStats::new(&v);
    let q25 = stats.quantile(0.25).map_err(quantile_error)?;
    let median = stats.quantile(0.5).map_err(quantile_error)?;
    let q75 = stats.quantile(0.75).map_err(quantile_error)?;

    Ok(ColumnSummary {
        field,
        count: values.len(),
        mean: f64::from(mean),
        std,
        min: f64::from(min),
        q25: f64::from(q25),
        median: f64::from(median),
        q75: f64::from(q75),
        max: f64::from(max),
    })
}

fn stats_error(err: impl fmt::Display) -> AnalysisError {
    AnalysisError::Statistics(err.to_string())
}

fn quantile_error(err: impl fmt::Display) -> AnalysisError {
    AnalysisError::Statistics(format!("Failed to compute quantile: {}", err))
}

/// Sample variance (n - 1) of raw values; `None` below two observations
fn sample_variance(values: &[f32]) -> Result<Option<f64>> {
    let n = values.len();
    if n < 2 {
        return Ok(None);
    }
    // trueno returns population variance (divide by n)
    let population = Vector::from_slice(values).variance().map_err(stats_error)?;
    Ok(Some(f64::from(population) * n as f64 / (n - 1) as f64))
}

/// Sample variance of a field; `None` for fewer than two rows
pub fn variance(dataset: &Dataset, field: Field) -> Option<f64> {
    sample_variance(&dataset.column(field)).ok().flatten()
}

/// Pearson correlation between two fields
///
/// `None` for fewer than two rows or when either column is constant
/// (trueno reports `DivisionByZero` for a zero standard deviation).
pub fn correlation(dataset: &Dataset, a: Field, b: Field) -> Option<f64> {
    if dataset.len() < 2 {
        return None;
    }
    let xs = Vector::from_slice(&dataset.column(a));
    let ys = Vector::from_slice(&dataset.column(b));
    xs.correlation(&ys)
        .ok()
        .map(f64::from)
        .filter(|r| r.is_finite())
}

/// Pairwise Pearson correlations over (work_days, age, sex)
///
/// Undefined entries (constant columns, tiny datasets) are NaN.
pub fn correlation_matrix(dataset: &Dataset) -> [[f64; 3]; 3] {
    let mut matrix = [[f64::NAN; 3]; 3];
    for (i, &a) in Field::ALL.iter().enumerate() {
        for (j, &b) in Field::ALL.iter().enumerate() {
            matrix[i][j] = correlation(dataset, a, b).unwrap_or(f64::NAN);
        }
    }
    matrix
}

/// Rows whose work_days strictly exceed the threshold
pub fn filter_exceeders(dataset: &Dataset, work_days_threshold: i64) -> Dataset {
    dataset.filter(|r| i64::from(r.work_days) > work_days_threshold)
}

/// Exceeders split by sex
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SexPartition {
    pub female: Dataset,
    pub male: Dataset,
}

impl SexPartition {
    pub fn group(&self, sex: Sex) -> &Dataset {
        match sex {
            Sex::Female => &self.female,
            Sex::Male => &self.male,
        }
    }
}

pub fn partition_by_sex(dataset: &Dataset) -> SexPartition {
    SexPartition {
        female: dataset.filter(|r| r.sex == Sex::Female),
        male: dataset.filter(|r| r.sex == Sex::Male),
    }
}

/// Age bucket relative to the configured age threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgeGroup {
    /// age > threshold
    Old,
    /// age <= threshold (the threshold itself is young)
    Young,
}

impl AgeGroup {
    pub fn classify(age: u32, age_threshold: i64) -> Self {
        if i64::from(age) > age_threshold {
            AgeGroup::Old
        } else {
            AgeGroup::Young
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AgeGroup::Old => "old",
            AgeGroup::Young => "young",
        }
    }
}

impl fmt::Display for AgeGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Rows split into old (age > threshold) and young (age <= threshold)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgePartition {
    pub old: Dataset,
    pub young: Dataset,
}

impl AgePartition {
    pub fn group(&self, group: AgeGroup) -> &Dataset {
        match group {
            AgeGroup::Old => &self.old,
            AgeGroup::Young => &self.young,
        }
    }
}

pub fn partition_by_age(dataset: &Dataset, age_threshold: i64) -> AgePartition {
    AgePartition {
        old: dataset.filter(|r| AgeGroup::classify(r.age, age_threshold) == AgeGroup::Old),
        young: dataset.filter(|r| AgeGroup::classify(r.age, age_threshold) == AgeGroup::Young),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            Record::new(3, 40, Sex::Male),
            Record::new(1, 22, Sex::Female),
            Record::new(5, 51, Sex::Male),
            Record::new(0, 19, Sex::Female),
        ])
    }

    #[test]
    fn test_recode_preserves_row_count() {
        let ds = sample();
        let codes = sex_codes(&ds);
        assert_eq!(codes.len(), ds.len());
        assert_eq!(codes, vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_variance_is_sample_variance() {
        // work_days = [3, 1, 5, 0], mean = 2.25
        // sum of squares = 0.5625 + 1.5625 + 7.5625 + 5.0625 = 14.75 -> /3
        let var = variance(&sample(), Field::WorkDays).unwrap();
        assert!((var - 14.75 / 3.0).abs() < 1e-4, "variance {}", var);
    }

    #[test]
    fn test_variance_undefined_for_single_row() {
        let ds = Dataset::from_records(vec![Record::new(3, 40, Sex::Male)]);
        assert!(variance(&ds, Field::Age).is_none());
    }

    #[test]
    fn test_correlation_perfect_linear() {
        let ds = Dataset::from_records(vec![
            Record::new(1, 20, Sex::Male),
            Record::new(2, 30, Sex::Female),
            Record::new(3, 40, Sex::Male),
        ]);
        let r = correlation(&ds, Field::WorkDays, Field::Age).unwrap();
        assert!((r - 1.0).abs() < 1e-4, "r = {}", r);
    }

    #[test]
    fn test_correlation_positive_on_sample() {
        let r = correlation(&sample(), Field::WorkDays, Field::Age).unwrap();
        assert!(r > 0.9 && r <= 1.0, "r = {}", r);
    }

    #[test]
    fn test_correlation_constant_column_undefined() {
        let ds = Dataset::from_records(vec![
            Record::new(2, 20, Sex::Male),
            Record::new(2, 30, Sex::Male),
        ]);
        assert!(correlation(&ds, Field::WorkDays, Field::Age).is_none());
        let m = correlation_matrix(&ds);
        assert!(m[0][1].is_nan());
        assert!(m[2][2].is_nan());
    }

    #[test]
    fn test_correlation_matrix_symmetric_unit_diagonal() {
        let m = correlation_matrix(&sample());
        for i in 0..3 {
            assert!((m[i][i] - 1.0).abs() < 1e-4);
            for j in 0..3 {
                assert!((m[i][j] - m[j][i]).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn test_describe_columns() {
        let desc = describe(&sample()).unwrap();
        assert_eq!(desc.columns.len(), 3);
        let days = desc.column(Field::WorkDays).unwrap();
        assert_eq!(days.count, 4);
        assert!((days.mean - 2.25).abs() < 1e-6);
        assert_eq!(days.min, 0.0);
        assert_eq!(days.max, 5.0);
        // sorted [0, 1, 3, 5], linear interpolation
        assert!((days.median - 2.0).abs() < 1e-6);
        assert!((days.q25 - 0.75).abs() < 1e-6);
        assert!((days.q75 - 3.5).abs() < 1e-6);
        let sex = desc.column(Field::Sex).unwrap();
        assert!((sex.mean - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_describe_empty_dataset() {
        let desc = describe(&Dataset::default()).unwrap();
        for col in &desc.columns {
            assert_eq!(col.count, 0);
            assert!(col.mean.is_nan());
        }
    }

    #[test]
    fn test_describe_is_deterministic() {
        let ds = sample();
        let a = describe(&ds).unwrap();
        let b = describe(&ds).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_filter_exceeders_strict() {
        let exceeders = filter_exceeders(&sample(), 3);
        assert_eq!(exceeders.column(Field::WorkDays), vec![5.0]);
        let exceeders = filter_exceeders(&sample(), 2);
        assert_eq!(exceeders.column(Field::WorkDays), vec![3.0, 5.0]);
    }

    #[test]
    fn test_partition_by_sex() {
        let parts = partition_by_sex(&sample());
        assert_eq!(parts.male.len(), 2);
        assert_eq!(parts.female.len(), 2);
        assert_eq!(parts.group(Sex::Female).column(Field::Age), vec![22.0, 19.0]);
    }

    #[test]
    fn test_partition_by_age_boundary_is_young() {
        let ds = Dataset::from_records(vec![
            Record::new(3, 35, Sex::Male),
            Record::new(4, 36, Sex::Female),
        ]);
        let parts = partition_by_age(&ds, 35);
        assert_eq!(parts.young.column(Field::Age), vec![35.0]);
        assert_eq!(parts.old.column(Field::Age), vec![36.0]);
        assert_eq!(AgeGroup::classify(35, 35), AgeGroup::Young);
    }
}
