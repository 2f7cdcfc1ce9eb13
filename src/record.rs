//! Absence records and the in-memory dataset
//!
//! A dataset is loaded once per input file and never mutated afterwards.
//! Subgroups (exceeders, sex and age partitions) are new `Dataset` values
//! built on demand by the transform module.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Label for female employees in the source data
pub const FEMALE_LABEL: &str = "Ж";
/// Label for male employees in the source data
pub const MALE_LABEL: &str = "М";

/// Employee sex, recoded to a binary integer for analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Integer code used in statistics and charts (female = 0, male = 1)
    pub fn code(self) -> u8 {
        match self {
            Sex::Female => 0,
            Sex::Male => 1,
        }
    }

    /// Parse a source label. Only the two recognised labels are accepted.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim() {
            FEMALE_LABEL => Some(Sex::Female),
            MALE_LABEL => Some(Sex::Male),
            _ => None,
        }
    }

    /// Source label for this value
    pub fn label(self) -> &'static str {
        match self {
            Sex::Female => FEMALE_LABEL,
            Sex::Male => MALE_LABEL,
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// The three columns of an absence file, in their fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    WorkDays,
    Age,
    Sex,
}

impl Field {
    /// All fields in column order
    pub const ALL: [Field; 3] = [Field::WorkDays, Field::Age, Field::Sex];

    pub fn name(self) -> &'static str {
        match self {
            Field::WorkDays => "work_days",
            Field::Age => "age",
            Field::Sex => "sex",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One absence record: work days missed, age and sex of the employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub work_days: u32,
    pub age: u32,
    pub sex: Sex,
}

impl Record {
    pub fn new(work_days: u32, age: u32, sex: Sex) -> Self {
        Self {
            work_days,
            age,
            sex,
        }
    }

    /// Value of a field as f32 (sex yields its integer code)
    pub fn value(&self, field: Field) -> f32 {
        match field {
            Field::WorkDays => self.work_days as f32,
            Field::Age => self.age as f32,
            Field::Sex => f32::from(self.sex.code()),
        }
    }
}

/// Ordered, immutable sequence of records
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// First `n` records (fewer if the dataset is shorter)
    pub fn head(&self, n: usize) -> &[Record] {
        &self.records[..n.min(self.records.len())]
    }

    /// Column values as f32, in record order
    pub fn column(&self, field: Field) -> Vec<f32> {
        self.records.iter().map(|r| r.value(field)).collect()
    }

    /// Build a new dataset from the records matching `predicate`
    pub fn filter<P>(&self, mut predicate: P) -> Dataset
    where
        P: FnMut(&Record) -> bool,
    {
        Dataset {
            records: self
                .records
                .iter()
                .filter(|r| predicate(r))
                .copied()
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sex_codes() {
        assert_eq!(Sex::Female.code(), 0);
        assert_eq!(Sex::Male.code(), 1);
    }

    #[test]
    fn test_sex_from_label_recognised() {
        assert_eq!(Sex::from_label("Ж"), Some(Sex::Female));
        assert_eq!(Sex::from_label("М"), Some(Sex::Male));
        assert_eq!(Sex::from_label(" М "), Some(Sex::Male));
    }

    #[test]
    fn test_sex_from_label_rejects_unknown() {
        // Latin "M" is not the Cyrillic label
        assert_eq!(Sex::from_label("M"), None);
        assert_eq!(Sex::from_label(""), None);
        assert_eq!(Sex::from_label("male"), None);
    }

    #[test]
    fn test_field_order_and_names() {
        let names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(names, vec!["work_days", "age", "sex"]);
    }

    #[test]
    fn test_column_and_head() {
        let ds = Dataset::from_records(vec![
            Record::new(3, 40, Sex::Male),
            Record::new(1, 22, Sex::Female),
            Record::new(5, 51, Sex::Male),
        ]);
        assert_eq!(ds.column(Field::WorkDays), vec![3.0, 1.0, 5.0]);
        assert_eq!(ds.column(Field::Sex), vec![1.0, 0.0, 1.0]);
        assert_eq!(ds.head(2).len(), 2);
        assert_eq!(ds.head(10).len(), 3);
    }

    #[test]
    fn test_filter_preserves_order() {
        let ds = Dataset::from_records(vec![
            Record::new(3, 40, Sex::Male),
            Record::new(1, 22, Sex::Female),
            Record::new(5, 51, Sex::Male),
        ]);
        let males = ds.filter(|r| r.sex == Sex::Male);
        assert_eq!(males.column(Field::WorkDays), vec![3.0, 5.0]);
    }
}
