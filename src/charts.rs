//! Chart specifications for the absence report
//!
//! The crate does not draw anything: each chart is a serde-serialisable
//! payload (kind, title, data) that an external plotting front end renders.
//! Payloads are fully determined by the dataset and the configuration.

use crate::config::AnalysisConfig;
use crate::record::{Dataset, Field, Record};
use crate::transform::{correlation_matrix, filter_exceeders, AgeGroup};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One slice of a pie chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slice {
    pub label: String,
    pub count: usize,
}

/// A labelled group of values (histogram trace or box)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Series {
    pub label: String,
    pub values: Vec<u32>,
}

/// One point of the scatter matrix, sex as its integer code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Point {
    pub work_days: u32,
    pub age: u32,
    pub sex: u8,
}

impl From<&Record> for Point {
    fn from(record: &Record) -> Self {
        Self {
            work_days: record.work_days,
            age: record.age,
            sex: record.sex.code(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BarMode {
    Group,
    Overlay,
}

/// A chart to be rendered by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChartSpec {
    Pie {
        title: String,
        slices: Vec<Slice>,
    },
    ScatterMatrix {
        title: String,
        dimensions: Vec<String>,
        color: String,
        points: Vec<Point>,
    },
    Histogram {
        title: String,
        x: String,
        barmode: BarMode,
        text_auto: bool,
        groups: Vec<Series>,
    },
    Heatmap {
        title: String,
        labels: Vec<String>,
        /// Row-major correlations; `None` where undefined
        matrix: Vec<Vec<Option<f64>>>,
    },
    BoxPlot {
        title: String,
        x: String,
        y: String,
        groups: Vec<Series>,
    },
}

impl ChartSpec {
    pub fn title(&self) -> &str {
        match self {
            ChartSpec::Pie { title, .. }
            | ChartSpec::ScatterMatrix { title, .. }
            | ChartSpec::Histogram { title, .. }
            | ChartSpec::Heatmap { title, .. }
            | ChartSpec::BoxPlot { title, .. } => title,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ChartSpec::Pie { .. } => "pie",
            ChartSpec::ScatterMatrix { .. } => "scatter_matrix",
            ChartSpec::Histogram { .. } => "histogram",
            ChartSpec::Heatmap { .. } => "heatmap",
            ChartSpec::BoxPlot { .. } => "box_plot",
        }
    }
}

/// Counts per key, most frequent first (ties keep key order)
fn value_counts<K: Ord>(keys: impl Iterator<Item = K>) -> Vec<(K, usize)> {
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for key in keys {
        *counts.entry(key).or_default() += 1;
    }
    let mut counts: Vec<(K, usize)> = counts.into_iter().collect();
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}

fn grouped_work_days<K: Ord + ToString>(
    dataset: &Dataset,
    key: impl Fn(&Record) -> K,
) -> Vec<Series> {
    let mut groups: BTreeMap<K, Vec<u32>> = BTreeMap::new();
    for record in dataset {
        groups.entry(key(record)).or_default().push(record.work_days);
    }
    groups
        .into_iter()
        .map(|(k, values)| Series {
            label: k.to_string(),
            values,
        })
        .collect()
}

fn slices<K: ToString>(counts: Vec<(K, usize)>) -> Vec<Slice> {
    counts
        .into_iter()
        .map(|(k, count)| Slice {
            label: k.to_string(),
            count,
        })
        .collect()
}

fn field_names() -> Vec<String> {
    Field::ALL.iter().map(|f| f.name().to_string()).collect()
}

/// Build the seven report charts in presentation order
pub fn build_charts(dataset: &Dataset, config: &AnalysisConfig) -> Vec<ChartSpec> {
    let exceeders = filter_exceeders(dataset, config.work_days_threshold);
    let age_threshold = config.age_threshold;
    let age_group = |r: &Record| AgeGroup::classify(r.age, age_threshold);

    let matrix = correlation_matrix(&exceeders)
        .iter()
        .map(|row| {
            row.iter()
                .map(|&v| if v.is_nan() { None } else { Some(v) })
                .collect()
        })
        .collect();

    vec![
        ChartSpec::Pie {
            title: "Employees by sex (1 = men, 0 = women)".to_string(),
            slices: slices(value_counts(exceeders.iter().map(|r| r.sex.code()))),
        },
        ChartSpec::ScatterMatrix {
            title: "Scatter matrix: missed work days and age by sex".to_string(),
            dimensions: vec![
                Field::WorkDays.name().to_string(),
                Field::Age.name().to_string(),
            ],
            color: Field::Sex.name().to_string(),
            points: exceeders.iter().map(Point::from).collect(),
        },
        ChartSpec::Histogram {
            title: "Distribution of missed work days by sex".to_string(),
            x: Field::WorkDays.name().to_string(),
            barmode: BarMode::Group,
            text_auto: true,
            groups: grouped_work_days(&exceeders, |r| r.sex.code()),
        },
        ChartSpec::Heatmap {
            title: "Correlation heatmap: missed work days, age and sex".to_string(),
            labels: field_names(),
            matrix,
        },
        ChartSpec::BoxPlot {
            title: "Missed work days by age".to_string(),
            x: Field::Age.name().to_string(),
            y: Field::WorkDays.name().to_string(),
            groups: grouped_work_days(dataset, |r| r.age),
        },
        ChartSpec::Pie {
            title: "Employees by age group".to_string(),
            slices: slices(value_counts(exceeders.iter().map(age_group))),
        },
        ChartSpec::Histogram {
            title: "Distribution of missed work days by age group".to_string(),
            x: Field::WorkDays.name().to_string(),
            barmode: BarMode::Overlay,
            text_auto: false,
            groups: grouped_work_days(&exceeders, age_group),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Sex;

    fn sample() -> Dataset {
        Dataset::from_records(vec![
            Record::new(3, 40, Sex::Male),
            Record::new(1, 22, Sex::Female),
            Record::new(5, 51, Sex::Male),
            Record::new(4, 30, Sex::Female),
            Record::new(0, 19, Sex::Female),
            Record::new(6, 40, Sex::Female),
        ])
    }

    #[test]
    fn test_seven_charts_in_order() {
        let charts = build_charts(&sample(), &AnalysisConfig::default());
        let kinds: Vec<&str> = charts.iter().map(|c| c.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                "pie",
                "scatter_matrix",
                "histogram",
                "heatmap",
                "box_plot",
                "pie",
                "histogram"
            ]
        );
    }

    #[test]
    fn test_sex_pie_counts_exceeders_only() {
        let charts = build_charts(&sample(), &AnalysisConfig::default());
        match &charts[0] {
            ChartSpec::Pie { slices, .. } => {
                let total: usize = slices.iter().map(|s| s.count).sum();
                assert_eq!(total, 4);
                // two of each; ties keep code order
                assert_eq!(slices[0].label, "0");
                assert_eq!(slices[1].label, "1");
            }
            other => panic!("expected pie, got {:?}", other),
        }
    }

    #[test]
    fn test_box_plot_uses_full_dataset() {
        let charts = build_charts(&sample(), &AnalysisConfig::default());
        match &charts[4] {
            ChartSpec::BoxPlot { groups, .. } => {
                let ages: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
                assert_eq!(ages, vec!["19", "22", "30", "40", "51"]);
                assert_eq!(groups[3].values, vec![3, 6]);
            }
            other => panic!("expected box plot, got {:?}", other),
        }
    }

    #[test]
    fn test_age_group_pie_and_histogram() {
        let charts = build_charts(&sample(), &AnalysisConfig::default());
        match &charts[5] {
            ChartSpec::Pie { slices, .. } => {
                assert_eq!(slices[0].label, "old");
                assert_eq!(slices[0].count, 3);
                assert_eq!(slices[1].label, "young");
                assert_eq!(slices[1].count, 1);
            }
            other => panic!("expected pie, got {:?}", other),
        }
        match &charts[6] {
            ChartSpec::Histogram { groups, .. } => {
                assert_eq!(groups[0].label, "old");
                assert_eq!(groups[0].values, vec![3, 5, 6]);
                assert_eq!(groups[1].values, vec![4]);
            }
            other => panic!("expected histogram, got {:?}", other),
        }
    }

    #[test]
    fn test_heatmap_serializes_undefined_as_null() {
        let ds = Dataset::from_records(vec![
            Record::new(3, 40, Sex::Male),
            Record::new(5, 41, Sex::Male),
        ]);
        let charts = build_charts(&ds, &AnalysisConfig::default());
        let json = serde_json::to_value(&charts[3]).unwrap();
        assert_eq!(json["kind"], "heatmap");
        // sex column is constant among exceeders
        assert!(json["matrix"][2][2].is_null());
        assert!((json["matrix"][0][1].as_f64().unwrap() - 1.0).abs() < 1e-4);
    }
}
