//! HTML output format for absence reports
//!
//! Self-contained page with styled tables. Charts are embedded as JSON
//! payloads (`<script type="application/json">`) for a client-side plotting
//! library to pick up; nothing is drawn here.

use crate::charts::ChartSpec;
use crate::hypothesis::HypothesisOutcome;
use crate::report::Analysis;

/// HTML output formatter
#[derive(Debug, Default)]
pub struct HtmlOutput {
    sections: Vec<(String, Analysis)>,
}

impl HtmlOutput {
    /// Create a new HTML output formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the analysis of one input file
    pub fn add_analysis(&mut self, source: &str, analysis: Analysis) {
        self.sections.push((source.to_string(), analysis));
    }

    /// Escape HTML special characters to prevent XSS
    fn escape_html(text: &str) -> String {
        text.replace('&', "&amp;")
            .replace('<', "&lt;")
            .replace('>', "&gt;")
            .replace('"', "&quot;")
            .replace('\'', "&#39;")
    }

    /// Generate embedded CSS styles
    fn generate_styles() -> &'static str {
        r#"
        body {
            font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
            margin: 20px auto;
            max-width: 960px;
            background-color: #f5f5f5;
        }
        h1, h2, h3 {
            color: #333;
        }
        table {
            border-collapse: collapse;
            background-color: white;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
            margin-bottom: 20px;
        }
        th, td {
            border: 1px solid #ddd;
            padding: 6px 10px;
            text-align: right;
        }
        th {
            background-color: #4a90d9;
            color: white;
            font-weight: bold;
        }
        tr:nth-child(even) {
            background-color: #f9f9f9;
        }
        .hypothesis {
            background-color: white;
            padding: 10px 16px;
            margin-bottom: 20px;
            box-shadow: 0 1px 3px rgba(0,0,0,0.1);
        }
        .reject {
            color: #cc0000;
            font-weight: bold;
        }
        .fail-to-reject {
            color: #2e7d32;
            font-weight: bold;
        }
        .metric {
            font-family: monospace;
        }
        .footer {
            margin-top: 20px;
            font-size: 0.8em;
            color: #888;
            text-align: center;
        }
        "#
    }

    fn format_number(value: f64) -> String {
        if value.is_nan() {
            "NaN".to_string()
        } else {
            format!("{:.4}", value)
        }
    }

    fn format_optional(value: Option<f64>) -> String {
        value.map_or_else(|| "n/a".to_string(), |v| format!("{:.2}", v))
    }

    fn render_head(analysis: &Analysis) -> String {
        let mut html = String::new();
        html.push_str("    <table>\n");
        html.push_str("        <tr><th>work_days</th><th>age</th><th>sex</th></tr>\n");
        for record in &analysis.head {
            html.push_str(&format!(
                "        <tr><td>{}</td><td>{}</td><td>{}</td></tr>\n",
                record.work_days,
                record.age,
                Self::escape_html(record.sex.label())
            ));
        }
        html.push_str("    </table>\n");
        html
    }

    fn render_description(analysis: &Analysis) -> String {
        let columns = &analysis.description.columns;
        let mut html = String::new();
        html.push_str("    <table>\n        <tr><th></th>");
        for column in columns {
            html.push_str(&format!("<th>{}</th>", column.field.name()));
        }
        html.push_str("</tr>\n");

        let mut row = |name: &str, values: Vec<String>| {
            html.push_str(&format!("        <tr><th>{}</th>", name));
            for value in values {
                html.push_str(&format!("<td class=\"metric\">{}</td>", value));
            }
            html.push_str("</tr>\n");
        };
        row("count", columns.iter().map(|c| c.count.to_string()).collect());
        row("mean", columns.iter().map(|c| Self::format_number(c.mean)).collect());
        row("std", columns.iter().map(|c| Self::format_number(c.std)).collect());
        row("min", columns.iter().map(|c| Self::format_number(c.min)).collect());
        row("25%", columns.iter().map(|c| Self::format_number(c.q25)).collect());
        row("50%", columns.iter().map(|c| Self::format_number(c.median)).collect());
        row("75%", columns.iter().map(|c| Self::format_number(c.q75)).collect());
        row("max", columns.iter().map(|c| Self::format_number(c.max)).collect());

        html.push_str("    </table>\n");
        html
    }

    fn render_hypothesis(outcome: &HypothesisOutcome, alpha: f64) -> String {
        let result = &outcome.result;
        let class = if result.decision.rejects_null() {
            "reject"
        } else {
            "fail-to-reject"
        };

        let mut html = String::new();
        html.push_str("    <div class=\"hypothesis\">\n");
        html.push_str(&format!(
            "        <h3>{}</h3>\n",
            Self::escape_html(&outcome.hypothesis.title)
        ));
        html.push_str(&format!(
            "        <p>{}</p>\n        <p>{}</p>\n",
            Self::escape_html(&outcome.hypothesis.null_hypothesis),
            Self::escape_html(&outcome.hypothesis.alternative_hypothesis)
        ));
        html.push_str(&format!(
            "        <p class=\"metric\">{} n={} vs {} n={}: t={:.4}, p={:.5}</p>\n",
            Self::escape_html(&outcome.group_a),
            result.n_a,
            Self::escape_html(&outcome.group_b),
            result.n_b,
            result.statistic,
            result.p_value
        ));
        html.push_str(&format!(
            "        <p class=\"{}\">{}</p>\n",
            class,
            Self::escape_html(&result.decision.explanation(alpha))
        ));
        html.push_str("    </div>\n");
        html
    }

    fn render_charts(index: usize, charts: &[ChartSpec]) -> String {
        let mut html = String::new();
        html.push_str("    <h3>Charts</h3>\n    <ul>\n");
        for chart in charts {
            html.push_str(&format!(
                "        <li>[{}] {}</li>\n",
                chart.kind(),
                Self::escape_html(chart.title())
            ));
        }
        html.push_str("    </ul>\n");

        // "</" cannot appear inside a script element
        let payload = serde_json::to_string(charts)
            .unwrap_or_else(|_| "[]".to_string())
            .replace("</", "<\\/");
        html.push_str(&format!(
            "    <script type=\"application/json\" id=\"charts-{}\">{}</script>\n",
            index, payload
        ));
        html
    }

    fn render_section(index: usize, source: &str, analysis: &Analysis) -> String {
        let config = &analysis.config;
        let mut html = String::new();
        html.push_str(&format!("    <h2>{}</h2>\n", Self::escape_html(source)));
        html.push_str(&format!(
            "    <p>Work days threshold: <b>{}</b>, age threshold: <b>{}</b></p>\n",
            config.work_days_threshold, config.age_threshold
        ));
        html.push_str(&format!(
            "    <h3>Loaded data ({} rows)</h3>\n",
            analysis.row_count
        ));
        html.push_str(&Self::render_head(analysis));
        html.push_str("    <h3>Data description</h3>\n");
        html.push_str(&Self::render_description(analysis));
        html.push_str("    <ul>\n");
        html.push_str(&format!(
            "        <li>Variance of work days: {}</li>\n",
            Self::format_optional(analysis.work_days_variance)
        ));
        html.push_str(&format!(
            "        <li>Variance of age: {}</li>\n",
            Self::format_optional(analysis.age_variance)
        ));
        html.push_str(&format!(
            "        <li>Correlation: {}</li>\n",
            Self::format_optional(analysis.correlation)
        ));
        html.push_str(&format!(
            "        <li>Significance level: {}</li>\n",
            config.significance_level
        ));
        html.push_str("    </ul>\n");
        html.push_str(&Self::render_hypothesis(
            &analysis.sex_hypothesis,
            config.significance_level,
        ));
        html.push_str(&Self::render_hypothesis(
            &analysis.age_hypothesis,
            config.significance_level,
        ));
        html.push_str(&Self::render_charts(index, &analysis.charts));
        html
    }

    /// Generate complete HTML document
    pub fn to_html(&self) -> String {
        let mut html = String::new();

        html.push_str("<!DOCTYPE html>\n");
        html.push_str("<html lang=\"en\">\n");

        html.push_str("<head>\n");
        html.push_str("    <meta charset=\"UTF-8\">\n");
        html.push_str(
            "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
        );
        html.push_str("    <title>Absence Report</title>\n");
        html.push_str("    <style>");
        html.push_str(Self::generate_styles());
        html.push_str("</style>\n");
        html.push_str("</head>\n");

        html.push_str("<body>\n");
        html.push_str("    <h1>Absence Report</h1>\n");

        for (index, (source, analysis)) in self.sections.iter().enumerate() {
            html.push_str(&Self::render_section(index, source, analysis));
        }

        html.push_str("    <div class=\"footer\">\n");
        html.push_str("        Generated by absentee\n");
        html.push_str("    </div>\n");

        html.push_str("</body>\n");
        html.push_str("</html>\n");

        html
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;
    use crate::record::{Dataset, Record, Sex};
    use crate::report::analyze;

    fn analysis() -> Analysis {
        let ds = Dataset::from_records(vec![
            Record::new(9, 40, Sex::Male),
            Record::new(10, 28, Sex::Male),
            Record::new(3, 31, Sex::Female),
            Record::new(4, 45, Sex::Female),
            Record::new(5, 33, Sex::Male),
            Record::new(6, 50, Sex::Female),
        ]);
        analyze(&ds, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(HtmlOutput::escape_html("<script>"), "&lt;script&gt;");
        assert_eq!(HtmlOutput::escape_html("a&b"), "a&amp;b");
        assert_eq!(HtmlOutput::escape_html("\"test\""), "&quot;test&quot;");
        assert_eq!(HtmlOutput::escape_html("'test'"), "&#39;test&#39;");
    }

    #[test]
    fn test_html_document_structure() {
        let mut output = HtmlOutput::new();
        output.add_analysis("<absences>.csv", analysis());
        let html = output.to_html();

        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<h2>&lt;absences&gt;.csv</h2>"));
        assert!(html.contains("Hypothesis 1"));
        assert!(html.contains("Hypothesis 2"));
        assert!(html.contains("id=\"charts-0\""));
        assert!(html.contains("\"kind\":\"scatter_matrix\""));
        assert!(html.ends_with("</html>\n"));
    }

    #[test]
    fn test_head_shows_source_labels() {
        let mut output = HtmlOutput::new();
        output.add_analysis("a.csv", analysis());
        let html = output.to_html();
        assert!(html.contains("<td>М</td>"));
        assert!(html.contains("<td>Ж</td>"));
    }
}
