use absentee::cache::{CacheKey, DatasetCache};
use absentee::cli::{Cli, OutputFormat};
use absentee::config::AnalysisConfig;
use absentee::html_output::HtmlOutput;
use absentee::json_output::JsonOutput;
use absentee::loader::TextEncoding;
use absentee::report::{analyze, Analysis};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Accumulates reports in the requested output format
enum ReportSink {
    Text(String),
    Json(JsonOutput),
    Html(HtmlOutput),
}

impl ReportSink {
    fn new(format: OutputFormat) -> Self {
        match format {
            OutputFormat::Text => ReportSink::Text(String::new()),
            OutputFormat::Json => ReportSink::Json(JsonOutput::new()),
            OutputFormat::Html => ReportSink::Html(HtmlOutput::new()),
        }
    }

    fn add(&mut self, source: &str, key: CacheKey, analysis: Analysis) {
        match self {
            ReportSink::Text(text) => {
                text.push_str(&format!("=== {} ===\n", source));
                text.push_str(&analysis.to_report_string());
                text.push('\n');
            }
            ReportSink::Json(json) => json.add_report(source, key.to_hex(), analysis),
            ReportSink::Html(html) => html.add_analysis(source, analysis),
        }
    }

    fn add_failure(&mut self, source: &str, error: &absentee::AnalysisError) {
        if let ReportSink::Json(json) = self {
            json.add_failure(source, error);
        }
    }

    fn finish(self) -> Result<String> {
        match self {
            ReportSink::Text(text) => Ok(text),
            ReportSink::Json(json) => json.to_json(),
            ReportSink::Html(html) => Ok(html.to_html()),
        }
    }
}

/// One analysis pass over one input file
fn run_pass(
    cache: &mut DatasetCache,
    path: &Path,
    encoding: TextEncoding,
    config: &AnalysisConfig,
) -> absentee::Result<(CacheKey, Analysis)> {
    let bytes = std::fs::read(path)?;
    let key = CacheKey::new(&bytes, encoding);
    let dataset = cache.get_or_load(&bytes, encoding)?;
    let analysis = analyze(dataset, config)?;
    Ok((key, analysis))
}

fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize tracing if --debug flag is set
    init_tracing(args.debug);

    let base = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    let config = base.with_overrides(
        args.work_days.as_deref(),
        args.age.as_deref(),
        args.encoding.as_deref(),
    )?;
    let encoding = config.text_encoding()?;

    let mut cache = DatasetCache::new();
    let mut sink = ReportSink::new(args.format);
    let mut failures = 0usize;

    for path in &args.files {
        let source = path.display().to_string();
        match run_pass(&mut cache, path, encoding, &config) {
            Ok((key, analysis)) => sink.add(&source, key, analysis),
            Err(err) => {
                failures += 1;
                eprintln!("absentee: {}: {}", source, err);
                sink.add_failure(&source, &err);
            }
        }
    }
    tracing::debug!(
        "Dataset cache: {} entries, {} hits, {} misses",
        cache.len(),
        cache.hits(),
        cache.misses()
    );

    let rendered = sink.finish()?;
    match &args.output {
        Some(path) => std::fs::write(path, rendered)
            .with_context(|| format!("Failed to write report to {}", path.display()))?,
        None => print!("{}", rendered),
    }

    if failures > 0 {
        anyhow::bail!(
            "{} of {} input file(s) could not be analyzed",
            failures,
            args.files.len()
        );
    }

    Ok(())
}
