//! Absence file loader
//!
//! Decodes a comma-separated byte stream under a declared encoding and
//! parses it into a `Dataset` with the fixed column layout
//! `work_days, age, sex`. The header row is skipped whatever its labels;
//! column order and count are fixed, never inferred.

use crate::error::{AnalysisError, Result};
use crate::record::{Dataset, Record, Sex};
use encoding_rs::Encoding;
use std::path::Path;
use tracing::debug;

/// Number of columns every row must carry
pub const COLUMN_COUNT: usize = 3;

/// Encoding used by the absence exports unless configured otherwise
pub const DEFAULT_ENCODING: &str = "windows-1251";

/// The one byte the windows-1251 code page leaves unassigned. WHATWG maps it
/// to U+0098; the absence exports treat it as undecodable.
const WINDOWS_1251_UNASSIGNED: u8 = 0x98;

/// A validated text encoding for input files
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextEncoding(&'static Encoding);

impl TextEncoding {
    /// Resolve a WHATWG encoding label (`windows-1251`, `cp1251`, `utf-8`, ...)
    pub fn from_label(label: &str) -> Result<Self> {
        Encoding::for_label(label.trim().as_bytes())
            .map(TextEncoding)
            .ok_or_else(|| AnalysisError::Config(format!("Unknown text encoding '{}'", label)))
    }

    pub fn utf8() -> Self {
        TextEncoding(encoding_rs::UTF_8)
    }

    pub fn windows_1251() -> Self {
        TextEncoding(encoding_rs::WINDOWS_1251)
    }

    /// Canonical encoding name
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    /// Decode bytes, refusing any malformed sequence
    pub fn decode<'a>(&self, bytes: &'a [u8]) -> Result<std::borrow::Cow<'a, str>> {
        let bytes = strip_bom(self.0, bytes);
        if self.0 == encoding_rs::WINDOWS_1251 {
            if let Some(offset) = bytes.iter().position(|&b| b == WINDOWS_1251_UNASSIGNED) {
                return Err(AnalysisError::Decode {
                    encoding: self.name().to_string(),
                    offset,
                });
            }
        }
        match self.0.decode_without_bom_handling_and_without_replacement(bytes) {
            Some(text) => Ok(text),
            None => Err(AnalysisError::Decode {
                encoding: self.name().to_string(),
                offset: first_malformed_offset(self.0, bytes),
            }),
        }
    }
}

impl Default for TextEncoding {
    fn default() -> Self {
        Self::windows_1251()
    }
}

fn strip_bom<'a>(encoding: &'static Encoding, bytes: &'a [u8]) -> &'a [u8] {
    match Encoding::for_bom(bytes) {
        Some((bom_encoding, len)) if bom_encoding == encoding => &bytes[len..],
        _ => bytes,
    }
}

/// Offset of the first byte the decoder rejects (best effort for reporting)
fn first_malformed_offset(encoding: &'static Encoding, bytes: &[u8]) -> usize {
    if encoding == encoding_rs::UTF_8 {
        return match std::str::from_utf8(bytes) {
            Ok(_) => bytes.len(),
            Err(e) => e.valid_up_to(),
        };
    }
    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut out = String::with_capacity(bytes.len() * 3);
    let (result, read) = decoder.decode_to_string_without_replacement(bytes, &mut out, true);
    match result {
        encoding_rs::DecoderResult::Malformed(bad, consumed_after) => {
            read.saturating_sub(bad as usize + consumed_after as usize)
        }
        _ => read,
    }
}

/// Parse absence data from raw bytes
///
/// Fails with `Decode` when the bytes are invalid under `encoding`, and with
/// `Parse` when a row does not have exactly three fields or a field value is
/// out of contract. No partial dataset is ever returned.
///
/// # Example
/// ```
/// use absentee::loader::{load_dataset, TextEncoding};
///
/// let csv = "days,age,sex\n3,40,М\n1,22,Ж\n";
/// let ds = load_dataset(csv.as_bytes(), TextEncoding::utf8()).unwrap();
/// assert_eq!(ds.len(), 2);
/// ```
pub fn load_dataset(bytes: &[u8], encoding: TextEncoding) -> Result<Dataset> {
    let text = encoding.decode(bytes)?;
    debug!(
        "Decoded {} bytes as {} ({} chars)",
        bytes.len(),
        encoding.name(),
        text.chars().count()
    );

    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader.headers().map_err(|e| csv_error(1, e))?;
    if headers.len() != COLUMN_COUNT {
        return Err(AnalysisError::parse(
            1,
            format!(
                "expected {} columns, found {} in header",
                COLUMN_COUNT,
                headers.len()
            ),
        ));
    }

    let mut records = Vec::new();
    for (index, row) in reader.records().enumerate() {
        // header is line 1
        let fallback_line = index as u64 + 2;
        let row = row.map_err(|e| csv_error(fallback_line, e))?;
        let line = row.position().map_or(fallback_line, |p| p.line());
        records.push(parse_row(&row, line)?);
    }

    debug!("Parsed {} absence records", records.len());
    Ok(Dataset::from_records(records))
}

/// Read a file from disk and parse it with [`load_dataset`]
pub fn load_file(path: &Path, encoding: TextEncoding) -> Result<Dataset> {
    let bytes = std::fs::read(path)?;
    load_dataset(&bytes, encoding)
}

fn csv_error(line: u64, err: csv::Error) -> AnalysisError {
    let line = err.position().map_or(line, |p| p.line());
    AnalysisError::parse(line, err.to_string())
}

fn parse_row(row: &csv::StringRecord, line: u64) -> Result<Record> {
    if row.len() != COLUMN_COUNT {
        return Err(AnalysisError::parse(
            line,
            format!("expected {} fields, found {}", COLUMN_COUNT, row.len()),
        ));
    }

    let work_days = parse_count(&row[0], "work_days", line)?;
    let age = parse_count(&row[1], "age", line)?;
    if age == 0 {
        return Err(AnalysisError::parse(line, "age must be positive, got 0"));
    }
    let sex = Sex::from_label(&row[2]).ok_or_else(|| {
        AnalysisError::parse(
            line,
            format!(
                "unrecognised sex label '{}' (expected 'Ж' or 'М')",
                &row[2]
            ),
        )
    })?;

    Ok(Record::new(work_days, age, sex))
}

fn parse_count(raw: &str, field: &str, line: u64) -> Result<u32> {
    raw.parse::<u32>().map_err(|_| {
        AnalysisError::parse(
            line,
            format!("{} must be a non-negative integer, got '{}'", field, raw),
        )
    })
}
