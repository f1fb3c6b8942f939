//! CSV extraction: one output line per input row, fields joined by `" | "`.

use super::{decode_lossy, Extractor};
use docquery_core::{Error, Result};

pub const FIELD_SEPARATOR: &str = " | ";

/// Flattens comma-separated rows into readable lines.
///
/// Each input line is parsed on its own, so quoted fields spanning lines are
/// split. Lines end at `\n`, `\r\n` or a bare `\r`. A blank input line yields a
/// blank output line.
#[derive(Debug, Default, Clone, Copy)]
pub struct CsvExtractor;

impl CsvExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for CsvExtractor {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn content_types(&self) -> &[&'static str] {
        &["text/csv", "application/csv"]
    }

    fn extensions(&self) -> &[&'static str] {
        &["csv"]
    }

    fn extract(&self, bytes: &[u8]) -> Result<String> {
        let decoded = decode_lossy(bytes);
        let rows = split_lines(&decoded)
            .into_iter()
            .map(parse_row)
            .collect::<Result<Vec<String>>>()?;
        Ok(rows.join("\n"))
    }
}

/// Lines ended by `\n`, `\r\n` or `\r`. A trailing terminator does not add an
/// empty final line.
fn split_lines(text: &str) -> Vec<&str> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                i += 1;
                start = i;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                i += if bytes.get(i + 1) == Some(&b'\n') { 2 } else { 1 };
                start = i;
            }
            _ => i += 1,
        }
    }
    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}

fn parse_row(line: &str) -> Result<String> {
    if line.is_empty() {
        return Ok(String::new());
    }

    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());

    match reader.records().next() {
        Some(record) => {
            let record = record.map_err(|e| Error::Parse(format!("Invalid CSV row: {}", e)))?;
            Ok(record.iter().collect::<Vec<_>>().join(FIELD_SEPARATOR))
        }
        None => Ok(String::new()),
    }
}
