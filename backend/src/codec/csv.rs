//! Line-based CSV parsing and always-quoted CSV writing.
//!
//! Parsing splits the input on line breaks, so quoted fields spanning several
//! lines are not supported. Writing quotes every field, which makes
//! `parse(write(table)) == table` for any table without line breaks in cells
//! and without surrounding whitespace in cells.

use crate::error::StoreError;
use common::model::csv::CsvTable;
use common::model::job::CsvJob;
use csv::{QuoteStyle, Terminator, WriterBuilder};

/// Name of the column appended by [`write_with_flags`].
pub const FLAG_COLUMN: &str = "intern_flag";

/// Parses CSV text into a header line and data rows.
///
/// Fails only when the input holds nothing but whitespace.
pub fn parse(text: &str) -> Result<CsvTable, StoreError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(StoreError::CsvParse("the file is empty".to_string()));
    }

    let mut lines = text.lines();
    let headers = lines.next().map(parse_line).unwrap_or_default();
    let rows = lines.map(parse_line).collect();
    Ok(CsvTable::new(headers, rows))
}

/// Splits one CSV line into trimmed fields.
///
/// A quote toggles quoted mode, `""` inside quotes is a literal quote and a
/// comma only separates fields outside quotes.
pub fn parse_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                current.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }

    fields.push(current.trim().to_string());
    fields
}

/// Writes `headers` then `rows`, every field quoted, lines joined by `\n`.
pub fn write(headers: &[String], rows: &[Vec<String>]) -> Result<String, StoreError> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .flexible(true)
        .from_writer(Vec::new());

    writer.write_record(headers)?;
    for row in rows {
        writer.write_record(row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| StoreError::CsvWrite(e.to_string()))?;
    let mut text = String::from_utf8(bytes).map_err(|e| StoreError::CsvWrite(e.to_string()))?;
    if text.ends_with('\n') {
        text.pop();
    }
    Ok(text)
}

/// Writes the job's rows with an extra `intern_flag` column holding each
/// row's flag value, or an empty string for unreviewed rows.
pub fn write_with_flags(job: &CsvJob) -> Result<String, StoreError> {
    let mut headers = job.headers.clone();
    headers.push(FLAG_COLUMN.to_string());

    let rows: Vec<Vec<String>> = job
        .data
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let mut row = row.clone();
            row.push(job.flags.get(&idx).map(ToString::to_string).unwrap_or_default());
            row
        })
        .collect();

    write(&headers, &rows)
}
