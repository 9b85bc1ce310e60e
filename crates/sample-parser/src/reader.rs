//! Line-oriented sample reader.

use std::borrow::Cow;
use std::path::Path;

use field_common::{FieldError, FieldResult, Sample, SampleSet};
use serde::Serialize;
use tracing::{debug, info};

use crate::options::{DecimalSeparator, ParseOptions, RowPolicy};

/// Number of fields in an accepted row: x, y, temperature.
const FIELDS_PER_ROW: usize = 3;

/// Counts gathered while reading a sample file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseReport {
    pub total_lines: usize,
    pub accepted_rows: usize,
    pub skipped_rows: usize,
}

/// Parse a single numeric token, normalizing the decimal separator first.
pub fn parse_number(token: &str, separator: DecimalSeparator) -> Option<f64> {
    let normalized: Cow<'_, str> = match separator {
        DecimalSeparator::Comma if token.contains(',') => Cow::Owned(token.replace(',', ".")),
        _ => Cow::Borrowed(token),
    };
    normalized.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse sample text already loaded into memory.
pub fn parse_samples(text: &str, options: &ParseOptions) -> FieldResult<SampleSet> {
    parse_with_report(text, options).map(|(samples, _)| samples)
}

/// Read and parse a sample file.
pub fn read_samples(path: impl AsRef<Path>, options: &ParseOptions) -> FieldResult<SampleSet> {
    read_samples_with_report(path, options).map(|(samples, _)| samples)
}

/// Read and parse a sample file, also returning line counts.
pub fn read_samples_with_report(
    path: impl AsRef<Path>,
    options: &ParseOptions,
) -> FieldResult<(SampleSet, ParseReport)> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path).map_err(|e| FieldError::io(path, e))?;

    let (samples, report) = parse_with_report(&text, options)?;
    info!(
        path = %path.display(),
        samples = report.accepted_rows,
        skipped = report.skipped_rows,
        separator = %options.decimal_separator,
        "Parsed sample file"
    );
    Ok((samples, report))
}

fn parse_with_report(text: &str, options: &ParseOptions) -> FieldResult<(SampleSet, ParseReport)> {
    // Files exported on Windows may start with a byte order mark.
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);

    let mut report = ParseReport::default();
    let mut samples = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        let line_no = idx + 1;
        report.total_lines += 1;

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() != FIELDS_PER_ROW {
            match options.row_policy {
                RowPolicy::Strict if !tokens.is_empty() => {
                    return Err(FieldError::MalformedRow {
                        line: line_no,
                        tokens: tokens.len(),
                    });
                }
                RowPolicy::Strict => {}
                RowPolicy::Lenient => {
                    debug!(line = line_no, tokens = tokens.len(), "Skipping malformed row");
                    report.skipped_rows += 1;
                }
            }
            continue;
        }

        let mut fields = [0.0f64; FIELDS_PER_ROW];
        for (column, (slot, token)) in fields.iter_mut().zip(&tokens).enumerate() {
            *slot = parse_number(token, options.decimal_separator).ok_or_else(|| {
                FieldError::InvalidNumber {
                    line: line_no,
                    column: column + 1,
                    token: (*token).to_string(),
                }
            })?;
        }

        let [x, y, temperature] = fields;
        samples.push(Sample::new(x, y, temperature));
        report.accepted_rows += 1;
    }

    Ok((SampleSet::new(samples), report))
}
