//! CSV record parser
//!
//! Turns the uploaded CSV into a fully materialized, ordered list of
//! [`RawRow`]s before any row is dispatched, so the row count and positions
//! are known up front.

use csv::{ReaderBuilder, Trim};
use std::collections::HashMap;

use super::error::ParseError;
use super::models::RawRow;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Parse CSV bytes into rows keyed by header name.
///
/// The first record is the header. Data rows are numbered from 1 in file
/// order. Short rows leave trailing fields absent and extra cells are ignored.
/// Empty lines are not records; a line of empty cells such as `,,` is a row.
pub fn parse_rows(input: &[u8]) -> Result<Vec<RawRow>, ParseError> {
    let input = input.strip_prefix(UTF8_BOM).unwrap_or(input);

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::Headers)
        .from_reader(input);

    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();

    for record in reader.records() {
        let record = record?;

        let fields: HashMap<String, String> = headers
            .iter()
            .zip(record.iter())
            .filter(|(name, _)| !name.is_empty())
            .map(|(name, value)| (name.to_string(), value.to_string()))
            .collect();

        rows.push(RawRow::new(rows.len() + 1, fields));
    }

    tracing::debug!(rows = rows.len(), columns = headers.len(), "Parsed CSV batch");

    Ok(rows)
}
