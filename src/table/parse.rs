use crate::error::{Error, Result};
use crate::table::row::{Number, RawRow, Row};
use csv::{ReaderBuilder, StringRecord, Trim};
use std::path::Path;

/// Number of fields every record must have: node, timestamp, value.
pub const COLUMNS: usize = 3;

/// Cells the measurement tooling writes for "no sample".
const MISSING_TOKENS: &[&str] = &["nan", "na", "null"];

/// Parse a raw run file. An empty (or NaN-like) value cell becomes `None`.
///
/// Expected records (headerless, comma-separated):
/// node_id,timestamp,value
///
/// Example:
/// validator-0-abc,1718000000,1523
/// validator-0-abc,1718000060,
pub fn read_raw(path: &Path) -> Result<Vec<RawRow>> {
    read_records(path, |record, line| {
        let (node, timestamp) = parse_key(path, line, record)?;
        let cell = &record[2];
        let value = if is_missing(cell) {
            None
        } else {
            Some(parse_number(path, line, "value", cell)?)
        };
        Ok(RawRow {
            node,
            timestamp,
            value,
        })
    })
}

/// Parse an already normalized run. Every value cell must be present.
pub fn read_table(path: &Path) -> Result<Vec<Row>> {
    read_records(path, |record, line| {
        let (node, timestamp) = parse_key(path, line, record)?;
        let cell = &record[2];
        if is_missing(cell) {
            return Err(malformed(path, line, "missing value"));
        }
        let value = parse_number(path, line, "value", cell)?;
        Ok(Row {
            node,
            timestamp,
            value,
        })
    })
}

fn read_records<T>(
    path: &Path,
    mut parse: impl FnMut(&StringRecord, u64) -> Result<T>,
) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(Trim::All)
        .from_path(path)?;

    let mut out = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        if record.len() != COLUMNS {
            return Err(malformed(
                path,
                line,
                format!("expected {} fields, found {}", COLUMNS, record.len()),
            ));
        }

        out.push(parse(&record, line)?);
    }

    Ok(out)
}

fn parse_key(path: &Path, line: u64, record: &StringRecord) -> Result<(String, Number)> {
    let node = &record[0];
    if node.is_empty() {
        return Err(malformed(path, line, "empty node id"));
    }
    let timestamp = parse_number(path, line, "timestamp", &record[1])?;
    Ok((node.to_string(), timestamp))
}

fn parse_number(path: &Path, line: u64, field: &str, cell: &str) -> Result<Number> {
    let n: Number = cell
        .parse()
        .map_err(|_| malformed(path, line, format!("{} is not a number: {:?}", field, cell)))?;
    if !n.is_finite() {
        return Err(malformed(
            path,
            line,
            format!("{} is not finite: {:?}", field, cell),
        ));
    }
    Ok(n)
}

fn is_missing(cell: &str) -> bool {
    cell.is_empty() || MISSING_TOKENS.iter().any(|t| cell.eq_ignore_ascii_case(t))
}

fn malformed(path: &Path, line: u64, reason: impl Into<String>) -> Error {
    Error::MalformedInput {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}
