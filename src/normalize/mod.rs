//! Normalization of a single raw run.
//!
//! - node ids become `Node{i} ({prefix})` labels, numbered by first occurrence
//! - timestamps become minutes since the earliest timestamp in the file
//! - rows without a value are dropped
//! - values are converted to integers according to the metric kind

pub mod names;

pub use names::NodeNames;

use crate::error::Result;
use crate::table::{self, Number, RawRow, Row};
use clap::ValueEnum;
use serde::Serialize;
use std::path::Path;
use tracing::{info, warn};

/// What the value column of a raw run measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MetricKind {
    /// Transaction count per bucket.
    Throughput,
    /// Block time in seconds, written out in milliseconds.
    BlockTime,
}

impl MetricKind {
    /// Convert a raw value to its output unit. Fractions are truncated.
    pub fn convert(self, value: f64) -> i64 {
        match self {
            MetricKind::Throughput => value as i64,
            MetricKind::BlockTime => (value * 1000.0) as i64,
        }
    }

    pub fn column_name(self) -> &'static str {
        match self {
            MetricKind::Throughput => "throughput",
            MetricKind::BlockTime => "latency",
        }
    }
}

/// Row counts around the missing-value drop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct NormalizeStats {
    pub initial_rows: usize,
    pub missing_values: usize,
    pub remaining_rows: usize,
}

/// Normalize one raw run in memory.
pub fn normalize(rows: Vec<RawRow>, kind: MetricKind) -> (Vec<Row>, NormalizeStats) {
    let timestamps: Vec<Number> = rows.iter().map(|r| r.timestamp).collect();
    let minutes = rebase_timestamps(&timestamps);

    // Labels come from every row, including ones dropped below, so a node
    // that only ever reports missing values still takes its number.
    let names = NodeNames::from_rows(&rows);
    let initial_rows = rows.len();
    let mut out = Vec::with_capacity(initial_rows);

    for (RawRow { node, value, .. }, minutes) in rows.into_iter().zip(minutes) {
        let (Some(label), Some(value)) = (names.label(&node), value) else {
            continue;
        };
        out.push(Row {
            node: label.to_string(),
            timestamp: Number::Float(minutes),
            value: Number::Int(kind.convert(value.as_f64())),
        });
    }

    let stats = NormalizeStats {
        initial_rows,
        missing_values: initial_rows - out.len(),
        remaining_rows: out.len(),
    };
    (out, stats)
}

/// Normalize the raw run at `path` and overwrite it with the result.
pub fn normalize_file(path: &Path, kind: MetricKind) -> Result<NormalizeStats> {
    let raw = table::read_raw(path)?;
    if raw.is_empty() {
        warn!(path = %path.display(), "run file has no rows");
    }

    let (rows, stats) = normalize(raw, kind);
    info!(rows = stats.initial_rows, "initial rows");
    info!(
        column = kind.column_name(),
        missing = stats.missing_values,
        "missing values"
    );
    info!(rows = stats.remaining_rows, "rows after cleaning");

    table::write_table(path, &rows)?;
    info!(path = %path.display(), "reformatted and overwritten");
    Ok(stats)
}

/// Rebase every timestamp to minutes since the earliest one.
pub fn rebase_timestamps(timestamps: &[Number]) -> Vec<f64> {
    let Some(start) = timestamps
        .iter()
        .copied()
        .min_by(|a, b| a.as_f64().total_cmp(&b.as_f64()))
    else {
        return Vec::new();
    };
    timestamps.iter().map(|&t| minutes_since(t, start)).collect()
}

/// Seconds between `start` and `t`, in minutes.
fn minutes_since(t: Number, start: Number) -> f64 {
    let seconds = match (t, start) {
        (Number::Int(t), Number::Int(s)) => t
            .checked_sub(s)
            .map_or_else(|| t as f64 - s as f64, |d| d as f64),
        _ => t.as_f64() - start.as_f64(),
    };
    seconds / 60.0
}
