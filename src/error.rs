use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// Key columns (node, timestamp) of an input disagree with the first input.
    /// `index` and `row` are 1-based.
    #[error(
        "input #{index}{} does not match input #1 at row {row}: {detail}",
        .path.as_ref().map(|p| format!(" ({})", p.display())).unwrap_or_default()
    )]
    SchemaMismatch {
        index: usize,
        path: Option<PathBuf>,
        row: usize,
        detail: String,
    },

    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    #[error("malformed input at {}:{line}: {reason}", .path.display())]
    MalformedInput {
        path: PathBuf,
        line: u64,
        reason: String,
    },

    #[error("no input files given")]
    NoInputs,

    #[error("output file {} is also one of the inputs", .0.display())]
    OutputIsInput(PathBuf),

    #[error("git {command} failed: {reason}")]
    Git { command: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
