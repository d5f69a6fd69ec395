//! Headerless 3-column run tables: node, timestamp, value.
//!
//! Row order is significant. Averaging matches rows across runs by position,
//! so nothing here ever sorts or deduplicates.

pub mod parse;
pub mod row;
pub mod write;

pub use parse::{read_raw, read_table};
pub use row::{Number, RawRow, Row};
pub use write::write_table;

use crate::error::{Error, Result};
use std::path::Path;

/// Fail with `MissingFile` unless `path` is an existing file.
pub fn ensure_exists(path: &Path) -> Result<()> {
    if path.is_file() {
        Ok(())
    } else {
        Err(Error::MissingFile(path.to_path_buf()))
    }
}
