use crate::error::Result;
use crate::table::row::Row;
use csv::{Terminator, WriterBuilder};
use std::fs;
use std::path::Path;

/// Render rows as headerless CSV, one `\n`-terminated record per row.
pub fn to_csv_string(rows: &[Row]) -> Result<String> {
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for row in rows {
        let timestamp = row.timestamp.to_string();
        let value = row.value.to_string();
        writer.write_record([row.node.as_str(), timestamp.as_str(), value.as_str()])?;
    }

    let bytes = writer.into_inner().map_err(|e| e.into_error())?;
    // Every field came from a `String` or a number.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write the whole table at once. Nothing touches `path` until the
/// table has been fully rendered.
pub fn write_table(path: &Path, rows: &[Row]) -> Result<()> {
    let text = to_csv_string(rows)?;
    fs::write(path, text)?;
    Ok(())
}
