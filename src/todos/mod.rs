//! TODO / FIXME report for the Rust sources of a repository.

pub mod git;
pub mod render;

pub use git::GitInfo;
pub use render::{render_json, render_markdown};

use crate::error::Result;
use regex::Regex;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;
use walkdir::WalkDir;

const MARKER_RE: &str = r"(?i)\b(TODO|FIXME)\b";
const SOURCE_EXT: &str = "rs";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TodoKind {
    Todo,
    Fixme,
}

impl TodoKind {
    /// A line counts as a TODO whenever it mentions one, even next to a FIXME.
    fn of_line(line: &str) -> Self {
        if line.to_uppercase().contains("TODO") {
            TodoKind::Todo
        } else {
            TodoKind::Fixme
        }
    }
}

impl fmt::Display for TodoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TodoKind::Todo => f.write_str("TODO"),
            TodoKind::Fixme => f.write_str("FIXME"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TodoItem {
    /// Path relative to the scanned root, `/`-separated.
    pub file: String,
    pub line_num: usize,
    pub content: String,
    pub kind: TodoKind,
}

/// Collect TODO and FIXME lines from every `.rs` file under `root`.
///
/// `.git` directories and files that are not UTF-8 are skipped. Items come
/// back sorted by file, then line.
pub fn find_todos(root: &Path) -> Result<Vec<TodoItem>> {
    let marker = Regex::new(MARKER_RE)?;
    let mut out = Vec::new();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.file_name() != ".git");
    for entry in walker {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|ext| ext == SOURCE_EXT) {
            scan_file(root, path, &marker, &mut out)?;
        }
    }

    out.sort_by(|a, b| a.file.cmp(&b.file).then(a.line_num.cmp(&b.line_num)));
    Ok(out)
}

fn scan_file(root: &Path, path: &Path, marker: &Regex, out: &mut Vec<TodoItem>) -> Result<()> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::InvalidData => {
            debug!(path = %path.display(), "skipping non-UTF-8 file");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let file = relative_name(root, path);
    for (lineno, line) in text.lines().enumerate() {
        if marker.is_match(line) {
            out.push(TodoItem {
                file: file.clone(),
                line_num: lineno + 1,
                content: line.trim().to_string(),
                kind: TodoKind::of_line(line),
            });
        }
    }
    Ok(())
}

fn relative_name(root: &Path, path: &Path) -> String {
    let rel = path.strip_prefix(root).unwrap_or(path);
    rel.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
