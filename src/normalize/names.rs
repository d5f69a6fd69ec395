use crate::table::RawRow;
use std::collections::HashMap;

/// Raw node id to canonical label, numbered in first-occurrence order.
///
/// Built fresh for every file: the same raw id may get a different number in
/// another run if nodes appear in a different order there.
#[derive(Debug, Default)]
pub struct NodeNames {
    labels: HashMap<String, String>,
}

impl NodeNames {
    pub fn from_rows(rows: &[RawRow]) -> Self {
        let mut names = Self::default();
        for row in rows {
            names.assign(&row.node);
        }
        names
    }

    /// Give `raw` the next number unless it already has one.
    fn assign(&mut self, raw: &str) {
        let next = self.labels.len() + 1;
        self.labels
            .entry(raw.to_string())
            .or_insert_with(|| format!("Node{} ({})", next, node_prefix(raw)));
    }

    pub fn label(&self, raw: &str) -> Option<&str> {
        self.labels.get(raw).map(String::as_str)
    }
}

/// Text before the first `-`, or the whole id.
fn node_prefix(raw: &str) -> &str {
    raw.split_once('-').map_or(raw, |(prefix, _)| prefix)
}
