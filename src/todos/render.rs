use crate::error::Result;
use crate::todos::{GitInfo, TodoItem, TodoKind};
use chrono::NaiveDateTime;

/// Render the markdown report: FIXMEs first, then TODOs, each linking to the
/// exact line at the scanned commit.
pub fn render_markdown(items: &[TodoItem], git: &GitInfo, generated_at: NaiveDateTime) -> String {
    let mut md = String::from("# TODOs and FIXMEs\n\n");
    md.push_str(&format!(
        "Generated on: {}\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    md.push_str(&format!(
        "Commit: [{}]({}/commit/{})\n\n",
        git.short_commit(),
        git.remote_url,
        git.commit
    ));

    if items.is_empty() {
        md.push_str("No TODO or FIXME items found.\n");
        return md;
    }

    for (kind, title) in [(TodoKind::Fixme, "FIXMEs"), (TodoKind::Todo, "TODOs")] {
        let mut section = items.iter().filter(|i| i.kind == kind).peekable();
        if section.peek().is_none() {
            continue;
        }
        md.push_str(&format!("## {title}\n\n"));
        for item in section {
            md.push_str(&format!(
                "- [{file}:{line}]({remote}/blob/{commit}/{file}#L{line})\n",
                file = item.file,
                line = item.line_num,
                remote = git.remote_url,
                commit = git.commit,
            ));
            md.push_str(&format!("  ```\n  {}\n  ```\n\n", item.content));
        }
    }

    md
}

pub fn render_json(items: &[TodoItem]) -> Result<String> {
    Ok(serde_json::to_string_pretty(items)?)
}
