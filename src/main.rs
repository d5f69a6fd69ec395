use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use qa_results::normalize::MetricKind;
use qa_results::{average, normalize, table, todos};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "qa-results")]
#[command(about = "Normalize and average QA benchmark runs", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reformat a raw throughput or block-time CSV file in place.
    Normalize {
        /// Raw run file (node,timestamp,value without header).
        input: PathBuf,

        #[arg(long = "type", value_enum)]
        kind: MetricKind,

        /// Also write the row counts as JSON to this path.
        #[arg(long)]
        stats: Option<PathBuf>,
    },

    /// Average normalized runs of the same experiment into one file.
    Average {
        #[arg(required = true)]
        inputs: Vec<PathBuf>,

        #[arg(short = 'o', long)]
        out: PathBuf,
    },

    /// Collect TODO and FIXME comments into a report.
    Todos {
        /// Directory to scan. Defaults to the enclosing git repository.
        #[arg(long)]
        root: Option<PathBuf>,

        /// Defaults to TODO.md (or TODO.json) in the scanned directory.
        #[arg(short = 'o', long)]
        out: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Markdown)]
        format: ReportFormat,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ReportFormat {
    Markdown,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "qa_results=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.cmd {
        Commands::Normalize { input, kind, stats } => {
            table::ensure_exists(&input)?;
            let counts = normalize::normalize_file(&input, kind)
                .with_context(|| format!("normalize {}", input.display()))?;

            if let Some(path) = stats {
                std::fs::write(&path, serde_json::to_string_pretty(&counts)?)
                    .with_context(|| format!("write stats file {}", path.display()))?;
            }
        }

        Commands::Average { inputs, out } => {
            // Check every path before reading any of them.
            for input in &inputs {
                table::ensure_exists(input)?;
            }
            average::average_files(&inputs, &out)
                .with_context(|| format!("average {} runs into {}", inputs.len(), out.display()))?;
        }

        Commands::Todos { root, out, format } => {
            let root = match root {
                Some(root) => root,
                None => todos::git::repo_root(&std::env::current_dir()?)?,
            };
            let git = todos::GitInfo::discover(&root)?;
            let items = todos::find_todos(&root)
                .with_context(|| format!("scan {}", root.display()))?;

            let (text, default_name) = match format {
                ReportFormat::Markdown => (
                    todos::render_markdown(&items, &git, chrono::Local::now().naive_local()),
                    "TODO.md",
                ),
                ReportFormat::Json => (todos::render_json(&items)?, "TODO.json"),
            };
            let out = out.unwrap_or_else(|| root.join(default_name));
            std::fs::write(&out, text).with_context(|| format!("write {}", out.display()))?;

            info!(items = items.len(), path = %out.display(), "wrote report");
            info!(commit = git.short_commit(), "current commit");
        }
    }

    Ok(())
}
