//! CLI command implementations.

use clap::Args;
use colored::Colorize;
use connections_graph::{Connections, OutputFormat, SearchOptions};
use connections_loader::{load_rows, RowSource};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

/// Options file picked up from the working directory when `--options` is absent.
const DEFAULT_OPTIONS_FILE: &str = ".connections/options.json";

/// Search flags shared by path queries.
#[derive(Args, Debug, Default)]
pub struct SearchArgs {
    /// Maximum number of paths to return (default: 100)
    #[arg(short = 'n', long)]
    pub max_results: Option<usize>,

    /// Maximum path length (default: 5)
    #[arg(short = 'l', long)]
    pub max_path_length: Option<usize>,

    /// Allow a node to appear more than once on a path
    #[arg(long)]
    pub allow_revisit: bool,

    /// Allow a path to step straight back to the previous node
    #[arg(long)]
    pub allow_backtrack: bool,

    /// Print each path as a comma-joined string
    #[arg(long)]
    pub joined: bool,

    /// Number of paths expanded at once (default: 500)
    #[arg(short, long)]
    pub concurrency: Option<usize>,

    /// Abort when more than this many paths are waiting for expansion
    #[arg(long)]
    pub max_pending: Option<usize>,

    /// JSON file with search options
    #[arg(long)]
    pub options: Option<PathBuf>,
}

impl SearchArgs {
    /// Builds search options: the options file first, then explicit flags.
    pub fn to_options(&self) -> Result<SearchOptions> {
        let file = match &self.options {
            Some(path) => Some(path.clone()),
            None => Some(PathBuf::from(DEFAULT_OPTIONS_FILE)).filter(|p| p.exists()),
        };

        let base = match file {
            Some(path) => read_options(&path)?,
            None => SearchOptions::default(),
        };

        Ok(self.apply(base))
    }

    fn apply(&self, mut options: SearchOptions) -> SearchOptions {
        if let Some(n) = self.max_results {
            options.max_results = n;
        }
        if let Some(n) = self.max_path_length {
            options.max_path_length = n;
        }
        if self.allow_revisit {
            options.allow_revisit = true;
        }
        if self.allow_backtrack {
            options.allow_backtrack = true;
        }
        if self.joined {
            options.output_format = OutputFormat::JoinedString;
        }
        if let Some(n) = self.concurrency {
            options.concurrency_width = n;
        }
        if let Some(n) = self.max_pending {
            options.max_pending_tasks = Some(n);
        }
        options
    }
}

fn read_options(path: &Path) -> Result<SearchOptions> {
    let text = fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    debug!("Read search options from {}", path.display());
    Ok(SearchOptions::from_value(&value))
}

/// Loads rows from `data` and builds the graph.
async fn load(data: &str, has_header: bool) -> Result<Connections> {
    let source = RowSource::parse(data)?;
    let rows = load_rows(&source).await?;

    let connections = Connections::new();
    connections.build_graph(&rows, has_header).await?;
    Ok(connections)
}

/// List the direct neighbors of a node.
pub async fn neighbors(data: &str, has_header: bool, node: &str) -> Result<()> {
    let connections = load(data, has_header).await?;
    let neighbors = connections.neighbors(node).await?;

    println!(
        "{} has {} neighbors:\n",
        node.cyan(),
        neighbors.len().to_string().cyan()
    );
    for neighbor in neighbors {
        println!("  {}", neighbor);
    }

    Ok(())
}

/// Check whether two nodes are connected.
pub async fn connected(
    data: &str,
    has_header: bool,
    from: &str,
    to: &str,
    max_path_length: Option<usize>,
) -> Result<()> {
    let connections = load(data, has_header).await?;
    let mut options = SearchOptions::default();
    if let Some(n) = max_path_length {
        options.max_path_length = n;
    }

    if connections.are_connected(from, to, &options).await? {
        println!("{} {} and {} are connected", "✓".green(), from.cyan(), to.cyan());
    } else {
        println!(
            "{} no path from {} to {} within {} nodes",
            "✗".red(),
            from.cyan(),
            to.cyan(),
            options.max_path_length
        );
    }

    Ok(())
}

/// Find paths between two nodes.
pub async fn paths(
    data: &str,
    has_header: bool,
    from: &str,
    to: &str,
    args: &SearchArgs,
    json: bool,
) -> Result<()> {
    let options = args.to_options()?;
    let connections = load(data, has_header).await?;

    let report = match connections.search(from, to, &options).await {
        Ok(report) => report,
        Err(e) => {
            let partial = e.partial_paths();
            if !partial.is_empty() {
                eprintln!(
                    "{} {} path(s) found before the search failed:",
                    "⚠".yellow(),
                    partial.len()
                );
                for path in partial {
                    eprintln!("  {}", path);
                }
            }
            return Err(e.into());
        }
    };

    if json {
        let output = serde_json::json!({
            "from": from,
            "to": to,
            "paths": report.paths,
            "stop": report.stop,
            "tasksExpanded": report.tasks_expanded,
            "queryTime": report.query_time_ms
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    if report.paths.is_empty() {
        println!("No paths found from \"{}\" to \"{}\"", from, to);
    } else {
        println!("Found {} paths:\n", report.paths.len());
        for path in &report.paths {
            let hops = format!("({} nodes)", path.node_count());
            println!("  {} {}", path, hops.dimmed());
        }
    }

    println!(
        "\n{}",
        format!(
            "{} after {} expansions in {}ms",
            report.stop, report.tasks_expanded, report.query_time_ms
        )
        .dimmed()
    );

    Ok(())
}

/// Show graph statistics.
pub async fn stats(data: &str, has_header: bool) -> Result<()> {
    let connections = load(data, has_header).await?;
    let stats = connections.stats().await;

    println!("{}", "Graph".cyan().bold());
    println!("  Nodes:       {}", stats.node_count);
    println!("  Connections: {}", stats.edge_count);

    Ok(())
}
