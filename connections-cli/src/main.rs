//! Connections CLI - Command-line interface for Connections
//!
//! Loads connection rows from a CSV file or URL, builds the graph and
//! answers neighbor, reachability and path queries against it.

use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "connections")]
#[command(author = "Connections Contributors")]
#[command(version)]
#[command(about = "Reachability and path queries over connection pairs", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Treat the first row of the data as a header
    #[arg(long, global = true)]
    header: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the direct neighbors of a node
    Neighbors {
        /// CSV file or URL with connection rows
        data: String,

        /// The node to look up
        node: String,
    },

    /// Check whether two nodes are connected
    Connected {
        /// CSV file or URL with connection rows
        data: String,

        from: String,

        to: String,

        /// Maximum path length to search (default: 5)
        #[arg(short = 'l', long)]
        max_path_length: Option<usize>,
    },

    /// Find paths between two nodes
    Paths {
        /// CSV file or URL with connection rows
        data: String,

        from: String,

        to: String,

        #[command(flatten)]
        search: commands::SearchArgs,

        /// Output as JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Show graph statistics
    Stats {
        /// CSV file or URL with connection rows
        data: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(tracing_subscriber::EnvFilter::new(filter))
        .init();

    let result = match cli.command {
        Commands::Neighbors { data, node } => commands::neighbors(&data, cli.header, &node).await,
        Commands::Connected {
            data,
            from,
            to,
            max_path_length,
        } => commands::connected(&data, cli.header, &from, &to, max_path_length).await,
        Commands::Paths {
            data,
            from,
            to,
            search,
            json,
        } => commands::paths(&data, cli.header, &from, &to, &search, json).await,
        Commands::Stats { data } => commands::stats(&data, cli.header).await,
    };

    if let Err(e) = result {
        eprintln!("{} {}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}
