//! Connections Graph - undirected connection graph and path search
//!
//! This crate builds an undirected graph from pairs of related identifiers
//! and answers reachability questions over it: direct neighbors, whether
//! two nodes are connected, and which bounded paths join them.
//!
//! # Architecture
//!
//! - `GraphBuilder` validates row data and produces a `ConnectionGraph`
//! - `ConnectionGraph` is the read-only adjacency store
//! - `search_paths` runs the bounded, concurrency-limited traversal
//! - `Connections` ties them together behind a shared, lockable handle
//!
//! # Example
//!
//! ```no_run
//! use connections_graph::{Connections, SearchOptions};
//! use serde_json::json;
//!
//! # async fn run() -> connections_graph::Result<()> {
//! let connections = Connections::new();
//! connections
//!     .build_graph(&json!([["A", "B"], ["B", "C"], ["A", "C"]]), false)
//!     .await?;
//!
//! let options = SearchOptions::default().with_max_path_length(2);
//! let paths = connections.find_paths("A", "C", &options).await?;
//! # Ok(())
//! # }
//! ```

mod builder;
mod connections;
mod error;
mod graph;
mod options;
mod path;
mod search;

pub use builder::GraphBuilder;
pub use connections::Connections;
pub use error::{ConnectionsError, Result};
pub use graph::{ConnectionGraph, GraphStats};
pub use options::{
    SearchConfig, SearchOptions, DEFAULT_CONCURRENCY_WIDTH, DEFAULT_MAX_PATH_LENGTH,
    DEFAULT_MAX_RESULTS,
};
pub use path::{OutputFormat, PathResult, JOIN_SEPARATOR};
pub use search::{search_paths, GraphSnapshot, SearchReport, StopReason};
