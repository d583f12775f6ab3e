//! Shared handle over one connection graph.
//!
//! `Connections` owns its graph behind an async read-write lock. Queries
//! hold read access for as long as they run; a rebuild needs exclusive
//! access and is rejected rather than queued while any query is active.

use crate::builder::GraphBuilder;
use crate::error::{ConnectionsError, Result};
use crate::graph::{ConnectionGraph, GraphStats};
use crate::options::SearchOptions;
use crate::path::PathResult;
use crate::search::{search_paths, SearchReport};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Shared graph state. Only this module takes the write lock.
type SharedGraph = Arc<RwLock<ConnectionGraph>>;

/// An independent connection graph and the queries over it.
///
/// Cloning the handle shares the same graph.
#[derive(Debug, Clone, Default)]
pub struct Connections {
    graph: SharedGraph,
}

impl Connections {
    /// Creates a handle over an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a handle over a graph produced by [`GraphBuilder`].
    pub fn from_graph(graph: ConnectionGraph) -> Self {
        Self {
            graph: Arc::new(RwLock::new(graph)),
        }
    }

    /// Validates `rows` and replaces the graph with one built from them.
    ///
    /// On a validation error the current graph is kept. Fails with
    /// [`ConnectionsError::GraphBusy`] while any query holds the graph.
    pub async fn build_graph(&self, rows: &Value, has_header: bool) -> Result<GraphStats> {
        let graph = GraphBuilder::from_rows(rows, has_header)?;
        self.replace(graph)
    }

    /// Swaps in a freshly built graph.
    fn replace(&self, graph: ConnectionGraph) -> Result<GraphStats> {
        let mut current = self.graph.try_write().map_err(|_| {
            warn!("Rebuild rejected: graph is in use");
            ConnectionsError::GraphBusy
        })?;

        let stats = graph.stats();
        *current = graph;
        info!(
            "Graph ready: {} nodes, {} connections",
            stats.node_count, stats.edge_count
        );
        Ok(stats)
    }

    /// Returns the direct neighbors of `node`.
    pub async fn neighbors(&self, node: &str) -> Result<Vec<String>> {
        let graph = self.graph.read().await;
        graph.neighbors(node).map(<[String]>::to_vec)
    }

    /// Returns whether at least one path joins `source` and `destination`.
    ///
    /// Looks for a single path without revisiting or backtracking; the
    /// remaining options apply as given.
    pub async fn are_connected(
        &self,
        source: &str,
        destination: &str,
        options: &SearchOptions,
    ) -> Result<bool> {
        let options = options
            .clone()
            .with_max_results(1)
            .with_backtrack(false)
            .with_revisit(false);

        let paths = self.find_paths(source, destination, &options).await?;
        debug!("{} -> {} connected: {}", source, destination, !paths.is_empty());
        Ok(!paths.is_empty())
    }

    /// Finds paths from `source` to `destination`.
    pub async fn find_paths(
        &self,
        source: &str,
        destination: &str,
        options: &SearchOptions,
    ) -> Result<Vec<PathResult>> {
        let report = self.search(source, destination, options).await?;
        Ok(report.paths)
    }

    /// Finds paths and reports how the search ended.
    pub async fn search(
        &self,
        source: &str,
        destination: &str,
        options: &SearchOptions,
    ) -> Result<SearchReport> {
        let snapshot = Arc::new(self.graph.clone().read_owned().await);
        search_paths(snapshot, source, destination, options.resolve()).await
    }

    /// Returns graph statistics.
    pub async fn stats(&self) -> GraphStats {
        self.graph.read().await.stats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn triangle() -> Connections {
        let connections = Connections::new();
        connections
            .build_graph(&json!([["A", "B"], ["B", "C"], ["A", "C"]]), false)
            .await
            .unwrap();
        connections
    }

    #[tokio::test]
    async fn test_neighbors() {
        let connections = triangle().await;

        let mut neighbors = connections.neighbors("A").await.unwrap();
        neighbors.sort();
        assert_eq!(neighbors, vec!["B", "C"]);

        let err = connections.neighbors("Q").await.unwrap_err();
        assert!(matches!(err, ConnectionsError::UnknownNode(_)));
    }

    #[tokio::test]
    async fn test_find_paths_includes_direct_path() {
        let connections = triangle().await;
        let options = SearchOptions::default().with_max_path_length(2);

        let paths = connections.find_paths("A", "C", &options).await.unwrap();

        let direct = PathResult::Sequence(vec!["A".to_string(), "C".to_string()]);
        assert!(paths.contains(&direct));
    }

    #[tokio::test]
    async fn test_are_connected() {
        let connections = Connections::new();
        connections
            .build_graph(&json!([["A", "B"], ["C", "D"]]), false)
            .await
            .unwrap();
        let options = SearchOptions::default();

        assert!(connections.are_connected("A", "B", &options).await.unwrap());
        assert!(!connections.are_connected("A", "D", &options).await.unwrap());
        assert!(connections.are_connected("Z", "A", &options).await.is_err());
    }

    #[tokio::test]
    async fn test_are_connected_ignores_revisit_and_result_options() {
        let connections = triangle().await;
        let options = SearchOptions::default()
            .with_max_results(0)
            .with_revisit(true)
            .with_backtrack(true);

        assert!(connections.are_connected("A", "C", &options).await.unwrap());
    }

    #[tokio::test]
    async fn test_failed_rebuild_keeps_graph() {
        let connections = triangle().await;

        let err = connections
            .build_graph(&json!([["A", "B"], ["A", 5]]), false)
            .await
            .unwrap_err();

        assert!(matches!(err, ConnectionsError::FieldNotString { row: 1, .. }));
        assert_eq!(connections.stats().await.node_count, 3);
    }

    #[tokio::test]
    async fn test_rebuild_replaces_graph() {
        let connections = triangle().await;

        let stats = connections
            .build_graph(&json!([["id", "peer"], ["X", "Y"]]), true)
            .await
            .unwrap();

        assert_eq!(stats.node_count, 2);
        assert!(connections.neighbors("A").await.is_err());
        assert_eq!(connections.neighbors("X").await.unwrap(), vec!["Y"]);
    }

    #[tokio::test]
    async fn test_rebuild_rejected_while_graph_is_read() {
        let connections = triangle().await;
        let reader = connections.graph.read().await;

        let err = connections
            .build_graph(&json!([["X", "Y"]]), false)
            .await
            .unwrap_err();
        assert!(matches!(err, ConnectionsError::GraphBusy));

        drop(reader);
        assert!(connections.build_graph(&json!([["X", "Y"]]), false).await.is_ok());
    }

    #[tokio::test]
    async fn test_rebuild_after_search_stopped_early() {
        // Several workers are still in flight when the first path arrives.
        let connections = Connections::new();
        connections
            .build_graph(
                &json!([["S", "T"], ["S", "A"], ["S", "B"], ["A", "T"], ["B", "T"]]),
                false,
            )
            .await
            .unwrap();
        let options = SearchOptions::default().with_max_results(1);

        let paths = connections.find_paths("S", "T", &options).await.unwrap();
        assert_eq!(paths.len(), 1);
        assert!(connections.build_graph(&json!([["X", "Y"]]), false).await.is_ok());

        assert!(connections.are_connected("X", "Y", &options).await.unwrap());
        assert!(connections.build_graph(&json!([["P", "Q"]]), false).await.is_ok());
        assert_eq!(connections.neighbors("P").await.unwrap(), vec!["Q"]);
    }

    #[tokio::test]
    async fn test_rebuild_after_search_hits_length_limit() {
        let connections = triangle().await;
        let options = SearchOptions::default().with_max_path_length(1);

        let paths = connections.find_paths("A", "C", &options).await.unwrap();
        assert!(paths.is_empty());
        assert!(connections.build_graph(&json!([["X", "Y"]]), false).await.is_ok());
    }

    #[tokio::test]
    async fn test_handles_are_independent() {
        let first = triangle().await;
        let second = Connections::new();
        second
            .build_graph(&json!([["P", "Q"]]), false)
            .await
            .unwrap();

        assert!(first.neighbors("P").await.is_err());
        assert!(second.neighbors("A").await.is_err());
    }
}
