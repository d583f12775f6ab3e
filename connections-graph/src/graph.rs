//! Core adjacency store.
//!
//! The ConnectionGraph maps each node identifier to the ordered,
//! duplicate-free list of its neighbors. Edges are undirected: every
//! connection is recorded from both ends.

use crate::error::{ConnectionsError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The undirected connection graph.
///
/// Built once by [`crate::GraphBuilder`] and read-only afterwards. It can be
/// serialized for export but never deserialized, so every graph in use went
/// through row validation:
///
/// ```compile_fail
/// let graph: connections_graph::ConnectionGraph =
///     serde_json::from_str(r#"{"adjacency":{"A":["B","B"]}}"#).unwrap();
/// ```
#[derive(Debug, Default, Clone, Serialize)]
pub struct ConnectionGraph {
    /// Maps node identifiers to their neighbors, in first-insertion order.
    adjacency: HashMap<String, Vec<String>>,
}

impl ConnectionGraph {
    /// Creates a new empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a connection from both ends. Repeated connections are ignored.
    pub(crate) fn connect(&mut self, source: &str, destination: &str) {
        self.insert_neighbor(source, destination);
        self.insert_neighbor(destination, source);
    }

    fn insert_neighbor(&mut self, node: &str, neighbor: &str) {
        let list = self.adjacency.entry(node.to_string()).or_default();
        if !list.iter().any(|n| n == neighbor) {
            list.push(neighbor.to_string());
        }
    }

    /// Gets the neighbors of a node.
    ///
    /// A node without a neighbor list is unknown to the graph; that is an
    /// error, not an empty result.
    pub fn neighbors(&self, node: &str) -> Result<&[String]> {
        self.adjacency
            .get(node)
            .map(Vec::as_slice)
            .ok_or_else(|| ConnectionsError::UnknownNode(node.to_string()))
    }

    /// Returns true if the node has at least one recorded connection.
    pub fn contains(&self, node: &str) -> bool {
        self.adjacency.contains_key(node)
    }

    /// Iterates over all node identifiers.
    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.adjacency.keys().map(String::as_str)
    }

    /// Returns the number of nodes.
    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Returns the number of undirected edges. A self-loop counts once.
    pub fn edge_count(&self) -> usize {
        let mut loops = 0;
        let mut ends = 0;
        for (node, list) in &self.adjacency {
            for neighbor in list {
                if neighbor == node {
                    loops += 1;
                } else {
                    ends += 1;
                }
            }
        }
        ends / 2 + loops
    }
}

/// Graph statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphStats {
    pub node_count: usize,
    pub edge_count: usize,
}

impl ConnectionGraph {
    /// Returns graph statistics.
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            node_count: self.node_count(),
            edge_count: self.edge_count(),
        }
    }
}
