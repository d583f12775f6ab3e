//! Error types for graph construction and queries.

use crate::path::PathResult;
use thiserror::Error;

/// Errors raised while building or querying a connection graph.
#[derive(Error, Debug)]
pub enum ConnectionsError {
    /// The top-level row data was not an array of rows.
    #[error("data (connection source / destination array of arrays) is not an array")]
    InvalidData,

    /// A row was not an array.
    #[error("data[{row}] (connection source / destination array) is not an array")]
    RowNotArray { row: usize },

    /// A row did not hold exactly two fields.
    #[error("data[{row}] (connection source / destination array) must have a length of 2, found {len}")]
    RowLength { row: usize, len: usize },

    /// A field of a row was not a string.
    #[error("data[{row}][{field}] (connection {name}) is not a string")]
    FieldNotString {
        row: usize,
        field: usize,
        name: &'static str,
    },

    /// A field of a row was an empty string.
    #[error("data[{row}][{field}] (connection {name}) is empty")]
    EmptyField {
        row: usize,
        field: usize,
        name: &'static str,
    },

    /// The node has no recorded neighbors.
    #[error("node `{0}` has no recorded connections")]
    UnknownNode(String),

    /// A search endpoint was empty.
    #[error("{0} must be a non-empty string")]
    InvalidEndpoint(&'static str),

    /// A rebuild was attempted while the graph was in use.
    #[error("graph is in use by an active query; rebuild rejected")]
    GraphBusy,

    /// The pending task queue grew past its configured bound.
    #[error("pending task queue exceeded its limit of {limit}")]
    QueueOverflow { limit: usize },

    /// A search worker panicked or was cancelled unexpectedly.
    #[error("search worker failed: {0}")]
    Worker(String),

    /// A path search aborted; carries the paths found before the failure.
    #[error("path search aborted after {} path(s): {source}", .partial.len())]
    Search {
        #[source]
        source: Box<ConnectionsError>,
        partial: Vec<PathResult>,
    },
}

impl ConnectionsError {
    /// Paths found before a search aborted. Empty for every other error.
    pub fn partial_paths(&self) -> &[PathResult] {
        match self {
            Self::Search { partial, .. } => partial,
            _ => &[],
        }
    }

    /// The underlying cause, looking through a search abort.
    pub fn root(&self) -> &ConnectionsError {
        match self {
            Self::Search { source, .. } => source.root(),
            other => other,
        }
    }
}

/// Result type alias for graph operations.
pub type Result<T> = std::result::Result<T, ConnectionsError>;
