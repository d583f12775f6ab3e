//! Graph builder for constructing the connection graph from rows.
//!
//! Rows arrive already parsed by an external loader as a JSON array of
//! two-element arrays. The builder validates every row before the graph
//! is produced, stopping at the first invalid one.

use crate::error::{ConnectionsError, Result};
use crate::graph::ConnectionGraph;
use serde_json::Value;
use tracing::debug;

const FIELD_NAMES: [&str; 2] = ["source", "destination"];

/// Builds a ConnectionGraph from connection pairs.
#[derive(Debug, Default)]
pub struct GraphBuilder {
    graph: ConnectionGraph,
    pairs_added: usize,
}

impl GraphBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates `data` and builds a graph from it.
    ///
    /// With `has_header` the first row is dropped before validation, so
    /// row indexes in errors count data rows only.
    pub fn from_rows(data: &Value, has_header: bool) -> Result<ConnectionGraph> {
        let rows = data.as_array().ok_or(ConnectionsError::InvalidData)?;
        let skip = usize::from(has_header);

        let mut builder = Self::new();
        for (i, row) in rows.iter().skip(skip).enumerate() {
            let (source, destination) = validate_row(i, row)?;
            builder.add_pair(source, destination);
        }

        debug!(
            "Built graph from {} data rows ({} pairs added, {} nodes)",
            rows.len().saturating_sub(skip),
            builder.pairs_added,
            builder.graph.node_count()
        );
        Ok(builder.build())
    }

    /// Builds a graph from typed pairs.
    pub fn from_pairs<I, S, D>(pairs: I) -> Result<ConnectionGraph>
    where
        I: IntoIterator<Item = (S, D)>,
        S: AsRef<str>,
        D: AsRef<str>,
    {
        let mut builder = Self::new();
        for (i, (source, destination)) in pairs.into_iter().enumerate() {
            let fields = [source.as_ref(), destination.as_ref()];
            if let Some(field) = fields.iter().position(|f| f.is_empty()) {
                return Err(ConnectionsError::EmptyField {
                    row: i,
                    field,
                    name: FIELD_NAMES[field],
                });
            }
            builder.add_pair(fields[0], fields[1]);
        }
        Ok(builder.build())
    }

    /// Adds a connection in both directions. Callers validate the ids.
    fn add_pair(&mut self, source: &str, destination: &str) {
        self.graph.connect(source, destination);
        self.pairs_added += 1;
    }

    /// Finishes building and returns the graph.
    pub fn build(self) -> ConnectionGraph {
        self.graph
    }
}

/// Checks one row's shape and field types.
fn validate_row(row: usize, value: &Value) -> Result<(&str, &str)> {
    let fields = value
        .as_array()
        .ok_or(ConnectionsError::RowNotArray { row })?;

    if fields.len() != 2 {
        return Err(ConnectionsError::RowLength {
            row,
            len: fields.len(),
        });
    }

    let mut ids = [""; 2];
    for (field, cell) in fields.iter().enumerate() {
        let name = FIELD_NAMES[field];
        let id = cell
            .as_str()
            .ok_or(ConnectionsError::FieldNotString { row, field, name })?;
        if id.is_empty() {
            return Err(ConnectionsError::EmptyField { row, field, name });
        }
        ids[field] = id;
    }

    Ok((ids[0], ids[1]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder_adds_both_directions() {
        let data = json!([["A", "B"], ["B", "C"], ["A", "C"]]);
        let graph = GraphBuilder::from_rows(&data, false).unwrap();

        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        assert_eq!(graph.neighbors("A").unwrap(), ["B", "C"].map(String::from));
        assert_eq!(graph.neighbors("C").unwrap(), ["B", "A"].map(String::from));
    }

    #[test]
    fn test_duplicate_rows_are_ignored() {
        let data = json!([["A", "B"], ["A", "B"], ["B", "A"]]);
        let graph = GraphBuilder::from_rows(&data, false).unwrap();

        assert_eq!(graph.neighbors("A").unwrap().len(), 1);
        assert_eq!(graph.neighbors("B").unwrap().len(), 1);
    }

    #[test]
    fn test_non_string_destination_names_row_and_field() {
        let data = json!([["A", "B"], ["A", 5]]);
        let err = GraphBuilder::from_rows(&data, false).unwrap_err();

        assert!(matches!(
            err,
            ConnectionsError::FieldNotString {
                row: 1,
                field: 1,
                name: "destination"
            }
        ));
        assert_eq!(
            err.to_string(),
            "data[1][1] (connection destination) is not a string"
        );
    }

    #[test]
    fn test_non_string_source() {
        let data = json!([[null, "B"]]);
        let err = GraphBuilder::from_rows(&data, false).unwrap_err();
        assert!(matches!(
            err,
            ConnectionsError::FieldNotString { row: 0, field: 0, .. }
        ));
    }

    #[test]
    fn test_header_is_discarded_before_validation() {
        let data = json!([["from", "to"], ["A"], ["B", "C"]]);
        let err = GraphBuilder::from_rows(&data, true).unwrap_err();

        // The malformed row is the first data row, not the second input row.
        assert!(matches!(err, ConnectionsError::RowLength { row: 0, len: 1 }));
    }

    #[test]
    fn test_header_row_is_not_a_connection() {
        let data = json!([["from", "to"], ["A", "B"]]);
        let graph = GraphBuilder::from_rows(&data, true).unwrap();

        assert!(!graph.contains("from"));
        assert!(graph.contains("A"));
    }

    #[test]
    fn test_validation_is_fail_fast() {
        let data = json!([["A", "B"], "oops", [1, 2]]);
        let err = GraphBuilder::from_rows(&data, false).unwrap_err();
        assert!(matches!(err, ConnectionsError::RowNotArray { row: 1 }));
    }

    #[test]
    fn test_top_level_must_be_array() {
        let err = GraphBuilder::from_rows(&json!({"A": "B"}), false).unwrap_err();
        assert!(matches!(err, ConnectionsError::InvalidData));
    }

    #[test]
    fn test_empty_identifier_rejected() {
        let data = json!([["A", ""]]);
        let err = GraphBuilder::from_rows(&data, false).unwrap_err();
        assert!(matches!(
            err,
            ConnectionsError::EmptyField { row: 0, field: 1, .. }
        ));
    }

    #[test]
    fn test_from_pairs() {
        let graph = GraphBuilder::from_pairs([("A", "B"), ("B", "C")]).unwrap();
        assert_eq!(graph.neighbors("B").unwrap(), ["A", "C"].map(String::from));

        let err = GraphBuilder::from_pairs([("A", "B"), ("", "C")]).unwrap_err();
        assert!(matches!(
            err,
            ConnectionsError::EmptyField { row: 1, field: 0, .. }
        ));
    }

    #[test]
    fn test_pairs_added_counts_repeated_pairs() {
        let mut builder = GraphBuilder::new();
        builder.add_pair("A", "B");
        builder.add_pair("B", "A");
        builder.add_pair("A", "B");

        // Every accepted pair is counted, but only one connection exists.
        assert_eq!(builder.pairs_added, 3);
        assert_eq!(builder.build().edge_count(), 1);
    }
}
