//! Path results and their output encodings.
//!
//! A search yields each discovered walk either as the raw sequence of
//! node identifiers or as a single comma-joined string.

use serde::{Deserialize, Serialize};

/// Separator used by the joined-string encoding.
pub const JOIN_SEPARATOR: &str = ",";

/// How discovered paths are encoded in results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Ordered list of node identifiers.
    #[default]
    Sequence,

    /// Node identifiers joined with `,`.
    JoinedString,
}

impl OutputFormat {
    /// Parses the textual name of a format. Unknown names yield `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "sequence" | "array" => Some(Self::Sequence),
            "joined-string" | "joined_string" | "string" => Some(Self::JoinedString),
            _ => None,
        }
    }

    /// Encodes a completed path in this format.
    pub fn render(self, path: Vec<String>) -> PathResult {
        match self {
            Self::Sequence => PathResult::Sequence(path),
            Self::JoinedString => PathResult::Joined(path.join(JOIN_SEPARATOR)),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Sequence => "sequence",
            Self::JoinedString => "joined-string",
        };
        write!(f, "{}", s)
    }
}

/// A completed walk from source to destination, inclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathResult {
    Sequence(Vec<String>),
    Joined(String),
}

impl PathResult {
    /// Number of nodes on the path.
    pub fn node_count(&self) -> usize {
        match self {
            Self::Sequence(nodes) => nodes.len(),
            Self::Joined(s) => s.split(JOIN_SEPARATOR).count(),
        }
    }
}

impl std::fmt::Display for PathResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence(nodes) => write!(f, "{}", nodes.join(" -> ")),
            Self::Joined(s) => write!(f, "{}", s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walk(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_render_formats() {
        let seq = OutputFormat::Sequence.render(walk(&["A", "B", "C"]));
        assert_eq!(seq, PathResult::Sequence(walk(&["A", "B", "C"])));

        let joined = OutputFormat::JoinedString.render(walk(&["A", "B", "C"]));
        assert_eq!(joined, PathResult::Joined("A,B,C".to_string()));
        assert_eq!(joined.node_count(), 3);
    }

    #[test]
    fn test_format_names() {
        assert_eq!(OutputFormat::from_name("string"), Some(OutputFormat::JoinedString));
        assert_eq!(OutputFormat::from_name("sequence"), Some(OutputFormat::Sequence));
        assert_eq!(OutputFormat::from_name("csv"), None);
        assert_eq!(OutputFormat::JoinedString.to_string(), "joined-string");
    }

    #[test]
    fn test_serializes_untagged() {
        let seq = PathResult::Sequence(walk(&["A", "C"]));
        assert_eq!(serde_json::to_string(&seq).unwrap(), r#"["A","C"]"#);

        let joined = PathResult::Joined("A,C".to_string());
        assert_eq!(serde_json::to_string(&joined).unwrap(), r#""A,C""#);
    }
}
