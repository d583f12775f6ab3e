//! Connections Loader - fetches connection rows for the graph builder
//!
//! Rows come from a local CSV file or from a URL. Either way they are
//! handed to the builder as a JSON array of string arrays, one per record,
//! with no validation beyond CSV syntax: shape and header handling belong
//! to the builder.

mod error;

pub use error::{LoaderError, Result};

use serde_json::Value;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Where connection rows are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowSource {
    /// A local CSV file.
    File(PathBuf),
    /// An `http` or `https` URL serving CSV or a JSON array of rows.
    Url(String),
}

impl RowSource {
    /// Classifies a source string. Anything that is not an http(s) URL is
    /// treated as a file path.
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.trim();
        if source.is_empty() {
            return Err(LoaderError::EmptySource);
        }

        let lower = source.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            Ok(Self::Url(source.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(source)))
        }
    }
}

impl fmt::Display for RowSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => write!(f, "{}", url),
        }
    }
}

/// Loads the raw rows from a source.
pub async fn load_rows(source: &RowSource) -> Result<Value> {
    let rows = match source {
        RowSource::File(path) => load_file(path).await?,
        RowSource::Url(url) => load_url(url).await?,
    };

    debug!(
        "Loaded {} rows from {}",
        rows.as_array().map_or(0, Vec::len),
        source
    );
    Ok(rows)
}

async fn load_file(path: &Path) -> Result<Value> {
    let data = tokio::fs::read(path).await?;
    parse_csv(&data)
}

async fn load_url(url: &str) -> Result<Value> {
    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoaderError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response.text().await?;
    parse_body(&body)
}

/// Parses a response body: a JSON array is taken as-is, anything else is CSV.
pub fn parse_body(body: &str) -> Result<Value> {
    if body.trim_start().starts_with('[') {
        Ok(serde_json::from_str(body)?)
    } else {
        parse_csv(body.as_bytes())
    }
}

/// Parses CSV data into rows of strings.
///
/// Records may have any number of fields; the builder reports rows that are
/// not pairs.
pub fn parse_csv(data: &[u8]) -> Result<Value> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let fields = record
            .iter()
            .map(|field| Value::String(field.to_string()))
            .collect();
        rows.push(Value::Array(fields));
    }

    Ok(Value::Array(rows))
}
