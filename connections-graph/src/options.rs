//! Search options.
//!
//! Options are resolved once, when a search starts. Missing or invalid
//! values fall back to their defaults instead of failing the call.

use crate::path::OutputFormat;
use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const DEFAULT_MAX_RESULTS: usize = 100;
pub const DEFAULT_MAX_PATH_LENGTH: usize = 5;
pub const DEFAULT_CONCURRENCY_WIDTH: usize = 500;

/// Caller-facing options for a path search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SearchOptions {
    /// Stop once this many paths were found.
    pub max_results: usize,

    /// Maximum number of nodes on a partial path before the search stops.
    pub max_path_length: usize,

    /// Whether a node may appear more than once on a path.
    pub allow_revisit: bool,

    /// Whether a path may step straight back to the node it came from.
    pub allow_backtrack: bool,

    pub output_format: OutputFormat,

    /// Number of partial paths expanded at once.
    pub concurrency_width: usize,

    /// Upper bound on queued partial paths. `None` leaves the queue unbounded.
    pub max_pending_tasks: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_results: DEFAULT_MAX_RESULTS,
            max_path_length: DEFAULT_MAX_PATH_LENGTH,
            allow_revisit: false,
            allow_backtrack: false,
            output_format: OutputFormat::Sequence,
            concurrency_width: DEFAULT_CONCURRENCY_WIDTH,
            max_pending_tasks: None,
        }
    }
}

impl SearchOptions {
    /// Reads options from a loosely typed JSON object.
    ///
    /// Keys may be camelCase or snake_case. Any field that is missing or of
    /// the wrong type keeps its default, and a non-object yields all defaults.
    pub fn from_value(value: &Value) -> Self {
        let mut options = Self::default();
        let Some(map) = value.as_object() else {
            return options;
        };

        let field = |camel: &str, snake: &str| map.get(camel).or_else(|| map.get(snake));
        let count = |camel: &str, snake: &str| {
            field(camel, snake)
                .and_then(Value::as_u64)
                .and_then(|n| usize::try_from(n).ok())
        };
        let flag = |camel: &str, snake: &str| field(camel, snake).and_then(Value::as_bool);

        if let Some(n) = count("maxResults", "max_results") {
            options.max_results = n;
        }
        if let Some(n) = count("maxPathLength", "max_path_length") {
            options.max_path_length = n;
        }
        if let Some(b) = flag("allowRevisit", "allow_revisit") {
            options.allow_revisit = b;
        }
        if let Some(b) = flag("allowBacktrack", "allow_backtrack") {
            options.allow_backtrack = b;
        }
        if let Some(format) = field("outputFormat", "output_format")
            .and_then(Value::as_str)
            .and_then(OutputFormat::from_name)
        {
            options.output_format = format;
        }
        if let Some(n) = count("concurrencyWidth", "concurrency_width") {
            options.concurrency_width = n;
        }
        if let Some(n) = count("maxPendingTasks", "max_pending_tasks") {
            options.max_pending_tasks = Some(n);
        }

        options
    }

    pub fn with_max_results(mut self, max: usize) -> Self {
        self.max_results = max;
        self
    }

    pub fn with_max_path_length(mut self, max: usize) -> Self {
        self.max_path_length = max;
        self
    }

    pub fn with_revisit(mut self, allow: bool) -> Self {
        self.allow_revisit = allow;
        self
    }

    pub fn with_backtrack(mut self, allow: bool) -> Self {
        self.allow_backtrack = allow;
        self
    }

    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    pub fn with_concurrency(mut self, width: usize) -> Self {
        self.concurrency_width = width;
        self
    }

    pub fn with_max_pending(mut self, limit: usize) -> Self {
        self.max_pending_tasks = Some(limit);
        self
    }

    /// Resolves the options into the configuration a search runs with.
    pub fn resolve(&self) -> SearchConfig {
        SearchConfig {
            max_results: self.max_results,
            max_path_length: self.max_path_length,
            allow_revisit: self.allow_revisit,
            allow_backtrack: self.allow_backtrack,
            output_format: self.output_format,
            concurrency_width: if self.concurrency_width == 0 {
                DEFAULT_CONCURRENCY_WIDTH
            } else {
                self.concurrency_width
            },
            max_pending_tasks: self.max_pending_tasks,
        }
    }
}

/// Resolved, immutable configuration of one search.
///
/// `concurrency_width` is always at least 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    pub max_results: usize,
    pub max_path_length: usize,
    pub allow_revisit: bool,
    pub allow_backtrack: bool,
    pub output_format: OutputFormat,
    pub concurrency_width: usize,
    pub max_pending_tasks: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchOptions::default().resolve()
    }
}
