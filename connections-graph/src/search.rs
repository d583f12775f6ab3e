//! Bounded concurrent path search.
//!
//! Partial paths are expanded breadth-first from the source. A FIFO queue
//! holds the partial paths waiting for expansion and up to
//! `concurrency_width` of them are expanded at once on tokio tasks.
//!
//! The scheduler applies worker outputs strictly in dispatch order. It is
//! the only owner of the result list and the only place the search can
//! finish, so a search completes exactly once and yields the same paths
//! no matter how the workers interleave.

use crate::error::{ConnectionsError, Result};
use crate::graph::ConnectionGraph;
use crate::options::SearchConfig;
use crate::path::PathResult;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::OwnedRwLockReadGuard;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Read access to a graph, held for the whole lifetime of a search.
pub type GraphSnapshot = Arc<OwnedRwLockReadGuard<ConnectionGraph>>;

/// Why a search stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    /// The configured number of paths was found.
    MaxResults,

    /// A partial path grew longer than the maximum path length.
    PathTooLong,

    /// The maximum path length was reached before any path was found.
    DepthWithoutResults,

    /// Every partial path was expanded.
    Exhausted,
}

impl std::fmt::Display for StopReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::MaxResults => "max results reached",
            Self::PathTooLong => "max path length exceeded",
            Self::DepthWithoutResults => "max path length reached without results",
            Self::Exhausted => "search space exhausted",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of a completed search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchReport {
    /// Paths from source to destination, in discovery order.
    pub paths: Vec<PathResult>,
    pub stop: StopReason,
    /// Number of partial paths whose neighbors were applied.
    pub tasks_expanded: usize,
    /// Time taken in milliseconds.
    pub query_time_ms: u64,
}

/// Rules shared by every worker of one search.
#[derive(Debug)]
struct ExpandRules {
    destination: String,
    allow_revisit: bool,
    allow_backtrack: bool,
}

/// What expanding one partial path produced.
#[derive(Debug, Default)]
struct Expansion {
    /// Extended paths that end at the destination.
    found: Vec<Vec<String>>,
    /// Extended paths that still need expanding.
    pending: Vec<Vec<String>>,
}

/// Extends `path` by every admissible neighbor of its frontier node.
fn expand(graph: &ConnectionGraph, path: &[String], rules: &ExpandRules) -> Result<Expansion> {
    let mut expansion = Expansion::default();
    let Some(frontier) = path.last() else {
        return Ok(expansion);
    };
    let previous = path.len().checked_sub(2).map(|i| &path[i]);

    for neighbor in graph.neighbors(frontier)? {
        if !rules.allow_revisit && path.contains(neighbor) {
            continue;
        }
        if !rules.allow_backtrack && previous == Some(neighbor) {
            continue;
        }

        let mut next = Vec::with_capacity(path.len() + 1);
        next.extend_from_slice(path);
        next.push(neighbor.clone());

        if *neighbor == rules.destination {
            expansion.found.push(next);
        } else {
            expansion.pending.push(next);
        }
    }

    Ok(expansion)
}

/// State of one running search. Owned by the scheduler loop alone.
struct Search {
    graph: GraphSnapshot,
    rules: Arc<ExpandRules>,
    config: SearchConfig,
    queue: VecDeque<Vec<String>>,
    /// Dispatched expansions, oldest first, with the length of their path.
    in_flight: VecDeque<(usize, JoinHandle<Result<Expansion>>)>,
    paths: Vec<PathResult>,
    expanded: usize,
}

impl Search {
    /// Hands queued paths to workers until the pool is full.
    fn dispatch(&mut self) {
        while self.in_flight.len() < self.config.concurrency_width {
            let Some(path) = self.queue.pop_front() else {
                break;
            };
            let graph = Arc::clone(&self.graph);
            let rules = Arc::clone(&self.rules);
            let len = path.len();
            let handle = tokio::spawn(async move { expand(&graph, &path, &rules) });
            self.in_flight.push_back((len, handle));
        }
    }

    /// Checks the stop rules for a path of `len` nodes about to be applied.
    ///
    /// A path of exactly the maximum length only stops the search while no
    /// result exists yet; once something was found it may grow one more step.
    fn stop_reason(&self, len: usize) -> Option<StopReason> {
        let max_len = self.config.max_path_length;
        if self.paths.len() >= self.config.max_results {
            Some(StopReason::MaxResults)
        } else if len > max_len {
            Some(StopReason::PathTooLong)
        } else if len == max_len && self.paths.is_empty() {
            Some(StopReason::DepthWithoutResults)
        } else {
            None
        }
    }

    async fn run(&mut self) -> Result<StopReason> {
        loop {
            self.dispatch();

            let Some((len, handle)) = self.in_flight.pop_front() else {
                return Ok(StopReason::Exhausted);
            };

            if let Some(reason) = self.stop_reason(len) {
                // Left for shutdown to abort; the worker still holds the graph.
                self.in_flight.push_front((len, handle));
                return Ok(reason);
            }

            let expansion = handle
                .await
                .map_err(|e| ConnectionsError::Worker(e.to_string()))??;
            self.expanded += 1;

            for path in expansion.found {
                if self.paths.len() < self.config.max_results {
                    self.paths.push(self.config.output_format.render(path));
                }
            }

            for path in expansion.pending {
                if let Some(limit) = self.config.max_pending_tasks {
                    if self.queue.len() >= limit {
                        return Err(ConnectionsError::QueueOverflow { limit });
                    }
                }
                self.queue.push_back(path);
            }
        }
    }

    /// Cancels outstanding workers and waits until they have released the graph.
    async fn shutdown(&mut self) {
        self.queue.clear();
        for (_, handle) in self.in_flight.drain(..) {
            handle.abort();
            let _ = handle.await;
        }
    }
}

/// Searches `graph` for paths from `source` to `destination`.
///
/// On a fatal error (an unknown node on the frontier, an overflowing queue)
/// the returned [`ConnectionsError::Search`] carries the paths found so far.
pub async fn search_paths(
    graph: GraphSnapshot,
    source: &str,
    destination: &str,
    config: SearchConfig,
) -> Result<SearchReport> {
    if source.is_empty() {
        return Err(ConnectionsError::InvalidEndpoint("source"));
    }
    if destination.is_empty() {
        return Err(ConnectionsError::InvalidEndpoint("destination"));
    }

    let start = Instant::now();
    debug!(
        "Path search {} -> {} (max results {}, max length {}, width {}, format {})",
        source,
        destination,
        config.max_results,
        config.max_path_length,
        config.concurrency_width,
        config.output_format
    );

    let rules = Arc::new(ExpandRules {
        destination: destination.to_string(),
        allow_revisit: config.allow_revisit,
        allow_backtrack: config.allow_backtrack,
    });
    let mut search = Search {
        graph,
        rules,
        config,
        queue: VecDeque::from([vec![source.to_string()]]),
        in_flight: VecDeque::new(),
        paths: Vec::new(),
        expanded: 0,
    };

    let outcome = search.run().await;
    search.shutdown().await;

    let query_time_ms = start.elapsed().as_millis() as u64;
    match outcome {
        Ok(stop) => {
            debug!(
                "Path search finished: {} path(s), {} expanded, {} ({}ms)",
                search.paths.len(),
                search.expanded,
                stop,
                query_time_ms
            );
            Ok(SearchReport {
                paths: search.paths,
                stop,
                tasks_expanded: search.expanded,
                query_time_ms,
            })
        }
        Err(e) => {
            warn!(
                "Path search {} -> {} aborted after {} path(s): {}",
                source,
                destination,
                search.paths.len(),
                e
            );
            Err(ConnectionsError::Search {
                source: Box::new(e),
                partial: search.paths,
            })
        }
    }
}
