use std::thread;

use log::{debug, warn};

use crate::error::{GraphError, Result};
use crate::graph::Graph;
use crate::title_index::{TitleMatch, TitleSearch};
use crate::traversal::{PathSearch, Strategy};

/// Candidates fetched per title query.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

/// Both resolved endpoints and the path found between them.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub from: TitleMatch,
    pub to: TitleMatch,
    pub search: PathSearch,
}

/// Turns a pair of free-text article names into a link path.
///
/// Borrows an already loaded graph and title source; the caller finishes
/// loading before constructing one.
pub struct Resolver<'a, S: TitleSearch> {
    graph: &'a Graph,
    titles: &'a S,
    search_limit: usize,
}

impl<'a, S: TitleSearch> Resolver<'a, S> {
    pub fn new(graph: &'a Graph, titles: &'a S) -> Self {
        Self {
            graph,
            titles,
            search_limit: DEFAULT_SEARCH_LIMIT,
        }
    }

    pub fn with_search_limit(mut self, limit: usize) -> Self {
        self.search_limit = limit.max(1);
        self
    }

    /// Resolve both queries to their best match.
    ///
    /// The two searches run on separate threads and are both joined before
    /// anything is returned; an error from either one wins over any match.
    pub fn resolve_endpoints(&self, from_query: &str, to_query: &str) -> Result<(TitleMatch, TitleMatch)> {
        let limit = self.search_limit;
        let titles = self.titles;

        let (from_results, to_results) = thread::scope(|scope| {
            let from_task = scope.spawn(move || titles.search(from_query, limit));
            let to_results = titles.search(to_query, limit);
            let from_results = from_task
                .join()
                .unwrap_or_else(|panic| std::panic::resume_unwind(panic));
            (from_results, to_results)
        });

        // A failed search outranks an empty one on either side.
        let from_results = from_results?;
        let to_results = to_results?;

        let from = best_match(from_results, from_query)?;
        let to = best_match(to_results, to_query)?;
        debug!(
            "resolved '{}' → {} ({}), '{}' → {} ({})",
            from_query, from.title, from.id, to_query, to.title, to.id
        );
        Ok((from, to))
    }

    /// Resolve both names, then search for a path with `strategy`.
    ///
    /// A missing path is not an error: `search.path` is empty.
    pub fn resolve(&self, from_query: &str, to_query: &str, strategy: Strategy) -> Result<Resolution> {
        let (from, to) = self.resolve_endpoints(from_query, to_query)?;

        for m in [&from, &to] {
            if !self.graph.contains(m.id) {
                warn!("title match '{}' ({}) is not a loaded vertex", m.title, m.id);
            }
        }

        let search = strategy.run(self.graph, from.id, to.id);
        Ok(Resolution { from, to, search })
    }
}

fn best_match(results: Vec<TitleMatch>, query: &str) -> Result<TitleMatch> {
    results
        .into_iter()
        .next()
        .ok_or_else(|| GraphError::NoMatchFound {
            query: query.to_string(),
        })
}
