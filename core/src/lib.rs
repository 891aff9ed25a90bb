//! wikipath-core: link-graph path finding between encyclopedia articles.
//!
//! Loads a binary link snapshot into an in-memory directed graph, resolves
//! free-text (possibly misspelled) article names through an approximate
//! title index, and finds a path between two articles with either BFS
//! (shortest) or IDDFS (depth-capped, low memory).
//!
//! Loading and querying are separate phases: build a [`Snapshot`] once, then
//! share `&Graph` / `&TitleIndex` freely across threads.

mod error;
mod graph;
mod hydrate;
mod resolver;
mod snapshot;
mod title_index;
mod traversal;

pub use error::{GraphError, Result};
pub use graph::{Article, Graph, VertexId};
pub use hydrate::{
    display_titles, pageid_batches, parse_pages_response, TitleHydrator, MAX_IDS_PER_REQUEST,
};
pub use resolver::{Resolution, Resolver, DEFAULT_SEARCH_LIMIT};
pub use snapshot::{write_snapshot, write_to, Snapshot, SnapshotLayout};
pub use title_index::{levenshtein, TitleIndex, TitleMatch, TitleSearch};
pub use traversal::{
    bfs_search, bounded_path, iddfs_search, shortest_path, Path, PathSearch, Strategy,
    VisitPolicy, DEFAULT_MAX_DEPTH,
};
