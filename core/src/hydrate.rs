//! Display titles for vertex ids.
//!
//! Titled snapshots answer locally. Links-only snapshots rely on a remote
//! encyclopedia API keyed by page id; this module owns the request batching
//! and the response decoding, while the transport lives with the caller.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{GraphError, Result};
use crate::graph::{Graph, VertexId};

/// Upper bound on ids per remote request.
pub const MAX_IDS_PER_REQUEST: usize = 50;

/// Maps vertex ids to display titles. Ids it cannot name are left out.
pub trait TitleHydrator {
    fn hydrate(&self, ids: &[VertexId]) -> Result<HashMap<VertexId, String>>;
}

impl TitleHydrator for Graph {
    fn hydrate(&self, ids: &[VertexId]) -> Result<HashMap<VertexId, String>> {
        Ok(ids
            .iter()
            .filter_map(|&id| self.title(id).map(|t| (id, t.to_string())))
            .collect())
    }
}

/// Titles for every id on `path`, falling back to `#<id>` when unknown.
pub fn display_titles<H: TitleHydrator + ?Sized>(hydrator: &H, path: &[VertexId]) -> Result<Vec<String>> {
    let titles = hydrator.hydrate(path)?;
    Ok(path
        .iter()
        .map(|id| titles.get(id).cloned().unwrap_or_else(|| format!("#{}", id)))
        .collect())
}

/// Split `ids` into pipe-delimited `pageids` parameters of at most
/// `batch_size` ids each (clamped to `1..=MAX_IDS_PER_REQUEST`).
pub fn pageid_batches(ids: &[VertexId], batch_size: usize) -> Vec<String> {
    let size = batch_size.clamp(1, MAX_IDS_PER_REQUEST);
    ids.chunks(size)
        .map(|chunk| {
            chunk
                .iter()
                .map(|id| id.to_string())
                .collect::<Vec<_>>()
                .join("|")
        })
        .collect()
}

#[derive(Deserialize)]
struct PagesResponse {
    query: PagesQuery,
}

#[derive(Deserialize)]
struct PagesQuery {
    #[serde(default)]
    pages: Vec<PageEntry>,
}

#[derive(Deserialize)]
struct PageEntry {
    pageid: Option<VertexId>,
    title: Option<String>,
}

/// Decode a `{"query": {"pages": [{"pageid", "title"}, ...]}}` payload.
///
/// Entries without a page id (missing pages) are skipped.
pub fn parse_pages_response(body: &str) -> Result<HashMap<VertexId, String>> {
    let response: PagesResponse =
        serde_json::from_str(body).map_err(|e| GraphError::Hydration(e.to_string()))?;
    Ok(response
        .query
        .pages
        .into_iter()
        .filter_map(|p| Some((p.pageid?, p.title?)))
        .collect())
}
