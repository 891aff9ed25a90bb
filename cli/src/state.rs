use anyhow::{bail, Context, Result};
use wikipath_core::{
    Graph, Snapshot, SnapshotLayout, TitleIndex, TitleMatch, TitleSearch, VertexId,
};

use crate::config::Settings;

/// The loaded snapshot plus where it came from.
pub struct Session {
    pub snapshot: Snapshot,
    pub settings: Settings,
}

impl Session {
    /// Load the configured snapshot and enforce the memory cap.
    pub fn load(settings: &Settings) -> Result<Self> {
        let snapshot = Snapshot::load(&settings.snapshot, settings.layout)
            .with_context(|| format!("failed to load snapshot {}", settings.snapshot.display()))?;

        let memory_mb = snapshot.graph.memory_usage() / (1024 * 1024);
        if memory_mb > settings.max_memory_mb as usize {
            bail!(
                "loaded graph uses {}MB, exceeds --max-memory-mb={}MB",
                memory_mb,
                settings.max_memory_mb
            );
        }

        Ok(Session {
            snapshot,
            settings: settings.clone(),
        })
    }

    pub fn graph(&self) -> &Graph {
        &self.snapshot.graph
    }

    pub fn titles(&self) -> &TitleIndex {
        &self.snapshot.titles
    }

    /// Title source that also accepts raw vertex ids.
    pub fn lookup(&self) -> Lookup<'_> {
        Lookup {
            graph: &self.snapshot.graph,
            titles: &self.snapshot.titles,
            ids_only: self.snapshot.layout == SnapshotLayout::LinksOnly,
        }
    }
}

/// Resolves a query through the title index or as a raw vertex id.
///
/// `#<id>` always names a vertex. A bare number is tried as a title first
/// and only taken as an id when no title matches; links-only snapshots
/// have no titles, so there every query must be an id.
pub struct Lookup<'a> {
    graph: &'a Graph,
    titles: &'a TitleIndex,
    ids_only: bool,
}

impl Lookup<'_> {
    fn by_id(&self, raw: &str) -> Option<TitleMatch> {
        let id = raw.parse::<VertexId>().ok()?;
        if !self.graph.contains(id) {
            return None;
        }
        let title = self
            .graph
            .title(id)
            .map(str::to_string)
            .unwrap_or_else(|| format!("#{}", id));
        Some(TitleMatch {
            id,
            title,
            distance: 0,
        })
    }
}

impl TitleSearch for Lookup<'_> {
    fn search(&self, query: &str, limit: usize) -> wikipath_core::Result<Vec<TitleMatch>> {
        let trimmed = query.trim();
        if let Some(raw) = trimmed.strip_prefix('#') {
            return Ok(self.by_id(raw).into_iter().collect());
        }

        if self.ids_only {
            return match self.by_id(trimmed) {
                Some(hit) => Ok(vec![hit]),
                None => Err(wikipath_core::GraphError::InvalidQuery(format!(
                    "'{}' is not a loaded article id and this snapshot has no titles",
                    query
                ))),
            };
        }

        let matches = self.titles.search(query, limit)?;
        if matches.is_empty() {
            return Ok(self.by_id(trimmed).into_iter().collect());
        }
        Ok(matches)
    }
}
