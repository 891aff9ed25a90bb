use std::collections::HashMap;

/// Article identifier as stored in the snapshot.
pub type VertexId = u32;

/// A single article: its outbound links and, in titled snapshots, its title.
///
/// Links keep snapshot order. Duplicates and self-loops are preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Article {
    pub id: VertexId,
    pub title: Option<String>,
    pub links: Vec<VertexId>,
}

/// In-memory link graph: article id → article.
///
/// Link targets do not have to be loaded vertices themselves; a target
/// without an entry behaves as a vertex with no outbound links.
pub struct Graph {
    articles: HashMap<VertexId, Article>,
    edge_count: usize,
    max_id: VertexId,
}

impl Graph {
    pub fn new() -> Self {
        Self {
            articles: HashMap::new(),
            edge_count: 0,
            max_id: 0,
        }
    }

    /// Pre-allocate for a known vertex count.
    pub fn with_capacity(vertex_count: usize) -> Self {
        Self {
            articles: HashMap::with_capacity(vertex_count),
            edge_count: 0,
            max_id: 0,
        }
    }

    /// Insert an article, replacing any earlier article with the same id.
    ///
    /// Returns true if the id was not present before.
    pub fn add_article(&mut self, id: VertexId, title: Option<String>, links: Vec<VertexId>) -> bool {
        self.edge_count += links.len();
        if id > self.max_id {
            self.max_id = id;
        }
        match self.articles.insert(id, Article { id, title, links }) {
            Some(previous) => {
                self.edge_count -= previous.links.len();
                false
            }
            None => true,
        }
    }

    /// Bulk load from `(from, to)` pairs. Sources are created untitled on
    /// first sight; targets are not registered as vertices.
    pub fn load_links<I>(&mut self, links: I)
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        for (from, to) in links {
            if from > self.max_id {
                self.max_id = from;
            }
            self.articles
                .entry(from)
                .or_insert_with(|| Article {
                    id: from,
                    title: None,
                    links: Vec::new(),
                })
                .links
                .push(to);
            self.edge_count += 1;
        }
    }

    pub fn article(&self, id: VertexId) -> Option<&Article> {
        self.articles.get(&id)
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.articles.contains_key(&id)
    }

    /// Title of a loaded article, if the snapshot carried one.
    pub fn title(&self, id: VertexId) -> Option<&str> {
        self.articles.get(&id).and_then(|a| a.title.as_deref())
    }

    /// Outbound links of `id`. Unloaded ids have none.
    pub fn links(&self, id: VertexId) -> &[VertexId] {
        self.articles
            .get(&id)
            .map(|a| a.links.as_slice())
            .unwrap_or(&[])
    }

    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.articles.values()
    }

    /// Loaded vertex ids in ascending order.
    pub fn sorted_ids(&self) -> Vec<VertexId> {
        let mut ids: Vec<VertexId> = self.articles.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn vertex_count(&self) -> usize {
        self.articles.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Largest loaded source id. Bounds dense visited bitmaps.
    pub fn max_id(&self) -> VertexId {
        self.max_id
    }

    /// Average out-degree (`edges / vertices`), 0 for an empty graph.
    pub fn density(&self) -> f64 {
        if self.articles.is_empty() {
            return 0.0;
        }
        self.edge_count as f64 / self.articles.len() as f64
    }

    /// Approximate memory usage in bytes.
    pub fn memory_usage(&self) -> usize {
        use std::mem::size_of;

        let per_article = size_of::<VertexId>() + size_of::<Article>() + 16;
        let titles: usize = self
            .articles
            .values()
            .filter_map(|a| a.title.as_ref())
            .map(|t| t.capacity())
            .sum();
        let links = self.edge_count * size_of::<VertexId>();

        self.articles.len() * per_article + titles + links
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new()
    }
}
