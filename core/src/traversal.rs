use std::collections::{HashMap, VecDeque};
use std::str::FromStr;

use log::debug;

use crate::graph::{Graph, VertexId};

/// Vertices from source to target inclusive. Empty means "not found".
pub type Path = Vec<VertexId>;

/// Default IDDFS depth cap in hops.
pub const DEFAULT_MAX_DEPTH: u32 = 9;

/// How a depth-limited pass treats a vertex it has already reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VisitPolicy {
    /// Re-expand a vertex when it is reached again at a shallower depth.
    /// Every pass finds a path whenever one fits within its limit.
    #[default]
    ShallowestDepth,
    /// Never revisit within a pass. A vertex first reached through a long
    /// branch blocks shorter routes through it, so a pass can miss paths
    /// that fit its limit.
    FirstReach,
}

/// Path search algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Bfs,
    Iddfs { max_depth: u32, policy: VisitPolicy },
}

impl Strategy {
    pub fn iddfs(max_depth: u32) -> Self {
        Strategy::Iddfs {
            max_depth,
            policy: VisitPolicy::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Bfs => "BFS",
            Strategy::Iddfs { .. } => "IDDFS",
        }
    }

    pub fn run(&self, graph: &Graph, from: VertexId, to: VertexId) -> PathSearch {
        match *self {
            Strategy::Bfs => bfs_search(graph, from, to),
            Strategy::Iddfs { max_depth, policy } => iddfs_search(graph, from, to, max_depth, policy),
        }
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bfs" => Ok(Strategy::Bfs),
            "iddfs" => Ok(Strategy::iddfs(DEFAULT_MAX_DEPTH)),
            other => Err(format!("unknown strategy '{}', expected 'bfs' or 'iddfs'", other)),
        }
    }
}

/// Outcome of a path search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathSearch {
    pub path: Path,
    /// Distinct vertices marked during the search (summed over IDDFS passes).
    pub nodes_visited: usize,
    /// BFS: deepest level expanded. IDDFS: limit of the last pass run.
    pub depth: u32,
}

impl PathSearch {
    pub fn found(&self) -> bool {
        !self.path.is_empty()
    }

    /// Number of links followed, if a path was found.
    pub fn hops(&self) -> Option<usize> {
        self.path.len().checked_sub(1)
    }
}

/// Per-vertex depth marks: a dense slot per id up to `max_id`, with a sparse
/// overflow for link targets outside the loaded id range. Graphs whose id
/// space is far sparser than their vertex count use the overflow map only.
struct DepthMarks {
    dense: Vec<u32>,
    overflow: HashMap<VertexId, u32>,
    marked: usize,
}

impl DepthMarks {
    const UNSEEN: u32 = u32::MAX;
    /// Dense slots allowed per loaded vertex before falling back to sparse.
    const MAX_SLOTS_PER_VERTEX: usize = 16;

    fn for_graph(graph: &Graph) -> Self {
        let slots = graph.max_id() as usize + 1;
        let budget = graph.vertex_count().saturating_mul(Self::MAX_SLOTS_PER_VERTEX) + 1024;
        let dense = if slots <= budget {
            vec![Self::UNSEEN; slots]
        } else {
            Vec::new()
        };
        Self {
            dense,
            overflow: HashMap::new(),
            marked: 0,
        }
    }

    fn get(&self, id: VertexId) -> Option<u32> {
        let depth = match self.dense.get(id as usize) {
            Some(&d) => d,
            None => self.overflow.get(&id).copied().unwrap_or(Self::UNSEEN),
        };
        (depth != Self::UNSEEN).then_some(depth)
    }

    /// Record `depth` for `id` if it is unseen, or if `shallower_wins` and
    /// `depth` beats the recorded one. Returns whether the mark changed.
    fn mark(&mut self, id: VertexId, depth: u32, shallower_wins: bool) -> bool {
        let slot = match self.dense.get_mut(id as usize) {
            Some(slot) => slot,
            None => self.overflow.entry(id).or_insert(Self::UNSEEN),
        };
        if *slot == Self::UNSEEN {
            *slot = depth;
            self.marked += 1;
            true
        } else if shallower_wins && depth < *slot {
            *slot = depth;
            true
        } else {
            false
        }
    }

    fn clear(&mut self) {
        self.dense.fill(Self::UNSEEN);
        self.overflow.clear();
        self.marked = 0;
    }

    fn len(&self) -> usize {
        self.marked
    }
}

/// Shortest path from `from` to `to` following outbound links (BFS).
pub fn shortest_path(graph: &Graph, from: VertexId, to: VertexId) -> Path {
    bfs_search(graph, from, to).path
}

/// Level-synchronous BFS with parent pointers.
///
/// Each level is drained before the next is admitted, so the first discovery
/// of `to` is along a shortest path. Among equally short paths the one whose
/// parents appear first in link order wins.
pub fn bfs_search(graph: &Graph, from: VertexId, to: VertexId) -> PathSearch {
    if from == to {
        return PathSearch {
            path: vec![from],
            nodes_visited: 1,
            depth: 0,
        };
    }
    if !graph.contains(from) {
        debug!("bfs: source {} is not a loaded vertex", from);
    }

    let mut marks = DepthMarks::for_graph(graph);
    let mut parents: HashMap<VertexId, VertexId> = HashMap::new();
    let mut queue: VecDeque<VertexId> = VecDeque::new();

    marks.mark(from, 0, false);
    queue.push_back(from);
    let mut depth = 0u32;

    while !queue.is_empty() {
        let level = depth + 1;
        let mut remaining = queue.len();
        let mut expanded = false;

        while remaining > 0 {
            remaining -= 1;
            let Some(current) = queue.pop_front() else { break };

            for &link in graph.links(current) {
                if !marks.mark(link, level, false) {
                    continue;
                }
                parents.insert(link, current);
                if link == to {
                    return PathSearch {
                        path: reconstruct_path(&parents, from, to),
                        nodes_visited: marks.len(),
                        depth: level,
                    };
                }
                queue.push_back(link);
                expanded = true;
            }
        }

        if expanded {
            depth = level;
        }
    }

    PathSearch {
        path: Vec::new(),
        nodes_visited: marks.len(),
        depth,
    }
}

/// Path of at most `max_depth` hops (IDDFS, default visit policy).
pub fn bounded_path(graph: &Graph, from: VertexId, to: VertexId, max_depth: u32) -> Path {
    iddfs_search(graph, from, to, max_depth, VisitPolicy::default()).path
}

/// Iterative deepening: depth-limited passes with limits `0..=max_depth`,
/// returning the first pass that reaches `to`.
///
/// An empty path means nothing was found within the cap; a longer path may
/// still exist.
pub fn iddfs_search(
    graph: &Graph,
    from: VertexId,
    to: VertexId,
    max_depth: u32,
    policy: VisitPolicy,
) -> PathSearch {
    let mut marks = DepthMarks::for_graph(graph);
    let mut parents: HashMap<VertexId, VertexId> = HashMap::new();
    let mut nodes_visited = 0usize;

    for limit in 0..=max_depth {
        marks.clear();
        parents.clear();

        let found = depth_limited_search(graph, from, to, limit, policy, &mut marks, &mut parents);
        nodes_visited += marks.len();

        if found {
            return PathSearch {
                path: reconstruct_path(&parents, from, to),
                nodes_visited,
                depth: limit,
            };
        }
        debug!("iddfs: limit {} exhausted after {} vertices", limit, marks.len());
    }

    PathSearch {
        path: Vec::new(),
        nodes_visited,
        depth: max_depth,
    }
}

/// Stack-based DFS that never goes deeper than `limit` hops from `from`.
fn depth_limited_search(
    graph: &Graph,
    from: VertexId,
    to: VertexId,
    limit: u32,
    policy: VisitPolicy,
    marks: &mut DepthMarks,
    parents: &mut HashMap<VertexId, VertexId>,
) -> bool {
    marks.mark(from, 0, false);
    if from == to {
        return true;
    }

    let shallower_wins = policy == VisitPolicy::ShallowestDepth;
    let mut stack: Vec<(VertexId, u32)> = vec![(from, 0)];

    while let Some((current, depth)) = stack.pop() {
        if depth >= limit {
            continue;
        }
        // Superseded by a shallower visit pushed later.
        if marks.get(current).is_some_and(|d| d < depth) {
            continue;
        }

        for &link in graph.links(current) {
            if !marks.mark(link, depth + 1, shallower_wins) {
                continue;
            }
            parents.insert(link, current);
            if link == to {
                return true;
            }
            stack.push((link, depth + 1));
        }
    }

    false
}

/// Walk parent pointers from `to` back to `from`.
fn reconstruct_path(parents: &HashMap<VertexId, VertexId>, from: VertexId, to: VertexId) -> Path {
    let mut path = vec![to];
    let mut current = to;

    while current != from {
        match parents.get(&current) {
            Some(&parent) => {
                path.push(parent);
                current = parent;
            }
            None => return Vec::new(),
        }
    }

    path.reverse();
    path
}
