use std::collections::VecDeque;
use std::time::Instant;

use wikipath_core::{
    bfs_search, iddfs_search, Graph, PathSearch, Snapshot, SnapshotLayout, VertexId, VisitPolicy,
    DEFAULT_MAX_DEPTH,
};

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mode = args.get(1).map(|s| s.as_str()).unwrap_or("all");

    if mode == "help" || mode == "--help" {
        println!("Usage: wikipath-bench [mode] [node_count]");
        println!("       wikipath-bench snapshot <path> [runs] [titled|links-only]");
        println!();
        println!("Modes:");
        println!("  all         Run all generators and benchmark each (default)");
        println!("  lsystem     Fractal branching tree (deep paths)");
        println!("  scalefree   Preferential attachment via edge sampling (hub-and-spoke)");
        println!("  smallworld  Watts-Strogatz ring lattice + shortcuts");
        println!("  random      Erdos-Renyi uniform random links");
        println!("  barbell     Two dense cliques connected by a thin bridge");
        println!("  dla         Diffusion-limited aggregation (organic branching)");
        println!("  snapshot    Load a snapshot file and race BFS/IDDFS between random pairs");
        println!();
        println!("Default node_count: 1000000");
        return;
    }

    if mode == "snapshot" {
        run_snapshot(&args[2..]);
        return;
    }

    let node_count: u32 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(1_000_000);

    println!("wikipath-bench");
    println!("==============");
    println!();

    let generators: Vec<(&str, fn(u32) -> Graph)> = match mode {
        "lsystem" => vec![("L-system tree", gen_lsystem)],
        "scalefree" => vec![("Scale-free (edge sampling)", gen_scale_free)],
        "smallworld" => vec![("Small-world (Watts-Strogatz)", gen_small_world)],
        "random" => vec![("Erdos-Renyi random", gen_random)],
        "barbell" => vec![("Barbell (clique-bridge-clique)", gen_barbell)],
        "dla" => vec![("DLA (organic branching)", gen_dla)],
        "all" => vec![
            ("L-system tree", gen_lsystem as fn(u32) -> Graph),
            ("Scale-free (edge sampling)", gen_scale_free),
            ("Small-world (Watts-Strogatz)", gen_small_world),
            ("Erdos-Renyi random", gen_random),
            ("Barbell (clique-bridge-clique)", gen_barbell),
            ("DLA (organic branching)", gen_dla),
        ],
        _ => {
            eprintln!("Unknown mode: {}. Use --help for options.", mode);
            return;
        }
    };

    for (name, generator) in generators {
        run_benchmark(name, generator, node_count);
    }
}

fn run_benchmark(name: &str, generator: fn(u32) -> Graph, node_count: u32) {
    println!("--- {} ---", name);
    println!("Target: {} nodes", node_count);

    let t = Instant::now();
    let graph = generator(node_count);
    let gen_time = t.elapsed();
    println!(
        "Generated in {:.2}s: {} nodes, {} links, density {:.2}, ~{:.0}MB",
        gen_time.as_secs_f64(),
        graph.vertex_count(),
        graph.edge_count(),
        graph.density(),
        graph.memory_usage() as f64 / 1_048_576.0
    );

    // Snapshot codec round trip through memory
    let mut bytes = Vec::new();
    let t = Instant::now();
    if let Err(e) = wikipath_core::write_to(&mut bytes, &graph, SnapshotLayout::LinksOnly) {
        eprintln!("encode failed: {}", e);
        return;
    }
    let encode_ms = t.elapsed().as_secs_f64() * 1000.0;
    match Snapshot::read_from(bytes.as_slice(), SnapshotLayout::LinksOnly) {
        Ok(snap) => println!(
            "Snapshot: {:.1}MB, encoded in {:.1}ms, loaded in {:.1}ms",
            bytes.len() as f64 / 1_048_576.0,
            encode_ms,
            snap.load_time_ms
        ),
        Err(e) => eprintln!("decode failed: {}", e),
    }
    drop(bytes);

    if graph.vertex_count() == 0 {
        println!();
        return;
    }

    // Node 0 to last node, then progressively tighter IDDFS caps
    let far_node = graph.vertex_count() as VertexId - 1;
    println!();
    println!(
        "{:>10} {:>8} {:>8} {:>12} {:>10}",
        "strategy", "cap", "hops", "visited", "time"
    );
    println!("{:->10} {:->8} {:->8} {:->12} {:->10}", "", "", "", "", "");

    let t = Instant::now();
    let bfs = bfs_search(&graph, 0, far_node);
    print_row("BFS", None, &bfs, t.elapsed().as_secs_f64());

    for cap in [3, 5, DEFAULT_MAX_DEPTH] {
        let t = Instant::now();
        let result = iddfs_search(&graph, 0, far_node, cap, VisitPolicy::ShallowestDepth);
        print_row("IDDFS", Some(cap), &result, t.elapsed().as_secs_f64());
    }
    let t = Instant::now();
    let result = iddfs_search(&graph, 0, far_node, DEFAULT_MAX_DEPTH, VisitPolicy::FirstReach);
    print_row("IDDFS-fr", Some(DEFAULT_MAX_DEPTH), &result, t.elapsed().as_secs_f64());
    println!();
}

fn print_row(strategy: &str, cap: Option<u32>, result: &PathSearch, secs: f64) {
    println!(
        "{:>10} {:>8} {:>8} {:>12} {:>8.1}ms",
        strategy,
        cap.map(|c| c.to_string()).unwrap_or_else(|| "-".into()),
        result
            .hops()
            .map(|h| h.to_string())
            .unwrap_or_else(|| "none".into()),
        result.nodes_visited,
        secs * 1000.0
    );
}

/// Load a real snapshot and run BFS and IDDFS between pseudo-random pairs.
fn run_snapshot(args: &[String]) {
    let Some(path) = args.first() else {
        eprintln!("snapshot mode needs a file path. Use --help for options.");
        return;
    };
    let runs: usize = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(10);
    let layout = match args.get(2).map(|s| s.parse::<SnapshotLayout>()) {
        None => SnapshotLayout::Titled,
        Some(Ok(layout)) => layout,
        Some(Err(e)) => {
            eprintln!("{}", e);
            return;
        }
    };

    let snap = match Snapshot::load(path, layout) {
        Ok(snap) => snap,
        Err(e) => {
            eprintln!("failed to load {}: {}", path, e);
            return;
        }
    };
    let graph = &snap.graph;
    println!(
        "Loaded {} in {:.1}ms: {} articles, {} links, density {:.2}",
        path,
        snap.load_time_ms,
        graph.vertex_count(),
        graph.edge_count(),
        graph.density()
    );

    let ids = graph.sorted_ids();
    if ids.is_empty() {
        println!("Snapshot is empty.");
        return;
    }

    let mut rng = FastRng::new(2023);
    let name = |id: VertexId| graph.title(id).map(str::to_string).unwrap_or_else(|| format!("#{}", id));

    for run in 1..=runs {
        let from = ids[rng.next(ids.len() as u64) as usize];
        let to = ids[rng.next(ids.len() as u64) as usize];

        let t = Instant::now();
        let bfs = bfs_search(graph, from, to);
        let bfs_secs = t.elapsed().as_secs_f64();
        let t = Instant::now();
        let iddfs = iddfs_search(graph, from, to, DEFAULT_MAX_DEPTH, VisitPolicy::default());
        let iddfs_secs = t.elapsed().as_secs_f64();

        println!();
        println!("#{} {} → {}", run, name(from), name(to));
        print_row("BFS", None, &bfs, bfs_secs);
        print_row("IDDFS", Some(DEFAULT_MAX_DEPTH), &iddfs, iddfs_secs);
        if bfs.found() {
            let titles: Vec<String> = bfs.path.iter().map(|&id| name(id)).collect();
            println!("  {}", titles.join(" → "));
        }
    }
}

// ---------------------------------------------------------------------------
// Generators: all O(n) or O(n + links), single-threaded, deterministic
// ---------------------------------------------------------------------------

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
    fn next_f64(&mut self) -> f64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 11) as f64 / (1u64 << 53) as f64
    }
}

/// Adjacency lists indexed by id, turned into titled articles at the end.
fn build(adjacency: Vec<Vec<VertexId>>, prefix: &str) -> Graph {
    let mut graph = Graph::with_capacity(adjacency.len());
    for (id, links) in adjacency.into_iter().enumerate() {
        graph.add_article(id as VertexId, Some(format!("{} {}", prefix, id)), links);
    }
    graph
}

/// L-system fractal tree: deep branching with self-similar structure.
///
/// Each node links to `branching` children. Produces deep paths (log depth)
/// with exponential width. Tests deep BFS and path reconstruction.
fn gen_lsystem(node_count: u32) -> Graph {
    let mut adjacency: Vec<Vec<VertexId>> = vec![Vec::new(); node_count as usize];
    let branching = 3u32;

    let mut next_id: u32 = 1;
    let mut frontier: Vec<u32> = vec![0];

    while next_id < node_count && !frontier.is_empty() {
        let mut next_frontier = Vec::with_capacity(frontier.len() * branching as usize);
        for &parent in &frontier {
            for _ in 0..branching {
                if next_id >= node_count {
                    break;
                }
                adjacency[parent as usize].push(next_id);
                next_frontier.push(next_id);
                next_id += 1;
            }
        }
        frontier = next_frontier;
    }

    build(adjacency, "Branch")
}

/// Scale-free via link-list sampling (O(links), not O(n²)).
///
/// Preferential attachment by picking a random existing link endpoint.
/// Older pages link back to newcomers occasionally so hubs stay reachable.
fn gen_scale_free(node_count: u32) -> Graph {
    let links_per_node = 10u64;
    let mut adjacency: Vec<Vec<VertexId>> = vec![Vec::new(); node_count as usize];
    let mut rng = FastRng::new(12345);
    let mut endpoints: Vec<u32> = Vec::with_capacity((node_count as u64 * links_per_node * 2) as usize);

    // Seed: small clique
    let seed = 5u32.min(node_count);
    for i in 0..seed {
        for j in 0..seed {
            if i != j {
                adjacency[i as usize].push(j);
                endpoints.push(i);
                endpoints.push(j);
            }
        }
    }

    for new_node in seed..node_count {
        let attach = links_per_node.min(new_node as u64);
        for _ in 0..attach {
            let target = endpoints[rng.next(endpoints.len() as u64) as usize];
            if target == new_node {
                continue;
            }
            adjacency[new_node as usize].push(target);
            if rng.next(3) == 0 {
                adjacency[target as usize].push(new_node);
            }
            endpoints.push(new_node);
            endpoints.push(target);
        }
    }

    build(adjacency, "Concept")
}

/// Small-world (Watts-Strogatz): ring lattice + random rewiring.
///
/// Each node links to K forward neighbors on a ring, each link rewired with
/// probability p. High clustering, short paths.
fn gen_small_world(node_count: u32) -> Graph {
    let k = 10u32;
    let p = 0.05f64;
    let mut adjacency: Vec<Vec<VertexId>> = vec![Vec::new(); node_count as usize];
    let mut rng = FastRng::new(67890);

    for i in 0..node_count {
        for j in 1..=k {
            let neighbor = ((i as u64 + j as u64) % node_count as u64) as u32;
            let target = if rng.next_f64() < p {
                let rewired = rng.next(node_count as u64) as u32;
                if rewired != i {
                    rewired
                } else {
                    neighbor
                }
            } else {
                neighbor
            };
            adjacency[i as usize].push(target);
        }
    }

    build(adjacency, "Concept")
}

/// Erdos-Renyi: uniform random links, ~10 per node on average.
fn gen_random(node_count: u32) -> Graph {
    let target_links = node_count as u64 * 10;
    let mut adjacency: Vec<Vec<VertexId>> = vec![Vec::new(); node_count as usize];
    let mut rng = FastRng::new(54321);

    for _ in 0..target_links {
        let from = rng.next(node_count as u64) as usize;
        let to = rng.next(node_count as u64) as u32;
        if from as u32 != to {
            adjacency[from].push(to);
        }
    }

    build(adjacency, "Concept")
}

/// Barbell: two dense cliques joined by a one-way chain of ~10 bridge nodes.
///
/// Worst case for "find path through bottleneck".
fn gen_barbell(node_count: u32) -> Graph {
    let bridge_len = 10u32;
    let clique_size = node_count.saturating_sub(bridge_len) / 2;
    let total = clique_size * 2 + bridge_len;
    let mut adjacency: Vec<Vec<VertexId>> = vec![Vec::new(); total as usize];
    let mut rng = FastRng::new(99999);

    if clique_size < 2 {
        return build(adjacency, "Bridge");
    }

    // Clique A: 0..clique_size, ~20 random links each
    for i in 0..clique_size {
        for _ in 0..20u32.min(clique_size - 1) {
            let target = rng.next(clique_size as u64) as u32;
            if target != i {
                adjacency[i as usize].push(target);
            }
        }
    }

    // Bridge: chain from the last node of A to the first node of B
    let bridge_start = clique_size;
    adjacency[(clique_size - 1) as usize].push(bridge_start);
    for id in bridge_start..bridge_start + bridge_len {
        adjacency[id as usize].push(id + 1);
    }

    // Clique B
    let b_start = bridge_start + bridge_len;
    for i in 0..clique_size {
        for _ in 0..20u32.min(clique_size - 1) {
            let target = rng.next(clique_size as u64) as u32;
            if target != i {
                adjacency[(b_start + i) as usize].push(b_start + target);
            }
        }
    }

    build(adjacency, "Cluster")
}

/// DLA (Diffusion-Limited Aggregation): organic branching growth.
///
/// Each new node links from a random recent "surface" node, with occasional
/// long-range shortcuts.
fn gen_dla(node_count: u32) -> Graph {
    let mut adjacency: Vec<Vec<VertexId>> = vec![Vec::new(); node_count as usize];
    let mut rng = FastRng::new(77777);

    // Recent additions that new particles attach to; oldest evicted first.
    let mut surface: VecDeque<u32> = VecDeque::with_capacity(10001);
    surface.push_back(0);
    let surface_max = 10000usize;

    for new_node in 1..node_count {
        let attach_to = surface[rng.next(surface.len() as u64) as usize];
        adjacency[attach_to as usize].push(new_node);

        // 10% chance of a second link (creates loops / shortcuts)
        if rng.next(10) == 0 && new_node > 1 {
            let other = rng.next(new_node as u64) as u32;
            if other != attach_to {
                adjacency[new_node as usize].push(other);
            }
        }

        surface.push_back(new_node);
        if surface.len() > surface_max {
            surface.pop_front();
        }
    }

    build(adjacency, "Particle")
}
