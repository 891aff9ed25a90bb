use wikipath_core::SnapshotLayout;

use crate::state::Session;

/// Print load statistics for the session's snapshot.
pub fn run(session: &Session) {
    let graph = session.graph();
    let layout = match session.snapshot.layout {
        SnapshotLayout::Titled => "titled",
        SnapshotLayout::LinksOnly => "links-only",
    };

    println!("snapshot:       {}", session.settings.snapshot.display());
    println!("layout:         {}", layout);
    println!("vertices:       {}", graph.vertex_count());
    println!("edges:          {}", graph.edge_count());
    println!("density:        {:.2}", graph.density());
    println!("max id:         {}", graph.max_id());
    println!("titles indexed: {}", session.titles().len());
    println!(
        "memory:         ~{:.1}MB",
        graph.memory_usage() as f64 / 1_048_576.0
    );
    println!("load time:      {:.1}ms", session.snapshot.load_time_ms);
}
