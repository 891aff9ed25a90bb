use std::path::PathBuf;

use clap::Args;
use wikipath_core::{SnapshotLayout, DEFAULT_MAX_DEPTH, DEFAULT_SEARCH_LIMIT};

/// Process-wide settings. Every flag can also come from the environment.
#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Snapshot file to load
    #[arg(long, global = true, env = "WIKIPATH_SNAPSHOT", default_value = "data.bin")]
    pub snapshot: PathBuf,

    /// Record layout of the snapshot: titled or links-only
    #[arg(
        long,
        global = true,
        env = "WIKIPATH_LAYOUT",
        default_value = "titled",
        value_parser = parse_layout
    )]
    pub layout: SnapshotLayout,

    /// Candidates fetched per title query
    #[arg(
        long,
        global = true,
        env = "WIKIPATH_SEARCH_LIMIT",
        default_value_t = DEFAULT_SEARCH_LIMIT as u32,
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub search_limit: u32,

    /// IDDFS depth cap in hops
    #[arg(
        long,
        global = true,
        env = "WIKIPATH_MAX_DEPTH",
        default_value_t = DEFAULT_MAX_DEPTH,
        value_parser = clap::value_parser!(u32).range(0..=64)
    )]
    pub max_depth: u32,

    /// Refuse snapshots whose in-memory graph exceeds this size
    #[arg(
        long,
        global = true,
        env = "WIKIPATH_MAX_MEMORY_MB",
        default_value_t = 4096,
        value_parser = clap::value_parser!(u32).range(64..=131072)
    )]
    pub max_memory_mb: u32,
}

fn parse_layout(s: &str) -> Result<SnapshotLayout, String> {
    s.parse()
}
