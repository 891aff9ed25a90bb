use std::time::Instant;

use anyhow::Result;
use clap::ValueEnum;
use log::info;
use wikipath_core::{display_titles, Resolver, Strategy, VisitPolicy};

use crate::state::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyChoice {
    Bfs,
    Iddfs,
    Both,
}

/// Resolve both names, then run the chosen strategies and print each path.
pub fn run(
    session: &Session,
    from: &str,
    to: &str,
    choice: StrategyChoice,
    first_reach: bool,
) -> Result<()> {
    let iddfs = Strategy::Iddfs {
        max_depth: session.settings.max_depth,
        policy: if first_reach {
            VisitPolicy::FirstReach
        } else {
            VisitPolicy::ShallowestDepth
        },
    };
    let strategies = match choice {
        StrategyChoice::Bfs => vec![Strategy::Bfs],
        StrategyChoice::Iddfs => vec![iddfs],
        StrategyChoice::Both => vec![Strategy::Bfs, iddfs],
    };

    let lookup = session.lookup();
    let resolver = Resolver::new(session.graph(), &lookup)
        .with_search_limit(session.settings.search_limit as usize);

    let (from_match, to_match) = resolver.resolve_endpoints(from, to)?;
    println!("From: {} ({})", from_match.title, from_match.id);
    println!("To:   {} ({})", to_match.title, to_match.id);

    for strategy in strategies {
        let t = Instant::now();
        let search = strategy.run(session.graph(), from_match.id, to_match.id);
        let elapsed_ms = t.elapsed().as_secs_f64() * 1000.0;
        info!(
            "{} visited {} vertices in {:.1}ms",
            strategy.name(),
            search.nodes_visited,
            elapsed_ms
        );

        let label = match strategy {
            Strategy::Bfs => "BFS".to_string(),
            Strategy::Iddfs { max_depth, .. } => format!("IDDFS (cap {})", max_depth),
        };

        println!();
        match search.hops() {
            Some(hops) => {
                println!("{}: {} hops in {:.1}ms", label, hops, elapsed_ms);
                let titles = display_titles(session.graph(), &search.path)?;
                for (step, title) in titles.iter().enumerate() {
                    println!("  {}. {}", step + 1, title);
                }
            }
            None => println!("{}: no path found ({:.1}ms)", label, elapsed_ms),
        }
    }

    Ok(())
}
