//! wikipath: find a chain of links between two encyclopedia articles.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod config;
mod path;
mod search;
mod state;
mod status;

use config::Settings;
use path::StrategyChoice;
use state::Session;

#[derive(Parser)]
#[command(name = "wikipath", version, about = "Find a link path between two articles")]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    /// Debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Warnings only
    #[arg(long, short, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Load the snapshot and print graph statistics
    Status,
    /// List the closest article titles for a query
    Search {
        query: String,
        /// Number of results (defaults to --search-limit)
        #[arg(long, value_parser = clap::value_parser!(u32).range(1..=100))]
        limit: Option<u32>,
    },
    /// Find a path between two article names (or `#id`s)
    Path {
        from: String,
        to: String,
        #[arg(long, value_enum, default_value = "both")]
        strategy: StrategyChoice,
        /// IDDFS never revisits a vertex within a pass
        #[arg(long)]
        first_reach: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if cli.quiet {
        builder.filter_level(log::LevelFilter::Warn);
    } else if cli.verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Stderr).init();

    let session = Session::load(&cli.settings)?;

    match cli.command {
        Command::Status => status::run(&session),
        Command::Search { query, limit } => search::run(&session, &query, limit)?,
        Command::Path {
            from,
            to,
            strategy,
            first_reach,
        } => path::run(&session, &from, &to, strategy, first_reach)?,
    }

    Ok(())
}
