use anyhow::{bail, Result};

use crate::state::Session;

/// List the closest titles for `query`, best first.
pub fn run(session: &Session, query: &str, limit: Option<u32>) -> Result<()> {
    if session.titles().is_empty() {
        bail!("snapshot has no titles to search; load a titled snapshot");
    }

    let limit = limit.unwrap_or(session.settings.search_limit) as usize;
    let matches = session.titles().search(query, limit)?;

    if matches.is_empty() {
        println!("No titles match '{}'.", query);
        return Ok(());
    }

    println!("{:>4} {:>8} {:>10}  title", "rank", "distance", "id");
    for (rank, m) in matches.iter().enumerate() {
        println!("{:>4} {:>8} {:>10}  {}", rank + 1, m.distance, m.id, m.title);
    }
    Ok(())
}
