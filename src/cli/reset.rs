//! CLI `reset` command: delete all persons and traits after user confirmation.

use anyhow::{bail, Result};
use std::io::Write;

use crate::config::MatcherConfig;

/// Delete all persons and traits after user confirmation.
pub fn reset(config: &MatcherConfig) -> Result<()> {
    println!("WARNING: This will permanently delete ALL persons and traits.");
    println!("Persons database: {}", config.resolved_persons_db().display());
    println!("Traits database:  {}", config.resolved_traits_db().display());
    print!("\nType YES to confirm: ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;

    if input.trim() != "YES" {
        bail!("reset cancelled");
    }

    let (persons, traits) = wipe(config)?;
    println!("Deleted {persons} persons and {traits} traits. Reset complete.");
    Ok(())
}

/// Delete every row from both stores. Returns `(persons, traits)` deleted.
pub fn wipe(config: &MatcherConfig) -> Result<(usize, usize)> {
    let (persons_conn, traits_conn) = super::open_stores(config)?;
    let persons = persons_conn.execute("DELETE FROM persons", [])?;
    let traits = traits_conn.execute("DELETE FROM traits", [])?;

    tracing::info!(persons, traits, "stores reset");
    Ok((persons, traits))
}
