pub mod doctor;
pub mod export;
pub mod import;
pub mod rank;
pub mod reset;

use anyhow::Result;
use rusqlite::Connection;

use crate::config::MatcherConfig;
use crate::db::{self, StoreKind};

/// Open both stores at their configured paths: `(persons, traits)`.
fn open_stores(config: &MatcherConfig) -> Result<(Connection, Connection)> {
    let persons = db::open_database(config.resolved_persons_db(), StoreKind::Persons)?;
    let traits = db::open_database(config.resolved_traits_db(), StoreKind::Traits)?;
    Ok((persons, traits))
}
