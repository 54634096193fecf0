use anyhow::{Context, Result};
use std::path::Path;

use super::export::ExportData;
use crate::config::MatcherConfig;
use crate::error::MatchError;
use crate::personality::traits::TraitLimits;
use crate::personality::{persons, traits};

/// Counts reported by an import run.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub traits_imported: u64,
    pub traits_skipped: u64,
    pub persons_imported: u64,
    pub persons_skipped: u64,
}

/// Import persons and traits from a JSON export file.
pub fn import(config: &MatcherConfig, file: &Path) -> Result<()> {
    let json = std::fs::read_to_string(file)
        .with_context(|| format!("failed to read import file: {}", file.display()))?;

    let data: ExportData = serde_json::from_str(&json).context("failed to parse import JSON")?;

    println!(
        "Importing {} traits and {} persons...",
        data.traits.len(),
        data.persons.len()
    );

    let summary = import_data(config, &data)?;

    println!("Import complete:");
    println!("  Traits imported:  {}", summary.traits_imported);
    println!("  Traits skipped:   {}", summary.traits_skipped);
    println!("  Persons imported: {}", summary.persons_imported);
    println!("  Persons skipped:  {}", summary.persons_skipped);

    Ok(())
}

/// Load `data` into the configured stores.
///
/// Names that already exist are skipped. Imported persons keep their score and
/// observation count; timestamps are reset to the import time.
pub fn import_data(config: &MatcherConfig, data: &ExportData) -> Result<ImportSummary> {
    let (mut persons_conn, traits_conn) = super::open_stores(config)?;
    let limits = TraitLimits {
        max_score: config.scoring.max_trait_score,
        max_name_len: config.scoring.max_name_len,
    };
    let mut summary = ImportSummary::default();

    for t in &data.traits {
        match traits::create_trait(&traits_conn, &t.name, t.score(), limits) {
            Ok(_) => summary.traits_imported += 1,
            Err(MatchError::DuplicateKey { .. }) => summary.traits_skipped += 1,
            Err(e @ MatchError::InvalidInput(_)) => {
                eprintln!("Warning: skipping trait '{}': {e}", t.name);
                summary.traits_skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    for p in &data.persons {
        let tx = persons_conn.transaction()?;
        match persons::create_person(&tx, &p.name, config.scoring.max_name_len) {
            Ok(created) => {
                persons::update_person_score(&tx, &created.name, p.score(), p.observations)?;
                tx.commit()?;
                summary.persons_imported += 1;
            }
            Err(MatchError::DuplicateKey { .. }) => summary.persons_skipped += 1,
            Err(e @ MatchError::InvalidInput(_)) => {
                eprintln!("Warning: skipping person '{}': {e}", p.name);
                summary.persons_skipped += 1;
            }
            Err(e) => return Err(e.into()),
        }
    }

    tracing::info!(
        traits = summary.traits_imported,
        persons = summary.persons_imported,
        "import finished"
    );
    Ok(summary)
}
