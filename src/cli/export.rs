use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::config::MatcherConfig;
use crate::personality::types::{Person, Trait};
use crate::personality::{persons, traits};

/// Export format: every person and trait. Also the `import` input format.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExportData {
    #[serde(default)]
    pub persons: Vec<Person>,
    #[serde(default)]
    pub traits: Vec<Trait>,
}

/// Read every person and trait from the configured stores.
pub fn collect(config: &MatcherConfig) -> Result<ExportData> {
    let (persons_conn, traits_conn) = super::open_stores(config)?;

    Ok(ExportData {
        persons: persons::list_persons(&persons_conn)?,
        traits: traits::list_traits(&traits_conn)?,
    })
}

/// Export both stores as JSON to stdout.
pub fn export(config: &MatcherConfig) -> Result<()> {
    let data = collect(config)?;

    let json = serde_json::to_string_pretty(&data)?;
    println!("{json}");

    eprintln!(
        "Exported {} persons and {} traits.",
        data.persons.len(),
        data.traits.len()
    );

    Ok(())
}
