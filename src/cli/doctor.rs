//! CLI `doctor` command: run diagnostics on both stores and print a health report.

use anyhow::{Context, Result};
use std::path::Path;

use crate::config::MatcherConfig;
use crate::db::{self, StoreKind};

/// Run diagnostics on both stores and print a health report.
pub fn doctor(config: &MatcherConfig) -> Result<()> {
    println!("traits-matcher Health Report");
    println!("============================");

    let mut healthy = true;
    for (kind, path) in [
        (StoreKind::Persons, config.resolved_persons_db()),
        (StoreKind::Traits, config.resolved_traits_db()),
    ] {
        println!();
        healthy &= report_store(kind, &path)?;
    }

    println!();
    println!("Scoring:");
    println!("  Combine rule:      {}", config.scoring.combine);
    println!("  Max trait score:   {}", config.scoring.max_trait_score);

    if !healthy {
        println!();
        println!("Recovery steps:");
        println!("  1. Restore from a backup copy of the failing database file.");
        println!("  2. Or export from a good copy and reimport:");
        println!("     traits-matcher export > backup.json");
        println!("     traits-matcher reset && traits-matcher import backup.json");
    }

    Ok(())
}

/// Print one store's section. Returns false if its integrity check failed.
fn report_store(kind: StoreKind, path: &Path) -> Result<bool> {
    println!("Store: {kind}");
    println!("  Path:              {}", path.display());

    if !path.exists() {
        println!("  Status:            not found (created on first `serve`)");
        return Ok(true);
    }

    let file_size = std::fs::metadata(path).map(|m| m.len()).unwrap_or(0);

    let conn = db::open_database(path, kind)
        .with_context(|| format!("failed to open {kind} database (may be corrupt)"))?;
    let report = db::check_database_health(&conn, kind)
        .with_context(|| format!("failed to run health check on {kind}"))?;

    println!("  File size:         {}", format_bytes(file_size));
    println!("  Schema version:    {}", report.schema_version);
    println!("  Rows:              {}", report.row_count);
    if report.integrity_ok {
        println!("  Integrity check:   PASSED");
    } else {
        println!("  Integrity check:   FAILED ({})", report.integrity_details);
    }

    Ok(report.integrity_ok)
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{bytes} B")
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_bytes_units() {
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(2048), "2.0 KB");
        assert_eq!(format_bytes(3 * 1024 * 1024), "3.0 MB");
    }
}
