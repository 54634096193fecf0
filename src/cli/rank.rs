//! CLI `match` command: rank stored persons against a job description.

use anyhow::Result;

use crate::config::MatcherConfig;
use crate::personality::{matching, persons, traits};

/// Run a one-off match and print the ranking.
pub fn rank(
    config: &MatcherConfig,
    company: &str,
    job_description: &str,
    limit: Option<usize>,
) -> Result<()> {
    let (persons_conn, traits_conn) = super::open_stores(config)?;

    let vocabulary = traits::list_traits(&traits_conn)?;
    let people = persons::list_persons(&persons_conn)?;

    let response = matching::find_matches(
        company,
        job_description,
        &people,
        &vocabulary,
        config.scoring.combine,
        limit,
    );

    println!("Matches for {}", response.company);
    println!("{}", "=".repeat(40));
    if response.matched_traits.is_empty() {
        println!("  Traits:   (none matched, ranking against origin)");
    } else {
        println!("  Traits:   {}", response.matched_traits.join(", "));
    }
    println!("  Target:   {}", response.target);
    println!();

    if response.matches.is_empty() {
        println!("No persons found.");
        return Ok(());
    }

    for (i, m) in response.matches.iter().enumerate() {
        println!("  {:>3}. {:<30} {:>8.3}  {}", i + 1, m.name, m.distance, m.score);
    }

    Ok(())
}
