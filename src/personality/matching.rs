//! Matcher: rank persons by distance to a job-description target.

use serde::Serialize;

use crate::personality::analyze::{analyze, Combine};
use crate::personality::types::{Person, ScoreVector, Trait};

/// One ranked person.
#[derive(Debug, Clone, Serialize)]
pub struct PersonMatch {
    pub name: String,
    pub distance: f64,
    pub score: ScoreVector,
}

/// Response from a find-matches operation.
#[derive(Debug, Serialize)]
pub struct MatchResponse {
    pub company: String,
    /// Target vector built from the job description.
    pub target: ScoreVector,
    /// Traits the job description mentioned.
    pub matched_traits: Vec<String>,
    /// Persons closest-first.
    pub matches: Vec<PersonMatch>,
}

impl MatchResponse {
    /// Ranked person names, closest first.
    pub fn names(&self) -> Vec<&str> {
        self.matches.iter().map(|m| m.name.as_str()).collect()
    }
}

/// Sort persons ascending by distance to `target`, ties by name.
pub fn rank_persons(persons: &[Person], target: ScoreVector) -> Vec<PersonMatch> {
    let mut ranked: Vec<PersonMatch> = persons
        .iter()
        .map(|p| PersonMatch {
            name: p.name.clone(),
            distance: p.score().distance(&target),
            score: p.score(),
        })
        .collect();

    ranked.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then_with(|| a.name.cmp(&b.name))
    });
    ranked
}

/// Build a target from `job_description` and rank `persons` against it.
///
/// The target starts at the origin: a job is not a person and has no baseline.
/// `limit` truncates the ranking; `None` returns everyone.
pub fn find_matches(
    company: &str,
    job_description: &str,
    persons: &[Person],
    traits: &[Trait],
    rule: Combine,
    limit: Option<usize>,
) -> MatchResponse {
    let analysis = analyze(job_description, traits, rule);
    let target = ScoreVector::ORIGIN + analysis.delta;

    if analysis.matched.is_empty() {
        tracing::info!(company = %company, "no traits found in job description, ranking against origin");
    } else {
        tracing::info!(company = %company, target = %target, "calculated target personality");
    }

    let mut matches = rank_persons(persons, target);
    if let Some(limit) = limit {
        matches.truncate(limit);
    }

    tracing::info!(company = %company, count = matches.len(), "matches found");

    MatchResponse {
        company: company.to_string(),
        target,
        matched_traits: analysis.matched,
        matches,
    }
}
