//! Description analyzer: turns free text into a score delta using the trait vocabulary.
//!
//! Text and trait names are both lowercased and split into word tokens; a trait
//! matches when its token run appears contiguously in the description. Each trait
//! counts once per description no matter how often it occurs. The matched
//! vectors are folded into a single delta by [`Combine`].

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::error::{MatchError, MatchResult};
use crate::personality::persons::{get_person, update_person_score};
use crate::personality::types::{ScoreVector, Trait};

/// How several matched trait vectors fold into one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Combine {
    /// Component-wise sum of every matched vector.
    #[default]
    Sum,
    /// Component-wise mean of the matched vectors.
    Mean,
}

impl Combine {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Mean => "mean",
        }
    }
}

impl std::fmt::Display for Combine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Combine {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sum" => Ok(Self::Sum),
            "mean" => Ok(Self::Mean),
            _ => Err(format!("unknown combine rule: {s}")),
        }
    }
}

/// Matched traits and the delta they produce.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    /// Names of the matched traits, in trait-store order.
    pub matched: Vec<String>,
    pub delta: ScoreVector,
}

/// Lowercase word tokens. Hyphens and apostrophes stay inside words
/// ("self-assured", "can't") but are stripped from the edges.
pub fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '\''))
        .map(|t| t.trim_matches(|c| c == '-' || c == '\''))
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Normalized form of a trait name: its tokens joined by single spaces.
/// Two names with the same key match exactly the same descriptions.
pub fn match_key(name: &str) -> String {
    tokenize(name).join(" ")
}

fn contains_run(haystack: &[String], needle: &[String]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

/// Traits whose name occurs as a whole-word run in `text`.
pub fn matched_traits<'a>(text: &str, traits: &'a [Trait]) -> Vec<&'a Trait> {
    let tokens = tokenize(text);
    traits
        .iter()
        .filter(|t| contains_run(&tokens, &tokenize(&t.name)))
        .collect()
}

/// Fold vectors with `rule`. An empty input yields the origin.
pub fn combine(vectors: &[ScoreVector], rule: Combine) -> ScoreVector {
    let sum = vectors
        .iter()
        .fold(ScoreVector::ORIGIN, |acc, v| acc + *v);

    match rule {
        Combine::Sum => sum,
        Combine::Mean if vectors.is_empty() => ScoreVector::ORIGIN,
        Combine::Mean => {
            let n = vectors.len() as f64;
            ScoreVector::new(sum.friendliness / n, sum.dominance / n)
        }
    }
}

/// Scan `text` against `traits` and compute the combined delta.
pub fn analyze(text: &str, traits: &[Trait], rule: Combine) -> Analysis {
    let hits = matched_traits(text, traits);
    let vectors: Vec<ScoreVector> = hits.iter().map(|t| t.score()).collect();
    Analysis {
        matched: hits.iter().map(|t| t.name.clone()).collect(),
        delta: combine(&vectors, rule),
    }
}

/// Result returned from an add-description operation.
#[derive(Debug, Serialize)]
pub struct DescriptionOutcome {
    pub name: String,
    pub matched_traits: Vec<String>,
    pub delta: ScoreVector,
    /// Score after the update (unchanged when nothing matched).
    pub score: ScoreVector,
    pub observations: u32,
    pub updated: bool,
}

/// Apply a description to a person: analyze, add the delta, persist.
///
/// Read, compute and write run inside one transaction, so a concurrent caller
/// on the same connection can never interleave and no partial update survives a
/// failure.
pub fn add_description(
    conn: &mut Connection,
    name: &str,
    text: &str,
    traits: &[Trait],
    rule: Combine,
    max_len: usize,
) -> MatchResult<DescriptionOutcome> {
    if text.chars().count() > max_len {
        return Err(MatchError::invalid(format!(
            "description too long (max {max_len} characters)"
        )));
    }

    let tx = conn.transaction()?;
    let person = get_person(&tx, name)?;
    let analysis = analyze(text, traits, rule);

    if analysis.matched.is_empty() {
        tracing::warn!(person = %name, "no traits found in description");
        return Ok(DescriptionOutcome {
            name: person.name,
            matched_traits: Vec::new(),
            delta: ScoreVector::ORIGIN,
            score: ScoreVector::new(person.friendliness, person.dominance),
            observations: person.observations,
            updated: false,
        });
    }

    let score = person.score() + analysis.delta;
    let observations = person
        .observations
        .saturating_add(u32::try_from(analysis.matched.len()).unwrap_or(u32::MAX));

    update_person_score(&tx, name, score, observations)?;
    tx.commit()?;

    tracing::info!(
        person = %name,
        matched = analysis.matched.len(),
        delta = %analysis.delta,
        score = %score,
        "description applied"
    );

    Ok(DescriptionOutcome {
        name: person.name,
        matched_traits: analysis.matched,
        delta: analysis.delta,
        score,
        observations,
        updated: true,
    })
}
