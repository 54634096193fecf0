//! Trait store: create, fetch and list personality traits.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{is_constraint_violation, Entity, MatchError, MatchResult};
use crate::personality::analyze::match_key;
use crate::personality::persons::validate_name;
use crate::personality::types::{ScoreVector, Trait};

/// Limits applied to trait creation.
#[derive(Debug, Clone, Copy)]
pub struct TraitLimits {
    pub max_score: f64,
    pub max_name_len: usize,
}

impl Default for TraitLimits {
    fn default() -> Self {
        Self {
            max_score: 10.0,
            max_name_len: 100,
        }
    }
}

/// Create and persist a new trait.
///
/// Fails with `InvalidInput` for non-finite or out-of-range scores and for names
/// that hold no word characters (they could never match a description), and with
/// `DuplicateKey` if a trait with the same [`match_key`] exists.
pub fn create_trait(
    conn: &Connection,
    name: &str,
    score: ScoreVector,
    limits: TraitLimits,
) -> MatchResult<Trait> {
    let name = validate_name(name, limits.max_name_len, Entity::Trait)?;

    let key = match_key(name);
    if key.is_empty() {
        return Err(MatchError::invalid(format!(
            "trait name '{name}' must contain at least one word"
        )));
    }

    if !score.is_finite() {
        return Err(MatchError::invalid(
            "friendliness and dominance must be finite numbers",
        ));
    }
    for (label, value) in [
        ("friendliness", score.friendliness),
        ("dominance", score.dominance),
    ] {
        if value.abs() > limits.max_score {
            return Err(MatchError::invalid(format!(
                "{label} must be between -{max} and {max}, got {value}",
                max = limits.max_score
            )));
        }
    }

    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        "INSERT INTO traits (name, match_key, friendliness, dominance, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![name, key, score.friendliness, score.dominance, now],
    )
    .map_err(|e| {
        if is_constraint_violation(&e) {
            MatchError::duplicate(Entity::Trait, name)
        } else {
            MatchError::Storage(e)
        }
    })?;

    tracing::info!(name = %name, score = %score, "trait created");

    Ok(Trait {
        name: name.to_string(),
        friendliness: score.friendliness,
        dominance: score.dominance,
        created_at: now,
    })
}

/// Fetch a trait by name, compared the way the analyzer compares it.
pub fn get_trait(conn: &Connection, name: &str) -> MatchResult<Trait> {
    conn.query_row(
        "SELECT name, friendliness, dominance, created_at FROM traits WHERE match_key = ?1",
        params![match_key(name)],
        row_to_trait,
    )
    .optional()?
    .ok_or_else(|| MatchError::not_found(Entity::Trait, name))
}

/// All traits ordered by name.
pub fn list_traits(conn: &Connection) -> MatchResult<Vec<Trait>> {
    let mut stmt = conn.prepare(
        "SELECT name, friendliness, dominance, created_at FROM traits ORDER BY name",
    )?;
    let traits = stmt
        .query_map([], row_to_trait)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = traits.len(), "listed traits");
    Ok(traits)
}

fn row_to_trait(row: &Row<'_>) -> rusqlite::Result<Trait> {
    Ok(Trait {
        name: row.get(0)?,
        friendliness: row.get(1)?,
        dominance: row.get(2)?,
        created_at: row.get(3)?,
    })
}
