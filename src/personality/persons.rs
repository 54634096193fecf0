//! Person store: create, fetch, list and rescore persons.

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{is_constraint_violation, Entity, MatchError, MatchResult};
use crate::personality::types::{Person, ScoreVector};

const PERSON_COLUMNS: &str =
    "name, friendliness, dominance, observations, created_at, updated_at";

/// Trim and bounds-check a person or trait name.
pub fn validate_name(name: &str, max_len: usize, entity: Entity) -> MatchResult<&str> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(MatchError::invalid(format!("{entity} name cannot be empty")));
    }
    if trimmed.chars().count() > max_len {
        return Err(MatchError::invalid(format!(
            "{entity} name too long (max {max_len} characters)"
        )));
    }
    Ok(trimmed)
}

/// Create a person with the neutral `(0.0, 0.0)` score.
pub fn create_person(conn: &Connection, name: &str, max_name_len: usize) -> MatchResult<Person> {
    let name = validate_name(name, max_name_len, Entity::Person)?;
    let now = chrono::Utc::now().to_rfc3339();

    conn.execute(
        "INSERT INTO persons (name, friendliness, dominance, observations, created_at, updated_at) \
         VALUES (?1, 0.0, 0.0, 0, ?2, ?2)",
        params![name, now],
    )
    .map_err(|e| {
        if is_constraint_violation(&e) {
            MatchError::duplicate(Entity::Person, name)
        } else {
            MatchError::Storage(e)
        }
    })?;

    tracing::info!(person = %name, "person created");

    Ok(Person {
        name: name.to_string(),
        friendliness: 0.0,
        dominance: 0.0,
        observations: 0,
        created_at: now.clone(),
        updated_at: now,
    })
}

/// Fetch a person by exact name. Surrounding whitespace is ignored, as at creation.
pub fn get_person(conn: &Connection, name: &str) -> MatchResult<Person> {
    let name = name.trim();
    conn.query_row(
        &format!("SELECT {PERSON_COLUMNS} FROM persons WHERE name = ?1"),
        params![name],
        row_to_person,
    )
    .optional()?
    .ok_or_else(|| MatchError::not_found(Entity::Person, name))
}

/// All persons ordered by name.
pub fn list_persons(conn: &Connection) -> MatchResult<Vec<Person>> {
    let mut stmt = conn.prepare(&format!("SELECT {PERSON_COLUMNS} FROM persons ORDER BY name"))?;
    let persons = stmt
        .query_map([], row_to_person)?
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(count = persons.len(), "listed persons");
    Ok(persons)
}

/// Overwrite a person's stored score and observation count.
pub fn update_person_score(
    conn: &Connection,
    name: &str,
    score: ScoreVector,
    observations: u32,
) -> MatchResult<()> {
    let name = name.trim();
    let now = chrono::Utc::now().to_rfc3339();
    let changed = conn.execute(
        "UPDATE persons SET friendliness = ?1, dominance = ?2, observations = ?3, updated_at = ?4 \
         WHERE name = ?5",
        params![score.friendliness, score.dominance, observations, now, name],
    )?;

    if changed == 0 {
        return Err(MatchError::not_found(Entity::Person, name));
    }

    tracing::debug!(person = %name, score = %score, observations, "person score updated");
    Ok(())
}

fn row_to_person(row: &Row<'_>) -> rusqlite::Result<Person> {
    Ok(Person {
        name: row.get(0)?,
        friendliness: row.get(1)?,
        dominance: row.get(2)?,
        observations: row.get(3)?,
        created_at: row.get(4)?,
        updated_at: row.get(5)?,
    })
}
