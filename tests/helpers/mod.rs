#![allow(dead_code)]

use rusqlite::Connection;
use traits_matcher::db::{open_memory_database, StoreKind};
use traits_matcher::personality::traits::{create_trait, TraitLimits};
use traits_matcher::personality::persons::{create_person, update_person_score};
use traits_matcher::personality::types::ScoreVector;

/// Fresh in-memory person store.
pub fn persons_db() -> Connection {
    open_memory_database(StoreKind::Persons).unwrap()
}

/// Fresh in-memory trait store.
pub fn traits_db() -> Connection {
    open_memory_database(StoreKind::Traits).unwrap()
}

/// Insert a trait with default limits.
pub fn insert_trait(conn: &Connection, name: &str, friendliness: f64, dominance: f64) {
    create_trait(
        conn,
        name,
        ScoreVector::new(friendliness, dominance),
        TraitLimits::default(),
    )
    .unwrap();
}

/// Insert a person and set their score directly.
pub fn insert_person(conn: &Connection, name: &str, friendliness: f64, dominance: f64) {
    create_person(conn, name, 100).unwrap();
    update_person_score(conn, name, ScoreVector::new(friendliness, dominance), 1).unwrap();
}

/// The vocabulary used throughout the original fixtures.
pub fn seed_traits(conn: &Connection) {
    insert_trait(conn, "friendly", 8.0, 2.0);
    insert_trait(conn, "dominant", -2.0, 9.0);
    insert_trait(conn, "outgoing", 7.0, 4.0);
}
