//! Core record types.
//!
//! Defines [`ScoreVector`] (a point in friendliness/dominance space), [`Trait`]
//! (a named reference vector) and [`Person`] (a named, mutable score).

use serde::{Deserialize, Serialize};

/// A `(friendliness, dominance)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreVector {
    pub friendliness: f64,
    pub dominance: f64,
}

impl ScoreVector {
    /// The neutral point every new person and every job target starts from.
    pub const ORIGIN: ScoreVector = ScoreVector {
        friendliness: 0.0,
        dominance: 0.0,
    };

    pub fn new(friendliness: f64, dominance: f64) -> Self {
        Self {
            friendliness,
            dominance,
        }
    }

    /// Euclidean distance between two score vectors.
    pub fn distance(&self, other: &ScoreVector) -> f64 {
        let df = self.friendliness - other.friendliness;
        let dd = self.dominance - other.dominance;
        (df * df + dd * dd).sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.friendliness.is_finite() && self.dominance.is_finite()
    }
}

impl std::ops::Add for ScoreVector {
    type Output = ScoreVector;

    fn add(self, rhs: ScoreVector) -> ScoreVector {
        ScoreVector::new(
            self.friendliness + rhs.friendliness,
            self.dominance + rhs.dominance,
        )
    }
}

impl std::fmt::Display for ScoreVector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.2}, {:.2})", self.friendliness, self.dominance)
    }
}

/// A personality trait, matching the `traits` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trait {
    /// Unique (case-insensitive) trait name; also the keyword searched for in text.
    pub name: String,
    pub friendliness: f64,
    pub dominance: f64,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
}

impl Trait {
    pub fn score(&self) -> ScoreVector {
        ScoreVector::new(self.friendliness, self.dominance)
    }
}

/// A person record, matching the `persons` table schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    /// Unique, case-sensitive person name.
    pub name: String,
    pub friendliness: f64,
    pub dominance: f64,
    /// Number of trait matches that have been folded into this score.
    #[serde(default)]
    pub observations: u32,
    pub created_at: String,
    pub updated_at: String,
}

impl Person {
    pub fn score(&self) -> ScoreVector {
        ScoreVector::new(self.friendliness, self.dominance)
    }
}
