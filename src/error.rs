//! Error taxonomy shared by the stores, the analyzer and the tool facade.
//!
//! Every failure the core can produce falls into one of four kinds, reported on
//! the wire by [`MatchError::kind`]:
//!
//! ```text
//! MatchError
//! ├── InvalidInput  - malformed or out-of-range argument      -> "invalid_input"
//! ├── NotFound      - person or trait does not exist           -> "not_found"
//! ├── DuplicateKey  - create on a name that already exists     -> "duplicate_key"
//! ├── Storage       - SQLite returned an error                 -> "storage_failure"
//! └── Unavailable   - store lock poisoned or worker task died  -> "storage_failure"
//! ```

use serde::Serialize;

/// Which store a record lives in. Used to label `NotFound`/`DuplicateKey`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Person,
    Trait,
}

impl std::fmt::Display for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Person => f.write_str("person"),
            Self::Trait => f.write_str("trait"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("{entity} '{name}' not found")]
    NotFound { entity: Entity, name: String },

    #[error("{entity} '{name}' already exists")]
    DuplicateKey { entity: Entity, name: String },

    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

pub type MatchResult<T> = std::result::Result<T, MatchError>;

impl MatchError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    pub fn not_found(entity: Entity, name: &str) -> Self {
        Self::NotFound {
            entity,
            name: name.to_string(),
        }
    }

    pub fn duplicate(entity: Entity, name: &str) -> Self {
        Self::DuplicateKey {
            entity,
            name: name.to_string(),
        }
    }

    /// Stable wire identifier for the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InvalidInput(_) => "invalid_input",
            Self::NotFound { .. } => "not_found",
            Self::DuplicateKey { .. } => "duplicate_key",
            Self::Storage(_) | Self::Unavailable(_) => "storage_failure",
        }
    }

    /// Render as the JSON error body returned by the MCP tools.
    pub fn to_json(&self) -> String {
        #[derive(Serialize)]
        struct Body<'a> {
            error: &'a str,
            message: String,
        }

        let body = Body {
            error: self.kind(),
            message: self.to_string(),
        };
        serde_json::to_string(&body)
            .unwrap_or_else(|_| format!("{{\"error\":\"{}\"}}", self.kind()))
    }
}

/// True when a rusqlite error is a UNIQUE/PRIMARY KEY violation.
pub(crate) fn is_constraint_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
