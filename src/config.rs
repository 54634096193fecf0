use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::personality::analyze::Combine;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct MatcherConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub scoring: ScoringConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub transport: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub persons_db: String,
    pub traits_db: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ScoringConfig {
    /// How the vectors of several matched traits fold into one delta.
    pub combine: Combine,
    /// Largest absolute friendliness/dominance a trait may carry.
    pub max_trait_score: f64,
    pub max_name_len: usize,
    pub max_description_len: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: "stdio".into(),
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 8765,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        let dir = default_matcher_dir();
        Self {
            persons_db: dir.join("persons.db").to_string_lossy().into_owned(),
            traits_db: dir.join("traits.db").to_string_lossy().into_owned(),
        }
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            combine: Combine::Sum,
            max_trait_score: 10.0,
            max_name_len: 100,
            max_description_len: 1000,
        }
    }
}

/// Returns `~/.traits-matcher/`
pub fn default_matcher_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".traits-matcher")
}

/// Returns the default config file path: `~/.traits-matcher/config.toml`
pub fn default_config_path() -> PathBuf {
    default_matcher_dir().join("config.toml")
}

impl MatcherConfig {
    /// Load config from TOML file (if it exists) then apply env var overrides.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific path, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = if path.exists() {
            let contents =
                std::fs::read_to_string(path).context("failed to read config file")?;
            toml::from_str(&contents).context("failed to parse config TOML")?
        } else {
            info!("no config file at {}, using defaults", path.display());
            MatcherConfig::default()
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply environment variable overrides (MCP_PERSONS_DB, MCP_TRAITS_DB, LOG_LEVEL).
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("MCP_PERSONS_DB") {
            self.storage.persons_db = val;
        }
        if let Ok(val) = std::env::var("MCP_TRAITS_DB") {
            self.storage.traits_db = val;
        }
        if let Ok(val) = std::env::var("LOG_LEVEL") {
            self.server.log_level = val;
        }
    }

    pub fn resolved_persons_db(&self) -> PathBuf {
        expand_tilde(&self.storage.persons_db)
    }

    pub fn resolved_traits_db(&self) -> PathBuf {
        expand_tilde(&self.storage.traits_db)
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = MatcherConfig::default();
        assert_eq!(config.server.transport, "stdio");
        assert_eq!(config.server.log_level, "info");
        assert_eq!(config.server.port, 8765);
        assert_eq!(config.scoring.combine, Combine::Sum);
        assert_eq!(config.scoring.max_trait_score, 10.0);
        assert!(config.storage.persons_db.ends_with("persons.db"));
        assert!(config.storage.traits_db.ends_with("traits.db"));
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[server]
log_level = "debug"
transport = "http"

[storage]
persons_db = "/tmp/p.db"

[scoring]
combine = "mean"
"#;
        let config: MatcherConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.server.log_level, "debug");
        assert_eq!(config.server.transport, "http");
        assert_eq!(config.storage.persons_db, "/tmp/p.db");
        assert_eq!(config.scoring.combine, Combine::Mean);
        // defaults still apply for unset fields
        assert!(config.storage.traits_db.ends_with("traits.db"));
        assert_eq!(config.scoring.max_description_len, 1000);
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = MatcherConfig::default();
        std::env::set_var("MCP_PERSONS_DB", "/tmp/override-persons.db");
        std::env::set_var("MCP_TRAITS_DB", "/tmp/override-traits.db");
        std::env::set_var("LOG_LEVEL", "trace");

        config.apply_env_overrides();

        assert_eq!(config.storage.persons_db, "/tmp/override-persons.db");
        assert_eq!(config.storage.traits_db, "/tmp/override-traits.db");
        assert_eq!(config.server.log_level, "trace");

        std::env::remove_var("MCP_PERSONS_DB");
        std::env::remove_var("MCP_TRAITS_DB");
        std::env::remove_var("LOG_LEVEL");
    }

    #[test]
    fn tilde_expands_to_home() {
        let expanded = expand_tilde("~/x.db");
        assert!(expanded.ends_with("x.db"));
        assert_eq!(expand_tilde("/abs/y.db"), PathBuf::from("/abs/y.db"));
    }
}
