//! Personality matching over MCP.
//!
//! traits-matcher stores **traits** (named `(friendliness, dominance)` vectors)
//! and **persons** (named, mutable scores). Free-text descriptions are scanned for
//! trait names and the matched vectors are added onto a person's score; job
//! descriptions are turned into a target vector the same way and persons are
//! ranked by Euclidean distance to it.
//!
//! # Architecture
//!
//! - **Storage**: two SQLite files, one per store, opened once at startup
//! - **Scoring**: case-insensitive whole-word trait matching, sum (or mean) combination
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite store initialization, schema, and health checks
//! - [`error`]: The `invalid_input` / `not_found` / `duplicate_key` / `storage_failure` taxonomy
//! - [`personality`]: Trait and person stores, description analyzer, matcher
//! - [`tools`]: MCP tool handler exposing every operation
//! - [`server`]: stdio and HTTP server entry points

pub mod config;
pub mod db;
pub mod error;
pub mod personality;
pub mod server;
pub mod tools;
