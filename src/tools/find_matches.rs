//! MCP `find_matches` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `find_matches` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct FindMatchesParams {
    /// Used for labelling and logging only; never filters.
    #[schemars(description = "Name of the company")]
    pub company_name: String,

    #[schemars(description = "Description of the job/role (max 1000 characters)")]
    pub job_description: String,

    /// Return only the closest `limit` persons.
    #[schemars(description = "Maximum number of matches to return. Defaults to all persons.")]
    pub limit: Option<usize>,
}
