//! MCP `create_trait` tool parameter definition.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parameters for the `create_trait` MCP tool.
#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreateTraitParams {
    /// Trait name; also the keyword matched in descriptions.
    #[schemars(description = "The name of the trait. Matched case-insensitively as a whole word in descriptions.")]
    pub name: String,

    #[schemars(description = "Friendliness score (-10 to 10)")]
    pub friendliness: f64,

    #[schemars(description = "Dominance score (-10 to 10)")]
    pub dominance: f64,
}
