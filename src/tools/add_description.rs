use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct AddDescriptionParams {
    #[schemars(description = "The person's name")]
    pub name: String,

    #[schemars(description = "Free-text description to analyze for known traits (max 1000 characters)")]
    pub description: String,
}
