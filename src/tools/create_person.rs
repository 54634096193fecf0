use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct CreatePersonParams {
    #[schemars(description = "The person's name (unique, case-sensitive, max 100 characters)")]
    pub name: String,
}
