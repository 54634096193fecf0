use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, JsonSchema)]
pub struct GetPersonParams {
    #[schemars(description = "The person's name")]
    pub name: String,
}
