//! Public types for the tools API
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgeQuery {
    pub birth_date: Option<String>,
    /// Defaults to the current date in KST
    pub today: Option<String>,
}

#[derive(Serialize, Deserialize)]
pub struct TextCountRequest {
    pub text: String,
}
