use serde::{Deserialize, Serialize};

/// Developer profile stored under `developer:<id>`. Created by an
/// administrator (or the one-time seed) and never updated or deleted.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Developer {
    pub id: String,
    pub name: String,
    pub specialization: String,
    pub email: String,
    #[serde(default)]
    pub portfolio: String,
    #[serde(default)]
    pub bio: String,
    /// Skill order is preserved exactly as supplied.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub hourly_rate: String,
    pub created_at: String,
}
