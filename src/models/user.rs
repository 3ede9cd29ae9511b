use serde::{Deserialize, Serialize};

/// Profile record stored under `user:<id>`. Created at signup, mutated only
/// by the admin-escalation endpoint, never deleted.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub username: String,
    #[serde(default)]
    pub is_admin: bool,
    pub created_at: String,
}

/// Credential record stored under `cred:<email>`; resolves a login to the
/// owning user. Never returned over the wire.
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Credential {
    pub user_id: String,
    pub password_hash: String,
}

/// Redacted per-user row embedded in the analytics snapshot.
#[derive(Debug, Serialize, Deserialize, Clone, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<&User> for UserSummary {
    fn from(u: &User) -> Self {
        UserSummary {
            id: u.id.clone(),
            username: u.username.clone(),
            email: u.email.clone(),
            is_admin: u.is_admin,
            created_at: u.created_at.clone(),
        }
    }
}
