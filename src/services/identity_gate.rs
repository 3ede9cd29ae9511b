use crate::database::KvStore;
use crate::models::User;
use crate::services::identity_service;
use crate::utils::AppError;

/// Authorization gate shared by every protected operation.
///
/// The bearer token itself is validated by the auth middleware before a
/// handler runs; these functions resolve the authenticated identity to a
/// stored profile and, for admin operations, check the admin flag.
pub async fn require_user(kv: &dyn KvStore, user_id: &str) -> Result<User, AppError> {
    identity_service::get_user(kv, user_id).await
}

pub async fn require_admin(kv: &dyn KvStore, user_id: &str) -> Result<User, AppError> {
    let user = require_user(kv, user_id).await?;

    if !user.is_admin {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{KvStore, MemoryKv};
    use crate::models::User;
    use crate::utils::json;

    async fn store_user(kv: &MemoryKv, id: &str, is_admin: bool) {
        let user = User {
            id: id.to_string(),
            email: format!("{}@example.com", id),
            username: id.to_string(),
            is_admin,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        kv.set(&format!("user:{}", id), json::encode(&user).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_profile_is_not_found() {
        let kv = MemoryKv::new();
        let err = require_user(&kv, "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn non_admin_is_forbidden() {
        let kv = MemoryKv::new();
        store_user(&kv, "plain", false).await;
        let err = require_admin(&kv, "plain").await.unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_passes_the_gate() {
        let kv = MemoryKv::new();
        store_user(&kv, "root", true).await;
        let user = require_admin(&kv, "root").await.unwrap();
        assert!(user.is_admin);
    }
}
