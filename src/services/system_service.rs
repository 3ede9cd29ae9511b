use crate::database::KvStore;
use crate::models::User;
use crate::seeds::default_developers::seed_default_developers;
use crate::utils::{json, AppError};

pub const INITIALIZED_KEY: &str = "system:initialized";

/// One-time system bootstrap: seeds the default developers and zeroes the
/// revenue counter. Claiming the initialized flag with `set_nx` makes the
/// call idempotent even when two instances race it.
pub async fn initialize(kv: &dyn KvStore) -> Result<bool, AppError> {
    if !kv.set_nx(INITIALIZED_KEY, serde_json::json!(true)).await? {
        log::info!("ℹ️  System already initialized — skipping seed");
        return Ok(false);
    }

    seed_default_developers(kv).await?;
    kv.set(crate::services::project_service::REVENUE_KEY, serde_json::json!(0.0))
        .await?;

    log::info!("✅ System initialized");

    Ok(true)
}

/// Flips the admin flag on a user. The route in front of this requires the
/// setup key header; the operation itself only needs the target to exist.
pub async fn make_admin(kv: &dyn KvStore, user_id: &str) -> Result<User, AppError> {
    let key = format!("user:{}", user_id);
    let mut user: User = match kv.get(&key).await? {
        Some(value) => json::decode(value)?,
        None => return Err(AppError::NotFound("User not found".to_string())),
    };

    user.is_admin = true;
    kv.set(&key, json::encode(&user)?).await?;

    log::info!("🔑 User {} escalated to admin", user_id);

    Ok(user)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{KvStore, MemoryKv};
    use crate::services::developer_service;

    #[tokio::test]
    async fn initialize_is_idempotent() {
        let kv = MemoryKv::new();

        assert!(initialize(&kv).await.unwrap());
        assert!(!initialize(&kv).await.unwrap());

        // Developer count unchanged by the second call.
        let developers = developer_service::list_all(&kv).await.unwrap();
        assert_eq!(developers.len(), 4);
    }

    #[tokio::test]
    async fn initialize_zeroes_the_revenue_counter() {
        let kv = MemoryKv::new();
        initialize(&kv).await.unwrap();

        let revenue = kv
            .get(crate::services::project_service::REVENUE_KEY)
            .await
            .unwrap()
            .and_then(|v| v.as_f64());
        assert_eq!(revenue, Some(0.0));
    }

    #[tokio::test]
    async fn make_admin_flips_the_flag() {
        let kv = MemoryKv::new();
        let user = User {
            id: "u1".into(),
            email: "u1@example.com".into(),
            username: "u1".into(),
            is_admin: false,
            created_at: chrono::Utc::now().to_rfc3339(),
        };
        kv.set("user:u1", json::encode(&user).unwrap()).await.unwrap();

        let updated = make_admin(&kv, "u1").await.unwrap();
        assert!(updated.is_admin);
    }

    #[tokio::test]
    async fn make_admin_on_missing_user_is_not_found() {
        let kv = MemoryKv::new();
        let err = make_admin(&kv, "ghost").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
