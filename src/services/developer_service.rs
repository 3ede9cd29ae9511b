use crate::database::KvStore;
use crate::models::Developer;
use crate::utils::{json, AppError};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct AddDeveloperRequest {
    pub name: String,
    pub specialization: String,
    pub email: String,
    pub portfolio: Option<String>,
    pub bio: Option<String>,
    pub skills: Option<Vec<String>>,
    pub hourly_rate: Option<String>,
}

/// Registers a developer profile. Admin-gated by the caller.
pub async fn add(kv: &dyn KvStore, request: &AddDeveloperRequest) -> Result<Developer, AppError> {
    if request.name.trim().is_empty()
        || request.specialization.trim().is_empty()
        || request.email.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Name, specialization, and email are required".to_string(),
        ));
    }

    let developer = Developer {
        id: Uuid::new_v4().to_string(),
        name: request.name.clone(),
        specialization: request.specialization.clone(),
        email: request.email.clone(),
        portfolio: request.portfolio.clone().unwrap_or_default(),
        bio: request.bio.clone().unwrap_or_default(),
        skills: request.skills.clone().unwrap_or_default(),
        hourly_rate: request.hourly_rate.clone().unwrap_or_default(),
        created_at: Utc::now().to_rfc3339(),
    };

    kv.set(&format!("developer:{}", developer.id), json::encode(&developer)?)
        .await?;

    log::info!("👷 Developer added: {} ({})", developer.name, developer.specialization);

    Ok(developer)
}

pub async fn get(kv: &dyn KvStore, developer_id: &str) -> Result<Developer, AppError> {
    match kv.get(&format!("developer:{}", developer_id)).await? {
        Some(value) => json::decode(value),
        None => Err(AppError::NotFound("Developer not found".to_string())),
    }
}

pub async fn list_all(kv: &dyn KvStore) -> Result<Vec<Developer>, AppError> {
    let developers = kv
        .get_by_prefix("developer:")
        .await?
        .into_iter()
        .filter_map(|value| serde_json::from_value(value).ok())
        .collect();

    Ok(developers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryKv;

    #[tokio::test]
    async fn add_requires_the_three_mandatory_fields() {
        let kv = MemoryKv::new();
        let err = add(
            &kv,
            &AddDeveloperRequest {
                name: "Ana".into(),
                specialization: "".into(),
                email: "ana@example.com".into(),
                portfolio: None,
                bio: None,
                skills: None,
                hourly_rate: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn round_trip_preserves_fields_and_skill_order() {
        let kv = MemoryKv::new();
        let created = add(
            &kv,
            &AddDeveloperRequest {
                name: "Priya Patel".into(),
                specialization: "Backend Developer".into(),
                email: "priya@example.com".into(),
                portfolio: Some("https://priya.dev".into()),
                bio: Some("Distributed systems, mostly.".into()),
                skills: Some(vec!["Rust".into(), "Go".into(), "Kafka".into()]),
                hourly_rate: Some("$95/hr".into()),
            },
        )
        .await
        .unwrap();

        let fetched = get(&kv, &created.id).await.unwrap();
        assert_eq!(fetched.name, "Priya Patel");
        assert_eq!(fetched.portfolio, "https://priya.dev");
        assert_eq!(fetched.skills, vec!["Rust", "Go", "Kafka"]);
        assert_eq!(fetched.hourly_rate, "$95/hr");
    }

    #[tokio::test]
    async fn optional_fields_default_to_empty() {
        let kv = MemoryKv::new();
        let created = add(
            &kv,
            &AddDeveloperRequest {
                name: "Sam".into(),
                specialization: "Web Developer".into(),
                email: "sam@example.com".into(),
                portfolio: None,
                bio: None,
                skills: None,
                hourly_rate: None,
            },
        )
        .await
        .unwrap();

        let fetched = get(&kv, &created.id).await.unwrap();
        assert_eq!(fetched.portfolio, "");
        assert!(fetched.skills.is_empty());
    }

    #[tokio::test]
    async fn missing_developer_is_not_found() {
        let kv = MemoryKv::new();
        let err = get(&kv, "missing").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
