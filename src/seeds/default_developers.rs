use crate::database::KvStore;
use crate::models::Developer;
use crate::utils::{json, AppError};
use chrono::Utc;
use uuid::Uuid;

/// Seeds the four default developer profiles. Called once from the
/// initialization endpoint after the initialized flag has been claimed.
pub async fn seed_default_developers(kv: &dyn KvStore) -> Result<usize, AppError> {
    let developers = build_default_developers();
    let count = developers.len();

    log::info!("🌱 Seeding {} default developers...", count);

    for developer in &developers {
        kv.set(&format!("developer:{}", developer.id), json::encode(developer)?)
            .await?;
    }

    log::info!("   ✅ Seeded {} developers", count);

    Ok(count)
}

fn build_default_developers() -> Vec<Developer> {
    let now = Utc::now().to_rfc3339();

    let dev = |name: &str, specialization: &str, email: &str, portfolio: &str, bio: &str, skills: &[&str], rate: &str| Developer {
        id: Uuid::new_v4().to_string(),
        name: name.into(),
        specialization: specialization.into(),
        email: email.into(),
        portfolio: portfolio.into(),
        bio: bio.into(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        hourly_rate: rate.into(),
        created_at: now.clone(),
    };

    vec![
        dev(
            "John Smith",
            "Roblox Developer",
            "john@nomad.dev",
            "https://github.com/johnsmith",
            "Experienced Roblox developer with 5+ years of game development experience.",
            &["Lua", "Roblox Studio", "Game Design", "3D Modeling"],
            "$75/hr",
        ),
        dev(
            "Sarah Johnson",
            "Web Developer",
            "sarah@nomad.dev",
            "https://sarahjohnson.dev",
            "Full-stack web developer specializing in React and Node.js.",
            &["React", "Node.js", "TypeScript", "PostgreSQL"],
            "$85/hr",
        ),
        dev(
            "Mike Chen",
            "App Developer",
            "mike@nomad.dev",
            "https://mikechen.portfolio.com",
            "Mobile app developer with expertise in iOS and Android development.",
            &["Swift", "Kotlin", "React Native", "Firebase"],
            "$80/hr",
        ),
        dev(
            "Emily Brown",
            "Full Stack Developer",
            "emily@nomad.dev",
            "https://emilybrown.com",
            "Versatile full-stack developer with experience across multiple platforms.",
            &["JavaScript", "Python", "AWS", "Docker"],
            "$90/hr",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::MemoryKv;
    use crate::services::developer_service;

    #[tokio::test]
    async fn seeds_four_profiles() {
        let kv = MemoryKv::new();
        let count = seed_default_developers(&kv).await.unwrap();
        assert_eq!(count, 4);

        let developers = developer_service::list_all(&kv).await.unwrap();
        assert_eq!(developers.len(), 4);
        assert!(developers.iter().any(|d| d.name == "Sarah Johnson"));
    }
}
