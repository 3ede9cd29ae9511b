use crate::database::KvStore;
use crate::models::{Credential, User};
use crate::utils::{json, AppError};
use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user id
    pub email: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
    pub aud: String,
    pub iss: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct SignupRequest {
    pub email: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct SignupResponse {
    pub success: bool,
    pub message: String,
    #[serde(rename = "userId")]
    pub user_id: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct AuthResponse {
    pub success: bool,
    pub token: String,
    pub user: User,
}

fn get_jwt_secret() -> String {
    std::env::var("JWT_SECRET").unwrap_or_else(|_| "default-secret-change-me".to_string())
}

fn get_jwt_issuer() -> String {
    std::env::var("JWT_ISSUER").unwrap_or_else(|_| "marketplace-service".to_string())
}

fn get_jwt_audience() -> String {
    std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "marketplace-api".to_string())
}

// Generate JWT bearer token (24h expiry)
pub fn generate_jwt(user: &User) -> Result<String, AppError> {
    let iat = Utc::now().timestamp() as usize;
    let exp = (Utc::now() + Duration::hours(24)).timestamp() as usize;

    let claims = Claims {
        sub: user.id.clone(),
        email: user.email.clone(),
        iat,
        exp,
        jti: Uuid::new_v4().to_string(),
        aud: get_jwt_audience(),
        iss: get_jwt_issuer(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(get_jwt_secret().as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT bearer token
pub fn verify_token(token: &str) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.set_audience(&[get_jwt_audience()]);

    let mut issuers = HashSet::new();
    issuers.insert(get_jwt_issuer());
    validation.iss = Some(issuers);

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(get_jwt_secret().as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Unauthorized("Invalid or expired token".to_string()))
}

/// Creates a user account. Username and email uniqueness are enforced with
/// atomic reservations, so two concurrent signups for the same username
/// cannot both succeed.
pub async fn signup(kv: &dyn KvStore, request: &SignupRequest) -> Result<User, AppError> {
    if request.email.trim().is_empty()
        || request.username.trim().is_empty()
        || request.password.trim().is_empty()
    {
        return Err(AppError::Validation(
            "Email, username, and password are required".to_string(),
        ));
    }

    let user_id = Uuid::new_v4().to_string();
    let username_key = format!("username:{}", request.username.to_lowercase());
    let cred_key = format!("cred:{}", request.email.to_lowercase());

    // Hash before taking any reservation so no failure between the two
    // can strand a claimed username.
    let password_hash = hash(&request.password, DEFAULT_COST)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;

    let credential = Credential {
        user_id: user_id.clone(),
        password_hash,
    };
    let credential = json::encode(&credential)?;

    if !kv.set_nx(&username_key, serde_json::json!(user_id)).await? {
        return Err(AppError::Validation("Username already taken".to_string()));
    }

    // Any failed outcome of the email reservation releases the username
    // one, conflict and store error alike.
    match kv.set_nx(&cred_key, credential).await {
        Ok(true) => {}
        Ok(false) => {
            kv.delete(&username_key).await?;
            return Err(AppError::Validation("Email already registered".to_string()));
        }
        Err(e) => {
            if let Err(cleanup) = kv.delete(&username_key).await {
                log::warn!("⚠️  Failed to release {}: {}", username_key, cleanup);
            }
            return Err(e);
        }
    }

    let user = User {
        id: user_id.clone(),
        email: request.email.clone(),
        username: request.username.clone(),
        is_admin: false,
        created_at: Utc::now().to_rfc3339(),
    };

    kv.set(&format!("user:{}", user_id), json::encode(&user)?).await?;

    log::info!("✅ User created: {} ({})", user.username, user.email);

    Ok(user)
}

/// Verifies a credential pair and issues a bearer token.
pub async fn login(kv: &dyn KvStore, request: &LoginRequest) -> Result<AuthResponse, AppError> {
    let cred_key = format!("cred:{}", request.email.to_lowercase());

    let credential: Credential = match kv.get(&cred_key).await? {
        Some(value) => json::decode(value)?,
        None => return Err(AppError::Unauthorized("Invalid credentials".to_string())),
    };

    let valid = verify(&request.password, &credential.password_hash)
        .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))?;

    if !valid {
        return Err(AppError::Unauthorized("Invalid credentials".to_string()));
    }

    let user = get_user(kv, &credential.user_id).await?;
    let token = generate_jwt(&user)?;

    Ok(AuthResponse {
        success: true,
        token,
        user,
    })
}

/// Resolves a user id to its stored profile record.
pub async fn get_user(kv: &dyn KvStore, user_id: &str) -> Result<User, AppError> {
    match kv.get(&format!("user:{}", user_id)).await? {
        Some(value) => json::decode(value),
        None => Err(AppError::NotFound("User data not found".to_string())),
    }
}
