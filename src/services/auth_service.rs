use actix_web::web;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::Config;
use crate::database::BlogStore;
use crate::models::User;
use crate::utils::AppError;

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub username: String,
    pub id: String, // user ObjectId as hex
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}

/// Missing fields are a failed login, not a malformed request.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Signing secret, token lifetime and bcrypt cost.
#[derive(Clone)]
pub struct AuthSettings {
    secret: String,
    token_ttl: Duration,
    bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn new(secret: impl Into<String>, token_ttl_secs: i64, bcrypt_cost: u32) -> Self {
        Self {
            secret: secret.into(),
            token_ttl: Duration::seconds(token_ttl_secs),
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.jwt_secret.clone(),
            config.token_ttl_secs,
            config.bcrypt_cost,
        )
    }

    // Generate JWT token
    pub fn generate_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let claims = Claims {
            username: user.username.clone(),
            id: user.id.to_hex(),
            iat: now.timestamp() as usize,
            exp: (now + self.token_ttl).timestamp().max(0) as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
    }

    /// Signature, algorithm and expiry are all checked.
    pub fn verify_token(&self, token: &str) -> Result<Claims, String> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .map(|data| data.claims)
        .map_err(|e| format!("Invalid token: {}", e))
    }

    /// bcrypt runs on the blocking pool.
    pub async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let cost = self.bcrypt_cost;
        web::block(move || bcrypt::hash(password, cost))
            .await?
            .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
    }

    pub async fn verify_password(&self, password: String, hash: String) -> Result<bool, AppError> {
        web::block(move || bcrypt::verify(password, &hash))
            .await?
            .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)))
    }
}

/// Resolves request claims to a stored user. The store is queried on every
/// call; there is no session cache.
pub async fn authenticated_user(
    store: &dyn BlogStore,
    claims: Option<&Claims>,
) -> Result<User, AppError> {
    let claims = claims.ok_or(AppError::Unauthorized)?;
    let user_id = ObjectId::parse_str(&claims.id).map_err(|_| AppError::Unauthorized)?;

    store
        .find_user(user_id)
        .await?
        .ok_or(AppError::Unauthorized)
}

// User login
pub async fn login(
    store: &dyn BlogStore,
    auth: &AuthSettings,
    request: LoginRequest,
) -> Result<LoginResponse, AppError> {
    let (Some(username), Some(password)) = (request.username, request.password) else {
        return Err(AppError::InvalidCredentials);
    };

    let user = store.find_user_by_username(&username).await?;

    let user = match user {
        Some(user) => {
            let valid = auth
                .verify_password(password, user.password_hash.clone())
                .await?;
            if !valid {
                return Err(AppError::InvalidCredentials);
            }
            user
        }
        None => return Err(AppError::InvalidCredentials),
    };

    let token = auth.generate_token(&user)?;

    Ok(LoginResponse {
        token,
        username: user.username,
        name: user.name,
    })
}
