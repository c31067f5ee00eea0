//! Authentication service - token issuance, verification, and user lookup.
//!
//! Tokens are stateless HS256 JWTs carrying the user id; issuing them needs
//! no storage. Password hashing goes through the domain `Password` value
//! object.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::{Password, User, UserResponse};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// JWT claims payload
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

/// Response returned after successful registration or login
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    /// Signed JWT, valid for seven days
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// The authenticated user, without the password hash
    pub user: UserResponse,
}

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user and issue a token
    async fn register(&self, name: String, email: String, password: String)
        -> AppResult<AuthResponse>;

    /// Login and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse>;

    /// Verify JWT signature and expiration, returning the claims
    fn verify_token(&self, token: &str) -> AppResult<Claims>;

    /// Resolve a user id from verified claims to the stored user record.
    /// Returns `None` when the record no longer exists.
    async fn resolve_user(&self, id: Uuid) -> AppResult<Option<User>>;
}

/// Generate a signed JWT for a user (shared helper)
fn generate_token(user: &User, config: &Config) -> AppResult<String> {
    let now = Utc::now();
    let expires_at = now + Duration::days(config.jwt_expiration_days);

    let claims = Claims {
        sub: user.id,
        role: user.role.to_string(),
        exp: expires_at.timestamp(),
        iat: now.timestamp(),
    };

    // A signing failure is a server fault, not a credential problem; don't
    // let it convert into the 401-mapped Jwt variant
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Token signing failed: {}", e)))
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
    config: Config,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>, config: Config) -> Self {
        Self { uow, config }
    }

    fn token_response(&self, user: User) -> AppResult<AuthResponse> {
        let token = generate_token(&user, &self.config)?;
        Ok(AuthResponse {
            token,
            user: UserResponse::from(user),
        })
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> AppResult<AuthResponse> {
        // Email format is validated by the handler's ValidatedJson extractor
        if self.uow.users().find_by_email(&email).await?.is_some() {
            return Err(AppError::bad_request("User already exists"));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self.uow.users().create(name, email, password_hash).await?;

        self.token_response(user)
    }

    async fn login(&self, email: String, password: String) -> AppResult<AuthResponse> {
        let user_result = self.uow.users().find_by_email(&email).await?;

        // SECURITY: Perform password verification even if user doesn't exist
        // to prevent timing attacks that could enumerate valid emails.
        // We use a dummy hash that will always fail verification.
        let dummy_hash = "$argon2id$v=19$m=19456,t=2,p=1$dummysalt123456$dummyhash1234567890123456789012";

        let (password_hash, user_exists) = match &user_result {
            Some(user) => (user.password_hash.as_str(), true),
            None => (dummy_hash, false),
        };

        let stored_password = Password::from_hash(password_hash.to_string());
        let password_valid = stored_password.verify(&password);

        // Only succeed if both user exists AND password is valid
        if !user_exists || !password_valid {
            return Err(AppError::InvalidCredentials);
        }

        // user_result is Some here since user_exists is true
        let user = user_result.ok_or(AppError::InvalidCredentials)?;
        self.token_response(user)
    }

    fn verify_token(&self, token: &str) -> AppResult<Claims> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )?;

        Ok(token_data.claims)
    }

    async fn resolve_user(&self, id: Uuid) -> AppResult<Option<User>> {
        self.uow.users().find_by_id(id).await
    }
}
