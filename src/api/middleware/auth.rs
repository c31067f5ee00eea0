//! JWT authentication middleware and admin role gate.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::{User, UserResponse, UserRole};
use crate::errors::AppError;

/// Authenticated user resolved from the database during the identity stage.
/// Never carries the password hash.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

impl CurrentUser {
    /// Check if user has admin role.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
            created_at: user.created_at,
        }
    }
}

impl From<CurrentUser> for UserResponse {
    fn from(user: CurrentUser) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.to_string(),
            created_at: user.created_at,
        }
    }
}

/// Request-scoped authentication context attached by `auth_middleware`.
///
/// `user` is `None` when the token was valid but the user record no longer
/// exists; the request still proceeds and downstream stages decide
/// (identity-requiring handlers answer 401, the role gate answers 403).
#[derive(Clone, Debug, Default)]
pub struct AuthSession {
    pub user: Option<CurrentUser>,
}

/// JWT authentication middleware (identity stage).
///
/// Extracts and verifies the bearer token from the Authorization header,
/// resolves the decoded id to a stored user, and attaches an `AuthSession`
/// to the request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthorized)?;

    let token = auth_header
        .strip_prefix(BEARER_TOKEN_PREFIX)
        .ok_or(AppError::Unauthorized)?;

    let claims = state.auth_service.verify_token(token)?;

    let user = state.auth_service.resolve_user(claims.sub).await?;

    request.extensions_mut().insert(AuthSession {
        user: user.map(CurrentUser::from),
    });

    Ok(next.run(request).await)
}

/// Admin role gate. Must be layered inside `auth_middleware` so the
/// session is present; a missing or non-admin user is rejected, never
/// a panic.
pub async fn admin_middleware(request: Request, next: Next) -> Result<Response, AppError> {
    let is_admin = request
        .extensions()
        .get::<AuthSession>()
        .and_then(|session| session.user.as_ref())
        .is_some_and(CurrentUser::is_admin);

    if is_admin {
        Ok(next.run(request).await)
    } else {
        Err(AppError::Forbidden)
    }
}
