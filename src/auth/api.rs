//! Authentication API Endpoints
//! Mission: Registration, login, profile, and admin user management

use crate::auth::gateway::AuthGateway;
use crate::auth::models::{
    Claims, CreateUserRequest, LoginRequest, PasswordChangeRequest, RegisterRequest,
    TokenResponse, UserResponse,
};
use crate::auth::policy::Action;
use crate::error::ApiError;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use tracing::info;
use uuid::Uuid;

/// POST /auth/register - self-service signup, role forced to `user`.
pub async fn register(
    State(gateway): State<AuthGateway>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let user = gateway.register(payload)?;
    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// POST /auth/login - exchange credentials for a bearer token.
pub async fn login(
    State(gateway): State<AuthGateway>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, ApiError> {
    info!("🔐 Login attempt: {}", payload.username);
    let (access_token, expires_in) = gateway.login(&payload.username, &payload.password)?;

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
        expires_in,
    }))
}

/// GET /users/me - the authenticated caller's own record.
pub async fn get_current_user(
    State(gateway): State<AuthGateway>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<UserResponse>, ApiError> {
    gateway.authorize(&claims, Action::SelfProfile)?;
    let user = gateway.current_user(&claims)?;
    Ok(Json(UserResponse::from_user(&user)))
}

/// PUT /users/me/password - change own password, current one re-verified.
pub async fn change_password(
    State(gateway): State<AuthGateway>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<PasswordChangeRequest>,
) -> Result<StatusCode, ApiError> {
    gateway.authorize(&claims, Action::SelfProfile)?;
    gateway.change_own_password(&claims, &payload.current_password, &payload.new_password)?;
    Ok(StatusCode::NO_CONTENT)
}

/// GET /admin/users - list all users (admin only).
pub async fn list_users(
    State(gateway): State<AuthGateway>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    gateway.authorize(&claims, Action::AdminManageUsers)?;

    let users = gateway.admin_list_users();
    Ok(Json(users.iter().map(UserResponse::from_user).collect()))
}

/// POST /admin/users - create a user with an assignable role (admin only).
pub async fn create_user(
    State(gateway): State<AuthGateway>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    gateway.authorize(&claims, Action::AdminManageUsers)?;

    let user = gateway.admin_create_user(payload)?;
    Ok((StatusCode::CREATED, Json(UserResponse::from_user(&user))))
}

/// DELETE /admin/users/:id - remove a user permanently (admin only, never
/// the caller's own account).
pub async fn delete_user(
    State(gateway): State<AuthGateway>,
    Extension(claims): Extension<Claims>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    gateway.authorize(&claims, Action::AdminManageUsers)?;

    let target = Uuid::parse_str(user_id.trim())
        .map_err(|_| ApiError::validation("user_id", "Invalid user id format"))?;

    gateway.admin_delete_user(&claims, target)?;
    Ok(StatusCode::NO_CONTENT)
}
