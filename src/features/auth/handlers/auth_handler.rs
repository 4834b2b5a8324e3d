use std::sync::Arc;

use axum::{extract::State, http::HeaderMap, Json};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::core::extractor::AppJson;
use crate::core::middleware::bearer_token;
use crate::features::auth::dtos::{
    AdminLoginDto, AuthResponseDto, LoginDto, MeResponseDto, SignupDto,
};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::services::AuthService;
use crate::shared::types::MessageResponse;

/// State for auth handlers
#[derive(Clone)]
pub struct AuthState {
    pub auth_service: Arc<AuthService>,
}

fn check(dto: &impl Validate) -> Result<()> {
    dto.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .into_values()
            .flat_map(|field| field.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Validation failed".to_string());
        AppError::Validation(message)
    })
}

/// Create an account and issue a token
#[utoipa::path(
    post,
    path = "/api/auth/signup",
    request_body = SignupDto,
    responses(
        (status = 200, description = "Account created", body = AuthResponseDto),
        (status = 400, description = "Invalid fields or username taken")
    ),
    tag = "auth"
)]
pub async fn signup(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<SignupDto>,
) -> Result<Json<AuthResponseDto>> {
    check(&dto)?;
    let response = state.auth_service.signup(&dto).await?;
    Ok(Json(response))
}

/// Exchange credentials for a token
#[utoipa::path(
    post,
    path = "/api/auth/login",
    request_body = LoginDto,
    responses(
        (status = 200, description = "Logged in", body = AuthResponseDto),
        (status = 401, description = "Invalid credentials")
    ),
    tag = "auth"
)]
pub async fn login(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<LoginDto>,
) -> Result<Json<AuthResponseDto>> {
    check(&dto)?;
    let response = state.auth_service.login(&dto).await?;
    Ok(Json(response))
}

/// Admin login; requires the shared security key
#[utoipa::path(
    post,
    path = "/api/auth/admin-login",
    request_body = AdminLoginDto,
    responses(
        (status = 200, description = "Logged in", body = AuthResponseDto),
        (status = 401, description = "Invalid credentials or security key")
    ),
    tag = "auth"
)]
pub async fn admin_login(
    State(state): State<AuthState>,
    AppJson(dto): AppJson<AdminLoginDto>,
) -> Result<Json<AuthResponseDto>> {
    check(&dto)?;
    let response = state.auth_service.admin_login(&dto).await?;
    Ok(Json(response))
}

/// Return the caller identity behind the presented token
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Caller identity", body = MeResponseDto),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn me(user: AuthenticatedUser) -> Json<MeResponseDto> {
    Json(MeResponseDto { user })
}

/// Invalidate the presented token
#[utoipa::path(
    post,
    path = "/api/auth/logout",
    responses(
        (status = 200, description = "Logged out", body = MessageResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn logout(
    _user: AuthenticatedUser,
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<MessageResponse>> {
    if let Some(token) = bearer_token(&headers) {
        state.auth_service.logout(&token).await;
    }
    Ok(Json(MessageResponse::new("Logged out successfully")))
}
