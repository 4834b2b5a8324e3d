use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::auth::model::AuthenticatedUser;

fn default_role() -> String {
    "user".to_string()
}

/// Request DTO for account creation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct SignupDto {
    #[validate(length(min = 3, message = "Username must be at least 3 characters"))]
    pub username: String,

    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,

    #[serde(default = "default_role")]
    pub role: String,
}

/// Request DTO for login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginDto {
    #[validate(length(min = 1, message = "Username and password required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Username and password required"))]
    pub password: String,
}

/// Request DTO for admin login; requires the shared security key on top of
/// admin credentials
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AdminLoginDto {
    #[validate(length(min = 1, message = "Username, password, and security key required"))]
    pub username: String,

    #[validate(length(min = 1, message = "Username, password, and security key required"))]
    pub password: String,

    #[serde(alias = "securityKey")]
    #[validate(length(min = 1, message = "Username, password, and security key required"))]
    pub security_key: String,
}

/// Response DTO carrying a fresh token and the resolved identity
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponseDto {
    pub token: String,
    pub user: AuthenticatedUser,
}

/// Response DTO for the identity endpoint
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MeResponseDto {
    pub user: AuthenticatedUser,
}
