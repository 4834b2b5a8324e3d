use sha2::{Digest, Sha256};
use sqlx::{FromRow, SqlitePool};
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::auth::dtos::{AdminLoginDto, AuthResponseDto, LoginDto, SignupDto};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::auth::token_store::{generate_token, TokenStore};
use crate::shared::constants::ROLE_ADMIN;

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    username: String,
    password_hash: String,
    role: String,
}

/// Credential issuance and validation over sha256 password digests and the
/// injected opaque token store.
pub struct AuthService {
    pool: SqlitePool,
    tokens: Arc<dyn TokenStore>,
    admin_security_key: String,
}

impl AuthService {
    pub fn new(pool: SqlitePool, tokens: Arc<dyn TokenStore>, admin_security_key: String) -> Self {
        Self {
            pool,
            tokens,
            admin_security_key,
        }
    }

    fn hash_password(password: &str) -> String {
        hex::encode(Sha256::digest(password.as_bytes()))
    }

    /// Usernames are matched case-insensitively and ignoring surrounding
    /// whitespace.
    async fn find_by_username(&self, username: &str) -> Result<Option<UserRow>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password_hash, role FROM users WHERE LOWER(TRIM(username)) = ?",
        )
        .bind(username.trim().to_lowercase())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row)
    }

    async fn issue_token(&self, row: UserRow) -> AuthResponseDto {
        let user = AuthenticatedUser {
            id: row.id,
            username: row.username,
            role: row.role,
        };
        let token = generate_token();
        self.tokens.put(token.clone(), user.clone()).await;

        AuthResponseDto { token, user }
    }

    pub async fn signup(&self, dto: &SignupDto) -> Result<AuthResponseDto> {
        let username = dto.username.trim().to_string();

        if self.find_by_username(&username).await?.is_some() {
            return Err(AppError::BadRequest("Username already exists".to_string()));
        }

        let password_hash = Self::hash_password(&dto.password);
        let id = sqlx::query("INSERT INTO users (username, password_hash, role) VALUES (?, ?, ?)")
            .bind(&username)
            .bind(&password_hash)
            .bind(&dto.role)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create user: {:?}", e);
                AppError::Database(e)
            })?
            .last_insert_rowid();

        tracing::info!("New user {} signed up", username);

        Ok(self
            .issue_token(UserRow {
                id,
                username,
                password_hash,
                role: dto.role.clone(),
            })
            .await)
    }

    pub async fn login(&self, dto: &LoginDto) -> Result<AuthResponseDto> {
        let row = self
            .find_by_username(&dto.username)
            .await?
            .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))?;

        if row.password_hash != Self::hash_password(&dto.password) {
            return Err(AppError::Unauthorized("Invalid credentials".to_string()));
        }

        tracing::info!("User {} logged in", row.username);
        Ok(self.issue_token(row).await)
    }

    pub async fn admin_login(&self, dto: &AdminLoginDto) -> Result<AuthResponseDto> {
        if dto.security_key.trim() != self.admin_security_key {
            return Err(AppError::Unauthorized("Invalid security key".to_string()));
        }

        let row = self
            .find_by_username(&dto.username)
            .await?
            .filter(|r| r.role == ROLE_ADMIN)
            .ok_or_else(|| AppError::Unauthorized("Invalid admin credentials".to_string()))?;

        if row.password_hash != Self::hash_password(&dto.password) {
            return Err(AppError::Unauthorized("Invalid admin credentials".to_string()));
        }

        tracing::info!("Admin {} logged in", row.username);
        Ok(self.issue_token(row).await)
    }

    pub async fn logout(&self, token: &str) {
        self.tokens.delete(token).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_hash_is_sha256_hex() {
        assert_eq!(
            AuthService::hash_password("admin123"),
            "240be518fabd2724ddb6f04eeb1da5967448d7e831c08c8fa822809f74c720a9"
        );
    }
}
