use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::features::auth::model::AuthenticatedUser;

/// Opaque credential -> caller identity map. The enrichment core never sees
/// how credentials are issued; it only resolves them through this seam.
#[async_trait]
pub trait TokenStore: Send + Sync {
    async fn get(&self, token: &str) -> Option<AuthenticatedUser>;
    async fn put(&self, token: String, user: AuthenticatedUser);
    async fn delete(&self, token: &str);
}

/// Process-local token store. Tokens do not survive a restart; clients are
/// expected to log in again.
#[derive(Default)]
pub struct InMemoryTokenStore {
    entries: RwLock<HashMap<String, AuthenticatedUser>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn get(&self, token: &str) -> Option<AuthenticatedUser> {
        self.entries.read().await.get(token).cloned()
    }

    async fn put(&self, token: String, user: AuthenticatedUser) {
        self.entries.write().await.insert(token, user);
    }

    async fn delete(&self, token: &str) {
        self.entries.write().await.remove(token);
    }
}

/// Generate a fresh opaque token (64 hex chars).
pub fn generate_token() -> String {
    format!(
        "{}{}",
        Uuid::new_v4().simple(),
        Uuid::new_v4().simple()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> AuthenticatedUser {
        AuthenticatedUser {
            id: 7,
            username: "reporter".to_string(),
            role: "user".to_string(),
        }
    }

    #[tokio::test]
    async fn put_get_delete_roundtrip() {
        let store = InMemoryTokenStore::new();
        let token = generate_token();

        store.put(token.clone(), user()).await;
        assert_eq!(store.get(&token).await.unwrap().username, "reporter");

        store.delete(&token).await;
        assert!(store.get(&token).await.is_none());
    }

    #[test]
    fn tokens_are_unique_and_opaque() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
        assert_eq!(a.len(), 64);
    }
}
