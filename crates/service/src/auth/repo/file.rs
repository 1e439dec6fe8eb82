//! File-backed auth repository over the shared document store.

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

use crate::auth::domain::{AuthUser, Credentials};
use crate::auth::errors::AuthError;
use crate::auth::repository::AuthRepository;
use crate::storage::DocumentStore;

/// One stored account: the user plus its (optional) credential record.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct StoredAccount {
    user: AuthUser,
    credentials: Option<Credentials>,
}

pub struct FileAuthRepository {
    store: Arc<DocumentStore<Uuid, StoredAccount>>,
}

impl FileAuthRepository {
    pub async fn open<P: Into<PathBuf>>(path: P) -> Result<Arc<Self>, AuthError> {
        let store = DocumentStore::open(path)
            .await
            .map_err(|e| AuthError::Repository(e.to_string()))?;
        Ok(Arc::new(Self { store }))
    }
}

#[async_trait]
impl AuthRepository for FileAuthRepository {
    async fn find_user_by_email(&self, email: &str) -> Result<Option<AuthUser>, AuthError> {
        let needle = email.trim().to_ascii_lowercase();
        Ok(self
            .store
            .read(|map| {
                map.values()
                    .find(|acc| acc.user.email.eq_ignore_ascii_case(&needle))
                    .map(|acc| acc.user.clone())
            })
            .await)
    }

    async fn create_user(&self, email: &str, name: &str, is_admin: bool) -> Result<AuthUser, AuthError> {
        let email = email.trim().to_ascii_lowercase();
        let name = name.trim().to_string();
        self.store
            .mutate(|map| {
                if map.values().any(|acc| acc.user.email.eq_ignore_ascii_case(&email)) {
                    return Err(crate::errors::ServiceError::Conflict("user exists".into()));
                }
                let user = AuthUser {
                    id: Uuid::new_v4(),
                    email: email.clone(),
                    name: name.clone(),
                    is_admin,
                    created_at: Utc::now(),
                };
                map.insert(user.id, StoredAccount { user: user.clone(), credentials: None });
                Ok(user)
            })
            .await
            .map_err(|e| match e {
                crate::errors::ServiceError::Conflict(_) => AuthError::Conflict,
                other => AuthError::Repository(other.to_string()),
            })
    }

    async fn count_users(&self) -> Result<usize, AuthError> {
        Ok(self.store.read(|map| map.len()).await)
    }

    async fn get_credentials(&self, user_id: Uuid) -> Result<Option<Credentials>, AuthError> {
        Ok(self
            .store
            .get(&user_id)
            .await
            .and_then(|acc| acc.credentials))
    }

    async fn upsert_password(
        &self,
        user_id: Uuid,
        password_hash: String,
        password_algorithm: String,
    ) -> Result<Credentials, AuthError> {
        let cred = Credentials { user_id, password_hash, password_algorithm };
        let stored = cred.clone();
        self.store
            .mutate(move |map| {
                let acc = map
                    .get_mut(&user_id)
                    .ok_or_else(|| crate::errors::ServiceError::not_found("user"))?;
                acc.credentials = Some(stored);
                Ok(())
            })
            .await
            .map_err(|e| match e {
                crate::errors::ServiceError::NotFound(_) => AuthError::NotFound,
                other => AuthError::Repository(other.to_string()),
            })?;
        Ok(cred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn file_repo_round_trips_user_and_credentials() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("users_{}.json", Uuid::new_v4()));
        let repo = FileAuthRepository::open(&path).await?;

        let user = repo.create_user("Admin@Firm.example", "Admin", true).await?;
        assert_eq!(user.email, "admin@firm.example");
        assert!(repo.create_user("admin@firm.example", "Dup", false).await.is_err());

        repo.upsert_password(user.id, "hash".into(), "argon2".into()).await?;
        let cred = repo.get_credentials(user.id).await?.unwrap();
        assert_eq!(cred.password_hash, "hash");
        assert_eq!(repo.count_users().await?, 1);

        let found = repo.find_user_by_email("ADMIN@firm.example").await?;
        assert_eq!(found.unwrap().id, user.id);

        let _ = tokio::fs::remove_file(&path).await;
        Ok(())
    }
}
