use crate::domain::error::DomainError;
use crate::domain::repository::UserRepository;
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, instrument, trace, warn};

#[derive(Clone)]
pub struct InMemoryUserRepository {
    storage: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::from_users(Vec::new())
    }

    pub fn from_users(users: Vec<User>) -> Self {
        let storage = users.into_iter().map(|u| (u.id.clone(), u)).collect();
        Self {
            storage: Arc::new(RwLock::new(storage)),
        }
    }

    pub async fn snapshot(&self) -> Vec<User> {
        let storage = self.storage.read().await;
        storage.values().cloned().collect()
    }
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    #[instrument(skip(self, user), fields(user_id = %user.id, email = %user.email))]
    async fn create_user(&self, user: User) -> Result<()> {
        trace!("Acquiring write lock for user storage");
        let mut storage = self.storage.write().await;
        if storage.values().any(|u| u.email == user.email) {
            warn!(email = %user.email, "Email already registered");
            return Err(
                DomainError::Validation("User with this email already exists".to_string()).into(),
            );
        }
        storage.insert(user.id.clone(), user.clone());
        debug!(user_id = %user.id, email = %user.email, "User saved to memory storage");
        Ok(())
    }

    #[instrument(skip(self), fields(email = email))]
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        let user = storage.values().find(|u| u.email == email).cloned();
        match &user {
            Some(u) => debug!(user_id = %u.id, "User found in storage"),
            None => trace!(email = email, "User not found in storage"),
        }
        Ok(user)
    }

    #[instrument(skip(self), fields(user_id = id))]
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>> {
        let storage = self.storage.read().await;
        let user = storage.get(id).cloned();
        if user.is_none() {
            trace!(user_id = id, "User not found in storage");
        }
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            name: format!("name-{}", id),
            email: email.to_string(),
            password_hash: "hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_create_user_saves_user_correctly() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(user("user-1", "test@example.com"))
            .await
            .unwrap();

        let retrieved = repo.find_user_by_id("user-1").await.unwrap().unwrap();
        assert_eq!(retrieved.email, "test@example.com");
        assert_eq!(retrieved.name, "name-user-1");
        assert_eq!(retrieved.password_hash, "hash");
    }

    #[tokio::test]
    async fn test_find_user_by_email() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(user("user-2", "alice@example.com"))
            .await
            .unwrap();

        let found = repo.find_user_by_email("alice@example.com").await.unwrap();
        assert_eq!(found.unwrap().id, "user-2");

        let missing = repo
            .find_user_by_email("nonexistent@example.com")
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_find_user_by_id_returns_none_for_nonexistent_id() {
        let repo = InMemoryUserRepository::new();
        assert!(repo.find_user_by_id("nonexistent-id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_create_user_rejects_duplicate_email() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(user("user-3", "dup@example.com"))
            .await
            .unwrap();

        let err = repo
            .create_user(user("user-4", "dup@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DomainError>(),
            Some(DomainError::Validation(_))
        ));
        assert!(repo.find_user_by_id("user-4").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_user_by_email_case_sensitive() {
        let repo = InMemoryUserRepository::new();
        repo.create_user(user("user-5", "Test@Example.com"))
            .await
            .unwrap();

        assert!(
            repo.find_user_by_email("Test@Example.com")
                .await
                .unwrap()
                .is_some()
        );
        assert!(
            repo.find_user_by_email("test@example.com")
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    async fn test_concurrent_registrations_with_same_email_admit_one() {
        let repo = InMemoryUserRepository::new();

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let repo_clone = repo.clone();
                let candidate = user(&format!("user-{}", i), "race@example.com");
                tokio::spawn(async move { repo_clone.create_user(candidate).await })
            })
            .collect();

        let mut created = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                created += 1;
            }
        }
        assert_eq!(created, 1);
        assert_eq!(repo.snapshot().await.len(), 1);
    }

    #[tokio::test]
    async fn test_from_users_restores_snapshot() {
        let repo = InMemoryUserRepository::from_users(vec![
            user("user-7", "a@example.com"),
            user("user-8", "b@example.com"),
        ]);
        assert!(repo.find_user_by_id("user-8").await.unwrap().is_some());
        assert_eq!(repo.snapshot().await.len(), 2);
    }
}
