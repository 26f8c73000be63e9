use async_trait::async_trait;
use chrono::Utc;
use emporium_core::UserId;
use emporium_runtime::{MemoryTable, RepositoryError};

use super::UserRepository;
use crate::models::{NewUser, User};

/// In-process user repository for local development and tests.
#[derive(Debug, Default)]
pub struct MemoryUserRepository {
    table: MemoryTable<User>,
}

impl MemoryUserRepository {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            table: MemoryTable::new(),
        }
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn create(&self, user: NewUser) -> Result<User, RepositoryError> {
        let now = Utc::now();
        self.table
            .insert_with(|id| User {
                id: UserId::new(id),
                first_name: user.first_name,
                last_name: user.last_name,
                email: user.email,
                phone: user.phone,
                created_at: now,
                updated_at: now,
            })
            .await
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        Ok(self.table.get(id.as_i32()).await)
    }

    async fn find_all(&self) -> Result<Vec<User>, RepositoryError> {
        Ok(self.table.all().await)
    }

    async fn update(&self, mut user: User) -> Result<User, RepositoryError> {
        user.updated_at = Utc::now();
        self.table.replace(user.id.as_i32(), user).await
    }

    async fn delete_by_id(&self, id: UserId) -> Result<(), RepositoryError> {
        self.table.remove(id.as_i32()).await;
        Ok(())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_round_trip_and_delete() {
        let repo = MemoryUserRepository::new();
        let created = repo
            .create(NewUser {
                first_name: Some("John".into()),
                email: Some("john@test.com".into()),
                ..NewUser::default()
            })
            .await
            .unwrap();

        let fetched = repo.find_by_id(created.id).await.unwrap().unwrap();
        assert_eq!(fetched, created);

        repo.delete_by_id(created.id).await.unwrap();
        repo.delete_by_id(created.id).await.unwrap();
        assert!(repo.find_by_id(created.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = MemoryUserRepository::new();
        let now = Utc::now();
        let ghost = User {
            id: UserId::new(12),
            first_name: None,
            last_name: None,
            email: None,
            phone: None,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            repo.update(ghost).await,
            Err(RepositoryError::NotFound)
        ));
    }
}
