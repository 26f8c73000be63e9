//! User business logic: DTO mapping and update semantics.

use std::sync::Arc;

use emporium_core::{UserDto, UserId};
use emporium_runtime::ServiceError;

use crate::db::UserRepository;

/// Operations exposed by the User Service.
#[derive(Clone)]
pub struct UserService {
    repo: Arc<dyn UserRepository>,
}

impl UserService {
    #[must_use]
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { repo }
    }

    /// All users.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn find_all(&self) -> Result<Vec<UserDto>, ServiceError> {
        let users = self.repo.find_all().await?;
        Ok(users.into_iter().map(UserDto::from).collect())
    }

    /// One user.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the id is unknown.
    pub async fn find_by_id(&self, id: UserId) -> Result<UserDto, ServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .map(UserDto::from)
            .ok_or(ServiceError::NotFound {
                entity: "User",
                id: id.as_i32(),
            })
    }

    /// Create a user. Any `userId` in the body is ignored.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn save(&self, dto: UserDto) -> Result<UserDto, ServiceError> {
        let user = self.repo.create(dto.into()).await?;
        tracing::info!(user_id = %user.id, "User created");
        Ok(user.into())
    }

    /// Update the user identified by the body's `userId`.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Validation` without an id and
    /// `ServiceError::NotFound` if the id is unknown.
    pub async fn update(&self, dto: UserDto) -> Result<UserDto, ServiceError> {
        let id = dto
            .user_id
            .ok_or_else(|| ServiceError::Validation("userId is required".to_string()))?;
        self.update_by_id(id, dto).await
    }

    /// Update the user identified by `id`, ignoring any id in the body.
    ///
    /// Only attributes present in `dto` change.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::NotFound` if the id is unknown.
    pub async fn update_by_id(&self, id: UserId, dto: UserDto) -> Result<UserDto, ServiceError> {
        let mut user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound {
                entity: "User",
                id: id.as_i32(),
            })?;

        user.apply(dto);
        let user = self.repo.update(user).await?;
        tracing::info!(user_id = %user.id, "User updated");
        Ok(user.into())
    }

    /// Delete a user. Unknown ids succeed.
    ///
    /// # Errors
    ///
    /// Returns `ServiceError::Repository` if the store fails.
    pub async fn delete_by_id(&self, id: UserId) -> Result<(), ServiceError> {
        self.repo.delete_by_id(id).await?;
        tracing::info!(user_id = %id, "User deleted");
        Ok(())
    }
}
