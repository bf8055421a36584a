//! User directory lookups and lifecycle against the external user store.

use std::sync::Arc;

use custodian_core::{AppError, AppResult, NonEmptyString};
use custodian_domain::{EmailAddress, UserId};

use crate::{NewUser, RoleStoreService, UserRecord, UserRepository};

/// Input payload for creating users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateUserInput {
    /// Unique login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Email address.
    pub email: String,
    /// Names of roles to attach on creation.
    pub role_names: Vec<String>,
}

/// Application service for user lookup, creation and deletion.
#[derive(Clone)]
pub struct UserDirectoryService {
    user_repository: Arc<dyn UserRepository>,
    role_store: RoleStoreService,
}

impl UserDirectoryService {
    /// Creates a directory service from required dependencies.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>, role_store: RoleStoreService) -> Self {
        Self {
            user_repository,
            role_store,
        }
    }

    /// Finds a user by email, failing with `NotFound` on a miss.
    pub async fn find_by_email(&self, email: &str) -> AppResult<UserRecord> {
        let email = EmailAddress::new(email)?;
        self.user_repository
            .find_user_by_email(&email)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{}' was not found", email.as_str())))
    }

    /// Creates a user with the requested initial roles.
    pub async fn create(&self, input: CreateUserInput) -> AppResult<UserRecord> {
        let new_user = self.validate(input).await?;
        self.user_repository.create_user(new_user).await
    }

    /// Returns the user registered under the input email, creating it when absent.
    ///
    /// The flag is `true` when the user was created by this call.
    pub async fn get_or_create(&self, input: CreateUserInput) -> AppResult<(UserRecord, bool)> {
        let email = EmailAddress::new(input.email.as_str())?;
        if let Some(existing) = self.user_repository.find_user_by_email(&email).await? {
            return Ok((existing, false));
        }

        match self.create(input).await {
            Ok(created) => Ok((created, true)),
            // Lost a race against a concurrent create of the same email.
            Err(AppError::Conflict(message)) => self
                .user_repository
                .find_user_by_email(&email)
                .await?
                .map(|existing| (existing, false))
                .ok_or(AppError::Conflict(message)),
            Err(error) => Err(error),
        }
    }

    /// Deletes a user.
    pub async fn delete(&self, user_id: UserId) -> AppResult<UserRecord> {
        let user = self
            .user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;

        if !self.user_repository.delete_user(user_id).await? {
            return Err(AppError::Internal(format!(
                "failed to delete user '{user_id}'"
            )));
        }

        Ok(user)
    }

    async fn validate(&self, input: CreateUserInput) -> AppResult<NewUser> {
        let username = NonEmptyString::for_field("username", input.username)?;
        let first_name = NonEmptyString::for_field("first_name", input.first_name)?;
        let last_name = NonEmptyString::for_field("last_name", input.last_name)?;
        let email = EmailAddress::new(input.email)?;

        let mut role_ids = Vec::with_capacity(input.role_names.len());
        for role_name in &input.role_names {
            let role = self.role_store.require_by_name(role_name.as_str()).await?;
            if !role_ids.contains(&role.id()) {
                role_ids.push(role.id());
            }
        }

        Ok(NewUser {
            username,
            first_name,
            last_name,
            email,
            role_ids,
        })
    }
}
