//! User-role assignment over the external user store.

use std::sync::Arc;

use custodian_core::{AppError, AppResult, NonEmptyString};
use custodian_domain::{Role, UserId};

use crate::{RoleStoreService, UserRecord, UserRepository};

/// Application service granting and revoking roles on users.
///
/// Holds only references into the role store and the user store; it never
/// owns the lifecycle of either.
#[derive(Clone)]
pub struct UserRoleService {
    user_repository: Arc<dyn UserRepository>,
    role_store: RoleStoreService,
}

impl UserRoleService {
    /// Creates an assignment service from required dependencies.
    #[must_use]
    pub fn new(user_repository: Arc<dyn UserRepository>, role_store: RoleStoreService) -> Self {
        Self {
            user_repository,
            role_store,
        }
    }

    /// Adds the role to the user's role set and returns the role.
    pub async fn grant_role(&self, user_id: UserId, role_name: &str) -> AppResult<Role> {
        let (user, role) = self.resolve(user_id, role_name).await?;

        self.user_repository
            .grant_user_role(user.id, role.id())
            .await
            .map_err(|error| persist_failure(error, user.id, "grant"))?;

        Ok(role)
    }

    /// Removes the role from the user's role set and returns the role.
    pub async fn revoke_role(&self, user_id: UserId, role_name: &str) -> AppResult<Role> {
        let (user, role) = self.resolve(user_id, role_name).await?;

        self.user_repository
            .revoke_user_role(user.id, role.id())
            .await
            .map_err(|error| persist_failure(error, user.id, "revoke"))?;

        Ok(role)
    }

    /// Resolves the roles a user holds. References to deleted roles are skipped.
    pub async fn roles_for_user(&self, user: &UserRecord) -> AppResult<Vec<Role>> {
        self.role_store.find_by_ids(user.role_ids.as_slice()).await
    }

    /// Loads a user, failing with `NotFound` on a miss.
    pub async fn require_user(&self, user_id: UserId) -> AppResult<UserRecord> {
        self.user_repository
            .find_user_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))
    }

    async fn resolve(&self, user_id: UserId, role_name: &str) -> AppResult<(UserRecord, Role)> {
        let role_name = NonEmptyString::for_field("role_name", role_name)?;
        let user = self.require_user(user_id).await?;
        let role = self.role_store.require_by_name(role_name.as_str()).await?;
        Ok((user, role))
    }
}

fn persist_failure(error: AppError, user_id: UserId, operation: &str) -> AppError {
    match error {
        AppError::NotFound(message) => AppError::NotFound(message),
        other => AppError::Internal(format!(
            "failed to persist role {operation} for user '{user_id}': {other}"
        )),
    }
}
