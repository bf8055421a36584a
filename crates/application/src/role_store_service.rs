//! Role store: named permission sets with create, delete, grant and revoke.

use std::sync::Arc;

use custodian_core::{AppError, AppResult, NonEmptyString};
use custodian_domain::{PermissionView, PermissionViewId, Role, RoleId};

use crate::RoleRepository;

/// Application service owning role lifecycle and role permission sets.
#[derive(Clone)]
pub struct RoleStoreService {
    repository: Arc<dyn RoleRepository>,
}

impl RoleStoreService {
    /// Creates a role store service over a repository implementation.
    #[must_use]
    pub fn new(repository: Arc<dyn RoleRepository>) -> Self {
        Self { repository }
    }

    /// Creates a role holding exactly the given permission views.
    pub async fn create(&self, name: &str, permissions: Vec<PermissionView>) -> AppResult<Role> {
        let name = NonEmptyString::for_field("role name", name)?;
        let permissions = deduplicate(permissions);

        self.repository
            .create_role(name.as_str(), permissions.as_slice())
            .await
    }

    /// Finds a role by exact name.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        self.repository.find_role_by_name(name).await
    }

    /// Finds a role by exact name, failing with `NotFound` on a miss.
    pub async fn require_by_name(&self, name: &str) -> AppResult<Role> {
        self.find_by_name(name)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("role '{name}' was not found")))
    }

    /// Resolves role references, skipping ids of deleted roles.
    pub async fn find_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<Role>> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }

        self.repository.find_roles_by_ids(role_ids).await
    }

    /// Lists all roles.
    pub async fn list(&self) -> AppResult<Vec<Role>> {
        self.repository.list_roles().await
    }

    /// Deletes the role and its permission associations.
    pub async fn delete(&self, role: &Role) -> AppResult<()> {
        if !self.repository.delete_role(role.id()).await? {
            return Err(AppError::NotFound(format!(
                "role '{}' no longer exists",
                role.name()
            )));
        }

        Ok(())
    }

    /// Adds permission views to the role and returns the stored role.
    ///
    /// Views already held are ignored by the store, so the write is always
    /// issued and the result reflects what was persisted.
    pub async fn grant_permissions(
        &self,
        role: &Role,
        permissions: Vec<PermissionView>,
    ) -> AppResult<Role> {
        let permissions = deduplicate(permissions);

        self.repository
            .add_role_permissions(role.id(), permissions.as_slice())
            .await
    }

    /// Removes permission views from the role and returns the stored role.
    /// Views not held are ignored.
    pub async fn revoke_permissions(
        &self,
        role: &Role,
        permissions: Vec<PermissionView>,
    ) -> AppResult<Role> {
        let permission_view_ids = deduplicate(permissions)
            .iter()
            .map(PermissionView::id)
            .collect::<Vec<PermissionViewId>>();

        self.repository
            .remove_role_permissions(role.id(), permission_view_ids.as_slice())
            .await
    }
}

fn deduplicate(permissions: Vec<PermissionView>) -> Vec<PermissionView> {
    let mut unique: Vec<PermissionView> = Vec::with_capacity(permissions.len());
    for permission in permissions {
        if !unique.iter().any(|existing| existing.id() == permission.id()) {
            unique.push(permission);
        }
    }

    unique
}
