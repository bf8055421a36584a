use async_trait::async_trait;

use custodian_core::AppResult;
use custodian_domain::{PermissionView, PermissionViewId, PermissionViewKey, Role, RoleId};

/// Storage port for the permission view registry.
///
/// Implementations must make `insert_permission_view` safe under concurrent
/// callers: two inserts of the same key yield one stored row and the same id.
#[async_trait]
pub trait PermissionViewRepository: Send + Sync {
    /// Finds a permission view by exact key match.
    async fn find_permission_view(
        &self,
        key: &PermissionViewKey,
    ) -> AppResult<Option<PermissionView>>;

    /// Stores the key unless present and returns the stored view either way.
    async fn insert_permission_view(&self, key: &PermissionViewKey) -> AppResult<PermissionView>;

    /// Lists all registered permission views ordered by key.
    async fn list_permission_views(&self) -> AppResult<Vec<PermissionView>>;
}

/// Storage port for roles and their permission sets.
#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Creates a role owning the given permission views.
    ///
    /// Returns `AppError::Conflict` when the name is taken.
    async fn create_role(&self, name: &str, permissions: &[PermissionView]) -> AppResult<Role>;

    /// Finds a role by exact name.
    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>>;

    /// Resolves roles by id. Unknown ids are skipped.
    async fn find_roles_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<Role>>;

    /// Lists all roles ordered by name.
    async fn list_roles(&self) -> AppResult<Vec<Role>>;

    /// Deletes a role with its permission associations.
    ///
    /// Returns `false` when no role with this id existed.
    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool>;

    /// Adds permission views to a role and returns the updated role.
    async fn add_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[PermissionView],
    ) -> AppResult<Role>;

    /// Removes permission views from a role and returns the updated role.
    async fn remove_role_permissions(
        &self,
        role_id: RoleId,
        permission_view_ids: &[PermissionViewId],
    ) -> AppResult<Role>;
}
