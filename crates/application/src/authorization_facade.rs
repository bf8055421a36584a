//! Single entry point used by the transport layer.
//!
//! Every operation first requires an authenticated caller, then dispatches to
//! the registry, role store and user services. Failures leave this module as
//! one of the [`AppError`] categories only; successful mutations are audited.

use std::sync::Arc;

use tracing::warn;

use custodian_core::{AppError, AppResult, UserIdentity};
use custodian_domain::{AuditAction, PermissionViewSelection, Role, UserId};

use crate::{
    AuditEvent, AuditRepository, PermissionRegistryService, PermissionViewRepository,
    RoleRepository, RoleStoreService, UserDirectoryService, UserRecord, UserRepository,
    UserRoleService,
};

mod roles;
mod users;

#[cfg(test)]
mod tests;

/// Input payload for role creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateRoleInput {
    /// Unique role name.
    pub name: String,
    /// Permission views the role starts with. Absent means none.
    pub permission_view: Option<PermissionViewSelection>,
}

/// Input payload for granting or revoking a role on a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRoleInput {
    /// Target user.
    pub user_id: Option<UserId>,
    /// Role to grant or revoke.
    pub role_name: Option<String>,
}

/// Input payload for granting or revoking permission views on a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePermissionViewsInput {
    /// Target role.
    pub role_name: Option<String>,
    /// Permission views to grant or revoke.
    pub permission_view: Option<PermissionViewSelection>,
}

/// User record with its resolved roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserDetails {
    /// Stored user record.
    pub user: UserRecord,
    /// Roles the user currently holds. Deleted roles are not listed.
    pub roles: Vec<Role>,
}

/// Dispatch and error-normalization layer over the RBAC services.
#[derive(Clone)]
pub struct AuthorizationFacade {
    permission_registry: PermissionRegistryService,
    role_store: RoleStoreService,
    user_roles: UserRoleService,
    user_directory: UserDirectoryService,
    audit_repository: Arc<dyn AuditRepository>,
}

impl AuthorizationFacade {
    /// Creates a facade from the storage ports it coordinates.
    #[must_use]
    pub fn new(
        permission_view_repository: Arc<dyn PermissionViewRepository>,
        role_repository: Arc<dyn RoleRepository>,
        user_repository: Arc<dyn UserRepository>,
        audit_repository: Arc<dyn AuditRepository>,
    ) -> Self {
        let role_store = RoleStoreService::new(role_repository);

        Self {
            permission_registry: PermissionRegistryService::new(permission_view_repository),
            user_roles: UserRoleService::new(user_repository.clone(), role_store.clone()),
            user_directory: UserDirectoryService::new(user_repository, role_store.clone()),
            role_store,
            audit_repository,
        }
    }

    /// Returns the authenticated caller.
    pub fn current_user<'a>(&self, caller: Option<&'a UserIdentity>) -> AppResult<&'a UserIdentity> {
        require_authenticated(caller)
    }

    async fn record(
        &self,
        actor: &UserIdentity,
        action: AuditAction,
        resource_type: &str,
        resource_id: String,
        detail: String,
    ) {
        let event = AuditEvent {
            subject: actor.subject().to_owned(),
            action,
            resource_type: resource_type.to_owned(),
            resource_id,
            detail: Some(detail),
        };

        if let Err(error) = self.audit_repository.append_event(event).await {
            warn!(action = action.as_str(), %error, "failed to append audit event");
        }
    }
}

fn require_authenticated(caller: Option<&UserIdentity>) -> AppResult<&UserIdentity> {
    caller.ok_or_else(|| AppError::Unauthorized("authentication required".to_owned()))
}

fn required_field<T>(value: Option<T>, field: &str) -> AppResult<T> {
    value.ok_or_else(|| AppError::InvalidArgument(format!("{field} is required")))
}
