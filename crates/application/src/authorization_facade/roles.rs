use super::*;

use tracing::info;

use custodian_core::NonEmptyString;
use custodian_domain::PermissionView;

impl AuthorizationFacade {
    /// Lists all roles sorted by name.
    pub async fn list_roles(&self, caller: Option<&UserIdentity>) -> AppResult<Vec<Role>> {
        require_authenticated(caller)?;
        self.role_store.list().await
    }

    /// Returns the role with the given name.
    pub async fn find_role(&self, caller: Option<&UserIdentity>, name: &str) -> AppResult<Role> {
        require_authenticated(caller)?;
        let name = NonEmptyString::for_field("role name", name)?;
        self.role_store.require_by_name(name.as_str()).await
    }

    /// Creates a role, registering any permission views it references.
    pub async fn create_role(
        &self,
        caller: Option<&UserIdentity>,
        input: CreateRoleInput,
    ) -> AppResult<Role> {
        let actor = require_authenticated(caller)?;
        let name = NonEmptyString::for_field("role name", input.name)?;

        if self.role_store.find_by_name(name.as_str()).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "role '{}' already exists",
                name.as_str()
            )));
        }

        let permissions = match input.permission_view {
            Some(selection) => {
                self.permission_registry
                    .find_or_create_batch(selection)
                    .await?
            }
            None => Vec::new(),
        };

        let role = self.role_store.create(name.as_str(), permissions).await?;

        info!(
            role = role.name(),
            permissions = role.permissions().len(),
            subject = actor.subject(),
            "role created"
        );
        self.record(
            actor,
            AuditAction::SecurityRoleCreated,
            "rbac_role",
            role.id().to_string(),
            format!(
                "created role '{}' with {} permission views",
                role.name(),
                role.permissions().len()
            ),
        )
        .await;

        Ok(role)
    }

    /// Deletes the role with the given name and returns it.
    pub async fn delete_role(&self, caller: Option<&UserIdentity>, name: &str) -> AppResult<Role> {
        let actor = require_authenticated(caller)?;
        let name = NonEmptyString::for_field("role name", name)?;
        let role = self.role_store.require_by_name(name.as_str()).await?;

        self.role_store
            .delete(&role)
            .await
            .map_err(|error| match error {
                AppError::NotFound(message) => AppError::NotFound(message),
                other => AppError::Internal(format!(
                    "failed to delete role '{}': {other}",
                    role.name()
                )),
            })?;

        info!(role = role.name(), subject = actor.subject(), "role deleted");
        self.record(
            actor,
            AuditAction::SecurityRoleDeleted,
            "rbac_role",
            role.id().to_string(),
            format!("deleted role '{}'", role.name()),
        )
        .await;

        Ok(role)
    }

    /// Grants a role to a user and returns the role.
    pub async fn add_role_to_user(
        &self,
        caller: Option<&UserIdentity>,
        input: UserRoleInput,
    ) -> AppResult<Role> {
        let actor = require_authenticated(caller)?;
        let user_id = required_field(input.user_id, "user_id")?;
        let role_name = required_field(input.role_name, "role_name")?;

        let role = self.user_roles.grant_role(user_id, role_name.as_str()).await?;

        info!(role = role.name(), %user_id, subject = actor.subject(), "role granted to user");
        self.record(
            actor,
            AuditAction::SecurityRoleAssigned,
            "rbac_user_role",
            format!("{user_id}:{}", role.id()),
            format!("assigned role '{}' to user '{user_id}'", role.name()),
        )
        .await;

        Ok(role)
    }

    /// Revokes a role from a user and returns the role.
    pub async fn remove_role_from_user(
        &self,
        caller: Option<&UserIdentity>,
        input: UserRoleInput,
    ) -> AppResult<Role> {
        let actor = require_authenticated(caller)?;
        let user_id = required_field(input.user_id, "user_id")?;
        let role_name = required_field(input.role_name, "role_name")?;

        let role = self
            .user_roles
            .revoke_role(user_id, role_name.as_str())
            .await?;

        info!(role = role.name(), %user_id, subject = actor.subject(), "role revoked from user");
        self.record(
            actor,
            AuditAction::SecurityRoleUnassigned,
            "rbac_user_role",
            format!("{user_id}:{}", role.id()),
            format!("removed role '{}' from user '{user_id}'", role.name()),
        )
        .await;

        Ok(role)
    }

    /// Grants permission views to a role, registering unknown pairs.
    pub async fn add_permission_views(
        &self,
        caller: Option<&UserIdentity>,
        input: RolePermissionViewsInput,
    ) -> AppResult<Role> {
        let actor = require_authenticated(caller)?;
        let (role, selection) = self.resolve_role_selection(input).await?;

        let permissions = self
            .permission_registry
            .find_or_create_batch(selection)
            .await?;
        let updated = self.role_store.grant_permissions(&role, permissions).await?;

        self.record_permission_change(
            actor,
            AuditAction::SecurityRolePermissionsGranted,
            &updated,
            "granted",
        )
        .await;

        Ok(updated)
    }

    /// Revokes permission views from a role. Unknown pairs are ignored.
    pub async fn remove_permission_views(
        &self,
        caller: Option<&UserIdentity>,
        input: RolePermissionViewsInput,
    ) -> AppResult<Role> {
        let actor = require_authenticated(caller)?;
        let (role, selection) = self.resolve_role_selection(input).await?;

        let permissions = self.permission_registry.find_batch(selection).await?;
        let updated = self
            .role_store
            .revoke_permissions(&role, permissions)
            .await?;

        self.record_permission_change(
            actor,
            AuditAction::SecurityRolePermissionsRevoked,
            &updated,
            "revoked",
        )
        .await;

        Ok(updated)
    }

    /// Lists every registered permission view.
    pub async fn list_permission_views(
        &self,
        caller: Option<&UserIdentity>,
    ) -> AppResult<Vec<PermissionView>> {
        require_authenticated(caller)?;
        self.permission_registry.list().await
    }

    async fn resolve_role_selection(
        &self,
        input: RolePermissionViewsInput,
    ) -> AppResult<(Role, PermissionViewSelection)> {
        let role_name = required_field(input.role_name, "role_name")?;
        let role_name = NonEmptyString::for_field("role_name", role_name)?;
        let selection = required_field(input.permission_view, "permission_view")?;
        if selection.is_empty() {
            return Err(AppError::InvalidArgument(
                "permission_view must not be empty".to_owned(),
            ));
        }

        let role = self.role_store.require_by_name(role_name.as_str()).await?;
        Ok((role, selection))
    }

    async fn record_permission_change(
        &self,
        actor: &UserIdentity,
        action: AuditAction,
        role: &Role,
        verb: &str,
    ) {
        info!(
            role = role.name(),
            permissions = role.permissions().len(),
            subject = actor.subject(),
            "role permission views {verb}"
        );
        self.record(
            actor,
            action,
            "rbac_role_permission_view",
            role.id().to_string(),
            format!(
                "{verb} permission views on role '{}', now holding {}",
                role.name(),
                role.permissions().len()
            ),
        )
        .await;
    }
}
