use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use custodian_application::{
    AuditEvent, AuditRepository, NewUser, PermissionViewRepository, RoleRepository, UserRecord,
    UserRepository,
};
use custodian_core::{AppError, AppResult};
use custodian_domain::{
    EmailAddress, PermissionView, PermissionViewId, PermissionViewKey, Role, RoleId, UserId,
};

/// In-memory implementation of every RBAC storage port.
///
/// Each mutation runs under one write guard, so a request either applies in
/// full or not at all.
#[derive(Debug, Default)]
pub struct InMemoryRbacRepository {
    permission_views: RwLock<HashMap<PermissionViewKey, PermissionView>>,
    roles: RwLock<HashMap<RoleId, Role>>,
    users: RwLock<BTreeMap<UserId, UserRecord>>,
    last_user_id: AtomicI64,
    audit_events: RwLock<Vec<AuditEvent>>,
}

impl InMemoryRbacRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of the appended audit events.
    pub async fn audit_events(&self) -> Vec<AuditEvent> {
        self.audit_events.read().await.clone()
    }
}

#[async_trait]
impl PermissionViewRepository for InMemoryRbacRepository {
    async fn find_permission_view(
        &self,
        key: &PermissionViewKey,
    ) -> AppResult<Option<PermissionView>> {
        Ok(self.permission_views.read().await.get(key).cloned())
    }

    async fn insert_permission_view(&self, key: &PermissionViewKey) -> AppResult<PermissionView> {
        Ok(self
            .permission_views
            .write()
            .await
            .entry(key.clone())
            .or_insert_with(|| PermissionView::new(PermissionViewId::new(), key.clone()))
            .clone())
    }

    async fn list_permission_views(&self) -> AppResult<Vec<PermissionView>> {
        let mut values = self
            .permission_views
            .read()
            .await
            .values()
            .cloned()
            .collect::<Vec<_>>();
        values.sort_by(|left, right| left.key().cmp(right.key()));
        Ok(values)
    }
}

#[async_trait]
impl RoleRepository for InMemoryRbacRepository {
    async fn create_role(&self, name: &str, permissions: &[PermissionView]) -> AppResult<Role> {
        let mut roles = self.roles.write().await;
        if roles.values().any(|role| role.name() == name) {
            return Err(AppError::Conflict(format!("role '{name}' already exists")));
        }

        let role = Role::new(RoleId::new(), name, permissions.iter().cloned())?;
        roles.insert(role.id(), role.clone());
        Ok(role)
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .read()
            .await
            .values()
            .find(|role| role.name() == name)
            .cloned())
    }

    async fn find_roles_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<Role>> {
        let roles = self.roles.read().await;
        let mut values = role_ids
            .iter()
            .filter_map(|role_id| roles.get(role_id).cloned())
            .collect::<Vec<_>>();
        values.sort_by(|left, right| left.name().cmp(right.name()));
        values.dedup_by_key(|role| role.id());
        Ok(values)
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        let mut values = self.roles.read().await.values().cloned().collect::<Vec<_>>();
        values.sort_by(|left, right| left.name().cmp(right.name()));
        Ok(values)
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool> {
        Ok(self.roles.write().await.remove(&role_id).is_some())
    }

    async fn add_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[PermissionView],
    ) -> AppResult<Role> {
        let mut roles = self.roles.write().await;
        let role = roles
            .get_mut(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        role.grant(permissions.iter().cloned());
        Ok(role.clone())
    }

    async fn remove_role_permissions(
        &self,
        role_id: RoleId,
        permission_view_ids: &[PermissionViewId],
    ) -> AppResult<Role> {
        let mut roles = self.roles.write().await;
        let role = roles
            .get_mut(&role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        role.revoke(permission_view_ids);
        Ok(role.clone())
    }
}

#[async_trait]
impl UserRepository for InMemoryRbacRepository {
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self.users.read().await.get(&user_id).cloned())
    }

    async fn find_user_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|user| user.email == email.as_str())
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut users = self.users.write().await;
        if users.values().any(|existing| {
            existing.email == user.email.as_str() || existing.username == user.username.as_str()
        }) {
            return Err(AppError::Conflict(
                "a user with this email or username already exists".to_owned(),
            ));
        }

        // Ids are never reused, matching a database sequence.
        let next_id = self.last_user_id.fetch_add(1, Ordering::SeqCst) + 1;
        let record = UserRecord {
            id: UserId::new(next_id),
            username: user.username.into(),
            first_name: user.first_name.into(),
            last_name: user.last_name.into(),
            email: user.email.into(),
            active: true,
            role_ids: user.role_ids,
        };
        users.insert(record.id, record.clone());
        Ok(record)
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        Ok(self.users.write().await.remove(&user_id).is_some())
    }

    async fn grant_user_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;
        if !user.has_role(role_id) {
            user.role_ids.push(role_id);
        }
        Ok(())
    }

    async fn revoke_user_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut users = self.users.write().await;
        let user = users
            .get_mut(&user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;
        user.role_ids.retain(|held| *held != role_id);
        Ok(())
    }
}

#[async_trait]
impl AuditRepository for InMemoryRbacRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        self.audit_events.write().await.push(event);
        Ok(())
    }
}
