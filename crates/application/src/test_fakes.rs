use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;

use custodian_core::{AppError, AppResult};
use custodian_domain::{
    EmailAddress, PermissionView, PermissionViewId, PermissionViewKey, Role, RoleId, UserId,
};

use crate::{
    AuditEvent, AuditRepository, NewUser, PermissionViewRepository, RoleRepository, UserRecord,
    UserRepository,
};

pub(crate) fn permission_view(permission_name: &str, resource_name: &str) -> PermissionView {
    match PermissionViewKey::new(permission_name, resource_name) {
        Ok(key) => PermissionView::new(PermissionViewId::new(), key),
        Err(error) => panic!("invalid test key: {error}"),
    }
}

#[derive(Default)]
pub(crate) struct FakePermissionViewRepository {
    pub(crate) views: Mutex<Vec<PermissionView>>,
}

#[async_trait]
impl PermissionViewRepository for FakePermissionViewRepository {
    async fn find_permission_view(
        &self,
        key: &PermissionViewKey,
    ) -> AppResult<Option<PermissionView>> {
        Ok(self
            .views
            .lock()
            .await
            .iter()
            .find(|view| view.key() == key)
            .cloned())
    }

    async fn insert_permission_view(&self, key: &PermissionViewKey) -> AppResult<PermissionView> {
        let mut views = self.views.lock().await;
        if let Some(existing) = views.iter().find(|view| view.key() == key) {
            return Ok(existing.clone());
        }

        let view = PermissionView::new(PermissionViewId::new(), key.clone());
        views.push(view.clone());
        Ok(view)
    }

    async fn list_permission_views(&self) -> AppResult<Vec<PermissionView>> {
        Ok(self.views.lock().await.clone())
    }
}

#[derive(Default)]
pub(crate) struct FakeRoleRepository {
    pub(crate) roles: Mutex<Vec<Role>>,
    pub(crate) permission_writes: Mutex<usize>,
}

#[async_trait]
impl RoleRepository for FakeRoleRepository {
    async fn create_role(&self, name: &str, permissions: &[PermissionView]) -> AppResult<Role> {
        let mut roles = self.roles.lock().await;
        if roles.iter().any(|role| role.name() == name) {
            return Err(AppError::Conflict(format!("role '{name}' already exists")));
        }

        let role = Role::new(RoleId::new(), name, permissions.to_vec())?;
        roles.push(role.clone());
        Ok(role)
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .find(|role| role.name() == name)
            .cloned())
    }

    async fn find_roles_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<Role>> {
        Ok(self
            .roles
            .lock()
            .await
            .iter()
            .filter(|role| role_ids.contains(&role.id()))
            .cloned()
            .collect())
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        Ok(self.roles.lock().await.clone())
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool> {
        let mut roles = self.roles.lock().await;
        let before = roles.len();
        roles.retain(|role| role.id() != role_id);
        Ok(roles.len() != before)
    }

    async fn add_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[PermissionView],
    ) -> AppResult<Role> {
        *self.permission_writes.lock().await += 1;
        let mut roles = self.roles.lock().await;
        let role = roles
            .iter_mut()
            .find(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        role.grant(permissions.to_vec());
        Ok(role.clone())
    }

    async fn remove_role_permissions(
        &self,
        role_id: RoleId,
        permission_view_ids: &[PermissionViewId],
    ) -> AppResult<Role> {
        *self.permission_writes.lock().await += 1;
        let mut roles = self.roles.lock().await;
        let role = roles
            .iter_mut()
            .find(|role| role.id() == role_id)
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))?;
        role.revoke(permission_view_ids);
        Ok(role.clone())
    }
}

#[derive(Default)]
pub(crate) struct FakeUserRepository {
    pub(crate) users: Mutex<Vec<UserRecord>>,
    pub(crate) fail_role_writes: AtomicBool,
    pub(crate) fail_deletes: AtomicBool,
}

impl FakeUserRepository {
    pub(crate) async fn seed(&self, id: i64, email: &str) -> UserRecord {
        let user = UserRecord {
            id: UserId::new(id),
            username: format!("user{id}"),
            first_name: "Test".to_owned(),
            last_name: "User".to_owned(),
            email: email.to_owned(),
            active: true,
            role_ids: Vec::new(),
        };
        self.users.lock().await.push(user.clone());
        user
    }

    pub(crate) async fn role_ids_of(&self, id: i64) -> Vec<RoleId> {
        self.users
            .lock()
            .await
            .iter()
            .find(|user| user.id == UserId::new(id))
            .map(|user| user.role_ids.clone())
            .unwrap_or_default()
    }

    fn check_role_write(&self) -> AppResult<()> {
        if self.fail_role_writes.load(Ordering::SeqCst) {
            return Err(AppError::Internal("user store unavailable".to_owned()));
        }

        Ok(())
    }
}

#[async_trait]
impl UserRepository for FakeUserRepository {
    async fn find_user_by_id(&self, user_id: UserId) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.id == user_id)
            .cloned())
    }

    async fn find_user_by_email(&self, email: &EmailAddress) -> AppResult<Option<UserRecord>> {
        Ok(self
            .users
            .lock()
            .await
            .iter()
            .find(|user| user.email == email.as_str())
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> AppResult<UserRecord> {
        let mut users = self.users.lock().await;
        if users.iter().any(|existing| {
            existing.email == user.email.as_str() || existing.username == user.username.as_str()
        }) {
            return Err(AppError::Conflict("user already exists".to_owned()));
        }

        let next_id = users.iter().map(|user| user.id.as_i64()).max().unwrap_or(0) + 1;
        let record = UserRecord {
            id: UserId::new(next_id),
            username: user.username.into(),
            first_name: user.first_name.into(),
            last_name: user.last_name.into(),
            email: user.email.into(),
            active: true,
            role_ids: user.role_ids,
        };
        users.push(record.clone());
        Ok(record)
    }

    async fn delete_user(&self, user_id: UserId) -> AppResult<bool> {
        if self.fail_deletes.load(Ordering::SeqCst) {
            return Ok(false);
        }

        let mut users = self.users.lock().await;
        let before = users.len();
        users.retain(|user| user.id != user_id);
        Ok(users.len() != before)
    }

    async fn grant_user_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.check_role_write()?;
        let mut users = self.users.lock().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;
        if !user.role_ids.contains(&role_id) {
            user.role_ids.push(role_id);
        }
        Ok(())
    }

    async fn revoke_user_role(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        self.check_role_write()?;
        let mut users = self.users.lock().await;
        let user = users
            .iter_mut()
            .find(|user| user.id == user_id)
            .ok_or_else(|| AppError::NotFound(format!("user '{user_id}' was not found")))?;
        user.role_ids.retain(|held| held != &role_id);
        Ok(())
    }
}

#[derive(Default)]
pub(crate) struct FakeAuditRepository {
    pub(crate) events: Mutex<Vec<AuditEvent>>,
    pub(crate) fail: AtomicBool,
}

#[async_trait]
impl AuditRepository for FakeAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(AppError::Internal("audit store unavailable".to_owned()));
        }

        self.events.lock().await.push(event);
        Ok(())
    }
}
