use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, PgPool, Postgres, Transaction};

use custodian_application::RoleRepository;
use custodian_core::{AppError, AppResult};
use custodian_domain::{PermissionView, PermissionViewId, Role, RoleId};

use crate::postgres_permission_view_repository::PermissionViewRow;

#[cfg(test)]
mod tests;

/// PostgreSQL-backed role store.
#[derive(Clone)]
pub struct PostgresRoleRepository {
    pool: PgPool,
}

impl PostgresRoleRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_roles(&self, role_ids: Option<Vec<uuid::Uuid>>) -> AppResult<Vec<Role>> {
        let rows = sqlx::query_as::<_, RoleRow>(
            r#"
            SELECT
                roles.id AS role_id,
                roles.name AS role_name,
                views.id AS permission_view_id,
                views.permission_name,
                views.resource_name
            FROM rbac_roles AS roles
            LEFT JOIN rbac_role_permission_views AS grants
                ON grants.role_id = roles.id
            LEFT JOIN permission_views AS views
                ON views.id = grants.permission_view_id
            WHERE $1::uuid[] IS NULL OR roles.id = ANY($1)
            ORDER BY roles.name, views.permission_name, views.resource_name
            "#,
        )
        .bind(role_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load roles: {error}")))?;

        aggregate_roles(rows)
    }

    async fn fetch_role(&self, role_id: RoleId) -> AppResult<Role> {
        self.fetch_roles(Some(vec![role_id.as_uuid()]))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| AppError::NotFound(format!("role '{role_id}' was not found")))
    }
}

#[derive(Debug, FromRow)]
struct RoleRow {
    role_id: uuid::Uuid,
    role_name: String,
    permission_view_id: Option<uuid::Uuid>,
    permission_name: Option<String>,
    resource_name: Option<String>,
}

#[async_trait]
impl RoleRepository for PostgresRoleRepository {
    async fn create_role(&self, name: &str, permissions: &[PermissionView]) -> AppResult<Role> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        let role_id = RoleId::new();
        sqlx::query(
            r#"
            INSERT INTO rbac_roles (id, name)
            VALUES ($1, $2)
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(name)
        .execute(&mut *transaction)
        .await
        .map_err(|error| map_role_conflict(error, name))?;

        insert_grants(&mut transaction, role_id, permissions).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        Role::new(role_id, name, permissions.iter().cloned())
    }

    async fn find_role_by_name(&self, name: &str) -> AppResult<Option<Role>> {
        let role_id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            SELECT id
            FROM rbac_roles
            WHERE name = $1
            LIMIT 1
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to resolve role: {error}")))?;

        match role_id {
            Some(role_id) => Ok(self
                .fetch_roles(Some(vec![role_id]))
                .await?
                .into_iter()
                .next()),
            None => Ok(None),
        }
    }

    async fn find_roles_by_ids(&self, role_ids: &[RoleId]) -> AppResult<Vec<Role>> {
        let role_ids = role_ids.iter().map(RoleId::as_uuid).collect::<Vec<_>>();
        self.fetch_roles(Some(role_ids)).await
    }

    async fn list_roles(&self) -> AppResult<Vec<Role>> {
        self.fetch_roles(None).await
    }

    async fn delete_role(&self, role_id: RoleId) -> AppResult<bool> {
        let rows_affected = sqlx::query(
            r#"
            DELETE FROM rbac_roles
            WHERE id = $1
            "#,
        )
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to delete role: {error}")))?
        .rows_affected();

        Ok(rows_affected > 0)
    }

    async fn add_role_permissions(
        &self,
        role_id: RoleId,
        permissions: &[PermissionView],
    ) -> AppResult<Role> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to begin transaction: {error}"))
        })?;

        insert_grants(&mut transaction, role_id, permissions).await?;

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!("failed to commit transaction: {error}"))
        })?;

        self.fetch_role(role_id).await
    }

    async fn remove_role_permissions(
        &self,
        role_id: RoleId,
        permission_view_ids: &[PermissionViewId],
    ) -> AppResult<Role> {
        let permission_view_ids = permission_view_ids
            .iter()
            .map(PermissionViewId::as_uuid)
            .collect::<Vec<_>>();

        sqlx::query(
            r#"
            DELETE FROM rbac_role_permission_views
            WHERE role_id = $1 AND permission_view_id = ANY($2)
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission_view_ids)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to revoke role permission views: {error}"))
        })?;

        self.fetch_role(role_id).await
    }
}

async fn insert_grants(
    transaction: &mut Transaction<'_, Postgres>,
    role_id: RoleId,
    permissions: &[PermissionView],
) -> AppResult<()> {
    for permission in permissions {
        sqlx::query(
            r#"
            INSERT INTO rbac_role_permission_views (role_id, permission_view_id)
            VALUES ($1, $2)
            ON CONFLICT (role_id, permission_view_id) DO NOTHING
            "#,
        )
        .bind(role_id.as_uuid())
        .bind(permission.id().as_uuid())
        .execute(&mut **transaction)
        .await
        .map_err(|error| map_grant_error(error, role_id, permission))?;
    }

    Ok(())
}

fn aggregate_roles(rows: Vec<RoleRow>) -> AppResult<Vec<Role>> {
    let mut order = Vec::new();
    let mut by_id: HashMap<uuid::Uuid, (String, Vec<PermissionView>)> = HashMap::new();

    for row in rows {
        let entry = by_id.entry(row.role_id).or_insert_with(|| {
            order.push(row.role_id);
            (row.role_name.clone(), Vec::new())
        });

        if let (Some(id), Some(permission_name), Some(resource_name)) =
            (row.permission_view_id, row.permission_name, row.resource_name)
        {
            entry.1.push(PermissionView::try_from(PermissionViewRow {
                id,
                permission_name,
                resource_name,
            })?);
        }
    }

    order
        .into_iter()
        .filter_map(|role_id| by_id.remove(&role_id).map(|role| (role_id, role)))
        .map(|(role_id, (name, permissions))| {
            Role::new(RoleId::from_uuid(role_id), name, permissions).map_err(|error| {
                AppError::Internal(format!("invalid stored role '{role_id}': {error}"))
            })
        })
        .collect()
}

fn map_role_conflict(error: sqlx::Error, role_name: &str) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23505")
    {
        return AppError::Conflict(format!("role '{role_name}' already exists"));
    }

    AppError::Internal(format!("failed to create role: {error}"))
}

fn map_grant_error(error: sqlx::Error, role_id: RoleId, permission: &PermissionView) -> AppError {
    if let sqlx::Error::Database(database_error) = &error
        && database_error.code().as_deref() == Some("23503")
    {
        return AppError::NotFound(format!(
            "role '{role_id}' or permission view '{}' was not found",
            permission.key()
        ));
    }

    AppError::Internal(format!("failed to persist role permission views: {error}"))
}
