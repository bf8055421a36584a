use async_trait::async_trait;
use sqlx::{FromRow, PgPool};

use custodian_application::PermissionViewRepository;
use custodian_core::{AppError, AppResult};
use custodian_domain::{PermissionView, PermissionViewId, PermissionViewKey};

/// PostgreSQL-backed permission view registry.
#[derive(Clone)]
pub struct PostgresPermissionViewRepository {
    pool: PgPool,
}

impl PostgresPermissionViewRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct PermissionViewRow {
    pub(crate) id: uuid::Uuid,
    pub(crate) permission_name: String,
    pub(crate) resource_name: String,
}

impl TryFrom<PermissionViewRow> for PermissionView {
    type Error = AppError;

    fn try_from(row: PermissionViewRow) -> Result<Self, Self::Error> {
        let key = PermissionViewKey::new(row.permission_name, row.resource_name).map_err(
            |error| AppError::Internal(format!("invalid stored permission view '{}': {error}", row.id)),
        )?;

        Ok(PermissionView::new(PermissionViewId::from_uuid(row.id), key))
    }
}

#[async_trait]
impl PermissionViewRepository for PostgresPermissionViewRepository {
    async fn find_permission_view(
        &self,
        key: &PermissionViewKey,
    ) -> AppResult<Option<PermissionView>> {
        let row = sqlx::query_as::<_, PermissionViewRow>(
            r#"
            SELECT id, permission_name, resource_name
            FROM permission_views
            WHERE permission_name = $1 AND resource_name = $2
            LIMIT 1
            "#,
        )
        .bind(key.permission_name())
        .bind(key.resource_name())
        .fetch_optional(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to find permission view '{key}': {error}"))
        })?;

        row.map(PermissionView::try_from).transpose()
    }

    async fn insert_permission_view(&self, key: &PermissionViewKey) -> AppResult<PermissionView> {
        // The no-op update makes RETURNING yield the existing id on conflict.
        let id = sqlx::query_scalar::<_, uuid::Uuid>(
            r#"
            INSERT INTO permission_views (id, permission_name, resource_name)
            VALUES ($1, $2, $3)
            ON CONFLICT (permission_name, resource_name) DO UPDATE
            SET permission_name = EXCLUDED.permission_name
            RETURNING id
            "#,
        )
        .bind(PermissionViewId::new().as_uuid())
        .bind(key.permission_name())
        .bind(key.resource_name())
        .fetch_one(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to register permission view '{key}': {error}"))
        })?;

        Ok(PermissionView::new(
            PermissionViewId::from_uuid(id),
            key.clone(),
        ))
    }

    async fn list_permission_views(&self) -> AppResult<Vec<PermissionView>> {
        let rows = sqlx::query_as::<_, PermissionViewRow>(
            r#"
            SELECT id, permission_name, resource_name
            FROM permission_views
            ORDER BY permission_name, resource_name
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to list permission views: {error}")))?;

        rows.into_iter().map(PermissionView::try_from).collect()
    }
}
