use async_trait::async_trait;
use sqlx::PgPool;

use custodian_application::{AuditEvent, AuditRepository};
use custodian_core::{AppError, AppResult};

/// Append-only audit trail for role, permission view and user mutations.
#[derive(Clone)]
pub struct PostgresAuditRepository {
    pool: PgPool,
}

impl PostgresAuditRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditRepository for PostgresAuditRepository {
    async fn append_event(&self, event: AuditEvent) -> AppResult<()> {
        let AuditEvent {
            subject,
            action,
            resource_type,
            resource_id,
            detail,
        } = event;
        let action = action.as_str();

        sqlx::query(
            r#"
            INSERT INTO audit_log_entries (
                subject,
                action,
                resource_type,
                resource_id,
                detail
            )
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(subject)
        .bind(action)
        .bind(resource_type.as_str())
        .bind(resource_id.as_str())
        .bind(detail)
        .execute(&self.pool)
        .await
        .map_err(|error| {
            AppError::Internal(format!(
                "failed to append '{action}' audit event for {resource_type} '{resource_id}': {error}"
            ))
        })?;

        Ok(())
    }
}
