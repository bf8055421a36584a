use super::*;

impl PostgresUserRepository {
    pub(super) async fn grant_role_impl(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        sqlx::query(
            r#"
            INSERT INTO rbac_user_roles (user_id, role_id)
            VALUES ($1, $2)
            ON CONFLICT (user_id, role_id) DO NOTHING
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| reference_missing_or_internal(error, "grant user role"))?;

        Ok(())
    }

    pub(super) async fn revoke_role_impl(&self, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        sqlx::query(
            r#"
            DELETE FROM rbac_user_roles
            WHERE user_id = $1 AND role_id = $2
            "#,
        )
        .bind(user_id.as_i64())
        .bind(role_id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to revoke user role: {error}")))?;

        Ok(())
    }
}
